// SPDX-License-Identifier: PMPL-1.0-or-later

//! reroute-pages: translated static-page generator.
//!
//! Takes hand-authored English HTML templates plus one JSON dictionary per
//! language and writes `{lang}/{page}` copies with translated copy, rewritten
//! metadata (canonical, Open Graph, hreflang, JSON-LD) and asset paths fixed
//! for the extra directory level.
//!
//! The pipeline for one (page, language) unit lives in [`pipeline`]; the
//! cartesian product over pages and languages, with failure collection, in
//! [`batch`]. Everything site-specific (origin, languages, page table, rule
//! catalog) is data, loaded once into a [`config::Site`].

pub mod assets;
pub mod audit;
pub mod batch;
pub mod config;
pub mod error;
pub mod freshness;
pub mod i18n;
pub mod metadata;
pub mod missing;
pub mod pipeline;
pub mod report;
pub mod runtime;
pub mod substitute;
pub mod template;
pub mod types;
