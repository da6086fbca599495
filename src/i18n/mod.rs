// SPDX-License-Identifier: PMPL-1.0-or-later

//! Translation dictionaries and language-code metadata.
//!
//! ## Design
//!
//! Dictionaries live in `translations/{lang}.json` and use dotted
//! namespaces: `"common.nav_map"`, `"meta.index_description"`,
//! `"schema.faq_q1"`. A key that is missing in the target language is never
//! an error; the pipeline leaves the English text in place and records the
//! key so `missing` and the run report can surface the gap.

mod dictionary;
mod iso639;

pub use dictionary::{list_missing_keys, Dictionary};
pub use iso639::{is_valid_iso639_1, language_name};
