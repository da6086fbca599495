// SPDX-License-Identifier: PMPL-1.0-or-later

//! Coverage, freshness and audit checks against generated output

mod common;

use filetime::FileTime;
use reroute_pages::audit::{self, Level};
use reroute_pages::batch::{self, GenerateOptions};
use reroute_pages::config::Site;
use reroute_pages::freshness::{self, Freshness};
use reroute_pages::missing;
use std::fs;

fn targets() -> Vec<String> {
    vec!["es".to_string(), "ar".to_string()]
}

#[test]
fn test_audit_clean_after_generation() {
    let dir = common::site();
    let site = Site::load(dir.path(), None, None, None).unwrap();
    batch::run(&site, &GenerateOptions::default());

    let report = audit::audit_output(&site, &targets());
    assert_eq!(report.files_checked, 6);
    assert!(!report.has_errors(), "findings: {:?}", report.findings);
    assert_eq!(report.count(Level::Warn), 0);
}

#[test]
fn test_audit_flags_hand_edited_output() {
    let dir = common::site();
    let site = Site::load(dir.path(), None, None, None).unwrap();
    batch::run(&site, &GenerateOptions::default());

    let path = dir.path().join("es/blog.html");
    let text = fs::read_to_string(&path).unwrap();
    let doubled = text.replacen(
        "</head>",
        "  <link rel=\"canonical\" href=\"https://reroutenj.org/es/blog.html\">\n</head>",
        1,
    );
    fs::write(&path, doubled).unwrap();

    let report = audit::audit_output(&site, &["es".to_string()]);
    assert!(report.has_errors());
    assert_eq!(report.count(Level::Error), 1);
    assert!(report.findings[0].path.ends_with("es/blog.html"));

    // Regenerating restores the single canonical link.
    batch::run(&site, &GenerateOptions::default());
    assert!(!audit::audit_output(&site, &["es".to_string()]).has_errors());
}

#[test]
fn test_missing_keys_per_language() {
    let dir = common::site();
    let site = Site::load(dir.path(), None, None, None).unwrap();

    let results = missing::check(&site, &targets()).unwrap();
    let es = &results[0];
    assert_eq!(es.language, "es");
    assert!(es.is_complete(), "es missing: {:?}", es.missing);

    let ar = &results[1];
    assert!(!ar.is_complete());
    assert!(ar.missing.contains(&"meta.index_description".to_string()));
    assert!(ar.missing.contains(&"schema.faq_q1".to_string()));
    assert!(!ar.missing.contains(&"common.nav_line_guide".to_string()));
}

#[test]
fn test_stale_after_dictionary_edit() {
    let dir = common::site();
    let site = Site::load(dir.path(), None, None, None).unwrap();

    let before = freshness::check(&site, &targets());
    assert!(before.iter().all(|p| p.state == Freshness::Missing));

    batch::run(&site, &GenerateOptions::default());
    let generated = freshness::check(&site, &targets());
    let outputs: Vec<_> = generated.iter().map(|p| p.output_path.clone()).collect();
    for path in &outputs {
        filetime::set_file_mtime(path, FileTime::from_unix_time(2_000_000_000, 0)).unwrap();
    }
    assert!(freshness::check(&site, &targets())
        .iter()
        .all(|p| p.state == Freshness::Fresh));

    let es_dict = dir.path().join("translations/es.json");
    filetime::set_file_mtime(&es_dict, FileTime::from_unix_time(2_100_000_000, 0)).unwrap();
    let after = freshness::check(&site, &targets());
    for entry in &after {
        match entry.language.as_str() {
            "es" => assert_eq!(
                entry.state,
                Freshness::Stale {
                    newer: vec![es_dict.clone()]
                }
            ),
            _ => assert_eq!(entry.state, Freshness::Fresh),
        }
    }
}
