// SPDX-License-Identifier: PMPL-1.0-or-later

//! Runtime translation injection.
//!
//! Client-side scripts read their strings from `window._T` and resolve
//! assets against `window.BASE_PATH`. Both are written inline just before
//! the runtime script tag so they exist before that script runs.

use crate::error::GenerateError;
use crate::i18n::Dictionary;
use serde_json::{Map, Value};
use tracing::debug;

const MARKER: &str = "window._T=";
const SCRIPT_OPEN: &str = "<script src=\"";

/// Compact JSON of the runtime sections present in `dictionary`, safe to
/// embed inside a `<script>` element.
pub fn runtime_json(
    dictionary: &Dictionary,
    sections: &[String],
) -> Result<String, GenerateError> {
    let mut map = Map::new();
    for name in sections {
        if let Some(section) = dictionary.section(name) {
            map.insert(name.clone(), section.clone());
        }
    }
    let json =
        serde_json::to_string(&Value::Object(map)).map_err(GenerateError::RuntimeSerialize)?;
    Ok(json.replace("</", "<\\/"))
}

/// Insert the runtime block before `<script src="{../…}{script}"></script>`.
/// Pages without that tag, or that already carry the block, are unchanged.
pub fn inject(
    text: &str,
    dictionary: &Dictionary,
    sections: &[String],
    script: &str,
    output_depth: usize,
) -> Result<String, GenerateError> {
    if text.contains(MARKER) {
        return Ok(text.to_string());
    }
    let Some(position) = find_script_tag(text, script) else {
        debug!(script, "runtime script tag not found, nothing injected");
        return Ok(text.to_string());
    };

    let base_path = "../".repeat(output_depth);
    let json = runtime_json(dictionary, sections)?;
    let block = format!("<script>window.BASE_PATH=\"{base_path}\";{MARKER}{json};</script>\n  ");

    let mut out = String::with_capacity(text.len() + block.len());
    out.push_str(&text[..position]);
    out.push_str(&block);
    out.push_str(&text[position..]);
    Ok(out)
}

/// Byte offset of the first `<script src="` whose path is `script` behind
/// any number of `../` segments.
fn find_script_tag(text: &str, script: &str) -> Option<usize> {
    let needle = format!("{script}\"></script>");
    text.match_indices(needle.as_str()).find_map(|(pos, _)| {
        let mut head = &text[..pos];
        while let Some(rest) = head.strip_suffix("../") {
            head = rest;
        }
        head.strip_suffix(SCRIPT_OPEN).map(str::len)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn dict() -> Dictionary {
        let json = r#"{
            "meta": {"lang": "es", "dir": "ltr", "label": "Spanish", "nativeName": "Español"},
            "common": {"nav_map": "Mapa"},
            "js": {"close": "Cerrar </script>"},
            "about": {"heading": "Acerca"}
        }"#;
        Dictionary::parse("es", json, PathBuf::from("es.json")).unwrap()
    }

    fn sections() -> Vec<String> {
        ["common", "js", "compare"].iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn block_inserted_before_runtime_script() {
        let html = "<body>\n  <script src=\"../js/i18n.js\"></script>\n</body>";
        let out = inject(html, &dict(), &sections(), "js/i18n.js", 1).unwrap();
        assert!(out.contains(
            "<script>window.BASE_PATH=\"../\";window._T={\"common\":{\"nav_map\":\"Mapa\"},\"js\":{\"close\":\"Cerrar <\\/script>\"}};</script>\n  <script src=\"../js/i18n.js\"></script>"
        ));
        assert!(!out.contains("about"));
    }

    #[test]
    fn base_path_follows_output_depth() {
        let html = "<script src=\"js/i18n.js\"></script>";
        let out = inject(html, &dict(), &sections(), "js/i18n.js", 2).unwrap();
        assert!(out.starts_with("<script>window.BASE_PATH=\"../../\";"));
    }

    #[test]
    fn injection_is_idempotent() {
        let html = "<script src=\"js/i18n.js\"></script>";
        let once = inject(html, &dict(), &sections(), "js/i18n.js", 1).unwrap();
        let twice = inject(&once, &dict(), &sections(), "js/i18n.js", 1).unwrap();
        assert_eq!(once, twice);
        assert_eq!(twice.matches(MARKER).count(), 1);
    }

    #[test]
    fn pages_without_runtime_script_unchanged() {
        let html = "<script src=\"js/map.js\"></script>";
        assert_eq!(inject(html, &dict(), &sections(), "js/i18n.js", 1).unwrap(), html);
    }
}
