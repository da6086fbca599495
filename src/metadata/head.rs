// SPDX-License-Identifier: PMPL-1.0-or-later

//! `<head>` passes: document language, descriptions, canonical link, og:url
//! and the hreflang block.

use super::Lookup;
use crate::config::Site;
use crate::types::Direction;
use regex::{NoExpand, Regex};
use std::sync::LazyLock;

static HTML_LANG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<html\s+lang="[^"]*"(?:\s+dir="[^"]*")?"#).expect("static pattern")
});
static META_DESCRIPTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<meta name="description" content="[^"]*">"#).expect("static pattern")
});
static OG_DESCRIPTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<meta property="og:description" content="[^"]*">"#).expect("static pattern")
});
static TWITTER_DESCRIPTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<meta name="twitter:description" content="[^"]*">"#).expect("static pattern")
});
static OG_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<meta property="og:url" content="[^"]*">"#).expect("static pattern")
});
static CANONICAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<link rel="canonical" href="[^"]*">"#).expect("static pattern")
});
static ALTERNATE_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<link\s[^>]*\bhreflang=""#).expect("static pattern")
});

/// Encode a value for use inside a double-quoted attribute.
pub fn attr_encode(value: &str) -> String {
    value.replace('"', "&quot;")
}

/// Set `<html lang>` and, for RTL languages, `dir="rtl"`. An existing `dir`
/// attribute is replaced so repeated runs never stack attributes.
pub fn set_document_language(text: &str, language: &str, direction: Direction) -> String {
    let tag = match direction {
        Direction::Rtl => format!(r#"<html lang="{language}" dir="rtl""#),
        Direction::Ltr => format!(r#"<html lang="{language}""#),
    };
    HTML_LANG.replace(text, NoExpand(&tag)).into_owned()
}

/// `meta.{page}_description` → `<meta name="description">`;
/// `meta.{page}_og_description` → og/twitter descriptions.
pub fn rewrite_descriptions(text: &str, page_key: &str, lookup: &mut Lookup<'_>) -> String {
    let mut out = text.to_string();

    if let Some(desc) = lookup.text(&format!("meta.{page_key}_description")) {
        let tag = format!(r#"<meta name="description" content="{}">"#, attr_encode(desc));
        out = META_DESCRIPTION.replace_all(&out, NoExpand(&tag)).into_owned();
    }
    if let Some(desc) = lookup.text(&format!("meta.{page_key}_og_description")) {
        let desc = attr_encode(desc);
        let og = format!(r#"<meta property="og:description" content="{desc}">"#);
        let twitter = format!(r#"<meta name="twitter:description" content="{desc}">"#);
        out = OG_DESCRIPTION.replace_all(&out, NoExpand(&og)).into_owned();
        out = TWITTER_DESCRIPTION
            .replace_all(&out, NoExpand(&twitter))
            .into_owned();
    }
    out
}

/// Replace the canonical link, or insert one before `<link rel="icon"` (or
/// `</head>` when the page has no icon link). Never adds a second one.
pub fn set_canonical(text: &str, url: &str) -> String {
    let tag = format!(r#"<link rel="canonical" href="{}">"#, attr_encode(url));
    if CANONICAL.is_match(text) {
        return CANONICAL.replace_all(text, NoExpand(&tag)).into_owned();
    }
    if text.contains("<link rel=\"icon\"") {
        return text.replacen(
            "<link rel=\"icon\"",
            &format!("{tag}\n  <link rel=\"icon\""),
            1,
        );
    }
    text.replacen("</head>", &format!("  {tag}\n</head>"), 1)
}

pub fn set_og_url(text: &str, url: &str) -> String {
    let tag = format!(r#"<meta property="og:url" content="{}">"#, attr_encode(url));
    OG_URL.replace_all(text, NoExpand(&tag)).into_owned()
}

/// One `<link rel="alternate">` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HrefLang {
    pub language: String,
    pub url: String,
}

/// Every configured language plus `x-default` pointing at the source page.
pub fn hreflang_set(site: &Site, page: &str) -> Vec<HrefLang> {
    let config = &site.config;
    config
        .languages
        .iter()
        .map(|code| HrefLang {
            language: code.clone(),
            url: site.page_url(code, page),
        })
        .chain(std::iter::once(HrefLang {
            language: "x-default".to_string(),
            url: site.page_url(&config.source_language, page),
        }))
        .collect()
}

/// Insert the alternate block before `</head>`. Pages that already carry
/// an alternate `<link hreflang>` are left alone; the attribute text
/// appearing anywhere else (body copy, inline scripts) does not count.
pub fn insert_hreflang(text: &str, set: &[HrefLang]) -> String {
    if ALTERNATE_LINK.is_match(text) || set.is_empty() {
        return text.to_string();
    }
    let mut block = String::new();
    for entry in set {
        block.push_str(&format!(
            "  <link rel=\"alternate\" hreflang=\"{}\" href=\"{}\">\n",
            entry.language,
            attr_encode(&entry.url)
        ));
    }
    text.replacen("</head>", &format!("{block}</head>"), 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::substitute::RuleCatalog;
    use std::path::PathBuf;

    fn site() -> Site {
        let yaml = "origin: https://example.org\nsource_language: en\nlanguages: [en, es, ar]\npages:\n  - path: index.html\n";
        let config = SiteConfig::from_yaml(yaml, "test").unwrap();
        Site::new(PathBuf::from("."), None, config, RuleCatalog::default()).unwrap()
    }

    #[test]
    fn document_language_and_direction() {
        let html = r#"<html lang="en"><head>"#;
        assert_eq!(
            set_document_language(html, "es", Direction::Ltr),
            r#"<html lang="es"><head>"#
        );
        let rtl = set_document_language(html, "ar", Direction::Rtl);
        assert_eq!(rtl, r#"<html lang="ar" dir="rtl"><head>"#);
        assert_eq!(set_document_language(&rtl, "ar", Direction::Rtl), rtl);
    }

    #[test]
    fn canonical_replaced_not_duplicated() {
        let html = r#"<link rel="canonical" href="https://example.org/map.html"><link rel="icon" href="x">"#;
        let out = set_canonical(html, "https://example.org/es/map.html");
        assert_eq!(out.matches("rel=\"canonical\"").count(), 1);
        assert!(out.contains(r#"href="https://example.org/es/map.html""#));
    }

    #[test]
    fn canonical_inserted_before_icon() {
        let html = "<head>\n  <link rel=\"icon\" href=\"favicon.ico\">\n</head>";
        let out = set_canonical(html, "https://example.org/es/map.html");
        assert!(out.contains(
            "<link rel=\"canonical\" href=\"https://example.org/es/map.html\">\n  <link rel=\"icon\""
        ));
        assert_eq!(set_canonical(&out, "https://example.org/es/map.html"), out);
    }

    #[test]
    fn canonical_falls_back_to_head_end() {
        let out = set_canonical("<head>\n</head>", "https://example.org/es/a.html");
        assert_eq!(
            out,
            "<head>\n  <link rel=\"canonical\" href=\"https://example.org/es/a.html\">\n</head>"
        );
    }

    #[test]
    fn og_url_points_at_translated_page() {
        let html = r#"<meta property="og:url" content="https://example.org/map.html">"#;
        assert_eq!(
            set_og_url(html, "https://example.org/es/map.html"),
            r#"<meta property="og:url" content="https://example.org/es/map.html">"#
        );
    }

    #[test]
    fn hreflang_block_is_complete() {
        let site = site();
        let set = hreflang_set(&site, "index.html");
        let out = insert_hreflang("<head>\n</head>", &set);
        for lang in ["en", "es", "ar", "x-default"] {
            assert_eq!(out.matches(&format!("hreflang=\"{lang}\"")).count(), 1);
        }
        assert!(out.contains(r#"hreflang="en" href="https://example.org/index.html""#));
        assert!(out.contains(r#"hreflang="ar" href="https://example.org/ar/index.html""#));
        assert!(out.contains(r#"hreflang="x-default" href="https://example.org/index.html""#));
        assert_eq!(insert_hreflang(&out, &set), out);
    }

    #[test]
    fn hreflang_text_outside_links_does_not_block_insertion() {
        let site = site();
        let set = hreflang_set(&site, "index.html");
        let html = "<head>\n  <script>window._T={\"a\":\"use hreflang=\\\"x\\\"\"};</script>\n</head>\n<p>hreflang=</p>";
        let out = insert_hreflang(html, &set);
        assert_eq!(out.matches("<link rel=\"alternate\"").count(), 4);
    }

    #[test]
    fn existing_alternate_link_skips_insertion() {
        let site = site();
        let set = hreflang_set(&site, "index.html");
        let html = "<head>\n  <link href=\"https://example.org/index.html\" rel=\"alternate\" hreflang=\"en\">\n</head>";
        assert_eq!(insert_hreflang(html, &set), html);
    }

    #[test]
    fn values_with_quotes_are_attribute_encoded() {
        assert_eq!(attr_encode(r#"say "hi""#), "say &quot;hi&quot;");
    }
}
