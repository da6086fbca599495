// SPDX-License-Identifier: PMPL-1.0-or-later

//! Shared fixture: a three-language site with two top-level pages and one
//! blog post.

#![allow(dead_code)]

use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

pub const SITE_YAML: &str = "\
origin: https://reroutenj.org
source_language: en
languages: [en, es, ar]
asset_dirs: [css, img, js, data]
runtime_script: js/i18n.js
runtime_sections: [common, js]
pages:
  - path: index.html
  - path: blog.html
  - path: blog/why-we-built-reroute-nj.html
    key: blog_post
    article: article1
discover: [blog]
";

pub const FAQ_COUNT: usize = 7;

pub fn faq_block() -> String {
    let entities: Vec<Value> = (1..=FAQ_COUNT)
        .map(|i| {
            json!({
                "@type": "Question",
                "name": format!("Question {i}?"),
                "acceptedAnswer": {"@type": "Answer", "text": format!("Answer {i}.")}
            })
        })
        .collect();
    let data = json!({
        "@context": "https://schema.org",
        "@type": "FAQPage",
        "mainEntity": entities
    });
    serde_json::to_string_pretty(&data).unwrap()
}

pub fn index_template() -> String {
    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <title>Reroute NJ: Line guide</title>
  <meta name="description" content="A">
  <meta property="og:title" content="Reroute NJ: Line guide">
  <meta property="og:description" content="Plan around the cutover">
  <meta name="twitter:description" content="Plan around the cutover">
  <meta property="og:url" content="https://reroutenj.org/index.html">
  <link rel="canonical" href="https://reroutenj.org/index.html">
  <link rel="stylesheet" href="css/styles.css">
  <link rel="icon" href="img/favicon.svg">
  <script type="application/ld+json">
  {faq}
  </script>
</head>
<body>
  <a href="#main" class="skip-link">Skip to main content</a>
  <nav>
    <a href="index.html" class="tool-nav-link active">Line guide</a>
    <a href="blog.html" class="tool-nav-link">Blog</a>
  </nav>
  <p class="tagline">Portal Bridge cutover guide</p>
  <label for="station">Your station</label>
  <option value="">Choose your station&hellip;</option>
  <script src="js/i18n.js"></script>
  <script src="js/app.js"></script>
</body>
</html>
"##,
        faq = faq_block()
    )
}

pub const BLOG_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <title>Blog</title>
  <meta name="description" content="Updates">
  <link rel="stylesheet" href="css/styles.css">
  <link rel="icon" href="img/favicon.svg">
</head>
<body>
  <h1 class="page-title">Blog</h1>
  <a href="blog/why-we-built-reroute-nj.html">Why we built Reroute NJ</a>
</body>
</html>
"#;

pub const POST_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <title>Why we built Reroute NJ</title>
  <meta name="description" content="Why">
  <link rel="stylesheet" href="../css/styles.css">
  <link rel="icon" href="../img/favicon.svg">
  <script type="application/ld+json">
  {
    "@context": "https://schema.org",
    "@type": "Article",
    "headline": "Why we built Reroute NJ",
    "mainEntityOfPage": {
      "@type": "WebPage",
      "@id": "https://reroutenj.org/blog/why-we-built-reroute-nj.html"
    }
  }
  </script>
</head>
<body>
  <a href="../blog.html" class="back-link">&larr; All posts</a>
  <img src="../img/portal.jpg" alt="">
  <script src="../js/i18n.js"></script>
</body>
</html>
"#;

fn meta(code: &str, dir: &str, label: &str, native: &str) -> Value {
    json!({"lang": code, "dir": dir, "label": label, "nativeName": native})
}

pub fn english() -> Value {
    let mut schema = serde_json::Map::new();
    for i in 1..=FAQ_COUNT {
        schema.insert(format!("faq_q{i}"), json!(format!("Question {i}?")));
        schema.insert(format!("faq_a{i}"), json!(format!("Answer {i}.")));
    }
    let mut en = json!({
        "meta": meta("en", "ltr", "English", "English"),
        "common": {"skip_to_main": "Skip to main content", "nav_line_guide": "Line guide"},
        "index": {"title": "Reroute NJ: Line guide", "your_station": "Your station"},
        "js": {"loading": "Loading"},
    });
    en["meta"]["index_description"] = json!("A");
    en["schema"] = Value::Object(schema);
    en
}

pub fn spanish() -> Value {
    let mut schema = serde_json::Map::new();
    for i in 1..=FAQ_COUNT {
        schema.insert(format!("faq_q{i}"), json!(format!("¿Pregunta {i}?")));
        schema.insert(format!("faq_a{i}"), json!(format!("Respuesta {i}.")));
    }
    schema.insert("article1_headline".into(), json!("Por qué creamos Reroute NJ"));
    let mut es = json!({
        "meta": meta("es", "ltr", "Spanish", "Español"),
        "common": {
            "skip_to_main": "Saltar al contenido principal",
            "nav_line_guide": "Guía de líneas",
            "nav_blog": "Blog"
        },
        "index": {
            "title": "Reroute NJ: Guía de líneas",
            "your_station": "Tu estación",
            "choose_station": "Elige tu estación…"
        },
        "blog": {"all_posts": "Todas las entradas"},
        "js": {"loading": "Cargando"},
        "card": {"unused": "no se inyecta"}
    });
    es["meta"]["index_description"] = json!("B");
    es["schema"] = Value::Object(schema);
    es
}

pub fn arabic() -> Value {
    json!({
        "meta": meta("ar", "rtl", "Arabic", "العربية"),
        "common": {"nav_line_guide": "دليل الخطوط"}
    })
}

pub fn write_json(path: &Path, value: &Value) {
    fs::write(path, serde_json::to_string_pretty(value).unwrap()).unwrap();
}

/// Build the fixture site and return its temporary root.
pub fn site() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("blog")).unwrap();
    fs::create_dir_all(root.join("translations")).unwrap();

    fs::write(root.join("site.yaml"), SITE_YAML).unwrap();
    fs::write(root.join("index.html"), index_template()).unwrap();
    fs::write(root.join("blog.html"), BLOG_TEMPLATE).unwrap();
    fs::write(root.join("blog/why-we-built-reroute-nj.html"), POST_TEMPLATE).unwrap();

    write_json(&root.join("translations/en.json"), &english());
    write_json(&root.join("translations/es.json"), &spanish());
    write_json(&root.join("translations/ar.json"), &arabic());
    dir
}

pub fn read(root: &Path, rel: &str) -> String {
    fs::read_to_string(root.join(rel)).unwrap_or_else(|e| panic!("reading {rel}: {e}"))
}
