// SPDX-License-Identifier: PMPL-1.0-or-later

//! JSON-LD structured data translation.
//!
//! Each `<script type="application/ld+json">` block is parsed, translated
//! according to its `@type`, re-serialized with a 4-space indent and spliced
//! back. Key order is preserved (`serde_json/preserve_order`) and non-ASCII
//! text is written as-is.

use super::{Lookup, PageContext};
use crate::error::GenerateError;
use regex::Regex;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use std::sync::LazyLock;

static LD_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)(<script type="application/ld\+json">\s*)(.*?)(</script>)"#)
        .expect("static pattern")
});

/// Translate every JSON-LD block in `text`. A block that is not valid JSON
/// fails the whole unit.
pub fn translate_blocks(
    text: &str,
    ctx: &PageContext<'_>,
    lookup: &mut Lookup<'_>,
) -> Result<String, GenerateError> {
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;

    for (index, caps) in LD_BLOCK.captures_iter(text).enumerate() {
        let (Some(whole), Some(open), Some(body), Some(close)) =
            (caps.get(0), caps.get(1), caps.get(2), caps.get(3))
        else {
            continue;
        };
        let mut data: Value = serde_json::from_str(body.as_str())
            .map_err(|source| GenerateError::MalformedStructuredData { index, source })?;

        translate_value(&mut data, ctx, lookup);

        out.push_str(&text[cursor..whole.start()]);
        out.push_str(open.as_str());
        out.push_str(&to_pretty(&data, index)?);
        out.push_str("\n  ");
        out.push_str(close.as_str());
        cursor = whole.end();
    }

    out.push_str(&text[cursor..]);
    Ok(out)
}

fn to_pretty(data: &Value, index: usize) -> Result<String, GenerateError> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    data.serialize(&mut ser)
        .map_err(|source| GenerateError::StructuredDataSerialize { index, source })?;
    // serde_json only ever emits UTF-8. `</` can only occur inside string
    // literals, where `<\/` is an equivalent escape that cannot end the
    // script element.
    Ok(String::from_utf8_lossy(&buf).replace("</", "<\\/"))
}

/// Translate one JSON-LD node; a top-level array is handled element-wise.
pub fn translate_value(data: &mut Value, ctx: &PageContext<'_>, lookup: &mut Lookup<'_>) {
    if let Value::Array(items) = data {
        for item in items {
            translate_value(item, ctx, lookup);
        }
        return;
    }
    let schema_type = data
        .get("@type")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    match schema_type.as_str() {
        "WebSite" => {
            set_text(data, "description", lookup.text("schema.site_description"));
        }
        "FAQPage" => translate_faq(data, lookup),
        "BreadcrumbList" => translate_breadcrumbs(data, ctx, lookup),
        "CollectionPage" => translate_collection(data, ctx, lookup),
        "Article" => translate_article(data, ctx, lookup),
        _ => {}
    }
}

fn translate_faq(data: &mut Value, lookup: &mut Lookup<'_>) {
    let Some(entities) = data.get_mut("mainEntity").and_then(Value::as_array_mut) else {
        return;
    };
    for (i, entity) in entities.iter_mut().enumerate() {
        let n = i + 1;
        set_text(entity, "name", lookup.text(&format!("schema.faq_q{n}")));
        let answer = lookup.text(&format!("schema.faq_a{n}"));
        if let Some(accepted) = entity.get_mut("acceptedAnswer") {
            set_text(accepted, "text", answer);
        }
    }
}

fn translate_breadcrumbs(data: &mut Value, ctx: &PageContext<'_>, lookup: &mut Lookup<'_>) {
    let Some(items) = data.get_mut("itemListElement").and_then(Value::as_array_mut) else {
        return;
    };
    let levels = items.len();
    let page_key = &ctx.page.key;

    for item in items.iter_mut() {
        match item.get("position").and_then(Value::as_i64).unwrap_or(0) {
            2 => {
                // In a three-level trail the middle crumb is the blog index.
                let name = if levels == 3 {
                    lookup.text("schema.breadcrumb_blog")
                } else {
                    lookup.text(&format!("schema.breadcrumb_{page_key}"))
                };
                set_text(item, "name", name);
                localize_field(item, "item", ctx);
            }
            3 => {
                set_text(item, "name", lookup.text(&format!("schema.breadcrumb_{page_key}")));
            }
            _ => {}
        }
    }
}

fn translate_collection(data: &mut Value, ctx: &PageContext<'_>, lookup: &mut Lookup<'_>) {
    set_text(data, "name", lookup.text("schema.collection_name"));
    set_text(data, "description", lookup.text("schema.collection_description"));
    localize_field(data, "url", ctx);

    let Some(list) = data.get_mut("mainEntity") else {
        return;
    };
    if list.get("@type").and_then(Value::as_str) != Some("ItemList") {
        return;
    }
    let Some(entries) = list.get_mut("itemListElement").and_then(Value::as_array_mut) else {
        return;
    };
    for entry in entries {
        let position = entry.get("position").and_then(Value::as_i64).unwrap_or(0);
        set_text(
            entry,
            "name",
            lookup.text(&format!("schema.collection_item{position}")),
        );
        localize_field(entry, "url", ctx);
    }
}

fn translate_article(data: &mut Value, ctx: &PageContext<'_>, lookup: &mut Lookup<'_>) {
    let Some(prefix) = ctx.page.article.as_deref() else {
        return;
    };
    set_text(data, "headline", lookup.text(&format!("schema.{prefix}_headline")));
    set_text(data, "description", lookup.text(&format!("schema.{prefix}_description")));
    if let Some(main_entity) = data.get_mut("mainEntityOfPage") {
        localize_field(main_entity, "@id", ctx);
    }
}

fn set_text(node: &mut Value, field: &str, value: Option<&str>) {
    if let (Some(obj), Some(value)) = (node.as_object_mut(), value) {
        obj.insert(field.to_string(), Value::String(value.to_string()));
    }
}

fn localize_field(node: &mut Value, field: &str, ctx: &PageContext<'_>) {
    if let Some(Value::String(url)) = node.get_mut(field) {
        *url = ctx.localize_url(url);
    }
}
