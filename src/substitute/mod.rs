// SPDX-License-Identifier: PMPL-1.0-or-later

//! Content substitution engine.
//!
//! Rewrites body copy, labels and navigation text of a raw template by
//! applying an ordered list of anchor-based [`Rule`]s. Templates are never
//! parsed into a DOM; every anchor is an exact byte sequence (or a narrow
//! regex) in the hand-authored HTML.
//!
//! All anchors are located against the text as it was *before* the pass and
//! the accepted edits are spliced in a single sweep, so no rule can ever
//! match text that another rule inserted. When two rules claim overlapping
//! regions the earlier one in catalog order wins.

mod rules;

pub use rules::{Anchor, Encoding, Rule, RuleCatalog, RuleSpec};

use crate::i18n::Dictionary;
use tracing::{debug, warn};

/// Result of one substitution pass.
#[derive(Debug, Clone, Default)]
pub struct Substitution {
    pub text: String,
    /// Keys that were missing; the English anchor text was kept.
    pub fallback_keys: Vec<String>,
    /// Non-optional rules whose anchor did not occur in the template.
    pub unmatched_rules: Vec<String>,
    /// Rules dropped because they overlapped an earlier rule's edit.
    pub conflicts: Vec<String>,
}

#[derive(Debug)]
struct Edit {
    start: usize,
    end: usize,
    replacement: String,
}

/// Apply `rules` to `raw` using `dictionary`.
pub fn substitute<'a>(
    raw: &str,
    dictionary: &Dictionary,
    page_key: &str,
    rules: impl IntoIterator<Item = &'a Rule>,
) -> Substitution {
    let mut result = Substitution::default();
    let mut edits: Vec<Edit> = Vec::new();

    for rule in rules {
        let spans = find_spans(&rule.anchor, raw, rule.first_only);
        if spans.is_empty() {
            if !rule.optional {
                result.unmatched_rules.push(rule.name.clone());
            }
            continue;
        }

        let key = rule.resolved_key(page_key);
        let Some(value) = dictionary.text(&key) else {
            debug!(key = %key, page = page_key, "translation missing, keeping English");
            if !result.fallback_keys.contains(&key) {
                result.fallback_keys.push(key);
            }
            continue;
        };
        let replacement = rule.render(value);

        let overlaps = spans
            .iter()
            .any(|&span| edits.iter().any(|e| collides(span, (e.start, e.end))));
        if overlaps {
            warn!(rule = %rule.name, page = page_key, "anchor overlaps an earlier rule, skipped");
            result.conflicts.push(rule.name.clone());
            continue;
        }

        edits.extend(spans.into_iter().map(|(start, end)| Edit {
            start,
            end,
            replacement: replacement.clone(),
        }));
    }

    result.text = splice(raw, edits);
    result
}

/// Byte ranges the anchor would replace, sorted and non-overlapping.
fn find_spans(anchor: &Anchor, text: &str, first_only: bool) -> Vec<(usize, usize)> {
    let mut spans: Vec<(usize, usize)> = match anchor {
        Anchor::Literal(texts) => texts
            .iter()
            .flat_map(|needle| {
                text.match_indices(needle.as_str())
                    .map(|(pos, m)| (pos, pos + m.len()))
            })
            .collect(),
        Anchor::Wrapped {
            before,
            texts,
            after,
        } => texts
            .iter()
            .flat_map(|inner| {
                let needle = format!("{before}{inner}{after}");
                let inner_len = inner.len();
                let offset = before.len();
                text.match_indices(needle.as_str())
                    .map(|(pos, _)| (pos + offset, pos + offset + inner_len))
                    .collect::<Vec<_>>()
            })
            .collect(),
        Anchor::Pattern(regex) => regex
            .captures_iter(text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let start = caps.name("open").map_or(whole.start(), |m| m.end());
                let end = caps.name("close").map_or(whole.end(), |m| m.start());
                (start <= end).then_some((start, end))
            })
            .collect(),
    };

    spans.sort_unstable();
    let mut accepted: Vec<(usize, usize)> = Vec::with_capacity(spans.len());
    for span in spans {
        match accepted.last() {
            Some(&(_, prev_end)) if span.0 < prev_end => continue,
            _ => accepted.push(span),
        }
    }
    if first_only {
        accepted.truncate(1);
    }
    accepted
}

/// Two edits collide when their ranges intersect. An empty range (a pure
/// insertion) also collides with any range it touches.
fn collides(a: (usize, usize), b: (usize, usize)) -> bool {
    if a.0 == a.1 || b.0 == b.1 {
        a.0 <= b.1 && b.0 <= a.1
    } else {
        a.0 < b.1 && b.0 < a.1
    }
}

fn splice(raw: &str, mut edits: Vec<Edit>) -> String {
    edits.sort_by_key(|e| (e.start, e.end));
    let mut out = String::with_capacity(raw.len());
    let mut cursor = 0;
    for edit in edits {
        out.push_str(&raw[cursor..edit.start]);
        out.push_str(&edit.replacement);
        cursor = edit.end;
    }
    out.push_str(&raw[cursor..]);
    out
}
