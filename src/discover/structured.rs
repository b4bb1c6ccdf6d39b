//! Structured-data (JSON / JSON-LD) discovery.

use super::strategies::select;
use super::DiscoveryStrategy;
use crate::model::{Strategy, WebPage};
use serde_json::Value;

const SCRIPT_SELECTOR: &str =
    r#"script[type="application/ld+json"], script[type="application/json"]"#;

/// Deepest nesting level the recursive scan descends into.
pub const MAX_SCAN_DEPTH: usize = 64;

/// Top-level keys checked before the recursive scan.
const DIRECT_KEYS: [&str; 2] = ["contentUrl", "downloadUrl"];

/// PDF address inside `<script type="application/ld+json">` or
/// `<script type="application/json">` blocks.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuredDataStrategy;

impl DiscoveryStrategy for StructuredDataStrategy {
    fn tag(&self) -> Strategy {
        Strategy::StructuredData
    }

    fn discover(&self, page: &WebPage) -> Option<String> {
        for script in select(page, SCRIPT_SELECTOR) {
            let text: String = script.text().collect();
            let body = if text.trim().is_empty() { "{}" } else { text.as_str() };

            let data: Value = match serde_json::from_str(body) {
                Ok(v) => v,
                Err(e) => {
                    log::debug!("skipping malformed structured data: {}", e);
                    continue;
                }
            };

            if let Some(url) = find_pdf_in_json(&data) {
                return Some(url);
            }
        }
        None
    }
}

/// Find a PDF address in one parsed structured-data block.
///
/// Top-level `contentUrl` then `downloadUrl` win when they end in `.pdf`.
/// Otherwise the structure is walked depth-first in key insertion order for
/// a string ending in `.pdf` or containing `.pdf?` that is absolute
/// (`http…`) or root-relative (`/…`). The walk stops at [`MAX_SCAN_DEPTH`].
pub fn find_pdf_in_json(data: &Value) -> Option<String> {
    if let Value::Object(map) = data {
        for key in DIRECT_KEYS {
            if let Some(Value::String(url)) = map.get(key) {
                if url.ends_with(".pdf") {
                    return Some(url.clone());
                }
            }
        }
    }
    scan(data, 0)
}

fn scan(value: &Value, depth: usize) -> Option<String> {
    if depth >= MAX_SCAN_DEPTH {
        log::debug!("structured data nested deeper than {}, not descending", MAX_SCAN_DEPTH);
        return None;
    }

    let children: Vec<&Value> = match value {
        Value::Object(map) => map.values().collect(),
        Value::Array(items) => items.iter().collect(),
        _ => return None,
    };

    for child in children {
        match child {
            Value::String(s) if is_pdf_address(s) => return Some(s.clone()),
            Value::Object(_) | Value::Array(_) => {
                if let Some(found) = scan(child, depth + 1) {
                    return Some(found);
                }
            }
            _ => {}
        }
    }
    None
}

fn is_pdf_address(s: &str) -> bool {
    super::looks_like_pdf(s) && (s.starts_with("http") || s.starts_with('/'))
}
