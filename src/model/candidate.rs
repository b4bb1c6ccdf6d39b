//! Discovery result types.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Which discovery strategy produced a candidate.
///
/// Variants are listed in the order the default engine tries them, which is
/// also the order of confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// `<iframe>` whose source points at a PDF
    Frame,
    /// `<embed>` / `<object>` declaring `application/pdf`
    Embed,
    /// Download anchor whose text says so
    ScoredAnchor,
    /// First anchor with a `.pdf` address
    Anchor,
    /// JSON / JSON-LD script block
    StructuredData,
    /// `data-*` attribute
    DataAttribute,
    /// The page itself is a PDF
    DocumentUrl,
}

impl Strategy {
    /// Stable lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Frame => "frame",
            Strategy::Embed => "embed",
            Strategy::ScoredAnchor => "scored_anchor",
            Strategy::Anchor => "anchor",
            Strategy::StructuredData => "structured_data",
            Strategy::DataAttribute => "data_attribute",
            Strategy::DocumentUrl => "document_url",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A direct PDF address found in a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PdfCandidate {
    /// Address as found (may be relative)
    pub url: String,

    /// Strategy that found it
    pub strategy: Strategy,
}

impl PdfCandidate {
    /// Create a new candidate.
    pub fn new(url: impl Into<String>, strategy: Strategy) -> Self {
        Self {
            url: url.into(),
            strategy,
        }
    }

    /// Resolve the address against the page it was found on.
    ///
    /// Absolute addresses pass through; root-relative and relative ones are
    /// joined onto `base`.
    pub fn resolve(&self, base: &Url) -> Result<Url> {
        Ok(base.join(self.url.trim())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_root_relative() {
        let base = Url::parse("https://docs.example.org/view/42?page=2").unwrap();
        let candidate = PdfCandidate::new("/files/42.pdf", Strategy::StructuredData);
        assert_eq!(
            candidate.resolve(&base).unwrap().as_str(),
            "https://docs.example.org/files/42.pdf"
        );
    }

    #[test]
    fn test_resolve_absolute_passthrough() {
        let base = Url::parse("https://a.example/").unwrap();
        let candidate = PdfCandidate::new("https://cdn.example/x.pdf", Strategy::Frame);
        assert_eq!(
            candidate.resolve(&base).unwrap().as_str(),
            "https://cdn.example/x.pdf"
        );
    }

    #[test]
    fn test_strategy_serde_names() {
        let json = serde_json::to_string(&Strategy::ScoredAnchor).unwrap();
        assert_eq!(json, "\"scored_anchor\"");
        assert_eq!(Strategy::DocumentUrl.to_string(), "document_url");
    }
}
