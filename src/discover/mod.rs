//! Direct PDF link discovery.
//!
//! Discovery is a registry of independent strategies tried in order; the
//! first one to return an address wins. Order encodes confidence, not cost.
//!
//! # Example
//!
//! ```no_run
//! use pdfknife::discover::PdfDiscovery;
//! use pdfknife::model::WebPage;
//!
//! fn main() -> pdfknife::Result<()> {
//!     let html = std::fs::read_to_string("page.html")?;
//!     let page = WebPage::parse(&html, "https://example.com/paper/17")?;
//!
//!     if let Some(candidate) = PdfDiscovery::with_defaults().find(&page) {
//!         println!("{} (via {})", candidate.url, candidate.strategy);
//!     }
//!     Ok(())
//! }
//! ```

mod strategies;
mod structured;

pub use strategies::{
    AnchorFallbackStrategy, DataAttributeStrategy, DocumentUrlStrategy, EmbedStrategy,
    FrameStrategy, ScoredAnchorStrategy,
};
pub use structured::{find_pdf_in_json, StructuredDataStrategy, MAX_SCAN_DEPTH};

pub(crate) use strategies::select;

use crate::model::{PdfCandidate, Strategy, WebPage};
use std::sync::Arc;

/// One way of finding a PDF address in a page.
///
/// Implementations must not panic and must not fail: a strategy that finds
/// nothing returns `None`.
pub trait DiscoveryStrategy: Send + Sync {
    /// Tag reported on candidates this strategy produces.
    fn tag(&self) -> Strategy;

    /// Look for an address.
    fn discover(&self, page: &WebPage) -> Option<String>;
}

/// Ordered, short-circuiting chain of discovery strategies.
pub struct PdfDiscovery {
    strategies: Vec<Arc<dyn DiscoveryStrategy>>,
}

impl PdfDiscovery {
    /// Create an engine with no strategies.
    pub fn new() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    /// Create an engine with the built-in strategies in confidence order.
    pub fn with_defaults() -> Self {
        let mut engine = Self::new();
        engine.register(Arc::new(FrameStrategy));
        engine.register(Arc::new(EmbedStrategy));
        engine.register(Arc::new(ScoredAnchorStrategy));
        engine.register(Arc::new(AnchorFallbackStrategy));
        engine.register(Arc::new(StructuredDataStrategy));
        engine.register(Arc::new(DataAttributeStrategy));
        engine.register(Arc::new(DocumentUrlStrategy));
        engine
    }

    /// Append a strategy; it runs after every strategy already registered.
    pub fn register(&mut self, strategy: Arc<dyn DiscoveryStrategy>) {
        self.strategies.push(strategy);
    }

    /// Number of registered strategies.
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    /// Check if no strategy is registered.
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Return the first address any strategy produces.
    ///
    /// Values are trimmed. A value that does not resolve against the page
    /// address counts as a miss and the next strategy runs.
    pub fn find(&self, page: &WebPage) -> Option<PdfCandidate> {
        for strategy in &self.strategies {
            let url = match strategy.discover(page) {
                Some(url) => url.trim().to_string(),
                None => {
                    log::trace!("{} strategy found nothing", strategy.tag());
                    continue;
                }
            };
            if url.is_empty() {
                log::trace!("{} strategy returned a blank address", strategy.tag());
                continue;
            }
            if page.resolve(&url).is_none() {
                log::debug!("{} strategy returned unresolvable {:?}", strategy.tag(), url);
                continue;
            }
            log::debug!("{} strategy matched: {}", strategy.tag(), url);
            return Some(PdfCandidate::new(url, strategy.tag()));
        }
        None
    }
}

impl Default for PdfDiscovery {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Check whether a string has the shape of a PDF address.
pub fn looks_like_pdf(value: &str) -> bool {
    value.ends_with(".pdf") || value.contains(".pdf?")
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Strategy, Option<&'static str>);

    impl DiscoveryStrategy for Fixed {
        fn tag(&self) -> Strategy {
            self.0
        }

        fn discover(&self, _page: &WebPage) -> Option<String> {
            self.1.map(str::to_string)
        }
    }

    fn blank_page() -> WebPage {
        WebPage::parse("<html></html>", "https://example.com/").unwrap()
    }

    #[test]
    fn test_first_hit_wins() {
        let mut engine = PdfDiscovery::new();
        engine.register(Arc::new(Fixed(Strategy::Frame, None)));
        engine.register(Arc::new(Fixed(Strategy::Embed, Some("/a.pdf"))));
        engine.register(Arc::new(Fixed(Strategy::Anchor, Some("/b.pdf"))));

        let found = engine.find(&blank_page()).unwrap();
        assert_eq!(found, PdfCandidate::new("/a.pdf", Strategy::Embed));
    }

    #[test]
    fn test_blank_result_is_a_miss() {
        let mut engine = PdfDiscovery::new();
        engine.register(Arc::new(Fixed(Strategy::Frame, Some("  "))));
        engine.register(Arc::new(Fixed(Strategy::Anchor, Some("/b.pdf"))));
        assert_eq!(engine.find(&blank_page()).unwrap().strategy, Strategy::Anchor);
    }

    #[test]
    fn test_result_is_trimmed() {
        let mut engine = PdfDiscovery::new();
        engine.register(Arc::new(Fixed(Strategy::Frame, Some("  /x.pdf \n"))));
        assert_eq!(engine.find(&blank_page()).unwrap().url, "/x.pdf");
    }

    #[test]
    fn test_unresolvable_result_is_a_miss() {
        let mut engine = PdfDiscovery::new();
        engine.register(Arc::new(Fixed(Strategy::Frame, Some("http://[bad/x.pdf"))));
        engine.register(Arc::new(Fixed(Strategy::DataAttribute, Some("/ok.pdf"))));
        let found = engine.find(&blank_page()).unwrap();
        assert_eq!(found, PdfCandidate::new("/ok.pdf", Strategy::DataAttribute));
    }

    #[test]
    fn test_defaults_registered() {
        let engine = PdfDiscovery::with_defaults();
        assert_eq!(engine.len(), 7);
        assert!(PdfDiscovery::new().is_empty());
        assert!(engine.find(&blank_page()).is_none());
    }

    #[test]
    fn test_looks_like_pdf() {
        assert!(looks_like_pdf("/a/b.pdf"));
        assert!(looks_like_pdf("https://x/b.pdf?token=1"));
        assert!(!looks_like_pdf("https://x/b.pdfx"));
        assert!(!looks_like_pdf("https://x/b.PDF"));
    }
}
