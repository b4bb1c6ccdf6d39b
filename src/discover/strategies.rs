//! DOM-based discovery strategies.

use super::{looks_like_pdf, DiscoveryStrategy};
use crate::model::{Strategy, WebPage};
use scraper::{ElementRef, Selector};

const FRAME_SELECTOR: &str = "iframe[src]";
const EMBED_SELECTOR: &str = r#"embed[type="application/pdf"], object[type="application/pdf"]"#;
const LINK_SELECTOR: &str = r#"a[href*=".pdf"], a[download*=".pdf"], a[href*="/download/"], a[href*="/downloads/"]"#;
const DATA_SELECTOR: &str = "[data-pdf-url], [data-download-url], [data-src]";
const DATA_ATTRIBUTES: [&str; 3] = ["data-pdf-url", "data-download-url", "data-src"];

/// Elements matching `css`, in document order. An invalid selector matches
/// nothing.
pub(crate) fn select<'a>(page: &'a WebPage, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(selector) => page.html().select(&selector).collect(),
        Err(e) => {
            log::debug!("selector {:?} rejected: {:?}", css, e);
            Vec::new()
        }
    }
}

/// Attribute value, treating an empty string as absent.
fn non_empty_attr<'a>(element: &ElementRef<'a>, name: &str) -> Option<&'a str> {
    element.value().attr(name).filter(|v| !v.trim().is_empty())
}

/// `<iframe>` whose source ends with or contains `.pdf`, or has a `/pdf/`
/// path segment.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameStrategy;

impl DiscoveryStrategy for FrameStrategy {
    fn tag(&self) -> Strategy {
        Strategy::Frame
    }

    fn discover(&self, page: &WebPage) -> Option<String> {
        select(page, FRAME_SELECTOR)
            .iter()
            .filter_map(|frame| non_empty_attr(frame, "src"))
            .find(|src| src.contains(".pdf") || src.contains("/pdf/"))
            .map(str::to_string)
    }
}

/// `<embed>` or `<object>` declaring the PDF media type.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbedStrategy;

impl DiscoveryStrategy for EmbedStrategy {
    fn tag(&self) -> Strategy {
        Strategy::Embed
    }

    fn discover(&self, page: &WebPage) -> Option<String> {
        select(page, EMBED_SELECTOR).iter().find_map(|element| {
            non_empty_attr(element, "src")
                .or_else(|| non_empty_attr(element, "data"))
                .map(str::to_string)
        })
    }
}

/// Anchors that may point at a PDF, with their resolved addresses.
/// Anchors whose href does not resolve are dropped.
fn pdf_links<'a>(page: &'a WebPage) -> Vec<(String, ElementRef<'a>)> {
    select(page, LINK_SELECTOR)
        .into_iter()
        .filter_map(|anchor| {
            let href = non_empty_attr(&anchor, "href")?;
            let resolved = page.resolve(href)?;
            Some((resolved.to_string(), anchor))
        })
        .collect()
}

/// Check whether link text reads like a download action.
fn is_download_text(text: &str) -> bool {
    let text = text.to_lowercase();
    (text.contains("pdf") && text.contains("download")) || text.contains("save")
}

/// Anchor whose visible text says "download ... pdf" or "save".
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoredAnchorStrategy;

impl DiscoveryStrategy for ScoredAnchorStrategy {
    fn tag(&self) -> Strategy {
        Strategy::ScoredAnchor
    }

    fn discover(&self, page: &WebPage) -> Option<String> {
        pdf_links(page)
            .into_iter()
            .find(|(_, anchor)| is_download_text(&anchor.text().collect::<String>()))
            .map(|(href, _)| href)
    }
}

/// First candidate anchor whose address contains `.pdf`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnchorFallbackStrategy;

impl DiscoveryStrategy for AnchorFallbackStrategy {
    fn tag(&self) -> Strategy {
        Strategy::Anchor
    }

    fn discover(&self, page: &WebPage) -> Option<String> {
        pdf_links(page)
            .into_iter()
            .map(|(href, _)| href)
            .find(|href| href.contains(".pdf"))
    }
}

/// `data-pdf-url`, `data-download-url` or `data-src` holding a PDF address.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataAttributeStrategy;

impl DiscoveryStrategy for DataAttributeStrategy {
    fn tag(&self) -> Strategy {
        Strategy::DataAttribute
    }

    fn discover(&self, page: &WebPage) -> Option<String> {
        select(page, DATA_SELECTOR)
            .iter()
            .filter_map(|element| {
                DATA_ATTRIBUTES
                    .iter()
                    .find_map(|name| element.value().attr(name).filter(|v| !v.is_empty()))
            })
            .find(|value| looks_like_pdf(value))
            .map(str::to_string)
    }
}

/// The page address itself, when its path ends in `.pdf`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentUrlStrategy;

impl DiscoveryStrategy for DocumentUrlStrategy {
    fn tag(&self) -> Strategy {
        Strategy::DocumentUrl
    }

    fn discover(&self, page: &WebPage) -> Option<String> {
        if page.url().path().ends_with(".pdf") {
            Some(page.url().to_string())
        } else {
            None
        }
    }
}
