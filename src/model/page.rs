//! Rendered page snapshot.

use crate::error::Result;
use scraper::{Html, Selector};
use url::Url;

/// A rendered document: its HTML tree, its address and its title.
#[derive(Debug)]
pub struct WebPage {
    html: Html,
    url: Url,
    title: Option<String>,
}

impl WebPage {
    /// Parse serialized HTML captured from `url`.
    ///
    /// The title is read from the first `<title>` element, with whitespace
    /// collapsed the way browsers expose `document.title`.
    pub fn parse(html: &str, url: &str) -> Result<Self> {
        let url = Url::parse(url)?;
        Ok(Self::from_parts(Html::parse_document(html), url))
    }

    /// Build a page from an already parsed tree.
    pub fn from_parts(html: Html, url: Url) -> Self {
        let title = document_title(&html);
        Self { html, url, title }
    }

    /// Override the document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        let title = title.into();
        self.title = if title.trim().is_empty() {
            None
        } else {
            Some(title)
        };
        self
    }

    /// The parsed HTML tree.
    pub fn html(&self) -> &Html {
        &self.html
    }

    /// The page address.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The document title, if the page has a non-blank one.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Host name of the page address (empty for host-less schemes).
    pub fn hostname(&self) -> &str {
        self.url.host_str().unwrap_or("")
    }

    /// Resolve an attribute value against the page address.
    pub fn resolve(&self, href: &str) -> Option<Url> {
        self.url.join(href.trim()).ok()
    }
}

fn document_title(html: &Html) -> Option<String> {
    let selector = Selector::parse("title").ok()?;
    let element = html.select(&selector).next()?;
    let text = element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ");
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
