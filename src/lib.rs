//! # pdfknife
//!
//! Find the PDF behind a web page, or build one from its page images.
//!
//! Document viewers either link the PDF somewhere in the markup (an iframe,
//! an embed, a download anchor, structured data) or stream the pages as
//! blob-backed images. This library tries the first and falls back to the
//! second.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfknife::find_pdf_url;
//!
//! fn main() -> pdfknife::Result<()> {
//!     let html = std::fs::read_to_string("page.html")?;
//!     match find_pdf_url(&html, "https://example.com/viewer")? {
//!         Some(url) => println!("PDF at {}", url),
//!         None => println!("no direct link"),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Ordered discovery**: seven strategies, first hit wins
//! - **Page assembly**: blob images in document order, one page each, fit to A4 or Letter
//! - **Bounded waits**: a stalled image is skipped instead of hanging the run
//! - **Pluggable hosts**: settings, downloads and notifications are traits

pub mod assemble;
pub mod capability;
pub mod collect;
pub mod config;
pub mod controller;
pub mod discover;
pub mod error;
pub mod exclusion;
pub mod filename;
pub mod host;
pub mod layout;
pub mod model;

// Re-export commonly used types
pub use assemble::{AssembleOptions, AssembledPdf, DocumentAssembler};
pub use capability::{load_renderer, RendererSource, ALLOWED_RENDERER_ORIGIN};
pub use collect::{collect_images, scan_images, BlobDirLoader, ImageLoader, MemoryLoader};
pub use config::{ConflictAction, Settings, StoredState};
pub use controller::{
    download_direct, ProcessingState, RunOutcome, SkipReason, Trigger, TriggerController,
};
pub use discover::{DiscoveryStrategy, PdfDiscovery};
pub use error::{Error, Result};
pub use exclusion::is_excluded;
pub use filename::{filename_from_url, sanitize_title};
pub use host::{
    Downloader, FileSettings, FsDownloader, LogNotifier, NoProgress, Notifier, ProgressSink,
    SettingsSource, StaticSettings,
};
pub use layout::{PageLayout, PageSize};
pub use model::{CollectedImage, ImageSource, ImageState, PdfCandidate, Strategy, WebPage};

/// Find a direct PDF address in an HTML document.
///
/// `page_url` is the address the document was loaded from; relative
/// candidates are resolved against it. Only an unparseable `page_url` is an
/// error.
///
/// # Example
///
/// ```no_run
/// use pdfknife::find_pdf_url;
///
/// let html = r#"<iframe src="/files/report.pdf"></iframe>"#;
/// let url = find_pdf_url(html, "https://example.com/view").unwrap();
/// assert_eq!(url.unwrap().as_str(), "https://example.com/files/report.pdf");
/// ```
pub fn find_pdf_url(html: &str, page_url: &str) -> Result<Option<url::Url>> {
    let page = WebPage::parse(html, page_url)?;
    Ok(find_candidate(&page).and_then(|candidate| candidate.resolve(page.url()).ok()))
}

/// Run the default discovery strategies over `page`.
pub fn find_candidate(page: &WebPage) -> Option<PdfCandidate> {
    PdfDiscovery::with_defaults().find(page)
}

/// Build a PDF from the blob images of `page`.
///
/// Returns `None` when no image produced a page.
///
/// # Example
///
/// ```no_run
/// use pdfknife::{assemble_page, AssembleOptions, BlobDirLoader, WebPage};
///
/// # async fn run() -> pdfknife::Result<()> {
/// let page = WebPage::parse(&std::fs::read_to_string("reader.html")?, "https://r.example/")?;
/// let loader = BlobDirLoader::new("./blobs");
/// if let Some(pdf) = assemble_page(&page, &loader, AssembleOptions::default()).await? {
///     std::fs::write("out.pdf", &pdf.bytes)?;
/// }
/// # Ok(())
/// # }
/// ```
pub async fn assemble_page(
    page: &WebPage,
    loader: &dyn ImageLoader,
    options: AssembleOptions,
) -> Result<Option<AssembledPdf>> {
    let assembler = load_renderer(&RendererSource::Bundled, options)?;
    assembler.build(page, loader, &NoProgress).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_pdf_url_resolves_relative() {
        let html = r#"<html><body><iframe src="/files/report.pdf"></iframe></body></html>"#;
        let url = find_pdf_url(html, "https://example.com/view/1").unwrap();
        assert_eq!(
            url.map(|u| u.to_string()),
            Some("https://example.com/files/report.pdf".to_string())
        );
    }

    #[test]
    fn test_find_pdf_url_none() {
        let html = "<html><body><p>Just text</p></body></html>";
        assert!(find_pdf_url(html, "https://example.com/").unwrap().is_none());
    }

    #[test]
    fn test_find_pdf_url_skips_malformed_href() {
        let html = r#"<a href="http://[bad/x.pdf">Download PDF</a>"#;
        assert!(find_pdf_url(html, "https://h.example/p").unwrap().is_none());

        let html = r#"<a href="http://[bad/x.pdf">Download PDF</a>
                      <div data-pdf-url="/real.pdf"></div>"#;
        let url = find_pdf_url(html, "https://h.example/p").unwrap().unwrap();
        assert_eq!(url.as_str(), "https://h.example/real.pdf");
    }

    #[test]
    fn test_find_pdf_url_bad_page_url() {
        assert!(matches!(
            find_pdf_url("<p></p>", "not a url"),
            Err(Error::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    async fn test_assemble_page_without_images() {
        let page = WebPage::parse("<img src=\"/logo.png\">", "https://example.com/").unwrap();
        let result = assemble_page(&page, &MemoryLoader::new(), AssembleOptions::default())
            .await
            .unwrap();
        assert!(result.is_none());
    }
}
