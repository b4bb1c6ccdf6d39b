//! Assembly options and configuration.

use crate::layout::PageSize;
use std::time::Duration;

/// JPEG quality used for page images unless configured otherwise.
pub const DEFAULT_JPEG_QUALITY: u8 = 92;

/// Per-image load deadline unless configured otherwise.
pub const DEFAULT_LOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Options for assembling a PDF from page images.
#[derive(Debug, Clone)]
pub struct AssembleOptions {
    /// Target page size
    pub page_size: PageSize,

    /// JPEG quality factor, 1-100
    pub jpeg_quality: u8,

    /// Longest wait for a single image
    pub load_timeout: Duration,

    /// Downscale images whose larger side exceeds this many pixels
    pub max_dimension: Option<u32>,

    /// Title written to the document info dictionary
    pub title: Option<String>,
}

impl AssembleOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page size.
    pub fn with_page_size(mut self, page_size: PageSize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set JPEG quality, clamped to 1-100.
    pub fn with_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality.clamp(1, 100);
        self
    }

    /// Set the per-image load deadline.
    pub fn with_load_timeout(mut self, timeout: Duration) -> Self {
        self.load_timeout = timeout;
        self
    }

    /// Cap the pixel size of embedded images.
    pub fn with_max_dimension(mut self, max: u32) -> Self {
        self.max_dimension = Some(max.max(1));
        self
    }

    /// Set the document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

impl Default for AssembleOptions {
    fn default() -> Self {
        Self {
            page_size: PageSize::A4,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            load_timeout: DEFAULT_LOAD_TIMEOUT,
            max_dimension: None,
            title: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assemble_options_builder() {
        let options = AssembleOptions::new()
            .with_page_size(PageSize::LETTER)
            .with_quality(75)
            .with_load_timeout(Duration::from_secs(5))
            .with_max_dimension(4000)
            .with_title("Scans");

        assert_eq!(options.page_size, PageSize::LETTER);
        assert_eq!(options.jpeg_quality, 75);
        assert_eq!(options.load_timeout, Duration::from_secs(5));
        assert_eq!(options.max_dimension, Some(4000));
        assert_eq!(options.title.as_deref(), Some("Scans"));
    }

    #[test]
    fn test_default_options() {
        let options = AssembleOptions::default();
        assert_eq!(options.page_size, PageSize::A4);
        assert_eq!(options.jpeg_quality, 92);
        assert_eq!(options.load_timeout, Duration::from_secs(30));
        assert!(options.max_dimension.is_none());
    }

    #[test]
    fn test_quality_clamped() {
        assert_eq!(AssembleOptions::new().with_quality(0).jpeg_quality, 1);
        assert_eq!(AssembleOptions::new().with_quality(200).jpeg_quality, 100);
    }
}
