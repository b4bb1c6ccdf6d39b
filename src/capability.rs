//! Rendering capability loader.
//!
//! The PDF backend is linked into the binary, but callers still name where
//! the renderer comes from and that name is checked against a one-entry
//! allow-list before anything is built.

use crate::assemble::{AssembleOptions, DocumentAssembler};
use crate::error::{Error, Result};

/// The only origin a renderer may be loaded from.
pub const ALLOWED_RENDERER_ORIGIN: &str = "builtin:lopdf";

/// Where the renderer is requested from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RendererSource {
    /// The statically linked backend
    #[default]
    Bundled,
    /// An explicitly named origin
    Origin(String),
}

impl RendererSource {
    /// The origin string this source resolves to.
    pub fn origin(&self) -> &str {
        match self {
            RendererSource::Bundled => ALLOWED_RENDERER_ORIGIN,
            RendererSource::Origin(origin) => origin,
        }
    }
}

/// Check `source` against the allow-list and build an assembler.
///
/// Any origin other than [`ALLOWED_RENDERER_ORIGIN`] is refused with
/// [`Error::UnauthorizedOrigin`]. Options that cannot produce a page
/// (non-positive page size, zero quality) yield [`Error::CapabilityLoad`].
pub fn load_renderer(
    source: &RendererSource,
    options: AssembleOptions,
) -> Result<DocumentAssembler> {
    let origin = source.origin();
    if origin != ALLOWED_RENDERER_ORIGIN {
        log::error!("refusing renderer from {}", origin);
        return Err(Error::UnauthorizedOrigin(origin.to_string()));
    }

    let page = options.page_size;
    if !(page.width.is_finite() && page.height.is_finite() && page.width > 0.0 && page.height > 0.0)
    {
        return Err(Error::CapabilityLoad(format!(
            "invalid page size {}x{}",
            page.width, page.height
        )));
    }
    if !(1..=100).contains(&options.jpeg_quality) {
        return Err(Error::CapabilityLoad(format!(
            "JPEG quality {} out of range",
            options.jpeg_quality
        )));
    }

    log::debug!("renderer loaded from {}", origin);
    Ok(DocumentAssembler::new(options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::PageSize;

    #[test]
    fn test_bundled_is_allowed() {
        let assembler =
            load_renderer(&RendererSource::Bundled, AssembleOptions::default()).unwrap();
        assert_eq!(assembler.options().page_size, PageSize::A4);
    }

    #[test]
    fn test_exact_origin_is_allowed() {
        let source = RendererSource::Origin(ALLOWED_RENDERER_ORIGIN.to_string());
        assert!(load_renderer(&source, AssembleOptions::default()).is_ok());
    }

    #[test]
    fn test_foreign_origin_refused() {
        for origin in [
            "https://cdn.example.com/jspdf.min.js",
            "builtin:lopdf ",
            "BUILTIN:LOPDF",
            "",
        ] {
            let source = RendererSource::Origin(origin.to_string());
            let err = load_renderer(&source, AssembleOptions::default()).unwrap_err();
            assert!(matches!(err, Error::UnauthorizedOrigin(ref o) if o == origin));
        }
    }

    #[test]
    fn test_invalid_options_fail_to_load() {
        let options = AssembleOptions::default().with_page_size(PageSize::new(0.0, 100.0));
        let err = load_renderer(&RendererSource::Bundled, options).unwrap_err();
        assert!(matches!(err, Error::CapabilityLoad(_)));

        let mut options = AssembleOptions::default();
        options.jpeg_quality = 0;
        let err = load_renderer(&RendererSource::Bundled, options).unwrap_err();
        assert!(matches!(err, Error::CapabilityLoad(_)));
    }
}
