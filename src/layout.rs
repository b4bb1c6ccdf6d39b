//! Fit-to-page layout for raster images.
//!
//! All page-space values are PDF points (1/72 inch).

use serde::{Deserialize, Serialize};

/// Target page dimensions in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    /// Page width
    pub width: f64,
    /// Page height
    pub height: f64,
}

impl PageSize {
    /// ISO A4 portrait.
    pub const A4: PageSize = PageSize {
        width: 595.28,
        height: 841.89,
    };

    /// US Letter portrait.
    pub const LETTER: PageSize = PageSize {
        width: 612.0,
        height: 792.0,
    };

    /// Create a page size.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Look up a named size (`a4`, `letter`), case-insensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "a4" => Some(Self::A4),
            "letter" => Some(Self::LETTER),
            _ => None,
        }
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::A4
    }
}

/// Placement of one image on a page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageLayout {
    /// Uniform scale from image pixels to points
    pub scale: f64,
    /// Left edge of the image
    pub offset_x: f64,
    /// Distance from the page edge on the vertical axis
    pub offset_y: f64,
    /// Drawn width
    pub render_width: f64,
    /// Drawn height
    pub render_height: f64,
}

impl PageLayout {
    /// Scale an image uniformly to fit `page` and center it.
    ///
    /// The scale is the smaller of the two axis ratios, so the image is never
    /// clipped; images smaller than the page are scaled up. Returns `None` if
    /// any dimension is zero, negative or not finite.
    pub fn fit(image_width: f64, image_height: f64, page: PageSize) -> Option<PageLayout> {
        let dims = [image_width, image_height, page.width, page.height];
        if dims.iter().any(|d| !d.is_finite() || *d <= 0.0) {
            return None;
        }

        let scale = (page.width / image_width).min(page.height / image_height);
        let render_width = (image_width * scale).min(page.width);
        let render_height = (image_height * scale).min(page.height);

        Some(PageLayout {
            scale,
            offset_x: (page.width - render_width) / 2.0,
            offset_y: (page.height - render_height) / 2.0,
            render_width,
            render_height,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn assert_fits(w: f64, h: f64, page: PageSize) {
        let layout = PageLayout::fit(w, h, page).unwrap();
        assert!(layout.render_width <= page.width + EPS);
        assert!(layout.render_height <= page.height + EPS);
        let ratio_in = w / h;
        let ratio_out = layout.render_width / layout.render_height;
        assert!(
            (ratio_in - ratio_out).abs() <= 1e-9 * ratio_in.max(1.0),
            "aspect drift for {w}x{h}: {ratio_in} vs {ratio_out}"
        );
        // One axis is filled exactly.
        assert!(
            (layout.render_width - page.width).abs() < 1e-6
                || (layout.render_height - page.height).abs() < 1e-6
        );
    }

    #[test]
    fn test_fit_portrait_scan() {
        let layout = PageLayout::fit(1240.0, 1754.0, PageSize::A4).unwrap();
        assert!((layout.render_width - 595.28).abs() < 1e-6);
        assert!(layout.offset_x.abs() < 1e-6);
        assert!(layout.offset_y > 0.0);
        assert!((layout.offset_y * 2.0 + layout.render_height - 841.89).abs() < 1e-6);
    }

    #[test]
    fn test_fit_landscape_centers_vertically() {
        let layout = PageLayout::fit(2000.0, 1000.0, PageSize::A4).unwrap();
        assert!((layout.render_width - 595.28).abs() < 1e-6);
        assert!((layout.render_height - 297.64).abs() < 1e-6);
        assert!((layout.offset_y - (841.89 - 297.64) / 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_fit_upscales_small_images() {
        let layout = PageLayout::fit(10.0, 10.0, PageSize::A4).unwrap();
        assert!(layout.scale > 1.0);
        assert!((layout.render_width - 595.28).abs() < 1e-6);
    }

    #[test]
    fn test_fit_property_grid() {
        let sizes = [1.0, 3.0, 17.0, 480.0, 595.28, 1000.0, 4096.0, 65535.0];
        for page in [PageSize::A4, PageSize::LETTER, PageSize::new(100.0, 50.0)] {
            for w in sizes {
                for h in sizes {
                    assert_fits(w, h, page);
                }
            }
        }
    }

    #[test]
    fn test_fit_is_deterministic() {
        let a = PageLayout::fit(1234.0, 987.0, PageSize::A4);
        let b = PageLayout::fit(1234.0, 987.0, PageSize::A4);
        assert_eq!(a, b);
    }

    #[test]
    fn test_fit_rejects_degenerate() {
        assert!(PageLayout::fit(0.0, 10.0, PageSize::A4).is_none());
        assert!(PageLayout::fit(10.0, -1.0, PageSize::A4).is_none());
        assert!(PageLayout::fit(10.0, f64::NAN, PageSize::A4).is_none());
        assert!(PageLayout::fit(10.0, 10.0, PageSize::new(0.0, 10.0)).is_none());
    }

    #[test]
    fn test_page_size_names() {
        assert_eq!(PageSize::from_name("A4"), Some(PageSize::A4));
        assert_eq!(PageSize::from_name("letter"), Some(PageSize::LETTER));
        assert_eq!(PageSize::from_name("tabloid"), None);
    }
}
