//! PDF assembly from collected page images.
//!
//! Each loaded image becomes one page: decoded, flattened onto white,
//! re-encoded as JPEG and drawn centered at fit-to-page scale. Images that
//! cannot be decoded are skipped with a warning; a document with no pages
//! is reported as `None` rather than written.

mod options;
mod raster;
mod writer;

pub use options::{AssembleOptions, DEFAULT_JPEG_QUALITY, DEFAULT_LOAD_TIMEOUT};
pub use raster::{rasterize, EncodedImage};
pub use writer::PdfWriter;

use crate::collect::{collect_images, scan_images, ImageLoader};
use crate::error::Result;
use crate::host::ProgressSink;
use crate::layout::PageLayout;
use crate::model::{CollectedImage, WebPage};

/// A finished PDF.
#[derive(Debug, Clone)]
pub struct AssembledPdf {
    /// Serialized document
    pub bytes: Vec<u8>,
    /// Pages written
    pub page_count: usize,
    /// Images that produced no page
    pub skipped: usize,
}

/// Turns page images into a paginated PDF.
#[derive(Debug, Clone, Default)]
pub struct DocumentAssembler {
    options: AssembleOptions,
}

impl DocumentAssembler {
    /// Create an assembler with the given options.
    pub fn new(options: AssembleOptions) -> Self {
        Self { options }
    }

    /// The active options.
    pub fn options(&self) -> &AssembleOptions {
        &self.options
    }

    /// Scan `page` for blob images, wait for them through `loader`, and
    /// assemble the result.
    pub async fn build(
        &self,
        page: &WebPage,
        loader: &dyn ImageLoader,
        progress: &dyn ProgressSink,
    ) -> Result<Option<AssembledPdf>> {
        let sources = scan_images(page);
        log::info!("found {} page images on {}", sources.len(), page.url());
        if sources.is_empty() {
            return Ok(None);
        }

        let images = collect_images(sources, loader, self.options.load_timeout).await;
        self.assemble(&images, progress)
    }

    /// Write one page per loaded image, in slice order.
    ///
    /// Progress is reported after every image, including skipped ones.
    pub fn assemble(
        &self,
        images: &[CollectedImage],
        progress: &dyn ProgressSink,
    ) -> Result<Option<AssembledPdf>> {
        let page = self.options.page_size;
        let mut writer = PdfWriter::new(page.width, page.height);
        let total = images.len();
        let mut skipped = 0;

        for (i, image) in images.iter().enumerate() {
            match self.render_page(image) {
                Some((encoded, layout)) => writer.append_image_page(&encoded, &layout)?,
                None => skipped += 1,
            }
            progress.progress(percent(i + 1, total));
        }

        if writer.page_count() == 0 {
            log::info!("no pages produced from {} images", total);
            return Ok(None);
        }

        let page_count = writer.page_count();
        let bytes = writer.finish(self.options.title.as_deref())?;
        log::info!(
            "assembled {} pages ({} skipped), {} bytes",
            page_count,
            skipped,
            bytes.len()
        );

        Ok(Some(AssembledPdf {
            bytes,
            page_count,
            skipped,
        }))
    }

    fn render_page(&self, image: &CollectedImage) -> Option<(EncodedImage, PageLayout)> {
        let index = image.source.index;
        let bytes = match image.bytes() {
            Some(bytes) => bytes,
            None => {
                log::warn!("image {} not loaded, skipping", index);
                return None;
            }
        };

        let encoded = match rasterize(bytes, self.options.jpeg_quality, self.options.max_dimension)
        {
            Ok(encoded) => encoded,
            Err(e) => {
                log::warn!("image {} could not be rasterized: {}", index, e);
                return None;
            }
        };

        let layout = PageLayout::fit(
            f64::from(encoded.width),
            f64::from(encoded.height),
            self.options.page_size,
        );
        match layout {
            Some(layout) => Some((encoded, layout)),
            None => {
                log::warn!("image {} has no usable layout, skipping", index);
                None
            }
        }
    }
}

/// `round(done / total * 100)`, halves rounded up.
fn percent(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    let pct = (done.min(total) * 200 + total) / (total * 2);
    pct as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ImageSource, ImageState};
    use image::{DynamicImage, ImageFormat, RgbImage};
    use std::io::Cursor;
    use std::sync::Mutex;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(RgbImage::new(width, height))
            .write_to(&mut out, ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    fn loaded(index: usize, bytes: Vec<u8>) -> CollectedImage {
        CollectedImage {
            source: ImageSource::new(index, format!("blob:https://r.example/{index}")),
            state: ImageState::Loaded(bytes),
        }
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(2, 3), 67);
        assert_eq!(percent(3, 3), 100);
        assert_eq!(percent(1, 8), 13);
        assert_eq!(percent(0, 0), 100);
    }

    #[test]
    fn test_bad_image_is_skipped() {
        let images = vec![
            loaded(0, png(20, 10)),
            loaded(1, b"not an image".to_vec()),
            CollectedImage {
                source: ImageSource::new(2, "blob:https://r.example/2"),
                state: ImageState::TimedOut,
            },
            loaded(3, png(10, 20)),
        ];

        let seen = Mutex::new(Vec::new());
        let sink = |p: u8| seen.lock().unwrap().push(p);
        let pdf = DocumentAssembler::default()
            .assemble(&images, &sink)
            .unwrap()
            .unwrap();

        assert_eq!(pdf.page_count, 2);
        assert_eq!(pdf.skipped, 2);
        assert_eq!(*seen.lock().unwrap(), vec![25, 50, 75, 100]);
        assert!(pdf.bytes.starts_with(b"%PDF-"));
    }

    #[test]
    fn test_no_pages_is_none() {
        let images = vec![loaded(0, Vec::new())];
        let result = DocumentAssembler::default()
            .assemble(&images, &crate::host::NoProgress)
            .unwrap();
        assert!(result.is_none());

        let result = DocumentAssembler::default()
            .assemble(&[], &crate::host::NoProgress)
            .unwrap();
        assert!(result.is_none());
    }
}
