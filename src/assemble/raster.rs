//! Rasterize page images into JPEG streams.

use crate::error::{Error, Result};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, Rgb, RgbImage};

/// A page image re-encoded as baseline JPEG.
#[derive(Debug, Clone)]
pub struct EncodedImage {
    /// JPEG bytes
    pub jpeg: Vec<u8>,
    /// Pixel width
    pub width: u32,
    /// Pixel height
    pub height: u32,
}

/// Decode `bytes` at natural size and re-encode as JPEG.
///
/// Transparent pixels are composited over white. With `max_dimension` set,
/// larger images are downscaled with Lanczos3, keeping the aspect ratio.
/// Fails when the data does not decode or has an empty dimension.
pub fn rasterize(bytes: &[u8], quality: u8, max_dimension: Option<u32>) -> Result<EncodedImage> {
    let mut img = image::load_from_memory(bytes)?;
    if img.width() == 0 || img.height() == 0 {
        return Err(Error::Image(format!(
            "empty surface ({}x{})",
            img.width(),
            img.height()
        )));
    }

    if let Some(max) = max_dimension {
        if img.width() > max || img.height() > max {
            log::debug!(
                "downscaling {}x{} to fit {}px",
                img.width(),
                img.height(),
                max
            );
            img = img.resize(max, max, FilterType::Lanczos3);
        }
    }

    let surface = flatten(&img);
    let (width, height) = surface.dimensions();

    let mut jpeg = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut jpeg, quality);
    encoder.encode_image(&surface)?;

    Ok(EncodedImage {
        jpeg,
        width,
        height,
    })
}

/// Opaque RGB copy of `img`, with alpha blended onto white.
fn flatten(img: &DynamicImage) -> RgbImage {
    if !img.color().has_alpha() {
        return img.to_rgb8();
    }

    let rgba = img.to_rgba8();
    let mut out = RgbImage::new(rgba.width(), rgba.height());
    for (x, y, pixel) in rgba.enumerate_pixels() {
        let [r, g, b, a] = pixel.0;
        let a = u32::from(a);
        let blend = |c: u8| ((u32::from(c) * a + 255 * (255 - a) + 127) / 255) as u8;
        out.put_pixel(x, y, Rgb([blend(r), blend(g), blend(b)]));
    }
    out
}
