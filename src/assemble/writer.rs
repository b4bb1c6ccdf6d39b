//! Append-only PDF document writer backed by lopdf.

use super::raster::EncodedImage;
use crate::error::Result;
use crate::layout::PageLayout;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream, StringFormat};

const PRODUCER: &str = concat!("pdfknife ", env!("CARGO_PKG_VERSION"));

/// Builds a PDF one full-page image at a time.
///
/// Pages are kept in the order they are appended.
pub struct PdfWriter {
    doc: Document,
    pages_id: ObjectId,
    page_ids: Vec<ObjectId>,
    media_box: [f64; 2],
}

impl PdfWriter {
    /// Start an empty document whose pages measure `width` by `height` points.
    pub fn new(width: f64, height: f64) -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        Self {
            doc,
            pages_id,
            page_ids: Vec::new(),
            media_box: [width, height],
        }
    }

    /// Number of pages appended so far.
    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Append a page drawing `image` at `layout`.
    pub fn append_image_page(&mut self, image: &EncodedImage, layout: &PageLayout) -> Result<()> {
        let xobject = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => image.width as i64,
                "Height" => image.height as i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
                "Filter" => "DCTDecode",
            },
            image.jpeg.clone(),
        )
        .with_compression(false);
        let image_id = self.doc.add_object(xobject);

        // PDF origin is bottom-left; a centered layout is symmetric vertically.
        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        real(layout.render_width),
                        0.into(),
                        0.into(),
                        real(layout.render_height),
                        real(layout.offset_x),
                        real(layout.offset_y),
                    ],
                ),
                Operation::new("Do", vec![Object::Name(b"Im0".to_vec())]),
                Operation::new("Q", vec![]),
            ],
        };
        let content_id = self
            .doc
            .add_object(Stream::new(dictionary! {}, content.encode()?));

        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![
                0.into(),
                0.into(),
                real(self.media_box[0]),
                real(self.media_box[1]),
            ],
            "Contents" => content_id,
            "Resources" => dictionary! {
                "XObject" => dictionary! {
                    "Im0" => image_id,
                },
            },
        });
        self.page_ids.push(page_id);
        Ok(())
    }

    /// Close the page tree and serialize the document.
    pub fn finish(mut self, title: Option<&str>) -> Result<Vec<u8>> {
        let kids: Vec<Object> = self.page_ids.iter().map(|id| (*id).into()).collect();
        let count = kids.len() as i64;
        self.doc.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );

        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.doc.trailer.set("Root", catalog_id);

        let mut info = dictionary! {
            "Producer" => Object::string_literal(PRODUCER),
            "CreationDate" => Object::string_literal(pdf_date(chrono::Utc::now())),
        };
        if let Some(title) = title.map(str::trim).filter(|t| !t.is_empty()) {
            info.set("Title", text_string(title));
        }
        let info_id = self.doc.add_object(info);
        self.doc.trailer.set("Info", info_id);

        self.doc.compress();
        let mut out = Vec::new();
        self.doc.save_to(&mut out)?;
        log::debug!("wrote {} pages, {} bytes", count, out.len());
        Ok(out)
    }
}

fn real(value: f64) -> Object {
    Object::Real(value as f32)
}

fn pdf_date(at: chrono::DateTime<chrono::Utc>) -> String {
    at.format("D:%Y%m%d%H%M%SZ").to_string()
}

/// PDF text string: literal for ASCII, UTF-16BE with BOM otherwise.
fn text_string(text: &str) -> Object {
    if text.is_ascii() {
        return Object::string_literal(text);
    }
    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}
