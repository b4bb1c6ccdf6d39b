//! Data model shared by discovery, collection and assembly.
//!
//! A [`WebPage`] is the snapshot of a rendered document the pipeline works
//! on. Discovery turns it into a [`PdfCandidate`]; the image collector turns
//! it into an ordered list of [`ImageSource`] entries.

mod candidate;
mod image;
mod page;

pub use candidate::{PdfCandidate, Strategy};
pub use image::{CollectedImage, ImageSource, ImageState};
pub use page::WebPage;
