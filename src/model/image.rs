//! Page image types.

use serde::Serialize;

/// A qualifying `<img>` element, captured once at scan time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageSource {
    /// Position among the qualifying images, in document order
    pub index: usize,

    /// The `src` attribute (a `blob:` address)
    pub src: String,

    /// `width` attribute, if numeric
    pub declared_width: Option<u32>,

    /// `height` attribute, if numeric
    pub declared_height: Option<u32>,
}

impl ImageSource {
    /// Create a source with no declared dimensions.
    pub fn new(index: usize, src: impl Into<String>) -> Self {
        Self {
            index,
            src: src.into(),
            declared_width: None,
            declared_height: None,
        }
    }

    /// Set declared dimensions.
    pub fn with_declared_size(mut self, width: Option<u32>, height: Option<u32>) -> Self {
        self.declared_width = width;
        self.declared_height = height;
        self
    }

    /// The trailing identifier of a `blob:<origin>/<id>` address.
    pub fn blob_id(&self) -> Option<&str> {
        let rest = self.src.strip_prefix("blob:")?;
        let id = rest.rsplit('/').next()?;
        if id.is_empty() {
            None
        } else {
            Some(id)
        }
    }
}

/// Outcome of waiting for one image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageState {
    /// Image bytes are available
    Loaded(Vec<u8>),
    /// The wait exceeded the per-image deadline
    TimedOut,
    /// The loader reported an error
    Failed(String),
}

/// An image source paired with its load outcome.
#[derive(Debug, Clone)]
pub struct CollectedImage {
    /// The source element
    pub source: ImageSource,

    /// Load outcome
    pub state: ImageState,
}

impl CollectedImage {
    /// Bytes, if the image loaded.
    pub fn bytes(&self) -> Option<&[u8]> {
        match &self.state {
            ImageState::Loaded(data) => Some(data),
            _ => None,
        }
    }

    /// Check whether the image loaded.
    pub fn is_loaded(&self) -> bool {
        matches!(self.state, ImageState::Loaded(_))
    }
}
