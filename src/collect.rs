//! Page image collection.
//!
//! Image-based readers stream page scans into memory and show them through
//! `blob:` addresses; plain remote `<img>` tags are decoration. The collector
//! takes the blob-backed images in document order and waits for each one's
//! bytes through an [`ImageLoader`].

use crate::discover::select;
use crate::error::{Error, Result};
use crate::model::{CollectedImage, ImageSource, ImageState, WebPage};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

/// Address prefix of client-side image data.
pub const BLOB_SCHEME: &str = "blob:";

/// Delivers the bytes behind an image element once it has loaded.
#[async_trait]
pub trait ImageLoader: Send + Sync {
    /// Resolve when the image is available.
    async fn load(&self, source: &ImageSource) -> Result<Vec<u8>>;
}

/// Find blob-backed `<img>` elements, in document order.
pub fn scan_images(page: &WebPage) -> Vec<ImageSource> {
    select(page, "img[src]")
        .into_iter()
        .filter_map(|img| {
            let src = img.value().attr("src")?.trim();
            if !src.starts_with(BLOB_SCHEME) {
                return None;
            }
            let width = img.value().attr("width").and_then(|v| v.trim().parse().ok());
            let height = img.value().attr("height").and_then(|v| v.trim().parse().ok());
            Some((src.to_string(), width, height))
        })
        .enumerate()
        .map(|(index, (src, width, height))| {
            ImageSource::new(index, src).with_declared_size(width, height)
        })
        .collect()
}

/// Wait for every source, one after another.
///
/// Each wait is bounded by `timeout`; an image that misses it is marked
/// [`ImageState::TimedOut`] and the walk moves on. The result has the same
/// length and order as `sources` no matter when individual loads finish.
pub async fn collect_images(
    sources: Vec<ImageSource>,
    loader: &dyn ImageLoader,
    timeout: Duration,
) -> Vec<CollectedImage> {
    let mut collected = Vec::with_capacity(sources.len());

    for source in sources {
        let state = match tokio::time::timeout(timeout, loader.load(&source)).await {
            Ok(Ok(bytes)) => ImageState::Loaded(bytes),
            Ok(Err(e)) => {
                log::warn!("image {} ({}) failed to load: {}", source.index, source.src, e);
                ImageState::Failed(e.to_string())
            }
            Err(_) => {
                log::warn!(
                    "image {} ({}) did not load within {:?}, skipping",
                    source.index,
                    source.src,
                    timeout
                );
                ImageState::TimedOut
            }
        };
        collected.push(CollectedImage { source, state });
    }

    collected
}

/// Loader backed by an in-memory map from `src` to bytes.
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    images: HashMap<String, Vec<u8>>,
}

impl MemoryLoader {
    /// Create an empty loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register bytes for an address.
    pub fn insert(&mut self, src: impl Into<String>, bytes: Vec<u8>) {
        self.images.insert(src.into(), bytes);
    }

    /// Register bytes for an address, builder style.
    pub fn with_image(mut self, src: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.insert(src, bytes);
        self
    }

    /// Number of registered images.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Check if no image is registered.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

#[async_trait]
impl ImageLoader for MemoryLoader {
    async fn load(&self, source: &ImageSource) -> Result<Vec<u8>> {
        self.images
            .get(&source.src)
            .cloned()
            .ok_or_else(|| Error::Other(format!("no image data for {}", source.src)))
    }
}

/// Loader that reads blob contents dumped to a directory.
///
/// `blob:https://host/3f9c-…` is served from `<dir>/3f9c-…`, or from the
/// first file whose stem is `3f9c-…` (for dumps that kept an extension).
#[derive(Debug, Clone)]
pub struct BlobDirLoader {
    dir: PathBuf,
}

impl BlobDirLoader {
    /// Serve blobs from `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    async fn locate(&self, id: &str) -> Result<PathBuf> {
        let exact = self.dir.join(id);
        if tokio::fs::try_exists(&exact).await? {
            return Ok(exact);
        }

        let mut entries = tokio::fs::read_dir(&self.dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.file_stem().and_then(|s| s.to_str()) == Some(id) {
                return Ok(path);
            }
        }
        Err(Error::Other(format!(
            "blob {} not found in {}",
            id,
            self.dir.display()
        )))
    }
}

#[async_trait]
impl ImageLoader for BlobDirLoader {
    async fn load(&self, source: &ImageSource) -> Result<Vec<u8>> {
        let id = source
            .blob_id()
            .filter(|id| !id.starts_with('.') && !id.contains('\\'))
            .ok_or_else(|| Error::Other(format!("not a blob address: {}", source.src)))?;
        let path = self.locate(id).await?;
        Ok(tokio::fs::read(&path).await?)
    }
}
