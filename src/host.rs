//! Collaborators the pipeline talks to.
//!
//! Settings storage, downloads, notifications and progress reporting live
//! outside the core. They are traits here so the controller can be driven
//! by a CLI, a test harness, or anything else that can store a file.

use crate::config::{ConflictAction, Settings, StoredState};
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use url::Url;

/// Read-only access to user settings.
#[async_trait]
pub trait SettingsSource: Send + Sync {
    /// Current settings.
    async fn settings(&self) -> Result<Settings>;

    /// Whether automatic runs are enabled.
    async fn enabled(&self) -> Result<bool> {
        Ok(true)
    }
}

/// Fixed, in-memory settings.
#[derive(Debug, Clone)]
pub struct StaticSettings {
    settings: Settings,
    enabled: bool,
}

impl StaticSettings {
    /// Wrap settings; automatic runs enabled.
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            enabled: true,
        }
    }

    /// Set the global switch.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

impl Default for StaticSettings {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

#[async_trait]
impl SettingsSource for StaticSettings {
    async fn settings(&self) -> Result<Settings> {
        Ok(self.settings.clone())
    }

    async fn enabled(&self) -> Result<bool> {
        Ok(self.enabled)
    }
}

/// Settings read from a JSON file on every call.
///
/// A missing file means defaults and enabled.
#[derive(Debug, Clone)]
pub struct FileSettings {
    path: PathBuf,
}

impl FileSettings {
    /// Read settings from `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn state(&self) -> Result<StoredState> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(json) => StoredState::from_json(&json)
                .map_err(|e| Error::Config(format!("{}: {}", self.path.display(), e))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("{} not found, using default settings", self.path.display());
                Ok(StoredState::default())
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl SettingsSource for FileSettings {
    async fn settings(&self) -> Result<Settings> {
        Ok(self.state().await?.settings_or_default())
    }

    async fn enabled(&self) -> Result<bool> {
        Ok(self.state().await?.is_enabled())
    }
}

/// Download invoker.
#[async_trait]
pub trait Downloader: Send + Sync {
    /// Fetch a remote PDF and store it under `suggested_name`.
    ///
    /// Returns a handle (usually the stored path) for reporting.
    async fn download(&self, url: &Url, suggested_name: &str) -> Result<String>;

    /// Store locally produced bytes under `suggested_name`.
    async fn save(&self, bytes: &[u8], suggested_name: &str) -> Result<String>;
}

/// Saves files into a directory.
///
/// It has no network access: [`Downloader::download`] always fails. Wrap it
/// in an HTTP-capable downloader to fetch remote files.
#[derive(Debug, Clone)]
pub struct FsDownloader {
    dir: PathBuf,
    conflict: ConflictAction,
}

impl FsDownloader {
    /// Save into `dir` with the default conflict policy.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            conflict: ConflictAction::default(),
        }
    }

    /// Save into `root/<download_path>` using the settings' conflict policy.
    pub fn from_settings(root: impl AsRef<Path>, settings: &Settings) -> Self {
        let sub = settings.download_path.trim();
        let dir = if sub.is_empty() {
            root.as_ref().to_path_buf()
        } else {
            root.as_ref().join(sub)
        };
        Self {
            dir,
            conflict: settings.conflict_action,
        }
    }

    /// Set the conflict policy.
    pub fn with_conflict_action(mut self, conflict: ConflictAction) -> Self {
        self.conflict = conflict;
        self
    }

    /// Target directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Pick the path to write `name` to, honoring the conflict policy.
    pub async fn target_path(&self, name: &str) -> Result<PathBuf> {
        let name = Path::new(name)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| crate::filename::DEFAULT_FILENAME.to_string());
        let path = self.dir.join(&name);

        if !exists(&path).await? {
            return Ok(path);
        }
        match self.conflict {
            ConflictAction::Overwrite => Ok(path),
            ConflictAction::Prompt => Err(Error::Download(format!(
                "{} already exists",
                path.display()
            ))),
            ConflictAction::Uniquify => {
                let (stem, ext) = split_extension(&name);
                let mut n = 1u32;
                loop {
                    let candidate = self.dir.join(format!("{} ({}){}", stem, n, ext));
                    if !exists(&candidate).await? {
                        return Ok(candidate);
                    }
                    n += 1;
                }
            }
        }
    }

    /// Write `bytes` under `name` and return the path used.
    pub async fn write(&self, bytes: &[u8], name: &str) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.target_path(name).await?;
        tokio::fs::write(&path, bytes).await?;
        log::info!("saved {} bytes to {}", bytes.len(), path.display());
        Ok(path)
    }
}

#[async_trait]
impl Downloader for FsDownloader {
    async fn download(&self, url: &Url, _suggested_name: &str) -> Result<String> {
        Err(Error::Download(format!(
            "{} cannot fetch remote address {}",
            self.dir.display(),
            url
        )))
    }

    async fn save(&self, bytes: &[u8], suggested_name: &str) -> Result<String> {
        let path = self.write(bytes, suggested_name).await?;
        Ok(path.display().to_string())
    }
}

async fn exists(path: &Path) -> Result<bool> {
    Ok(tokio::fs::try_exists(path).await?)
}

fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(i) if i > 0 => (&name[..i], &name[i..]),
        _ => (name, ""),
    }
}

/// Fire-and-forget user notifications.
pub trait Notifier: Send + Sync {
    /// Report a completed action.
    fn notify(&self, message: &str);

    /// Report a failed run.
    fn error(&self, message: &str) {
        log::error!("{}", message);
    }
}

/// Notifier that writes to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str) {
        log::info!("{}", message);
    }
}

/// Incremental progress channel, 0 to 100.
pub trait ProgressSink: Send + Sync {
    /// Report percent complete.
    fn progress(&self, percent: u8);
}

impl<F> ProgressSink for F
where
    F: Fn(u8) + Send + Sync,
{
    fn progress(&self, percent: u8) {
        self(percent)
    }
}

/// Progress sink that discards updates.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn progress(&self, _percent: u8) {}
}
