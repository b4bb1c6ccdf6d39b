//! Trigger controller.
//!
//! Decides, per page, whether to run at all, then either hands a discovered
//! PDF address to the downloader or assembles a PDF from the page images.
//! The controller owns the processing state; nothing else writes it.

use crate::assemble::AssembleOptions;
use crate::capability::{load_renderer, RendererSource};
use crate::collect::ImageLoader;
use crate::config::Settings;
use crate::discover::PdfDiscovery;
use crate::error::Result;
use crate::exclusion::is_excluded;
use crate::filename::{filename_from_url, sanitize_title};
use crate::host::{Downloader, LogNotifier, NoProgress, Notifier, ProgressSink, SettingsSource};
use crate::model::WebPage;
use serde::Serialize;
use std::sync::Arc;
use url::Url;

/// Where the controller is in its run cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingState {
    /// No run yet
    Idle,
    /// A run is in progress
    Processing,
    /// The last run finished, successfully or not
    Done,
}

/// What started a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// The page finished loading
    PageLoad,
    /// The user asked for a run; bypasses every guard
    Manual,
}

/// Why an automatic run did not start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// A run already started on this page
    AlreadyProcessed,
    /// Automatic runs are switched off
    Disabled,
    /// The host is on the exclusion list
    Excluded,
}

/// Result of a trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum RunOutcome {
    /// Nothing ran
    Skipped(SkipReason),
    /// A PDF link was found and handed to the downloader
    DirectDownload {
        url: String,
        file_name: String,
        handle: String,
    },
    /// A PDF was built from the page images and saved
    Assembled {
        file_name: String,
        handle: String,
        pages: usize,
        skipped: usize,
    },
    /// No link and no usable page images
    NothingProduced,
}

/// Runs discovery or assembly for a page, at most once per automatic trigger.
pub struct TriggerController {
    settings: Arc<dyn SettingsSource>,
    downloader: Arc<dyn Downloader>,
    loader: Arc<dyn ImageLoader>,
    notifier: Arc<dyn Notifier>,
    progress: Arc<dyn ProgressSink>,
    discovery: PdfDiscovery,
    renderer: RendererSource,
    options: AssembleOptions,
    state: ProcessingState,
}

impl TriggerController {
    /// Create a controller in the idle state with default discovery,
    /// the bundled renderer and log notifications.
    pub fn new(
        settings: Arc<dyn SettingsSource>,
        downloader: Arc<dyn Downloader>,
        loader: Arc<dyn ImageLoader>,
    ) -> Self {
        Self {
            settings,
            downloader,
            loader,
            notifier: Arc::new(LogNotifier),
            progress: Arc::new(NoProgress),
            discovery: PdfDiscovery::with_defaults(),
            renderer: RendererSource::default(),
            options: AssembleOptions::default(),
            state: ProcessingState::Idle,
        }
    }

    /// Set the notifier.
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Set the progress sink.
    pub fn with_progress(mut self, progress: Arc<dyn ProgressSink>) -> Self {
        self.progress = progress;
        self
    }

    /// Set where the renderer is loaded from.
    pub fn with_renderer(mut self, renderer: RendererSource) -> Self {
        self.renderer = renderer;
        self
    }

    /// Set assembly options.
    pub fn with_options(mut self, options: AssembleOptions) -> Self {
        self.options = options;
        self
    }

    /// Replace the discovery engine.
    pub fn with_discovery(mut self, discovery: PdfDiscovery) -> Self {
        self.discovery = discovery;
        self
    }

    /// Current processing state.
    pub fn state(&self) -> ProcessingState {
        self.state
    }

    /// Handle a trigger for `page`.
    ///
    /// Errors leave the controller in [`ProcessingState::Done`] and are also
    /// reported through the notifier.
    pub async fn trigger(&mut self, trigger: Trigger, page: &WebPage) -> Result<RunOutcome> {
        if trigger == Trigger::Manual {
            self.state = ProcessingState::Idle;
        } else if self.state != ProcessingState::Idle {
            log::debug!("already processed {}, ignoring {:?}", page.url(), trigger);
            return Ok(RunOutcome::Skipped(SkipReason::AlreadyProcessed));
        }

        let result = self.run(trigger, page).await;
        match &result {
            Ok(RunOutcome::Skipped(reason)) => {
                log::info!("skipping {}: {:?}", page.url(), reason);
            }
            Ok(outcome) => {
                self.state = ProcessingState::Done;
                log::info!("run finished for {}: {}", page.url(), outcome_name(outcome));
            }
            Err(e) => {
                self.state = ProcessingState::Done;
                self.notifier.error(&format!("PDF Knife failed: {}", e));
            }
        }
        result
    }

    async fn run(&mut self, trigger: Trigger, page: &WebPage) -> Result<RunOutcome> {
        if trigger == Trigger::PageLoad {
            if !self.settings.enabled().await? {
                return Ok(RunOutcome::Skipped(SkipReason::Disabled));
            }
            let settings = self.settings.settings().await?;
            if is_excluded(page.hostname(), &settings.exclusion_domains) {
                return Ok(RunOutcome::Skipped(SkipReason::Excluded));
            }
        }

        self.state = ProcessingState::Processing;
        let settings = self.settings.settings().await?;

        let direct = self
            .discovery
            .find(page)
            .and_then(|candidate| match candidate.resolve(page.url()) {
                Ok(url) => Some((candidate, url)),
                Err(e) => {
                    log::warn!("ignoring unresolvable candidate {}: {}", candidate.url, e);
                    None
                }
            });
        if let Some((candidate, url)) = direct {
            log::info!("found PDF via {}: {}", candidate.strategy, url);
            let (file_name, handle) = download_direct(
                &url,
                &settings,
                self.downloader.as_ref(),
                self.notifier.as_ref(),
            )
            .await?;
            return Ok(RunOutcome::DirectDownload {
                url: url.to_string(),
                file_name,
                handle,
            });
        }

        log::debug!("no PDF link on {}, assembling from images", page.url());
        let mut options = self.options.clone();
        if options.title.is_none() {
            options.title = page.title().map(str::to_string);
        }
        let assembler = load_renderer(&self.renderer, options)?;

        let pdf = assembler
            .build(page, self.loader.as_ref(), self.progress.as_ref())
            .await?;
        let pdf = match pdf {
            Some(pdf) => pdf,
            None => return Ok(RunOutcome::NothingProduced),
        };

        let file_name = sanitize_title(page.title(), settings.auto_rename);
        let handle = self.downloader.save(&pdf.bytes, &file_name).await?;
        if settings.show_notifications {
            self.notifier.notify(&format!("PDF downloaded: {}", file_name));
        }

        Ok(RunOutcome::Assembled {
            file_name,
            handle,
            pages: pdf.page_count,
            skipped: pdf.skipped,
        })
    }
}

fn outcome_name(outcome: &RunOutcome) -> &'static str {
    match outcome {
        RunOutcome::Skipped(_) => "skipped",
        RunOutcome::DirectDownload { .. } => "direct download",
        RunOutcome::Assembled { .. } => "assembled",
        RunOutcome::NothingProduced => "nothing produced",
    }
}

/// Download `url` under the name of its last path segment.
///
/// Returns the file name used and the downloader's handle.
pub async fn download_direct(
    url: &Url,
    settings: &Settings,
    downloader: &dyn Downloader,
    notifier: &dyn Notifier,
) -> Result<(String, String)> {
    let file_name = filename_from_url(url.as_str());
    let handle = downloader.download(url, &file_name).await?;
    if settings.show_notifications {
        notifier.notify(&format!("PDF download started: {}", file_name));
    }
    Ok((file_name, handle))
}
