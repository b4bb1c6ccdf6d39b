//! pdfknife CLI - find or assemble the PDF behind a saved web page

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use url::Url;

use pdfknife::{
    download_direct, scan_images, AssembleOptions, BlobDirLoader, Downloader, FileSettings,
    FsDownloader, Notifier, PageSize, PdfDiscovery, RunOutcome, Settings, SettingsSource,
    StaticSettings, Trigger, TriggerController, WebPage,
};

#[derive(Parser)]
#[command(name = "pdfknife")]
#[command(author = "iyulab")]
#[command(version)]
#[command(
    about = "Find the PDF behind a web page, or build one from its page images",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look for a direct PDF link in a saved page
    Scan {
        /// Saved HTML file
        #[arg(value_name = "HTML")]
        input: PathBuf,

        /// Address the page was loaded from
        #[arg(short, long)]
        url: String,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// List blob-backed page images in document order
    Images {
        /// Saved HTML file
        #[arg(value_name = "HTML")]
        input: PathBuf,

        /// Address the page was loaded from
        #[arg(short, long)]
        url: String,
    },

    /// Download the linked PDF, or assemble one from page images
    Run {
        /// Saved HTML file
        #[arg(value_name = "HTML")]
        input: PathBuf,

        /// Address the page was loaded from
        #[arg(short, long)]
        url: String,

        /// Directory holding the blob contents, one file per blob id
        #[arg(short, long, value_name = "DIR")]
        blobs: PathBuf,

        /// Settings file (JSON, extension storage layout)
        #[arg(short, long, value_name = "FILE", env = "PDFKNIFE_SETTINGS")]
        settings: Option<PathBuf>,

        /// Download root directory
        #[arg(short, long, value_name = "DIR", env = "PDFKNIFE_OUTPUT")]
        output: Option<PathBuf>,

        /// Run even if disabled or excluded
        #[arg(short, long)]
        force: bool,

        /// Override the page title used for naming
        #[arg(long)]
        title: Option<String>,

        /// JPEG quality (1-100)
        #[arg(long, default_value = "92")]
        quality: u8,

        /// Seconds to wait for each image
        #[arg(long, default_value = "30")]
        timeout: u64,

        /// Page size (a4 or letter)
        #[arg(long, default_value = "a4", value_parser = parse_page_size)]
        page_size: PageSize,

        /// Downscale images whose larger side exceeds this many pixels
        #[arg(long, value_name = "PX")]
        max_dimension: Option<u32>,
    },

    /// Download a PDF link directly
    Fetch {
        /// PDF address
        #[arg(value_name = "URL")]
        url: String,

        /// Settings file (JSON, extension storage layout)
        #[arg(short, long, value_name = "FILE", env = "PDFKNIFE_SETTINGS")]
        settings: Option<PathBuf>,

        /// Download root directory
        #[arg(short, long, value_name = "DIR", env = "PDFKNIFE_OUTPUT")]
        output: Option<PathBuf>,
    },

    /// Show version information
    Version,
}

fn parse_page_size(name: &str) -> Result<PageSize, String> {
    PageSize::from_name(name).ok_or_else(|| format!("unknown page size '{}' (a4, letter)", name))
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Scan { input, url, json } => cmd_scan(&input, &url, json),
        Commands::Images { input, url } => cmd_images(&input, &url),
        Commands::Run {
            input,
            url,
            blobs,
            settings,
            output,
            force,
            title,
            quality,
            timeout,
            page_size,
            max_dimension,
        } => {
            let mut options = AssembleOptions::new()
                .with_quality(quality)
                .with_load_timeout(Duration::from_secs(timeout))
                .with_page_size(page_size);
            if let Some(max) = max_dimension {
                options = options.with_max_dimension(max);
            }
            block_on(cmd_run(RunArgs {
                input,
                url,
                blobs,
                settings,
                output,
                force,
                title,
                options,
            }))
        }
        Commands::Fetch {
            url,
            settings,
            output,
        } => block_on(cmd_fetch(&url, settings, output)),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn block_on<F: std::future::Future<Output = CliResult>>(future: F) -> CliResult {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    rt.block_on(future)
}

fn load_page(input: &Path, url: &str) -> Result<WebPage, Box<dyn std::error::Error>> {
    let html = fs::read_to_string(input)?;
    Ok(WebPage::parse(&html, url)?)
}

fn settings_source(path: Option<PathBuf>) -> Arc<dyn SettingsSource> {
    match path {
        Some(path) => Arc::new(FileSettings::new(path)),
        None => Arc::new(StaticSettings::default()),
    }
}

fn cmd_scan(input: &Path, url: &str, json: bool) -> CliResult {
    let page = load_page(input, url)?;
    let candidate = PdfDiscovery::with_defaults().find(&page);

    if json {
        let resolved = match &candidate {
            Some(c) => Some(c.resolve(page.url())?.to_string()),
            None => None,
        };
        let value = serde_json::json!({
            "page": page.url().as_str(),
            "candidate": candidate,
            "resolved": resolved,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    match candidate {
        Some(candidate) => {
            let resolved = candidate.resolve(page.url())?;
            println!("{}: {}", "PDF".green().bold(), resolved);
            println!("{}: {}", "Strategy".bold(), candidate.strategy);
        }
        None => {
            println!("{}", "No direct PDF link found".yellow());
            let images = scan_images(&page).len();
            if images > 0 {
                println!("{} page images available for assembly", images);
            }
        }
    }
    Ok(())
}

fn cmd_images(input: &Path, url: &str) -> CliResult {
    let page = load_page(input, url)?;
    let images = scan_images(&page);

    println!("{}", "Page Images".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for image in &images {
        let size = match (image.declared_width, image.declared_height) {
            (Some(w), Some(h)) => format!(" ({}x{})", w, h),
            _ => String::new(),
        };
        println!("{:>4}  {}{}", image.index + 1, image.src, size.dimmed());
    }
    println!("\n{} {} images", "Total:".bold(), images.len());
    Ok(())
}

struct RunArgs {
    input: PathBuf,
    url: String,
    blobs: PathBuf,
    settings: Option<PathBuf>,
    output: Option<PathBuf>,
    force: bool,
    title: Option<String>,
    options: AssembleOptions,
}

async fn cmd_run(args: RunArgs) -> CliResult {
    let mut page = load_page(&args.input, &args.url)?;
    if let Some(title) = args.title {
        page = page.with_title(title);
    }

    let source = settings_source(args.settings);
    let settings = source.settings().await?;
    let downloader = HttpDownloader::new(output_root(args.output), &settings)?;

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}% {msg}")?
            .progress_chars("#>-"),
    );
    pb.set_message("Assembling...");
    let bar = pb.clone();

    let mut controller = TriggerController::new(
        source,
        Arc::new(downloader),
        Arc::new(BlobDirLoader::new(args.blobs)),
    )
    .with_notifier(Arc::new(ConsoleNotifier))
    .with_progress(Arc::new(move |percent: u8| bar.set_position(u64::from(percent))))
    .with_options(args.options);

    let trigger = if args.force {
        Trigger::Manual
    } else {
        Trigger::PageLoad
    };
    let outcome = controller.trigger(trigger, &page).await;
    pb.finish_and_clear();

    match outcome? {
        RunOutcome::Skipped(reason) => {
            println!("{} {:?} (use --force to run anyway)", "Skipped:".yellow(), reason);
        }
        RunOutcome::DirectDownload {
            url,
            file_name,
            handle,
        } => {
            println!("{} {}", "Found PDF".green().bold(), url);
            println!("{} {} -> {}", "Saved".green(), file_name, handle);
        }
        RunOutcome::Assembled {
            file_name,
            handle,
            pages,
            skipped,
        } => {
            println!(
                "{} {} pages ({} skipped)",
                "Assembled".green().bold(),
                pages,
                skipped
            );
            println!("{} {} -> {}", "Saved".green(), file_name, handle);
        }
        RunOutcome::NothingProduced => {
            println!("{}", "No PDF link and no usable page images".yellow());
        }
    }
    Ok(())
}

async fn cmd_fetch(url: &str, settings: Option<PathBuf>, output: Option<PathBuf>) -> CliResult {
    let url = Url::parse(url)?;
    let settings = settings_source(settings).settings().await?;
    let downloader = HttpDownloader::new(output_root(output), &settings)?;

    let (file_name, handle) =
        download_direct(&url, &settings, &downloader, &ConsoleNotifier).await?;
    println!("{} {} -> {}", "Saved".green(), file_name, handle);
    Ok(())
}

fn output_root(output: Option<PathBuf>) -> PathBuf {
    output.unwrap_or_else(|| PathBuf::from("."))
}

fn cmd_version() {
    println!("{} {}", "pdfknife".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Find or assemble the PDF behind a web page");
    println!();
    println!("Repository: {}", "https://github.com/iyulab/pdfknife".dimmed());
    println!("License: MIT");
}

/// Prints notifications to the terminal.
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, message: &str) {
        println!("{} {}", "PDF Knife:".cyan().bold(), message);
    }

    fn error(&self, message: &str) {
        eprintln!("{} {}", "PDF Knife:".red().bold(), message);
    }
}

/// Fetches over HTTP and stores through an [`FsDownloader`].
struct HttpDownloader {
    client: reqwest::Client,
    store: FsDownloader,
}

impl HttpDownloader {
    fn new(root: PathBuf, settings: &Settings) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("pdfknife/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            store: FsDownloader::from_settings(root, settings),
        })
    }
}

#[async_trait]
impl Downloader for HttpDownloader {
    async fn download(&self, url: &Url, suggested_name: &str) -> pdfknife::Result<String> {
        log::info!("fetching {}", url);
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| pdfknife::Error::Download(e.to_string()))?;
        let body = response
            .bytes()
            .await
            .map_err(|e| pdfknife::Error::Download(e.to_string()))?;
        self.store.save(&body, suggested_name).await
    }

    async fn save(&self, bytes: &[u8], suggested_name: &str) -> pdfknife::Result<String> {
        self.store.save(bytes, suggested_name).await
    }
}
