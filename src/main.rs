//! Spider main entry point
//!
//! This is the command-line interface for the arachnida spider.

use anyhow::Context;
use arachnida::config::load_config_or_default;
use arachnida::crawler::{build_http_client, Coordinator, CrawlOptions};
use arachnida::images::{download_all, extract_images};
use arachnida::output::{
    print_statistics, summary_line, ConsoleProgress, ProgressSink, RunStatistics, SilentProgress,
};
use arachnida::url::SiteRoot;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Depth used by `-r` when no `-l` is given
const RECURSIVE_DEFAULT_DEPTH: u32 = 5;

/// Spider web crawler crawls recursively to a given depth and downloads
/// images from the urls found.
#[derive(Parser, Debug)]
#[command(name = "spider")]
#[command(version)]
#[command(about = "Crawls a site to a given depth and downloads its images", long_about = None)]
struct Cli {
    /// The url to start crawling from
    #[arg(value_name = "URL")]
    url: String,

    /// Crawl recursively (depth 5 unless --limit is given)
    #[arg(short, long)]
    recursive: bool,

    /// Depth limit for the spider
    #[arg(short, long, value_name = "N")]
    limit: Option<u32>,

    /// Path to save the images
    #[arg(short, long, value_name = "DIR", default_value = "data")]
    path: PathBuf,

    /// Crawl other websites
    #[arg(short, long = "other_website")]
    other_website: bool,

    /// Path to an optional TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress progress, banners and statistics
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    fn depth(&self) -> u32 {
        match (self.limit, self.recursive) {
            (Some(limit), _) => limit,
            (None, true) => RECURSIVE_DEFAULT_DEPTH,
            (None, false) => 1,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    // Validate before anything touches the network
    if let Err(e) = SiteRoot::of(&cli.url) {
        tracing::debug!("Rejected seed URL: {}", e);
        eprintln!("Correct URL format is required : http(s)://www.example.com");
        return Ok(ExitCode::FAILURE);
    }

    let config = load_config_or_default(cli.config.as_deref()).with_context(|| match &cli.config {
        Some(path) => format!("Failed to load configuration from {}", path.display()),
        None => "Invalid default configuration".to_string(),
    })?;

    let client = build_http_client(&config).context("Failed to build HTTP client")?;
    let progress: Arc<dyn ProgressSink> = if cli.quiet {
        Arc::new(SilentProgress)
    } else {
        Arc::new(ConsoleProgress::new())
    };

    let options = CrawlOptions::new(cli.depth(), cli.other_website)
        .with_crawler_config(&config.crawler);

    let coordinator = Coordinator::new(client.clone(), &cli.url, &options, Arc::clone(&progress))
        .context("Invalid crawl parameters")?;
    banner(cli.quiet, &format!("Starting urls crawling on {}..", cli.url));
    let pages = coordinator.run().await;

    banner(
        cli.quiet,
        &format!("Starting images crawling on {} urls..", pages.len()),
    );
    let images = extract_images(&pages);
    let mut running = 0;
    for refs in images.values() {
        running += refs.len();
        progress.images_found(running);
    }
    progress.finish();

    let summary = download_all(
        &client,
        &images,
        &cli.path,
        config.download.max_concurrent_downloads as usize,
        progress.as_ref(),
    )
    .await
    .with_context(|| format!("Failed to prepare output directory {}", cli.path.display()))?;

    if !cli.quiet {
        let urls_found = coordinator.frontier().size();
        let stats = RunStatistics::collect(urls_found, &pages, &images, summary);
        println!();
        print_statistics(&stats);
        println!();
    }

    // Printed even under -q: it is the result of the run
    println!("{}", summary_line(&summary, &cli.path));

    Ok(ExitCode::SUCCESS)
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so they do not tear the stdout progress line.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("error"),
            1 => EnvFilter::new("arachnida=info,spider=info,warn"),
            2 => EnvFilter::new("arachnida=debug,spider=debug,info"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

fn banner(quiet: bool, text: &str) {
    if !quiet {
        println!("{}", text);
    }
}
