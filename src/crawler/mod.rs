//! Crawler module for web page fetching and traversal
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with per-request deadlines
//! - HTML parsing and link/image extraction
//! - The recursive fetch task
//! - Overall traversal coordination

mod coordinator;
mod fetcher;
mod parser;
mod task;

pub use coordinator::{Coordinator, CrawlOptions};
pub use fetcher::{build_http_client, fetch_bytes, fetch_url, FetchResult};
pub use parser::{parse_page, PageContent};
pub use task::FetchJob;

use crate::output::ProgressSink;
use crate::state::PageStore;
use crate::Result;
use reqwest::Client;
use std::sync::Arc;

/// Runs a complete traversal
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Validate the seed URL (no network activity on failure)
/// 2. Claim the seed and fetch it
/// 3. Extract, scope-filter and claim links, spawning child tasks while
///    depth remains
/// 4. Wait for the whole task tree to finish
///
/// # Returns
///
/// * `Ok(PageStore)` - Every successfully fetched page
/// * `Err(SpiderError)` - The seed URL or depth was invalid
///
/// # Example
///
/// ```no_run
/// use arachnida::config::Config;
/// use arachnida::crawler::{build_http_client, crawl, CrawlOptions};
/// use arachnida::output::SilentProgress;
/// use std::sync::Arc;
///
/// # async fn example() -> arachnida::Result<()> {
/// let client = build_http_client(&Config::default())?;
/// let options = CrawlOptions::new(2, false);
/// let pages = crawl(client, "https://example.com/", &options, Arc::new(SilentProgress)).await?;
/// println!("{} pages", pages.len());
/// # Ok(())
/// # }
/// ```
pub async fn crawl(
    client: Client,
    seed_url: &str,
    options: &CrawlOptions,
    progress: Arc<dyn ProgressSink>,
) -> Result<PageStore> {
    let coordinator = Coordinator::new(client, seed_url, options, progress)?;
    Ok(coordinator.run().await)
}
