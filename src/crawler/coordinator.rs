//! Crawler coordinator - traversal orchestration
//!
//! The coordinator validates the seed, claims it, runs the root fetch task
//! and waits until the entire task tree it spawned has completed.

use crate::config::CrawlerConfig;
use crate::crawler::task::{run_fetch_task, CrawlContext, FetchJob};
use crate::output::ProgressSink;
use crate::state::{Frontier, PageStore};
use crate::url::ScopeConfig;
use crate::{Result, SpiderError};
use reqwest::Client;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Per-run traversal inputs
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    /// Levels to fetch; 1 fetches only the seed page
    pub depth: u32,

    /// Follow links to other site roots
    pub allow_cross_site: bool,

    /// Page fetches in flight at once
    pub max_concurrent_fetches: usize,
}

impl CrawlOptions {
    pub fn new(depth: u32, allow_cross_site: bool) -> Self {
        Self {
            depth,
            allow_cross_site,
            max_concurrent_fetches: CrawlerConfig::default().max_concurrent_fetches as usize,
        }
    }

    pub fn with_max_concurrent_fetches(mut self, max: usize) -> Self {
        self.max_concurrent_fetches = max.max(1);
        self
    }

    /// Applies the fetch bound from the crawler configuration
    pub fn with_crawler_config(self, config: &CrawlerConfig) -> Self {
        self.with_max_concurrent_fetches(config.max_concurrent_fetches as usize)
    }
}

/// Main crawler coordinator structure
pub struct Coordinator {
    seed_url: String,
    depth: u32,
    context: Arc<CrawlContext>,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// Performs no network activity. Fails when the seed URL has no scheme
    /// or host, or when the depth is zero.
    ///
    /// # Arguments
    ///
    /// * `client` - The HTTP client every fetch goes through
    /// * `seed_url` - Where the crawl starts
    /// * `options` - Depth, scope and concurrency for this run
    /// * `progress` - Sink for the "urls found" counter
    pub fn new(
        client: Client,
        seed_url: &str,
        options: &CrawlOptions,
        progress: Arc<dyn ProgressSink>,
    ) -> Result<Self> {
        let scope = ScopeConfig::for_seed(seed_url, options.allow_cross_site)?;

        if options.depth == 0 {
            return Err(SpiderError::InvalidDepth(options.depth));
        }

        let context = CrawlContext {
            client,
            frontier: Frontier::new(),
            pages: PageStore::new(),
            scope,
            fetch_permits: Semaphore::new(options.max_concurrent_fetches.max(1)),
            progress,
        };

        Ok(Self {
            seed_url: seed_url.to_string(),
            depth: options.depth,
            context: Arc::new(context),
        })
    }

    pub fn frontier(&self) -> &Frontier {
        &self.context.frontier
    }

    pub fn scope(&self) -> &ScopeConfig {
        &self.context.scope
    }

    /// Runs the traversal to completion
    ///
    /// Returns the populated page store once every transitively spawned
    /// fetch task has finished.
    pub async fn run(&self) -> PageStore {
        let ctx = &self.context;

        tracing::info!(
            "Starting crawl of {} (depth {}, cross-site {})",
            self.seed_url,
            self.depth,
            ctx.scope.allow_cross_site()
        );

        // The seed counts as discovered, so links back to it are not refetched
        if let Some(found) = ctx.frontier.claim_counted(&self.seed_url) {
            ctx.progress.urls_found(found);
        }

        let root = FetchJob {
            url: self.seed_url.clone(),
            remaining_depth: self.depth,
        };

        if let Err(e) = tokio::spawn(run_fetch_task(Arc::clone(ctx), root)).await {
            tracing::error!("Root fetch task for {} aborted: {}", self.seed_url, e);
        }

        ctx.progress.finish();

        tracing::info!(
            "Crawl finished: {} urls found, {} pages fetched",
            ctx.frontier.size(),
            ctx.pages.len()
        );

        ctx.pages.clone()
    }
}
