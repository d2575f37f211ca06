//! The fetch task: one unit of concurrent crawl work
//!
//! A task fetches one page, stores it, claims its in-scope links and spawns
//! one child task per newly claimed link while depth remains. A task is
//! finished only once every child it spawned has finished, so awaiting the
//! root task awaits the whole tree.

use crate::crawler::fetcher::{fetch_url, FetchResult};
use crate::crawler::parser::{parse_page, PageContent};
use crate::output::ProgressSink;
use crate::state::{Frontier, PageStore};
use crate::url::{resolve, ScopeConfig, SiteRoot};
use futures::future::{BoxFuture, FutureExt};
use reqwest::Client;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// A page to fetch and how many more levels may be explored from it
///
/// `remaining_depth` is always at least 1: depth is checked before a child
/// job is created, never inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchJob {
    pub url: String,
    pub remaining_depth: u32,
}

/// Everything a fetch task shares with the rest of the crawl
pub(crate) struct CrawlContext {
    pub client: Client,
    pub frontier: Frontier,
    pub pages: PageStore,
    pub scope: ScopeConfig,
    /// Bounds page fetches in flight across the whole task tree
    pub fetch_permits: Semaphore,
    pub progress: Arc<dyn ProgressSink>,
}

/// Runs a fetch task and, transitively, all of its descendants
///
/// Boxed because the future spawns copies of itself.
pub(crate) fn run_fetch_task(ctx: Arc<CrawlContext>, job: FetchJob) -> BoxFuture<'static, ()> {
    async move {
        let Some(content) = fetch_page(&ctx, &job.url).await else {
            return;
        };

        let page_root = SiteRoot::of(&job.url).unwrap_or_else(|_| ctx.scope.seed_root().clone());
        let hrefs = content.links.clone();
        ctx.pages.insert(&job.url, content);

        let mut children = JoinSet::new();

        for href in &hrefs {
            let url = resolve(&page_root, href);

            if !ctx.scope.in_scope(&url, &page_root) {
                tracing::trace!("Out of scope: {}", url);
                continue;
            }

            let Some(found) = ctx.frontier.claim_counted(&url) else {
                continue;
            };
            ctx.progress.urls_found(found);
            tracing::debug!("Claimed {} (frontier size {})", url, found);

            if job.remaining_depth > 1 {
                let child = FetchJob {
                    url,
                    remaining_depth: job.remaining_depth - 1,
                };
                children.spawn(run_fetch_task(Arc::clone(&ctx), child));
            }
        }

        while let Some(joined) = children.join_next().await {
            if let Err(e) = joined {
                tracing::warn!("Fetch task below {} aborted: {}", job.url, e);
            }
        }
    }
    .boxed()
}

/// Fetches and parses one page, holding a fetch permit only for the request
///
/// Returns `None` on any failure; the failure ends this task only.
async fn fetch_page(ctx: &CrawlContext, url: &str) -> Option<PageContent> {
    let result = {
        let _permit = ctx.fetch_permits.acquire().await.ok()?;
        tracing::debug!("Fetching {}", url);
        fetch_url(&ctx.client, url).await
    };

    match result {
        FetchResult::Success {
            final_url, body, ..
        } => {
            if final_url != url {
                tracing::debug!("{} redirected to {}", url, final_url);
            }
            let content = parse_page(&body);
            tracing::info!(
                "Fetched {} ({})",
                url,
                content.title.as_deref().unwrap_or("untitled")
            );
            Some(content)
        }
        FetchResult::HttpError { status_code } => {
            tracing::warn!("HTTP {} for {}", status_code, url);
            None
        }
        FetchResult::NetworkError { error, timed_out } => {
            if timed_out {
                tracing::warn!("Timed out fetching {}", url);
            } else {
                tracing::warn!("Failed to fetch {}: {}", url, error);
            }
            None
        }
    }
}
