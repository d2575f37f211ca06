use crate::crawler::fetch_bytes;
use crate::images::ImageRef;
use crate::output::ProgressSink;
use crate::url::{has_http_scheme, resolve, SiteRoot};
use crate::{Result, SpiderError};
use futures::stream::{self, StreamExt};
use reqwest::Client;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Outcome counts of a download batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DownloadSummary {
    /// Image references attempted
    pub total: usize,

    /// Images written to disk
    pub saved: usize,

    /// Images skipped after a fetch or write failure
    pub failed: usize,
}

/// One image to fetch and where to put it
#[derive(Debug)]
struct DownloadJob {
    url: String,
    host: String,
    file_name: String,
    /// `None` when the host directory could not be created
    target_dir: Option<PathBuf>,
}

/// Resolves an image `src` to an absolute URL
///
/// Absolute `http(s)` sources are kept, protocol-relative ones (`//cdn/x`)
/// get `https:`, anything else is concatenated onto the owner page's site
/// root.
///
/// # Examples
///
/// ```
/// use arachnida::images::image_url;
/// use arachnida::url::SiteRoot;
///
/// let owner = SiteRoot::of("http://a.test/gallery/index.html").unwrap();
/// assert_eq!(image_url(&owner, "cat.png"), "http://a.test/cat.png");
/// assert_eq!(image_url(&owner, "//cdn.test/cat.png"), "https://cdn.test/cat.png");
/// assert_eq!(image_url(&owner, "http://b.test/cat.png"), "http://b.test/cat.png");
/// ```
pub fn image_url(owner_root: &SiteRoot, raw_src: &str) -> String {
    if has_http_scheme(raw_src) {
        raw_src.to_string()
    } else if raw_src.starts_with("//") {
        format!("https:{}", raw_src)
    } else {
        resolve(owner_root, raw_src)
    }
}

/// Final path segment of a URL, used as the on-disk file name
pub fn file_name_of(url: &str) -> Option<&str> {
    url.rsplit('/').next().filter(|name| !name.is_empty())
}

/// Downloads every image reference under `output_dir/<host>/<file name>`
///
/// `<host>` is the owner page's host. Each page gets its directory even if
/// it has no images. A failure to fetch or write one image is logged and
/// skipped; identical file names from the same host overwrite each other.
///
/// # Returns
///
/// * `Ok(DownloadSummary)` - Counts of saved and skipped images
/// * `Err(SpiderError::Io)` - `output_dir` itself could not be created
pub async fn download_all(
    client: &Client,
    images: &BTreeMap<String, Vec<ImageRef>>,
    output_dir: &Path,
    max_concurrent: usize,
    progress: &dyn ProgressSink,
) -> Result<DownloadSummary> {
    tokio::fs::create_dir_all(output_dir).await?;

    let total: usize = images.values().map(Vec::len).sum();
    let mut jobs = Vec::with_capacity(total);

    for (page_url, refs) in images {
        let owner_root = match SiteRoot::of(page_url) {
            Ok(root) => root,
            Err(e) => {
                tracing::warn!("Skipping images of {}: {}", page_url, e);
                jobs.extend(refs.iter().map(|image| DownloadJob {
                    url: image.raw_src.clone(),
                    host: String::new(),
                    file_name: image.raw_src.clone(),
                    target_dir: None,
                }));
                continue;
            }
        };

        // create_dir_all tolerates the directory already existing
        let host_dir = output_dir.join(owner_root.host());
        let target_dir = match tokio::fs::create_dir_all(&host_dir).await {
            Ok(()) => Some(host_dir),
            Err(e) => {
                tracing::warn!("Failed to create {}: {}", host_dir.display(), e);
                None
            }
        };

        for image in refs {
            let url = image_url(&owner_root, &image.raw_src);
            let file_name = file_name_of(&url).unwrap_or_default().to_string();
            jobs.push(DownloadJob {
                url,
                host: owner_root.host().to_string(),
                file_name,
                target_dir: target_dir.clone(),
            });
        }
    }

    let attempted = AtomicUsize::new(0);
    let saved = AtomicUsize::new(0);

    stream::iter(jobs)
        .for_each_concurrent(max_concurrent.max(1), |job| {
            let attempted = &attempted;
            let saved = &saved;
            async move {
                match download_one(client, &job).await {
                    Ok(path) => {
                        saved.fetch_add(1, Ordering::SeqCst);
                        tracing::debug!("Saved {} to {}", job.url, path.display());
                    }
                    Err(e) => tracing::warn!("Skipping image {}: {}", job.url, e),
                }
                let done = attempted.fetch_add(1, Ordering::SeqCst) + 1;
                progress.image_attempted(done, total, &job.host, &job.file_name);
            }
        })
        .await;

    progress.finish();

    let saved = saved.into_inner();
    Ok(DownloadSummary {
        total,
        saved,
        failed: total - saved,
    })
}

async fn download_one(client: &Client, job: &DownloadJob) -> Result<PathBuf> {
    let dir = job.target_dir.as_ref().ok_or_else(|| {
        SpiderError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "no output directory for this host",
        ))
    })?;

    if job.file_name.is_empty() {
        return Err(SpiderError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("no file name in {}", job.url),
        )));
    }

    let bytes = fetch_bytes(client, &job.url).await?;
    let path = dir.join(&job.file_name);
    tokio::fs::write(&path, bytes).await?;
    Ok(path)
}
