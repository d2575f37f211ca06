//! End-of-run statistics
//!
//! This module gathers the counts of both phases into one summary and
//! prints it once the run is over.

use crate::images::{DownloadSummary, ImageRef};
use crate::state::PageStore;
use std::collections::BTreeMap;
use std::path::Path;

/// Run statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStatistics {
    /// URLs claimed in the frontier (fetched or not)
    pub urls_found: usize,

    /// Pages fetched and parsed successfully
    pub pages_fetched: usize,

    /// Pages with at least one recognized image reference
    pub pages_with_images: usize,

    /// Image references across all pages, duplicates included
    pub images_found: usize,

    /// Outcome of the download phase
    pub download: DownloadSummary,
}

impl RunStatistics {
    pub fn collect(
        urls_found: usize,
        pages: &PageStore,
        images: &BTreeMap<String, Vec<ImageRef>>,
        download: DownloadSummary,
    ) -> Self {
        Self {
            urls_found,
            pages_fetched: pages.len(),
            pages_with_images: images.values().filter(|refs| !refs.is_empty()).count(),
            images_found: images.values().map(Vec::len).sum(),
            download,
        }
    }

    /// Percentage of attempted images that were saved
    pub fn download_success_rate(&self) -> f64 {
        if self.download.total == 0 {
            return 0.0;
        }
        (self.download.saved as f64 / self.download.total as f64) * 100.0
    }
}

/// The one-line result of the download phase
///
/// # Examples
///
/// ```
/// use arachnida::images::DownloadSummary;
/// use arachnida::output::summary_line;
/// use std::path::Path;
///
/// let summary = DownloadSummary { total: 3, saved: 2, failed: 1 };
/// assert_eq!(summary_line(&summary, Path::new("data")), "Saved 2/3 images to data");
/// ```
pub fn summary_line(download: &DownloadSummary, output_dir: &Path) -> String {
    format!(
        "Saved {}/{} images to {}",
        download.saved,
        download.total,
        output_dir.display()
    )
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &RunStatistics) {
    println!("=== Spider Statistics ===\n");

    println!("Crawl:");
    println!("  URLs found: {}", stats.urls_found);
    println!("  Pages fetched: {}", stats.pages_fetched);
    println!();

    println!("Images:");
    println!("  Pages with images: {}", stats.pages_with_images);
    println!("  Image references: {}", stats.images_found);
    println!("  Success rate: {:.1}%", stats.download_success_rate());

    if stats.download.failed > 0 {
        println!("  Skipped after errors: {}", stats.download.failed);
    }
}
