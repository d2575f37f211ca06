use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Deduplicated registry of every URL discovered during one crawl
///
/// The frontier only grows. Cloning yields another handle to the same set,
/// so every fetch task shares one registry.
#[derive(Debug, Clone, Default)]
pub struct Frontier {
    urls: Arc<Mutex<HashSet<String>>>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically checks for `url` and inserts it when absent
    ///
    /// # Returns
    ///
    /// * `true` - The URL was newly claimed; the caller owns fetching it
    /// * `false` - Another task already claimed it
    ///
    /// # Example
    ///
    /// ```
    /// use arachnida::state::Frontier;
    ///
    /// let frontier = Frontier::new();
    /// assert!(frontier.claim("http://x/a"));
    /// assert!(!frontier.claim("http://x/a"));
    /// assert_eq!(frontier.size(), 1);
    /// ```
    pub fn claim(&self, url: &str) -> bool {
        self.claim_counted(url).is_some()
    }

    /// Like [`Frontier::claim`], but returns the frontier size right after
    /// the insert
    ///
    /// The count is read under the same lock as the insert, so every
    /// successful claim observes a distinct size.
    pub fn claim_counted(&self, url: &str) -> Option<usize> {
        let mut urls = self.lock();
        if urls.contains(url) {
            return None;
        }
        urls.insert(url.to_string());
        Some(urls.len())
    }

    /// Number of URLs claimed so far
    pub fn size(&self) -> usize {
        self.lock().len()
    }

    // Every guarded operation is a single insert or read, so a panic in
    // another holder cannot leave the set half-updated.
    fn lock(&self) -> MutexGuard<'_, HashSet<String>> {
        self.urls.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
