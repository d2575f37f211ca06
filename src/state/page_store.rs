use crate::crawler::PageContent;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A successfully fetched and parsed page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRecord {
    pub url: String,
    pub content: PageContent,
}

/// Shared mapping from fetched URL to its parsed content
///
/// A URL is absent iff it was never successfully fetched. Written only
/// during traversal; the extraction and download phases read a snapshot.
#[derive(Debug, Clone, Default)]
pub struct PageStore {
    pages: Arc<Mutex<HashMap<String, PageContent>>>,
}

impl PageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the parsed content for `url`, replacing any previous entry
    pub fn insert(&self, url: &str, content: PageContent) {
        self.lock().insert(url.to_string(), content);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Copies every stored page out, ordered by URL
    pub fn records(&self) -> Vec<PageRecord> {
        let mut records: Vec<PageRecord> = self
            .lock()
            .iter()
            .map(|(url, content)| PageRecord {
                url: url.clone(),
                content: content.clone(),
            })
            .collect();
        records.sort_by(|a, b| a.url.cmp(&b.url));
        records
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, PageContent>> {
        self.pages.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
