//! Shared crawl state
//!
//! Both types here are cheap-to-clone handles over one mutex-guarded
//! collection, shared by every fetch task of a crawl.
//!
//! # Components
//!
//! - `Frontier`: every URL discovered so far, with exactly-once claiming
//! - `PageStore`: parsed content of every successfully fetched page

mod frontier;
mod page_store;

// Re-export main types
pub use frontier::Frontier;
pub use page_store::{PageRecord, PageStore};
