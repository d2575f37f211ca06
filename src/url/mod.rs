//! URL handling module for the spider
//!
//! This module provides site root derivation, root-relative href resolution
//! and the traversal scope policy.

mod scope;
mod site_root;

// Re-export main types and functions
pub use scope::ScopeConfig;
pub use site_root::{has_http_scheme, resolve, SiteRoot};
