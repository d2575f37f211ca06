use crate::url::SiteRoot;
use crate::UrlResult;

/// Immutable traversal scope, fixed at crawl start
#[derive(Debug, Clone)]
pub struct ScopeConfig {
    seed_root: SiteRoot,
    allow_cross_site: bool,
}

impl ScopeConfig {
    pub fn new(seed_root: SiteRoot, allow_cross_site: bool) -> Self {
        Self {
            seed_root,
            allow_cross_site,
        }
    }

    /// Builds the scope from a seed URL
    ///
    /// Fails when the seed has no scheme or host.
    pub fn for_seed(seed_url: &str, allow_cross_site: bool) -> UrlResult<Self> {
        Ok(Self::new(SiteRoot::of(seed_url)?, allow_cross_site))
    }

    pub fn seed_root(&self) -> &SiteRoot {
        &self.seed_root
    }

    pub fn allow_cross_site(&self) -> bool {
        self.allow_cross_site
    }

    /// Decides whether a discovered URL may be traversed
    ///
    /// A URL without its own site root is attributed to `page_root`, the
    /// root of the page it was found on.
    ///
    /// # Examples
    ///
    /// ```
    /// use arachnida::url::{ScopeConfig, SiteRoot};
    ///
    /// let scope = ScopeConfig::for_seed("http://a.test/", false).unwrap();
    /// let page = SiteRoot::of("http://a.test/index.html").unwrap();
    ///
    /// assert!(scope.in_scope("http://a.test/about", &page));
    /// assert!(!scope.in_scope("http://b.test/x", &page));
    /// ```
    pub fn in_scope(&self, url: &str, page_root: &SiteRoot) -> bool {
        if self.allow_cross_site {
            return true;
        }

        match SiteRoot::of(url) {
            Ok(root) => root == self.seed_root,
            Err(_) => *page_root == self.seed_root,
        }
    }
}
