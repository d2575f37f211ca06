use crate::{UrlError, UrlResult};
use std::fmt;
use url::{ParseError, Url};

/// The `scheme://host[:port]/` prefix of a URL
///
/// Two URLs belong to the same site iff their site roots are equal. The
/// root is also the base every relative href is concatenated onto.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SiteRoot {
    root: String,
    scheme: String,
    host: String,
}

impl SiteRoot {
    /// Computes the site root of an absolute URL
    ///
    /// # Returns
    ///
    /// * `Ok(SiteRoot)` - The URL has both a scheme and a host
    /// * `Err(UrlError)` - The URL is relative, unparseable, or hostless
    ///
    /// # Examples
    ///
    /// ```
    /// use arachnida::url::SiteRoot;
    ///
    /// let root = SiteRoot::of("http://a.test/dir/page.html").unwrap();
    /// assert_eq!(root.as_str(), "http://a.test/");
    ///
    /// assert!(SiteRoot::of("page.html").is_err());
    /// assert!(SiteRoot::of("mailto:someone@a.test").is_err());
    /// ```
    pub fn of(url: &str) -> UrlResult<Self> {
        let parsed = match Url::parse(url) {
            Ok(parsed) => parsed,
            Err(ParseError::RelativeUrlWithoutBase) => {
                return Err(UrlError::MissingScheme(url.to_string()))
            }
            Err(e) => return Err(UrlError::Parse(format!("{}: {}", url, e))),
        };

        let host = match parsed.host_str() {
            Some(host) if !host.is_empty() => host,
            _ => return Err(UrlError::MissingHost(url.to_string())),
        };

        // Keep the port: two servers on one host are two sites
        let authority = match parsed.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };

        Ok(Self {
            root: format!("{}://{}/", parsed.scheme(), authority),
            scheme: parsed.scheme().to_string(),
            host: authority,
        })
    }

    /// The full root string, always ending in `/`
    pub fn as_str(&self) -> &str {
        &self.root
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Host including a non-default port (`example.com`, `127.0.0.1:8080`)
    pub fn host(&self) -> &str {
        &self.host
    }
}

impl fmt::Display for SiteRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.root)
    }
}

/// Returns true when `href` starts with an `http://` or `https://` scheme
pub fn has_http_scheme(href: &str) -> bool {
    let lower = href.get(..8).unwrap_or(href).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Resolves an href against a site root
///
/// Absolute `http(s)` hrefs are returned as-is. Anything else is
/// concatenated onto the root byte for byte, so resolution is root-relative
/// rather than directory-relative: `img.html` on
/// `http://a.test/dir/page.html` becomes `http://a.test/img.html`. No
/// slash folding, `..` collapsing or percent-decoding happens, which keeps
/// `/about` and `about` distinct.
///
/// # Examples
///
/// ```
/// use arachnida::url::{resolve, SiteRoot};
///
/// let root = SiteRoot::of("http://a.test/dir/page.html").unwrap();
/// assert_eq!(resolve(&root, "img.html"), "http://a.test/img.html");
/// assert_eq!(resolve(&root, "/about"), "http://a.test//about");
/// assert_eq!(resolve(&root, "https://b.test/x"), "https://b.test/x");
/// ```
pub fn resolve(base: &SiteRoot, href: &str) -> String {
    if has_http_scheme(href) {
        href.to_string()
    } else {
        format!("{}{}", base.as_str(), href)
    }
}
