//! HTML parser for extracting links and image references
//!
//! This module turns raw markup into a [`PageContent`]:
//! - Page title
//! - Anchor hrefs worth following (raw, unresolved)
//! - Image `src` values (raw, unfiltered)

use scraper::{Html, Selector};

/// Parsed representation of a fetched page
///
/// Values are kept exactly as written in the markup, in document order.
/// Resolution against a site root happens later, so this type is
/// independent of where the page was fetched from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageContent {
    /// The page title (from <title> tag)
    pub title: Option<String>,

    /// Anchor hrefs that may name another page
    pub links: Vec<String>,

    /// `src` attribute of every <img> element that has one
    pub images: Vec<String>,
}

/// Parses HTML content and extracts links, images and title
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` tags anywhere in the document
///
/// **Exclude:**
/// - `<a href="..." download>`
/// - `javascript:`, `mailto:`, `tel:` links
/// - Data URIs
/// - Empty and fragment-only hrefs
///
/// # Example
///
/// ```
/// use arachnida::crawler::parse_page;
///
/// let html = r#"<html><head><title>Test</title></head>
///     <body><a href="/page">Link</a><img src="cat.png"></body></html>"#;
/// let page = parse_page(html);
/// assert_eq!(page.title, Some("Test".to_string()));
/// assert_eq!(page.links, vec!["/page"]);
/// assert_eq!(page.images, vec!["cat.png"]);
/// ```
pub fn parse_page(html: &str) -> PageContent {
    let document = Html::parse_document(html);

    PageContent {
        title: extract_title(&document),
        links: extract_links(&document),
        images: extract_image_sources(&document),
    }
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Extracts every followable anchor href from the HTML document
fn extract_links(document: &Html) -> Vec<String> {
    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            // Skip if it has the download attribute
            if element.value().attr("download").is_some() {
                continue;
            }

            if let Some(href) = element.value().attr("href") {
                let href = href.trim();
                if is_followable(href) {
                    links.push(href.to_string());
                }
            }
        }
    }

    links
}

/// Extracts the `src` of every <img> element
fn extract_image_sources(document: &Html) -> Vec<String> {
    let Ok(img_selector) = Selector::parse("img[src]") else {
        return Vec::new();
    };

    document
        .select(&img_selector)
        .filter_map(|element| element.value().attr("src"))
        .map(str::to_string)
        .collect()
}

/// Returns false for hrefs that can never name a fetchable page
fn is_followable(href: &str) -> bool {
    if href.is_empty() || href.starts_with('#') {
        return false;
    }

    let lower = href.to_ascii_lowercase();
    !(lower.starts_with("javascript:")
        || lower.starts_with("mailto:")
        || lower.starts_with("tel:")
        || lower.starts_with("data:"))
}
