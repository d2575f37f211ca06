use crate::state::PageStore;
use std::collections::BTreeMap;

/// Suffixes an image `src` must end with to be collected (case-sensitive)
pub const IMAGE_EXTENSIONS: [&str; 6] = [".jpg", ".jpeg", ".png", ".gif", ".webp", ".bmp"];

/// A candidate image found on a page, not yet resolved to an absolute URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    pub owner_page_url: String,
    pub raw_src: String,
}

/// Returns true when `src` ends with a recognized image extension
///
/// The match is a plain suffix test: no case folding and no query-string
/// stripping, so `c.JPEG` and `a.png?v=2` are both rejected.
pub fn has_image_extension(src: &str) -> bool {
    IMAGE_EXTENSIONS.iter().any(|ext| src.ends_with(ext))
}

/// Collects the image references of every stored page
///
/// Pure: reads the store without modifying it. Every stored page gets an
/// entry, possibly empty. References keep document order and duplicates.
///
/// # Example
///
/// ```
/// use arachnida::crawler::parse_page;
/// use arachnida::images::extract_images;
/// use arachnida::state::PageStore;
///
/// let pages = PageStore::new();
/// pages.insert(
///     "http://a.test/",
///     parse_page(r#"<img src="a.png"><img src="b.txt"><img src="c.JPEG">"#),
/// );
///
/// let images = extract_images(&pages);
/// let refs = &images["http://a.test/"];
/// assert_eq!(refs.len(), 1);
/// assert_eq!(refs[0].raw_src, "a.png");
/// ```
pub fn extract_images(pages: &PageStore) -> BTreeMap<String, Vec<ImageRef>> {
    pages
        .records()
        .into_iter()
        .map(|record| {
            let refs = record
                .content
                .images
                .iter()
                .filter(|src| has_image_extension(src))
                .map(|src| ImageRef {
                    owner_page_url: record.url.clone(),
                    raw_src: src.clone(),
                })
                .collect();
            (record.url, refs)
        })
        .collect()
}
