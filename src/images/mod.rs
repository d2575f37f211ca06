//! Image harvesting: the post-traversal phase
//!
//! - `extractor`: pure pass over the page store collecting image references
//! - `downloader`: resolves, fetches and writes each image, skipping failures

mod downloader;
mod extractor;

pub use downloader::{download_all, file_name_of, image_url, DownloadSummary};
pub use extractor::{extract_images, has_image_extension, ImageRef, IMAGE_EXTENSIONS};
