//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the spider, including:
//! - Building one HTTP client per run with user agent and deadlines
//! - GET requests for pages, classified into a closed [`FetchResult`]
//! - GET requests for raw image bytes

use crate::config::Config;
use crate::SpiderError;
use reqwest::Client;
use std::time::Duration;

/// Result of a page fetch
///
/// Failures are values, not errors: a failed fetch ends only the task that
/// issued it.
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched the page
    Success {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Page body content
        body: String,
    },

    /// The server answered with a non-success status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, body read, etc.)
    NetworkError {
        /// Error description
        error: String,
        /// Whether the per-request deadline expired
        timed_out: bool,
    },
}

/// Builds an HTTP client with proper configuration
///
/// Every request made through the client carries the configured request
/// deadline, so a hung server cannot stall a crawl forever.
///
/// # Example
///
/// ```
/// use arachnida::config::Config;
/// use arachnida::crawler::build_http_client;
///
/// let client = build_http_client(&Config::default()).unwrap();
/// ```
pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.header_value())
        .timeout(Duration::from_secs(config.crawler.request_timeout_secs))
        .connect_timeout(Duration::from_secs(config.crawler.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a page with a single GET request
///
/// | Condition | Result |
/// |-----------|--------|
/// | HTTP 2xx | Success |
/// | Any other status | HttpError |
/// | Timeout | NetworkError (timed_out) |
/// | Connection refused, DNS, TLS | NetworkError |
/// | Body read failure | NetworkError |
///
/// There is no retry: every failure is final for this run.
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => return classify_network_error(&e),
    };

    let status = response.status();
    let final_url = response.url().to_string();

    if !status.is_success() {
        return FetchResult::HttpError {
            status_code: status.as_u16(),
        };
    }

    match response.text().await {
        Ok(body) => FetchResult::Success {
            final_url,
            status_code: status.as_u16(),
            body,
        },
        Err(e) => classify_network_error(&e),
    }
}

/// Fetches the raw bytes behind `url`
///
/// # Returns
///
/// * `Ok(Vec<u8>)` - The response body of a 2xx response
/// * `Err(SpiderError::HttpStatus)` - Non-success status
/// * `Err(SpiderError::Http)` - Transport failure or timeout
pub async fn fetch_bytes(client: &Client, url: &str) -> Result<Vec<u8>, SpiderError> {
    let response = client.get(url).send().await.map_err(|source| SpiderError::Http {
        url: url.to_string(),
        source,
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(SpiderError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let bytes = response.bytes().await.map_err(|source| SpiderError::Http {
        url: url.to_string(),
        source,
    })?;

    Ok(bytes.to_vec())
}

fn classify_network_error(e: &reqwest::Error) -> FetchResult {
    if e.is_timeout() {
        FetchResult::NetworkError {
            error: "Request timeout".to_string(),
            timed_out: true,
        }
    } else if e.is_connect() {
        FetchResult::NetworkError {
            error: format!("Connection failed: {}", e),
            timed_out: false,
        }
    } else {
        FetchResult::NetworkError {
            error: e.to_string(),
            timed_out: false,
        }
    }
}
