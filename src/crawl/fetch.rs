// src/crawl/fetch.rs
// =============================================================================
// This module fetches pages for the crawler and decides whether a fetched
// page is worth parsing.
//
// Key functionality:
// - Fetcher trait: the seam between the crawl loop and the network, so the
//   loop can be driven by canned pages in tests
// - HttpFetcher: the real implementation on top of reqwest
// - check_eligible: status / Content-Type / length rules for parsing a page
// - Categorizes transport failures (timeout, connection, other)
//
// Rust concepts:
// - Traits: Shared behaviour across types (here: anything that can fetch)
// - async-trait: lets a trait have async methods usable behind generics
// - thiserror: derives Display/Error for our error enums
// =============================================================================

use async_trait::async_trait;
use reqwest::header::{HeaderName, CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

/// What the crawl loop needs to know about a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    /// HTTP status code
    pub status: u16,
    /// Raw Content-Type header, if the server sent one
    pub content_type: Option<String>,
    /// Raw Content-Length header, if the server sent one
    pub content_length: Option<String>,
    /// Body decoded as UTF-8 (lossy)
    pub body: String,
    /// True when the transport stopped reading because the body was too long
    pub truncated: bool,
}

#[cfg(test)]
impl FetchedPage {
    /// A successful `text/html` page with no declared length
    pub fn html(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            content_type: Some("text/html".to_string()),
            content_length: None,
            body: body.into(),
            truncated: false,
        }
    }
}

/// Transport level failures. The crawl loop logs these and moves on.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("request failed: {0}")]
    Request(String),
}

impl From<reqwest::Error> for FetchError {
    // Same buckets a link checker would use: timeout first, then connection
    // trouble (DNS included), then everything else.
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            FetchError::Timeout
        } else if error.is_connect() {
            FetchError::Connect(error.to_string())
        } else {
            FetchError::Request(error.to_string())
        }
    }
}

/// Reasons a fetched page is not parsed for links.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Ineligible {
    #[error("HTTP status code {0}")]
    Status(u16),
    #[error("content type {0:?} is not text/html")]
    ContentType(Option<String>),
    #[error("declared length {declared} exceeds {max} bytes")]
    TooLong { declared: u64, max: u64 },
    #[error("unparseable Content-Length {0:?}")]
    BadLength(String),
    #[error("body longer than {0} bytes")]
    Truncated(u64),
}

// The crawl loop only ever talks to this trait
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches `url`, giving up after `timeout`.
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<FetchedPage, FetchError>;
}

// Decides whether a page should be parsed for links
//
// Rules (in this order):
// 1. status must be 2xx
// 2. Content-Type must be exactly "text/html" or start with "text/html;"
//    (a missing header is not HTML)
// 3. a declared Content-Length must parse and be <= max_length
// 4. the transport must not have cut the body short
pub fn check_eligible(page: &FetchedPage, max_length: u64) -> Result<(), Ineligible> {
    if !(200..300).contains(&page.status) {
        return Err(Ineligible::Status(page.status));
    }

    match page.content_type.as_deref() {
        Some(ct) if ct == "text/html" || ct.starts_with("text/html;") => {}
        other => return Err(Ineligible::ContentType(other.map(str::to_string))),
    }

    if let Some(raw) = page.content_length.as_deref() {
        let declared: u64 = raw
            .trim()
            .parse()
            .map_err(|_| Ineligible::BadLength(raw.to_string()))?;
        if declared > max_length {
            return Err(Ineligible::TooLong {
                declared,
                max: max_length,
            });
        }
    }

    if page.truncated {
        return Err(Ineligible::Truncated(max_length));
    }

    Ok(())
}

// Real fetcher backed by a reqwest Client
//
// The client is built once and reused for every request (connection pooling).
// Bodies are read chunk by chunk and reading stops once body_limit bytes
// have been exceeded, so a huge file linked from a directory listing never
// gets downloaded in full.
pub struct HttpFetcher {
    client: Client,
    body_limit: u64,
}

impl HttpFetcher {
    pub fn new(body_limit: u64) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, body_limit })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<FetchedPage, FetchError> {
        let mut response = self.client.get(url).timeout(timeout).send().await?;

        let header = |name: HeaderName| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        let content_type = header(CONTENT_TYPE);
        let content_length = header(CONTENT_LENGTH);
        let status = response.status().as_u16();

        let mut bytes = Vec::new();
        let mut truncated = false;
        while let Some(chunk) = response.chunk().await? {
            bytes.extend_from_slice(&chunk);
            if bytes.len() as u64 > self.body_limit {
                truncated = true;
                break;
            }
        }

        Ok(FetchedPage {
            status,
            content_type,
            content_length,
            body: String::from_utf8_lossy(&bytes).into_owned(),
            truncated,
        })
    }
}
