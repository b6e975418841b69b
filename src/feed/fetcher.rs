use futures::StreamExt;
use reqwest::header::{ETAG, IF_MODIFIED_SINCE, IF_NONE_MATCH, LAST_MODIFIED};
use reqwest::StatusCode;
use thiserror::Error;

use super::cache::FeedCacheEntry;

const MAX_FEED_SIZE: usize = 10 * 1024 * 1024; // 10MB

/// Errors from a single feed fetch.
///
/// All of these are feed-local and cycle-local: the scheduler logs them
/// and retries the feed naturally on the next cycle.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(reqwest::Error),
    /// Request exceeded the client timeout
    #[error("Request timed out")]
    Timeout,
    /// HTTP response with a status that is neither 2xx nor 304
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Response body exceeded the 10MB size limit
    #[error("Response too large")]
    ResponseTooLarge,
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::Network(err)
        }
    }
}

/// Classified result of one conditional GET.
#[derive(Debug)]
pub enum FetchOutcome {
    /// 304: the cached copy is current; nothing to parse.
    NotModified,
    /// 2xx with a body, plus whatever validators the response carried.
    Changed {
        body: Vec<u8>,
        etag: Option<String>,
        last_modified: Option<String>,
    },
}

/// Performs one conditional GET against a feed URL.
///
/// Cached validators are attached as `If-None-Match` and
/// `If-Modified-Since`; both may be present, and a server satisfying
/// either returns 304. The cache entry is read-only here — on a changed
/// response the caller applies the returned validators, so a fetch
/// error can never half-update the entry.
///
/// # Errors
///
/// See [`FetchError`]. A non-2xx, non-304 status is an error, not an
/// outcome.
pub async fn fetch_conditional(
    client: &reqwest::Client,
    url: &str,
    cache: &FeedCacheEntry,
) -> Result<FetchOutcome, FetchError> {
    let mut request = client.get(url);
    if let Some(etag) = cache.etag() {
        request = request.header(IF_NONE_MATCH, etag);
    }
    if let Some(last_modified) = cache.last_modified() {
        request = request.header(IF_MODIFIED_SINCE, last_modified);
    }

    let response = request.send().await?;

    if response.status() == StatusCode::NOT_MODIFIED {
        return Ok(FetchOutcome::NotModified);
    }
    if !response.status().is_success() {
        return Err(FetchError::HttpStatus(response.status().as_u16()));
    }

    let etag = header_value(&response, ETAG);
    let last_modified = header_value(&response, LAST_MODIFIED);
    let body = read_limited_bytes(response, MAX_FEED_SIZE).await?;

    Ok(FetchOutcome::Changed {
        body,
        etag,
        last_modified,
    })
}

fn header_value(response: &reqwest::Response, name: reqwest::header::HeaderName) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
}

/// Reads a response body with a hard size cap.
///
/// Checks `Content-Length` up front when present, then enforces the cap
/// while streaming so a server that lies about (or omits) the header
/// still cannot exhaust memory.
async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, FetchError> {
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(FetchError::ResponseTooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(FetchError::from)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(FetchError::ResponseTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}
