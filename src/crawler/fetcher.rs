//! HTTP fetcher implementation
//!
//! This module handles every HTTP request the discovery pipeline makes:
//! - Building the HTTP client with the crawler's user agent and timeout
//! - Per-request user agent overrides for social profile pages
//! - Streaming the body so a mid-body failure still yields a partial page
//! - Decoding the body with the charset declared in Content-Type
//! - Classifying failures without ever returning an error
//!
//! A fetch is attempted exactly once. Failures are values, not errors: the
//! caller treats them as "this path yields nothing" and falls through.

use crate::config::Config;
use encoding_rs::{Encoding, UTF_8};
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use reqwest::Client;
use std::future::Future;
use std::time::Duration;

/// Bytes kept from a single body; larger pages are truncated
///
/// Social profile pages routinely run to several hundred kilobytes of inline
/// script, so the cap sits well above that.
pub const MAX_BODY_BYTES: usize = 4 * 1024 * 1024;

/// A single GET to perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Absolute URL to fetch
    pub url: String,

    /// User agent replacing the client default for this request
    pub user_agent: Option<String>,
}

impl FetchRequest {
    /// A plain page request using the client's default headers
    pub fn page(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            user_agent: None,
        }
    }

    /// Overrides the user agent for this request
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}

/// Why a fetch did not produce a complete page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    /// The request or body read exceeded the timeout
    Timeout,

    /// Connection could not be established
    Connect,

    /// The response was not a text document
    ContentMismatch(String),

    /// Any other transport or decoding error
    Other(String),
}

impl std::fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Timeout => write!(f, "request timeout"),
            Self::Connect => write!(f, "connection failed"),
            Self::ContentMismatch(content_type) => {
                write!(f, "non-HTML content ({})", content_type)
            }
            Self::Other(message) => write!(f, "{}", message),
        }
    }
}

/// Result of a fetch operation
///
/// `body` may be non-empty even when the fetch failed: it then holds whatever
/// part of the page arrived before the failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResult {
    /// Raw (possibly partial) response body
    pub body: String,

    /// HTTP status code, when a response arrived
    pub status: Option<u16>,

    /// Set when the fetch did not complete
    pub failure: Option<FetchFailure>,
}

impl FetchResult {
    /// A complete response, whatever its status code
    pub fn success(body: impl Into<String>, status: u16) -> Self {
        Self {
            body: body.into(),
            status: Some(status),
            failure: None,
        }
    }

    /// A fetch that produced nothing
    pub fn failed(failure: FetchFailure) -> Self {
        Self {
            body: String::new(),
            status: None,
            failure: Some(failure),
        }
    }

    /// A fetch that failed after part of the body arrived
    pub fn partial(body: impl Into<String>, status: Option<u16>, failure: FetchFailure) -> Self {
        Self {
            body: body.into(),
            status,
            failure: Some(failure),
        }
    }

    /// Returns true if the page was fetched completely
    pub fn is_ok(&self) -> bool {
        self.failure.is_none()
    }

    /// Returns true if any page content is available, complete or not
    pub fn has_body(&self) -> bool {
        !self.body.trim().is_empty()
    }
}

/// Source of pages for the discovery pipeline
///
/// Implementations must never panic or block indefinitely; every failure is
/// reported through [`FetchResult`].
pub trait PageFetcher: Send + Sync {
    /// Performs one GET request
    fn fetch(&self, request: FetchRequest) -> impl Future<Output = FetchResult> + Send;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    let timeout = Duration::from_secs(config.crawler.request_timeout);

    Client::builder()
        .user_agent(config.user_agent.header_value())
        .timeout(timeout)
        .connect_timeout(timeout)
        .gzip(true)
        .brotli(true)
        .build()
}

/// reqwest-backed [`PageFetcher`]
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher from the crawler configuration
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }

    /// Wraps an already configured client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl PageFetcher for HttpFetcher {
    fn fetch(&self, request: FetchRequest) -> impl Future<Output = FetchResult> + Send {
        fetch_url(&self.client, request)
    }
}

/// Fetches a URL once, streaming the body
///
/// # Request Flow
///
/// 1. Send GET (redirects followed by the client)
///    - Transport error → failed, empty body
/// 2. Check Content-Type
///    - Present and not textual → ContentMismatch, body not read
/// 3. Read the body chunk by chunk
///    - Error mid-body → failed, partial body kept
///
/// The status code is recorded but never gates the result.
pub async fn fetch_url(client: &Client, request: FetchRequest) -> FetchResult {
    let mut builder = client.get(&request.url);
    if let Some(user_agent) = &request.user_agent {
        builder = builder.header(USER_AGENT, user_agent.as_str());
    }

    let mut response = match builder.send().await {
        Ok(response) => response,
        Err(e) => {
            tracing::debug!("Fetch failed for {}: {}", request.url, e);
            return FetchResult::failed(classify_error(&e));
        }
    };

    let status = response.status().as_u16();

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if !is_textual(&content_type) {
        tracing::debug!("Skipping {} ({})", request.url, content_type);
        return FetchResult::failed(FetchFailure::ContentMismatch(content_type));
    }

    let mut body = Vec::new();
    loop {
        match response.chunk().await {
            Ok(Some(chunk)) => {
                let room = MAX_BODY_BYTES - body.len();
                if chunk.len() >= room {
                    body.extend_from_slice(&chunk[..room]);
                    tracing::debug!(
                        "Truncated {} at {} bytes",
                        request.url,
                        MAX_BODY_BYTES
                    );
                    break;
                }
                body.extend_from_slice(&chunk);
            }
            Ok(None) => break,
            Err(e) => {
                tracing::debug!(
                    "Body read failed for {} after {} bytes: {}",
                    request.url,
                    body.len(),
                    e
                );
                return FetchResult::partial(
                    decode_body(&body, &content_type),
                    Some(status),
                    classify_error(&e),
                );
            }
        }
    }

    tracing::debug!("Fetched {} ({}, {} bytes)", request.url, status, body.len());
    FetchResult::success(decode_body(&body, &content_type), status)
}

/// Decodes a body with the Content-Type charset, UTF-8 when absent or unknown
///
/// A byte order mark overrides the declared charset.
fn decode_body(bytes: &[u8], content_type: &str) -> String {
    let encoding = charset_label(content_type)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .unwrap_or(UTF_8);
    let (text, _, _) = encoding.decode(bytes);
    text.into_owned()
}

fn charset_label(content_type: &str) -> Option<&str> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        if name.trim().eq_ignore_ascii_case("charset") {
            Some(value.trim().trim_matches('"'))
        } else {
            None
        }
    })
}

/// Maps a reqwest error onto a [`FetchFailure`]
fn classify_error(e: &reqwest::Error) -> FetchFailure {
    if e.is_timeout() {
        FetchFailure::Timeout
    } else if e.is_connect() {
        FetchFailure::Connect
    } else {
        FetchFailure::Other(e.to_string())
    }
}

/// A missing Content-Type is given the benefit of the doubt
fn is_textual(content_type: &str) -> bool {
    let content_type = content_type.to_ascii_lowercase();
    content_type.is_empty()
        || content_type.starts_with("text/")
        || content_type.contains("html")
        || content_type.contains("xml")
        || content_type.contains("json")
}
