//! HTTP fetcher implementation
//!
//! This module handles the request side of a check:
//! - Building the per-host HTTP client (own cookie jar, relaxed TLS floor)
//! - The fixed header profile sent with every request
//! - GET requests and their OK/NG classification

use crate::config::{validate, CheckerConfig, TlsFloor};
use crate::url::Link;
use crate::{ConfigError, LinkCheckError};
use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_ENCODING, ACCEPT_LANGUAGE, CACHE_CONTROL,
    CONNECTION, USER_AGENT,
};
use reqwest::{Client, ClientBuilder};
use std::fmt;

/// Result of checking a single link
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The server answered with a status below 400
    Ok,

    /// The request failed or the server answered with an error status
    Ng(NgReason),
}

impl FetchOutcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }
}

/// Why a link was classified NG
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NgReason {
    /// HTTP status code >= 400
    Status(u16),

    /// DNS, connect, TLS, timeout or other transport failure
    Transport(String),
}

impl fmt::Display for NgReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(code) => write!(f, "status {}", code),
            Self::Transport(message) => write!(f, "{}", message),
        }
    }
}

/// Builds the header set sent with every check request
///
/// # Errors
///
/// Fails if `user_agent` is not a legal header value.
pub fn request_headers(
    user_agent: &str,
) -> Result<HeaderMap, reqwest::header::InvalidHeaderValue> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_str(user_agent)?);
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
    headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("gzip, deflate"));
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("max-age=0"));
    headers.insert(
        HeaderName::from_static("sec-fetch-dest"),
        HeaderValue::from_static("document"),
    );
    Ok(headers)
}

/// Builds the HTTP client owned by one host worker
///
/// Every call returns a client with a fresh cookie jar, so cookies set by
/// one host are never sent to another. Redirects are followed with
/// reqwest's default policy.
///
/// # Example
///
/// ```no_run
/// use linkchecker::checker::build_host_client;
/// use linkchecker::config::CheckerConfig;
///
/// let client = build_host_client(&CheckerConfig::default()).unwrap();
/// ```
pub fn build_host_client(config: &CheckerConfig) -> Result<Client, LinkCheckError> {
    validate(config)?;
    let headers = request_headers(&config.user_agent)
        .map_err(|e| ConfigError::Validation(format!("invalid user agent header: {}", e)))?;

    let builder = Client::builder()
        .default_headers(headers)
        .timeout(config.timeout())
        .cookie_store(true);
    let client = with_tls_floor(builder, config.min_tls).build()?;

    Ok(client)
}

/// Applies the minimum TLS version to a client builder
///
/// The native backend cannot express a 1.3 floor, so that floor switches
/// the client to rustls.
pub(crate) fn with_tls_floor(builder: ClientBuilder, floor: TlsFloor) -> ClientBuilder {
    let builder = builder.min_tls_version(floor.as_reqwest());
    if floor == TlsFloor::Tls13 {
        builder.use_rustls_tls()
    } else {
        builder
    }
}

/// Fetches a link and classifies the result
///
/// # Classification
///
/// | Condition | Outcome |
/// |-----------|---------|
/// | Transport error (DNS, connect, TLS, timeout) | NG with the error message |
/// | Final status >= 400 | NG with the status code |
/// | Anything else, after redirects | OK |
///
/// The body is never inspected, but it is always read to the end so the
/// connection can go back to the client's pool.
pub async fn fetch_link(client: &Client, link: &Link) -> FetchOutcome {
    let response = match client.get(link.url().clone()).send().await {
        Ok(response) => response,
        Err(e) => {
            tracing::debug!("Request for {} failed: {}", link, e);
            return FetchOutcome::Ng(NgReason::Transport(describe_error(e)));
        }
    };

    let status = response.status();
    tracing::trace!("{} answered {}", link, status);

    if let Err(e) = response.bytes().await {
        tracing::debug!("Failed to drain body of {}: {}", link, e);
    }

    if status.as_u16() >= 400 {
        FetchOutcome::Ng(NgReason::Status(status.as_u16()))
    } else {
        FetchOutcome::Ok
    }
}

/// Renders a transport error without repeating the URL
fn describe_error(error: reqwest::Error) -> String {
    let timed_out = error.is_timeout();
    let message = error.without_url().to_string();
    if timed_out && !message.contains("timed out") {
        format!("timed out: {}", message)
    } else {
        message
    }
}
