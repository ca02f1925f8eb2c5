// src/checker/fetch.rs
// =============================================================================
// This module is the HTTP layer of the content checker.
//
// Key functionality:
// - HttpFetcher trait: "GET this URL and give me the status + whole body"
// - ReqwestFetcher: the real implementation on top of reqwest
// - Classifies reqwest failures (timeout, DNS, connection, TLS, other)
//
// The checker only talks to the trait, so tests can plug in a fake
// fetcher that never touches the network.
//
// Rust concepts:
// - Traits: Like interfaces, they describe behaviour without an implementation
// - async-trait: Lets a trait method be async
// - thiserror: Derives Display/Error for our error enum
// =============================================================================

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

/// A fully downloaded HTTP response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub status: u16,
    pub body: String,
}

/// Broad category of a transport failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    /// Could not resolve hostname
    Dns,
    /// Connection refused, reset or unreachable
    Connect,
    /// SSL/TLS handshake or certificate problem
    Tls,
    /// Anything else (bad URL, body decode error, ...)
    Other,
}

impl TransportKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TransportKind::Dns => "dns",
            TransportKind::Connect => "connect",
            TransportKind::Tls => "tls",
            TransportKind::Other => "transport",
        }
    }
}

/// Why a fetch produced no response
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("Request timeout")]
    Timeout,

    #[error("{message}")]
    Transport { kind: TransportKind, message: String },
}

// The URL scheme decides which transport the request goes over.
// Anything that is not https:// is sent as plain http.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    pub fn detect(url: &str) -> Self {
        if url.starts_with("https://") {
            Scheme::Https
        } else {
            Scheme::Http
        }
    }
}

/// Performs one GET request and buffers the full body
#[async_trait]
pub trait HttpFetcher: Send + Sync {
    async fn get(&self, url: &str, timeout: Duration) -> Result<FetchedPage, FetchError>;
}

// HttpFetcher backed by a single reusable reqwest client
//
// Redirects are NOT followed: a 301/302 is reported back with its own
// status code and (usually empty) body.
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: Client,
}

impl ReqwestFetcher {
    pub fn new() -> anyhow::Result<Self> {
        let client = Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .user_agent(concat!("site-monitor/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpFetcher for ReqwestFetcher {
    async fn get(&self, url: &str, timeout: Duration) -> Result<FetchedPage, FetchError> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(categorize_error)?;

        let status = response.status().as_u16();

        // Read the whole body before anyone looks at it
        let body = response.text().await.map_err(categorize_error)?;

        Ok(FetchedPage { status, body })
    }
}

// Converts a reqwest error into our FetchError
//
// reqwest errors can happen for many reasons:
// - Network timeout
// - DNS resolution failure
// - Connection refused
// - SSL certificate issues
fn categorize_error(error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        return FetchError::Timeout;
    }

    // The Display of reqwest::Error hides the root cause, so walk the chain
    let message = error_chain(&error);
    let lowered = message.to_lowercase();

    let kind = if error.is_connect() {
        if lowered.contains("dns") || lowered.contains("resolve") {
            TransportKind::Dns
        } else {
            TransportKind::Connect
        }
    } else if lowered.contains("certificate") || lowered.contains("ssl") || lowered.contains("tls") {
        TransportKind::Tls
    } else {
        TransportKind::Other
    };

    FetchError::Transport { kind, message }
}

fn error_chain(error: &(dyn std::error::Error + 'static)) -> String {
    let mut message = error.to_string();
    let mut source = error.source();

    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }

    message
}
