// src/checker/content.rs
// =============================================================================
// This module checks that a page is reachable AND shows an expected keyword.
//
// How one check works:
// 1. Lower-case the keyword
// 2. GET the URL once (no retries), bounded by a 10 second timeout
// 3. Status outside 200..400 -> failure "HTTP Status Code: <code>"
// 4. Strip the HTML down to visible text and lower-case it
// 5. Keyword found -> success, otherwise failure with a 500 char snippet
//
// Every failure is returned as a value. Nothing in here panics or returns
// Err, so one bad page can never stop the rest of the run.
//
// Rust concepts:
// - Generics: ContentChecker<F> works with any HttpFetcher
// - tokio::time::timeout: Wraps a future and gives up after a deadline
// =============================================================================

use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use super::fetch::{FetchError, HttpFetcher, Scheme, TransportKind};
use super::text::extract_text;

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Maximum number of characters kept in a debug snippet
pub const SNIPPET_CHARS: usize = 500;

// Why a page check failed
//
// The Display text of each variant is the exact error message that ends up
// in the report.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CheckFailure {
    #[error("HTTP Status Code: {0}")]
    Status(u16),

    #[error("Keyword \"{keyword}\" not found in page content")]
    KeywordMissing { keyword: String, snippet: String },

    #[error("Request timeout")]
    Timeout,

    #[error("{message}")]
    Transport { kind: TransportKind, message: String },
}

impl CheckFailure {
    /// Short machine-readable name of the failure category
    pub fn kind(&self) -> &'static str {
        match self {
            CheckFailure::Status(_) => "status",
            CheckFailure::KeywordMissing { .. } => "keyword_missing",
            CheckFailure::Timeout => "timeout",
            CheckFailure::Transport { kind, .. } => kind.as_str(),
        }
    }
}

impl From<FetchError> for CheckFailure {
    fn from(error: FetchError) -> Self {
        match error {
            FetchError::Timeout => CheckFailure::Timeout,
            FetchError::Transport { kind, message } => CheckFailure::Transport { kind, message },
        }
    }
}

/// The outcome of checking a single page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    /// Status code of the response, if one arrived
    pub status_code: Option<u16>,
    /// None means the check passed
    pub failure: Option<CheckFailure>,
}

impl CheckResult {
    fn passed(status_code: u16) -> Self {
        Self {
            status_code: Some(status_code),
            failure: None,
        }
    }

    fn failed(status_code: Option<u16>, failure: CheckFailure) -> Self {
        Self {
            status_code,
            failure: Some(failure),
        }
    }

    pub fn success(&self) -> bool {
        self.failure.is_none()
    }

    pub fn error_kind(&self) -> Option<&'static str> {
        self.failure.as_ref().map(CheckFailure::kind)
    }

    pub fn error_message(&self) -> Option<String> {
        self.failure.as_ref().map(ToString::to_string)
    }

    /// Start of the page text, only kept when the keyword was missing
    pub fn debug_snippet(&self) -> Option<&str> {
        match &self.failure {
            Some(CheckFailure::KeywordMissing { snippet, .. }) => Some(snippet),
            _ => None,
        }
    }
}

// A serializable view used by `site-monitor check --json`
#[derive(Debug, Serialize)]
pub struct CheckSummary<'a> {
    pub url: &'a str,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug_snippet: Option<&'a str>,
}

impl<'a> CheckSummary<'a> {
    pub fn new(url: &'a str, result: &'a CheckResult) -> Self {
        Self {
            url,
            success: result.success(),
            status_code: result.status_code,
            error_kind: result.error_kind(),
            error: result.error_message(),
            debug_snippet: result.debug_snippet(),
        }
    }
}

/// Checks pages for reachability and an expected keyword
pub struct ContentChecker<F> {
    fetcher: F,
    timeout: Duration,
}

impl<F: HttpFetcher> ContentChecker<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    // Checks one page
    //
    // Parameters:
    //   url: the full page URL
    //   keyword: text that must appear somewhere in the visible page text
    //
    // Returns: CheckResult (never an Err, every failure is inside it)
    pub async fn check(&self, url: &str, keyword: &str) -> CheckResult {
        let keyword = keyword.to_lowercase();
        debug!(url, scheme = ?Scheme::detect(url), "fetching page");

        // The fetcher gets the timeout too, but this outer deadline is the
        // one we rely on. When it fires the request future is dropped.
        let fetched = tokio::time::timeout(self.timeout, self.fetcher.get(url, self.timeout)).await;

        let page = match fetched {
            Err(_elapsed) => return CheckResult::failed(None, CheckFailure::Timeout),
            Ok(Err(error)) => return CheckResult::failed(None, error.into()),
            Ok(Ok(page)) => page,
        };

        if !(200..400).contains(&page.status) {
            return CheckResult::failed(Some(page.status), CheckFailure::Status(page.status));
        }

        let visible_text = extract_text(&page.body).to_lowercase();

        if visible_text.contains(&keyword) {
            CheckResult::passed(page.status)
        } else {
            let snippet = visible_text.chars().take(SNIPPET_CHARS).collect();
            CheckResult::failed(
                Some(page.status),
                CheckFailure::KeywordMissing { keyword, snippet },
            )
        }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What does (200..400).contains(&code) do?
//    - 200..400 is a Range: it includes 200 and excludes 400
//    - So 2xx and 3xx pass, everything else fails
//
// 2. Why .chars().take(500) instead of &text[..500]?
//    - Slicing a String works on BYTES and panics in the middle of a
//      multi-byte character like 'é'
//    - chars() walks whole characters, so it is always safe
//
// 3. What is `impl From<FetchError> for CheckFailure`?
//    - It teaches Rust how to convert one error type into another
//    - That is what makes `error.into()` work above
// -----------------------------------------------------------------------------
