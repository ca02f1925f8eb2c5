// src/report/model.rs
// =============================================================================
// The data collected during a monitoring run.
//
//   RunReport
//   └── SiteReport (one per configured website, in config order)
//       └── PageReport (one per configured page, in config order)
//
// All of these derive Serialize so `site-monitor run --json` can print them.
// =============================================================================

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::checker::CheckResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PageStatus {
    Up,
    Down,
}

impl PageStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PageStatus::Up => "UP",
            PageStatus::Down => "DOWN",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CheckOutcome {
    Passed,
    Failed,
}

impl CheckOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            CheckOutcome::Passed => "PASSED",
            CheckOutcome::Failed => "FAILED",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageReport {
    pub url: String,
    pub status: PageStatus,
    pub status_code: Option<u16>,
    pub response_time_ms: Option<u64>,
    pub expected_content: String,
    pub content_check: CheckOutcome,
    pub error: Option<String>,
}

impl PageReport {
    // Builds the report line for a check that ran to completion
    pub fn from_check(url: String, expected_content: &str, result: &CheckResult, elapsed_ms: u64) -> Self {
        let (status, content_check) = if result.success() {
            (PageStatus::Up, CheckOutcome::Passed)
        } else {
            (PageStatus::Down, CheckOutcome::Failed)
        };

        Self {
            url,
            status,
            status_code: result.status_code,
            response_time_ms: Some(elapsed_ms),
            expected_content: expected_content.to_string(),
            content_check,
            error: result.error_message(),
        }
    }

    // Builds the report line for a check that blew up before producing a result
    pub fn crashed(url: String, expected_content: &str, error: String) -> Self {
        Self {
            url,
            status: PageStatus::Down,
            status_code: None,
            response_time_ms: None,
            expected_content: expected_content.to_string(),
            content_check: CheckOutcome::Failed,
            error: Some(error),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteReport {
    pub url: String,
    pub is_up: bool,
    pub pages: Vec<PageReport>,
    pub errors: Vec<String>,
}

impl SiteReport {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            is_up: true,
            pages: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Appends a page, keeping `is_up` and `errors` in sync with it
    pub fn push(&mut self, page: PageReport) {
        if page.status == PageStatus::Down {
            self.is_up = false;
            let error = page.error.as_deref().unwrap_or("unknown error");
            self.errors.push(format!("Page {}: {}", page.url, error));
        }
        self.pages.push(page);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub total_elapsed_ms: u64,
    pub checked_at: DateTime<Utc>,
    pub sites: Vec<SiteReport>,
}

impl RunReport {
    pub fn down_count(&self) -> usize {
        self.sites.iter().filter(|site| !site.is_up).count()
    }

    pub fn all_up(&self) -> bool {
        self.down_count() == 0
    }

    /// e.g. 2024-05-01T08:30:00.123Z
    pub fn timestamp(&self) -> String {
        self.checked_at.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(url: &str, status: PageStatus, error: Option<&str>) -> PageReport {
        PageReport {
            url: url.to_string(),
            status,
            status_code: Some(200),
            response_time_ms: Some(5),
            expected_content: "x".to_string(),
            content_check: if status == PageStatus::Up {
                CheckOutcome::Passed
            } else {
                CheckOutcome::Failed
            },
            error: error.map(str::to_string),
        }
    }

    #[test]
    fn test_site_is_up_only_if_every_page_is_up() {
        let mut site = SiteReport::new("https://a.test");
        site.push(page("https://a.test/", PageStatus::Up, None));
        assert!(site.is_up);
        assert!(site.errors.is_empty());

        site.push(page("https://a.test/x", PageStatus::Down, Some("HTTP Status Code: 500")));
        site.push(page("https://a.test/y", PageStatus::Up, None));
        assert!(!site.is_up);
        assert_eq!(site.errors, vec!["Page https://a.test/x: HTTP Status Code: 500"]);
        assert_eq!(site.pages.len(), 3);
    }

    #[test]
    fn test_timestamp_is_iso8601_with_millis() {
        let checked_at = DateTime::parse_from_rfc3339("2024-05-01T08:30:00.123Z")
            .unwrap()
            .with_timezone(&Utc);
        let report = RunReport {
            total_elapsed_ms: 0,
            checked_at,
            sites: Vec::new(),
        };

        assert_eq!(report.timestamp(), "2024-05-01T08:30:00.123Z");
        assert!(report.all_up());
    }

    #[test]
    fn test_serializes_status_uppercase() {
        let json = serde_json::to_value(page("u", PageStatus::Down, Some("e"))).unwrap();
        assert_eq!(json["status"], "DOWN");
        assert_eq!(json["contentCheck"], "FAILED");
        assert_eq!(json["responseTimeMs"], 5);
    }
}
