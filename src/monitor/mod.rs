// src/monitor/mod.rs
// =============================================================================
// This module runs every configured check and collects the results.
//
// How it works:
// 1. For each website (in config order)
// 2.   For each page (in config order)
// 3.     Build the full URL (website URL + page path)
// 4.     Run the content check and time it
// 5.     Append a PageReport to the website's SiteReport
// 6. Return the RunReport with the total elapsed time
//
// Checks run ONE AT A TIME. A slow page delays every page after it, and
// response times add up to the total.
//
// A failing page never stops the run. Even a panic inside a check is caught
// and recorded as a DOWN page.
//
// Rust concepts:
// - catch_unwind: Turns a panic inside a future into an Err value
// - AssertUnwindSafe: Tells the compiler we accept the (tiny) risk of
//   observing state left half-updated by a panic
// =============================================================================

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::Instant;

use chrono::Utc;
use futures::FutureExt; // gives us .catch_unwind() on futures
use tracing::{info, warn};

use crate::checker::{ContentChecker, HttpFetcher};
use crate::config::Website;
use crate::report::{PageReport, RunReport, SiteReport};

pub struct Monitor<F> {
    checker: ContentChecker<F>,
}

impl<F: HttpFetcher> Monitor<F> {
    pub fn new(checker: ContentChecker<F>) -> Self {
        Self { checker }
    }

    // Checks every page of every website, in order
    //
    // Parameters:
    //   websites: the configured targets (borrowed, never modified)
    //
    // Returns: RunReport with one SiteReport per website
    pub async fn run_all(&self, websites: &[Website]) -> RunReport {
        let started = Instant::now();
        let mut sites = Vec::with_capacity(websites.len());

        for website in websites {
            info!(website = %website.website_url, pages = website.pages.len(), "checking website");
            let mut site = SiteReport::new(website.website_url.as_str());

            for page in &website.pages {
                let url = website.page_url(page);
                let report = self.check_page(url, &page.expected_content).await;
                site.push(report);
            }

            sites.push(site);
        }

        RunReport {
            total_elapsed_ms: started.elapsed().as_millis() as u64,
            checked_at: Utc::now(),
            sites,
        }
    }

    async fn check_page(&self, url: String, expected_content: &str) -> PageReport {
        let started = Instant::now();
        let outcome = AssertUnwindSafe(self.checker.check(&url, expected_content))
            .catch_unwind()
            .await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match outcome {
            Ok(result) => {
                match (result.error_kind(), result.error_message()) {
                    (Some(kind), Some(error)) => warn!(%url, elapsed_ms, kind, %error, "page DOWN"),
                    _ => info!(%url, elapsed_ms, "page UP"),
                }
                PageReport::from_check(url, expected_content, &result, elapsed_ms)
            }
            Err(panic) => {
                let error = format!("Unexpected error: {}", panic_message(panic.as_ref()));
                warn!(%url, %error, "page check crashed");
                PageReport::crashed(url, expected_content, error)
            }
        }
    }
}

// Panic payloads are usually a &str or a String
fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic during page check".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::fetch::{FetchError, FetchedPage, TransportKind};
    use crate::config::PageTarget;
    use crate::report::subject;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    // Fake fetcher: answers from a URL -> (status, body) table and records
    // the order in which URLs were requested
    #[derive(Default)]
    struct TableFetcher {
        pages: HashMap<String, (u16, String)>,
        requested: Arc<Mutex<Vec<String>>>,
    }

    impl TableFetcher {
        fn with(mut self, url: &str, status: u16, body: &str) -> Self {
            self.pages.insert(url.to_string(), (status, body.to_string()));
            self
        }
    }

    #[async_trait]
    impl HttpFetcher for TableFetcher {
        async fn get(&self, url: &str, _timeout: Duration) -> Result<FetchedPage, FetchError> {
            self.requested.lock().unwrap().push(url.to_string());

            if url.contains("panic") {
                panic!("fetcher exploded");
            }

            match self.pages.get(url) {
                Some((status, body)) => Ok(FetchedPage {
                    status: *status,
                    body: body.clone(),
                }),
                None => Err(FetchError::Transport {
                    kind: TransportKind::Connect,
                    message: "connection refused".to_string(),
                }),
            }
        }
    }

    fn website(base: &str, pages: &[(&str, &str)]) -> Website {
        Website {
            website_url: base.to_string(),
            pages: pages
                .iter()
                .map(|(url, keyword)| PageTarget {
                    url: url.to_string(),
                    expected_content: keyword.to_string(),
                })
                .collect(),
        }
    }

    fn monitor(fetcher: TableFetcher) -> Monitor<TableFetcher> {
        Monitor::new(ContentChecker::new(fetcher))
    }

    #[tokio::test]
    async fn test_one_site_up_one_site_down() {
        let fetcher = TableFetcher::default()
            .with("https://a.test/", 200, "<h1>Alpha home</h1>")
            .with("https://a.test/docs", 200, "<p>Alpha docs</p>")
            .with("https://b.test/", 200, "<h1>Beta</h1>")
            .with("https://b.test/shop", 500, "oops");
        let websites = vec![
            website("https://a.test", &[("/", "alpha"), ("/docs", "docs")]),
            website("https://b.test", &[("/", "beta"), ("/shop", "shop")]),
        ];

        let report = monitor(fetcher).run_all(&websites).await;

        assert!(report.sites[0].is_up);
        assert!(!report.sites[1].is_up);
        assert_eq!(report.sites[1].errors, vec!["Page https://b.test/shop: HTTP Status Code: 500"]);
        assert_eq!(subject(&report), "Website Monitoring Alert - 1 issues detected");
    }

    #[tokio::test]
    async fn test_all_up_subject() {
        let fetcher = TableFetcher::default()
            .with("https://a.test/", 200, "Alpha")
            .with("https://b.test/", 301, "Beta moved");
        let websites = vec![
            website("https://a.test", &[("/", "ALPHA")]),
            website("https://b.test", &[("/", "beta")]),
        ];

        let report = monitor(fetcher).run_all(&websites).await;

        assert!(report.all_up());
        assert_eq!(subject(&report), "All websites are UP");
    }

    #[tokio::test]
    async fn test_pages_checked_in_config_order() {
        let fetcher = TableFetcher::default()
            .with("https://z.test/3", 200, "z")
            .with("https://z.test/1", 200, "z")
            .with("https://y.test/2", 200, "y");
        let websites = vec![
            website("https://z.test", &[("/3", "z"), ("/1", "z")]),
            website("https://y.test", &[("/2", "y")]),
        ];

        let requested = Arc::clone(&fetcher.requested);
        let report = monitor(fetcher).run_all(&websites).await;

        let reported: Vec<&str> = report
            .sites
            .iter()
            .flat_map(|site| site.pages.iter().map(|page| page.url.as_str()))
            .collect();
        assert_eq!(reported, vec!["https://z.test/3", "https://z.test/1", "https://y.test/2"]);

        assert_eq!(*requested.lock().unwrap(), reported);
    }

    #[tokio::test]
    async fn test_transport_failure_does_not_stop_the_run() {
        let fetcher = TableFetcher::default().with("https://a.test/after", 200, "still checked");
        let websites = vec![website("https://a.test", &[("/missing", "x"), ("/after", "still")])];

        let report = monitor(fetcher).run_all(&websites).await;
        let pages = &report.sites[0].pages;

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].error.as_deref(), Some("connection refused"));
        assert_eq!(pages[0].status_code, None);
        assert!(pages[0].response_time_ms.is_some());
        assert_eq!(pages[1].error, None);
        assert!(!report.sites[0].is_up);
    }

    #[tokio::test]
    async fn test_panicking_check_marks_page_down_and_continues() {
        let fetcher = TableFetcher::default().with("https://a.test/ok", 200, "fine");
        let websites = vec![website("https://a.test", &[("/panic", "x"), ("/ok", "fine")])];

        let report = monitor(fetcher).run_all(&websites).await;
        let pages = &report.sites[0].pages;

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].error.as_deref(), Some("Unexpected error: fetcher exploded"));
        assert_eq!(pages[0].response_time_ms, None);
        assert!(pages[1].error.is_none());
        assert!(!report.sites[0].is_up);
    }
}
