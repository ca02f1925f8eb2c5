// src/report/render.rs
// =============================================================================
// Turns a RunReport into the plain-text email body and its subject line.
//
// Layout (two-space indent for page lines):
//
//   Website Monitoring Report
//   Completed in 1234ms
//   Checked at: 2024-05-01T08:30:00.123Z
//
//   Website: https://example.com
//   Overall Status: UP
//     Page: https://example.com/
//     Status: UP
//     Status Code: 200
//     Response Time: 87ms
//     Content Check (welcome): PASSED
//
// Optional lines (status code, response time, error, site errors) are only
// written when there is something to show.
// =============================================================================

use std::fmt::Write;

use super::model::{RunReport, SiteReport};

pub const ALL_UP_SUBJECT: &str = "All websites are UP";

// Subject line for the report email
pub fn subject(report: &RunReport) -> String {
    if report.all_up() {
        ALL_UP_SUBJECT.to_string()
    } else {
        format!("Website Monitoring Alert - {} issues detected", report.down_count())
    }
}

// Renders the full report text
pub fn render_text(report: &RunReport) -> String {
    let mut out = String::new();

    out.push_str("Website Monitoring Report\n");
    // write! into a String cannot fail, so the fmt::Result is ignored
    let _ = writeln!(out, "Completed in {}ms", report.total_elapsed_ms);
    let _ = writeln!(out, "Checked at: {}", report.timestamp());
    out.push('\n');

    for site in &report.sites {
        render_site(&mut out, site);
    }

    out
}

fn render_site(out: &mut String, site: &SiteReport) {
    let _ = writeln!(out, "Website: {}", site.url);
    let _ = writeln!(out, "Overall Status: {}", if site.is_up { "UP" } else { "DOWN" });

    for page in &site.pages {
        let _ = writeln!(out, "  Page: {}", page.url);
        let _ = writeln!(out, "  Status: {}", page.status.as_str());
        if let Some(code) = page.status_code {
            let _ = writeln!(out, "  Status Code: {}", code);
        }
        if let Some(ms) = page.response_time_ms {
            let _ = writeln!(out, "  Response Time: {}ms", ms);
        }
        let _ = writeln!(
            out,
            "  Content Check ({}): {}",
            page.expected_content,
            page.content_check.as_str()
        );
        if let Some(error) = &page.error {
            let _ = writeln!(out, "  Error: {}", error);
        }
        out.push('\n');
    }

    if !site.errors.is_empty() {
        out.push_str("  Errors:\n");
        for error in &site.errors {
            let _ = writeln!(out, "  - {}", error);
        }
    }

    out.push('\n');
}
