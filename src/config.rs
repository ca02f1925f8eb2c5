// src/config.rs
// =============================================================================
// This file defines the monitoring configuration and how it is loaded.
//
// The config is a JSON file (config.json by default):
//
//   {
//     "websites": [
//       { "websiteUrl": "https://example.com",
//         "pages": [ { "url": "/", "expectedContent": "Welcome" } ] }
//     ],
//     "smtp":  { "service": "gmail", "port": 465, "secure": true },
//     "email": { "to": "ops@example.com" }
//   }
//
// SMTP credentials are NOT in the file. They come from the SMTP_USER and
// SMTP_PASS environment variables (optionally via a .env file) and are read
// exactly once in main.rs.
//
// Rust concepts:
// - serde derive: Generates the JSON -> struct conversion for us
// - #[serde(rename_all = "camelCase")]: website_url <-> "websiteUrl"
// - anyhow::Context: Adds a human-readable message to an error
// =============================================================================

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub websites: Vec<Website>,
    pub smtp: SmtpSettings,
    pub email: EmailSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Website {
    /// Base URL, e.g. "https://example.com"
    pub website_url: String,
    pub pages: Vec<PageTarget>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageTarget {
    /// Path appended to the website URL as-is, e.g. "/about"
    pub url: String,
    /// Keyword that must appear in the page text (case-insensitive)
    pub expected_content: String,
}

impl Website {
    // Builds the full URL of a page by plain string concatenation
    //
    // No normalisation: "https://a.test/" + "/x" stays "https://a.test//x"
    pub fn page_url(&self, page: &PageTarget) -> String {
        format!("{}{}", self.website_url, page.url)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SmtpSettings {
    /// Well-known provider name, e.g. "gmail" (used when host is not set)
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    /// true = implicit TLS (usually port 465), false = STARTTLS
    #[serde(default)]
    pub secure: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmailSettings {
    pub to: String,
}

impl Config {
    // Reads and validates the config file
    //
    // Returns: Config, or an error that names the file
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let config = Self::from_json(&raw)
            .with_context(|| format!("Invalid config file {}", path.display()))?;

        Ok(config)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.websites.is_empty() {
            bail!("no websites configured");
        }

        for website in &self.websites {
            if website.website_url.trim().is_empty() {
                bail!("a website has an empty websiteUrl");
            }
            if website.pages.is_empty() {
                bail!("website {} has no pages", website.website_url);
            }
        }

        if self.email.to.trim().is_empty() {
            bail!("email.to must not be empty");
        }

        Ok(())
    }
}

/// SMTP login, taken from the environment
#[derive(Clone)]
pub struct SmtpCredentials {
    pub user: String,
    pub pass: String,
}

impl SmtpCredentials {
    pub const USER_VAR: &'static str = "SMTP_USER";
    pub const PASS_VAR: &'static str = "SMTP_PASS";

    // Reads SMTP_USER and SMTP_PASS
    //
    // Call dotenvy::dotenv() first if a .env file should be honoured.
    pub fn from_env() -> Result<Self> {
        let user = std::env::var(Self::USER_VAR)
            .with_context(|| format!("{} is not set", Self::USER_VAR))?;
        let pass = std::env::var(Self::PASS_VAR)
            .with_context(|| format!("{} is not set", Self::PASS_VAR))?;

        Ok(Self { user, pass })
    }
}

// Never print the password in logs or panics
impl std::fmt::Debug for SmtpCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpCredentials")
            .field("user", &self.user)
            .field("pass", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "websites": [
            {
                "websiteUrl": "https://example.com",
                "pages": [
                    { "url": "", "expectedContent": "Example Domain" },
                    { "url": "/about", "expectedContent": "About" }
                ]
            },
            {
                "websiteUrl": "http://second.test",
                "pages": [ { "url": "/", "expectedContent": "Hello" } ]
            }
        ],
        "smtp": { "service": "gmail", "port": 465, "secure": true },
        "email": { "to": "ops@example.com" }
    }"#;

    #[test]
    fn test_parse_sample_config() {
        let config = Config::from_json(SAMPLE).unwrap();

        assert_eq!(config.websites.len(), 2);
        assert_eq!(config.websites[0].website_url, "https://example.com");
        assert_eq!(config.websites[0].pages[1].expected_content, "About");
        assert_eq!(config.smtp.service.as_deref(), Some("gmail"));
        assert_eq!(config.smtp.host, None);
        assert_eq!(config.smtp.port, Some(465));
        assert_eq!(config.email.to, "ops@example.com");
    }

    #[test]
    fn test_page_url_is_plain_concatenation() {
        let config = Config::from_json(SAMPLE).unwrap();
        let site = &config.websites[0];

        assert_eq!(site.page_url(&site.pages[0]), "https://example.com");
        assert_eq!(site.page_url(&site.pages[1]), "https://example.com/about");

        let slashy = Website {
            website_url: "https://a.test/".to_string(),
            pages: vec![],
        };
        let page = PageTarget {
            url: "/x".to_string(),
            expected_content: "x".to_string(),
        };
        assert_eq!(slashy.page_url(&page), "https://a.test//x");
    }

    #[test]
    fn test_rejects_empty_websites() {
        let raw = r#"{ "websites": [], "smtp": {}, "email": { "to": "a@b.c" } }"#;
        let err = Config::from_json(raw).unwrap_err();
        assert!(err.to_string().contains("no websites"));
    }

    #[test]
    fn test_rejects_site_without_pages() {
        let raw = r#"{
            "websites": [ { "websiteUrl": "https://a.test", "pages": [] } ],
            "smtp": {}, "email": { "to": "a@b.c" }
        }"#;
        let err = Config::from_json(raw).unwrap_err();
        assert!(err.to_string().contains("has no pages"));
    }

    #[test]
    fn test_rejects_missing_recipient() {
        let raw = r#"{
            "websites": [ { "websiteUrl": "https://a.test", "pages": [ { "url": "/", "expectedContent": "a" } ] } ],
            "smtp": {}, "email": { "to": "  " }
        }"#;
        assert!(Config::from_json(raw).is_err());
    }

    #[test]
    fn test_load_reports_missing_file() {
        let err = Config::load(Path::new("/definitely/not/here/config.json")).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here/config.json"));
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let creds = SmtpCredentials {
            user: "bot@example.com".to_string(),
            pass: "hunter2".to_string(),
        };
        let debug = format!("{:?}", creds);
        assert!(debug.contains("bot@example.com"));
        assert!(!debug.contains("hunter2"));
    }
}
