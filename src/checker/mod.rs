// src/checker/mod.rs
// =============================================================================
// This module contains all page checking logic.
//
// Submodules:
// - text: Strips HTML down to the text a visitor would see
// - fetch: Makes the HTTP request (behind the HttpFetcher trait)
// - content: Combines the two into a single page check
//
// This file (mod.rs) is the module root - it ties everything together and
// exports the public API that other parts of our application can use.
// =============================================================================

mod content;
pub mod fetch;
mod text;

// Re-export public items from submodules
// This lets users write `checker::ContentChecker` instead of
// `checker::content::ContentChecker`
pub use content::{CheckResult, CheckSummary, ContentChecker};
pub use fetch::{HttpFetcher, ReqwestFetcher};
