// src/report/mod.rs
// =============================================================================
// This module holds the monitoring report.
//
// Submodules:
// - model: PageReport / SiteReport / RunReport data types
// - render: Plain-text email body and subject line
// =============================================================================

mod model;
mod render;

pub use model::{PageReport, RunReport, SiteReport};
pub use render::{render_text, subject};
