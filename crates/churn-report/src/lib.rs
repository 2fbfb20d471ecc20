//! Report layer for the churn analyzer.
//!
//! Renders the churn bar chart to PNG and embeds it, together with the
//! aggregated [`Results`](churn_core::Results), in a single HTML document.

pub mod chart;
pub mod report;

pub use churn_core as core;
pub use report::write_report;
