//! Runtime layer for the churn analyzer.
//!
//! Sequences the data and report crates into one pipeline run.

pub mod orchestrator;

pub use churn_core as core;
pub use orchestrator::{run, ChurnPipeline, PipelineState};
