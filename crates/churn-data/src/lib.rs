//! Data layer for the churn analyzer.
//!
//! Loads customer records from a URL or file, canonicalises them, derives the
//! daily-charge feature and aggregates churn statistics.

pub mod aggregator;
pub mod cleaner;
pub mod features;
pub mod reader;

#[cfg(test)]
mod test_support;

pub use churn_core as core;
