//! Core types for the churn analyzer.
//!
//! Holds the typed table model, the results and configuration records, the
//! error taxonomy, CLI settings and text formatting helpers shared by the
//! data, report and runtime crates.

pub mod data_processors;
pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod table;

pub use error::{ChurnError, ErrorKind, Result};
pub use models::{DataSource, PipelineConfig, Results};
pub use table::{Cell, Column, ColumnType, Table};
