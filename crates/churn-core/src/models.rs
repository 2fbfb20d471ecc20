use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{ChurnError, Result};

/// Name of the churn label column. The only column analysis requires.
pub const CHURN_COLUMN: &str = "Churn";
/// Source column for the daily-charge derivation.
pub const MONTHLY_CHARGES_COLUMN: &str = "MonthlyCharges";
/// Derived column holding `MonthlyCharges / days_per_month`.
pub const DAILY_CHARGES_COLUMN: &str = "DailyCharges";
/// Fill value for missing cells in text columns.
pub const UNKNOWN_SENTINEL: &str = "Unknown";
/// Default divisor used to turn monthly charges into daily charges.
pub const DEFAULT_DAYS_PER_MONTH: f64 = 30.42;
/// Default report destination.
pub const DEFAULT_OUTPUT_HTML: &str = "informe_churn.html";

/// Where the customer records come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// HTTP(S) URL serving a JSON array of records.
    Url(String),
    /// Local JSON file.
    File(PathBuf),
}

impl DataSource {
    /// Pick a source from the two optional selectors. The URL wins when both
    /// are given; neither is a [`ChurnError::NoSource`].
    pub fn from_selectors(url: Option<&str>, file_path: Option<&Path>) -> Result<Self> {
        match (url, file_path) {
            (Some(url), _) if !url.trim().is_empty() => Ok(DataSource::Url(url.to_string())),
            (_, Some(path)) => Ok(DataSource::File(path.to_path_buf())),
            _ => Err(ChurnError::NoSource),
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Url(url) => write!(f, "URL {}", url),
            DataSource::File(path) => write!(f, "file {}", path.display()),
        }
    }
}

/// Library-level configuration of one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub url: Option<String>,
    pub file_path: Option<PathBuf>,
    /// Report destination; overwritten if it exists.
    pub output_html: PathBuf,
    pub days_per_month: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            url: None,
            file_path: None,
            output_html: PathBuf::from(DEFAULT_OUTPUT_HTML),
            days_per_month: DEFAULT_DAYS_PER_MONTH,
        }
    }
}

impl PipelineConfig {
    /// Resolve the configured input selectors into a [`DataSource`].
    pub fn source(&self) -> Result<DataSource> {
        DataSource::from_selectors(self.url.as_deref(), self.file_path.as_deref())
    }
}

/// Aggregate statistics of one analysed table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Results {
    /// Churn label → share of rows carrying it.
    pub churn_rate: BTreeMap<String, f64>,
    /// Churn label → mean of the detected charge column.
    pub avg_charges: BTreeMap<String, f64>,
    /// Rows in the table at analysis time.
    pub total_customers: usize,
    /// Column used for `avg_charges`, if one was found.
    pub charge_column: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_prefers_url() {
        let src = DataSource::from_selectors(
            Some("https://example.com/x.json"),
            Some(Path::new("local.json")),
        )
        .unwrap();
        assert_eq!(src, DataSource::Url("https://example.com/x.json".to_string()));
    }

    #[test]
    fn test_source_falls_back_to_file() {
        let src = DataSource::from_selectors(None, Some(Path::new("local.json"))).unwrap();
        assert_eq!(src, DataSource::File(PathBuf::from("local.json")));
    }

    #[test]
    fn test_source_blank_url_falls_back_to_file() {
        let src = DataSource::from_selectors(Some("  "), Some(Path::new("local.json"))).unwrap();
        assert_eq!(src, DataSource::File(PathBuf::from("local.json")));
    }

    #[test]
    fn test_source_none_is_error() {
        let err = DataSource::from_selectors(None, None).unwrap_err();
        assert!(matches!(err, ChurnError::NoSource));
    }

    #[test]
    fn test_pipeline_config_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.output_html, PathBuf::from("informe_churn.html"));
        assert!((config.days_per_month - 30.42).abs() < f64::EPSILON);
        assert!(config.source().is_err());
    }
}
