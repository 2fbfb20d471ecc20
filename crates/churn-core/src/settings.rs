use clap::Parser;
use std::path::PathBuf;

use crate::models::{PipelineConfig, DEFAULT_DAYS_PER_MONTH, DEFAULT_OUTPUT_HTML};

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Churn analysis report for telecom customer data
#[derive(Parser, Debug, Clone)]
#[command(
    name = "churn-analyzer",
    about = "Churn analysis report for telecom customer data",
    version
)]
pub struct Settings {
    /// URL serving a JSON array of customer records
    #[arg(long)]
    pub url: Option<String>,

    /// Local JSON file with customer records (used when no URL is given)
    #[arg(long)]
    pub file_path: Option<PathBuf>,

    /// Destination of the HTML report
    #[arg(long, default_value = DEFAULT_OUTPUT_HTML)]
    pub output_html: PathBuf,

    /// Days per month used to derive daily charges
    #[arg(long, default_value_t = DEFAULT_DAYS_PER_MONTH)]
    pub days_per_month: f64,

    /// Rows of the cleaned table to preview after the run (0 disables)
    #[arg(long, default_value = "5")]
    pub head: usize,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Settings {
    /// Parse CLI arguments and apply the `--debug` override.
    pub fn load() -> Self {
        Self::resolve(Settings::parse())
    }

    /// Same as [`Settings::load`] but from an explicit argument list.
    pub fn load_from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::resolve(Settings::parse_from(args))
    }

    fn resolve(mut settings: Settings) -> Settings {
        // --debug overrides log level.
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }

    /// The pipeline configuration described by these settings.
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            url: self.url.clone(),
            file_path: self.file_path.clone(),
            output_html: self.output_html.clone(),
            days_per_month: self.days_per_month,
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
