//! Pipeline orchestrator.
//!
//! Runs load → clean → derive → analyze → render as a straight line,
//! threading a [`PipelineState`] through the stages. Any stage failure
//! aborts the run before the report is written.

use std::path::Path;

use churn_core::error::Result;
use churn_core::models::{DataSource, PipelineConfig, Results};
use churn_core::table::Table;
use churn_data::{aggregator, cleaner, features, reader};
use churn_report::report;
use tracing::{debug, info};

// ── Public types ──────────────────────────────────────────────────────────────

/// Everything one run produced, handed back to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineState {
    /// Table as loaded and flattened, before cleaning.
    pub raw: Table,
    /// Cleaned table with derived columns.
    pub table: Table,
    pub results: Results,
}

// ── ChurnPipeline ─────────────────────────────────────────────────────────────

/// A configured pipeline. Holds no state between runs.
pub struct ChurnPipeline {
    config: PipelineConfig,
}

impl ChurnPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Resolve the input source and run the pipeline once.
    pub fn run(&self) -> Result<PipelineState> {
        let source = self.config.source()?;
        run(&source, &self.config.output_html, self.config.days_per_month)
    }
}

/// Run the whole pipeline from `source` to the HTML report at `destination`.
pub fn run(source: &DataSource, destination: &Path, days_per_month: f64) -> Result<PipelineState> {
    info!("Loading data from {}", source);
    let raw = reader::load(source)?;

    let table = cleaner::clean(&raw);
    debug!("Available columns: {}", table.column_names().join(", "));

    let table = features::add_daily_charges(table, days_per_month)?;
    let results = aggregator::analyze(&table)?;
    if let Ok(summary) = serde_json::to_string(&results) {
        debug!("Results: {}", summary);
    }

    report::write_report(&results, &table, destination)?;

    Ok(PipelineState {
        raw,
        table,
        results,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use churn_core::error::{ChurnError, ErrorKind};
    use churn_core::table::Cell;
    use serde_json::json;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_records(dir: &TempDir, records: serde_json::Value) -> PathBuf {
        let path = dir.path().join("customers.json");
        std::fs::write(&path, records.to_string()).unwrap();
        path
    }

    fn config_for(input: PathBuf, output: PathBuf) -> PipelineConfig {
        PipelineConfig {
            file_path: Some(input),
            output_html: output,
            ..PipelineConfig::default()
        }
    }

    // ── end to end ────────────────────────────────────────────────────────────

    #[test]
    fn test_reference_scenario_end_to_end() {
        let dir = TempDir::new().unwrap();
        let input = write_records(
            &dir,
            json!([
                {"Churn": "Yes", "MonthlyCharges": 70.0},
                {"Churn": "No", "MonthlyCharges": 50.0},
                {"Churn": "Yes", "MonthlyCharges": 70.0}
            ]),
        );
        let output = dir.path().join("informe_churn.html");

        let state = ChurnPipeline::new(config_for(input, output.clone()))
            .run()
            .unwrap();

        assert_eq!(state.raw.row_count(), 3);
        assert_eq!(state.table.row_count(), 2);
        assert_eq!(state.results.total_customers, 2);
        assert!((state.results.churn_rate["Yes"] - 0.5).abs() < 1e-12);
        assert!((state.results.churn_rate["No"] - 0.5).abs() < 1e-12);
        assert!((state.results.avg_charges["Yes"] - 70.0).abs() < 1e-12);
        assert!((state.results.avg_charges["No"] - 50.0).abs() < 1e-12);

        let daily = state.table.column("DailyCharges").unwrap();
        assert_eq!(daily.cells()[0], Cell::Float(70.0 / 30.42));

        let html = std::fs::read_to_string(&output).unwrap();
        assert!(html.contains("<p><b>Total customers:</b> 2</p>"));
        assert!(html.contains("data:image/png;base64,"));
    }

    #[test]
    fn test_nested_records_are_flattened() {
        let dir = TempDir::new().unwrap();
        let input = write_records(
            &dir,
            json!([
                {"customer": {"id": "a"}, "Churn": "No", "account": {"Charges": {"Monthly": 10.0}}},
                {"customer": {"id": "b"}, "Churn": "Yes", "account": {"Charges": {"Monthly": 30.0}}}
            ]),
        );
        let output = dir.path().join("report.html");

        let state = run(&DataSource::File(input), &output, 30.42).unwrap();

        assert!(state.table.has_column("customer.id"));
        assert_eq!(
            state.results.charge_column.as_deref(),
            Some("account.Charges.Monthly")
        );
        assert!((state.results.avg_charges["Yes"] - 30.0).abs() < 1e-12);
        assert!(output.exists());
    }

    #[test]
    fn test_no_charge_column_completes() {
        let dir = TempDir::new().unwrap();
        let input = write_records(&dir, json!([{"Churn": "Yes"}, {"Churn": "No"}]));
        let output = dir.path().join("report.html");

        let state = run(&DataSource::File(input), &output, 30.42).unwrap();

        assert!(state.results.avg_charges.is_empty());
        assert!(output.exists());
    }

    // ── failures ──────────────────────────────────────────────────────────────

    #[test]
    fn test_missing_churn_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let input = write_records(&dir, json!([{"MonthlyCharges": 70.0}]));
        let output = dir.path().join("report.html");

        let err = run(&DataSource::File(input), &output, 30.42).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Schema);
        assert!(!output.exists());
    }

    #[test]
    fn test_zero_days_per_month_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let input = write_records(&dir, json!([{"Churn": "No", "MonthlyCharges": 70.0}]));
        let output = dir.path().join("report.html");

        let err = run(&DataSource::File(input), &output, 0.0).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Config);
        assert!(!output.exists());
    }

    #[test]
    fn test_no_source_is_source_error() {
        let pipeline = ChurnPipeline::new(PipelineConfig::default());
        let err = pipeline.run().unwrap_err();
        assert!(matches!(err, ChurnError::NoSource));
        assert_eq!(err.kind(), ErrorKind::Source);
    }

    #[test]
    fn test_missing_input_file_is_source_error() {
        let dir = TempDir::new().unwrap();
        let config = config_for(dir.path().join("absent.json"), dir.path().join("r.html"));
        let err = ChurnPipeline::new(config).run().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Source);
    }
}
