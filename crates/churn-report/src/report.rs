//! Self-contained HTML churn report.

use std::path::Path;

use chrono::{SecondsFormat, Utc};
use churn_core::error::{ChurnError, Result};
use churn_core::formatting::{escape_html, format_label_map};
use churn_core::models::{Results, CHURN_COLUMN};
use churn_core::table::{Column, Table};
use tracing::info;

use crate::chart::{png_data_uri, render_bar_chart};

/// Heading of the report document.
pub const REPORT_TITLE: &str = "Churn Report - Telecom";

/// Render the report for `results` and write it to `destination`,
/// replacing any existing file.
///
/// The chart is drawn from the raw label counts of the table's `Churn`
/// column; a table without one is a [`ChurnError::Render`].
pub fn write_report(results: &Results, table: &Table, destination: &Path) -> Result<()> {
    let churn = table.column(CHURN_COLUMN).ok_or_else(|| {
        ChurnError::Render(format!("column '{}' not found in the data", CHURN_COLUMN))
    })?;

    let html = render_document(results, churn)?;
    std::fs::write(destination, html)?;
    info!("Report written to {}", destination.display());
    Ok(())
}

/// Build the full HTML document: aggregates plus the churn bar chart.
pub fn render_document(results: &Results, churn: &Column) -> Result<String> {
    let png = render_bar_chart(&churn.value_counts())?;
    let generated_at = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    Ok(compose_html(results, &png_data_uri(&png), &generated_at))
}

/// Fill the document template. Every interpolated value is HTML-escaped.
pub fn compose_html(results: &Results, chart_uri: &str, generated_at: &str) -> String {
    let charge_column = results.charge_column.as_deref().unwrap_or("none");
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
</head>
<body>
<h1>{title}</h1>
<p><b>Total customers:</b> {total}</p>
<p><b>Churn rate:</b> {churn_rate}</p>
<p><b>Average charges by churn:</b> {avg_charges}</p>
<p><b>Charge column:</b> {charge_column}</p>
<h2>Churn distribution</h2>
<img src="{chart}" alt="Churn distribution" />
<p><small>Generated at {generated_at}</small></p>
</body>
</html>
"#,
        title = escape_html(REPORT_TITLE),
        total = results.total_customers,
        churn_rate = escape_html(&format_label_map(&results.churn_rate)),
        avg_charges = escape_html(&format_label_map(&results.avg_charges)),
        charge_column = escape_html(charge_column),
        chart = escape_html(chart_uri),
        generated_at = escape_html(generated_at),
    )
}
