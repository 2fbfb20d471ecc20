//! Churn aggregation: rate distribution and average charges per churn group.

use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

use churn_core::error::{ChurnError, Result};
use churn_core::models::{Results, CHURN_COLUMN};
use churn_core::table::{Column, Table};
use regex::Regex;
use tracing::{info, warn};

fn charge_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)charge|cargos").expect("regex is valid"))
}

/// Name of the first column (in table order) whose name contains `charge`
/// or `cargos`, ignoring case.
pub fn detect_charge_column<'a, I>(column_names: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    column_names
        .into_iter()
        .find(|name| charge_pattern().is_match(name))
}

/// Compute the churn [`Results`] of a cleaned table.
///
/// # Errors
/// [`ChurnError::MissingColumn`] when the table has no `Churn` column.
pub fn analyze(table: &Table) -> Result<Results> {
    let churn = table
        .column(CHURN_COLUMN)
        .ok_or_else(|| ChurnError::MissingColumn(CHURN_COLUMN.to_string()))?;

    let churn_rate = churn_rate(churn);

    let charge_column = detect_charge_column(table.column_names()).map(str::to_string);
    let avg_charges = match charge_column.as_deref().and_then(|name| table.column(name)) {
        Some(charges) => {
            info!("Using column '{}' for average charges", charges.name());
            mean_by_label(churn, charges)
        }
        None => {
            warn!("No charge column found; average charges left empty");
            BTreeMap::new()
        }
    };

    info!("Analysis completed");
    Ok(Results {
        churn_rate,
        avg_charges,
        total_customers: table.row_count(),
        charge_column,
    })
}

/// Share of each churn label among the labelled rows.
fn churn_rate(churn: &Column) -> BTreeMap<String, f64> {
    let counts = churn.value_counts();
    let total: usize = counts.iter().map(|(_, n)| n).sum();
    counts
        .into_iter()
        .map(|(label, n)| (label, n as f64 / total as f64))
        .collect()
}

/// Mean of `values` grouped by the label in `labels` on the same row.
///
/// Cells without a numeric reading are skipped; a label with no numeric
/// value at all is left out.
fn mean_by_label(labels: &Column, values: &Column) -> BTreeMap<String, f64> {
    let mut sums: HashMap<String, (f64, usize)> = HashMap::new();
    for (label, value) in labels.cells().iter().zip(values.cells()) {
        if label.is_null() {
            continue;
        }
        if let Some(v) = value.as_f64() {
            let entry = sums.entry(label.to_string()).or_insert((0.0, 0));
            entry.0 += v;
            entry.1 += 1;
        }
    }
    sums.into_iter()
        .map(|(label, (sum, n))| (label, sum / n as f64))
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
