//! Derived feature columns.

use churn_core::error::{ChurnError, Result};
use churn_core::models::{DAILY_CHARGES_COLUMN, MONTHLY_CHARGES_COLUMN};
use churn_core::table::{Cell, Column, ColumnType, Table};
use tracing::{info, warn};

/// Append `DailyCharges = MonthlyCharges / days_per_month` to the table.
///
/// Without a `MonthlyCharges` column, or when `DailyCharges` already exists,
/// the table is returned unchanged and a warning is logged. Null monthly
/// charges give null daily charges.
///
/// # Errors
/// * [`ChurnError::InvalidDaysPerMonth`] when `days_per_month` is zero or not
///   finite; checked before anything else.
/// * [`ChurnError::NonNumericColumn`] when `MonthlyCharges` is not numeric.
pub fn add_daily_charges(mut table: Table, days_per_month: f64) -> Result<Table> {
    if days_per_month == 0.0 || !days_per_month.is_finite() {
        return Err(ChurnError::InvalidDaysPerMonth(days_per_month));
    }

    let Some(monthly) = table.column(MONTHLY_CHARGES_COLUMN) else {
        warn!(
            "Column '{}' not found; '{}' not created",
            MONTHLY_CHARGES_COLUMN, DAILY_CHARGES_COLUMN
        );
        return Ok(table);
    };

    if !monthly.kind().is_numeric() {
        return Err(ChurnError::NonNumericColumn {
            column: MONTHLY_CHARGES_COLUMN.to_string(),
            found: monthly.kind().to_string(),
        });
    }

    if table.has_column(DAILY_CHARGES_COLUMN) {
        warn!(
            "Column '{}' already exists; leaving it unchanged",
            DAILY_CHARGES_COLUMN
        );
        return Ok(table);
    }

    let cells: Vec<Cell> = monthly
        .cells()
        .iter()
        .map(|cell| match cell.as_f64() {
            Some(value) => Cell::Float(value / days_per_month),
            None => Cell::Null,
        })
        .collect();

    table.push_column(Column::with_type(
        DAILY_CHARGES_COLUMN,
        ColumnType::Float,
        cells,
    ))?;
    info!("Column '{}' created", DAILY_CHARGES_COLUMN);
    Ok(table)
}
