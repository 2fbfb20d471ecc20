//! Canonicalisation of a raw table.
//!
//! The steps run in a fixed order because the fill rules look at column tags
//! that nested-column stringification may have changed.

use std::collections::HashSet;

use churn_core::models::UNKNOWN_SENTINEL;
use churn_core::table::{Cell, Column, ColumnType, Table};
use tracing::info;

/// Produce the canonical table from a raw one.
///
/// 1. Columns holding any nested cell are stringified as a whole.
/// 2. Duplicate rows are dropped (first occurrence kept).
/// 3. Nulls in text columns become `"Unknown"`.
/// 4. Nulls in numeric columns become 0.
///
/// Boolean columns pass through untouched, nulls included.
pub fn clean(raw: &Table) -> Table {
    let stringified = stringify_nested_columns(raw.clone());

    let before = stringified.row_count();
    let deduped = drop_duplicates(&stringified);
    let after = deduped.row_count();
    info!(
        "Removed {} duplicate rows, {} records remain",
        before - after,
        after
    );

    let cleaned = fill_missing(deduped);
    info!("Data cleaned and ready for analysis");
    cleaned
}

/// Replace every non-null cell of a column that holds nested values with its
/// textual form, so the column ends up with a single cell type.
pub fn stringify_nested_columns(table: Table) -> Table {
    table.map_columns(|column| {
        if !column.has_nested() {
            return column;
        }
        info!(
            "Column '{}' contained nested values; converted to text",
            column.name()
        );
        let name = column.name().to_string();
        let cells = column
            .into_cells()
            .into_iter()
            .map(|cell| match cell {
                Cell::Null => Cell::Null,
                other => Cell::Text(other.to_string()),
            })
            .collect();
        Column::with_type(name, ColumnType::NestedText, cells)
    })
}

/// Drop rows equal (across all columns) to an earlier row.
pub fn drop_duplicates(table: &Table) -> Table {
    let mut seen: HashSet<Vec<&Cell>> = HashSet::with_capacity(table.row_count());
    let keep: Vec<bool> = (0..table.row_count())
        .map(|i| seen.insert(table.row(i)))
        .collect();
    table.filter_rows(&keep)
}

/// Fill nulls in text and numeric columns with their type's default.
pub fn fill_missing(table: Table) -> Table {
    table.map_columns(|column| {
        let fill = match column.kind() {
            ColumnType::Text | ColumnType::NestedText => Cell::Text(UNKNOWN_SENTINEL.to_string()),
            ColumnType::Integer => Cell::Integer(0),
            ColumnType::Float => Cell::Float(0.0),
            ColumnType::Boolean => return column,
        };
        if column.null_count() == 0 {
            return column;
        }

        let name = column.name().to_string();
        let kind = column.kind();
        let cells = column
            .into_cells()
            .into_iter()
            .map(|cell| if cell.is_null() { fill.clone() } else { cell })
            .collect();
        Column::with_type(name, kind, cells)
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::parse_records;

    fn table(json: &str) -> Table {
        parse_records(json).unwrap()
    }

    fn assert_no_nulls_in_text_or_numeric(table: &Table) {
        for column in table.columns() {
            if column.kind().is_text() || column.kind().is_numeric() {
                assert_eq!(
                    column.null_count(),
                    0,
                    "column '{}' still has nulls",
                    column.name()
                );
            }
        }
    }

    // ── clean ─────────────────────────────────────────────────────────────────

    #[test]
    fn test_clean_removes_duplicate_rows() {
        let raw = table(
            r#"[{"Churn":"Yes","MonthlyCharges":70.0},
                {"Churn":"No","MonthlyCharges":50.0},
                {"Churn":"Yes","MonthlyCharges":70.0}]"#,
        );
        let cleaned = clean(&raw);
        assert_eq!(cleaned.row_count(), 2);
        assert_eq!(cleaned.column_names(), raw.column_names());
        assert_eq!(raw.row_count(), 3, "raw table must not be modified");
    }

    #[test]
    fn test_clean_fills_missing_text_and_numbers() {
        let raw = table(
            r#"[{"Churn":"Yes","tenure":3,"MonthlyCharges":70.5},
                {"Churn":null,"tenure":null},
                {"tenure":5,"MonthlyCharges":null}]"#,
        );
        let cleaned = clean(&raw);

        let churn = cleaned.column("Churn").unwrap();
        assert_eq!(churn.cells()[1], Cell::Text("Unknown".to_string()));
        assert_eq!(churn.cells()[2], Cell::Text("Unknown".to_string()));

        let tenure = cleaned.column("tenure").unwrap();
        assert_eq!(tenure.kind(), ColumnType::Integer);
        assert_eq!(tenure.cells()[1], Cell::Integer(0));

        let charges = cleaned.column("MonthlyCharges").unwrap();
        assert_eq!(charges.cells()[1], Cell::Float(0.0));
        assert_eq!(charges.cells()[2], Cell::Float(0.0));

        assert_no_nulls_in_text_or_numeric(&cleaned);
    }

    #[test]
    fn test_clean_stringifies_nested_columns() {
        let raw = table(
            r#"[{"Churn":"No","services":["phone","tv"]},
                {"Churn":"Yes","services":"none"},
                {"Churn":"Yes","services":null}]"#,
        );
        let cleaned = clean(&raw);
        let services = cleaned.column("services").unwrap();

        assert_eq!(services.kind(), ColumnType::NestedText);
        assert_eq!(services.cells()[0], Cell::Text(r#"["phone","tv"]"#.to_string()));
        assert_eq!(services.cells()[1], Cell::Text("none".to_string()));
        assert_eq!(services.cells()[2], Cell::Text("Unknown".to_string()));
        assert!(!services.has_nested());
    }

    #[test]
    fn test_clean_dedups_after_stringification() {
        let raw = table(
            r#"[{"Churn":"No","meta":[{"k":1}]},
                {"Churn":"No","meta":[{"k":1}]}]"#,
        );
        let cleaned = clean(&raw);
        assert_eq!(cleaned.row_count(), 1);
    }

    #[test]
    fn test_clean_passes_booleans_through() {
        let raw = table(r#"[{"Churn":"No","Senior":true},{"Churn":"Yes","Senior":null}]"#);
        let cleaned = clean(&raw);
        let senior = cleaned.column("Senior").unwrap();
        assert_eq!(senior.kind(), ColumnType::Boolean);
        assert!(senior.cells()[1].is_null());
    }

    #[test]
    fn test_clean_is_idempotent() {
        let raw = table(
            r#"[{"Churn":"Yes","MonthlyCharges":70.0,"tags":[1]},
                {"Churn":"No","MonthlyCharges":null,"tags":null},
                {"Churn":"Yes","MonthlyCharges":70.0,"tags":[1]},
                {"Churn":null,"MonthlyCharges":12.5,"tags":[2,3]}]"#,
        );
        let once = clean(&raw);
        let twice = clean(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_clean_empty_table() {
        let cleaned = clean(&Table::default());
        assert_eq!(cleaned.row_count(), 0);
        assert_eq!(cleaned.column_count(), 0);
    }

    // ── drop_duplicates ───────────────────────────────────────────────────────

    #[test]
    fn test_drop_duplicates_keeps_first_occurrence_order() {
        let raw = table(r#"[{"a":3},{"a":1},{"a":3},{"a":2},{"a":1}]"#);
        let deduped = drop_duplicates(&raw);
        let values: Vec<&Cell> = deduped.column("a").unwrap().cells().iter().collect();
        assert_eq!(
            values,
            vec![&Cell::Integer(3), &Cell::Integer(1), &Cell::Integer(2)]
        );
    }

    #[test]
    fn test_drop_duplicates_treats_nulls_as_equal() {
        let raw = table(r#"[{"a":null,"b":1},{"b":1}]"#);
        assert_eq!(drop_duplicates(&raw).row_count(), 1);
    }
}
