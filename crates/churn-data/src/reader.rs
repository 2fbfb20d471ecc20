//! Data source adapter.
//!
//! Fetches a JSON array of customer records from a URL or a local file and
//! turns it into a [`Table`], flattening nested objects into dotted columns.

use std::path::Path;

use churn_core::data_processors::RecordFlattener;
use churn_core::error::{ChurnError, Result};
use churn_core::models::DataSource;
use churn_core::table::Table;
use serde_json::{Map, Value};
use tracing::{debug, info};

// ── Public API ────────────────────────────────────────────────────────────────

/// Load the records behind `source` into a raw table.
pub fn load(source: &DataSource) -> Result<Table> {
    let content = match source {
        DataSource::Url(url) => fetch_url(url)?,
        DataSource::File(path) => read_file(path)?,
    };

    let table = parse_records(&content)?;
    info!("Loaded {} records from {}", table.row_count(), source);
    Ok(table)
}

/// Parse a JSON document holding an array of objects into a table.
///
/// Every element must be an object; an empty array gives an empty table.
pub fn parse_records(content: &str) -> Result<Table> {
    let value: Value = serde_json::from_str(content)?;

    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(ChurnError::NotRecords(format!(
                "expected a JSON array of records, found {}",
                json_kind(&other)
            )))
        }
    };

    let mut records: Vec<Map<String, Value>> = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        match item {
            Value::Object(map) => records.push(RecordFlattener::flatten(map)),
            other => {
                return Err(ChurnError::NotRecords(format!(
                    "element {} is {}, expected an object",
                    index,
                    json_kind(other)
                )))
            }
        }
    }

    let table = Table::from_records(&records);
    debug!(
        "Parsed {} records into {} columns",
        table.row_count(),
        table.column_count()
    );
    Ok(table)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Blocking GET; any non-2xx status is an error.
fn fetch_url(url: &str) -> Result<String> {
    debug!("Fetching {}", url);
    let response = reqwest::blocking::get(url).map_err(|e| ChurnError::Fetch {
        url: url.to_string(),
        message: e.to_string(),
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(ChurnError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response.text().map_err(|e| ChurnError::Fetch {
        url: url.to_string(),
        message: e.to_string(),
    })
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| ChurnError::FileRead {
        path: path.to_path_buf(),
        source,
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
