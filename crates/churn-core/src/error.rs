use std::path::PathBuf;
use thiserror::Error;

/// Coarse classification of a [`ChurnError`], used by callers that only care
/// which stage of the pipeline failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    /// The input could not be located, fetched or parsed.
    Source,
    /// A required column is missing or has the wrong type.
    Schema,
    /// A caller-supplied parameter is unusable.
    Config,
    /// The chart or the report document could not be produced.
    Render,
    /// Writing output to disk failed.
    Io,
}

/// All errors produced by the churn analyzer.
#[derive(Error, Debug)]
pub enum ChurnError {
    /// Neither a URL nor a file path was supplied.
    #[error("No data source given: provide a URL or a file path")]
    NoSource,

    /// A local input file could not be opened or read.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The HTTP request could not be completed.
    #[error("Failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },

    /// The server answered with a non-success status code.
    #[error("Request to {url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    /// A JSON document could not be parsed.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// The JSON document parsed but is not an array of records.
    #[error("Invalid record data: {0}")]
    NotRecords(String),

    /// A required column is absent from the table.
    #[error("Column '{0}' not found in the data")]
    MissingColumn(String),

    /// A column that must hold numbers holds something else.
    #[error("Column '{column}' is not numeric (found {found})")]
    NonNumericColumn { column: String, found: String },

    /// A column with this name is already in the table.
    #[error("Column '{0}' already exists")]
    DuplicateColumn(String),

    /// A column's length does not match the table's row count.
    #[error("Column '{column}' has {len} cells, table has {rows} rows")]
    ColumnLength {
        column: String,
        len: usize,
        rows: usize,
    },

    /// `days_per_month` would make the daily-charge division meaningless.
    #[error("days_per_month must be a finite non-zero number, got {0}")]
    InvalidDaysPerMonth(f64),

    /// The chart or document could not be rendered.
    #[error("Render error: {0}")]
    Render(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ChurnError {
    /// Which failure class this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ChurnError::NoSource
            | ChurnError::FileRead { .. }
            | ChurnError::Fetch { .. }
            | ChurnError::HttpStatus { .. }
            | ChurnError::JsonParse(_)
            | ChurnError::NotRecords(_) => ErrorKind::Source,
            ChurnError::MissingColumn(_)
            | ChurnError::NonNumericColumn { .. }
            | ChurnError::DuplicateColumn(_)
            | ChurnError::ColumnLength { .. } => ErrorKind::Schema,
            ChurnError::InvalidDaysPerMonth(_) => ErrorKind::Config,
            ChurnError::Render(_) => ErrorKind::Render,
            ChurnError::Io(_) => ErrorKind::Io,
        }
    }
}

/// Convenience alias used throughout the churn crates.
pub type Result<T> = std::result::Result<T, ChurnError>;
