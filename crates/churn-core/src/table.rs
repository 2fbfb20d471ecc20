//! Typed, column-oriented table model.
//!
//! Every column carries a [`ColumnType`] tag that is fixed when the column is
//! built from raw cells. Coercion happens once, at construction, so later
//! stages can rely on the tag instead of inspecting cell values.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{ChurnError, Result};

// ── Cell ──────────────────────────────────────────────────────────────────────

/// A single table cell.
#[derive(Debug, Clone)]
pub enum Cell {
    Null,
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    /// A JSON object or array that was not flattened into columns.
    Nested(Value),
}

impl Cell {
    /// Convert a JSON value into a cell without any column-level coercion.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Cell::Null,
            Value::Bool(b) => Cell::Boolean(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Cell::Integer(i),
                None => Cell::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => Cell::Text(s.clone()),
            Value::Array(_) | Value::Object(_) => Cell::Nested(value.clone()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    pub fn is_nested(&self) -> bool {
        matches!(self, Cell::Nested(_))
    }

    /// Numeric view of the cell. Text is parsed leniently (surrounding
    /// whitespace ignored); anything else that is not a number yields `None`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Integer(i) => Some(*i as f64),
            Cell::Float(f) => Some(*f),
            Cell::Text(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }
}

/// Bit pattern used for float equality and hashing: `-0.0` folds into `0.0`
/// and every NaN is the same NaN.
fn canonical_bits(f: f64) -> u64 {
    if f == 0.0 {
        0.0f64.to_bits()
    } else if f.is_nan() {
        f64::NAN.to_bits()
    } else {
        f.to_bits()
    }
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Cell::Null, Cell::Null) => true,
            (Cell::Text(a), Cell::Text(b)) => a == b,
            (Cell::Integer(a), Cell::Integer(b)) => a == b,
            (Cell::Float(a), Cell::Float(b)) => canonical_bits(*a) == canonical_bits(*b),
            (Cell::Boolean(a), Cell::Boolean(b)) => a == b,
            (Cell::Nested(a), Cell::Nested(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Cell {}

impl Hash for Cell {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Cell::Null => {}
            Cell::Text(s) => s.hash(state),
            Cell::Integer(i) => i.hash(state),
            Cell::Float(f) => canonical_bits(*f).hash(state),
            Cell::Boolean(b) => b.hash(state),
            Cell::Nested(v) => v.to_string().hash(state),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => Ok(()),
            Cell::Text(s) => f.write_str(s),
            Cell::Integer(i) => write!(f, "{}", i),
            Cell::Float(x) => write!(f, "{:?}", x),
            Cell::Boolean(b) => write!(f, "{}", b),
            Cell::Nested(v) => write!(f, "{}", v),
        }
    }
}

// ── ColumnType ────────────────────────────────────────────────────────────────

/// Type tag of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Text,
    Integer,
    Float,
    Boolean,
    /// Holds (or held) JSON objects or arrays; rendered as text once cleaned.
    NestedText,
}

impl ColumnType {
    /// Infer the tag for a set of raw cells.
    ///
    /// Any nested cell makes the column `NestedText`. Otherwise a column of
    /// only integers is `Integer`, integers mixed with floats is `Float`, only
    /// booleans is `Boolean`, and everything else (strings, all-null, mixed
    /// scalars) is `Text`.
    pub fn infer(cells: &[Cell]) -> Self {
        let (mut ints, mut floats, mut bools, mut texts) = (false, false, false, false);
        for cell in cells {
            match cell {
                Cell::Null => {}
                Cell::Nested(_) => return ColumnType::NestedText,
                Cell::Integer(_) => ints = true,
                Cell::Float(_) => floats = true,
                Cell::Boolean(_) => bools = true,
                Cell::Text(_) => texts = true,
            }
        }

        match (ints, floats, bools, texts) {
            (true, false, false, false) => ColumnType::Integer,
            (_, true, false, false) => ColumnType::Float,
            (false, false, true, false) => ColumnType::Boolean,
            _ => ColumnType::Text,
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnType::Integer | ColumnType::Float)
    }

    pub fn is_text(self) -> bool {
        matches!(self, ColumnType::Text | ColumnType::NestedText)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnType::Text => "text",
            ColumnType::Integer => "integer",
            ColumnType::Float => "float",
            ColumnType::Boolean => "boolean",
            ColumnType::NestedText => "nested text",
        };
        f.write_str(name)
    }
}

// ── Column ────────────────────────────────────────────────────────────────────

/// A named, typed column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    kind: ColumnType,
    cells: Vec<Cell>,
}

impl Column {
    /// Build a column from raw cells, inferring its tag and coercing cells to
    /// match: integers widen to floats in a `Float` column and non-string
    /// scalars become their textual form in a `Text` column.
    pub fn new(name: impl Into<String>, cells: Vec<Cell>) -> Self {
        let kind = ColumnType::infer(&cells);
        let cells = match kind {
            ColumnType::Float => cells
                .into_iter()
                .map(|c| match c {
                    Cell::Integer(i) => Cell::Float(i as f64),
                    other => other,
                })
                .collect(),
            ColumnType::Text => cells
                .into_iter()
                .map(|c| match c {
                    Cell::Null | Cell::Text(_) => c,
                    other => Cell::Text(other.to_string()),
                })
                .collect(),
            _ => cells,
        };
        Self {
            name: name.into(),
            kind,
            cells,
        }
    }

    /// Build a column with an explicit tag. The caller guarantees the cells
    /// agree with it.
    pub fn with_type(name: impl Into<String>, kind: ColumnType, cells: Vec<Cell>) -> Self {
        Self {
            name: name.into(),
            kind,
            cells,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ColumnType {
        self.kind
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn into_cells(self) -> Vec<Cell> {
        self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn null_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_null()).count()
    }

    pub fn has_nested(&self) -> bool {
        self.cells.iter().any(Cell::is_nested)
    }

    /// Occurrences of each distinct non-null value, keyed by display form.
    ///
    /// Sorted by descending count; ties keep the order of first appearance.
    pub fn value_counts(&self) -> Vec<(String, usize)> {
        let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
        for (idx, cell) in self.cells.iter().enumerate() {
            if cell.is_null() {
                continue;
            }
            counts.entry(cell.to_string()).or_insert((0, idx)).0 += 1;
        }

        let mut sorted: Vec<(String, (usize, usize))> = counts.into_iter().collect();
        sorted.sort_by(|a, b| b.1 .0.cmp(&a.1 .0).then(a.1 .1.cmp(&b.1 .1)));
        sorted
            .into_iter()
            .map(|(label, (count, _))| (label, count))
            .collect()
    }
}

// ── Table ─────────────────────────────────────────────────────────────────────

/// An in-memory table: an ordered list of equally long columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    rows: usize,
}

impl Table {
    /// Build a table from JSON records.
    ///
    /// The column set is the union of keys across all records in first-seen
    /// order; a key missing from a record is a null cell.
    pub fn from_records(records: &[Map<String, Value>]) -> Self {
        let mut names: Vec<&str> = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();
        for record in records {
            for key in record.keys() {
                if seen.insert(key.as_str()) {
                    names.push(key.as_str());
                }
            }
        }

        let columns = names
            .into_iter()
            .map(|name| {
                let cells = records
                    .iter()
                    .map(|r| r.get(name).map(Cell::from_json).unwrap_or(Cell::Null))
                    .collect();
                Column::new(name, cells)
            })
            .collect();

        Self {
            columns,
            rows: records.len(),
        }
    }

    /// Assemble a table from prepared columns. All columns must have the same
    /// length and distinct names.
    pub fn from_columns(columns: Vec<Column>) -> Result<Self> {
        let rows = columns.first().map(Column::len).unwrap_or(0);
        let mut table = Self {
            columns: Vec::with_capacity(columns.len()),
            rows,
        };
        for column in columns {
            table.push_column(column)?;
        }
        Ok(table)
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn into_columns(self) -> Vec<Column> {
        self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Cells of row `index`, in column order.
    pub fn row(&self, index: usize) -> Vec<&Cell> {
        self.columns.iter().map(|c| &c.cells[index]).collect()
    }

    /// Append a column. Fails if the name is taken or the length differs
    /// from the table's row count.
    pub fn push_column(&mut self, column: Column) -> Result<()> {
        if self.has_column(column.name()) {
            return Err(ChurnError::DuplicateColumn(column.name().to_string()));
        }
        if column.len() != self.rows {
            return Err(ChurnError::ColumnLength {
                column: column.name().to_string(),
                len: column.len(),
                rows: self.rows,
            });
        }
        self.columns.push(column);
        Ok(())
    }

    /// Transform every column with `f`, keeping the row count. `f` must not
    /// change a column's length.
    pub fn map_columns(self, f: impl FnMut(Column) -> Column) -> Self {
        let rows = self.rows;
        let columns: Vec<Column> = self.columns.into_iter().map(f).collect();
        debug_assert!(columns.iter().all(|c| c.len() == rows));
        Self { columns, rows }
    }

    /// Keep only the rows whose flag in `keep` is `true`.
    pub fn filter_rows(&self, keep: &[bool]) -> Self {
        let columns: Vec<Column> = self
            .columns
            .iter()
            .map(|col| {
                let cells = col
                    .cells
                    .iter()
                    .zip(keep)
                    .filter(|(_, &k)| k)
                    .map(|(c, _)| c.clone())
                    .collect();
                Column::with_type(col.name.clone(), col.kind, cells)
            })
            .collect();
        let rows = keep.iter().take(self.rows).filter(|&&k| k).count();
        Self { columns, rows }
    }

    /// The first `n` rows.
    pub fn head(&self, n: usize) -> Self {
        let keep: Vec<bool> = (0..self.rows).map(|i| i < n).collect();
        self.filter_rows(&keep)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
