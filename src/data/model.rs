use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;

use crate::error::TableError;

// ---------------------------------------------------------------------------
// CellValue – a single cell in a table column
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value, as guessed from the source file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Interpret the value as an `f64`. Booleans and text do not convert.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Truthiness of a cell: null, zero, empty text and `false` are falsy.
    ///
    /// NaN counts as truthy, the same as any other non-zero float.
    pub fn is_truthy(&self) -> bool {
        match self {
            CellValue::String(s) => !s.is_empty(),
            CellValue::Integer(i) => *i != 0,
            CellValue::Float(v) => *v != 0.0,
            CellValue::Bool(b) => *b,
            CellValue::Null => false,
        }
    }

    /// Whether this cell identifies the star called `name`.
    ///
    /// Identifiers that look numeric (e.g. HIP numbers) are guessed as
    /// integers by the loaders, so those compare through their decimal form.
    pub fn matches_name(&self, name: &str) -> bool {
        match self {
            CellValue::String(s) => s == name,
            CellValue::Integer(i) => i.to_string() == name,
            _ => false,
        }
    }
}

/// Guess the type of a raw text cell.
pub fn guess_cell_type(s: &str) -> CellValue {
    let s = s.trim();
    if s.is_empty() {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return CellValue::Float(f);
    }
    match s {
        "true" | "True" | "TRUE" => CellValue::Bool(true),
        "false" | "False" | "FALSE" => CellValue::Bool(false),
        _ => CellValue::String(s.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Column / Table – column-oriented storage keyed by column name
// ---------------------------------------------------------------------------

/// One named column of a [`Table`].
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<CellValue>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<CellValue>) -> Self {
        Column {
            name: name.into(),
            values,
        }
    }

    /// Convenience constructor for a numeric column.
    pub fn from_f64(name: impl Into<String>, values: &[f64]) -> Self {
        Self::new(name, values.iter().map(|v| CellValue::Float(*v)).collect())
    }

    /// Convenience constructor for a text column.
    pub fn from_strs(name: impl Into<String>, values: &[&str]) -> Self {
        Self::new(
            name,
            values.iter().map(|v| CellValue::String(v.to_string())).collect(),
        )
    }

    pub fn get(&self, row: usize) -> Option<&CellValue> {
        self.values.get(row)
    }
}

/// A read-only table: ordered columns of equal length.
///
/// No uniqueness or presence checks are made on the columns; callers look
/// up what they need and cope with its absence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    n_rows: usize,
}

impl Table {
    /// Build a table from whole columns. All columns must have the same
    /// length and distinct names.
    pub fn from_columns(columns: Vec<Column>) -> Result<Self, TableError> {
        let n_rows = columns.first().map_or(0, |c| c.values.len());
        let mut seen = BTreeSet::new();
        for col in &columns {
            if col.values.len() != n_rows {
                return Err(TableError::RaggedColumn {
                    column: col.name.clone(),
                    expected: n_rows,
                    found: col.values.len(),
                });
            }
            if !seen.insert(col.name.as_str()) {
                return Err(TableError::DuplicateColumn(col.name.clone()));
            }
        }
        Ok(Table { columns, n_rows })
    }

    /// Build a table from row records. The column set is the union of all
    /// record keys (sorted); cells missing from a record become `Null`.
    pub fn from_records(records: Vec<BTreeMap<String, CellValue>>) -> Self {
        let names: BTreeSet<String> = records
            .iter()
            .flat_map(|rec| rec.keys().cloned())
            .collect();

        let columns = names
            .into_iter()
            .map(|name| {
                let values = records
                    .iter()
                    .map(|rec| rec.get(&name).cloned().unwrap_or(CellValue::Null))
                    .collect();
                Column { name, values }
            })
            .collect();

        Table {
            columns,
            n_rows: records.len(),
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.n_rows
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// The cell at (`column`, `row`), if both exist.
    pub fn value(&self, column: &str, row: usize) -> Option<&CellValue> {
        self.column(column).and_then(|c| c.get(row))
    }

    /// The cell at (`column`, `row`) as a number.
    pub fn f64_at(&self, column: &str, row: usize) -> Option<f64> {
        self.value(column, row).and_then(CellValue::as_f64)
    }

    /// Indices of the rows whose `column` cell satisfies `predicate`.
    /// Returns `None` when the column does not exist.
    pub fn rows_where<F>(&self, column: &str, predicate: F) -> Option<Vec<usize>>
    where
        F: Fn(&CellValue) -> bool,
    {
        let col = self.column(column)?;
        Some(
            col.values
                .iter()
                .enumerate()
                .filter(|(_, v)| predicate(v))
                .map(|(i, _)| i)
                .collect(),
        )
    }
}
