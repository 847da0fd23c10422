use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{guess_cell_type, CellValue, Column, Table};

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// On-disk layout of a table source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    /// Delimited text with a header row.
    Delimited,
    /// `[{ "id": "HD1", "teff_out": 5700, ... }, ...]`
    Json,
    Parquet,
}

impl TableFormat {
    /// Guess the format (and default delimiter) from a file extension.
    pub fn from_path(path: &Path) -> Result<(Self, u8)> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        match ext.as_str() {
            "csv" | "txt" | "dat" => Ok((TableFormat::Delimited, b',')),
            "tsv" | "tab" => Ok((TableFormat::Delimited, b'\t')),
            "json" => Ok((TableFormat::Json, b',')),
            "parquet" | "pq" => Ok((TableFormat::Parquet, b',')),
            other => bail!("Unsupported file extension: .{other}"),
        }
    }
}

/// How table sources are read. The defaults infer everything from the
/// file extension.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Force a format instead of guessing from the extension.
    pub format: Option<TableFormat>,
    /// Field delimiter for delimited text.
    pub delimiter: Option<u8>,
    /// Columns kept as their original text instead of having a type guessed.
    pub text_columns: Vec<String>,
}

impl LoadOptions {
    pub fn with_text_column(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.text_columns.contains(&name) {
            self.text_columns.push(name);
        }
        self
    }

    fn is_text(&self, column: &str) -> bool {
        self.text_columns.iter().any(|c| c == column)
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a table from a file.  Dispatch by format.
pub fn load_table(path: &Path, options: &LoadOptions) -> Result<Table> {
    let (format, delimiter) = match (options.format, TableFormat::from_path(path)) {
        (Some(format), guessed) => (format, guessed.map_or(b',', |(_, d)| d)),
        (None, guessed) => guessed?,
    };

    match format {
        TableFormat::Delimited => {
            load_delimited(path, options.delimiter.unwrap_or(delimiter), options)
        }
        TableFormat::Json => load_json(path, options),
        TableFormat::Parquet => load_parquet(path),
    }
}

// ---------------------------------------------------------------------------
// Delimited text loader
// ---------------------------------------------------------------------------

/// Layout: header row with column names, then one row per record.
/// Lines starting with `#` are comments. Cell types are guessed per cell,
/// except in text columns.
fn load_delimited(path: &Path, delimiter: u8, options: &LoadOptions) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_path(path)
        .context("opening delimited file")?;

    let headers: Vec<String> = reader
        .headers()
        .context("reading header row")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        bail!("missing header row");
    }

    let text: Vec<bool> = headers.iter().map(|h| options.is_text(h)).collect();
    let mut values: Vec<Vec<CellValue>> = vec![Vec::new(); headers.len()];

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("row {row_no}"))?;
        for (col_idx, column) in values.iter_mut().enumerate() {
            let raw = record.get(col_idx).unwrap_or("");
            column.push(if text[col_idx] {
                text_cell(raw)
            } else {
                guess_cell_type(raw)
            });
        }
    }

    let columns = headers
        .into_iter()
        .zip(values)
        .map(|(name, values)| Column::new(name, values))
        .collect();

    Table::from_columns(columns).context("assembling table")
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "id": "HD1", "teff_out": 5700, "logg_out": 4.4, ... },
///   ...
/// ]
/// ```
fn load_json(path: &Path, options: &LoadOptions) -> Result<Table> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    let rows = records
        .iter()
        .enumerate()
        .map(|(i, rec)| {
            let obj = rec
                .as_object()
                .with_context(|| format!("Row {i} is not a JSON object"))?;
            Ok(obj
                .iter()
                .map(|(key, val)| {
                    let cell = match val {
                        JsonValue::String(s) if options.is_text(key) => text_cell(s),
                        JsonValue::Number(n) if options.is_text(key) => text_cell(&n.to_string()),
                        other => json_to_cell(other),
                    };
                    (key.clone(), cell)
                })
                .collect::<BTreeMap<_, _>>())
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Table::from_records(rows))
}

/// A cell taken verbatim; only an empty one becomes `Null`.
fn text_cell(raw: &str) -> CellValue {
    if raw.is_empty() {
        CellValue::Null
    } else {
        CellValue::String(raw.to_string())
    }
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file of scalar columns (strings, ints, floats, bools).
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Table> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;

    // Columns come from the schema so that a file without rows keeps them.
    let mut columns: Vec<Column> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| Column::new(f.name().clone(), Vec::new()))
        .collect();

    let reader = builder.build().context("building parquet reader")?;

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for (col_idx, column) in columns.iter_mut().enumerate() {
            let array = batch.column(col_idx);
            column
                .values
                .extend((0..batch.num_rows()).map(|row| extract_cell(array, row)));
        }
    }

    Table::from_columns(columns).context("assembling table")
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &Arc<dyn Array>, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    match col.data_type() {
        DataType::Utf8 => CellValue::String(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => CellValue::String(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => CellValue::Integer(col.as_primitive::<Int32Type>().value(row) as i64),
        DataType::Int64 => CellValue::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::Float32 => CellValue::Float(col.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Float64 => CellValue::Float(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => CellValue::Bool(col.as_boolean().value(row)),
        other => CellValue::String(format!("{other:?}")),
    }
}
