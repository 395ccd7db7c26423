use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Array, Float32Array, Float64Array, Int32Array, Int64Array};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{Row, Table, REQUIRED_COLUMNS};
use crate::error::ReportError;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a measurement table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.json`    – `[{ "gt_corners": 4, "rb_corners": 4, ... }, ...]`
/// * `.csv`     – header row, one numeric cell per column
/// * `.parquet` – flat numeric columns (Int32/Int64/Float32/Float64)
pub fn load_file(path: &Path) -> Result<Table, ReportError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "json" => {
            let text = std::fs::read_to_string(path).map_err(|source| ReportError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            parse_json(&text)?
        }
        "csv" => load_csv(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => {
            return Err(ReportError::parse(format!(
                "unsupported file extension: .{other}"
            )))
        }
    };

    log::info!(
        "Loaded {} rows with columns {:?} from {}",
        table.len(),
        table.column_names(),
        path.display()
    );
    Ok(table)
}

/// Parse an in-memory JSON payload (records-oriented, the default
/// `df.to_json(orient='records')`).
pub fn parse_json(text: &str) -> Result<Table, ReportError> {
    let root: JsonValue =
        serde_json::from_str(text).map_err(|e| ReportError::parse(format!("invalid JSON: {e}")))?;

    let records = root
        .as_array()
        .ok_or_else(|| ReportError::parse("expected top-level JSON array"))?;

    let mut rows = Vec::with_capacity(records.len());

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .ok_or_else(|| ReportError::parse(format!("row {i} is not a JSON object")))?;

        let mut row = Row::default();
        for (key, val) in obj {
            let cell = match val {
                JsonValue::Number(n) => n.as_f64().map(Cell::Number).unwrap_or(Cell::Other),
                JsonValue::Null => Cell::Null,
                _ => Cell::Other,
            };
            insert_cell(&mut row, i, key, cell)?;
        }
        rows.push(row);
    }

    finish(rows)
}

// ---------------------------------------------------------------------------
// Shared cell handling
// ---------------------------------------------------------------------------

enum Cell {
    Number(f64),
    Null,
    Other,
}

fn is_required(column: &str) -> bool {
    REQUIRED_COLUMNS.contains(&column)
}

/// Store a numeric cell.  Null and non-numeric cells are errors in required
/// columns and skipped elsewhere.  NaN and infinities count as null.
fn insert_cell(row: &mut Row, index: usize, column: &str, cell: Cell) -> Result<(), ReportError> {
    let cell = match cell {
        Cell::Number(v) if !v.is_finite() => Cell::Null,
        other => other,
    };
    match cell {
        Cell::Number(v) => {
            row.values.insert(column.to_string(), v);
        }
        Cell::Null if is_required(column) => {
            return Err(ReportError::MissingValue {
                row: index,
                column: column.to_string(),
            });
        }
        Cell::Other if is_required(column) => {
            return Err(ReportError::parse(format!(
                "row {index}: '{column}' is not a number"
            )));
        }
        Cell::Null | Cell::Other => {
            log::debug!("row {index}: skipping non-numeric field '{column}'");
        }
    }
    Ok(())
}

/// Check required columns per row, drop optional columns that some rows
/// lack, then build the table.
fn finish(mut rows: Vec<Row>) -> Result<Table, ReportError> {
    for (i, row) in rows.iter().enumerate() {
        if let Some(col) = REQUIRED_COLUMNS.iter().find(|c| row.get(c).is_none()) {
            return Err(ReportError::MissingValue {
                row: i,
                column: col.to_string(),
            });
        }
    }

    let partial: BTreeSet<String> = rows
        .iter()
        .flat_map(|r| r.values.keys())
        .filter(|c| !is_required(c) && rows.iter().any(|r| r.get(c).is_none()))
        .cloned()
        .collect();
    if !partial.is_empty() {
        log::debug!("dropping columns missing from some rows: {partial:?}");
        for row in &mut rows {
            row.values.retain(|c, _| !partial.contains(c));
        }
    }

    Table::from_rows(rows)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one number per cell.
/// Empty cells count as missing.
fn load_csv(path: &Path) -> Result<Table, ReportError> {
    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| ReportError::parse(format!("opening CSV {}: {e}", path.display())))?;
    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| ReportError::parse(format!("reading CSV headers: {e}")))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.map_err(|e| ReportError::parse(format!("CSV row {row_no}: {e}")))?;

        let mut row = Row::default();
        for (col_idx, raw) in record.iter().enumerate() {
            let Some(column) = headers.get(col_idx) else {
                continue;
            };
            let raw = raw.trim();
            let cell = if raw.is_empty() {
                Cell::Null
            } else {
                raw.parse::<f64>().map(Cell::Number).unwrap_or(Cell::Other)
            };
            insert_cell(&mut row, row_no, column, cell)?;
        }
        rows.push(row);
    }

    finish(rows)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one flat numeric column per field.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Table, ReportError> {
    let file = std::fs::File::open(path).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file).map_err(parquet_err)?;
    let reader = builder.build().map_err(parquet_err)?;

    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.map_err(parquet_err)?;
        let schema = batch.schema();
        let offset = rows.len();

        rows.extend((0..batch.num_rows()).map(|_| Row::default()));

        for (col_idx, field) in schema.fields().iter().enumerate() {
            let col = batch.column(col_idx);
            for r in 0..batch.num_rows() {
                let cell = extract_cell(col, r);
                insert_cell(&mut rows[offset + r], offset + r, field.name(), cell)?;
            }
        }
    }

    finish(rows)
}

fn parquet_err(e: impl std::fmt::Display) -> ReportError {
    ReportError::parse(format!("parquet: {e}"))
}

/// Read one numeric cell from an Arrow column.
fn extract_cell(col: &Arc<dyn Array>, row: usize) -> Cell {
    if col.is_null(row) {
        return Cell::Null;
    }
    let any = col.as_any();
    let value = match col.data_type() {
        DataType::Int32 => any.downcast_ref::<Int32Array>().map(|a| a.value(row) as f64),
        DataType::Int64 => any.downcast_ref::<Int64Array>().map(|a| a.value(row) as f64),
        DataType::Float32 => any.downcast_ref::<Float32Array>().map(|a| a.value(row) as f64),
        DataType::Float64 => any.downcast_ref::<Float64Array>().map(|a| a.value(row)),
        _ => None,
    };
    value.map(Cell::Number).unwrap_or(Cell::Other)
}
