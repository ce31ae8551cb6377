use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use arrow::array::{Array, AsArray, Int32Array, Int64Array, UInt64Array};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{Dataset, Demographics, FlowRow, MoversData, StateRow};

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

/// The four demographic columns every table must carry.
pub const FILTER_COLUMNS: [&str; 4] = ["sex", "age_group", "education", "marital_status"];

/// The aggregated person count, also required everywhere.
pub const COUNT_COLUMN: &str = "count";

/// File extensions accepted for each table, tried in this order.
const EXTENSIONS: [&str; 4] = ["csv", "json", "parquet", "pq"];

/// A required column is missing from a loaded table. Fatal to that load.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{table} table is missing required column '{column}'")]
pub struct SchemaError {
    pub table: String,
    pub column: String,
}

impl SchemaError {
    fn new(table: &str, column: &str) -> Self {
        SchemaError {
            table: table.to_string(),
            column: column.to_string(),
        }
    }
}

/// Which of the two single-state movers tables a file holds. They share a
/// shape but name their location columns after the move direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateTableKind {
    Inbound,
    Outbound,
}

impl StateTableKind {
    fn table_name(self) -> &'static str {
        match self {
            StateTableKind::Inbound => "inbound",
            StateTableKind::Outbound => "outbound",
        }
    }

    fn code_column(self) -> &'static str {
        match self {
            StateTableKind::Inbound => "current_state_code",
            StateTableKind::Outbound => "previous_state_code",
        }
    }

    fn state_column(self) -> &'static str {
        match self {
            StateTableKind::Inbound => "current_state",
            StateTableKind::Outbound => "previous_state",
        }
    }
}

const FLOW_COLUMNS: [&str; 3] = ["origin_state_code", "dest_state_code", "flow"];

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a complete data directory: `inbound.*`, `outbound.*`, and every
/// `flows*` file (sorted by filename, rows concatenated in file order).
pub fn load_dir(dir: &Path) -> Result<MoversData> {
    let inbound_path = find_table_file(dir, "inbound")?;
    let outbound_path = find_table_file(dir, "outbound")?;
    let flow_paths = find_flow_files(dir)?;

    let inbound = load_state_table(&inbound_path, StateTableKind::Inbound)
        .with_context(|| format!("loading {}", inbound_path.display()))?;
    let outbound = load_state_table(&outbound_path, StateTableKind::Outbound)
        .with_context(|| format!("loading {}", outbound_path.display()))?;
    let flows = load_flow_tables(&flow_paths)?;

    log::info!(
        "Loaded {} inbound, {} outbound, {} flow rows from {}",
        inbound.len(),
        outbound.len(),
        flows.len(),
        dir.display()
    );

    Ok(MoversData {
        inbound,
        outbound,
        flows,
    })
}

/// Load one inbound or outbound movers table. Dispatch by extension.
pub fn load_state_table(path: &Path, kind: StateTableKind) -> Result<Dataset<StateRow>> {
    let columns = [
        FILTER_COLUMNS[0],
        FILTER_COLUMNS[1],
        FILTER_COLUMNS[2],
        FILTER_COLUMNS[3],
        kind.code_column(),
        kind.state_column(),
    ];
    let rows = read_table_rows(path, kind.table_name(), &columns)?
        .into_iter()
        .map(|(fields, count)| into_state_row(fields, count))
        .collect();
    Ok(Dataset::from_rows(rows))
}

/// Load and concatenate the flow table shards, in the order given.
pub fn load_flow_tables(paths: &[PathBuf]) -> Result<Dataset<FlowRow>> {
    let columns = [
        FILTER_COLUMNS[0],
        FILTER_COLUMNS[1],
        FILTER_COLUMNS[2],
        FILTER_COLUMNS[3],
        FLOW_COLUMNS[0],
        FLOW_COLUMNS[1],
        FLOW_COLUMNS[2],
    ];
    let mut rows = Vec::new();
    for path in paths {
        let shard = read_table_rows(path, "flows", &columns)
            .with_context(|| format!("loading {}", path.display()))?;
        rows.extend(
            shard
                .into_iter()
                .map(|(fields, count)| into_flow_row(fields, count)),
        );
    }
    Ok(Dataset::from_rows(rows))
}

// ---------------------------------------------------------------------------
// Directory layout
// ---------------------------------------------------------------------------

fn find_table_file(dir: &Path, stem: &str) -> Result<PathBuf> {
    for ext in EXTENSIONS {
        let candidate = dir.join(format!("{stem}.{ext}"));
        if candidate.is_file() {
            return Ok(candidate);
        }
    }
    bail!(
        "no {stem} table ({stem}.csv / .json / .parquet) in {}",
        dir.display()
    )
}

/// All `flows*` files with a supported extension, sorted by filename so
/// shard order is deterministic.
fn find_flow_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("reading {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| {
            let stem_ok = p
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("flows"));
            let ext_ok = p
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()));
            stem_ok && ext_ok && p.is_file()
        })
        .collect();

    if paths.is_empty() {
        bail!("no flows table (flows*.csv / .json / .parquet) in {}", dir.display());
    }
    paths.sort();
    Ok(paths)
}

// ---------------------------------------------------------------------------
// Format-agnostic row reading
// ---------------------------------------------------------------------------

/// Read a table as (string fields in `columns` order, count) tuples.
/// Every format validates the schema up front and fails with [`SchemaError`]
/// when a required column is absent.
fn read_table_rows(
    path: &Path,
    table: &str,
    columns: &[&str],
) -> Result<Vec<(Vec<String>, u64)>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => {
            let file = File::open(path).context("opening CSV")?;
            read_csv_rows(file, table, columns)
        }
        "json" => {
            let text = std::fs::read_to_string(path).context("reading JSON file")?;
            read_json_rows(&text, table, columns)
        }
        "parquet" | "pq" => read_parquet_rows(path, table, columns),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

fn into_state_row(fields: Vec<String>, count: u64) -> StateRow {
    let mut fields = fields.into_iter();
    StateRow {
        demographics: Demographics {
            sex: fields.next().unwrap_or_default(),
            age_group: fields.next().unwrap_or_default(),
            education: fields.next().unwrap_or_default(),
            marital_status: fields.next().unwrap_or_default(),
        },
        state_code: fields.next().unwrap_or_default(),
        state: fields.next().unwrap_or_default(),
        count,
    }
}

fn into_flow_row(fields: Vec<String>, count: u64) -> FlowRow {
    let mut fields = fields.into_iter();
    FlowRow {
        demographics: Demographics {
            sex: fields.next().unwrap_or_default(),
            age_group: fields.next().unwrap_or_default(),
            education: fields.next().unwrap_or_default(),
            marital_status: fields.next().unwrap_or_default(),
        },
        origin_state_code: fields.next().unwrap_or_default(),
        dest_state_code: fields.next().unwrap_or_default(),
        flow: fields.next().unwrap_or_default(),
        count,
    }
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one record per row, `count`
/// holding a plain non-negative integer.
fn read_csv_rows<R: Read>(
    reader: R,
    table: &str,
    columns: &[&str],
) -> Result<Vec<(Vec<String>, u64)>> {
    let mut reader = csv::Reader::from_reader(reader);
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut indices = Vec::with_capacity(columns.len());
    for col in columns {
        let idx = headers
            .iter()
            .position(|h| h == col)
            .ok_or_else(|| SchemaError::new(table, col))?;
        indices.push(idx);
    }
    let count_idx = headers
        .iter()
        .position(|h| h == COUNT_COLUMN)
        .ok_or_else(|| SchemaError::new(table, COUNT_COLUMN))?;

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("{table} CSV row {row_no}"))?;

        let fields: Vec<String> = indices
            .iter()
            .map(|&i| record.get(i).unwrap_or("").to_string())
            .collect();

        let raw_count = record.get(count_idx).unwrap_or("");
        let count = raw_count.trim().parse::<u64>().with_context(|| {
            format!("{table} row {row_no}: count '{raw_count}' is not a non-negative integer")
        })?;

        rows.push((fields, count));
    }

    Ok(rows)
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default
/// `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "sex": "Female",
///     "age_group": "18-24",
///     "education": "Bachelor's",
///     "marital_status": "Single",
///     "current_state_code": "06",
///     "current_state": "California",
///     "count": 120
///   },
///   ...
/// ]
/// ```
fn read_json_rows(text: &str, table: &str, columns: &[&str]) -> Result<Vec<(Vec<String>, u64)>> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;
    let records = root.as_array().context("Expected top-level JSON array")?;

    // Schema check against the first record; rows after that report with
    // row context.
    if let Some(first) = records.first() {
        let obj = first.as_object().context("Row 0 is not a JSON object")?;
        for col in columns.iter().chain(std::iter::once(&COUNT_COLUMN)) {
            if !obj.contains_key(*col) {
                return Err(SchemaError::new(table, col).into());
            }
        }
    }

    let mut rows = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let mut fields = Vec::with_capacity(columns.len());
        for col in columns {
            let value = obj
                .get(*col)
                .and_then(json_field_string)
                .with_context(|| format!("{table} row {i}: missing or invalid '{col}'"))?;
            fields.push(value);
        }

        let count = obj
            .get(COUNT_COLUMN)
            .and_then(JsonValue::as_u64)
            .with_context(|| {
                format!("{table} row {i}: 'count' is not a non-negative integer")
            })?;

        rows.push((fields, count));
    }

    Ok(rows)
}

/// Accept strings, and numbers written without quotes (state codes exported
/// from spreadsheets sometimes lose their leading zero and their quoting).
fn json_field_string(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Parquet
// ---------------------------------------------------------------------------

/// Parquet tables are flat: one Utf8 column per text field and an integer
/// `count` column. Works with files written by both **Pandas**
/// (`df.to_parquet()`) and **Polars** (`df.write_parquet()`).
fn read_parquet_rows(
    path: &Path,
    table: &str,
    columns: &[&str],
) -> Result<Vec<(Vec<String>, u64)>> {
    let file = File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let mut indices = Vec::with_capacity(columns.len());
        for col in columns {
            let idx = schema
                .index_of(col)
                .map_err(|_| SchemaError::new(table, col))?;
            indices.push(idx);
        }
        let count_idx = schema
            .index_of(COUNT_COLUMN)
            .map_err(|_| SchemaError::new(table, COUNT_COLUMN))?;

        for row in 0..batch.num_rows() {
            let mut fields = Vec::with_capacity(columns.len());
            for (&idx, col) in indices.iter().zip(columns) {
                let value = parquet_string(batch.column(idx).as_ref(), row)
                    .with_context(|| format!("{table} row {row}: reading '{col}'"))?;
                fields.push(value);
            }
            let count = parquet_count(batch.column(count_idx).as_ref(), row)
                .with_context(|| format!("{table} row {row}: reading 'count'"))?;
            rows.push((fields, count));
        }
    }

    Ok(rows)
}

fn parquet_string(col: &dyn Array, row: usize) -> Result<String> {
    if col.is_null(row) {
        bail!("null value");
    }
    match col.data_type() {
        DataType::Utf8 => Ok(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => Ok(col.as_string::<i64>().value(row).to_string()),
        other => bail!("expected a string column, got {other:?}"),
    }
}

fn parquet_count(col: &dyn Array, row: usize) -> Result<u64> {
    if col.is_null(row) {
        bail!("null value");
    }
    match col.data_type() {
        DataType::Int64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int64Array>()
                .context("expected Int64Array")?;
            let v = arr.value(row);
            if v < 0 {
                bail!("count {v} is negative");
            }
            Ok(v as u64)
        }
        DataType::Int32 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int32Array>()
                .context("expected Int32Array")?;
            let v = arr.value(row);
            if v < 0 {
                bail!("count {v} is negative");
            }
            Ok(v as u64)
        }
        DataType::UInt64 => {
            let arr = col
                .as_any()
                .downcast_ref::<UInt64Array>()
                .context("expected UInt64Array")?;
            Ok(arr.value(row))
        }
        other => bail!("expected an integer count column, got {other:?}"),
    }
}
