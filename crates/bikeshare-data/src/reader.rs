//! CSV loading for daily bike-sharing records.
//!
//! Reads the `day.csv` layout into [`RawRow`]s and hands them to the
//! preparation stage, which produces validated [`Record`]s.

use std::io::Read;

use bikeshare_core::models::Record;
use bikeshare_core::{DashboardError, Result};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::preparation::prepare_records;

/// Columns that must be present in the header row.
pub const REQUIRED_COLUMNS: &[&str] = &[
    "dteday",
    "season",
    "weathersit",
    "holiday",
    "workingday",
    "casual",
    "registered",
    "cnt",
];

/// Row-index column that is discarded when present.
const INDEX_COLUMN: &str = "instant";

/// Raw `weekday` column; recomputed from the date, so it is never read.
const RAW_WEEKDAY_COLUMN: &str = "weekday";

// ── RawRow ────────────────────────────────────────────────────────────────────

/// One CSV data row before type normalisation.
///
/// Unknown columns (`instant`, `weekday`, weather measurements, ...) are
/// ignored by the deserializer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawRow {
    pub dteday: String,
    pub season: i64,
    pub weathersit: i64,
    pub holiday: i64,
    pub workingday: i64,
    pub casual: i64,
    pub registered: i64,
    pub cnt: i64,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Read every data row from a CSV stream.
///
/// Fails with [`DashboardError::Parse`] when a required column is missing
/// (row `0`, the header) or a cell cannot be converted to its field type.
pub fn read_raw_rows<R: Read>(input: R) -> Result<Vec<RawRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader.headers()?.clone();
    check_headers(&headers)?;

    let mut rows = Vec::new();
    for (idx, result) in reader.deserialize::<RawRow>().enumerate() {
        let row_no = idx + 1;
        match result {
            Ok(row) => rows.push(row),
            Err(e) => return Err(classify_csv_error(row_no, e)),
        }
    }

    debug!(rows = rows.len(), "read raw CSV rows");
    Ok(rows)
}

/// Read and prepare records from any CSV stream.
pub fn load_records<R: Read>(input: R) -> Result<Vec<Record>> {
    let raw = read_raw_rows(input)?;
    prepare_records(&raw)
}

/// Read and prepare records from an in-memory CSV document.
pub fn load_records_from_bytes(bytes: &[u8]) -> Result<Vec<Record>> {
    load_records(bytes)
}

// ── Private helpers ───────────────────────────────────────────────────────────

fn check_headers(headers: &csv::StringRecord) -> Result<()> {
    for required in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == *required) {
            return Err(DashboardError::parse(
                0,
                format!("missing required column `{}`", required),
            ));
        }
    }

    if headers.iter().any(|h| h == INDEX_COLUMN) {
        debug!("discarding `{}` row-index column", INDEX_COLUMN);
    }

    let ignored: Vec<&str> = headers
        .iter()
        .filter(|h| {
            !REQUIRED_COLUMNS.contains(h) && *h != INDEX_COLUMN && *h != RAW_WEEKDAY_COLUMN
        })
        .collect();
    if !ignored.is_empty() {
        warn!(columns = ?ignored, "ignoring unrecognised columns");
    }

    Ok(())
}

/// Cell conversion failures become row-numbered parse errors; structural
/// CSV failures (ragged rows, bad UTF-8, I/O) keep their CSV error.
fn classify_csv_error(row_no: usize, err: csv::Error) -> DashboardError {
    match err.kind() {
        csv::ErrorKind::Deserialize { err: de, .. } => {
            let field = de
                .field()
                .map(|f| format!(" (field {})", f + 1))
                .unwrap_or_default();
            DashboardError::parse(row_no, format!("{}{}", de.kind(), field))
        }
        _ => DashboardError::Csv(err),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
