//! Load-once dashboard session.
//!
//! A [`DashboardSession`] fetches and prepares the record set a single time,
//! then serves every derived table from that immutable snapshot. The
//! presentation layer re-invokes [`DashboardSession::filtered`] whenever its
//! date-range input changes; each call is an independent computation.

use std::time::Instant;

use bikeshare_core::models::{DateRange, Record};
use bikeshare_core::Result;
use bikeshare_data::analysis::{filtered_view, summarize, DashboardSummary, FilteredView};
use bikeshare_data::filter::{date_span, resolve_range};
use bikeshare_data::reader::load_records_from_bytes;
use chrono::NaiveDate;

use crate::source::DataSource;

/// An immutable, loaded record set plus its provenance.
#[derive(Debug, Clone)]
pub struct DashboardSession {
    source: DataSource,
    records: Vec<Record>,
}

impl DashboardSession {
    /// Fetch `source` and prepare its records.
    ///
    /// Any fetch, parse or validation failure aborts the load.
    pub async fn load(source: DataSource) -> Result<Self> {
        let started = Instant::now();
        let bytes = source.fetch().await?;
        let records = load_records_from_bytes(&bytes)?;
        let load_time = started.elapsed();

        tracing::info!(
            source = %source,
            records = records.len(),
            load_ms = load_time.as_secs_f64() * 1000.0,
            "dataset loaded"
        );

        Ok(Self { source, records })
    }

    /// Wrap records that were prepared elsewhere.
    pub fn from_records(source: DataSource, records: Vec<Record>) -> Self {
        Self { source, records }
    }

    pub fn source(&self) -> &DataSource {
        &self.source
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// First and last day in the data; the default filter range.
    pub fn default_range(&self) -> Option<DateRange> {
        date_span(&self.records)
    }

    /// Whole-dataset aggregates, recomputed on each call.
    pub fn summary(&self) -> DashboardSummary {
        summarize(&self.records)
    }

    /// Aggregates for a date range; missing bounds default to the data span.
    ///
    /// Returns `None` only when a bound is missing and the dataset is empty.
    pub fn filtered(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Option<FilteredView> {
        let range = resolve_range(&self.records, start, end)?;
        Some(filtered_view(&self.records, range))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
