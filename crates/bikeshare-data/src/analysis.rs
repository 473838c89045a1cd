//! Dashboard summary pipeline.
//!
//! Bundles every derived table into [`DashboardSummary`] (whole dataset) and
//! [`FilteredView`] (one date range), ready for the presentation layer.

use std::time::Instant;

use bikeshare_core::models::{DateRange, DayOfWeek, Record, WeatherSituation};
use serde::Serialize;
use tracing::debug;

use crate::aggregator::{
    GroupStatistic, MonthlyAggregate, RideAggregator, RideTotals, SeasonStatistic,
};
use crate::distribution::{self, Distribution, SeasonUsage};
use crate::filter::{date_span, filter_by_date};

// ── Public types ──────────────────────────────────────────────────────────────

/// All whole-dataset aggregates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    /// First and last day in the data, `None` when empty.
    pub span: Option<DateRange>,
    pub totals: RideTotals,
    pub monthly: Vec<MonthlyAggregate>,
    pub by_month: Vec<GroupStatistic<u32>>,
    pub by_weather: Vec<GroupStatistic<WeatherSituation>>,
    pub by_holiday: Vec<GroupStatistic<bool>>,
    pub by_weekday: Vec<GroupStatistic<DayOfWeek>>,
    pub by_season: Vec<SeasonStatistic>,
}

/// Aggregates over the records inside one date range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilteredView {
    pub range: DateRange,
    pub totals: RideTotals,
    pub by_working_day: Vec<Distribution<bool>>,
    pub by_holiday: Vec<Distribution<bool>>,
    pub by_weekday: Vec<Distribution<DayOfWeek>>,
    pub seasonal_usage: Vec<SeasonUsage>,
}

// ── Public functions ──────────────────────────────────────────────────────────

/// Compute every whole-dataset aggregate.
pub fn summarize(records: &[Record]) -> DashboardSummary {
    let started = Instant::now();

    let summary = DashboardSummary {
        span: date_span(records),
        totals: RideAggregator::totals(records),
        monthly: RideAggregator::monthly_totals(records),
        by_month: RideAggregator::by_month(records),
        by_weather: RideAggregator::by_weather(records),
        by_holiday: RideAggregator::by_holiday(records),
        by_weekday: RideAggregator::by_weekday(records),
        by_season: RideAggregator::by_season(records),
    };

    debug!(
        records = records.len(),
        months = summary.monthly.len(),
        elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
        "dataset summarised"
    );
    summary
}

/// Filter to `range` and compute the range-specific breakdowns.
pub fn filtered_view(records: &[Record], range: DateRange) -> FilteredView {
    let filtered = filter_by_date(records, range);

    debug!(
        start = %range.start,
        end = %range.end,
        matched = filtered.len(),
        of = records.len(),
        "date filter applied"
    );

    FilteredView {
        range,
        totals: RideAggregator::totals(&filtered),
        by_working_day: distribution::by_working_day(&filtered),
        by_holiday: distribution::by_holiday(&filtered),
        by_weekday: distribution::by_weekday(&filtered),
        seasonal_usage: distribution::seasonal_usage(&filtered),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
