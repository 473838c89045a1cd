//! Grouped summaries over daily ride records.
//!
//! Every function here is a pure view over a record slice: grouping keys are
//! collected into a [`BTreeMap`] so output order follows the key's natural
//! order (chronological, month number, enum order, Monday-first weekdays).

use std::collections::BTreeMap;

use bikeshare_core::models::{DayOfWeek, Record, Season, WeatherSituation};
use bikeshare_core::time_utils::month_label;
use serde::Serialize;

// ── RideStats ─────────────────────────────────────────────────────────────────

/// Running totals and extremes over a set of days.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RideStats {
    pub days: u64,
    pub casual: u64,
    pub registered: u64,
    pub total: u64,
    pub max_total: u64,
    pub min_total: u64,
}

impl RideStats {
    /// Add one day's counts to the running totals.
    pub fn add_record(&mut self, record: &Record) {
        if self.days == 0 {
            self.max_total = record.total_rides;
            self.min_total = record.total_rides;
        } else {
            self.max_total = self.max_total.max(record.total_rides);
            self.min_total = self.min_total.min(record.total_rides);
        }
        self.days += 1;
        self.casual += record.casual_rides;
        self.registered += record.registered_rides;
        self.total += record.total_rides;
    }

    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a Record>) -> Self {
        let mut stats = Self::default();
        for record in records {
            stats.add_record(record);
        }
        stats
    }

    /// Mean of `total_rides` per day; `0.0` when empty.
    pub fn mean_total(&self) -> f64 {
        mean(self.total, self.days)
    }

    pub fn mean_casual(&self) -> f64 {
        mean(self.casual, self.days)
    }

    pub fn mean_registered(&self) -> f64 {
        mean(self.registered, self.days)
    }
}

fn mean(sum: u64, days: u64) -> f64 {
    if days == 0 {
        0.0
    } else {
        sum as f64 / days as f64
    }
}

// ── Output tables ─────────────────────────────────────────────────────────────

/// Ride totals for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyAggregate {
    /// `"Mon-YY"`, e.g. `"Jan-21"`.
    pub year_month: String,
    pub year: i32,
    pub month: u32,
    pub casual_sum: u64,
    pub registered_sum: u64,
    pub total_sum: u64,
}

/// `total_rides` statistics for one value of a grouping key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupStatistic<K> {
    pub key: K,
    pub days: u64,
    pub max: u64,
    pub min: u64,
    pub mean: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sum: Option<u64>,
}

impl<K> GroupStatistic<K> {
    fn from_stats(key: K, stats: &RideStats, with_sum: bool) -> Self {
        Self {
            key,
            days: stats.days,
            max: stats.max_total,
            min: stats.min_total,
            mean: stats.mean_total(),
            sum: with_sum.then_some(stats.total),
        }
    }
}

/// Per-season rider means plus `total_rides` statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonStatistic {
    pub season: Season,
    pub days: u64,
    pub casual_mean: f64,
    pub registered_mean: f64,
    pub max: u64,
    pub min: u64,
    pub mean: f64,
}

/// Headline ride totals over a record slice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RideTotals {
    pub days: u64,
    pub total_rides: u64,
    pub casual_rides: u64,
    pub registered_rides: u64,
}

// ── RideAggregator ────────────────────────────────────────────────────────────

/// Stateless helper that groups ride records by calendar and category keys.
pub struct RideAggregator;

impl RideAggregator {
    /// Sum casual/registered/total rides per calendar month, chronologically.
    pub fn monthly_totals(records: &[Record]) -> Vec<MonthlyAggregate> {
        Self::group_by(records, |r| (r.year, r.month()))
            .into_iter()
            .map(|((year, month), stats)| MonthlyAggregate {
                year_month: month_label(year, month),
                year,
                month,
                casual_sum: stats.casual,
                registered_sum: stats.registered,
                total_sum: stats.total,
            })
            .collect()
    }

    /// Statistics keyed by month number (1-12), pooling all years.
    pub fn by_month(records: &[Record]) -> Vec<GroupStatistic<u32>> {
        Self::statistics(records, |r| r.month(), true)
    }

    pub fn by_weather(records: &[Record]) -> Vec<GroupStatistic<WeatherSituation>> {
        Self::statistics(records, |r| r.weather_situation, true)
    }

    /// Statistics keyed by the holiday flag, non-holidays first.
    pub fn by_holiday(records: &[Record]) -> Vec<GroupStatistic<bool>> {
        Self::statistics(records, |r| r.is_holiday, true)
    }

    /// Statistics keyed by weekday, Monday first. No sum column.
    pub fn by_weekday(records: &[Record]) -> Vec<GroupStatistic<DayOfWeek>> {
        Self::statistics(records, |r| r.weekday, false)
    }

    pub fn by_season(records: &[Record]) -> Vec<SeasonStatistic> {
        Self::group_by(records, |r| r.season)
            .into_iter()
            .map(|(season, stats)| SeasonStatistic {
                season,
                days: stats.days,
                casual_mean: stats.mean_casual(),
                registered_mean: stats.mean_registered(),
                max: stats.max_total,
                min: stats.min_total,
                mean: stats.mean_total(),
            })
            .collect()
    }

    pub fn totals(records: &[Record]) -> RideTotals {
        let stats = RideStats::from_records(records);
        RideTotals {
            days: stats.days,
            total_rides: stats.total,
            casual_rides: stats.casual,
            registered_rides: stats.registered,
        }
    }

    // ── Private ───────────────────────────────────────────────────────────────

    fn statistics<K: Ord>(
        records: &[Record],
        key_fn: impl Fn(&Record) -> K,
        with_sum: bool,
    ) -> Vec<GroupStatistic<K>> {
        Self::group_by(records, key_fn)
            .into_iter()
            .map(|(key, stats)| GroupStatistic::from_stats(key, &stats, with_sum))
            .collect()
    }

    /// Generic grouping driver; keys come back in ascending order.
    fn group_by<K: Ord>(
        records: &[Record],
        key_fn: impl Fn(&Record) -> K,
    ) -> BTreeMap<K, RideStats> {
        let mut map: BTreeMap<K, RideStats> = BTreeMap::new();
        for record in records {
            map.entry(key_fn(record)).or_default().add_record(record);
        }
        map
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
