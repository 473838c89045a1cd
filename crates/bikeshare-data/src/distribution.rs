//! Five-number summaries of daily ride counts, the data behind box plots.

use std::collections::BTreeMap;

use bikeshare_core::models::{DayOfWeek, Record, Season};
use serde::Serialize;

/// Spread of `total_rides` within one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Distribution<K> {
    pub key: K,
    pub days: usize,
    pub min: u64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: u64,
}

/// Registered and casual ride sums for one season.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeasonUsage {
    pub season: Season,
    pub registered_sum: u64,
    pub casual_sum: u64,
}

pub fn by_working_day(records: &[Record]) -> Vec<Distribution<bool>> {
    distributions(records, |r| r.is_working_day)
}

pub fn by_holiday(records: &[Record]) -> Vec<Distribution<bool>> {
    distributions(records, |r| r.is_holiday)
}

pub fn by_weekday(records: &[Record]) -> Vec<Distribution<DayOfWeek>> {
    distributions(records, |r| r.weekday)
}

/// Registered/casual sums per season, in season order.
pub fn seasonal_usage(records: &[Record]) -> Vec<SeasonUsage> {
    let mut map: BTreeMap<Season, (u64, u64)> = BTreeMap::new();
    for r in records {
        let entry = map.entry(r.season).or_default();
        entry.0 += r.registered_rides;
        entry.1 += r.casual_rides;
    }
    map.into_iter()
        .map(|(season, (registered_sum, casual_sum))| SeasonUsage {
            season,
            registered_sum,
            casual_sum,
        })
        .collect()
}

fn distributions<K: Ord>(
    records: &[Record],
    key_fn: impl Fn(&Record) -> K,
) -> Vec<Distribution<K>> {
    let mut groups: BTreeMap<K, Vec<u64>> = BTreeMap::new();
    for r in records {
        groups.entry(key_fn(r)).or_default().push(r.total_rides);
    }

    groups
        .into_iter()
        .filter_map(|(key, mut values)| {
            values.sort_unstable();
            Some(Distribution {
                key,
                days: values.len(),
                min: *values.first()?,
                q1: quantile(&values, 0.25),
                median: quantile(&values, 0.5),
                q3: quantile(&values, 0.75),
                max: *values.last()?,
            })
        })
        .collect()
}

/// Quantile of sorted, non-empty `values` by linear interpolation between
/// the closest ranks.
fn quantile(values: &[u64], q: f64) -> f64 {
    let pos = q * (values.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    values[lower] as f64 + (values[upper] as f64 - values[lower] as f64) * frac
}
