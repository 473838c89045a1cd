//! Date-range narrowing of the record set.

use bikeshare_core::models::{DateRange, Record};

/// Records whose date falls inside `range` (inclusive), in input order.
///
/// An inverted range yields an empty vector. The source slice is untouched.
pub fn filter_by_date(records: &[Record], range: DateRange) -> Vec<Record> {
    if range.is_empty() {
        return Vec::new();
    }
    records
        .iter()
        .filter(|r| range.contains(r.date))
        .copied()
        .collect()
}

/// Earliest and latest dates present, or `None` for an empty slice.
pub fn date_span(records: &[Record]) -> Option<DateRange> {
    let start = records.iter().map(|r| r.date).min()?;
    let end = records.iter().map(|r| r.date).max()?;
    Some(DateRange::new(start, end))
}

/// Complete a possibly partial caller range from the data's span.
///
/// Missing bounds default to the dataset's first/last day. With no records
/// and a missing bound there is nothing to anchor to, so `None` is returned.
pub fn resolve_range(
    records: &[Record],
    start: Option<chrono::NaiveDate>,
    end: Option<chrono::NaiveDate>,
) -> Option<DateRange> {
    match (start, end) {
        (Some(s), Some(e)) => Some(DateRange::new(s, e)),
        (s, e) => {
            let span = date_span(records)?;
            Some(DateRange::new(s.unwrap_or(span.start), e.unwrap_or(span.end)))
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
