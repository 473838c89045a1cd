//! Normalisation of raw CSV rows into validated [`Record`]s.

use bikeshare_core::models::{Record, Season, WeatherSituation};
use bikeshare_core::time_utils::parse_date;
use bikeshare_core::{DashboardError, Result};
use tracing::debug;

use crate::reader::RawRow;

/// Prepare every raw row, stopping at the first invalid one.
///
/// Row numbers in errors are 1-based positions in `rows`.
pub fn prepare_records(rows: &[RawRow]) -> Result<Vec<Record>> {
    let records = rows
        .iter()
        .enumerate()
        .map(|(idx, row)| prepare_row(idx + 1, row))
        .collect::<Result<Vec<_>>>()?;

    debug!(records = records.len(), "prepared records");
    Ok(records)
}

/// Convert one raw row into a [`Record`].
///
/// The date is parsed first, then codes, flags and counts are validated.
/// Weekday and year are derived from the parsed date; the raw `weekday`
/// column plays no part.
pub fn prepare_row(row_no: usize, row: &RawRow) -> Result<Record> {
    let date = parse_date(&row.dteday).ok_or_else(|| {
        DashboardError::parse(row_no, format!("invalid date {:?}", row.dteday))
    })?;

    let season = Season::from_code(row.season).ok_or_else(|| {
        DashboardError::validation(
            row_no,
            format!("season code {} is outside 1-4", row.season),
        )
    })?;

    let weather = WeatherSituation::from_code(row.weathersit).ok_or_else(|| {
        DashboardError::validation(
            row_no,
            format!("weather code {} is outside 1-4", row.weathersit),
        )
    })?;

    let is_holiday = flag(row_no, "holiday", row.holiday)?;
    let is_working_day = flag(row_no, "workingday", row.workingday)?;

    let casual = count(row_no, "casual", row.casual)?;
    let registered = count(row_no, "registered", row.registered)?;
    let total = count(row_no, "cnt", row.cnt)?;

    if casual.checked_add(registered) != Some(total) {
        return Err(DashboardError::validation(
            row_no,
            format!(
                "cnt {} does not equal casual {} + registered {}",
                total, casual, registered
            ),
        ));
    }

    Ok(Record::new(
        date,
        season,
        weather,
        is_holiday,
        is_working_day,
        casual,
        registered,
    ))
}

fn flag(row_no: usize, column: &str, value: i64) -> Result<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(DashboardError::validation(
            row_no,
            format!("{} flag must be 0 or 1, got {}", column, other),
        )),
    }
}

/// Daily counts are capped at `u32::MAX` so the `u64` running sums in the
/// aggregator cannot overflow for any feasible number of days.
fn count(row_no: usize, column: &str, value: i64) -> Result<u64> {
    if value < 0 {
        return Err(DashboardError::validation(
            row_no,
            format!("{} count must be non-negative, got {}", column, value),
        ));
    }
    u32::try_from(value).map(u64::from).map_err(|_| {
        DashboardError::validation(
            row_no,
            format!("{} count {} exceeds {}", column, value, u32::MAX),
        )
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn raw(dteday: &str, season: i64, weathersit: i64, casual: i64, registered: i64) -> RawRow {
        RawRow {
            dteday: dteday.to_string(),
            season,
            weathersit,
            holiday: 0,
            workingday: 1,
            casual,
            registered,
            cnt: casual + registered,
        }
    }

    #[test]
    fn test_prepare_row_maps_codes_and_derives_fields() {
        let record = prepare_row(1, &raw("2021-01-05", 3, 2, 10, 40)).unwrap();

        assert_eq!(record.date, NaiveDate::from_ymd_opt(2021, 1, 5).unwrap());
        assert_eq!(record.season, Season::Fall);
        assert_eq!(record.season.label(), "Fall");
        assert_eq!(record.weather_situation.label(), "Misty/Cloudy");
        assert_eq!(record.weekday_name(), "Tuesday");
        assert_eq!(record.year, 2021);
        assert!(!record.is_holiday);
        assert!(record.is_working_day);
        assert_eq!(record.total_rides, 50);
    }

    #[test]
    fn test_invalid_date_is_parse_error() {
        let err = prepare_row(4, &raw("2021-02-30", 1, 1, 1, 1)).unwrap_err();
        assert!(matches!(err, DashboardError::Parse { row: 4, .. }), "got {err:?}");
    }

    #[test]
    fn test_out_of_range_season_is_validation_error() {
        let err = prepare_row(2, &raw("2021-01-05", 5, 1, 1, 1)).unwrap_err();
        match err {
            DashboardError::Validation { row, message } => {
                assert_eq!(row, 2);
                assert!(message.contains("season"));
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_out_of_range_weather_is_validation_error() {
        let err = prepare_row(1, &raw("2021-01-05", 1, 0, 1, 1)).unwrap_err();
        assert!(matches!(err, DashboardError::Validation { .. }));
    }

    #[test]
    fn test_count_mismatch_is_validation_error() {
        let mut row = raw("2021-01-05", 1, 1, 10, 40);
        row.cnt = 51;
        let err = prepare_row(1, &row).unwrap_err();
        assert!(err.to_string().contains("does not equal"), "got {err}");
    }

    #[test]
    fn test_negative_count_is_validation_error() {
        let mut row = raw("2021-01-05", 1, 1, 10, 40);
        row.casual = -10;
        row.registered = 60;
        let err = prepare_row(1, &row).unwrap_err();
        assert!(matches!(err, DashboardError::Validation { .. }));
    }

    #[test]
    fn test_oversized_count_is_validation_error() {
        let mut row = raw("2021-01-05", 1, 1, 0, 0);
        row.casual = i64::MAX;
        row.cnt = i64::MAX;
        let err = prepare_row(3, &row).unwrap_err();
        match err {
            DashboardError::Validation { row, message } => {
                assert_eq!(row, 3);
                assert!(message.contains("casual"), "got {message}");
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_largest_daily_count_is_accepted() {
        let max = i64::from(u32::MAX);
        let record = prepare_row(1, &raw("2021-01-05", 1, 1, 0, max)).unwrap();
        assert_eq!(record.total_rides, u64::from(u32::MAX));
    }

    #[test]
    fn test_flag_outside_zero_one_is_validation_error() {
        let mut row = raw("2021-01-05", 1, 1, 10, 40);
        row.holiday = 2;
        let err = prepare_row(1, &row).unwrap_err();
        assert!(err.to_string().contains("holiday"));
    }

    #[test]
    fn test_prepare_records_reports_failing_row() {
        let rows = vec![
            raw("2021-01-05", 1, 1, 10, 40),
            raw("2021-01-06", 1, 9, 5, 45),
        ];
        let err = prepare_records(&rows).unwrap_err();
        assert!(matches!(err, DashboardError::Validation { row: 2, .. }));
    }

    #[test]
    fn test_prepare_records_keeps_input_order() {
        let rows = vec![
            raw("2021-01-06", 1, 1, 5, 45),
            raw("2021-01-05", 1, 1, 10, 40),
        ];
        let records = prepare_records(&rows).unwrap();
        assert_eq!(records[0].date.to_string(), "2021-01-06");
        assert_eq!(records[1].date.to_string(), "2021-01-05");
        assert!(records
            .iter()
            .all(|r| r.total_rides == r.casual_rides + r.registered_rides));
    }
}
