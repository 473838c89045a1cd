use chrono::{NaiveDate, NaiveDateTime};

// ── Date parsing ──────────────────────────────────────────────────────────────

/// Date-only layouts accepted in the `dteday` column, tried in order.
const DATE_FMTS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Date-time layouts whose time component is discarded.
const DATETIME_FMTS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Parse a calendar date from a `dteday` cell.
///
/// Returns `None` for empty strings or unrecognised layouts.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    for fmt in DATE_FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }

    for fmt in DATETIME_FMTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }

    None
}

// ── Month labels ──────────────────────────────────────────────────────────────

/// Label a calendar month as `"Mon-YY"`, e.g. `"Jan-21"`.
pub fn month_label(year: i32, month: u32) -> String {
    match NaiveDate::from_ymd_opt(year, month, 1) {
        Some(d) => d.format("%b-%y").to_string(),
        None => format!("{:02}-{:02}", month, year.rem_euclid(100)),
    }
}

/// Three-letter English abbreviation for a month number (1-12).
pub fn month_abbrev(month: u32) -> &'static str {
    const NAMES: [&str; 12] = [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ];
    month
        .checked_sub(1)
        .and_then(|i| NAMES.get(i as usize))
        .copied()
        .unwrap_or("???")
}

// ── Tests ─────────────────────────────────────────────────────────────────────
