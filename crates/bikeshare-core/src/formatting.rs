/// Format a floating-point number with thousands separators and a fixed number
/// of decimal places.
///
/// # Examples
///
/// ```
/// use bikeshare_core::formatting::format_number;
///
/// assert_eq!(format_number(4504.36, 1), "4,504.4");
/// assert_eq!(format_number(3292679.0, 0), "3,292,679");
/// assert_eq!(format_number(0.0, 2), "0.00");
/// assert_eq!(format_number(-1234.5, 1), "-1,234.5");
/// ```
pub fn format_number(value: f64, decimals: u32) -> String {
    let negative = value < 0.0;
    let factor = 10_f64.powi(decimals as i32);
    let scaled = (value.abs() * factor).round() as u64;

    let divisor = 10_u64.pow(decimals);
    let grouped = group_thousands(&(scaled / divisor).to_string());

    let body = if decimals == 0 {
        grouped
    } else {
        format!(
            "{}.{:0width$}",
            grouped,
            scaled % divisor,
            width = decimals as usize
        )
    };

    if negative && scaled != 0 {
        format!("-{}", body)
    } else {
        body
    }
}

/// Format a ride count with thousands separators.
///
/// # Examples
///
/// ```
/// use bikeshare_core::formatting::format_count;
///
/// assert_eq!(format_count(22), "22");
/// assert_eq!(format_count(620017), "620,017");
/// ```
pub fn format_count(count: u64) -> String {
    group_thousands(&count.to_string())
}

/// Format a per-day mean with two decimal places.
pub fn format_mean(mean: f64) -> String {
    format_number(mean, 2)
}

/// Calculate `(part / whole) * 100`, rounded to `decimal_places`.
///
/// Returns `0.0` if `whole` is zero.
///
/// # Examples
///
/// ```
/// use bikeshare_core::formatting::percentage;
///
/// assert!((percentage(620017, 3292679, 1) - 18.8).abs() < 1e-9);
/// assert_eq!(percentage(5, 0, 2), 0.0);
/// ```
pub fn percentage(part: u64, whole: u64, decimal_places: u32) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    let raw = (part as f64 / whole as f64) * 100.0;
    let factor = 10_f64.powi(decimal_places as i32);
    (raw * factor).round() / factor
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    let len = s.len();
    let mut result = String::with_capacity(len + len / 3);
    for (i, c) in s.chars().enumerate() {
        if i != 0 && (len - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result
}

// ── Tests ──────────────────────────────────────────────────────────────────────
