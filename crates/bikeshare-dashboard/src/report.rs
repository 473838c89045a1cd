//! Plain-text and JSON rendering of the computed dashboard tables.

use std::fmt::Write as _;

use bikeshare_core::formatting::{format_count, format_mean, format_number, percentage};
use bikeshare_core::time_utils::month_abbrev;
use bikeshare_data::aggregator::GroupStatistic;
use bikeshare_data::analysis::{DashboardSummary, FilteredView};
use bikeshare_data::distribution::Distribution;
use serde::Serialize;

/// Everything one run prints, in JSON form.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub source: &'a str,
    pub summary: &'a DashboardSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filtered: Option<&'a FilteredView>,
}

impl Report<'_> {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let summary = self.summary;

        let _ = writeln!(out, "Bike Sharing Dashboard");
        let _ = writeln!(out, "Source: {}", self.source);
        match summary.span {
            Some(span) => {
                let _ = writeln!(
                    out,
                    "Data:   {} to {} ({} days)",
                    span.start, span.end, summary.totals.days
                );
            }
            None => {
                let _ = writeln!(out, "Data:   no records");
            }
        }
        out.push('\n');

        let t = &summary.totals;
        let _ = writeln!(out, "Total Rides:            {}", format_count(t.total_rides));
        let _ = writeln!(
            out,
            "Total Casual Rides:     {} ({}%)",
            format_count(t.casual_rides),
            format_number(percentage(t.casual_rides, t.total_rides, 1), 1)
        );
        let _ = writeln!(
            out,
            "Total Registered Rides: {} ({}%)",
            format_count(t.registered_rides),
            format_number(percentage(t.registered_rides, t.total_rides, 1), 1)
        );

        section(&mut out, "Monthly Bike Rentals");
        let mut table = TextTable::new(&["Month", "Casual", "Registered", "Total"]);
        for m in &summary.monthly {
            table.row(vec![
                m.year_month.clone(),
                format_count(m.casual_sum),
                format_count(m.registered_sum),
                format_count(m.total_sum),
            ]);
        }
        out.push_str(&table.render());

        section(&mut out, "Rentals by Weather");
        out.push_str(&stat_table("Weather", &summary.by_weather, |k| k.to_string()));

        section(&mut out, "Rentals by Month of Year");
        out.push_str(&stat_table("Month", &summary.by_month, |k| month_abbrev(*k).to_string()));

        section(&mut out, "Rentals by Holiday");
        out.push_str(&stat_table("Holiday", &summary.by_holiday, yes_no));

        section(&mut out, "Rentals by Weekday");
        out.push_str(&stat_table("Weekday", &summary.by_weekday, |k| k.to_string()));

        section(&mut out, "Rentals by Season");
        let mut table = TextTable::new(&[
            "Season",
            "Days",
            "Casual avg",
            "Registered avg",
            "Max",
            "Min",
            "Mean",
        ]);
        for s in &summary.by_season {
            table.row(vec![
                s.season.to_string(),
                format_count(s.days),
                format_mean(s.casual_mean),
                format_mean(s.registered_mean),
                format_count(s.max),
                format_count(s.min),
                format_mean(s.mean),
            ]);
        }
        out.push_str(&table.render());

        if let Some(view) = self.filtered {
            render_filtered(&mut out, view);
        }

        out
    }
}

fn render_filtered(out: &mut String, view: &FilteredView) {
    section(out, &format!("Filtered: {} to {}", view.range.start, view.range.end));
    if view.range.is_empty() {
        let _ = writeln!(out, "(start date is after end date; nothing selected)");
    }
    let _ = writeln!(
        out,
        "Days: {}  Total: {}  Casual: {}  Registered: {}",
        format_count(view.totals.days),
        format_count(view.totals.total_rides),
        format_count(view.totals.casual_rides),
        format_count(view.totals.registered_rides)
    );

    section(out, "Distribution by Working Day");
    out.push_str(&distribution_table("Working Day", &view.by_working_day, yes_no));

    section(out, "Distribution by Holiday");
    out.push_str(&distribution_table("Holiday", &view.by_holiday, yes_no));

    section(out, "Distribution by Weekday");
    out.push_str(&distribution_table("Weekday", &view.by_weekday, |k| k.to_string()));

    section(out, "Rental Counts by Season");
    let mut table = TextTable::new(&["Season", "Registered", "Casual"]);
    for s in &view.seasonal_usage {
        table.row(vec![
            s.season.to_string(),
            format_count(s.registered_sum),
            format_count(s.casual_sum),
        ]);
    }
    out.push_str(&table.render());
}

fn section(out: &mut String, title: &str) {
    let _ = write!(out, "\n{}\n{}\n", title, "-".repeat(title.chars().count()));
}

fn yes_no(flag: &bool) -> String {
    let label = if *flag { "Yes" } else { "No" };
    label.to_string()
}

fn stat_table<K>(
    key_header: &str,
    stats: &[GroupStatistic<K>],
    label: impl Fn(&K) -> String,
) -> String {
    let with_sum = stats.iter().any(|s| s.sum.is_some());
    let mut headers = vec![key_header, "Days", "Max", "Min", "Mean"];
    if with_sum {
        headers.push("Sum");
    }

    let mut table = TextTable::new(&headers);
    for s in stats {
        let mut row = vec![
            label(&s.key),
            format_count(s.days),
            format_count(s.max),
            format_count(s.min),
            format_mean(s.mean),
        ];
        if with_sum {
            row.push(s.sum.map(format_count).unwrap_or_default());
        }
        table.row(row);
    }
    table.render()
}

fn distribution_table<K>(
    key_header: &str,
    dists: &[Distribution<K>],
    label: impl Fn(&K) -> String,
) -> String {
    let mut table = TextTable::new(&[key_header, "Days", "Min", "Q1", "Median", "Q3", "Max"]);
    for d in dists {
        table.row(vec![
            label(&d.key),
            format_count(d.days as u64),
            format_count(d.min),
            format_number(d.q1, 1),
            format_number(d.median, 1),
            format_number(d.q3, 1),
            format_count(d.max),
        ]);
    }
    table.render()
}

// ── TextTable ─────────────────────────────────────────────────────────────────

/// Column-aligned text table: first column left-aligned, the rest right.
struct TextTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl TextTable {
    fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    fn row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }

    fn render(&self) -> String {
        if self.rows.is_empty() {
            return "(no data)\n".to_string();
        }

        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                if let Some(w) = widths.get_mut(i) {
                    *w = (*w).max(cell.chars().count());
                }
            }
        }

        let mut out = String::new();
        self.render_line(&mut out, &self.headers, &widths);
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        self.render_line(&mut out, &rule, &widths);
        for row in &self.rows {
            self.render_line(&mut out, row, &widths);
        }
        out
    }

    fn render_line(&self, out: &mut String, cells: &[String], widths: &[usize]) {
        let line: Vec<String> = cells
            .iter()
            .zip(widths)
            .enumerate()
            .map(|(i, (cell, &w))| {
                if i == 0 {
                    format!("{:<w$}", cell, w = w)
                } else {
                    format!("{:>w$}", cell, w = w)
                }
            })
            .collect();
        let _ = writeln!(out, "{}", line.join("  ").trim_end());
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use bikeshare_core::models::{DateRange, Record, Season, WeatherSituation};
    use bikeshare_data::analysis::{filtered_view, summarize};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample() -> Vec<Record> {
        use WeatherSituation::{Clear, Misty};
        vec![
            Record::new(date(2021, 1, 5), Season::Spring, Clear, false, true, 10, 40),
            Record::new(date(2021, 1, 6), Season::Spring, Misty, false, true, 5, 45),
            Record::new(date(2021, 7, 4), Season::Fall, Clear, true, false, 2000, 3000),
        ]
    }

    #[test]
    fn test_text_report_contains_headline_and_tables() {
        let records = sample();
        let summary = summarize(&records);
        let report = Report {
            source: "day.csv",
            summary: &summary,
            filtered: None,
        };
        let text = report.to_text();

        assert!(text.contains("Source: day.csv"));
        assert!(text.contains("Total Rides:            5,100"));
        assert!(text.contains("Jan-21"));
        assert!(text.contains("Misty/Cloudy"));
        assert!(text.contains("Rentals by Season"));
        assert!(!text.contains("Filtered:"));
    }

    #[test]
    fn test_text_report_with_filter() {
        let records = sample();
        let summary = summarize(&records);
        let view = filtered_view(&records, DateRange::new(date(2021, 1, 1), date(2021, 1, 31)));
        let text = Report {
            source: "day.csv",
            summary: &summary,
            filtered: Some(&view),
        }
        .to_text();

        assert!(text.contains("Filtered: 2021-01-01 to 2021-01-31"));
        assert!(text.contains("Days: 2  Total: 100"));
        assert!(text.contains("Distribution by Weekday"));
        assert!(text.contains("Tuesday"));
    }

    #[test]
    fn test_text_report_inverted_filter_notes_empty_selection() {
        let records = sample();
        let summary = summarize(&records);
        let view = filtered_view(&records, DateRange::new(date(2021, 2, 1), date(2021, 1, 1)));
        let text = Report {
            source: "day.csv",
            summary: &summary,
            filtered: Some(&view),
        }
        .to_text();

        assert!(text.contains("nothing selected"));
        assert!(text.contains("(no data)"));
    }

    #[test]
    fn test_json_report_shape() {
        let records = sample();
        let summary = summarize(&records);
        let json = Report {
            source: "day.csv",
            summary: &summary,
            filtered: None,
        }
        .to_json()
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["source"], "day.csv");
        assert_eq!(value["summary"]["totals"]["total_rides"], 5100);
        assert_eq!(value["summary"]["monthly"][0]["total_sum"], 100);
        assert!(value.get("filtered").is_none());
    }

    #[test]
    fn test_text_table_alignment() {
        let mut table = TextTable::new(&["Key", "Value"]);
        table.row(vec!["a".to_string(), "1".to_string()]);
        table.row(vec!["longer".to_string(), "1,000".to_string()]);
        let rendered = table.render();
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines[0], "Key     Value");
        assert_eq!(lines[1], "------  -----");
        assert_eq!(lines[2], "a           1");
        assert_eq!(lines[3], "longer  1,000");
    }
}
