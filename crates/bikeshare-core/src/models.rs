use std::fmt;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Serialize, Serializer};

/// Meteorological season as encoded by the `season` column (1-4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
}

impl Season {
    /// All seasons in code order.
    pub const ALL: [Season; 4] = [Season::Spring, Season::Summer, Season::Fall, Season::Winter];

    /// Map a raw `season` code to a variant; `None` outside 1-4.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::Spring),
            2 => Some(Self::Summer),
            3 => Some(Self::Fall),
            4 => Some(Self::Winter),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Spring => "Spring",
            Self::Summer => "Summer",
            Self::Fall => "Fall",
            Self::Winter => "Winter",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Weather situation as encoded by the `weathersit` column (1-4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum WeatherSituation {
    #[serde(rename = "Clear/Partly Cloudy")]
    Clear,
    #[serde(rename = "Misty/Cloudy")]
    Misty,
    #[serde(rename = "Light Snow/Rain")]
    LightSnowRain,
    #[serde(rename = "Severe Weather")]
    Severe,
}

impl WeatherSituation {
    /// Map a raw `weathersit` code to a variant; `None` outside 1-4.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::Clear),
            2 => Some(Self::Misty),
            3 => Some(Self::LightSnowRain),
            4 => Some(Self::Severe),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Clear => "Clear/Partly Cloudy",
            Self::Misty => "Misty/Cloudy",
            Self::LightSnowRain => "Light Snow/Rain",
            Self::Severe => "Severe Weather",
        }
    }
}

impl fmt::Display for WeatherSituation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Day of the week, ordered Monday first and rendered with its full name.
///
/// Wraps [`chrono::Weekday`], which has neither an ordering nor a full-name
/// display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DayOfWeek(pub Weekday);

impl DayOfWeek {
    pub fn of(date: NaiveDate) -> Self {
        Self(date.weekday())
    }

    pub fn name(&self) -> &'static str {
        match self.0 {
            Weekday::Mon => "Monday",
            Weekday::Tue => "Tuesday",
            Weekday::Wed => "Wednesday",
            Weekday::Thu => "Thursday",
            Weekday::Fri => "Friday",
            Weekday::Sat => "Saturday",
            Weekday::Sun => "Sunday",
        }
    }
}

impl PartialOrd for DayOfWeek {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DayOfWeek {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0
            .num_days_from_monday()
            .cmp(&other.0.num_days_from_monday())
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for DayOfWeek {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// One day of bike-sharing observations after preparation.
///
/// Constructed only by the preparation stage, which guarantees
/// `total_rides == casual_rides + registered_rides`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Record {
    pub date: NaiveDate,
    pub season: Season,
    pub weather_situation: WeatherSituation,
    pub is_holiday: bool,
    pub is_working_day: bool,
    #[serde(rename = "weekday_name")]
    pub weekday: DayOfWeek,
    pub year: i32,
    pub casual_rides: u64,
    pub registered_rides: u64,
    pub total_rides: u64,
}

impl Record {
    /// Build a record, deriving weekday, year and total from the inputs.
    pub fn new(
        date: NaiveDate,
        season: Season,
        weather_situation: WeatherSituation,
        is_holiday: bool,
        is_working_day: bool,
        casual_rides: u64,
        registered_rides: u64,
    ) -> Self {
        Self {
            date,
            season,
            weather_situation,
            is_holiday,
            is_working_day,
            weekday: DayOfWeek::of(date),
            year: date.year(),
            casual_rides,
            registered_rides,
            total_rides: casual_rides + registered_rides,
        }
    }

    pub fn weekday_name(&self) -> &'static str {
        self.weekday.name()
    }

    pub fn month(&self) -> u32 {
        self.date.month()
    }
}

/// Inclusive calendar-date range. A range whose start is after its end
/// matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }
}
