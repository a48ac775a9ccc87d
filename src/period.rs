//! Period presets and date-range resolution for expense queries.
//!
//! A period describes the window of time a query covers (one day, one week,
//! one month, or one year). [resolve_range] turns a reference instant and a
//! period into the concrete start and end instants of that window, computed
//! on the calendar of the offset carried by the reference instant.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::{Date, Duration, Month, OffsetDateTime, Time, macros::time};

/// The aggregation granularity for expense queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Period {
    /// A single calendar day.
    #[default]
    Daily,
    /// A Sunday-to-Saturday calendar week.
    Weekly,
    /// A calendar month.
    Monthly,
    /// A calendar year.
    Yearly,
}

impl Period {
    /// Parse a `period` query parameter value.
    ///
    /// Unrecognized values fall back to [Period::Daily]. The original API
    /// behaved this way and clients rely on it, so an unknown period must
    /// never be rejected as an error.
    pub fn from_query(value: &str) -> Self {
        match value {
            "weekly" => Self::Weekly,
            "monthly" => Self::Monthly,
            "yearly" => Self::Yearly,
            _ => Self::Daily,
        }
    }

    /// The value used for this period in query strings.
    pub fn as_query_value(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }
}

impl Serialize for Period {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_query_value())
    }
}

// Deserialization goes through [Period::from_query] to keep the unknown-value
// fallback, which a derived implementation would reject as an invalid variant.
impl<'de> Deserialize<'de> for Period {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;

        Ok(Period::from_query(&raw))
    }
}

/// The inclusive interval `[start, end]` that a period resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DateRange {
    /// The first instant of the period.
    #[serde(rename = "startDate", with = "time::serde::rfc3339")]
    pub start: OffsetDateTime,
    /// The last instant of the period.
    #[serde(rename = "endDate", with = "time::serde::rfc3339")]
    pub end: OffsetDateTime,
}

/// The last representable moment of a calendar day, to millisecond precision.
const LAST_MOMENT: Time = time!(23:59:59.999);

/// Compute the date range covered by `period` around `reference`.
///
/// All boundaries are computed on the calendar of the offset carried by
/// `reference`, so callers must first convert the reference instant to the
/// timezone the range should be aligned to. The returned range always
/// satisfies `start <= end` and is inclusive on both ends.
pub fn resolve_range(reference: OffsetDateTime, period: Period) -> DateRange {
    let date = reference.date();
    let offset = reference.offset();

    match period {
        Period::Daily => day_bounds(date, offset),
        Period::Weekly => week_bounds(date, offset),
        Period::Monthly => month_bounds(date.year(), date.month(), offset),
        Period::Yearly => year_bounds(date.year(), offset),
    }
}

fn day_bounds(date: Date, offset: time::UtcOffset) -> DateRange {
    DateRange {
        start: date.with_time(Time::MIDNIGHT).assume_offset(offset),
        end: date.with_time(LAST_MOMENT).assume_offset(offset),
    }
}

fn week_bounds(date: Date, offset: time::UtcOffset) -> DateRange {
    // Weeks run Sunday through Saturday.
    let days_from_sunday = date.weekday().number_days_from_sunday() as i64;
    let start_date = date - Duration::days(days_from_sunday);
    let end_date = start_date + Duration::days(6);

    DateRange {
        start: start_date.with_time(Time::MIDNIGHT).assume_offset(offset),
        end: end_date.with_time(LAST_MOMENT).assume_offset(offset),
    }
}

fn month_bounds(year: i32, month: Month, offset: time::UtcOffset) -> DateRange {
    let start_date = Date::from_calendar_date(year, month, 1).expect("invalid month start date");
    let end_date = Date::from_calendar_date(year, month, last_day_of_month(year, month))
        .expect("invalid month end date");

    DateRange {
        start: start_date.with_time(Time::MIDNIGHT).assume_offset(offset),
        end: end_date.with_time(LAST_MOMENT).assume_offset(offset),
    }
}

fn year_bounds(year: i32, offset: time::UtcOffset) -> DateRange {
    let start_date =
        Date::from_calendar_date(year, Month::January, 1).expect("invalid year start date");
    let end_date =
        Date::from_calendar_date(year, Month::December, 31).expect("invalid year end date");

    DateRange {
        start: start_date.with_time(Time::MIDNIGHT).assume_offset(offset),
        end: end_date.with_time(LAST_MOMENT).assume_offset(offset),
    }
}

fn last_day_of_month(year: i32, month: Month) -> u8 {
    match month {
        Month::January
        | Month::March
        | Month::May
        | Month::July
        | Month::August
        | Month::October
        | Month::December => 31,
        Month::April | Month::June | Month::September | Month::November => 30,
        Month::February => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}
