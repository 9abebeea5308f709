//! Calendar Utilities
//!
//! Month counting, date normalization and the month-addition strategy used
//! for cycle boundaries.
//!
//! `months_between` counts month-boundary crossings on the calendar fields
//! only. It ignores day-of-month, so 2024-01-31 -> 2024-02-01 is one month
//! while 2024-01-01 -> 2024-01-31 is zero. It is not symmetric in any useful
//! sense and callers must not assume `months_between(a, b) == -months_between(b, a)`
//! carries meaning beyond the arithmetic.

use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Number of calendar-month boundaries crossed from `from` to `to`.
///
/// Negative when `to` lies in an earlier month than `from`.
pub fn months_between(from: NaiveDate, to: NaiveDate) -> i32 {
    (to.year() - from.year()) * 12 + (to.month() as i32 - from.month() as i32)
}

/// Midnight at the start of `date`.
pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// A stored value that is either a plain date or a full timestamp.
///
/// Source rows carry both shapes for the same logical field. Ingestion
/// converts them once with [`CalendarValue::to_date`] so that cycle math only
/// ever sees `NaiveDate`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CalendarValue {
    DateTime(NaiveDateTime),
    Date(NaiveDate),
}

impl CalendarValue {
    /// Calendar date, dropping any time-of-day
    pub fn to_date(self) -> NaiveDate {
        match self {
            CalendarValue::DateTime(dt) => dt.date(),
            CalendarValue::Date(d) => d,
        }
    }

    /// Full timestamp; plain dates become midnight
    pub fn to_datetime(self) -> NaiveDateTime {
        match self {
            CalendarValue::DateTime(dt) => dt,
            CalendarValue::Date(d) => start_of_day(d),
        }
    }
}

impl From<NaiveDate> for CalendarValue {
    fn from(value: NaiveDate) -> Self {
        CalendarValue::Date(value)
    }
}

impl From<NaiveDateTime> for CalendarValue {
    fn from(value: NaiveDateTime) -> Self {
        CalendarValue::DateTime(value)
    }
}

/// How the upper end of a [`DateTimeRange`] is treated
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeEnd {
    Inclusive,
    Exclusive,
}

/// Timestamp range used for ledger filtering
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateTimeRange {
    /// Start (always inclusive)
    pub start: NaiveDateTime,
    /// End
    pub end: NaiveDateTime,
    pub end_bound: RangeEnd,
}

impl DateTimeRange {
    /// `[start, end]`
    pub fn closed(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            start,
            end,
            end_bound: RangeEnd::Inclusive,
        }
    }

    /// `[start, end)`
    pub fn half_open(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            start,
            end,
            end_bound: RangeEnd::Exclusive,
        }
    }

    /// Whole calendar days: from midnight of `first` through the last instant of `last`.
    pub fn whole_days(first: NaiveDate, last: NaiveDate) -> Self {
        let end = last
            .checked_add_days(Days::new(1))
            .map(start_of_day)
            .unwrap_or(NaiveDateTime::MAX);
        Self::half_open(start_of_day(first), end)
    }

    pub fn contains(&self, at: NaiveDateTime) -> bool {
        if at < self.start {
            return false;
        }
        match self.end_bound {
            RangeEnd::Inclusive => at <= self.end,
            RangeEnd::Exclusive => at < self.end,
        }
    }
}

/// Month-addition capability.
///
/// Chosen once at process start and injected into the cycle resolver and the
/// chart builder, so a whole process computes boundaries one way.
pub trait MonthArithmetic: Send + Sync + fmt::Debug {
    /// `date` advanced by `months` months
    fn add_months(&self, date: NaiveDate, months: u32) -> NaiveDate;

    /// Whether boundaries produced by this strategy are approximations
    fn is_approximate(&self) -> bool {
        false
    }

    fn kind(&self) -> MonthArithmeticKind;
}

/// Calendar-accurate month addition.
///
/// Day-of-month is preserved where it exists in the target month and clamped
/// to the month's last day otherwise (2024-01-31 + 1 month = 2024-02-29).
#[derive(Clone, Copy, Debug, Default)]
pub struct CalendarMonths;

impl MonthArithmetic for CalendarMonths {
    fn add_months(&self, date: NaiveDate, months: u32) -> NaiveDate {
        date.checked_add_months(Months::new(months))
            .unwrap_or(NaiveDate::MAX)
    }

    fn kind(&self) -> MonthArithmeticKind {
        MonthArithmeticKind::Calendar
    }
}

/// Flat 30-day months. Drifts from calendar months by up to several days per
/// year and can move an entry near a boundary into the neighbouring cycle.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThirtyDayMonths;

impl MonthArithmetic for ThirtyDayMonths {
    fn add_months(&self, date: NaiveDate, months: u32) -> NaiveDate {
        date.checked_add_days(Days::new(u64::from(months) * 30))
            .unwrap_or(NaiveDate::MAX)
    }

    fn is_approximate(&self) -> bool {
        true
    }

    fn kind(&self) -> MonthArithmeticKind {
        MonthArithmeticKind::ThirtyDay
    }
}

/// Configurable selection of a [`MonthArithmetic`] strategy
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonthArithmeticKind {
    #[default]
    Calendar,
    ThirtyDay,
}

impl MonthArithmeticKind {
    /// Parse from string (for environment variables)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "calendar" => Some(Self::Calendar),
            "thirty_day" | "thirty-day" | "30day" => Some(Self::ThirtyDay),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Calendar => "calendar",
            Self::ThirtyDay => "thirty_day",
        }
    }

    /// Build the strategy
    pub fn strategy(self) -> Arc<dyn MonthArithmetic> {
        match self {
            Self::Calendar => Arc::new(CalendarMonths),
            Self::ThirtyDay => {
                tracing::warn!(
                    strategy = self.as_str(),
                    "Approximate month arithmetic selected; cycle boundaries may drift from calendar months"
                );
                Arc::new(ThirtyDayMonths)
            }
        }
    }
}

impl fmt::Display for MonthArithmeticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
