//! Parse loosely formatted, human-typed date expressions into a calendar date.
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use loose_date::parse_date;
//!
//! let now = Utc.with_ymd_and_hms(2020, 1, 4, 15, 30, 0).unwrap();
//! assert_eq!(parse_date("2020/March/4th", now).unwrap().to_string(), "2020-03-04");
//! assert_eq!(parse_date("yesterday", now).unwrap().to_string(), "2020-01-03");
//! assert!(parse_date("2021-02-29", now).is_err());
//! ```

mod clock;
pub mod combinator;
mod consts;
mod error;
pub mod grammar;
mod prelude;
mod types;

pub use clock::{
    Clock, FixedClock, SystemClock, ZoneError, canonical_zone, reference_day, set_canonical_zone,
};
pub use consts::*;
pub use error::{DateError, ErrorKind, ParseError};
pub use types::{Day, Month, Year, days_in_month, is_leap_year};

use crate::combinator::{ParseInput, ParseResult, Parser};
use crate::prelude::*;
use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Utc};
use std::str::FromStr;

/// A validated calendar day.
///
/// The day is always legal for its month and year; nothing is ever rolled
/// over into the following month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "{year}-{month}-{day}")]
pub struct CalendarDate {
    year: Year,
    month: Month,
    day: Day,
}

impl CalendarDate {
    /// Creates a date from raw numbers.
    ///
    /// # Errors
    /// Returns `DateError` if any component is out of range or the day does
    /// not exist in that month.
    pub fn new(year: u16, month: u8, day: u8) -> Result<Self, DateError> {
        let year = Year::new(year)?;
        let month = Month::new(month)?;
        Self::from_parts(year, month, day)
    }

    /// Creates a date from an already validated year and month.
    ///
    /// # Errors
    /// Returns `DateError::InvalidDay` if `day` does not exist in that month.
    pub fn from_parts(year: Year, month: Month, day: u8) -> Result<Self, DateError> {
        let day = Day::new(day, year, month)?;
        Ok(Self { year, month, day })
    }

    pub const fn first_of_month(year: Year, month: Month) -> Self {
        Self {
            year,
            month,
            day: Day::FIRST,
        }
    }

    pub const fn year(&self) -> u16 {
        self.year.get()
    }

    pub const fn month(&self) -> u8 {
        self.month.get()
    }

    pub const fn day(&self) -> u8 {
        self.day.get()
    }

    pub const fn year_typed(&self) -> Year {
        self.year
    }

    pub const fn month_typed(&self) -> Month {
        self.month
    }

    pub const fn day_typed(&self) -> Day {
        self.day
    }
}

/// Parses `input`, resolving relative keywords against `now` in the
/// canonical time zone.
///
/// # Errors
/// Returns `ParseError` describing the furthest point any form reached.
pub fn parse_date(input: &str, now: DateTime<Utc>) -> Result<CalendarDate, ParseError> {
    parse_date_in(input, now, canonical_zone())
}

/// Like [`parse_date`], with the zone that decides what "today" is given
/// explicitly.
///
/// # Errors
/// Returns `ParseError` describing the furthest point any form reached.
pub fn parse_date_in(
    input: &str,
    now: DateTime<Utc>,
    zone: FixedOffset,
) -> Result<CalendarDate, ParseError> {
    let today = reference_day(now, zone);
    run(input, &grammar::date_expression(today))
}

fn run<'a, P>(input: &'a str, parser: &P) -> Result<CalendarDate, ParseError>
where
    P: Parser<'a, Output = CalendarDate>,
{
    match parser.parse(ParseInput::new(input)) {
        ParseResult::Success { value, .. } => {
            tracing::debug!(input, date = %value, "parsed date expression");
            Ok(value)
        }
        ParseResult::Failure(failure) => {
            let err = ParseError::from_failure(input, &failure);
            tracing::debug!(
                input,
                kind = %err.kind(),
                position = err.position(),
                "rejected date expression: {}",
                err.message()
            );
            Err(err)
        }
    }
}

/// Parses date expressions against a [`Clock`].
#[derive(Debug, Clone, Default)]
pub struct DateParser<C = SystemClock> {
    clock: C,
}

impl DateParser {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: Clock> DateParser<C> {
    pub const fn with_clock(clock: C) -> Self {
        Self { clock }
    }

    /// Reads the clock once, then parses.
    ///
    /// # Errors
    /// Returns `ParseError` describing the furthest point any form reached.
    pub fn parse(&self, input: &str) -> Result<CalendarDate, ParseError> {
        parse_date(input, self.clock.now())
    }
}

/// Parses the absolute forms only; relative keywords need a clock, see
/// [`DateParser`].
impl FromStr for CalendarDate {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        run(s, &grammar::absolute_date())
    }
}

impl TryFrom<CalendarDate> for NaiveDate {
    type Error = DateError;

    fn try_from(date: CalendarDate) -> Result<Self, Self::Error> {
        Self::from_ymd_opt(
            i32::from(date.year()),
            u32::from(date.month()),
            u32::from(date.day()),
        )
        .ok_or(DateError::InvalidDay {
            year: date.year(),
            month: date.month(),
            day: date.day(),
        })
    }
}

impl TryFrom<NaiveDate> for CalendarDate {
    type Error = DateError;

    fn try_from(date: NaiveDate) -> Result<Self, Self::Error> {
        let year = u16::try_from(date.year()).map_err(|_| {
            u64::try_from(date.year())
                .map_or(DateError::YearBeforeCommonEra(date.year()), DateError::InvalidYear)
        })?;
        let month = u8::try_from(date.month())
            .map_err(|_| DateError::InvalidMonth(date.month().into()))?;
        let day =
            u8::try_from(date.day()).map_err(|_| DateError::DayOutOfRange(date.day().into()))?;
        Self::new(year, month, day)
    }
}

impl serde::Serialize for CalendarDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for CalendarDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
