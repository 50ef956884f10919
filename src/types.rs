use crate::DateError;
use crate::consts::{
    CENTURY_CYCLE, CURRENT_CENTURY, DAYS_IN_MONTH, FEBRUARY, FEBRUARY_DAYS_LEAP, GREGORIAN_CYCLE,
    LEAP_YEAR_CYCLE, LONG_MONTH_NAMES, MAX_DAY, MAX_MONTH, MAX_YEAR, MIN_DAY, MIN_YEAR,
    PREVIOUS_CENTURY, SHORT_MONTH_NAMES, TWO_DIGIT_YEAR_LIMIT, TWO_DIGIT_YEAR_PIVOT,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU16;
use std::num::NonZeroU8;

/// A year value guaranteed to be in the range `MIN_YEAR..=MAX_YEAR` (1000..=9999)
///
/// Every such year prints as exactly four digits, which the grammar reads back
/// verbatim rather than windowing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct Year(NonZeroU16);

impl Year {
    /// Creates a new Year, validating that it lies in `MIN_YEAR..=MAX_YEAR`
    ///
    /// # Errors
    /// Returns `DateError::InvalidYear` if the value is < `MIN_YEAR` or > `MAX_YEAR`.
    pub fn new(value: u16) -> Result<Self, DateError> {
        NonZeroU16::new(value)
            .filter(|_| (MIN_YEAR..=MAX_YEAR).contains(&value))
            .map(Self)
            .ok_or(DateError::InvalidYear(value.into()))
    }

    /// Interprets a typed year number.
    ///
    /// `0..=29` is 2000-2029, `30..=99` is 1930-1999 and `1000..=9999` is
    /// taken literally. Three-digit and five-plus-digit values are rejected.
    ///
    /// # Errors
    /// Returns `DateError::InvalidYear` for values outside those windows.
    pub fn from_typed(value: u64) -> Result<Self, DateError> {
        let full = match value {
            v if v < TWO_DIGIT_YEAR_PIVOT => CURRENT_CENTURY + v,
            v if v < TWO_DIGIT_YEAR_LIMIT => PREVIOUS_CENTURY + v,
            v if (u64::from(MIN_YEAR)..=u64::from(MAX_YEAR)).contains(&v) => v,
            _ => return Err(DateError::InvalidYear(value)),
        };
        u16::try_from(full)
            .map_err(|_| DateError::InvalidYear(value))
            .and_then(Self::new)
    }

    /// Returns the year value as u16
    #[inline]
    pub const fn get(self) -> u16 {
        self.0.get()
    }

    pub const fn is_leap(self) -> bool {
        is_leap_year(self.get())
    }
}

impl TryFrom<u16> for Year {
    type Error = DateError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Year> for u16 {
    fn from(year: Year) -> Self {
        year.0.get()
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.0)
    }
}

/// A month value guaranteed to be in the range `1..=MAX_MONTH` (1..=12)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Month(NonZeroU8);

impl Month {
    /// Creates a new Month, validating that it's non-zero and <= `MAX_MONTH`
    ///
    /// # Errors
    /// Returns `DateError::InvalidMonth` if the value is 0 or > `MAX_MONTH`.
    pub fn new(value: u8) -> Result<Self, DateError> {
        let non_zero = NonZeroU8::new(value).ok_or(DateError::InvalidMonth(value.into()))?;
        if value > MAX_MONTH {
            return Err(DateError::InvalidMonth(value.into()));
        }
        Ok(Self(non_zero))
    }

    /// Month from a parsed number of any width.
    ///
    /// # Errors
    /// Returns `DateError::InvalidMonth` unless `1 <= value <= 12`.
    pub fn from_number(value: u64) -> Result<Self, DateError> {
        u8::try_from(value)
            .map_err(|_| DateError::InvalidMonth(value))
            .and_then(Self::new)
    }

    /// Looks up a full English month name, ignoring ASCII case.
    pub fn from_long_name(name: &str) -> Option<Self> {
        Self::lookup(&LONG_MONTH_NAMES, name)
    }

    /// Looks up a three-letter English abbreviation, ignoring ASCII case.
    pub fn from_short_name(name: &str) -> Option<Self> {
        Self::lookup(&SHORT_MONTH_NAMES, name)
    }

    fn lookup(table: &[&str; 12], name: &str) -> Option<Self> {
        let index = table.iter().position(|entry| entry.eq_ignore_ascii_case(name))?;
        u8::try_from(index + 1).ok().and_then(|m| Self::new(m).ok())
    }

    /// Returns the month value as u8
    #[inline]
    pub const fn get(self) -> u8 {
        self.0.get()
    }
}

impl TryFrom<u8> for Month {
    type Error = DateError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Month> for u8 {
    fn from(month: Month) -> Self {
        month.0.get()
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", self.0)
    }
}

/// A day value guaranteed to be valid for a given year and month
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Day(NonZeroU8);

impl Day {
    pub const FIRST: Self = Self(NonZeroU8::MIN);

    /// Creates a new Day, validating that it's legal for the given year and month
    ///
    /// # Errors
    /// Returns `DateError::InvalidDay` if the value is 0 or past the end of the month.
    pub fn new(value: u8, year: Year, month: Month) -> Result<Self, DateError> {
        let invalid = DateError::InvalidDay {
            year: year.get(),
            month: month.get(),
            day: value,
        };
        let non_zero = NonZeroU8::new(value).ok_or_else(|| invalid.clone())?;
        if value > days_in_month(year.get(), month.get()) {
            return Err(invalid);
        }
        Ok(Self(non_zero))
    }

    /// Checks a day number before its month is known, against the longest month.
    ///
    /// # Errors
    /// Returns `DateError::DayOutOfRange` unless `1 <= value <= 31`.
    pub fn check_number(value: u64) -> Result<u8, DateError> {
        u8::try_from(value)
            .ok()
            .filter(|day| (MIN_DAY..=MAX_DAY).contains(day))
            .ok_or(DateError::DayOutOfRange(value))
    }

    /// Returns the day value as u8
    #[inline]
    pub const fn get(self) -> u8 {
        self.0.get()
    }
}

impl From<Day> for u8 {
    fn from(day: Day) -> Self {
        day.0.get()
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", self.0)
    }
}

// Helper functions

pub const fn is_leap_year(year: u16) -> bool {
    (year % LEAP_YEAR_CYCLE == 0 && year % CENTURY_CYCLE != 0) || (year % GREGORIAN_CYCLE == 0)
}

pub const fn days_in_month(year: u16, month: u8) -> u8 {
    debug_assert!(month != 0 && month <= MAX_MONTH);

    if month == FEBRUARY && is_leap_year(year) {
        FEBRUARY_DAYS_LEAP
    } else {
        DAYS_IN_MONTH[month as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn year(value: u16) -> Year {
        Year::new(value).unwrap()
    }

    fn month(value: u8) -> Month {
        Month::new(value).unwrap()
    }

    #[test]
    fn test_year_bounds() {
        assert!(Year::new(1000).is_ok());
        assert!(Year::new(9999).is_ok());
        assert!(matches!(Year::new(0), Err(DateError::InvalidYear(0))));
        assert!(matches!(Year::new(50), Err(DateError::InvalidYear(50))));
        assert!(matches!(Year::new(999), Err(DateError::InvalidYear(999))));
        assert!(matches!(Year::new(10000), Err(DateError::InvalidYear(10000))));
    }

    #[test]
    fn test_year_from_typed_windows() {
        struct TestCase {
            typed: u64,
            expected: Option<u16>,
        }

        let cases = [
            TestCase { typed: 0, expected: Some(2000) },
            TestCase { typed: 4, expected: Some(2004) },
            TestCase { typed: 29, expected: Some(2029) },
            TestCase { typed: 30, expected: Some(1930) },
            TestCase { typed: 90, expected: Some(1990) },
            TestCase { typed: 99, expected: Some(1999) },
            TestCase { typed: 100, expected: None },
            TestCase { typed: 999, expected: None },
            TestCase { typed: 1000, expected: Some(1000) },
            TestCase { typed: 2020, expected: Some(2020) },
            TestCase { typed: 9999, expected: Some(9999) },
            TestCase { typed: 10000, expected: None },
            TestCase { typed: u64::MAX, expected: None },
        ];

        for case in &cases {
            let got = Year::from_typed(case.typed).ok().map(Year::get);
            assert_eq!(got, case.expected, "typed year {}", case.typed);
        }
    }

    #[test]
    fn test_year_display_is_four_digits() {
        assert_eq!(year(2024).to_string(), "2024");
        assert_eq!(year(1000).to_string(), "1000");
    }

    #[test]
    fn test_year_serde() {
        let json = serde_json::to_string(&year(2024)).unwrap();
        assert_eq!(json, "2024");
        let parsed: Year = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, year(2024));
        assert!(serde_json::from_str::<Year>("0").is_err());
        assert!(serde_json::from_str::<Year>("50").is_err());
    }

    #[test]
    fn test_month_new() {
        for m in 1..=12 {
            assert!(Month::new(m).is_ok(), "Month {m} should be valid");
        }
        assert!(matches!(Month::new(0), Err(DateError::InvalidMonth(0))));
        assert!(matches!(Month::new(13), Err(DateError::InvalidMonth(13))));
    }

    #[test]
    fn test_month_from_number() {
        assert_eq!(Month::from_number(12).unwrap(), month(12));
        assert!(matches!(Month::from_number(300), Err(DateError::InvalidMonth(300))));
    }

    #[test]
    fn test_month_names_ignore_case() {
        assert_eq!(Month::from_long_name("March"), Some(month(3)));
        assert_eq!(Month::from_long_name("MARCH"), Some(month(3)));
        assert_eq!(Month::from_long_name("december"), Some(month(12)));
        assert_eq!(Month::from_short_name("Mar"), Some(month(3)));
        assert_eq!(Month::from_short_name("sEp"), Some(month(9)));
    }

    #[test]
    fn test_month_names_are_exact() {
        assert_eq!(Month::from_long_name("Mar"), None);
        assert_eq!(Month::from_short_name("March"), None);
        assert_eq!(Month::from_short_name("Sept"), None);
        assert_eq!(Month::from_long_name(""), None);
        // "may" sits in both tables
        assert_eq!(Month::from_long_name("May"), Month::from_short_name("May"));
    }

    #[test]
    fn test_month_serde() {
        let json = serde_json::to_string(&month(8)).unwrap();
        assert_eq!(json, "8");
        assert!(serde_json::from_str::<Month>("13").is_err());
    }

    #[test]
    fn test_day_new_checks_month_length() {
        assert!(Day::new(31, year(2024), month(1)).is_ok());
        assert!(Day::new(28, year(2023), month(2)).is_ok());
        assert!(Day::new(29, year(2023), month(2)).is_err());
        assert!(Day::new(29, year(2024), month(2)).is_ok());
        assert!(Day::new(30, year(2024), month(4)).is_ok());
        assert!(matches!(
            Day::new(31, year(2021), month(4)),
            Err(DateError::InvalidDay {
                year: 2021,
                month: 4,
                day: 31
            })
        ));
        assert!(Day::new(0, year(2024), month(1)).is_err());
    }

    #[test]
    fn test_day_check_number() {
        assert_eq!(Day::check_number(1).unwrap(), 1);
        assert_eq!(Day::check_number(31).unwrap(), 31);
        assert!(matches!(Day::check_number(0), Err(DateError::DayOutOfRange(0))));
        assert!(matches!(Day::check_number(32), Err(DateError::DayOutOfRange(32))));
        assert!(matches!(Day::check_number(256), Err(DateError::DayOutOfRange(256))));
    }

    #[test]
    fn test_day_first() {
        assert_eq!(Day::FIRST.get(), 1);
        assert_eq!(Day::FIRST.to_string(), "01");
    }

    #[test]
    fn test_is_leap_year_cases() {
        struct TestCase {
            year: u16,
            is_leap: bool,
            description: &'static str,
        }

        let cases = [
            TestCase { year: 2020, is_leap: true, description: "divisible by 4" },
            TestCase { year: 2021, is_leap: false, description: "not divisible by 4" },
            TestCase { year: 1900, is_leap: false, description: "century not divisible by 400" },
            TestCase { year: 2100, is_leap: false, description: "century not divisible by 400" },
            TestCase { year: 2000, is_leap: true, description: "divisible by 400" },
        ];

        for case in &cases {
            assert_eq!(
                is_leap_year(case.year),
                case.is_leap,
                "Year {} ({})",
                case.year,
                case.description
            );
        }
        assert!(year(2020).is_leap());
    }

    #[test]
    fn test_days_in_month() {
        let expected = [0, 31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
        for m in 1..=12 {
            assert_eq!(days_in_month(2023, m), expected[m as usize], "Month {m}");
        }
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(1900, 2), 28);
    }
}
