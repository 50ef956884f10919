use crate::combinator::{Expectation, ParseFailure};
use crate::prelude::*;
use crate::{MAX_DAY, MAX_MONTH, MAX_YEAR, MIN_YEAR};

/// Category of a parse failure.
///
/// Variants are ordered from least to most specific; when several
/// expectations fail at the same offset the most specific one names the error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
pub enum ErrorKind {
    /// The text does not have the shape of any alternative at this position.
    #[display(fmt = "syntax mismatch")]
    SyntaxMismatch,
    /// A date was recognized but characters remain after it.
    #[display(fmt = "trailing input")]
    TrailingInput,
    /// A numeric field parsed but lies outside its domain.
    #[display(fmt = "range violation")]
    RangeViolation,
    /// Year, month and day are each in range but do not name a real day.
    #[display(fmt = "calendar illegal")]
    CalendarIllegal,
}

/// Validation failures for the date component newtypes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateError {
    #[error("Invalid year: {0} (must be {min}-{max}, or two digits)", min = MIN_YEAR, max = MAX_YEAR)]
    InvalidYear(u64),
    #[error("Month must be between 1 and {max}, got {0}", max = MAX_MONTH)]
    InvalidMonth(u64),
    #[error("Day must be between 1 and {max}, got {0}", max = MAX_DAY)]
    DayOutOfRange(u64),
    #[error("Invalid day {day} for month {year}-{month:02}")]
    InvalidDay { year: u16, month: u8, day: u8 },
    #[error("{0} is not a valid month")]
    UnknownMonthName(String),
    #[error("Invalid year: {0} is before the common era")]
    YearBeforeCommonEra(i32),
}

/// Error returned when a date expression cannot be parsed.
///
/// `position` is a character offset into the input, pointing at the
/// furthest place any alternative reached before failing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} (at position {position})")]
pub struct ParseError {
    kind: ErrorKind,
    message: String,
    position: usize,
}

impl ParseError {
    pub(crate) fn from_failure(input: &str, failure: &ParseFailure) -> Self {
        let offset = failure.offset();
        let position = input.get(..offset).map_or(offset, |head| head.chars().count());
        let expected = failure.expected();
        let kind = expected
            .iter()
            .map(Expectation::kind)
            .max()
            .unwrap_or(ErrorKind::SyntaxMismatch);

        Self {
            kind,
            message: describe(expected),
            position,
        }
    }

    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn position(&self) -> usize {
        self.position
    }
}

// Rejections are full sentences; other expectations name what would have
// matched and read as an "expected ..." list.
fn describe(expected: &[Expectation]) -> String {
    let (rejections, shapes): (Vec<&Expectation>, Vec<&Expectation>) =
        expected.iter().partition(|e| e.is_rejection());

    if !rejections.is_empty() {
        return rejections
            .iter()
            .map(|e| e.message())
            .collect::<Vec<_>>()
            .join("; ");
    }

    match shapes.as_slice() {
        [] => "unexpected input".to_owned(),
        [only] => format!("expected {}", only.message()),
        many => format!(
            "expected one of {}",
            many.iter()
                .map(|e| e.message())
                .collect::<Vec<_>>()
                .join(", ")
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_ordering_prefers_specific() {
        assert!(ErrorKind::SyntaxMismatch < ErrorKind::TrailingInput);
        assert!(ErrorKind::TrailingInput < ErrorKind::RangeViolation);
        assert!(ErrorKind::RangeViolation < ErrorKind::CalendarIllegal);
    }

    #[test]
    fn test_single_syntax_expectation() {
        let failure = ParseFailure::new(3, ErrorKind::SyntaxMismatch, "a number");
        let err = ParseError::from_failure("ab c", &failure);
        assert_eq!(err.kind(), ErrorKind::SyntaxMismatch);
        assert_eq!(err.message(), "expected a number");
        assert_eq!(err.position(), 3);
        assert_eq!(err.to_string(), "expected a number (at position 3)");
    }

    #[test]
    fn test_merged_expectations_listed() {
        let failure = ParseFailure::new(0, ErrorKind::SyntaxMismatch, "a number")
            .merge(ParseFailure::new(0, ErrorKind::SyntaxMismatch, "'today'"));
        let err = ParseError::from_failure("", &failure);
        assert_eq!(err.message(), "expected one of a number, 'today'");
    }

    #[test]
    fn test_rejection_wins_over_shape() {
        let failure = ParseFailure::new(7, ErrorKind::SyntaxMismatch, "a number").merge(
            ParseFailure::rejected(7, ErrorKind::RangeViolation, "Month must be between 1 and 12, got 13"),
        );
        let err = ParseError::from_failure("2020-13", &failure);
        assert_eq!(err.kind(), ErrorKind::RangeViolation);
        assert_eq!(err.message(), "Month must be between 1 and 12, got 13");
    }

    #[test]
    fn test_rejected_name_is_not_prefixed() {
        let failure = ParseFailure::rejected(9, ErrorKind::SyntaxMismatch, "Marc is not a valid month");
        let err = ParseError::from_failure("2020-Marc-01", &failure);
        assert_eq!(err.kind(), ErrorKind::SyntaxMismatch);
        assert_eq!(err.message(), "Marc is not a valid month");
    }

    #[test]
    fn test_position_counts_characters() {
        // "é" is two bytes, one character
        let failure = ParseFailure::new(3, ErrorKind::SyntaxMismatch, "a number");
        let err = ParseError::from_failure("éx-", &failure);
        assert_eq!(err.position(), 2);
    }

    #[test]
    fn test_date_error_messages() {
        assert_eq!(
            DateError::InvalidDay {
                year: 2021,
                month: 4,
                day: 31
            }
            .to_string(),
            "Invalid day 31 for month 2021-04"
        );
        assert_eq!(
            DateError::UnknownMonthName("Marc".to_owned()).to_string(),
            "Marc is not a valid month"
        );
        assert_eq!(
            DateError::InvalidYear(123).to_string(),
            "Invalid year: 123 (must be 1000-9999, or two digits)"
        );
        assert_eq!(
            DateError::YearBeforeCommonEra(-5).to_string(),
            "Invalid year: -5 is before the common era"
        );
    }
}
