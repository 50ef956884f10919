//! Date grammar built from the combinators.
//!
//! Accepted shapes, with `[sep]` being zero or more of `, - / space .`:
//!
//! - `YYYY[sep]M[sep]D[st|nd|rd|th]`
//! - `YYYY[sep]M`, landing on the first of the month
//! - `today`, `now`, `yesterday`, `tomorrow`
//!
//! `M` is a number, a full English month name or a three-letter abbreviation.

use chrono::{Days, NaiveDate};

use crate::combinator::{
    Parser, Verdict, alternation, end, fail, letters, literal, number, one_of, sequence, succeed,
};
use crate::types::{Day, Month, Year};
use crate::{CalendarDate, DateError, ErrorKind, SEPARATOR_CHARS};

/// Month as a number, a full name or an abbreviation, in that order.
///
/// Digits go first so a numeric token is never read as letters.
pub fn month<'a>() -> impl Parser<'a, Output = Month> {
    alternation((numeric_month(), long_month_name(), short_month_name()))
}

fn numeric_month<'a>() -> impl Parser<'a, Output = Month> {
    number().chain(|n| match Month::from_number(n) {
        Ok(month) => succeed(month),
        Err(err) => fail(ErrorKind::RangeViolation, err.to_string()),
    })
}

fn long_month_name<'a>() -> impl Parser<'a, Output = Month> {
    letters().chain(|name: &'a str| match Month::from_long_name(name) {
        Some(month) => succeed(month),
        None => unknown_month(name),
    })
}

fn short_month_name<'a>() -> impl Parser<'a, Output = Month> {
    letters().chain(|name: &'a str| match Month::from_short_name(name) {
        Some(month) => succeed(month),
        None => unknown_month(name),
    })
}

fn unknown_month<T>(name: &str) -> Verdict<T> {
    fail(
        ErrorKind::SyntaxMismatch,
        DateError::UnknownMonthName(name.to_owned()).to_string(),
    )
}

/// Day number with an optional, unchecked ordinal suffix.
///
/// Only `1..=31` is enforced here; the month's real length is checked once
/// the whole date is known.
pub fn day_of_month<'a>() -> impl Parser<'a, Output = u8> {
    number()
        .skip(ordinal_suffix().fallback(""))
        .chain(|n| match Day::check_number(n) {
            Ok(day) => succeed(day),
            Err(err) => fail(ErrorKind::RangeViolation, err.to_string()),
        })
}

fn ordinal_suffix<'a>() -> impl Parser<'a, Output = &'a str> {
    alternation((literal("st"), literal("nd"), literal("rd"), literal("th")))
}

/// Year number, windowed as soon as its digits are read.
pub fn year<'a>() -> impl Parser<'a, Output = Year> {
    number().chain(|n| match Year::from_typed(n) {
        Ok(year) => succeed(year),
        Err(err) => fail(ErrorKind::RangeViolation, err.to_string()),
    })
}

/// Any run of separator characters, including none.
pub fn separator<'a>() -> impl Parser<'a, Output = ()> {
    one_of(SEPARATOR_CHARS).many().map(|_| ())
}

/// `year sep month`, on the first day of that month.
pub fn year_month<'a>() -> impl Parser<'a, Output = CalendarDate> {
    sequence((year(), separator(), month()))
        .map(|(year, (), month)| CalendarDate::first_of_month(year, month))
}

/// `year sep month sep day`. The two separators need not match.
pub fn full_date<'a>() -> impl Parser<'a, Output = CalendarDate> {
    sequence((year(), separator(), month(), separator(), day_of_month())).chain(
        |(year, (), month, (), day)| match CalendarDate::from_parts(year, month, day) {
            Ok(date) => succeed(date),
            Err(err) => fail(ErrorKind::CalendarIllegal, err.to_string()),
        },
    )
}

/// Case-sensitive relative keywords, resolved against `today`.
pub fn relative<'a>(today: NaiveDate) -> impl Parser<'a, Output = CalendarDate> {
    alternation((
        alternation((literal("today"), literal("now"))).map(|_| 0_i64),
        literal("yesterday").map(|_| -1_i64),
        literal("tomorrow").map(|_| 1_i64),
    ))
    .chain(move |offset: i64| match shift(today, offset) {
        Some(date) => succeed(date),
        None => fail(
            ErrorKind::RangeViolation,
            format!("{today} shifted by {offset} days is not a representable date"),
        ),
    })
}

fn shift(day: NaiveDate, offset: i64) -> Option<CalendarDate> {
    let days = Days::new(offset.unsigned_abs());
    let shifted = match offset {
        o if o < 0 => day.checked_sub_days(days)?,
        _ => day.checked_add_days(days)?,
    };
    CalendarDate::try_from(shifted).ok()
}

/// Full date, then relative keyword, then year-month; the chosen form must
/// use up the whole input.
///
/// End of input is required inside each branch rather than after the
/// alternation, so a form that stops early cannot hide a deeper failure of
/// a longer form (`2020-01-32` reports the day, not the trailing `-32`).
pub fn date_expression<'a>(today: NaiveDate) -> impl Parser<'a, Output = CalendarDate> {
    alternation((
        full_date().skip(end()),
        relative(today).skip(end()),
        year_month().skip(end()),
    ))
}

/// The forms that need no reference day.
pub fn absolute_date<'a>() -> impl Parser<'a, Output = CalendarDate> {
    alternation((full_date().skip(end()), year_month().skip(end())))
}
