//! Parser combinator primitives.
//!
//! A [`Parser`] is any value that turns a [`ParseInput`] cursor into a
//! [`ParseResult`]. Parsers never mutate anything: success yields a value and
//! a new cursor, failure yields the offset and what was expected there.
//! Closures of type `Fn(ParseInput<'a>) -> ParseResult<'a, T>` are parsers.
//!
//! Nothing in this module knows about dates.

use std::borrow::Cow;

use crate::ErrorKind;

/// Immutable cursor over the input text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseInput<'a> {
    source: &'a str,
    offset: usize,
}

impl<'a> ParseInput<'a> {
    pub const fn new(source: &'a str) -> Self {
        Self { source, offset: 0 }
    }

    /// Byte offset of the cursor into the source.
    pub const fn offset(&self) -> usize {
        self.offset
    }

    pub const fn source(&self) -> &'a str {
        self.source
    }

    /// Text not yet consumed.
    pub fn rest(&self) -> &'a str {
        self.source.get(self.offset..).unwrap_or_default()
    }

    pub fn is_at_end(&self) -> bool {
        self.offset >= self.source.len()
    }

    /// Cursor moved forward by `len` bytes.
    #[must_use]
    pub const fn advance(self, len: usize) -> Self {
        Self {
            source: self.source,
            offset: self.offset + len,
        }
    }
}

/// One thing that would have let parsing continue, or the reason a parsed
/// value was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expectation {
    kind: ErrorKind,
    message: Cow<'static, str>,
    rejection: bool,
}

impl Expectation {
    /// Names the token that was expected, e.g. `a number`.
    pub fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            message: message.into(),
            rejection: false,
        }
    }

    /// Explains why a token that did match was refused.
    pub fn rejection(kind: ErrorKind, reason: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            message: reason.into(),
            rejection: true,
        }
    }

    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn is_rejection(&self) -> bool {
        self.rejection
    }
}

/// Failure half of [`ParseResult`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFailure {
    offset: usize,
    expected: Vec<Expectation>,
}

impl ParseFailure {
    pub fn new(offset: usize, kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            offset,
            expected: vec![Expectation::new(kind, message)],
        }
    }

    pub fn rejected(offset: usize, kind: ErrorKind, reason: impl Into<Cow<'static, str>>) -> Self {
        Self {
            offset,
            expected: vec![Expectation::rejection(kind, reason)],
        }
    }

    pub const fn offset(&self) -> usize {
        self.offset
    }

    pub fn expected(&self) -> &[Expectation] {
        &self.expected
    }

    /// Keeps whichever failure got further into the input. Failures at the
    /// same offset pool their expectations, first-seen order, no duplicates.
    #[must_use]
    pub fn merge(mut self, other: Self) -> Self {
        match self.offset.cmp(&other.offset) {
            std::cmp::Ordering::Greater => self,
            std::cmp::Ordering::Less => other,
            std::cmp::Ordering::Equal => {
                for expectation in other.expected {
                    if !self.expected.contains(&expectation) {
                        self.expected.push(expectation);
                    }
                }
                self
            }
        }
    }
}

/// Outcome of running a parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseResult<'a, T> {
    Success { value: T, remaining: ParseInput<'a> },
    Failure(ParseFailure),
}

impl<'a, T> ParseResult<'a, T> {
    pub fn failure(offset: usize, kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self::Failure(ParseFailure::new(offset, kind, message))
    }

    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Drops the cursor, keeping the value or the failure.
    pub fn into_result(self) -> Result<T, ParseFailure> {
        match self {
            Self::Success { value, .. } => Ok(value),
            Self::Failure(failure) => Err(failure),
        }
    }

    fn map_value<U>(self, f: impl FnOnce(T) -> U) -> ParseResult<'a, U> {
        match self {
            Self::Success { value, remaining } => ParseResult::Success {
                value: f(value),
                remaining,
            },
            Self::Failure(failure) => ParseResult::Failure(failure),
        }
    }
}

/// A stateless function from an input cursor to a [`ParseResult`].
pub trait Parser<'a> {
    type Output;

    fn parse(&self, input: ParseInput<'a>) -> ParseResult<'a, Self::Output>;

    /// Transforms the value of a successful parse.
    fn map<F, U>(self, f: F) -> Map<Self, F>
    where
        Self: Sized,
        F: Fn(Self::Output) -> U,
    {
        Map { parser: self, f }
    }

    /// Runs the parser returned by `f` on whatever input is left.
    fn chain<F, P>(self, f: F) -> Chain<Self, F>
    where
        Self: Sized,
        F: Fn(Self::Output) -> P,
        P: Parser<'a>,
    {
        Chain { parser: self, f }
    }

    /// Succeeds with `default`, consuming nothing, when this parser fails.
    fn fallback(self, default: Self::Output) -> Fallback<Self, Self::Output>
    where
        Self: Sized,
        Self::Output: Clone,
    {
        Fallback {
            parser: self,
            default,
        }
    }

    /// Zero or more repetitions.
    fn many(self) -> Many<Self>
    where
        Self: Sized,
    {
        Many { parser: self }
    }

    /// Runs `next` after this parser and keeps only this parser's value.
    fn skip<P>(self, next: P) -> Skip<Self, P>
    where
        Self: Sized,
        P: Parser<'a>,
    {
        Skip { parser: self, next }
    }
}

impl<'a, T, F> Parser<'a> for F
where
    F: Fn(ParseInput<'a>) -> ParseResult<'a, T>,
{
    type Output = T;

    fn parse(&self, input: ParseInput<'a>) -> ParseResult<'a, T> {
        self(input)
    }
}

pub struct Map<P, F> {
    parser: P,
    f: F,
}

impl<'a, P, F, U> Parser<'a> for Map<P, F>
where
    P: Parser<'a>,
    F: Fn(P::Output) -> U,
{
    type Output = U;

    fn parse(&self, input: ParseInput<'a>) -> ParseResult<'a, U> {
        self.parser.parse(input).map_value(&self.f)
    }
}

pub struct Chain<P, F> {
    parser: P,
    f: F,
}

impl<'a, P, F, Q> Parser<'a> for Chain<P, F>
where
    P: Parser<'a>,
    F: Fn(P::Output) -> Q,
    Q: Parser<'a>,
{
    type Output = Q::Output;

    fn parse(&self, input: ParseInput<'a>) -> ParseResult<'a, Q::Output> {
        match self.parser.parse(input) {
            ParseResult::Success { value, remaining } => (self.f)(value).parse(remaining),
            ParseResult::Failure(failure) => ParseResult::Failure(failure),
        }
    }
}

pub struct Fallback<P, T> {
    parser: P,
    default: T,
}

impl<'a, P, T> Parser<'a> for Fallback<P, T>
where
    P: Parser<'a, Output = T>,
    T: Clone,
{
    type Output = T;

    fn parse(&self, input: ParseInput<'a>) -> ParseResult<'a, T> {
        match self.parser.parse(input) {
            success @ ParseResult::Success { .. } => success,
            ParseResult::Failure(_) => ParseResult::Success {
                value: self.default.clone(),
                remaining: input,
            },
        }
    }
}

pub struct Many<P> {
    parser: P,
}

impl<'a, P> Parser<'a> for Many<P>
where
    P: Parser<'a>,
{
    type Output = Vec<P::Output>;

    fn parse(&self, input: ParseInput<'a>) -> ParseResult<'a, Vec<P::Output>> {
        let mut values = Vec::new();
        let mut cursor = input;
        while let ParseResult::Success { value, remaining } = self.parser.parse(cursor) {
            // a parser that succeeds without consuming would repeat forever
            if remaining.offset() == cursor.offset() {
                break;
            }
            values.push(value);
            cursor = remaining;
        }
        ParseResult::Success {
            value: values,
            remaining: cursor,
        }
    }
}

pub struct Skip<P, Q> {
    parser: P,
    next: Q,
}

impl<'a, P, Q> Parser<'a> for Skip<P, Q>
where
    P: Parser<'a>,
    Q: Parser<'a>,
{
    type Output = P::Output;

    fn parse(&self, input: ParseInput<'a>) -> ParseResult<'a, P::Output> {
        match self.parser.parse(input) {
            ParseResult::Success { value, remaining } => {
                self.next.parse(remaining).map_value(|_| value)
            }
            ParseResult::Failure(failure) => ParseResult::Failure(failure),
        }
    }
}

/// Continuation used with [`Parser::chain`]: accepts a value or rejects it
/// at the current position, consuming nothing either way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict<T> {
    Accept(T),
    Reject(Expectation),
}

impl<'a, T: Clone> Parser<'a> for Verdict<T> {
    type Output = T;

    fn parse(&self, input: ParseInput<'a>) -> ParseResult<'a, T> {
        match self {
            Self::Accept(value) => ParseResult::Success {
                value: value.clone(),
                remaining: input,
            },
            Self::Reject(expectation) => ParseResult::Failure(ParseFailure {
                offset: input.offset(),
                expected: vec![expectation.clone()],
            }),
        }
    }
}

pub const fn succeed<T>(value: T) -> Verdict<T> {
    Verdict::Accept(value)
}

pub fn fail<T>(kind: ErrorKind, reason: impl Into<Cow<'static, str>>) -> Verdict<T> {
    Verdict::Reject(Expectation::rejection(kind, reason))
}

/// Matches `expected` exactly.
pub fn literal<'a>(expected: &'static str) -> impl Parser<'a, Output = &'a str> {
    move |input: ParseInput<'a>| match input.rest().get(..expected.len()) {
        Some(head) if head == expected => ParseResult::Success {
            value: head,
            remaining: input.advance(expected.len()),
        },
        _ => ParseResult::failure(
            input.offset(),
            ErrorKind::SyntaxMismatch,
            format!("'{expected}'"),
        ),
    }
}

/// Matches a single character drawn from `set`.
pub fn one_of<'a>(set: &'static str) -> impl Parser<'a, Output = char> {
    move |input: ParseInput<'a>| match input.rest().chars().next() {
        Some(c) if set.contains(c) => ParseResult::Success {
            value: c,
            remaining: input.advance(c.len_utf8()),
        },
        _ => ParseResult::failure(
            input.offset(),
            ErrorKind::SyntaxMismatch,
            format!("one of {set:?}"),
        ),
    }
}

/// Longest run of ASCII digits, read as an integer.
pub fn number<'a>() -> impl Parser<'a, Output = u64> {
    |input: ParseInput<'a>| {
        let digits = leading_run(input.rest(), |b| b.is_ascii_digit());
        if digits.is_empty() {
            return ParseResult::failure(input.offset(), ErrorKind::SyntaxMismatch, "a number");
        }
        let remaining = input.advance(digits.len());
        match digits.parse::<u64>() {
            Ok(value) => ParseResult::Success { value, remaining },
            Err(_) => ParseResult::Failure(ParseFailure::rejected(
                remaining.offset(),
                ErrorKind::RangeViolation,
                format!("{digits} is too large"),
            )),
        }
    }
}

/// Longest non-empty run of ASCII letters.
pub fn letters<'a>() -> impl Parser<'a, Output = &'a str> {
    |input: ParseInput<'a>| {
        let word = leading_run(input.rest(), |b| b.is_ascii_alphabetic());
        if word.is_empty() {
            ParseResult::failure(input.offset(), ErrorKind::SyntaxMismatch, "letters")
        } else {
            ParseResult::Success {
                value: word,
                remaining: input.advance(word.len()),
            }
        }
    }
}

/// Succeeds only when nothing is left to consume.
pub fn end<'a>() -> impl Parser<'a, Output = ()> {
    |input: ParseInput<'a>| {
        if input.is_at_end() {
            ParseResult::Success {
                value: (),
                remaining: input,
            }
        } else {
            ParseResult::failure(input.offset(), ErrorKind::TrailingInput, "end of input")
        }
    }
}

fn leading_run(text: &str, accept: impl Fn(u8) -> bool) -> &str {
    let len = text.bytes().take_while(|&b| accept(b)).count();
    // only ASCII bytes were counted, so `len` is a char boundary
    text.get(..len).unwrap_or_default()
}

/// Runs every parser in the tuple in order and yields the tuple of values.
pub struct Sequence<T>(T);

pub const fn sequence<T>(parsers: T) -> Sequence<T> {
    Sequence(parsers)
}

macro_rules! impl_sequence {
    ($($p:ident $idx:tt $v:ident),+) => {
        impl<'a, $($p: Parser<'a>),+> Parser<'a> for Sequence<($($p,)+)> {
            type Output = ($(<$p as Parser<'a>>::Output,)+);

            fn parse(&self, input: ParseInput<'a>) -> ParseResult<'a, Self::Output> {
                let parsers = &self.0;
                let remaining = input;
                $(
                    let ($v, remaining) = match parsers.$idx.parse(remaining) {
                        ParseResult::Success { value, remaining } => (value, remaining),
                        ParseResult::Failure(failure) => return ParseResult::Failure(failure),
                    };
                )+
                ParseResult::Success {
                    value: ($($v,)+),
                    remaining,
                }
            }
        }
    };
}

impl_sequence!(A 0 a, B 1 b);
impl_sequence!(A 0 a, B 1 b, C 2 c);
impl_sequence!(A 0 a, B 1 b, C 2 c, D 3 d);
impl_sequence!(A 0 a, B 1 b, C 2 c, D 3 d, E 4 e);
impl_sequence!(A 0 a, B 1 b, C 2 c, D 3 d, E 4 e, F 5 f);

/// Tries each parser in the tuple against the same input and returns the
/// first success. When all fail, reports the failure that got furthest.
pub struct Alternation<T>(T);

pub const fn alternation<T>(parsers: T) -> Alternation<T> {
    Alternation(parsers)
}

macro_rules! impl_alternation {
    ($first:ident $first_idx:tt, $($p:ident $idx:tt),+) => {
        impl<'a, T, $first, $($p),+> Parser<'a> for Alternation<($first, $($p,)+)>
        where
            $first: Parser<'a, Output = T>,
            $($p: Parser<'a, Output = T>,)+
        {
            type Output = T;

            fn parse(&self, input: ParseInput<'a>) -> ParseResult<'a, T> {
                let parsers = &self.0;
                let mut furthest = match parsers.$first_idx.parse(input) {
                    success @ ParseResult::Success { .. } => return success,
                    ParseResult::Failure(failure) => failure,
                };
                $(
                    match parsers.$idx.parse(input) {
                        success @ ParseResult::Success { .. } => return success,
                        ParseResult::Failure(failure) => furthest = furthest.merge(failure),
                    }
                )+
                ParseResult::Failure(furthest)
            }
        }
    };
}

impl_alternation!(A 0, B 1);
impl_alternation!(A 0, B 1, C 2);
impl_alternation!(A 0, B 1, C 2, D 3);
impl_alternation!(A 0, B 1, C 2, D 3, E 4);
