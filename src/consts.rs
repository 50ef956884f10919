/// Smallest four-digit year accepted verbatim
pub const MIN_YEAR: u16 = 1000;
/// Maximum valid year (inclusive)
pub const MAX_YEAR: u16 = 9999;

/// Two-digit years below this pivot land in the 2000s, the rest in the 1900s
pub const TWO_DIGIT_YEAR_PIVOT: u64 = 30;
/// Upper bound (exclusive) of the two-digit year window
pub const TWO_DIGIT_YEAR_LIMIT: u64 = 100;
/// Century added to two-digit years below the pivot
pub const CURRENT_CENTURY: u64 = 2000;
/// Century added to two-digit years at or above the pivot
pub const PREVIOUS_CENTURY: u64 = 1900;

/// Maximum valid month (December)
pub const MAX_MONTH: u8 = 12;

/// First day of month, used for lower bounds
pub const MIN_DAY: u8 = 1;
/// Largest day any month can have, checked before the month is known
pub const MAX_DAY: u8 = 31;

/// Month number for February
pub const FEBRUARY: u8 = 2;

/// Days in February for leap years
pub const FEBRUARY_DAYS_LEAP: u8 = 29;

/// Maximum days in each month (index 0 is unused, months are 1-indexed)
/// February shows 28 days (non-leap year default)
pub const DAYS_IN_MONTH: [u8; 13] = [
    0,  // index 0 unused (months are 1-indexed)
    31, // January
    28, // February (non-leap, adjusted by is_leap_year check)
    31, // March
    30, // April
    31, // May
    30, // June
    31, // July
    31, // August
    30, // September
    31, // October
    30, // November
    31, // December
];

/// Leap year occurs every 4 years
pub(crate) const LEAP_YEAR_CYCLE: u16 = 4;
/// Century years are not leap years unless...
pub(crate) const CENTURY_CYCLE: u16 = 100;
/// ...they are divisible by 400 (Gregorian calendar correction)
pub(crate) const GREGORIAN_CYCLE: u16 = 400;

/// Full English month names, lowercase, in calendar order
pub const LONG_MONTH_NAMES: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Three-letter English month abbreviations, lowercase, in calendar order
pub const SHORT_MONTH_NAMES: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// Characters accepted between date components, in any mix and count
pub const SEPARATOR_CHARS: &str = ",-/ .";
