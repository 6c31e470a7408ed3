//! Expiration date validation.
//!
//! The field holds `MM/YYYY`. A date is accepted when it is not in the past:
//! a later year, or the current year with a month greater than or equal to
//! the current month. The backend expects `MM/YY`, produced by
//! [`to_submission_format`].
//!
//! # Example
//!
//! ```
//! use payze::expiry::{to_submission_format, validate_expiry_at, YearMonth};
//!
//! let today = YearMonth::new(2026, 10).unwrap();
//! assert!(validate_expiry_at("10/2026", today).is_ok());
//! assert!(validate_expiry_at("09/2026", today).is_err());
//! assert_eq!(to_submission_format("07/2027").as_deref(), Some("07/27"));
//! ```

use chrono::Datelike;
use std::fmt;
use thiserror::Error;

/// A calendar month, used both for parsed dates and for "today".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    // Field order makes the derived ordering chronological.
    year: u16,
    month: u8,
}

impl YearMonth {
    /// Creates a year-month, returning `None` if the month is not 1-12.
    pub fn new(year: u16, month: u8) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// The current month in the local time zone.
    pub fn now() -> Self {
        let today = chrono::Local::now().date_naive();
        Self {
            year: u16::try_from(today.year()).unwrap_or(u16::MAX),
            // chrono months are always 1-12
            month: today.month() as u8,
        }
    }

    /// Returns the month (1-12).
    #[inline]
    pub const fn month(&self) -> u8 {
        self.month
    }

    /// Returns the four-digit year.
    #[inline]
    pub const fn year(&self) -> u16 {
        self.year
    }

    /// Returns true if this month is strictly before `today`.
    #[inline]
    pub fn is_before(&self, today: YearMonth) -> bool {
        *self < today
    }

    /// Formats as `MM/YY`.
    pub fn format_short(&self) -> String {
        format!("{:02}/{:02}", self.month, self.year % 100)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{:04}", self.month, self.year)
    }
}

/// Errors that can occur during expiration date validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpiryError {
    /// The input is empty.
    #[error("expiration date is empty")]
    Empty,

    /// The input is not two parts separated by a single `/`.
    #[error("invalid expiration date format (expected MM/YYYY)")]
    InvalidFormat,

    /// The month is not a number between 1 and 12.
    #[error("invalid month '{0}': must be 1-12")]
    InvalidMonth(String),

    /// The year is not exactly four digits.
    #[error("invalid year '{0}': must be four digits")]
    InvalidYear(String),

    /// The date lies before the current month.
    #[error("card expired ({month:02}/{year})")]
    Expired {
        /// The expiry month.
        month: u8,
        /// The expiry year.
        year: u16,
    },
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

/// Parses `MM/YYYY` without checking it against the current date.
///
/// Whitespace anywhere in the input is ignored.
pub fn parse_expiry(input: &str) -> Result<YearMonth, ExpiryError> {
    let input: String = input.chars().filter(|c| !c.is_whitespace()).collect();

    if input.is_empty() {
        return Err(ExpiryError::Empty);
    }

    let parts: Vec<&str> = input.split('/').collect();
    let [month_str, year_str] = parts.as_slice() else {
        return Err(ExpiryError::InvalidFormat);
    };

    let month = Some(month_str)
        .filter(|m| is_digits(m))
        .and_then(|m| m.parse::<u8>().ok())
        .filter(|m| (1..=12).contains(m))
        .ok_or_else(|| ExpiryError::InvalidMonth(month_str.to_string()))?;

    if year_str.len() != 4 || !is_digits(year_str) {
        return Err(ExpiryError::InvalidYear(year_str.to_string()));
    }
    let year: u16 = year_str
        .parse()
        .map_err(|_| ExpiryError::InvalidYear(year_str.to_string()))?;

    Ok(YearMonth { year, month })
}

/// Validates `MM/YYYY` against an explicit current month.
pub fn validate_expiry_at(input: &str, today: YearMonth) -> Result<YearMonth, ExpiryError> {
    let expiry = parse_expiry(input)?;

    if expiry.is_before(today) {
        return Err(ExpiryError::Expired {
            month: expiry.month,
            year: expiry.year,
        });
    }

    Ok(expiry)
}

/// Validates `MM/YYYY` against the current local month.
///
/// # Example
///
/// ```
/// use payze::expiry::validate_expiry;
///
/// assert!(validate_expiry("12/2099").is_ok());
/// assert!(validate_expiry("01/2020").is_err());
/// ```
pub fn validate_expiry(input: &str) -> Result<YearMonth, ExpiryError> {
    validate_expiry_at(input, YearMonth::now())
}

/// Rewrites `MM/YYYY` into the `MM/YY` form the gateway expects.
///
/// The month is kept as typed and the year is cut to its last two
/// characters. Returns `None` unless the input has exactly two parts and the
/// year exactly four characters.
pub fn to_submission_format(input: &str) -> Option<String> {
    let input: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    let (month, year) = input.split_once('/')?;

    if year.contains('/') || year.chars().count() != 4 {
        return None;
    }

    let short_year: String = year.chars().skip(2).collect();
    Some(format!("{month}/{short_year}"))
}
