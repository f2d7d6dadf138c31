//! Compact date notations embedded in barcode payloads.
//!
//! Both element-string grammars encode dates as fixed-width digit runs with
//! no delimiters. The notation is never self-describing: it is selected by
//! context (a GS1 application identifier, or a HIBC link digit), so callers
//! pass a [`Format`] tag alongside the raw slice.

use std::{fmt, ops::Range};

use chrono::{Duration, NaiveDate};

/// A compact date notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// `MMYY`; the day is fixed to the first of the month.
    Mmyy,
    /// `MMDDYY`.
    Mmddyy,
    /// `YYMMDD`.
    Yymmdd,
    /// `YYMMDDHH`; the trailing hour digits are validated but ignored.
    Yymmddhh,
    /// `YYJJJ`: two-digit year and three-digit day-of-year.
    Yyjjj,
    /// `YYJJJHH`: as `YYJJJ`, with trailing hour digits.
    Yyjjjhh,
    /// `YYYYMMDD` with a literal four-digit year.
    Yyyymmdd,
    /// `YYMMDD` with the GS1 century pivot: two-digit years above 50 fall
    /// in the 1900s, the rest in the 2000s. The segmented grammar's
    /// [`Format::Yymmdd`] has no pivot; the divergence is per-format.
    YymmddPivot,
}

impl Format {
    /// The exact number of characters the notation occupies.
    #[must_use]
    pub const fn width(self) -> usize {
        match self {
            Self::Mmyy => 4,
            Self::Yyjjj => 5,
            Self::Mmddyy | Self::Yymmdd | Self::YymmddPivot => 6,
            Self::Yyjjjhh => 7,
            Self::Yymmddhh | Self::Yyyymmdd => 8,
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::Mmyy => "MMYY",
            Self::Mmddyy => "MMDDYY",
            Self::Yymmdd | Self::YymmddPivot => "YYMMDD",
            Self::Yymmddhh => "YYMMDDHH",
            Self::Yyjjj => "YYJJJ",
            Self::Yyjjjhh => "YYJJJHH",
            Self::Yyyymmdd => "YYYYMMDD",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a date slice does not decode.
///
/// Covers the wrong length for the notation, non-numeric characters, and
/// digit combinations the calendar cannot represent.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("malformed {format} date '{value}'")]
pub struct Error {
    format: Format,
    value: String,
}

/// Decodes `raw` according to the given notation.
///
/// # Errors
///
/// Returns [`struct@Error`] if `raw` has the wrong length for the notation,
/// contains a non-numeric character, or names an impossible calendar date.
pub fn parse(raw: &str, format: Format) -> Result<NaiveDate, Error> {
    if raw.len() != format.width() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error {
            format,
            value: raw.to_string(),
        });
    }

    let date = match format {
        Format::Mmyy => ymd(2000 + field(raw, 2..4), field(raw, 0..2), 1),
        Format::Mmddyy => ymd(
            2000 + field(raw, 4..6),
            field(raw, 0..2),
            field(raw, 2..4),
        ),
        Format::Yymmdd | Format::Yymmddhh => ymd(
            2000 + field(raw, 0..2),
            field(raw, 2..4),
            field(raw, 4..6),
        ),
        Format::Yyjjj | Format::Yyjjjhh => {
            day_of_year(2000 + field(raw, 0..2), field(raw, 2..5))
        }
        Format::Yyyymmdd => ymd(field(raw, 0..4), field(raw, 4..6), field(raw, 6..8)),
        Format::YymmddPivot => {
            let year = field(raw, 0..2);
            let century = if year > 50 { 1900 } else { 2000 };
            ymd(century + year, field(raw, 2..4), field(raw, 4..6))
        }
    };

    date.ok_or_else(|| Error {
        format,
        value: raw.to_string(),
    })
}

/// Reads a pre-validated run of ASCII digits as a number.
fn field(raw: &str, range: Range<usize>) -> i32 {
    raw[range]
        .bytes()
        .fold(0, |acc, b| acc * 10 + i32::from(b - b'0'))
}

fn ymd(year: i32, month: i32, day: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, u32::try_from(month).ok()?, u32::try_from(day).ok()?)
}

/// Resolves a day-of-year ordinal by offsetting from January 1.
///
/// The offset is signed: ordinal `000` lands on December 31 of the
/// previous year, and ordinals past year-end roll into the next year.
fn day_of_year(year: i32, ordinal: i32) -> Option<NaiveDate> {
    let jan_first = NaiveDate::from_ymd_opt(year, 1, 1)?;
    jan_first.checked_add_signed(Duration::days(i64::from(ordinal) - 1))
}
