//! HIBC segmented-string decoding.
//!
//! A Health Industry Bar Code starts with `+`, carries a four-character
//! labeler identification code (LIC) and a product code, and continues as
//! `/`-delimited secondary segments. Segments are classified by prefix and
//! applied in order, so a later segment overwrites an earlier assignment of
//! the same field. Unknown segments are skipped: the grammar is decoded
//! best-effort, unlike the GS1 element string's hard failure on an unknown
//! AI.

use chrono::NaiveDate;

use super::{Error, date};
use crate::domain::ParsedBarcode;

/// Decodes a HIBC barcode into a record.
///
/// An input that does not begin with `+` yields an all-null record rather
/// than an error. The dispatcher never routes such input here; the case is
/// observable only when calling the decoder directly.
///
/// # Errors
///
/// Returns [`Error::MalformedDate`] or [`Error::IncompleteField`] when a
/// recognized segment carries a date that does not decode. Unknown segment
/// prefixes are not errors.
pub fn decode(input: &str) -> Result<ParsedBarcode, Error> {
    if !input.starts_with('+') {
        return Ok(ParsedBarcode::default());
    }

    let mut record = ParsedBarcode {
        lic: input.get(1..5).map(ToString::to_string),
        product_number: product_number(input),
        ..ParsedBarcode::default()
    };

    for segment in input.split('/') {
        apply_segment(segment, &mut record)?;
    }

    Ok(record)
}

/// Extracts the product code between the LIC and the first `/` delimiter.
///
/// The character immediately before the delimiter is excluded: labelers
/// place a check character there, and it is not part of the product code.
/// With no delimiter present the same trim applies against the end of the
/// string. An empty result leaves the field unset.
fn product_number(input: &str) -> Option<String> {
    const START: usize = 5;

    let tail = input.get(START..)?;
    let end = tail.find('/').unwrap_or(tail.len());
    let value = tail.get(..end.checked_sub(1)?)?;
    (!value.is_empty()).then(|| value.to_string())
}

/// Applies one `/`-delimited segment to the record.
///
/// The leading `+LIC…` token matches no prefix and always lands in the
/// ignored case.
fn apply_segment(segment: &str, record: &mut ParsedBarcode) -> Result<(), Error> {
    if let Some(rest) = segment.strip_prefix("$$") {
        apply_lot_segment(rest, record)?;
    } else if let Some(rest) = segment.strip_prefix("$+") {
        set_nonempty(&mut record.serial_number, rest);
    } else if let Some(rest) = segment.strip_prefix('$') {
        set_nonempty(&mut record.batch_number, rest);
    } else if let Some(rest) = segment.strip_prefix("16D") {
        record.manufactured = Some(segment_date(rest, "16D")?);
    } else if let Some(rest) = segment.strip_prefix("14D") {
        record.expiry_date = Some(segment_date(rest, "14D")?);
    }
    Ok(())
}

/// Handles a `$$` segment: a link digit selects the expiry-date notation
/// and whatever follows the date is the batch number.
///
/// Link digit `7` carries no date at all. Any leading character outside
/// `2`..=`7` is not consumed as a link digit: the date defaults to `MMYY`
/// starting at that very character.
fn apply_lot_segment(rest: &str, record: &mut ParsedBarcode) -> Result<(), Error> {
    let (format, payload) = match rest.chars().next() {
        Some('2') => (Some(date::Format::Mmddyy), &rest[1..]),
        Some('3') => (Some(date::Format::Yymmdd), &rest[1..]),
        Some('4') => (Some(date::Format::Yymmddhh), &rest[1..]),
        Some('5') => (Some(date::Format::Yyjjj), &rest[1..]),
        Some('6') => (Some(date::Format::Yyjjjhh), &rest[1..]),
        Some('7') => (None, &rest[1..]),
        _ => (Some(date::Format::Mmyy), rest),
    };

    if let Some(format) = format {
        let width = format.width();
        let digits = payload.get(..width).ok_or(Error::IncompleteField {
            field: "$$",
            expected: width,
            available: payload.len(),
        })?;
        record.expiry_date = Some(date::parse(digits, format)?);
        set_nonempty(&mut record.batch_number, &payload[width..]);
    } else {
        set_nonempty(&mut record.batch_number, payload);
    }
    Ok(())
}

/// Decodes the eight-digit `YYYYMMDD` payload of a `14D`/`16D` segment.
///
/// Characters beyond the date digits are ignored.
fn segment_date(rest: &str, field: &'static str) -> Result<NaiveDate, Error> {
    let digits = rest.get(..8).ok_or(Error::IncompleteField {
        field,
        expected: 8,
        available: rest.len(),
    })?;
    Ok(date::parse(digits, date::Format::Yyyymmdd)?)
}

/// Stores a value, leaving the field untouched when the value is empty.
fn set_nonempty(slot: &mut Option<String>, value: &str) {
    if !value.is_empty() {
        *slot = Some(value.to_string());
    }
}
