//! GS1 element-string decoding.
//!
//! An element string is a concatenation of application-identifier (AI)
//! prefixes and their data. Fixed-width AIs carry exactly their declared
//! width; variable-width AIs run to the next ASCII group separator (0x1D)
//! or the end of the string. The whole input either decodes or fails: an
//! unrecognized AI aborts the decode with no partial record, unlike the
//! segmented grammar's best-effort handling.

use tracing::trace;

use super::{Error, date};
use crate::domain::ParsedBarcode;

/// ASCII group separator (FNC1), which terminates variable-width fields.
pub const GROUP_SEPARATOR: char = '\u{1d}';

/// ISO/IEC 15424 symbology identifiers scanners may emit ahead of the
/// element string proper.
const SYMBOLOGY_IDENTIFIERS: [&str; 6] = ["]C1", "]e0", "]e1", "]e2", "]d2", "]Q3"];

/// Removes a leading symbology identifier, if one is present.
#[must_use]
pub fn strip_symbology_identifier(input: &str) -> &str {
    SYMBOLOGY_IDENTIFIERS
        .iter()
        .find_map(|prefix| input.strip_prefix(prefix))
        .unwrap_or(input)
}

/// The application identifiers this decoder understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Ai {
    /// `00`: serial shipping container code, 18 digits.
    Sscc,
    /// `01`: global trade item number, 14 digits.
    Gtin,
    /// `02`: contained trade item number, 14 digits.
    Content,
    /// `10`: batch or lot number, variable width.
    Batch,
    /// `11`: production date.
    Production,
    /// `12`: due date.
    Due,
    /// `15`: best-before date.
    BestBefore,
    /// `16`: sell-by date.
    SellBy,
    /// `17`: expiration date.
    Expiry,
    /// `20`: consumer product variant, 2 digits.
    Variant,
    /// `21`: serial number, variable width.
    Serial,
    /// `240`..`243`: additional identification, variable width. Recognized
    /// and consumed so the element stream stays aligned, but surfaced in no
    /// record field.
    AdditionalId,
}

impl Ai {
    /// Identifies the AI at the front of `rest`, returning it together with
    /// the number of prefix characters it occupies.
    fn identify(rest: &str) -> Result<(Self, usize), Error> {
        let unrecognized = |len: usize| Error::UnrecognizedAi(rest.chars().take(len).collect());

        let ai = match rest.get(..2).ok_or_else(|| unrecognized(2))? {
            "00" => Self::Sscc,
            "01" => Self::Gtin,
            "02" => Self::Content,
            "10" => Self::Batch,
            "11" => Self::Production,
            "12" => Self::Due,
            "15" => Self::BestBefore,
            "16" => Self::SellBy,
            "17" => Self::Expiry,
            "20" => Self::Variant,
            "21" => Self::Serial,
            "24" => {
                return match rest.get(..3) {
                    Some("240" | "241" | "242" | "243") => Ok((Self::AdditionalId, 3)),
                    _ => Err(unrecognized(3)),
                };
            }
            _ => return Err(unrecognized(2)),
        };
        Ok((ai, 2))
    }
}

/// Decodes a GS1 element string into a record.
///
/// A leading symbology identifier is stripped, so the decoder is safe to
/// call on raw scanner output as well as on pre-stripped element strings.
/// Leading group separators are discarded before each element.
///
/// # Errors
///
/// Returns [`Error::UnrecognizedAi`] when an element starts with digits
/// outside the AI table, [`Error::IncompleteField`] when a fixed-width
/// field runs past the end of the input, and [`Error::MalformedDate`] when
/// a date field does not decode. Any error abandons the whole input; no
/// partial record is returned.
pub fn decode(input: &str) -> Result<ParsedBarcode, Error> {
    let mut record = ParsedBarcode::default();
    let mut rest = strip_symbology_identifier(input);
    loop {
        rest = rest.trim_start_matches(GROUP_SEPARATOR);
        if rest.is_empty() {
            break;
        }
        rest = element(rest, &mut record)?;
    }
    Ok(record)
}

/// Consumes one AI and its data, assigning the matching record field.
///
/// Returns the unconsumed remainder of the element string.
fn element<'a>(rest: &'a str, record: &mut ParsedBarcode) -> Result<&'a str, Error> {
    let (ai, prefix_len) = Ai::identify(rest)?;
    let data = &rest[prefix_len..];
    trace!(?ai, "consuming element");

    match ai {
        Ai::Sscc => {
            let (value, rest) = fixed(data, "SSCC", 18)?;
            set_nonempty(&mut record.product_number, value);
            Ok(rest)
        }
        Ai::Gtin => {
            let (value, rest) = fixed(data, "GTIN", 14)?;
            set_nonempty(&mut record.product_number, value);
            Ok(rest)
        }
        Ai::Content => {
            let (value, rest) = fixed(data, "CONTENT", 14)?;
            set_nonempty(&mut record.content, value);
            Ok(rest)
        }
        Ai::Production | Ai::Due | Ai::BestBefore | Ai::SellBy | Ai::Expiry => {
            let (value, rest) = fixed(data, "DATE", 6)?;
            record.expiry_date = Some(date::parse(value, date::Format::YymmddPivot)?);
            Ok(rest)
        }
        Ai::Variant => {
            let (value, rest) = fixed(data, "VARIANT", 2)?;
            set_nonempty(&mut record.variant, value);
            Ok(rest)
        }
        Ai::Batch => {
            let (value, rest) = variable(data);
            set_nonempty(&mut record.batch_number, value);
            Ok(rest)
        }
        Ai::Serial => {
            let (value, rest) = variable(data);
            set_nonempty(&mut record.serial_number, value);
            Ok(rest)
        }
        Ai::AdditionalId => {
            let (_, rest) = variable(data);
            Ok(rest)
        }
    }
}

/// Splits off a fixed-width field.
fn fixed<'a>(data: &'a str, field: &'static str, width: usize) -> Result<(&'a str, &'a str), Error> {
    data.get(..width)
        .map(|value| (value, &data[width..]))
        .ok_or(Error::IncompleteField {
            field,
            expected: width,
            available: data.len(),
        })
}

/// Splits off a variable-width field, consuming the terminating group
/// separator when one exists.
fn variable(data: &str) -> (&str, &str) {
    data.find(GROUP_SEPARATOR)
        .map_or((data, ""), |pos| (&data[..pos], &data[pos + 1..]))
}

/// Stores a value, leaving the field untouched when the value is empty.
fn set_nonempty(slot: &mut Option<String>, value: &str) {
    if !value.is_empty() {
        *slot = Some(value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use test_case::test_case;

    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn gtin_and_expiry_round_trip() {
        let record = decode("010801234500003117231231").unwrap();
        assert_eq!(record.product_number.as_deref(), Some("08012345000031"));
        assert_eq!(record.expiry_date, Some(date(2023, 12, 31)));
        assert_eq!(record.batch_number, None);
    }

    #[test]
    fn sscc_fills_the_product_number() {
        let record = decode("00123456789012345675").unwrap();
        assert_eq!(
            record.product_number.as_deref(),
            Some("123456789012345675")
        );
    }

    #[test]
    fn content_is_kept_separate_from_the_product_number() {
        let record = decode("0208012345000031").unwrap();
        assert_eq!(record.content.as_deref(), Some("08012345000031"));
        assert_eq!(record.product_number, None);
    }

    #[test]
    fn variant_is_two_digits() {
        let record = decode("2042").unwrap();
        assert_eq!(record.variant.as_deref(), Some("42"));
    }

    #[test]
    fn variable_fields_terminate_at_the_group_separator() {
        let record = decode("10ABC123\u{1d}21SERIAL9").unwrap();
        assert_eq!(record.batch_number.as_deref(), Some("ABC123"));
        assert_eq!(record.serial_number.as_deref(), Some("SERIAL9"));
    }

    #[test]
    fn variable_fields_run_to_the_end_of_input() {
        let record = decode("21SN00042").unwrap();
        assert_eq!(record.serial_number.as_deref(), Some("SN00042"));
    }

    #[test]
    fn leading_group_separators_are_discarded() {
        let record = decode("\u{1d}10LOT1\u{1d}\u{1d}21S2").unwrap();
        assert_eq!(record.batch_number.as_deref(), Some("LOT1"));
        assert_eq!(record.serial_number.as_deref(), Some("S2"));
    }

    #[test]
    fn additional_id_data_is_consumed_without_desynchronizing() {
        let record = decode("240XYZ-9\u{1d}10LOT7").unwrap();
        assert_eq!(record.batch_number.as_deref(), Some("LOT7"));
        assert_eq!(record.product_number, None);
        assert_eq!(record.serial_number, None);
    }

    #[test]
    fn repeated_date_elements_are_last_write_wins() {
        let record = decode("1701010115020202").unwrap();
        assert_eq!(record.expiry_date, Some(date(2002, 2, 2)));
    }

    #[test_case("]C1"; "code 128")]
    #[test_case("]e0"; "databar")]
    #[test_case("]d2"; "datamatrix")]
    #[test_case("]Q3"; "qr")]
    #[test_case(""; "already stripped")]
    fn symbology_identifiers_are_stripped(prefix: &str) {
        let input = format!("{prefix}0108012345000031");
        let record = decode(&input).unwrap();
        assert_eq!(record.product_number.as_deref(), Some("08012345000031"));
    }

    #[test_case("9912345", "99"; "unknown pair")]
    #[test_case("0308012345000031", "03"; "unknown zero family")]
    #[test_case("1812345", "18"; "unknown one family")]
    #[test_case("2212345", "22"; "unknown two family")]
    #[test_case("244XYZ", "244"; "reserved additional id")]
    #[test_case("1", "1"; "truncated prefix")]
    fn unknown_ais_fail_the_whole_decode(input: &str, offending: &str) {
        assert_eq!(
            decode(input),
            Err(Error::UnrecognizedAi(offending.to_string()))
        );
    }

    #[test]
    fn a_valid_element_before_an_unknown_ai_yields_no_partial_record() {
        let result = decode("01080123450000319912345");
        assert_eq!(result, Err(Error::UnrecognizedAi("99".to_string())));
    }

    #[test]
    fn truncated_fixed_field_is_reported_as_incomplete() {
        assert_eq!(
            decode("010801234"),
            Err(Error::IncompleteField {
                field: "GTIN",
                expected: 14,
                available: 7,
            })
        );
    }

    #[test]
    fn malformed_date_is_reported() {
        assert!(matches!(
            decode("17AB1231"),
            Err(Error::MalformedDate(_))
        ));
    }

    #[test]
    fn empty_variable_field_leaves_the_slot_unset() {
        let record = decode("10\u{1d}21S1").unwrap();
        assert_eq!(record.batch_number, None);
        assert_eq!(record.serial_number.as_deref(), Some("S1"));
    }
}
