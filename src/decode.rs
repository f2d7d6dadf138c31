//! Symbology classification and decoding.
//!
//! Raw scanner output flows one way: the dispatcher classifies the string,
//! exactly one decoder (or a passthrough) runs, and the caller receives a
//! [`ParsedBarcode`] or an [`Error`]. Every function here is pure and
//! synchronous: no shared state, no I/O, safe to call concurrently from any
//! number of threads.

use std::fmt;

use tracing::debug;

use crate::domain::ParsedBarcode;

/// Compact date notations shared by both grammars.
pub mod date;
/// GS1 application-identifier element strings.
pub mod gs1;
/// HIBC `/`-delimited segment strings.
pub mod hibc;

/// The symbology families the dispatcher distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbology {
    /// `+`-prefixed Health Industry Bar Code.
    Hibc,
    /// GS1 element string.
    Gs1,
    /// 13-digit GTIN, passed through verbatim. The check digit is not
    /// verified.
    Gtin13,
    /// A bare product number shorter than a GTIN-13, passed through
    /// verbatim.
    ProductNumber,
}

impl fmt::Display for Symbology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Hibc => "HIBC",
            Self::Gs1 => "GS1",
            Self::Gtin13 => "GTIN-13",
            Self::ProductNumber => "product number",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while classifying or decoding a scan payload.
///
/// All failures are returned as values; the scan-handling caller decides
/// whether to log, signal failure feedback, or prompt a rescan.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    /// The input matches none of the classification rules.
    #[error("unrecognized barcode format: '{0}'")]
    InvalidFormat(String),

    /// A GS1 element began with digits outside the application-identifier
    /// table. The whole decode is abandoned; no partial record survives.
    #[error("unrecognized application identifier at '{0}'")]
    UnrecognizedAi(String),

    /// A date field did not decode.
    #[error(transparent)]
    MalformedDate(#[from] date::Error),

    /// A fixed-width field required more characters than the input had
    /// left.
    #[error("field {field} requires {expected} characters, found {available}")]
    IncompleteField {
        /// The field being consumed.
        field: &'static str,
        /// Width the field requires.
        expected: usize,
        /// Characters remaining in the input.
        available: usize,
    },
}

/// Classifies a raw scanned string into its symbology family.
///
/// The rules run in a fixed priority order and are exhaustive: every input
/// resolves to exactly one family or to [`Error::InvalidFormat`].
///
/// 1. Starts with `+`: HIBC.
/// 2. Longer than 13 characters and starts with `0`: GS1 element string.
/// 3. Exactly 13 characters starting with a digit: GTIN-13 passthrough.
/// 4. Shorter than 13 characters starting with a digit: bare product
///    number passthrough.
/// 5. Anything else, including the empty string, is invalid.
///
/// # Errors
///
/// Returns [`Error::InvalidFormat`] when no rule matches.
pub fn classify(input: &str) -> Result<Symbology, Error> {
    let starts_with_digit = input.chars().next().is_some_and(|c| c.is_ascii_digit());

    let symbology = if input.starts_with('+') {
        Symbology::Hibc
    } else if input.len() > 13 && input.starts_with('0') {
        Symbology::Gs1
    } else if input.len() == 13 && starts_with_digit {
        Symbology::Gtin13
    } else if input.len() < 13 && starts_with_digit {
        Symbology::ProductNumber
    } else {
        return Err(Error::InvalidFormat(input.to_string()));
    };

    debug!(%symbology, "classified scan payload");
    Ok(symbology)
}

/// Decodes a raw scanned string into a normalized record.
///
/// Classification picks exactly one decoder; the passthrough families
/// produce a record carrying only the product number. Decoding the same
/// string twice yields identical records.
///
/// # Errors
///
/// Returns [`Error::InvalidFormat`] when classification fails, or any
/// error the routed decoder reports.
pub fn decode(input: &str) -> Result<ParsedBarcode, Error> {
    match classify(input)? {
        Symbology::Hibc => hibc::decode(input),
        Symbology::Gs1 => gs1::decode(input),
        Symbology::Gtin13 | Symbology::ProductNumber => {
            Ok(ParsedBarcode::with_product_number(input))
        }
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case("+MERK12345X/$$3231231B1", Symbology::Hibc; "plus prefix")]
    #[test_case("010801234500003117231231", Symbology::Gs1; "long leading zero")]
    #[test_case("4006381333931", Symbology::Gtin13; "thirteen digits")]
    #[test_case("400638133393", Symbology::ProductNumber; "twelve digits")]
    #[test_case("1", Symbology::ProductNumber; "single digit")]
    fn classifies(input: &str, expected: Symbology) {
        assert_eq!(classify(input), Ok(expected));
    }

    #[test_case(""; "empty input")]
    #[test_case("ABC123"; "leading letter")]
    #[test_case("12345678901234"; "fourteen digits without leading zero")]
    #[test_case("]C1010801234500003117231231"; "symbology identifier hides the leading zero")]
    #[test_case("德国巴斯夫"; "non ascii")]
    fn rejects_as_invalid_format(input: &str) {
        assert_eq!(classify(input), Err(Error::InvalidFormat(input.to_string())));
    }

    #[test]
    fn gtin13_passthrough_is_verbatim() {
        let record = decode("4006381333931").unwrap();
        assert_eq!(record, ParsedBarcode::with_product_number("4006381333931"));
    }

    #[test]
    fn short_numbers_pass_through_without_checksum_concerns() {
        let record = decode("400638133393").unwrap();
        assert_eq!(record, ParsedBarcode::with_product_number("400638133393"));
    }

    #[test]
    fn routes_gs1_input_to_the_element_decoder() {
        let record = decode("010801234500003117231231").unwrap();
        assert_eq!(record.product_number.as_deref(), Some("08012345000031"));
        assert!(record.lic.is_none());
    }

    #[test]
    fn routes_hibc_input_to_the_segment_decoder() {
        let record = decode("+MERK12345X/$$3231231BATCH1").unwrap();
        assert_eq!(record.lic.as_deref(), Some("MERK"));
        assert!(record.variant.is_none());
    }

    #[test]
    fn decoding_is_idempotent() {
        for input in [
            "+MERK12345X/$$3231231BATCH1",
            "010801234500003110LOT42\u{1d}21SN99887",
            "4006381333931",
        ] {
            assert_eq!(decode(input), decode(input));
        }
    }

    #[test]
    fn every_input_classifies_or_fails_cleanly() {
        // A classification sweep over awkward inputs: none may panic, and
        // each lands in exactly one family or the invalid-format error.
        for input in ["", "+", "0", "9", " ", "\u{1d}", "+++", "0\u{1d}345678901234"] {
            match classify(input) {
                Ok(_) | Err(Error::InvalidFormat(_)) => {}
                Err(other) => panic!("unexpected classification error: {other}"),
            }
        }
    }

    #[test]
    fn unknown_ai_propagates_through_the_dispatcher() {
        assert_eq!(
            decode("010801234500003199123"),
            Err(Error::UnrecognizedAi("99".to_string()))
        );
    }
}
