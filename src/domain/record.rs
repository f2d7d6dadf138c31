//! The normalized product-identification record.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A normalized product-identification record decoded from a single scan.
///
/// Every field is optional: each symbology populates only the fields its
/// grammar carries, and the passthrough classifications carry nothing but a
/// product number. When a field is assigned by more than one element or
/// segment within a single decode, the assignments are applied left to
/// right and the last one wins.
///
/// The record has no lifecycle of its own. It is created fresh per decode
/// call, owned by the caller, and either displayed or handed to the
/// inventory-lookup collaborator.
///
/// Field names serialize in camelCase, matching the wire contract of the
/// inventory service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedBarcode {
    /// HIBC labeler identification code, four characters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lic: Option<String>,

    /// Product number: a GTIN, an SSCC, a HIBC product code, or a bare
    /// number, depending on the symbology.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_number: Option<String>,

    /// Expiry date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<NaiveDate>,

    /// Batch or lot number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_number: Option<String>,

    /// Date of manufacture (HIBC `16D` segments).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufactured: Option<NaiveDate>,

    /// Serial number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,

    /// Consumer product variant, two digits. GS1 only; never populated
    /// together with `lic`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,

    /// Contained trade item number (GS1 AI 02). Parsed so the element
    /// stream stays aligned; no downstream consumer reads it yet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl ParsedBarcode {
    /// A record carrying only a product number, as produced by the GTIN-13
    /// and bare-number passthrough classifications.
    #[must_use]
    pub fn with_product_number(product_number: impl Into<String>) -> Self {
        Self {
            product_number: Some(product_number.into()),
            ..Self::default()
        }
    }

    /// Returns `true` when no field is populated.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.lic.is_none()
            && self.product_number.is_none()
            && self.expiry_date.is_none()
            && self.batch_number.is_none()
            && self.manufactured.is_none()
            && self.serial_number.is_none()
            && self.variant.is_none()
            && self.content.is_none()
    }
}
