//! Interface to the inventory-lookup collaborator.
//!
//! The decoder performs no network calls. After a successful decode the
//! caller derives a [`LookupRequest`] from the record and hands it to an
//! [`InventoryLookup`] implementation, which owns transport,
//! authentication, and persistence.

use serde::Serialize;

use crate::domain::ParsedBarcode;

/// The payload the inventory service expects for a product lookup.
///
/// Field names serialize in camelCase to match the service contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupRequest {
    /// The practice on whose behalf the lookup runs. Always passed
    /// explicitly by the caller; the decoding pipeline holds no ambient
    /// session state.
    pub client_practice_id: String,

    /// Product number from the decoded record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_number: Option<String>,

    /// Batch number from the decoded record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_number: Option<String>,
}

impl LookupRequest {
    /// Builds the lookup payload for `record` on behalf of a practice.
    #[must_use]
    pub fn new(client_practice_id: impl Into<String>, record: &ParsedBarcode) -> Self {
        Self {
            client_practice_id: client_practice_id.into(),
            product_number: record.product_number.clone(),
            batch_number: record.batch_number.clone(),
        }
    }
}

/// The inventory-lookup collaborator.
///
/// The decoding pipeline only supplies the request; everything behind this
/// seam is out of scope for the crate.
pub trait InventoryLookup {
    /// The product representation the collaborator returns.
    type Product;
    /// The collaborator's failure type.
    type Error;

    /// Fetches the product identified by `request`, or `None` when the
    /// inventory has no match.
    ///
    /// # Errors
    ///
    /// Implementations surface their own transport or service failures.
    fn fetch(&self, request: &LookupRequest) -> Result<Option<Self::Product>, Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_copies_the_lookup_fields() {
        let record = ParsedBarcode {
            product_number: Some("08012345000031".to_string()),
            batch_number: Some("LOT42".to_string()),
            serial_number: Some("SN1".to_string()),
            ..ParsedBarcode::default()
        };

        let request = LookupRequest::new("practice-7", &record);
        assert_eq!(request.client_practice_id, "practice-7");
        assert_eq!(request.product_number.as_deref(), Some("08012345000031"));
        assert_eq!(request.batch_number.as_deref(), Some("LOT42"));
    }

    #[test]
    fn request_serializes_in_camel_case() {
        let record = ParsedBarcode {
            product_number: Some("400638133393".to_string()),
            ..ParsedBarcode::default()
        };

        let json = serde_json::to_value(LookupRequest::new("practice-7", &record)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "clientPracticeId": "practice-7",
                "productNumber": "400638133393",
            })
        );
    }
}
