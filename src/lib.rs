//! Barcode payload decoding
//!
//! Turns a raw scanned string, exactly as produced by a 1D/2D barcode
//! reader, into a normalized [`ParsedBarcode`] record for downstream
//! inventory lookups. A dispatcher classifies the symbology; GS1
//! application-identifier element strings and HIBC segmented strings each
//! have a dedicated decoder.

pub mod decode;
pub use decode::{Error as DecodeError, Symbology, classify, decode};

/// Domain models shared by the decoders.
pub mod domain;
pub use domain::ParsedBarcode;

/// Interface to the inventory-lookup collaborator.
pub mod lookup;
pub use lookup::{InventoryLookup, LookupRequest};
