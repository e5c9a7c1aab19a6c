//! Shipment codecs
//!
//! Pure functions with no shared state:
//! - [`parse_csv`] / [`decode_csv`] - raw CSV to rows to records
//! - [`encode_json`] / [`decode_json`] - record collections to and from JSON

pub mod csv;
pub mod json;

pub use self::csv::{decode_csv, parse_csv, CSV_COLUMNS};
pub use self::json::{decode_json, encode_json};
