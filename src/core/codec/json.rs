//! JSON encoding of shipment collections
//!
//! The snapshot document and the per-file output are a JSON array of
//! `{id, cliente, direccion, estado}` objects.

use crate::domain::{EcoError, Envio, Result};

/// Serializes records to a JSON array, preserving input order
///
/// # Errors
///
/// Returns [`EcoError::Serialization`] if serialization fails.
pub fn encode_json(envios: &[Envio]) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(envios)?)
}

/// Deserializes a JSON array of records
///
/// # Errors
///
/// Returns [`EcoError::MalformedSnapshot`] if the payload is not a well-formed
/// array of record-shaped objects.
pub fn decode_json(bytes: &[u8]) -> Result<Vec<Envio>> {
    serde_json::from_slice(bytes).map_err(|e| EcoError::MalformedSnapshot(e.to_string()))
}
