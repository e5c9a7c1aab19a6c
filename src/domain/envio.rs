//! Shipment (envio) domain model
//!
//! An [`Envio`] is an immutable value from the registry's point of view:
//! updates replace the whole record under its id.

use super::errors::EcoError;
use super::result::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A shipment record
///
/// The serialized field names (`id`, `cliente`, `direccion`, `estado`) are the
/// external contract of the snapshot file and the query interface.
///
/// # Examples
///
/// ```
/// use ecologistics::domain::Envio;
///
/// let envio = Envio::new("S1", "Ana", "Calle 1", "enviado");
/// assert!(envio.validate().is_ok());
///
/// let json = serde_json::to_string(&envio).unwrap();
/// assert_eq!(
///     json,
///     r#"{"id":"S1","cliente":"Ana","direccion":"Calle 1","estado":"enviado"}"#
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Envio {
    /// Shipment identifier, the natural key
    pub id: String,

    /// Customer name
    #[serde(rename = "cliente")]
    pub customer: String,

    /// Delivery address
    #[serde(rename = "direccion")]
    pub address: String,

    /// Shipment status (free text, e.g. "pendiente", "enviado")
    #[serde(rename = "estado")]
    pub status: String,
}

impl Envio {
    /// Creates a new shipment record without validating it
    pub fn new(
        id: impl Into<String>,
        customer: impl Into<String>,
        address: impl Into<String>,
        status: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            customer: customer.into(),
            address: address.into(),
            status: status.into(),
        }
    }

    /// Checks that the record can be stored
    ///
    /// # Errors
    ///
    /// Returns [`EcoError::InvalidRecord`] if the id is empty or whitespace-only.
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(EcoError::InvalidRecord("id requerido".to_string()));
        }
        Ok(())
    }
}

impl fmt::Display for Envio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Envio{{id='{}', cliente='{}', direccion='{}', estado='{}'}}",
            self.id, self.customer, self.address, self.status
        )
    }
}
