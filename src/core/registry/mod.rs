//! Shipment registry
//!
//! The registry is the authoritative in-memory store of shipment state,
//! keyed by shipment id. It is shared by the ingestion pipeline and the query
//! service, so every implementation must be safe for concurrent use with
//! single-record atomicity.

pub mod sharded;

pub use sharded::ShardedRegistry;

use crate::domain::{Envio, Result};

/// Concurrent key-value store of shipments
///
/// Implementations hold the minimum critical section each call needs; there
/// is no registry-wide lock spanning more than one record.
pub trait EnvioRegistry: Send + Sync {
    /// Inserts or replaces the record stored under `envio.id`
    ///
    /// The change is visible to every lookup issued after this call returns.
    ///
    /// # Errors
    ///
    /// Returns [`EcoError::InvalidRecord`](crate::domain::EcoError::InvalidRecord)
    /// if the id is empty or blank; the registry is left unchanged.
    fn upsert(&self, envio: Envio) -> Result<()>;

    /// Returns the current record for `id`, if any
    fn find_by_id(&self, id: &str) -> Option<Envio>;

    /// Returns a point-in-time copy of every record, in no particular order
    fn find_all(&self) -> Vec<Envio>;

    /// Removes every record
    fn clear(&self);

    /// Number of stored records
    fn len(&self) -> usize;

    /// Whether the registry holds no records
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
