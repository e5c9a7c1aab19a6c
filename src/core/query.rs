//! Query service over the shipment registry
//!
//! Transport-agnostic implementation of the read/write interface exposed to
//! HTTP callers. Errors carry a status code and a JSON payload so a transport
//! layer can forward them as-is. Registry failures never leak ingestion
//! state: the two paths only share the registry.

use crate::core::registry::EnvioRegistry;
use crate::core::snapshot::{Bootstrapped, SnapshotWriter};
use crate::domain::{EcoError, Envio};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Service name reported by [`EnvioService::ping`]
pub const SERVICE_NAME: &str = "EcoLogistics";

/// Query interface errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    /// No shipment with the requested id
    #[error("Envio no encontrado")]
    NotFound(String),

    /// The submitted shipment cannot be stored
    #[error("{0}")]
    Invalid(String),
}

impl QueryError {
    /// HTTP-equivalent status code
    pub fn status_code(&self) -> u16 {
        match self {
            QueryError::NotFound(_) => 404,
            QueryError::Invalid(_) => 400,
        }
    }

    /// Structured error payload
    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            error: self.to_string(),
        }
    }
}

impl From<EcoError> for QueryError {
    fn from(err: EcoError) -> Self {
        QueryError::Invalid(err.to_string())
    }
}

/// `{"error": "..."}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// `{"message": "creado"}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedBody {
    pub message: String,
}

impl CreatedBody {
    /// HTTP-equivalent status code for a successful create
    pub const STATUS_CODE: u16 = 201;
}

impl Default for CreatedBody {
    fn default() -> Self {
        Self {
            message: "creado".to_string(),
        }
    }
}

/// Health payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PingBody {
    pub status: String,
    pub service: String,
    pub ts: String,
}

/// Read/write access to shipments for the query interface
#[derive(Clone)]
pub struct EnvioService {
    registry: Arc<dyn EnvioRegistry>,
    snapshots: SnapshotWriter,
}

impl EnvioService {
    /// Create a service over a bootstrapped registry
    pub fn new(ready: &Bootstrapped, snapshots: SnapshotWriter) -> Self {
        Self {
            registry: ready.registry(),
            snapshots,
        }
    }

    /// All shipments, in no particular order
    pub fn get_all(&self) -> Vec<Envio> {
        self.registry.find_all()
    }

    /// One shipment by id
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::NotFound`] if no shipment has this id.
    pub fn get_by_id(&self, id: &str) -> Result<Envio, QueryError> {
        self.registry
            .find_by_id(id)
            .ok_or_else(|| QueryError::NotFound(id.to_string()))
    }

    /// Insert or replace a shipment, then schedule a snapshot write
    ///
    /// The snapshot write is fire-and-forget: its failure is logged by the
    /// writer and never reported here.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Invalid`] if the id is empty or blank.
    pub fn create(&self, envio: Envio) -> Result<CreatedBody, QueryError> {
        let id = envio.id.clone();
        self.registry.upsert(envio).map_err(|e| {
            tracing::debug!(error = %e, "Rejected shipment");
            QueryError::from(e)
        })?;
        tracing::debug!(envio_id = %id, "Shipment stored");

        self.snapshots.trigger();
        Ok(CreatedBody::default())
    }

    /// Decode a JSON request body and [`create`](Self::create) it
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Invalid`] if the body is not a shipment object or
    /// the id is blank.
    pub fn create_from_json(&self, body: &[u8]) -> Result<CreatedBody, QueryError> {
        let envio: Envio = serde_json::from_slice(body)
            .map_err(|e| QueryError::Invalid(format!("Invalid request body: {e}")))?;
        self.create(envio)
    }

    /// Health check payload
    pub fn ping(&self) -> PingBody {
        PingBody {
            status: "ok".to_string(),
            service: SERVICE_NAME.to_string(),
            ts: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}
