//! Core business logic for EcoLogistics.
//!
//! This module contains the ingestion-and-registry core.
//!
//! # Modules
//!
//! - [`codec`] - CSV and JSON codecs for shipment records
//! - [`registry`] - Concurrent authoritative shipment store
//! - [`snapshot`] - Durable snapshot writer and startup loader
//! - [`ingest`] - Per-file ingestion pipeline and inbox watcher
//! - [`query`] - Query service used by the HTTP-facing layer
//! - [`runtime`] - Two-phase assembly of all of the above
//!
//! # Data Flow
//!
//! 1. **Load**: Seed the registry from the last snapshot (fatal if corrupt)
//! 2. **Claim**: Move an inbox file into the archive under a timestamped name
//! 3. **Decode**: Parse the CSV and map rows to records
//! 4. **Upsert**: Apply records in file order, skipping invalid ones
//! 5. **Snapshot**: Schedule a background write of the whole registry
//!
//! # Example
//!
//! ```rust,no_run
//! use ecologistics::config::load_config;
//! use ecologistics::core::runtime::EnvioRuntime;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("ecologistics.toml")?;
//! let runtime = EnvioRuntime::start(&config).await?;
//!
//! let summary = runtime
//!     .pipeline()
//!     .ingest_file(Path::new("input/envios.csv"), "envios.csv")
//!     .await?;
//! println!("Upserted: {}", summary.upserted);
//!
//! runtime.shutdown().await;
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod ingest;
pub mod query;
pub mod registry;
pub mod runtime;
pub mod snapshot;
