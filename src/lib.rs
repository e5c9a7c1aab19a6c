// EcoLogistics - Shipment ingestion service
// Copyright (c) 2025 EcoLogistics Contributors
// Licensed under the MIT License

//! # EcoLogistics - shipment ingestion and registry
//!
//! EcoLogistics ingests shipment ("envio") records from CSV files dropped into
//! an inbox directory, keeps them in a concurrent in-memory registry and
//! persists that registry as a JSON snapshot so it survives restarts.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Codec, registry, snapshot persistence, ingestion and queries
//! - [`domain`] - The shipment record and error types
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! Startup is two-phase. The load phase reads the last snapshot into a fresh
//! registry; only the [`core::snapshot::Bootstrapped`] token it returns can
//! build the ingestion pipeline and the query service, so nothing is
//! ingested or served against a half-loaded registry.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ecologistics::config::load_config;
//! use ecologistics::core::runtime::EnvioRuntime;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("ecologistics.toml")?;
//!     let runtime = EnvioRuntime::start(&config).await?;
//!
//!     let rows: Vec<Vec<String>> = [
//!         ["id", "cliente", "direccion", "estado"],
//!         ["S1", "Ana", "Calle 1", "enviado"],
//!     ]
//!     .iter()
//!     .map(|r| r.iter().map(|c| c.to_string()).collect())
//!     .collect();
//!     let summary = runtime.pipeline().ingest_rows("envios.csv", &rows);
//!     println!("Upserted {} shipment(s)", summary.upserted);
//!
//!     let envio = runtime.service().get_by_id("S1")?;
//!     println!("{envio}");
//!
//!     runtime.shutdown().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Persistence
//!
//! Every ingested file and every create schedules a snapshot write of the
//! whole registry. Writes run on a single background task, are atomic
//! (temp file then rename) and coalesce: a burst of triggers produces at
//! least one write that reflects the state after the burst. A failed write
//! is logged and never surfaces to the caller that triggered it.
//!
//! ## Error Handling
//!
//! Library operations return [`domain::Result`] over [`domain::EcoError`]:
//!
//! ```rust,no_run
//! use ecologistics::domain::{EcoError, Envio};
//!
//! let err = Envio::new("  ", "Ana", "Calle 1", "enviado").validate().unwrap_err();
//! assert!(matches!(err, EcoError::InvalidRecord(_)));
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
