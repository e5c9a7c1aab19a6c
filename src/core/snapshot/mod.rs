//! Durable registry snapshot
//!
//! - [`SnapshotWriter`] - serialized, coalescing background writes of the
//!   whole registry, replacing the file atomically
//! - [`BootstrapLoader`] - one-time startup load producing the
//!   [`Bootstrapped`] readiness token
//!
//! The snapshot is an eventually-consistent mirror. While the process is
//! live the registry is authoritative.

pub mod loader;
pub mod writer;

pub use loader::{BootstrapLoader, BootstrapReport, Bootstrapped};
pub use writer::{write_snapshot, SnapshotWriter};
