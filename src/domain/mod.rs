//! Domain models and types for EcoLogistics.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **The shipment record** ([`Envio`])
//! - **Error types** ([`EcoError`], [`SkippedRow`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, EcoError>`]:
//!
//! ```rust
//! use ecologistics::domain::{Envio, Result};
//!
//! fn example() -> Result<()> {
//!     Envio::new("S1", "Ana", "Calle 1", "enviado").validate()?;
//!     Ok(())
//! }
//! ```

pub mod envio;
pub mod errors;
pub mod result;

// Re-export commonly used types for convenience
pub use envio::Envio;
pub use errors::{EcoError, SkippedRow};
pub use result::Result;
