//! Request signing utilities.
//!
//! This module builds the canonical message, decodes PEM-wrapped P-256 keys,
//! and produces and verifies the decimal `r`/`s` signature text.

pub mod canonical;
pub mod pem;
pub mod signing;

pub use canonical::*;
pub use pem::*;
pub use signing::*;
