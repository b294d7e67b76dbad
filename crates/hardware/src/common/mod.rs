//! Common types shared by the cache model and its drivers.
//!
//! This module provides:
//! 1. **Address Layout:** Tag/index/offset decomposition of 32-bit addresses.
//! 2. **Access Kinds:** Instruction versus data references.
//! 3. **Error Handling:** Configuration and trace errors.

/// Address decomposition (tag, index, offset).
pub mod addr;

/// Memory reference classification.
pub mod data;

/// Error types.
pub mod error;

pub use addr::{ADDR_BITS, AddrLayout};
pub use data::AccessKind;
pub use error::{ConfigError, TraceError};
