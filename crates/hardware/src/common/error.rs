//! Error types for configuration and trace input.
//!
//! The cache model itself cannot fail once configured. Errors therefore come from
//! two places:
//! 1. **Configuration:** Geometry the address decoder cannot represent, rejected before any access.
//! 2. **Trace input:** I/O failures and malformed records while reading a trace.

use thiserror::Error;

use crate::cache::LevelId;

/// Rejected hierarchy configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A level's set count is zero or not a power of two.
    #[error("{level} set count {sets} is not a power of two")]
    SetsNotPowerOfTwo {
        /// Offending level.
        level: LevelId,
        /// Configured set count.
        sets: u32,
    },

    /// The global block size is zero or not a power of two.
    #[error("block size {0} is not a power of two")]
    BlockSizeNotPowerOfTwo(u32),

    /// Index and offset fields leave no room for a tag.
    #[error(
        "{level} needs {index_bits} index bits and {offset_bits} offset bits, \
         which exceeds the 32-bit address"
    )]
    TagWidthNegative {
        /// Offending level.
        level: LevelId,
        /// Derived index width.
        index_bits: u32,
        /// Derived offset width.
        offset_bits: u32,
    },

    /// A level holds more lines than the model will allocate.
    #[error("{level} with {sets} sets x {ways} ways exceeds the per-level line limit")]
    Capacity {
        /// Offending level.
        level: LevelId,
        /// Configured set count.
        sets: u32,
        /// Effective associativity.
        ways: u32,
    },

    /// A `sets:ways:hit_time` triple could not be parsed.
    #[error("invalid cache geometry `{0}`, expected <sets>:<ways>:<hit_time>")]
    Geometry(String),

    /// The JSON configuration document is malformed.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Failure while reading a trace.
#[derive(Debug, Error)]
pub enum TraceError {
    /// The underlying reader failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A record could not be parsed.
    #[error("trace line {line}: {reason}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// What was wrong with the record.
        reason: String,
    },
}
