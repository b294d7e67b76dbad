//! Two-level cache hierarchy timing model.
//!
//! This crate estimates the latency of every reference in an address trace under a
//! configurable cache hierarchy:
//! 1. **Common:** Address decomposition, access kinds and error types.
//! 2. **Cache:** Set-associative way storage with timestamp-based LRU approximation.
//! 3. **Hierarchy:** Instruction and data caches backed by a unified L2 and fixed-latency memory.
//! 4. **Simulation:** Configuration, trace input and statistics.
//!
//! Only addresses are modelled; no data is stored or moved.
//!
//! # Examples
//!
//! ```
//! use cachesim_core::{CacheConfig, Hierarchy, HierarchyConfig};
//!
//! let config = HierarchyConfig {
//!     icache: CacheConfig::new(1, 1, 1),
//!     dcache: CacheConfig::new(1, 1, 1),
//!     l2: CacheConfig::new(1, 1, 10),
//!     block_size: 1,
//!     memory_latency: 100,
//!     inclusive: false,
//! };
//! let mut sim = Hierarchy::new(&config).unwrap();
//!
//! assert_eq!(sim.instruction_access(0), 111);
//! assert_eq!(sim.instruction_access(0), 1);
//! ```

/// Set-associative cache levels.
pub mod cache;
/// Common types (address layout, access kinds, errors).
pub mod common;
/// Hierarchy configuration (defaults, per-level geometry, validation).
pub mod config;
/// The instruction/data/L2 hierarchy and its logical clock.
pub mod hierarchy;
/// Per-level statistics and reporting.
pub mod stats;
/// Trace parsing.
pub mod trace;

/// Per-level geometry; parse from `sets:ways:hit_time` or build with `CacheConfig::new`.
pub use crate::config::CacheConfig;
/// Root configuration; use `HierarchyConfig::default()` or deserialize from JSON.
pub use crate::config::HierarchyConfig;
/// The simulated hierarchy; construct with `Hierarchy::new`.
pub use crate::hierarchy::Hierarchy;
