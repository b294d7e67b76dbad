//! Set-Associative Cache Model.
//!
//! This module implements the timing model of a single cache level. It tracks which
//! lines are resident and how recently each was touched, never the data they hold.
//! Recency is a global logical timestamp supplied by the caller, so comparisons are
//! consistent across all levels of the hierarchy.

/// Single cache level: store, hit time and statistics.
pub mod level;

/// Per-set way storage with timestamp-based victim selection.
pub mod store;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use self::level::{Access, CacheLevel};
pub use self::store::{Probe, SetAssociativeStore, Slot, Way};

/// Identity of a level in the hierarchy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelId {
    /// First-level instruction cache.
    Instruction,
    /// First-level data cache.
    Data,
    /// Shared second-level cache.
    Unified,
}

impl LevelId {
    /// Every level, first-level caches first.
    pub const ALL: [Self; 3] = [Self::Instruction, Self::Data, Self::Unified];

    /// Short display name used in reports and logs.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Instruction => "L1-I",
            Self::Data => "L1-D",
            Self::Unified => "L2",
        }
    }
}

impl fmt::Display for LevelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
