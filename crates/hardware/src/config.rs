//! Configuration for the cache hierarchy.
//!
//! This module defines the parameters of the modelled hierarchy. It provides:
//! 1. **Defaults:** Baseline geometry and latencies used when a field is not supplied.
//! 2. **Structures:** Per-level geometry and the shared hierarchy parameters.
//! 3. **Validation:** Rejection of geometry the address decoder cannot represent.
//!
//! Configuration is supplied as JSON, as `sets:ways:hit_time` triples on the command
//! line, or built in code starting from `HierarchyConfig::default()`.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::cache::LevelId;
use crate::common::{AddrLayout, ConfigError};

/// Upper bound on the lines (sets times ways) a single level may hold.
pub const MAX_LINES: u64 = 1 << 26;

/// Default configuration constants.
mod defaults {
    /// Default first-level set count.
    pub const L1_SETS: u32 = 128;

    /// Default first-level associativity.
    pub const L1_WAYS: u32 = 2;

    /// Default first-level hit time in cycles.
    pub const L1_HIT_TIME: u32 = 1;

    /// Default L2 set count.
    pub const L2_SETS: u32 = 512;

    /// Default L2 associativity.
    pub const L2_WAYS: u32 = 8;

    /// Default L2 hit time in cycles.
    pub const L2_HIT_TIME: u32 = 10;

    /// Default block size in bytes, shared by all levels.
    pub const BLOCK_SIZE: u32 = 64;

    /// Default main-memory latency in cycles.
    pub const MEMORY_LATENCY: u32 = 100;
}

/// Geometry and timing of a single cache level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Number of sets (power of two)
    #[serde(default = "CacheConfig::default_sets")]
    pub sets: u32,

    /// Associativity; 0 is treated as 1
    #[serde(default = "CacheConfig::default_ways")]
    pub ways: u32,

    /// Hit time in cycles
    #[serde(default = "CacheConfig::default_hit_time")]
    pub hit_time: u32,
}

impl CacheConfig {
    /// Creates a level configuration from its three parameters.
    pub const fn new(sets: u32, ways: u32, hit_time: u32) -> Self {
        Self {
            sets,
            ways,
            hit_time,
        }
    }

    /// Associativity actually modelled (a configured 0 becomes 1).
    pub const fn effective_ways(&self) -> u32 {
        if self.ways == 0 { 1 } else { self.ways }
    }

    const fn default_sets() -> u32 {
        defaults::L1_SETS
    }

    const fn default_ways() -> u32 {
        defaults::L1_WAYS
    }

    const fn default_hit_time() -> u32 {
        defaults::L1_HIT_TIME
    }

    /// Default unified L2 geometry.
    pub const fn default_l2() -> Self {
        Self::new(defaults::L2_SETS, defaults::L2_WAYS, defaults::L2_HIT_TIME)
    }
}

impl Default for CacheConfig {
    /// Default first-level geometry.
    fn default() -> Self {
        Self::new(defaults::L1_SETS, defaults::L1_WAYS, defaults::L1_HIT_TIME)
    }
}

impl FromStr for CacheConfig {
    type Err = ConfigError;

    /// Parses `sets:ways:hit_time`, e.g. `256:4:2`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.split(':').map(str::trim).collect();
        let [sets, ways, hit_time] = fields.as_slice() else {
            return Err(ConfigError::Geometry(s.to_owned()));
        };
        let parse = |field: &str| {
            field
                .parse::<u32>()
                .map_err(|_| ConfigError::Geometry(s.to_owned()))
        };
        Ok(Self::new(parse(sets)?, parse(ways)?, parse(hit_time)?))
    }
}

/// Root configuration of the two-level hierarchy.
///
/// # Examples
///
/// ```
/// use cachesim_core::config::HierarchyConfig;
///
/// let json = r#"{
///     "icache": { "sets": 256, "ways": 4, "hit_time": 2 },
///     "l2": { "sets": 1024, "ways": 8, "hit_time": 12 },
///     "block_size": 32,
///     "inclusive": true
/// }"#;
///
/// let config = HierarchyConfig::from_json(json).unwrap();
/// assert_eq!(config.icache.sets, 256);
/// assert_eq!(config.dcache.sets, 128);
/// assert_eq!(config.memory_latency, 100);
/// assert!(config.inclusive);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyConfig {
    /// First-level instruction cache
    #[serde(default)]
    pub icache: CacheConfig,

    /// First-level data cache
    #[serde(default)]
    pub dcache: CacheConfig,

    /// Unified second-level cache
    #[serde(default = "CacheConfig::default_l2")]
    pub l2: CacheConfig,

    /// Block size in bytes, shared by every level (power of two)
    #[serde(default = "HierarchyConfig::default_block_size")]
    pub block_size: u32,

    /// Main-memory latency in cycles
    #[serde(default = "HierarchyConfig::default_memory_latency")]
    pub memory_latency: u32,

    /// Keep L2 inclusive of both first-level caches
    #[serde(default)]
    pub inclusive: bool,
}

impl HierarchyConfig {
    const fn default_block_size() -> u32 {
        defaults::BLOCK_SIZE
    }

    const fn default_memory_latency() -> u32 {
        defaults::MEMORY_LATENCY
    }

    /// Deserializes a JSON document and validates the result.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] for malformed documents and any
    /// validation error from [`HierarchyConfig::validate`].
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Configuration of the given level.
    pub const fn level(&self, id: LevelId) -> &CacheConfig {
        match id {
            LevelId::Instruction => &self.icache,
            LevelId::Data => &self.dcache,
            LevelId::Unified => &self.l2,
        }
    }

    /// Checks that every level's geometry can be decoded.
    ///
    /// # Errors
    ///
    /// Fails on a non-power-of-two block size or set count, on any level
    /// whose index and offset widths leave a negative tag width, and on any
    /// level holding more than [`MAX_LINES`] lines.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.block_size.is_power_of_two() {
            return Err(ConfigError::BlockSizeNotPowerOfTwo(self.block_size));
        }
        for id in LevelId::ALL {
            let _ = self.layout(id)?;
            let level = self.level(id);
            let ways = level.effective_ways();
            if u64::from(level.sets) * u64::from(ways) > MAX_LINES {
                return Err(ConfigError::Capacity {
                    level: id,
                    sets: level.sets,
                    ways,
                });
            }
        }
        Ok(())
    }

    /// Address layout of the given level.
    ///
    /// # Errors
    ///
    /// Same conditions as [`HierarchyConfig::validate`] for that level.
    pub fn layout(&self, id: LevelId) -> Result<AddrLayout, ConfigError> {
        if !self.block_size.is_power_of_two() {
            return Err(ConfigError::BlockSizeNotPowerOfTwo(self.block_size));
        }
        let sets = self.level(id).sets;
        if !sets.is_power_of_two() {
            return Err(ConfigError::SetsNotPowerOfTwo { level: id, sets });
        }
        AddrLayout::new(sets, self.block_size).ok_or(ConfigError::TagWidthNegative {
            level: id,
            index_bits: sets.ilog2(),
            offset_bits: self.block_size.ilog2(),
        })
    }
}

impl Default for HierarchyConfig {
    fn default() -> Self {
        Self {
            icache: CacheConfig::default(),
            dcache: CacheConfig::default(),
            l2: CacheConfig::default_l2(),
            block_size: defaults::BLOCK_SIZE,
            memory_latency: defaults::MEMORY_LATENCY,
            inclusive: false,
        }
    }
}
