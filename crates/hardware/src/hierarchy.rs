//! Two-level cache hierarchy.
//!
//! Instruction and data references enter through their own first-level cache. Misses in
//! either fall through to the shared L2, and L2 misses are served by main memory at a fixed
//! latency. Every reference runs to completion, cascading misses included, before the next
//! one is accepted.
//!
//! # Logical clock
//!
//! The hierarchy owns a single counter that is advanced once per first-level reference,
//! before the lookup. Every level stamps the ways it touches with the current value, so an
//! L2 fill triggered by a reference carries the same timestamp as the first-level fill.
//!
//! # Inclusion
//!
//! With `inclusive` set, a line displaced from L2 is also dropped from both first-level
//! caches, so every first-level resident line stays resident in L2. Without it, levels
//! evict independently.

use tracing::{debug, info};

use crate::cache::{CacheLevel, LevelId};
use crate::common::{AccessKind, ConfigError, TraceError};
use crate::config::HierarchyConfig;
use crate::stats::{HierarchyStats, LevelReport};
use crate::trace::TraceRecord;

/// The modelled hierarchy: instruction cache, data cache, unified L2 and memory.
#[derive(Clone, Debug)]
pub struct Hierarchy {
    clock: u64,
    icache: CacheLevel,
    dcache: CacheLevel,
    l2: CacheLevel,
    memory_latency: u64,
    inclusive: bool,
}

impl Hierarchy {
    /// Validates `config` and builds an empty hierarchy with zeroed counters and clock.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found by [`HierarchyConfig::validate`].
    pub fn new(config: &HierarchyConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let level = |id: LevelId| -> Result<CacheLevel, ConfigError> {
            let layout = config.layout(id)?;
            let geometry = config.level(id);
            debug!(
                cache = %id,
                sets = geometry.sets,
                ways = geometry.effective_ways(),
                hit_time = geometry.hit_time,
                index_bits = layout.index_bits(),
                offset_bits = layout.offset_bits(),
                tag_bits = layout.tag_bits(),
                "cache level"
            );
            Ok(CacheLevel::new(id, geometry, layout))
        };

        let hierarchy = Self {
            clock: 0,
            icache: level(LevelId::Instruction)?,
            dcache: level(LevelId::Data)?,
            l2: level(LevelId::Unified)?,
            memory_latency: u64::from(config.memory_latency),
            inclusive: config.inclusive,
        };
        info!(
            block_size = config.block_size,
            memory_latency = config.memory_latency,
            inclusive = config.inclusive,
            "cache hierarchy initialized"
        );
        Ok(hierarchy)
    }

    /// Empties every level and zeroes all counters and the clock.
    pub fn reset(&mut self) {
        self.clock = 0;
        self.icache.reset();
        self.dcache.reset();
        self.l2.reset();
    }

    /// Current logical time: the number of first-level references so far.
    pub const fn clock(&self) -> u64 {
        self.clock
    }

    /// Whether L2 back-invalidates the first-level caches.
    pub const fn is_inclusive(&self) -> bool {
        self.inclusive
    }

    /// The level with the given identity.
    pub const fn level(&self, id: LevelId) -> &CacheLevel {
        match id {
            LevelId::Instruction => &self.icache,
            LevelId::Data => &self.dcache,
            LevelId::Unified => &self.l2,
        }
    }

    /// Instruction fetch of `addr`; returns the cycles it takes.
    pub fn instruction_access(&mut self, addr: u32) -> u64 {
        self.access(AccessKind::Instruction, addr)
    }

    /// Data reference to `addr`; returns the cycles it takes.
    pub fn data_access(&mut self, addr: u32) -> u64 {
        self.access(AccessKind::Data, addr)
    }

    /// Reference of the given kind to `addr`; returns the cycles it takes.
    pub fn access(&mut self, kind: AccessKind, addr: u32) -> u64 {
        self.clock += 1;
        let now = self.clock;
        let memory_latency = self.memory_latency;

        let l1 = match kind {
            AccessKind::Instruction => &mut self.icache,
            AccessKind::Data => &mut self.dcache,
        };
        let l2 = &mut self.l2;
        let mut l2_evicted = None;

        let cycles = l1
            .access(addr, now, |addr| {
                let fill = l2.access(addr, now, |_| memory_latency);
                l2_evicted = fill.evicted;
                fill.cycles
            })
            .cycles;

        if let Some(victim) = l2_evicted.filter(|_| self.inclusive) {
            self.back_invalidate(victim);
        }
        cycles
    }

    /// Drops the block at `addr` from both first-level caches.
    fn back_invalidate(&mut self, addr: u32) {
        let icache = self.icache.invalidate(addr);
        let dcache = self.dcache.invalidate(addr);
        if icache || dcache {
            debug!(addr, icache, dcache, "back-invalidated L2 victim");
        }
    }

    /// Feeds `records` in order and returns the total cycles.
    pub fn run<I>(&mut self, records: I) -> u64
    where
        I: IntoIterator<Item = TraceRecord>,
    {
        records
            .into_iter()
            .map(|r| self.access(r.kind, r.addr))
            .sum()
    }

    /// Feeds parsed trace records in order and returns the total cycles.
    ///
    /// Records before the first error are simulated; nothing after it is.
    ///
    /// # Errors
    ///
    /// Returns the first [`TraceError`] yielded by `records`.
    pub fn run_trace<I>(&mut self, records: I) -> Result<u64, TraceError>
    where
        I: IntoIterator<Item = Result<TraceRecord, TraceError>>,
    {
        let mut failure = None;
        let cycles = self.run(
            records
                .into_iter()
                .map_while(|r| r.map_err(|e| failure = Some(e)).ok()),
        );
        failure.map_or(Ok(cycles), Err)
    }

    /// Snapshot of all counters with derived metrics.
    pub fn stats(&self) -> HierarchyStats {
        let report = |level: &CacheLevel| {
            LevelReport::new(level.id(), level.hit_time(), *level.stats())
        };
        HierarchyStats {
            accesses: self.clock,
            memory_latency: self.memory_latency,
            icache: report(&self.icache),
            dcache: report(&self.dcache),
            l2: report(&self.l2),
        }
    }
}
