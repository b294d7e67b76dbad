//! A cache level: way storage plus hit time and counters.

use tracing::trace;

use super::LevelId;
use super::store::{SetAssociativeStore, Slot};
use crate::common::AddrLayout;
use crate::config::CacheConfig;
use crate::stats::LevelStats;

/// Result of one access to a level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Access {
    /// Whether the line was resident.
    pub hit: bool,
    /// Cycles taken: the hit time, plus the next level's time on a miss.
    pub cycles: u64,
    /// Way that was hit or filled.
    pub slot: Slot,
    /// Block address of the resident line displaced by the fill, if any.
    pub evicted: Option<u32>,
}

/// One level of the hierarchy.
#[derive(Clone, Debug)]
pub struct CacheLevel {
    id: LevelId,
    hit_time: u64,
    store: SetAssociativeStore,
    stats: LevelStats,
}

impl CacheLevel {
    /// Creates an empty level with zeroed counters.
    ///
    /// # Arguments
    ///
    /// * `id` - Which level this is, for reporting.
    /// * `config` - Associativity and hit time.
    /// * `layout` - Address layout derived from the level's set count and the block size.
    pub fn new(id: LevelId, config: &CacheConfig, layout: AddrLayout) -> Self {
        Self {
            id,
            hit_time: u64::from(config.hit_time),
            store: SetAssociativeStore::new(layout, config.effective_ways() as usize),
            stats: LevelStats::default(),
        }
    }

    /// Level identity.
    pub const fn id(&self) -> LevelId {
        self.id
    }

    /// Hit time in cycles.
    pub const fn hit_time(&self) -> u64 {
        self.hit_time
    }

    /// Counters accumulated since creation or the last reset.
    pub const fn stats(&self) -> &LevelStats {
        &self.stats
    }

    /// Underlying way storage.
    pub const fn store(&self) -> &SetAssociativeStore {
        &self.store
    }

    /// Performs one reference to `addr` at logical time `now`.
    ///
    /// On a miss, `next` is called exactly once with `addr` and must return the
    /// cycles taken by the level below (or by memory). That time is charged as
    /// this level's miss penalty, and the line is then installed in the victim
    /// way chosen by the lookup. Must be called exactly once per reference
    /// directed at this level.
    pub fn access<F>(&mut self, addr: u32, now: u64, next: F) -> Access
    where
        F: FnOnce(u32) -> u64,
    {
        self.stats.refs += 1;

        let probe = self.store.probe(addr, now);
        if probe.hit {
            return Access {
                hit: true,
                cycles: self.hit_time,
                slot: probe.slot,
                evicted: None,
            };
        }

        self.stats.misses += 1;
        let penalty = next(addr);
        self.stats.penalties += penalty;

        let evicted = self.store.commit(probe.slot, addr, now);
        trace!(
            cache = %self.id,
            addr,
            set = probe.slot.set,
            way = probe.slot.way,
            evicted = ?evicted,
            penalty,
            "miss"
        );

        Access {
            hit: false,
            cycles: self.hit_time + penalty,
            slot: probe.slot,
            evicted,
        }
    }

    /// Drops the line holding `addr` without touching the reference counters.
    ///
    /// Returns whether a line was resident. Counted in
    /// [`LevelStats::invalidations`].
    pub fn invalidate(&mut self, addr: u32) -> bool {
        let dropped = self.store.invalidate(addr);
        if dropped {
            self.stats.invalidations += 1;
        }
        dropped
    }

    /// Whether the line holding `addr` is resident.
    pub fn contains(&self, addr: u32) -> bool {
        self.store.contains(addr)
    }

    /// Empties the level and zeroes its counters.
    pub fn reset(&mut self) {
        self.store.clear();
        self.stats = LevelStats::default();
    }
}
