//! Cache hierarchy statistics collection and reporting.
//!
//! This module tracks the counters of every level. It provides:
//! 1. **Per-level counters:** References, misses, accumulated miss penalty and invalidations.
//! 2. **Derived metrics:** Hits, miss rate and average memory access time.
//! 3. **Reporting:** A fixed-width text table and a `serde` view for JSON output.

use serde::Serialize;

use crate::cache::LevelId;

/// Counters of a single cache level.
///
/// All counters are monotonically non-decreasing between resets, and `misses`
/// never exceeds `refs`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LevelStats {
    /// References directed at this level.
    pub refs: u64,
    /// References that missed.
    pub misses: u64,
    /// Cycles charged to misses, i.e. the sum of the next level's access times.
    pub penalties: u64,
    /// Resident lines dropped by inclusive back-invalidation.
    pub invalidations: u64,
}

impl LevelStats {
    /// References that hit.
    pub const fn hits(&self) -> u64 {
        self.refs - self.misses
    }

    /// Fraction of references that missed, 0.0 when there were none.
    pub const fn miss_rate(&self) -> f64 {
        if self.refs == 0 {
            0.0
        } else {
            self.misses as f64 / self.refs as f64
        }
    }

    /// Average access time in cycles: `hit_time + penalties / refs`.
    ///
    /// With no references this is just `hit_time`.
    pub const fn avg_access_time(&self, hit_time: u64) -> f64 {
        if self.refs == 0 {
            hit_time as f64
        } else {
            hit_time as f64 + self.penalties as f64 / self.refs as f64
        }
    }
}

/// Snapshot of one level's counters together with its hit time.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct LevelReport {
    /// Level identity.
    pub level: LevelId,
    /// Hit time in cycles.
    pub hit_time: u64,
    /// Raw counters.
    #[serde(flatten)]
    pub stats: LevelStats,
    /// Derived miss rate.
    pub miss_rate: f64,
    /// Derived average access time in cycles.
    pub avg_access_time: f64,
}

impl LevelReport {
    /// Builds a report, computing the derived metrics.
    pub const fn new(level: LevelId, hit_time: u64, stats: LevelStats) -> Self {
        Self {
            level,
            hit_time,
            stats,
            miss_rate: stats.miss_rate(),
            avg_access_time: stats.avg_access_time(hit_time),
        }
    }
}

/// Statistics of the whole hierarchy.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HierarchyStats {
    /// Logical clock: the number of first-level references processed.
    pub accesses: u64,
    /// Main-memory latency in cycles.
    pub memory_latency: u64,
    /// Instruction cache.
    pub icache: LevelReport,
    /// Data cache.
    pub dcache: LevelReport,
    /// Unified L2.
    pub l2: LevelReport,
}

impl HierarchyStats {
    /// Report for the given level.
    pub const fn level(&self, id: LevelId) -> &LevelReport {
        match id {
            LevelId::Instruction => &self.icache,
            LevelId::Data => &self.dcache,
            LevelId::Unified => &self.l2,
        }
    }

    /// Writes the text report to `out`.
    ///
    /// # Errors
    ///
    /// Propagates any error from the writer.
    pub fn write_report<W: std::io::Write>(&self, out: &mut W) -> std::io::Result<()> {
        writeln!(out, "==========================================================")?;
        writeln!(out, "CACHE HIERARCHY STATISTICS")?;
        writeln!(out, "==========================================================")?;
        writeln!(out, "sim_accesses             {}", self.accesses)?;
        writeln!(out, "memory_latency           {} cycles", self.memory_latency)?;
        writeln!(out, "----------------------------------------------------------")?;
        for id in LevelId::ALL {
            let r = self.level(id);
            writeln!(out, "{id}")?;
            writeln!(out, "  refs                   {}", r.stats.refs)?;
            writeln!(out, "  misses                 {}", r.stats.misses)?;
            writeln!(out, "  penalties              {} cycles", r.stats.penalties)?;
            writeln!(out, "  miss_rate              {:.2}%", r.miss_rate * 100.0)?;
            writeln!(out, "  avg_access_time        {:.2} cycles", r.avg_access_time)?;
            if r.stats.invalidations > 0 {
                writeln!(out, "  back_invalidations     {}", r.stats.invalidations)?;
            }
        }
        writeln!(out, "==========================================================")
    }

    /// Prints the text report to stdout.
    ///
    /// # Errors
    ///
    /// Fails when stdout cannot be written, e.g. a closed pipe.
    pub fn print(&self) -> std::io::Result<()> {
        self.write_report(&mut std::io::stdout().lock())
    }
}
