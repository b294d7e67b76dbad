//! Cache Level Unit Tests.
//!
//! Exercises a single level with a stubbed next level: hit time, miss penalty
//! accounting, delegation on misses only, and invalidation counting.

use std::cell::Cell;

use cachesim_core::cache::{CacheLevel, LevelId};
use cachesim_core::common::AddrLayout;
use cachesim_core::config::CacheConfig;
use cachesim_core::stats::LevelStats;
use pretty_assertions::assert_eq;

const NEXT_LEVEL_LATENCY: u64 = 10;

/// 2 sets x 2 ways, 64-byte blocks, hit time 3.
///
/// Set index = (addr >> 6) & 1, tag = addr >> 7.
fn level() -> CacheLevel {
    let layout = match AddrLayout::new(2, 64) {
        Some(l) => l,
        None => unreachable!(),
    };
    CacheLevel::new(LevelId::Data, &CacheConfig::new(2, 2, 3), layout)
}

#[test]
fn cold_miss_charges_next_level() {
    let mut l = level();
    let access = l.access(0x1000, 1, |_| NEXT_LEVEL_LATENCY);

    assert!(!access.hit);
    assert_eq!(access.cycles, 3 + NEXT_LEVEL_LATENCY);
    assert_eq!(access.evicted, None);
    assert_eq!(
        *l.stats(),
        LevelStats {
            refs: 1,
            misses: 1,
            penalties: NEXT_LEVEL_LATENCY,
            invalidations: 0,
        }
    );
}

#[test]
fn warm_hit_costs_hit_time_only() {
    let mut l = level();
    let _ = l.access(0x1000, 1, |_| NEXT_LEVEL_LATENCY);

    let access = l.access(0x1000 + 32, 2, |_| panic!("hit must not reach the next level"));
    assert!(access.hit);
    assert_eq!(access.cycles, 3);
    assert_eq!(l.stats().refs, 2);
    assert_eq!(l.stats().misses, 1);
    assert_eq!(l.stats().penalties, NEXT_LEVEL_LATENCY);
}

#[test]
fn next_level_sees_the_requested_address_once() {
    let mut l = level();
    let calls = Cell::new(0);
    let _ = l.access(0xABCD, 1, |addr| {
        assert_eq!(addr, 0xABCD);
        calls.set(calls.get() + 1);
        7
    });
    assert_eq!(calls.get(), 1);
}

#[test]
fn penalties_accumulate_variable_next_level_time() {
    let mut l = level();
    let _ = l.access(0x0000, 1, |_| 10);
    let _ = l.access(0x0080, 2, |_| 110);
    let _ = l.access(0x0100, 3, |_| 10);
    assert_eq!(l.stats().misses, 3);
    assert_eq!(l.stats().penalties, 130);
}

/// Three addresses in set 0 with two ways: the third evicts the least recent.
#[test]
fn conflict_evicts_least_recent() {
    let mut l = level();
    let (a, b, c) = (0x000, 0x080, 0x100);

    let _ = l.access(a, 1, |_| NEXT_LEVEL_LATENCY);
    let _ = l.access(b, 2, |_| NEXT_LEVEL_LATENCY);
    let _ = l.access(a, 3, |_| NEXT_LEVEL_LATENCY); // a is now more recent than b

    let access = l.access(c, 4, |_| NEXT_LEVEL_LATENCY);
    assert!(!access.hit);
    assert_eq!(access.evicted, Some(b));
    assert!(l.contains(a));
    assert!(!l.contains(b));
    assert!(l.contains(c));
}

#[test]
fn invalidation_is_counted_separately() {
    let mut l = level();
    let _ = l.access(0x40, 1, |_| NEXT_LEVEL_LATENCY);

    assert!(l.invalidate(0x40));
    assert!(!l.invalidate(0x40));
    assert_eq!(l.stats().invalidations, 1);
    assert_eq!(l.stats().refs, 1);

    let access = l.access(0x40, 2, |_| NEXT_LEVEL_LATENCY);
    assert!(!access.hit, "invalidated line must miss");
}

#[test]
fn reset_clears_lines_and_counters() {
    let mut l = level();
    let _ = l.access(0x40, 1, |_| NEXT_LEVEL_LATENCY);
    l.reset();
    assert_eq!(*l.stats(), LevelStats::default());
    assert!(!l.contains(0x40));
}

#[test]
fn zero_associativity_behaves_as_direct_mapped() {
    let layout = match AddrLayout::new(1, 1) {
        Some(l) => l,
        None => unreachable!(),
    };
    let mut l = CacheLevel::new(LevelId::Unified, &CacheConfig::new(1, 0, 1), layout);
    assert_eq!(l.store().ways(), 1);

    let _ = l.access(1, 1, |_| 0);
    let access = l.access(2, 2, |_| 0);
    assert_eq!(access.evicted, Some(1));
}
