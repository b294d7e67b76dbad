//! Way storage for one cache level.
//!
//! Each set owns a fixed-size run of ways. A way records the tag of its resident line and
//! the logical time it was last touched; a timestamp of 0 marks an empty way. Victims are
//! chosen by scanning the set for the smallest timestamp, which approximates LRU with a
//! cost of O(ways) per probe.
//!
//! Lookups and fills are split: [`SetAssociativeStore::probe`] reports a hit or names a
//! victim [`Slot`], and the caller installs the new line later through
//! [`SetAssociativeStore::commit`]. Nothing else mutates a way's tag.

use crate::common::AddrLayout;

/// Timestamp of a way that has never been filled (or was invalidated).
pub const EMPTY: u64 = 0;

/// One storage slot within a set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Way {
    /// Tag of the resident line; meaningless while the way is empty.
    pub tag: u32,
    /// Logical time of the last access, or [`EMPTY`].
    pub stamp: u64,
}

impl Way {
    /// Whether the way holds a line.
    #[inline(always)]
    pub const fn is_occupied(&self) -> bool {
        self.stamp != EMPTY
    }
}

/// Location of a way: set index and way index within the set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Slot {
    /// Set index.
    pub set: usize,
    /// Way index within the set.
    pub way: usize,
}

/// Outcome of a lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Probe {
    /// The tag was resident; its timestamp has been refreshed.
    pub hit: bool,
    /// On a hit, the matching way. On a miss, the way to fill.
    pub slot: Slot,
}

/// A set: `ways` consecutive way records.
#[derive(Clone, Debug)]
struct CacheSet {
    ways: Vec<Way>,
}

/// Tag and recency storage of one cache level.
#[derive(Clone, Debug)]
pub struct SetAssociativeStore {
    layout: AddrLayout,
    sets: Vec<CacheSet>,
}

impl SetAssociativeStore {
    /// Allocates `2^index_bits` empty sets of `ways` ways each.
    ///
    /// A `ways` of 0 is treated as 1.
    pub fn new(layout: AddrLayout, ways: usize) -> Self {
        let ways = ways.max(1);
        let num_sets = 1usize << layout.index_bits();
        Self {
            layout,
            sets: vec![
                CacheSet {
                    ways: vec![Way::default(); ways],
                };
                num_sets
            ],
        }
    }

    /// Address layout used to decode lookups.
    pub const fn layout(&self) -> AddrLayout {
        self.layout
    }

    /// Number of sets.
    pub fn num_sets(&self) -> usize {
        self.sets.len()
    }

    /// Associativity.
    pub fn ways(&self) -> usize {
        self.sets.first().map_or(0, |s| s.ways.len())
    }

    /// Ways of the set at `index`, in way order.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.num_sets()`.
    pub fn set(&self, index: usize) -> &[Way] {
        &self.sets[index].ways
    }

    /// Looks up `addr` and picks a victim in case of a miss.
    ///
    /// On a hit the matching way's timestamp is set to `now` and no other way
    /// changes. On a miss nothing changes; the returned slot is the way with the
    /// smallest timestamp, the lowest way index winning ties, so empty ways are
    /// filled in order before any resident line is evicted.
    pub fn probe(&mut self, addr: u32, now: u64) -> Probe {
        let set = self.layout.index_of(addr) as usize;
        let tag = self.layout.tag_of(addr);
        let ways = &mut self.sets[set].ways;

        let mut victim = 0;
        let mut oldest = u64::MAX;
        for (i, way) in ways.iter_mut().enumerate() {
            if way.is_occupied() && way.tag == tag {
                way.stamp = now;
                return Probe {
                    hit: true,
                    slot: Slot { set, way: i },
                };
            }
            // strict: first way wins ties
            if way.stamp < oldest {
                oldest = way.stamp;
                victim = i;
            }
        }

        Probe {
            hit: false,
            slot: Slot { set, way: victim },
        }
    }

    /// Installs the line holding `addr` into `slot`, stamped with `now`.
    ///
    /// Returns the block address of the line that was resident in the slot,
    /// if any. `slot` must come from a missing [`probe`](Self::probe) of the
    /// same address with no intervening fill of that set.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `slot` is not the set of `addr` or if the
    /// tag is already resident in another way of the set.
    pub fn commit(&mut self, slot: Slot, addr: u32, now: u64) -> Option<u32> {
        debug_assert_eq!(slot.set, self.layout.index_of(addr) as usize);
        let tag = self.layout.tag_of(addr);
        let layout = self.layout;
        let ways = &mut self.sets[slot.set].ways;

        debug_assert!(
            !ways
                .iter()
                .enumerate()
                .any(|(i, w)| i != slot.way && w.is_occupied() && w.tag == tag),
            "duplicate tag {tag:#x} in set {}",
            slot.set
        );

        let old = ways[slot.way];
        ways[slot.way] = Way { tag, stamp: now };
        old.is_occupied()
            .then(|| layout.reassemble(slot.set as u32, old.tag))
    }

    /// Empties the way holding `addr`, if resident.
    pub fn invalidate(&mut self, addr: u32) -> bool {
        let set = self.layout.index_of(addr) as usize;
        let tag = self.layout.tag_of(addr);
        match self.sets[set]
            .ways
            .iter_mut()
            .find(|w| w.is_occupied() && w.tag == tag)
        {
            Some(way) => {
                *way = Way::default();
                true
            }
            None => false,
        }
    }

    /// Whether the line holding `addr` is resident. Does not touch recency.
    pub fn contains(&self, addr: u32) -> bool {
        let set = self.layout.index_of(addr) as usize;
        let tag = self.layout.tag_of(addr);
        self.sets[set]
            .ways
            .iter()
            .any(|w| w.is_occupied() && w.tag == tag)
    }

    /// Number of occupied ways across all sets.
    pub fn occupancy(&self) -> usize {
        self.sets
            .iter()
            .map(|s| s.ways.iter().filter(|w| w.is_occupied()).count())
            .sum()
    }

    /// Empties every way.
    pub fn clear(&mut self) {
        for set in &mut self.sets {
            set.ways.fill(Way::default());
        }
    }
}
