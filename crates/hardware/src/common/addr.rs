//! Address decomposition for a single cache level.
//!
//! This module splits 32-bit addresses into the fields a set-associative cache needs. It provides:
//! 1. **Bit widths:** Index, offset and tag widths derived from the set count and block size.
//! 2. **Field extraction:** Set index and tag of an address.
//! 3. **Reassembly:** The inverse mapping from a stored (index, tag) pair back to a block address.

/// Width of a modelled address in bits.
pub const ADDR_BITS: u32 = 32;

/// Field layout of a 32-bit address for one cache level.
///
/// The offset occupies the low `offset_bits` bits, the index the next
/// `index_bits` bits, and the tag the highest `tag_bits` bits. A layout is
/// only constructed from validated geometry, so `index_bits + offset_bits`
/// never exceeds [`ADDR_BITS`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddrLayout {
    index_bits: u32,
    offset_bits: u32,
    tag_bits: u32,
}

/// Floor of log2 for a non-zero value; zero maps to zero.
///
/// Exact for every power of two, so no floating-point tolerance is needed.
#[inline]
pub const fn log2_floor(value: u32) -> u32 {
    if value == 0 { 0 } else { value.ilog2() }
}

impl AddrLayout {
    /// Builds the layout for a level with `sets` sets and `block_size`-byte blocks.
    ///
    /// Returns `None` when the index and offset fields together exceed the
    /// address width, i.e. the tag width would be negative.
    pub const fn new(sets: u32, block_size: u32) -> Option<Self> {
        let index_bits = log2_floor(sets);
        let offset_bits = log2_floor(block_size);
        if index_bits + offset_bits > ADDR_BITS {
            return None;
        }
        Some(Self {
            index_bits,
            offset_bits,
            tag_bits: ADDR_BITS - index_bits - offset_bits,
        })
    }

    /// Number of bits selecting the set.
    #[inline(always)]
    pub const fn index_bits(&self) -> u32 {
        self.index_bits
    }

    /// Number of bits selecting a byte within a block.
    #[inline(always)]
    pub const fn offset_bits(&self) -> u32 {
        self.offset_bits
    }

    /// Number of bits identifying a line within its set.
    #[inline(always)]
    pub const fn tag_bits(&self) -> u32 {
        self.tag_bits
    }

    /// Set index of `addr`: the `index_bits` bits directly above the offset.
    #[inline(always)]
    pub const fn index_of(&self, addr: u32) -> u32 {
        let mask = (1u64 << self.index_bits) - 1;
        (((addr as u64) >> self.offset_bits) & mask) as u32
    }

    /// Tag of `addr`: the highest `tag_bits` bits of the address.
    ///
    /// A zero-width tag yields 0 for every address.
    #[inline(always)]
    pub const fn tag_of(&self, addr: u32) -> u32 {
        ((addr as u64) >> (ADDR_BITS - self.tag_bits)) as u32
    }

    /// Rebuilds the block address of the line stored at (`index`, `tag`).
    ///
    /// The offset bits of the result are always zero.
    #[inline(always)]
    pub const fn reassemble(&self, index: u32, tag: u32) -> u32 {
        ((((tag as u64) << self.index_bits) | index as u64) << self.offset_bits) as u32
    }

    /// `addr` with its offset bits cleared.
    #[inline(always)]
    pub const fn block_base(&self, addr: u32) -> u32 {
        ((addr as u64 >> self.offset_bits) << self.offset_bits) as u32
    }
}
