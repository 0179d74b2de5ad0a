//! Stateless operations on a single 64-bit block.
//!
//! The default `popcount`/`lsb`/`msb` compile to single CPU instructions
//! (POPCNT, TZCNT, LZCNT). De Bruijn and lookup-table variants are kept as
//! portable fallbacks and must return identical results for every input;
//! the unit tests enforce this.

use crate::masks::{mask_range, MASK_HIGH, MASK_LOW};
use crate::tables::tables;

/// De Bruijn multiplier for the isolated-bit form `w & w.wrapping_neg()`.
const DEBRUIJN_ISOL: u64 = 0x07ED_D5E5_9A4E_28C2;

/// De Bruijn multiplier for the trailing-ones form `w ^ (w - 1)`.
const DEBRUIJN_SEP: u64 = 0x03f7_9d71_b4cb_0a89;

const DEBRUIJN_SHIFT: u32 = 58;

/// Index of the block holding bit `bit`.
#[inline]
pub const fn block_index(bit: usize) -> usize {
    bit >> 6
}

/// Offset of bit `bit` within its block (0-63).
#[inline]
pub const fn bit_offset(bit: usize) -> usize {
    bit & 0x3F
}

/// First bit index of block `block`.
#[inline]
pub const fn block_to_bit(block: usize) -> usize {
    block << 6
}

/// Bit index table for the isolated-bit De Bruijn hash.
const INDEX_DEBRUIJN_ISOL: [u32; 64] = [
    63, 0, 58, 1, 59, 47, 53, 2, 60, 39, 48, 27, 54, 33, 42, 3, 61, 51, 37, 40, 49, 18, 28, 20,
    55, 30, 34, 11, 43, 14, 22, 4, 62, 57, 46, 52, 38, 26, 32, 41, 50, 36, 17, 19, 29, 10, 13, 21,
    56, 45, 25, 31, 35, 16, 9, 12, 44, 24, 15, 8, 23, 7, 6, 5,
];

/// Bit index table for the trailing-ones De Bruijn hash.
const INDEX_DEBRUIJN_SEP: [u32; 64] = [
    0, 47, 1, 56, 48, 27, 2, 60, 57, 49, 41, 37, 28, 16, 3, 61, 54, 58, 35, 52, 50, 42, 21, 44,
    38, 32, 29, 23, 17, 11, 4, 62, 46, 55, 26, 59, 40, 36, 15, 53, 34, 51, 20, 43, 31, 22, 10, 45,
    25, 39, 14, 33, 19, 30, 9, 24, 13, 18, 8, 12, 7, 6, 5, 63,
];

/// Number of set bits in the block (0-64).
///
/// # Performance
/// O(1) - single CPU instruction (POPCNT)
#[inline]
pub fn popcount(bb: u64) -> usize {
    bb.count_ones() as usize
}

/// Offset of the least significant set bit, or `None` if the block is empty.
///
/// # Performance
/// O(1) - single CPU instruction (TZCNT)
#[inline]
pub fn lsb(bb: u64) -> Option<usize> {
    if bb == 0 {
        None
    } else {
        Some(bb.trailing_zeros() as usize)
    }
}

/// Offset of the most significant set bit, or `None` if the block is empty.
///
/// # Performance
/// O(1) - single CPU instruction (LZCNT)
#[inline]
pub fn msb(bb: u64) -> Option<usize> {
    if bb == 0 {
        None
    } else {
        Some(63 - bb.leading_zeros() as usize)
    }
}

/// True if bit `bit` is set in the block.
///
/// # Arguments
/// * `bb` - Input block
/// * `bit` - Bit offset (0-63)
#[inline]
pub fn is_bit(bb: u64, bit: usize) -> bool {
    bb & (1u64 << bit) != 0
}

/// Least significant bit via De Bruijn perfect hashing, no lookup tables
/// beyond the 64-entry index array. Hashes `bb ^ (bb - 1)`.
#[inline]
pub fn lsb_debruijn(bb: u64) -> Option<usize> {
    if bb == 0 {
        return None;
    }
    let hash = (bb ^ (bb - 1)).wrapping_mul(DEBRUIJN_SEP) >> DEBRUIJN_SHIFT;
    Some(INDEX_DEBRUIJN_SEP[hash as usize] as usize)
}

/// Least significant bit via De Bruijn hashing of the isolated bit
/// `bb & -bb`.
#[inline]
pub fn lsb_debruijn_isol(bb: u64) -> Option<usize> {
    if bb == 0 {
        return None;
    }
    let hash = (bb & bb.wrapping_neg()).wrapping_mul(DEBRUIJN_ISOL) >> DEBRUIJN_SHIFT;
    Some(INDEX_DEBRUIJN_ISOL[hash as usize] as usize)
}

/// Most significant bit via De Bruijn hashing. Smears the highest bit down
/// to all lower positions, then applies the trailing-ones hash.
#[inline]
pub fn msb_debruijn(bb: u64) -> Option<usize> {
    if bb == 0 {
        return None;
    }
    let mut smeared = bb;
    smeared |= smeared >> 1;
    smeared |= smeared >> 2;
    smeared |= smeared >> 4;
    smeared |= smeared >> 8;
    smeared |= smeared >> 16;
    smeared |= smeared >> 32;
    let hash = smeared.wrapping_mul(DEBRUIJN_SEP) >> DEBRUIJN_SHIFT;
    Some(INDEX_DEBRUIJN_SEP[hash as usize] as usize)
}

/// Population count through the 16-bit lookup table.
#[inline]
pub fn popcount_lookup(bb: u64) -> usize {
    let t = tables();
    t.pc16[(bb & 0xFFFF) as usize] as usize
        + t.pc16[((bb >> 16) & 0xFFFF) as usize] as usize
        + t.pc16[((bb >> 32) & 0xFFFF) as usize] as usize
        + t.pc16[(bb >> 48) as usize] as usize
}

/// Least significant bit through the 16-bit lookup tables with positional
/// offsets, lowest lane first.
#[inline]
pub fn lsb_lookup(bb: u64) -> Option<usize> {
    let t = tables();
    for lane in 0..4 {
        let word = ((bb >> (16 * lane)) & 0xFFFF) as usize;
        let hit = t.lsb16[lane][word];
        if hit >= 0 {
            return Some(hit as usize);
        }
    }
    None
}

/// Most significant bit through the 16-bit lookup tables with positional
/// offsets, highest lane first.
#[inline]
pub fn msb_lookup(bb: u64) -> Option<usize> {
    let t = tables();
    for lane in (0..4).rev() {
        let word = ((bb >> (16 * lane)) & 0xFFFF) as usize;
        let hit = t.msb16[lane][word];
        if hit >= 0 {
            return Some(hit as usize);
        }
    }
    None
}

/// Clears the bits of `bb` strictly below `idx`; bit `idx` survives.
#[inline]
pub fn trim_low(bb: u64, idx: usize) -> u64 {
    bb & !MASK_LOW[idx]
}

/// Clears the bits of `bb` strictly above `idx`; bit `idx` survives.
#[inline]
pub fn trim_high(bb: u64, idx: usize) -> u64 {
    bb & !MASK_HIGH[idx]
}

/// Returns `dest` with the bits in the closed range `[lo, hi]` replaced by
/// the corresponding bits of `source`.
///
/// # Arguments
/// * `lo` - Lower offset (inclusive, 0-63)
/// * `hi` - Upper offset (inclusive, 0-63, `lo <= hi`)
/// * `source` - Block supplying the range
/// * `dest` - Block supplying everything else
#[inline]
pub fn copy_range(lo: usize, hi: usize, source: u64, dest: u64) -> u64 {
    let m = mask_range(lo, hi);
    (dest & !m) | (source & m)
}

/// Returns `dest` with the bits in `[bit, 63]` replaced by those of
/// `source`.
#[inline]
pub fn copy_high(bit: usize, source: u64, dest: u64) -> u64 {
    copy_range(bit, 63, source, dest)
}

/// Returns `dest` with the bits in `[0, bit]` replaced by those of
/// `source`.
#[inline]
pub fn copy_low(bit: usize, source: u64, dest: u64) -> u64 {
    copy_range(0, bit, source, dest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_popcount() {
        assert_eq!(popcount(0), 0);
        assert_eq!(popcount(1), 1);
        assert_eq!(popcount(0b1011), 3);
        assert_eq!(popcount(!0u64), 64);
    }

    #[test]
    fn test_lsb_msb() {
        assert_eq!(lsb(0), None);
        assert_eq!(msb(0), None);
        assert_eq!(lsb(1), Some(0));
        assert_eq!(msb(1), Some(0));
        assert_eq!(lsb(0b1010_0000), Some(5));
        assert_eq!(msb(0b1010_0000), Some(7));
        assert_eq!(lsb(1u64 << 63), Some(63));
        assert_eq!(msb(1u64 << 63), Some(63));
    }

    #[test]
    fn test_is_bit() {
        assert!(is_bit(0b100, 2));
        assert!(!is_bit(0b100, 1));
        assert!(is_bit(1u64 << 63, 63));
    }

    #[test]
    fn test_debruijn_matches_intrinsics() {
        // Single-bit words hit every table entry.
        for i in 0..64 {
            let w = 1u64 << i;
            assert_eq!(lsb_debruijn(w), lsb(w));
            assert_eq!(lsb_debruijn_isol(w), lsb(w));
            assert_eq!(msb_debruijn(w), msb(w));
        }
        // Pseudorandom sample.
        let mut rng = ChaCha8Rng::seed_from_u64(0xB17B);
        for _ in 0..10_000 {
            let w: u64 = rng.gen();
            assert_eq!(lsb_debruijn(w), lsb(w));
            assert_eq!(lsb_debruijn_isol(w), lsb(w));
            assert_eq!(msb_debruijn(w), msb(w));
        }
        assert_eq!(lsb_debruijn(0), None);
        assert_eq!(lsb_debruijn_isol(0), None);
        assert_eq!(msb_debruijn(0), None);
    }

    #[test]
    fn test_lookup_matches_intrinsics() {
        let mut rng = ChaCha8Rng::seed_from_u64(0x10CC);
        for _ in 0..10_000 {
            let w: u64 = rng.gen();
            assert_eq!(popcount_lookup(w), popcount(w));
            assert_eq!(lsb_lookup(w), lsb(w));
            assert_eq!(msb_lookup(w), msb(w));
        }
        assert_eq!(popcount_lookup(0), 0);
        assert_eq!(lsb_lookup(0), None);
        assert_eq!(msb_lookup(0), None);
    }

    #[test]
    fn test_trim() {
        let w = 0b1111_1111;
        assert_eq!(trim_low(w, 4), 0b1111_0000);
        assert_eq!(trim_high(w, 4), 0b0001_1111);
        // The reference bit itself is preserved.
        assert_eq!(trim_low(1 << 10, 10), 1 << 10);
        assert_eq!(trim_high(1 << 10, 10), 1 << 10);
    }

    #[test]
    fn test_copy_range() {
        let src = 0xFFFF_0000_FFFF_0000;
        let dst = 0x0000_0000_0000_0000;
        assert_eq!(copy_range(0, 63, src, dst), src);
        assert_eq!(copy_range(16, 31, src, dst), 0xFFFF_0000);
        assert_eq!(copy_low(15, src, !0u64), 0xFFFF_FFFF_FFFF_0000);
        assert_eq!(copy_high(48, src, !0u64), 0xFFFF_FFFF_FFFF_FFFF);
        assert_eq!(copy_high(48, 0, !0u64), 0x0000_FFFF_FFFF_FFFF);
    }
}
