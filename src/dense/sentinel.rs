//! Dense bitset with a sentinel window over the active blocks.
//!
//! The window `[low, high]` delimits the blocks that may hold set bits;
//! everything outside is guaranteed zero. Operations restrict themselves to
//! the window, which pays off in branch-and-bound loops where candidate
//! sets shrink monotonically.

use core::fmt;

use crate::block::{self, bit_offset, block_index, block_to_bit};
use crate::error::ScanError;
use crate::masks::{mask_bit, mask_high, mask_low, ALL_ZEROS};
use crate::scan::{BitScan, ScanCursor, ScanMode};

use super::{BitSet, Bits};

/// Dense bitset whose non-zero blocks are confined to a tracked window.
///
/// Invariant: every block outside `window` is zero. The empty window
/// (`None`) means the whole bitset is zero. `set_bit` expands the window as
/// needed so the invariant cannot be broken through the public API;
/// erasing only shrinks the window through the `*_and_update` and
/// `update_*` operations.
///
/// # Example
/// ```
/// use scanbits::SentinelSet;
///
/// let mut bs = SentinelSet::new(640);
/// bs.set_bit(128);
/// bs.set_bit(192);
/// bs.update_sentinels();
/// assert_eq!(bs.sentinel_low(), Some(2));
/// assert_eq!(bs.sentinel_high(), Some(3));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SentinelSet {
    bs: BitSet,
    window: Option<(usize, usize)>,
}

impl SentinelSet {
    /// Creates a sentinel bitset for `pop_size` bits with the window at
    /// maximum scope.
    pub fn new(pop_size: usize) -> Self {
        let bs = BitSet::new(pop_size);
        let window = full_window(bs.num_blocks());
        SentinelSet { bs, window }
    }

    /// Creates a sentinel bitset with the given bits set and a tight
    /// window.
    pub fn with_bits(pop_size: usize, bits: &[usize]) -> Self {
        let mut s = SentinelSet {
            bs: BitSet::with_bits(pop_size, bits),
            window: None,
        };
        s.init_sentinels();
        s.update_sentinels();
        s
    }

    /// Number of blocks.
    #[inline]
    pub fn num_blocks(&self) -> usize {
        self.bs.num_blocks()
    }

    /// Number of addressable bits.
    #[inline]
    pub fn bit_capacity(&self) -> usize {
        self.bs.bit_capacity()
    }

    /// Raw read of block `i`.
    #[inline]
    pub fn block(&self, i: usize) -> u64 {
        self.bs.block(i)
    }

    /// Read-only view of the underlying dense bitset.
    #[inline]
    pub fn as_bitset(&self) -> &BitSet {
        &self.bs
    }

    /// Low sentinel: first block that may be non-zero.
    #[inline]
    pub fn sentinel_low(&self) -> Option<usize> {
        self.window.map(|(low, _)| low)
    }

    /// High sentinel: last block that may be non-zero.
    #[inline]
    pub fn sentinel_high(&self) -> Option<usize> {
        self.window.map(|(_, high)| high)
    }

    /// Forces the window to `[low, high]`. The caller guarantees every
    /// block outside the range is zero.
    pub fn set_sentinels(&mut self, low: usize, high: usize) {
        debug_assert!(low <= high && high < self.num_blocks());
        self.window = Some((low, high));
    }

    /// Empties the window. The caller guarantees the bitset is all-zero.
    pub fn clear_sentinels(&mut self) {
        self.window = None;
    }

    /// Resets the window to maximum scope.
    pub fn init_sentinels(&mut self) {
        self.window = full_window(self.num_blocks());
    }

    /// Tightens the window from both ends, emptying it when no non-zero
    /// block remains. Returns the new window.
    pub fn update_sentinels(&mut self) -> Option<(usize, usize)> {
        let (low, high) = match self.window {
            Some(w) => w,
            None => return None,
        };
        self.window = tighten(&self.bs.blocks, low, high);
        self.window
    }

    /// Replaces the window with `[bbl, bbh]` and tightens it.
    pub fn update_sentinels_in(&mut self, bbl: usize, bbh: usize) -> Option<(usize, usize)> {
        debug_assert!(bbl <= bbh && bbh < self.num_blocks());
        self.window = tighten(&self.bs.blocks, bbl, bbh);
        self.window
    }

    /// Advances the low sentinel past leading zero blocks.
    pub fn update_sentinel_low(&mut self) -> Option<(usize, usize)> {
        if let Some((low, high)) = self.window {
            if self.bs.blocks[low] == 0 {
                match (low + 1..=high).find(|&i| self.bs.blocks[i] != 0) {
                    Some(i) => self.window = Some((i, high)),
                    None => self.window = None,
                }
            }
        }
        self.window
    }

    /// Retreats the high sentinel past trailing zero blocks.
    pub fn update_sentinel_high(&mut self) -> Option<(usize, usize)> {
        if let Some((low, high)) = self.window {
            if self.bs.blocks[high] == 0 {
                match (low..high).rev().find(|&i| self.bs.blocks[i] != 0) {
                    Some(i) => self.window = Some((low, i)),
                    None => self.window = None,
                }
            }
        }
        self.window
    }

    /// Expands the window to include the block of `bit`.
    pub fn update_sentinels_to(&mut self, bit: usize) {
        debug_assert!(bit < self.bit_capacity());
        let bb = block_index(bit);
        self.window = match self.window {
            None => Some((bb, bb)),
            Some((low, high)) => Some((low.min(bb), high.max(bb))),
        };
    }

    /// Sets bit `bit`, expanding the window to cover its block.
    #[inline]
    pub fn set_bit(&mut self, bit: usize) {
        self.bs.set_bit(bit);
        self.update_sentinels_to(bit);
    }

    /// Clears bit `bit` without touching the window.
    #[inline]
    pub fn erase_bit(&mut self, bit: usize) {
        self.bs.erase_bit(bit);
    }

    /// Clears bit `bit` and shrinks the window when its block was the
    /// window edge and became empty.
    pub fn erase_bit_and_update(&mut self, bit: usize) {
        let (low, high) = match self.window {
            Some(w) => w,
            None => return,
        };
        let bb = block_index(bit);
        self.bs.blocks[bb] &= !mask_bit(bit_offset(bit));
        if self.bs.blocks[bb] == 0 {
            if bb == low {
                self.update_sentinel_low();
            } else if bb == high {
                self.update_sentinel_high();
            }
        }
    }

    /// True if bit `bit` is set.
    #[inline]
    pub fn is_bit(&self, bit: usize) -> bool {
        self.bs.is_bit(bit)
    }

    /// Population count over the window.
    pub fn size(&self) -> usize {
        match self.window {
            None => 0,
            Some((low, high)) => self.bs.blocks[low..=high]
                .iter()
                .map(|&b| block::popcount(b))
                .sum(),
        }
    }

    /// True if no bit is set; only the window is inspected.
    pub fn is_empty(&self) -> bool {
        match self.window {
            None => true,
            Some((low, high)) => self.bs.blocks[low..=high].iter().all(|&b| b == 0),
        }
    }

    /// True if the block range `[bbl, bbh]`, intersected with the window,
    /// holds no set bit.
    pub fn is_empty_in(&self, bbl: usize, bbh: usize) -> bool {
        match self.window {
            None => true,
            Some((low, high)) => {
                let lo = bbl.max(low);
                let hi = bbh.min(high);
                lo > hi || self.bs.blocks[lo..=hi].iter().all(|&b| b == 0)
            }
        }
    }

    /// Lowest set bit.
    pub fn lsb(&self) -> Option<usize> {
        let (low, high) = self.window?;
        (low..=high)
            .find(|&i| self.bs.blocks[i] != 0)
            .map(|i| block_to_bit(i) + self.bs.blocks[i].trailing_zeros() as usize)
    }

    /// Highest set bit.
    pub fn msb(&self) -> Option<usize> {
        let (low, high) = self.window?;
        (low..=high)
            .rev()
            .find(|&i| self.bs.blocks[i] != 0)
            .map(|i| block_to_bit(i) + 63 - self.bs.blocks[i].leading_zeros() as usize)
    }

    /// Clears all blocks in the window; the window itself is kept so the
    /// caller can refresh it with `update_sentinels` or `clear_sentinels`.
    pub fn erase_all(&mut self) {
        if let Some((low, high)) = self.window {
            self.bs.blocks[low..=high].fill(ALL_ZEROS);
        }
    }

    /// Clears the bits of `rhs` from `self`, window-bounded.
    pub fn erase_bits(&mut self, rhs: &BitSet) {
        if let Some((low, high)) = self.window {
            debug_assert!(high < rhs.num_blocks());
            for i in low..=high {
                self.bs.blocks[i] &= !rhs.block(i);
            }
        }
    }

    /// ANDs `rhs` into `self`, window-bounded. Also available as the
    /// `&=` operator.
    pub fn and_with(&mut self, rhs: &BitSet) {
        if let Some((low, high)) = self.window {
            debug_assert!(high < rhs.num_blocks());
            for i in low..=high {
                self.bs.blocks[i] &= rhs.block(i);
            }
        }
    }

    /// Ascending iterator over the set bits, bounded by the window.
    pub fn iter(&self) -> Bits<'_> {
        match self.window {
            None => Bits::over(&[]),
            Some((_, high)) => Bits::over(&self.bs.blocks[..=high]),
        }
    }

    /// Set bits as an ascending vector.
    pub fn to_vector(&self) -> Vec<usize> {
        self.iter().collect()
    }
}

/// Writes `lhs & rhs` into `out` over `rhs`'s window; `out` adopts that
/// window. `out`'s previously active blocks are cleared first so its
/// window invariant survives the narrowing.
pub fn and_windowed(lhs: &BitSet, rhs: &SentinelSet, out: &mut SentinelSet) {
    debug_assert_eq!(rhs.num_blocks(), out.num_blocks());
    out.erase_all();
    out.window = rhs.window;
    if let Some((low, high)) = rhs.window {
        debug_assert!(high < lhs.num_blocks());
        for i in low..=high {
            out.bs.blocks[i] = lhs.block(i) & rhs.bs.blocks[i];
        }
    }
}

#[inline]
fn full_window(num_blocks: usize) -> Option<(usize, usize)> {
    if num_blocks == 0 {
        None
    } else {
        Some((0, num_blocks - 1))
    }
}

/// Shrinks `[low, high]` to the outermost non-zero blocks, or `None` when
/// all blocks in the range are zero.
fn tighten(blocks: &[u64], low: usize, high: usize) -> Option<(usize, usize)> {
    let low = (low..=high).find(|&i| blocks[i] != 0)?;
    let high = (low..=high).rev().find(|&i| blocks[i] != 0)?;
    Some((low, high))
}

impl core::ops::BitAndAssign<&BitSet> for SentinelSet {
    /// Window-bounded in-place AND with a dense bitset.
    fn bitand_assign(&mut self, rhs: &BitSet) {
        self.and_with(rhs);
    }
}

impl<'a> IntoIterator for &'a SentinelSet {
    type Item = usize;
    type IntoIter = Bits<'a>;

    fn into_iter(self) -> Bits<'a> {
        self.iter()
    }
}

impl fmt::Display for SentinelSet {
    /// Bits, count, then the window, e.g. `[128 192 (2)](2,3)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for bit in self.iter() {
            write!(f, "{bit} ")?;
        }
        write!(f, "({})]", self.size())?;
        match self.window {
            Some((low, high)) => write!(f, "({low},{high})"),
            None => write!(f, "(-,-)"),
        }
    }
}

impl BitScan for SentinelSet {
    fn init_scan(&mut self, mode: ScanMode) -> Result<(), ScanError> {
        self.update_sentinels();
        self.bs.cursor = match (mode, self.window) {
            (_, None) => ScanCursor::default(),
            (ScanMode::NonDestructive, Some((low, _))) => ScanCursor::forward(low),
            (ScanMode::NonDestructiveReverse, Some((_, high))) => ScanCursor::reverse(high),
            // Destructive scans walk the window directly; the cursor is
            // not consulted.
            (ScanMode::Destructive | ScanMode::DestructiveReverse, Some(_)) => {
                ScanCursor::default()
            }
        };
        Ok(())
    }

    fn init_scan_from(
        &mut self,
        first_bit: Option<usize>,
        mode: ScanMode,
    ) -> Result<(), ScanError> {
        let Some(bit) = first_bit else {
            return self.init_scan(mode);
        };
        match mode {
            ScanMode::NonDestructive | ScanMode::NonDestructiveReverse => {
                debug_assert!(bit < self.bit_capacity(), "bit {bit} out of range");
                self.update_sentinels();
                self.bs.cursor = ScanCursor::at(block_index(bit), bit_offset(bit));
                Ok(())
            }
            ScanMode::Destructive | ScanMode::DestructiveReverse => {
                Err(ScanError::DestructiveStart)
            }
        }
    }

    fn next_bit(&mut self) -> Option<usize> {
        let (_, high) = self.window?;
        if self.bs.cursor.block < 0 {
            return None;
        }
        let cur = self.bs.cursor.block as usize;
        if let Some(&b) = self.bs.blocks.get(cur) {
            if let Some(off) = block::lsb(b & mask_high(self.bs.cursor.pos)) {
                self.bs.cursor.pos = off;
                return Some(block_to_bit(cur) + off);
            }
        }
        for i in cur + 1..=high {
            if let Some(off) = block::lsb(self.bs.blocks[i]) {
                self.bs.cursor.block = i as isize;
                self.bs.cursor.pos = off;
                return Some(block_to_bit(i) + off);
            }
        }
        None
    }

    fn prev_bit(&mut self) -> Option<usize> {
        let (low, _) = self.window?;
        if self.bs.cursor.block < 0 {
            return None;
        }
        let cur = self.bs.cursor.block as usize;
        if let Some(&b) = self.bs.blocks.get(cur) {
            if let Some(off) = block::msb(b & mask_low(self.bs.cursor.pos)) {
                self.bs.cursor.pos = off;
                return Some(block_to_bit(cur) + off);
            }
        }
        for i in (low..cur).rev() {
            if let Some(off) = block::msb(self.bs.blocks[i]) {
                self.bs.cursor.block = i as isize;
                self.bs.cursor.pos = off;
                return Some(block_to_bit(i) + off);
            }
        }
        None
    }

    /// Destructive forward step; advances the low sentinel past drained
    /// blocks on the fly.
    fn next_bit_del(&mut self) -> Option<usize> {
        let (low, high) = self.window?;
        for i in low..=high {
            if let Some(off) = block::lsb(self.bs.blocks[i]) {
                self.window = Some((i, high));
                self.bs.blocks[i] &= !mask_bit(off);
                return Some(block_to_bit(i) + off);
            }
        }
        None
    }

    /// Destructive reverse step; lowers the high sentinel past drained
    /// blocks on the fly.
    fn prev_bit_del(&mut self) -> Option<usize> {
        let (low, high) = self.window?;
        for i in (low..=high).rev() {
            if let Some(off) = block::msb(self.bs.blocks[i]) {
                self.window = Some((low, i));
                self.bs.blocks[i] &= !mask_bit(off);
                return Some(block_to_bit(i) + off);
            }
        }
        None
    }

    fn next_bit_erasing(&mut self, other: &mut Self) -> Option<usize> {
        let bit = self.next_bit()?;
        other.erase_bit(bit);
        Some(bit)
    }

    fn prev_bit_erasing(&mut self, other: &mut Self) -> Option<usize> {
        let bit = self.prev_bit()?;
        other.erase_bit(bit);
        Some(bit)
    }

    fn next_bit_del_erasing(&mut self, other: &mut Self) -> Option<usize> {
        let bit = self.next_bit_del()?;
        other.erase_bit(bit);
        Some(bit)
    }

    fn prev_bit_del_erasing(&mut self, other: &mut Self) -> Option<usize> {
        let bit = self.prev_bit_del()?;
        other.erase_bit(bit);
        Some(bit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_tracks_bits() {
        let mut bs = SentinelSet::new(640);
        assert_eq!(bs.sentinel_low(), Some(0));
        assert_eq!(bs.sentinel_high(), Some(9));
        bs.set_bit(128);
        bs.set_bit(192);
        bs.update_sentinels();
        assert_eq!(bs.sentinel_low(), Some(2));
        assert_eq!(bs.sentinel_high(), Some(3));
    }

    #[test]
    fn test_erase_bit_and_update_shrinks() {
        // Block-capacity 10, bits in blocks 2 and 3.
        let mut bs = SentinelSet::with_bits(640, &[128, 192]);
        assert_eq!(bs.sentinel_low(), Some(2));
        assert_eq!(bs.sentinel_high(), Some(3));

        bs.erase_bit_and_update(128);
        assert!(!bs.is_bit(128));
        assert_eq!(bs.sentinel_low(), Some(3));

        bs.erase_bit_and_update(192);
        assert_eq!(bs.sentinel_low(), None);
        assert_eq!(bs.sentinel_high(), None);
        assert!(bs.is_empty());
    }

    #[test]
    fn test_set_bit_expands_window() {
        let mut bs = SentinelSet::with_bits(640, &[128]);
        assert_eq!(bs.sentinel_low(), Some(2));
        bs.set_bit(600);
        assert_eq!(bs.sentinel_high(), Some(9));
        bs.set_bit(0);
        assert_eq!(bs.sentinel_low(), Some(0));
        assert_eq!(bs.to_vector(), vec![0, 128, 600]);
    }

    #[test]
    fn test_window_invariant_after_updates() {
        let mut bs = SentinelSet::with_bits(640, &[70, 130, 300]);
        bs.update_sentinels();
        let (low, high) = (bs.sentinel_low().unwrap(), bs.sentinel_high().unwrap());
        for i in 0..bs.num_blocks() {
            if i < low || i > high {
                assert_eq!(bs.block(i), 0);
            }
        }
    }

    #[test]
    fn test_size_and_lsb_msb() {
        let bs = SentinelSet::with_bits(640, &[70, 130, 300]);
        assert_eq!(bs.size(), 3);
        assert_eq!(bs.lsb(), Some(70));
        assert_eq!(bs.msb(), Some(300));

        let empty = SentinelSet::new(640);
        assert_eq!(empty.size(), 0);
        assert_eq!(empty.lsb(), None);
        assert_eq!(empty.msb(), None);
    }

    #[test]
    fn test_erase_all_clears_window_blocks() {
        let mut bs = SentinelSet::with_bits(640, &[70, 130, 300]);
        bs.erase_all();
        assert!(bs.is_empty());
        bs.update_sentinels();
        assert_eq!(bs.sentinel_low(), None);
    }

    #[test]
    fn test_and_with() {
        let mut bs = SentinelSet::with_bits(640, &[70, 130, 300]);
        let keep = BitSet::with_bits(640, &[70, 300, 500]);
        bs.and_with(&keep);
        assert_eq!(bs.to_vector(), vec![70, 300]);
    }

    #[test]
    fn test_and_assign_operator() {
        let mut bs = SentinelSet::with_bits(640, &[70, 130, 300]);
        let keep = BitSet::with_bits(640, &[130, 500]);
        bs &= &keep;
        assert_eq!(bs.to_vector(), vec![130]);
    }

    #[test]
    fn test_erase_bits_window_bounded() {
        let mut bs = SentinelSet::with_bits(640, &[70, 130, 300]);
        let drop = BitSet::with_bits(640, &[130, 500]);
        bs.erase_bits(&drop);
        assert_eq!(bs.to_vector(), vec![70, 300]);
    }

    #[test]
    fn test_and_windowed() {
        let lhs = BitSet::with_bits(640, &[70, 300, 500]);
        let rhs = SentinelSet::with_bits(640, &[70, 130, 300]);
        let mut out = SentinelSet::new(640);
        and_windowed(&lhs, &rhs, &mut out);
        assert_eq!(out.to_vector(), vec![70, 300]);
        assert_eq!(out.sentinel_low(), rhs.sentinel_low());
        assert_eq!(out.sentinel_high(), rhs.sentinel_high());
    }

    #[test]
    fn test_is_empty_in() {
        let bs = SentinelSet::with_bits(640, &[128, 192]);
        assert!(bs.is_empty_in(0, 1));
        assert!(!bs.is_empty_in(2, 2));
        assert!(!bs.is_empty_in(0, 9));
        assert!(bs.is_empty_in(4, 9));
    }

    #[test]
    fn test_destructive_forward_updates_low() {
        let mut bs = SentinelSet::with_bits(640, &[70, 130, 300]);
        bs.init_scan(ScanMode::Destructive).unwrap();
        assert_eq!(bs.next_bit_del(), Some(70));
        assert_eq!(bs.sentinel_low(), Some(1));
        assert_eq!(bs.next_bit_del(), Some(130));
        assert_eq!(bs.sentinel_low(), Some(2));
        assert_eq!(bs.next_bit_del(), Some(300));
        assert_eq!(bs.sentinel_low(), Some(4));
        assert_eq!(bs.next_bit_del(), None);
        assert!(bs.is_empty());
    }

    #[test]
    fn test_destructive_reverse_updates_high() {
        let mut bs = SentinelSet::with_bits(640, &[70, 130, 300]);
        bs.init_scan(ScanMode::DestructiveReverse).unwrap();
        assert_eq!(bs.prev_bit_del(), Some(300));
        assert_eq!(bs.sentinel_high(), Some(4));
        assert_eq!(bs.prev_bit_del(), Some(130));
        assert_eq!(bs.sentinel_high(), Some(2));
        assert_eq!(bs.prev_bit_del(), Some(70));
        assert_eq!(bs.sentinel_high(), Some(1));
        assert_eq!(bs.prev_bit_del(), None);
        assert!(bs.is_empty());
    }

    #[test]
    fn test_non_destructive_scans() {
        let mut bs = SentinelSet::with_bits(640, &[70, 130, 300]);
        bs.init_scan(ScanMode::NonDestructive).unwrap();
        let seen: Vec<usize> = std::iter::from_fn(|| bs.next_bit()).collect();
        assert_eq!(seen, vec![70, 130, 300]);

        bs.init_scan(ScanMode::NonDestructiveReverse).unwrap();
        let seen: Vec<usize> = std::iter::from_fn(|| bs.prev_bit()).collect();
        assert_eq!(seen, vec![300, 130, 70]);
        assert_eq!(bs.size(), 3);
    }

    #[test]
    fn test_scan_from_position() {
        let mut bs = SentinelSet::with_bits(640, &[70, 130, 300]);
        bs.init_scan_from(Some(70), ScanMode::NonDestructive).unwrap();
        let seen: Vec<usize> = std::iter::from_fn(|| bs.next_bit()).collect();
        assert_eq!(seen, vec![130, 300]);
    }

    #[test]
    fn test_scan_empty_window() {
        let mut bs = SentinelSet::new(640);
        bs.init_scan(ScanMode::Destructive).unwrap();
        assert_eq!(bs.next_bit_del(), None);
        bs.init_scan(ScanMode::NonDestructive).unwrap();
        assert_eq!(bs.next_bit(), None);
    }

    #[test]
    fn test_display() {
        let bs = SentinelSet::with_bits(640, &[128, 192]);
        assert_eq!(bs.to_string(), "[128 192 (2)](2,3)");
        let empty = SentinelSet::with_bits(640, &[]);
        assert_eq!(empty.to_string(), "[(0)](-,-)");
    }

    #[test]
    fn test_take_leaves_valid_empty() {
        let mut a = SentinelSet::with_bits(640, &[128]);
        let b = std::mem::take(&mut a);
        assert_eq!(b.to_vector(), vec![128]);
        assert_eq!(a.num_blocks(), 0);
        assert!(a.is_empty());
        assert_eq!(a.sentinel_low(), None);
    }
}
