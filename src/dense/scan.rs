//! Cached-cursor scanning over the dense bitset.

use crate::block::{self, bit_offset, block_index, block_to_bit};
use crate::error::ScanError;
use crate::masks::{mask_bit, mask_high, mask_low};
use crate::scan::{BitScan, ScanCursor, ScanMode};

use super::BitSet;

impl BitScan for BitSet {
    fn init_scan(&mut self, mode: ScanMode) -> Result<(), ScanError> {
        let n = self.blocks.len();
        self.cursor = match mode {
            ScanMode::NonDestructive => ScanCursor::forward(0),
            ScanMode::Destructive => ScanCursor::forward(0),
            ScanMode::NonDestructiveReverse | ScanMode::DestructiveReverse => {
                if n == 0 {
                    ScanCursor::default()
                } else {
                    ScanCursor::reverse(n - 1)
                }
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
                self.cursor = ScanCursor::at(block_index(bit), bit_offset(bit));
                Ok(())
            }
            ScanMode::Destructive | ScanMode::DestructiveReverse => {
                Err(ScanError::DestructiveStart)
            }
        }
    }

    fn next_bit(&mut self) -> Option<usize> {
        if self.cursor.block < 0 {
            return None;
        }
        let cur = self.cursor.block as usize;
        // Remaining bits of the cached block first.
        if let Some(&b) = self.blocks.get(cur) {
            if let Some(off) = block::lsb(b & mask_high(self.cursor.pos)) {
                self.cursor.pos = off;
                return Some(block_to_bit(cur) + off);
            }
        }
        for i in cur + 1..self.blocks.len() {
            if let Some(off) = block::lsb(self.blocks[i]) {
                self.cursor.block = i as isize;
                self.cursor.pos = off;
                return Some(block_to_bit(i) + off);
            }
        }
        None
    }

    fn prev_bit(&mut self) -> Option<usize> {
        if self.cursor.block < 0 {
            return None;
        }
        let cur = self.cursor.block as usize;
        if let Some(&b) = self.blocks.get(cur) {
            if let Some(off) = block::msb(b & mask_low(self.cursor.pos)) {
                self.cursor.pos = off;
                return Some(block_to_bit(cur) + off);
            }
        }
        for i in (0..cur).rev() {
            if let Some(off) = block::msb(self.blocks[i]) {
                self.cursor.block = i as isize;
                self.cursor.pos = off;
                return Some(block_to_bit(i) + off);
            }
        }
        None
    }

    fn next_bit_del(&mut self) -> Option<usize> {
        if self.cursor.block < 0 {
            return None;
        }
        for i in self.cursor.block as usize..self.blocks.len() {
            if let Some(off) = block::lsb(self.blocks[i]) {
                self.cursor.block = i as isize;
                self.blocks[i] &= !mask_bit(off);
                return Some(block_to_bit(i) + off);
            }
        }
        None
    }

    fn prev_bit_del(&mut self) -> Option<usize> {
        if self.cursor.block < 0 || self.blocks.is_empty() {
            return None;
        }
        for i in (0..=self.cursor.block as usize).rev() {
            if let Some(off) = block::msb(self.blocks[i]) {
                self.cursor.block = i as isize;
                self.blocks[i] &= !mask_bit(off);
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

    fn sample() -> BitSet {
        // Block-capacity 5, bits spread over all five blocks.
        BitSet::with_bits(320, &[0, 50, 100, 150, 200, 250, 300])
    }

    #[test]
    fn test_non_destructive_forward() {
        let mut bs = sample();
        bs.init_scan(ScanMode::NonDestructive).unwrap();
        let mut seen = Vec::new();
        while let Some(bit) = bs.next_bit() {
            seen.push(bit);
        }
        assert_eq!(seen, vec![0, 50, 100, 150, 200, 250, 300]);
        assert_eq!(bs.next_bit(), None);
        assert_eq!(bs.size(), 7);
        assert_eq!(bs.lsb(), Some(0));
        assert_eq!(bs.msb(), Some(300));
    }

    #[test]
    fn test_non_destructive_reverse() {
        let mut bs = sample();
        bs.init_scan(ScanMode::NonDestructiveReverse).unwrap();
        let mut seen = Vec::new();
        while let Some(bit) = bs.prev_bit() {
            seen.push(bit);
        }
        assert_eq!(seen, vec![300, 250, 200, 150, 100, 50, 0]);
        assert_eq!(bs.size(), 7);
    }

    #[test]
    fn test_destructive_forward() {
        let mut bs = sample();
        bs.init_scan(ScanMode::Destructive).unwrap();
        let mut seen = Vec::new();
        while let Some(bit) = bs.next_bit_del() {
            seen.push(bit);
        }
        assert_eq!(seen, vec![0, 50, 100, 150, 200, 250, 300]);
        assert_eq!(bs.size(), 0);
        assert!(bs.is_empty());
    }

    #[test]
    fn test_destructive_reverse() {
        let mut bs = sample();
        bs.init_scan(ScanMode::DestructiveReverse).unwrap();
        let mut seen = Vec::new();
        while let Some(bit) = bs.prev_bit_del() {
            seen.push(bit);
        }
        assert_eq!(seen, vec![300, 250, 200, 150, 100, 50, 0]);
        assert!(bs.is_empty());
    }

    #[test]
    fn test_scan_from_starting_bit() {
        let mut bs = sample();
        bs.init_scan_from(Some(50), ScanMode::NonDestructive).unwrap();
        let mut seen = Vec::new();
        while let Some(bit) = bs.next_bit() {
            seen.push(bit);
        }
        // Bit 50 itself is excluded; the scan resumes strictly after it.
        assert_eq!(seen, vec![100, 150, 200, 250, 300]);
    }

    #[test]
    fn test_scan_from_none_is_full_scan() {
        let mut bs = sample();
        bs.init_scan_from(None, ScanMode::NonDestructive).unwrap();
        assert_eq!(bs.next_bit(), Some(0));
    }

    #[test]
    fn test_scan_from_reverse() {
        let mut bs = sample();
        bs.init_scan_from(Some(150), ScanMode::NonDestructiveReverse)
            .unwrap();
        let mut seen = Vec::new();
        while let Some(bit) = bs.prev_bit() {
            seen.push(bit);
        }
        assert_eq!(seen, vec![100, 50, 0]);
    }

    #[test]
    fn test_scan_from_unset_bit() {
        // The starting bit does not have to be set.
        let mut bs = sample();
        bs.init_scan_from(Some(51), ScanMode::NonDestructive).unwrap();
        assert_eq!(bs.next_bit(), Some(100));
    }

    #[test]
    fn test_destructive_start_rejected() {
        let mut bs = sample();
        assert_eq!(
            bs.init_scan_from(Some(50), ScanMode::Destructive),
            Err(ScanError::DestructiveStart)
        );
        assert_eq!(
            bs.init_scan_from(Some(50), ScanMode::DestructiveReverse),
            Err(ScanError::DestructiveStart)
        );
    }

    #[test]
    fn test_scan_adjacent_bits_same_block() {
        let mut bs = BitSet::with_bits(64, &[3, 4, 5]);
        bs.init_scan(ScanMode::NonDestructive).unwrap();
        assert_eq!(bs.next_bit(), Some(3));
        assert_eq!(bs.next_bit(), Some(4));
        assert_eq!(bs.next_bit(), Some(5));
        assert_eq!(bs.next_bit(), None);
    }

    #[test]
    fn test_scan_block_boundary() {
        let mut bs = BitSet::with_bits(192, &[63, 64, 127, 128]);
        bs.init_scan(ScanMode::NonDestructive).unwrap();
        let seen: Vec<usize> = std::iter::from_fn(|| bs.next_bit()).collect();
        assert_eq!(seen, vec![63, 64, 127, 128]);

        bs.init_scan(ScanMode::NonDestructiveReverse).unwrap();
        let seen: Vec<usize> = std::iter::from_fn(|| bs.prev_bit()).collect();
        assert_eq!(seen, vec![128, 127, 64, 63]);
    }

    #[test]
    fn test_scan_empty_bitset() {
        let mut bs = BitSet::new(128);
        for mode in [
            ScanMode::NonDestructive,
            ScanMode::NonDestructiveReverse,
            ScanMode::Destructive,
            ScanMode::DestructiveReverse,
        ] {
            bs.init_scan(mode).unwrap();
        }
        assert_eq!(bs.next_bit(), None);

        let mut bs = BitSet::new(0);
        bs.init_scan(ScanMode::NonDestructiveReverse).unwrap();
        assert_eq!(bs.prev_bit(), None);
        bs.init_scan(ScanMode::DestructiveReverse).unwrap();
        assert_eq!(bs.prev_bit_del(), None);
    }

    #[test]
    fn test_interleaved_scans_on_two_bitsets() {
        // Cursor state is per bitset; interleaving must not interfere.
        let mut a = BitSet::with_bits(128, &[1, 2, 3]);
        let mut b = BitSet::with_bits(128, &[10, 20, 30]);
        a.init_scan(ScanMode::NonDestructive).unwrap();
        b.init_scan(ScanMode::NonDestructive).unwrap();
        assert_eq!(a.next_bit(), Some(1));
        assert_eq!(b.next_bit(), Some(10));
        assert_eq!(a.next_bit(), Some(2));
        assert_eq!(b.next_bit(), Some(20));
        assert_eq!(a.next_bit(), Some(3));
        assert_eq!(b.next_bit(), Some(30));
        assert_eq!(a.next_bit(), None);
        assert_eq!(b.next_bit(), None);
    }

    #[test]
    fn test_dual_bitset_destructive() {
        let mut a = sample();
        let mut companion = sample();
        a.init_scan(ScanMode::Destructive).unwrap();
        while a.next_bit_del_erasing(&mut companion).is_some() {}
        assert!(a.is_empty());
        assert!(companion.is_empty());
    }

    #[test]
    fn test_scan_restart() {
        // A finished cursor can be re-seeded for another pass.
        let mut bs = sample();
        bs.init_scan(ScanMode::NonDestructive).unwrap();
        while bs.next_bit().is_some() {}
        bs.init_scan(ScanMode::NonDestructive).unwrap();
        assert_eq!(bs.next_bit(), Some(0));
    }
}
