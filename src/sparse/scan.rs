//! Cached-cursor scanning over the sparse bitset.
//!
//! The cursor's block field holds the position in the record vector, not
//! the block index in the bit string; the step functions translate through
//! each record's `idx` when composing the returned bit.

use crate::block::{self, bit_offset, block_index, block_to_bit};
use crate::error::ScanError;
use crate::masks::{mask_bit, mask_high, mask_low};
use crate::scan::{BitScan, ScanCursor, ScanMode};

use super::SparseBitSet;

impl BitScan for SparseBitSet {
    /// Seeds a full scan. A sparse bitset without records cannot place the
    /// cursor and fails with [`ScanError::EmptyScan`]; callers may treat
    /// that as end-of-iteration.
    fn init_scan(&mut self, mode: ScanMode) -> Result<(), ScanError> {
        if self.records.is_empty() {
            return Err(ScanError::EmptyScan);
        }
        self.cursor = match mode {
            ScanMode::NonDestructive | ScanMode::Destructive => ScanCursor::forward(0),
            ScanMode::NonDestructiveReverse | ScanMode::DestructiveReverse => {
                ScanCursor::reverse(self.records.len() - 1)
            }
        };
        Ok(())
    }

    fn init_scan_from(
        &mut self,
        first_bit: Option<usize>,
        mode: ScanMode,
    ) -> Result<(), ScanError> {
        if self.records.is_empty() {
            return Err(ScanError::EmptyScan);
        }
        let Some(bit) = first_bit else {
            return self.init_scan(mode);
        };
        match mode {
            ScanMode::Destructive | ScanMode::DestructiveReverse => {
                return Err(ScanError::DestructiveStart);
            }
            ScanMode::NonDestructive => {
                debug_assert!(bit < self.bit_capacity(), "bit {bit} out of range");
                self.cursor = match self.find_block_pos(block_index(bit)) {
                    // Exact record: resume within it, past the bit.
                    Ok(pos) => ScanCursor::at(pos, bit_offset(bit)),
                    // First record above the bit's block: all of its bits
                    // lie past the starting bit. Position len() means the
                    // scan is already exhausted.
                    Err(pos) => ScanCursor::forward(pos),
                };
            }
            ScanMode::NonDestructiveReverse => {
                debug_assert!(bit < self.bit_capacity(), "bit {bit} out of range");
                self.cursor = match self.find_block_pos(block_index(bit)) {
                    Ok(pos) => ScanCursor::at(pos, bit_offset(bit)),
                    Err(0) => ScanCursor::default(),
                    Err(pos) => ScanCursor::reverse(pos - 1),
                };
            }
        }
        Ok(())
    }

    fn next_bit(&mut self) -> Option<usize> {
        if self.cursor.block < 0 {
            return None;
        }
        let cur = self.cursor.block as usize;
        if let Some(rec) = self.records.get(cur) {
            if let Some(off) = block::lsb(rec.bits & mask_high(self.cursor.pos)) {
                self.cursor.pos = off;
                return Some(block_to_bit(rec.idx) + off);
            }
        }
        for i in cur + 1..self.records.len() {
            if let Some(off) = block::lsb(self.records[i].bits) {
                self.cursor.block = i as isize;
                self.cursor.pos = off;
                return Some(block_to_bit(self.records[i].idx) + off);
            }
        }
        None
    }

    fn prev_bit(&mut self) -> Option<usize> {
        if self.cursor.block < 0 {
            return None;
        }
        let cur = self.cursor.block as usize;
        if let Some(rec) = self.records.get(cur) {
            if let Some(off) = block::msb(rec.bits & mask_low(self.cursor.pos)) {
                self.cursor.pos = off;
                return Some(block_to_bit(rec.idx) + off);
            }
        }
        for i in (0..cur.min(self.records.len())).rev() {
            if let Some(off) = block::msb(self.records[i].bits) {
                self.cursor.block = i as isize;
                self.cursor.pos = off;
                return Some(block_to_bit(self.records[i].idx) + off);
            }
        }
        None
    }

    fn next_bit_del(&mut self) -> Option<usize> {
        if self.cursor.block < 0 {
            return None;
        }
        for i in self.cursor.block as usize..self.records.len() {
            if let Some(off) = block::lsb(self.records[i].bits) {
                self.cursor.block = i as isize;
                self.records[i].bits &= !mask_bit(off);
                return Some(block_to_bit(self.records[i].idx) + off);
            }
        }
        None
    }

    fn prev_bit_del(&mut self) -> Option<usize> {
        if self.cursor.block < 0 || self.records.is_empty() {
            return None;
        }
        let cur = (self.cursor.block as usize).min(self.records.len() - 1);
        for i in (0..=cur).rev() {
            if let Some(off) = block::msb(self.records[i].bits) {
                self.cursor.block = i as isize;
                self.records[i].bits &= !mask_bit(off);
                return Some(block_to_bit(self.records[i].idx) + off);
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
