//! Cached-cursor bit scanning: modes, cursor state and iterator wrappers.
//!
//! Every scannable bitset carries a [`ScanCursor`] and implements
//! [`BitScan`]. A scan is configured once with `init_scan` and then stepped
//! with `next_bit`/`prev_bit` (non-destructive) or
//! `next_bit_del`/`prev_bit_del` (destructive, each returned bit is cleared
//! from the source before it is returned). The cursor is the only state
//! reused between steps, so steps cost O(1) plus the distance to the next
//! set bit.
//!
//! The wrapper types [`Scan`], [`ScanRev`], [`ScanDest`] and
//! [`ScanDestRev`] bundle initialization and stepping behind `Iterator`, so
//! callers can enumerate bits without knowing the underlying storage.

use crate::error::ScanError;
use crate::masks::MASK_LIM;

/// No block cached yet.
pub(crate) const NO_BLOCK: isize = -1;

/// The four scanning modes.
///
/// Non-destructive modes preserve the bitset and cache the last returned
/// bit offset; destructive modes clear each returned bit and only cache the
/// current block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMode {
    /// Forward scan preserving bits.
    NonDestructive,
    /// Reverse scan preserving bits.
    NonDestructiveReverse,
    /// Forward scan clearing each returned bit.
    Destructive,
    /// Reverse scan clearing each returned bit.
    DestructiveReverse,
}

/// Scan position cache: block index plus bit offset within the block.
///
/// The uninitialized state is `(NO_BLOCK, MASK_LIM)`. `MASK_LIM` indexes
/// the all-ones row of the high-mask table, so a freshly seeded forward
/// cursor masks nothing away from its first block; offset 64 plays the
/// same role for reverse scans through the low-mask table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ScanCursor {
    /// Cached block index. For sparse bitsets this is the position in the
    /// record vector, not the block index in the bit string.
    pub block: isize,
    /// Cached bit offset within the block, only meaningful for
    /// non-destructive scans.
    pub pos: usize,
}

impl Default for ScanCursor {
    fn default() -> Self {
        ScanCursor {
            block: NO_BLOCK,
            pos: MASK_LIM,
        }
    }
}

impl ScanCursor {
    /// Seed for a forward scan starting at `block`.
    #[inline]
    pub fn forward(block: usize) -> Self {
        ScanCursor {
            block: block as isize,
            pos: MASK_LIM,
        }
    }

    /// Seed for a reverse scan starting at `block`. Offset 64 makes the
    /// whole block visible to the first low-mask probe.
    #[inline]
    pub fn reverse(block: usize) -> Self {
        ScanCursor {
            block: block as isize,
            pos: 64,
        }
    }

    /// Seed at an exact block and offset; the next step resumes strictly
    /// past that position in scan direction.
    #[inline]
    pub fn at(block: usize, pos: usize) -> Self {
        ScanCursor {
            block: block as isize,
            pos,
        }
    }
}

/// Uniform scanning contract over dense, sparse and sentinel storage.
pub trait BitScan {
    /// Configures the cursor for a full scan in the given mode.
    ///
    /// Sparse bitsets with no block records fail with
    /// [`ScanError::EmptyScan`].
    fn init_scan(&mut self, mode: ScanMode) -> Result<(), ScanError>;

    /// Configures the cursor to resume strictly past `first_bit` in scan
    /// direction. `None` behaves like [`BitScan::init_scan`].
    ///
    /// Only the non-destructive modes accept a starting bit; destructive
    /// modes fail with [`ScanError::DestructiveStart`].
    fn init_scan_from(
        &mut self,
        first_bit: Option<usize>,
        mode: ScanMode,
    ) -> Result<(), ScanError>;

    /// Next set bit in ascending order, or `None` when exhausted.
    /// Requires `init_scan(NonDestructive)`.
    fn next_bit(&mut self) -> Option<usize>;

    /// Next set bit in descending order, or `None` when exhausted.
    /// Requires `init_scan(NonDestructiveReverse)`.
    fn prev_bit(&mut self) -> Option<usize>;

    /// Next set bit in ascending order, cleared from the bitset before it
    /// is returned. Requires `init_scan(Destructive)`.
    fn next_bit_del(&mut self) -> Option<usize>;

    /// Next set bit in descending order, cleared from the bitset before it
    /// is returned. Requires `init_scan(DestructiveReverse)`.
    fn prev_bit_del(&mut self) -> Option<usize>;

    /// As [`BitScan::next_bit`], additionally clearing the returned bit
    /// from `other`.
    fn next_bit_erasing(&mut self, other: &mut Self) -> Option<usize>;

    /// As [`BitScan::prev_bit`], additionally clearing the returned bit
    /// from `other`.
    fn prev_bit_erasing(&mut self, other: &mut Self) -> Option<usize>;

    /// As [`BitScan::next_bit_del`], additionally clearing the returned
    /// bit from `other`.
    fn next_bit_del_erasing(&mut self, other: &mut Self) -> Option<usize>;

    /// As [`BitScan::prev_bit_del`], additionally clearing the returned
    /// bit from `other`.
    fn prev_bit_del_erasing(&mut self, other: &mut Self) -> Option<usize>;
}

/// Forward non-destructive scan wrapper.
///
/// # Example
/// ```
/// use scanbits::{BitSet, Scan};
///
/// let mut bs = BitSet::new(192);
/// bs.set_bit(3);
/// bs.set_bit(130);
/// let bits: Vec<usize> = Scan::new(&mut bs).unwrap().collect();
/// assert_eq!(bits, vec![3, 130]);
/// ```
pub struct Scan<'a, B: BitScan> {
    bb: &'a mut B,
}

impl<'a, B: BitScan> Scan<'a, B> {
    /// Starts a forward scan over the whole bitset.
    pub fn new(bb: &'a mut B) -> Result<Self, ScanError> {
        bb.init_scan(ScanMode::NonDestructive)?;
        Ok(Scan { bb })
    }

    /// Starts a forward scan that yields only bits strictly above
    /// `first_bit`.
    pub fn resume_after(bb: &'a mut B, first_bit: usize) -> Result<Self, ScanError> {
        bb.init_scan_from(Some(first_bit), ScanMode::NonDestructive)?;
        Ok(Scan { bb })
    }

    /// Steps the scan.
    #[inline]
    pub fn next_bit(&mut self) -> Option<usize> {
        self.bb.next_bit()
    }

    /// Steps the scan, clearing the returned bit from `other`.
    #[inline]
    pub fn next_bit_erasing(&mut self, other: &mut B) -> Option<usize> {
        self.bb.next_bit_erasing(other)
    }
}

impl<B: BitScan> Iterator for Scan<'_, B> {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        self.bb.next_bit()
    }
}

/// Reverse non-destructive scan wrapper.
pub struct ScanRev<'a, B: BitScan> {
    bb: &'a mut B,
}

impl<'a, B: BitScan> ScanRev<'a, B> {
    /// Starts a reverse scan over the whole bitset.
    pub fn new(bb: &'a mut B) -> Result<Self, ScanError> {
        bb.init_scan(ScanMode::NonDestructiveReverse)?;
        Ok(ScanRev { bb })
    }

    /// Starts a reverse scan that yields only bits strictly below
    /// `first_bit`.
    pub fn resume_before(bb: &'a mut B, first_bit: usize) -> Result<Self, ScanError> {
        bb.init_scan_from(Some(first_bit), ScanMode::NonDestructiveReverse)?;
        Ok(ScanRev { bb })
    }

    #[inline]
    pub fn next_bit(&mut self) -> Option<usize> {
        self.bb.prev_bit()
    }

    #[inline]
    pub fn next_bit_erasing(&mut self, other: &mut B) -> Option<usize> {
        self.bb.prev_bit_erasing(other)
    }
}

impl<B: BitScan> Iterator for ScanRev<'_, B> {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        self.bb.prev_bit()
    }
}

/// Forward destructive scan wrapper; drains the bitset low to high.
pub struct ScanDest<'a, B: BitScan> {
    bb: &'a mut B,
}

impl<'a, B: BitScan> ScanDest<'a, B> {
    pub fn new(bb: &'a mut B) -> Result<Self, ScanError> {
        bb.init_scan(ScanMode::Destructive)?;
        Ok(ScanDest { bb })
    }

    #[inline]
    pub fn next_bit(&mut self) -> Option<usize> {
        self.bb.next_bit_del()
    }

    #[inline]
    pub fn next_bit_erasing(&mut self, other: &mut B) -> Option<usize> {
        self.bb.next_bit_del_erasing(other)
    }
}

impl<B: BitScan> Iterator for ScanDest<'_, B> {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        self.bb.next_bit_del()
    }
}

/// Reverse destructive scan wrapper; drains the bitset high to low.
pub struct ScanDestRev<'a, B: BitScan> {
    bb: &'a mut B,
}

impl<'a, B: BitScan> ScanDestRev<'a, B> {
    pub fn new(bb: &'a mut B) -> Result<Self, ScanError> {
        bb.init_scan(ScanMode::DestructiveReverse)?;
        Ok(ScanDestRev { bb })
    }

    #[inline]
    pub fn next_bit(&mut self) -> Option<usize> {
        self.bb.prev_bit_del()
    }

    #[inline]
    pub fn next_bit_erasing(&mut self, other: &mut B) -> Option<usize> {
        self.bb.prev_bit_del_erasing(other)
    }
}

impl<B: BitScan> Iterator for ScanDestRev<'_, B> {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        self.bb.prev_bit_del()
    }
}
