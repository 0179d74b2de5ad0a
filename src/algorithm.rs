//! Stateless helpers over bitsets and a cached-count wrapper.

use core::fmt;

use rand::Rng;

use crate::dense::BitSet;

/// Set bits of any bitset as an ascending vector.
///
/// # Example
/// ```
/// use scanbits::{algorithm, SparseBitSet};
///
/// let bs = SparseBitSet::with_bits(1000, &[5, 42, 900]);
/// assert_eq!(algorithm::to_vector(&bs), vec![5, 42, 900]);
/// ```
pub fn to_vector<'a, B>(bb: &'a B) -> Vec<usize>
where
    &'a B: IntoIterator<Item = usize>,
{
    bb.into_iter().collect()
}

/// Random 64-bit block where each bit is set independently with
/// probability `p`.
///
/// # Arguments
/// * `p` - Bit density in `[0.0, 1.0]`
pub fn gen_random_block(p: f64) -> u64 {
    gen_random_block_with(&mut rand::thread_rng(), p)
}

/// As [`gen_random_block`], drawing from the given generator. Pass a
/// seeded generator for reproducible blocks.
///
/// # Example
/// ```
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
/// use scanbits::algorithm::gen_random_block_with;
///
/// let mut rng = ChaCha8Rng::seed_from_u64(7);
/// let a = gen_random_block_with(&mut rng, 0.5);
/// let mut rng = ChaCha8Rng::seed_from_u64(7);
/// let b = gen_random_block_with(&mut rng, 0.5);
/// assert_eq!(a, b);
/// ```
pub fn gen_random_block_with<R: Rng + ?Sized>(rng: &mut R, p: f64) -> u64 {
    debug_assert!((0.0..=1.0).contains(&p), "density {p} outside [0, 1]");
    let mut bb = 0u64;
    for i in 0..64 {
        if rng.gen_bool(p) {
            bb |= 1u64 << i;
        }
    }
    bb
}

/// The lowest `k` set bits of a bitset, fewer when the population runs
/// out.
pub fn first_k_bits<'a, B>(k: usize, bb: &'a B) -> Vec<usize>
where
    &'a B: IntoIterator<Item = usize>,
{
    bb.into_iter().take(k).collect()
}

/// Dense bitset wrapper carrying an explicit population count.
///
/// `size` and `is_empty` become O(1), which matters in branch-and-bound
/// loops that bound on cardinality at every node. All mutation goes
/// through the wrapper so the counter stays synchronized; `sync_count`
/// recovers after direct manipulation of the inner bitset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountedBitSet {
    bb: BitSet,
    count: usize,
}

impl CountedBitSet {
    /// Creates a counted bitset for `pop_size` bits.
    pub fn new(pop_size: usize) -> Self {
        CountedBitSet {
            bb: BitSet::new(pop_size),
            count: 0,
        }
    }

    /// Creates a counted bitset with the given bits set.
    pub fn with_bits(pop_size: usize, bits: &[usize]) -> Self {
        let bb = BitSet::with_bits(pop_size, bits);
        let count = bb.size();
        CountedBitSet { bb, count }
    }

    /// Reallocates and clears the counter.
    pub fn reset(&mut self, pop_size: usize) {
        self.bb.reset(pop_size);
        self.count = 0;
    }

    /// Cached population count.
    ///
    /// # Performance
    /// O(1)
    #[inline]
    pub fn size(&self) -> usize {
        self.count
    }

    /// True if no bit is set, from the cached count.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Sets bit `bit`, adjusting the counter.
    pub fn set_bit(&mut self, bit: usize) {
        if !self.bb.is_bit(bit) {
            self.bb.set_bit(bit);
            self.count += 1;
        }
    }

    /// Clears bit `bit`, adjusting the counter.
    pub fn erase_bit(&mut self, bit: usize) {
        if self.bb.is_bit(bit) {
            self.bb.erase_bit(bit);
            self.count -= 1;
        }
    }

    /// Clears every bit.
    pub fn erase_all(&mut self) {
        self.bb.erase_all();
        self.count = 0;
    }

    /// Lowest set bit.
    pub fn lsb(&self) -> Option<usize> {
        if self.count > 0 {
            self.bb.lsb()
        } else {
            None
        }
    }

    /// Highest set bit.
    pub fn msb(&self) -> Option<usize> {
        if self.count > 0 {
            self.bb.msb()
        } else {
            None
        }
    }

    /// Removes and returns the lowest set bit.
    pub fn pop_lsb(&mut self) -> Option<usize> {
        let bit = self.lsb()?;
        self.bb.erase_bit(bit);
        self.count -= 1;
        Some(bit)
    }

    /// Removes and returns the highest set bit.
    pub fn pop_msb(&mut self) -> Option<usize> {
        let bit = self.msb()?;
        self.bb.erase_bit(bit);
        self.count -= 1;
        Some(bit)
    }

    /// Recomputes the counter from the bitset.
    pub fn sync_count(&mut self) -> usize {
        self.count = self.bb.size();
        self.count
    }

    /// True if the cached count matches the actual population.
    pub fn is_synced(&self) -> bool {
        self.count == self.bb.size()
    }

    /// Read-only view of the wrapped bitset.
    #[inline]
    pub fn as_bitset(&self) -> &BitSet {
        &self.bb
    }

    /// Mutable access to the wrapped bitset. Call `sync_count` afterwards
    /// if the population changes.
    #[inline]
    pub fn as_bitset_mut(&mut self) -> &mut BitSet {
        &mut self.bb
    }

    /// Unwraps into the inner bitset.
    pub fn into_bitset(self) -> BitSet {
        self.bb
    }
}

impl fmt::Display for CountedBitSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.bb, self.count)
    }
}
