//! Compressed bitsets storing only non-zero blocks.

mod bitset;
mod scan;

pub use bitset::{SparseBitSet, SparseBits, SparseBlock};
