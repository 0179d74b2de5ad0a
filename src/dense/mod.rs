//! Dense fixed-capacity bitsets.

mod bitset;
mod scan;
mod sentinel;

pub use bitset::{and, erase, or, xor, BitSet, Bits};
pub use sentinel::{and_windowed, SentinelSet};
