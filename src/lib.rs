//! # scanbits
//!
//! Bitset engine for combinatorial optimization on graphs, built for the
//! tight inner loops of exact branch-and-bound solvers (maximum clique and
//! friends).
//!
//! ## Features
//! - Dense, sparse and sentinel-bounded bitsets over 64-bit blocks
//! - Four scan modes (forward/reverse x destructive/non-destructive) with
//!   a cached cursor for O(1) continuation between steps
//! - Hardware popcount/bit-scan with De Bruijn and lookup-table fallbacks
//! - Block-wise set algebra, range fills and block-range variants
//!
//! ## Example
//! ```
//! use scanbits::{BitSet, ScanDest};
//!
//! let mut candidates = BitSet::with_bits(320, &[0, 50, 100, 150]);
//! // Drain the candidate set low to high.
//! let order: Vec<usize> = ScanDest::new(&mut candidates).unwrap().collect();
//! assert_eq!(order, vec![0, 50, 100, 150]);
//! assert!(candidates.is_empty());
//! ```

pub mod algorithm;
pub mod block;
pub mod masks;
pub mod tables;

mod dense;
mod error;
mod scan;
mod sparse;

pub use algorithm::CountedBitSet;
pub use dense::{and, and_windowed, erase, or, xor, BitSet, Bits, SentinelSet};
pub use error::ScanError;
pub use scan::{BitScan, Scan, ScanDest, ScanDestRev, ScanMode, ScanRev};
pub use sparse::{SparseBitSet, SparseBits, SparseBlock};
