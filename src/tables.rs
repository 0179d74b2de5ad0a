//! Large lookup tables, initialized once on first access.
//!
//! The small mask and De Bruijn tables live in [`crate::masks`] and
//! [`crate::block`] as compile-time constants. The tables here are the
//! 8/16-bit popcount and 16-bit bit-scan tables (roughly 1 MB), which are
//! built lazily behind a process-wide [`LazyLock`] so no bitset operation
//! can observe them uninitialized.

use std::sync::LazyLock;

/// Sentinel for "no set bit" in the 16-bit scan tables.
const NO_BIT: i16 = -1;

/// Lookup-table bundle.
pub struct Tables {
    /// Population count per 8-bit value.
    pub pc8: [u8; 256],
    /// Population count per 16-bit value.
    pub pc16: Box<[u8]>,
    /// LSB per 16-bit value, per lane: `lsb16[k][w]` is the least
    /// significant bit of `w` plus `16 * k`, or -1 for `w == 0`.
    pub lsb16: Box<[[i16; 65536]; 4]>,
    /// MSB per 16-bit value, per lane, offset like `lsb16`.
    pub msb16: Box<[[i16; 65536]; 4]>,
}

impl Tables {
    fn build() -> Self {
        let mut pc8 = [0u8; 256];
        for (w, slot) in pc8.iter_mut().enumerate() {
            *slot = (w as u32).count_ones() as u8;
        }

        let mut pc16 = vec![0u8; 65536].into_boxed_slice();
        for (w, slot) in pc16.iter_mut().enumerate() {
            *slot = (w as u32).count_ones() as u8;
        }

        let mut lsb16: Box<[[i16; 65536]; 4]> = vec![[NO_BIT; 65536]; 4]
            .into_boxed_slice()
            .try_into()
            .unwrap_or_else(|_| unreachable!());
        let mut msb16: Box<[[i16; 65536]; 4]> = vec![[NO_BIT; 65536]; 4]
            .into_boxed_slice()
            .try_into()
            .unwrap_or_else(|_| unreachable!());
        for lane in 0..4 {
            let base = (16 * lane) as i16;
            for w in 1..65536usize {
                lsb16[lane][w] = (w.trailing_zeros() as i16) + base;
                msb16[lane][w] = (15 - (w as u16).leading_zeros() as i16) + base;
            }
        }

        Tables {
            pc8,
            pc16,
            lsb16,
            msb16,
        }
    }
}

static TABLES: LazyLock<Tables> = LazyLock::new(Tables::build);

/// Access the process-wide tables, initializing them on first use.
#[inline]
pub fn tables() -> &'static Tables {
    &TABLES
}
