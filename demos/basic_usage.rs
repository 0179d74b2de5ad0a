//! Basic usage example for scanbits.
//!
//! Walks through the three bitset flavors and the four scan modes.

use scanbits::{
    algorithm, and, BitScan, BitSet, Scan, ScanDestRev, ScanMode, SentinelSet, SparseBitSet,
};

fn main() {
    println!("=== scanbits - Basic Usage Example ===\n");

    // Dense bitset: fixed capacity, contiguous blocks.
    let mut dense = BitSet::with_bits(320, &[0, 50, 100, 150, 200, 250, 300]);
    println!("Dense bitset: {dense}");
    println!("  size: {}", dense.size());
    println!("  lsb:  {:?}", dense.lsb());
    println!("  msb:  {:?}", dense.msb());

    // Non-destructive forward scan.
    print!("  forward scan: ");
    for bit in Scan::new(&mut dense).unwrap() {
        print!("{bit} ");
    }
    println!();

    // Scan resuming past a given bit.
    print!("  resuming after 100: ");
    for bit in Scan::resume_after(&mut dense, 100).unwrap() {
        print!("{bit} ");
    }
    println!();

    // Destructive reverse scan drains the bitset high to low.
    let mut doomed = dense.clone();
    print!("  destructive reverse: ");
    for bit in ScanDestRev::new(&mut doomed).unwrap() {
        print!("{bit} ");
    }
    println!("\n  drained: is_empty = {}\n", doomed.is_empty());

    // Set algebra.
    let a = BitSet::with_bits(128, &[1, 5, 9, 64]);
    let b = BitSet::with_bits(128, &[5, 64, 100]);
    let mut inter = BitSet::new(128);
    and(&a, &b, &mut inter);
    println!("Set algebra:");
    println!("  a     = {a}");
    println!("  b     = {b}");
    println!("  a & b = {inter}\n");

    // Sparse bitset: only touched blocks get storage.
    let mut sparse = SparseBitSet::new(1_000_000);
    sparse.set_bit(5);
    sparse.set_bit(500_000);
    sparse.set_bit(999_999);
    println!("Sparse bitset over 1M bits:");
    println!("  bits:    {:?}", sparse.to_vector());
    println!("  records: {} (blocks touched)", sparse.num_records());

    let other = SparseBitSet::with_bits(1_000_000, &[5, 65, 999_999]);
    sparse |= &other;
    println!("  after |=: {:?}\n", sparse.to_vector());

    // Sentinel bitset: tracks the active block window.
    let mut sentinel = SentinelSet::with_bits(640, &[128, 192]);
    println!("Sentinel bitset:");
    println!(
        "  window: [{:?}, {:?}]",
        sentinel.sentinel_low(),
        sentinel.sentinel_high()
    );
    sentinel.erase_bit_and_update(128);
    println!("  after erasing 128: low = {:?}", sentinel.sentinel_low());
    sentinel.erase_bit_and_update(192);
    println!(
        "  after erasing 192: window = [{:?}, {:?}], empty = {}\n",
        sentinel.sentinel_low(),
        sentinel.sentinel_high(),
        sentinel.is_empty()
    );

    // Dual-bitset scanning: enumerate one set while pruning another.
    let mut pivot = BitSet::with_bits(128, &[3, 40, 90]);
    let mut candidates = BitSet::with_bits(128, &[3, 40, 90, 100]);
    pivot.init_scan(ScanMode::NonDestructive).unwrap();
    while pivot.next_bit_erasing(&mut candidates).is_some() {}
    println!("Dual-bitset scan:");
    println!("  candidates left: {:?}\n", candidates.to_vector());

    // Stateless helpers.
    let block = algorithm::gen_random_block(0.3);
    println!("Random block at 30% density: {} bits set", block.count_ones());
    println!(
        "First 2 bits of the pivot set: {:?}",
        algorithm::first_k_bits(2, &pivot)
    );

    println!("\n=== Example Complete ===");
}
