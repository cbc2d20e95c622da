use std::cmp::Reverse;
use std::collections::BinaryHeap;

use ncrlite::huffman::Codebook;
use ncrlite::{compress, compress_sorted, decompress, Decompressor};
use proptest::prelude::*;

// Deterministic Fisher-Yates, so shuffles shrink nicely.
fn shuffle(values: &mut [u64], mut seed: u64) {
    for i in (1..values.len()).rev() {
        seed = seed
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        let j = (seed >> 33) as usize % (i + 1);
        values.swap(i, j);
    }
}

// Optimal prefix-code cost by the sum-of-merges identity: the weighted
// depth sum equals the total weight of all internal nodes.
fn reference_cost(freqs: &[u64]) -> u64 {
    if freqs.len() <= 1 {
        return 0;
    }
    let mut heap: BinaryHeap<Reverse<u64>> = freqs.iter().copied().map(Reverse).collect();
    let mut total = 0u64;
    while heap.len() > 1 {
        let Reverse(a) = heap.pop().unwrap();
        let Reverse(b) = heap.pop().unwrap();
        total += a + b;
        heap.push(Reverse(a + b));
    }
    total
}

proptest! {
    #[test]
    fn prop_roundtrip(set in proptest::collection::btree_set(any::<u64>(), 0..512)) {
        let sorted: Vec<u64> = set.into_iter().collect();
        let mut buf = Vec::new();
        compress_sorted(&mut buf, &sorted).unwrap();
        prop_assert_eq!(decompress(buf.as_slice()).unwrap(), sorted);
    }

    #[test]
    fn prop_compress_sorts_first(
        set in proptest::collection::btree_set(any::<u64>(), 2..256),
        seed in any::<u64>(),
    ) {
        let sorted: Vec<u64> = set.into_iter().collect();
        let mut shuffled = sorted.clone();
        shuffle(&mut shuffled, seed);

        let mut a = Vec::new();
        compress(&mut a, &shuffled).unwrap();
        let mut b = Vec::new();
        compress_sorted(&mut b, &sorted).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn prop_incremental_partition_equivalence(
        set in proptest::collection::btree_set(any::<u64>(), 1..256),
        cuts in proptest::collection::vec(any::<prop::sample::Index>(), 0..6),
    ) {
        let sorted: Vec<u64> = set.into_iter().collect();
        let mut buf = Vec::new();
        compress_sorted(&mut buf, &sorted).unwrap();

        // Turn the indices into a partition of the output length.
        let mut bounds: Vec<usize> = cuts.iter().map(|ix| ix.index(sorted.len() + 1)).collect();
        bounds.push(0);
        bounds.push(sorted.len());
        bounds.sort_unstable();

        let mut d = Decompressor::new(buf.as_slice()).unwrap();
        let mut got = Vec::with_capacity(sorted.len());
        for pair in bounds.windows(2) {
            let mut chunk = vec![0u64; pair[1] - pair[0]];
            d.read(&mut chunk).unwrap();
            got.extend_from_slice(&chunk);
        }
        prop_assert_eq!(got, sorted);
        prop_assert_eq!(d.remaining(), 0);
    }

    #[test]
    fn prop_encoding_is_deterministic(
        set in proptest::collection::btree_set(any::<u64>(), 0..256),
    ) {
        let sorted: Vec<u64> = set.into_iter().collect();
        let mut a = Vec::new();
        compress_sorted(&mut a, &sorted).unwrap();
        let mut b = Vec::new();
        compress_sorted(&mut b, &sorted).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn prop_huffman_cost_is_optimal(
        freqs in proptest::collection::vec(0u64..100_000, 1..=64),
    ) {
        let book = Codebook::from_frequencies(&freqs);
        let cost: u64 = freqs
            .iter()
            .enumerate()
            .map(|(s, &f)| f * u64::from(book.entry(s as u8).len))
            .sum();
        prop_assert_eq!(cost, reference_cost(&freqs));
    }

    #[test]
    fn prop_codeword_lengths_bounded(
        freqs in proptest::collection::vec(any::<u64>(), 1..=64),
    ) {
        // Any weights, including adversarially skewed ones, must stay
        // within the 6-bit length field.
        let scaled: Vec<u64> = freqs.iter().map(|&f| f >> 8).collect();
        let book = Codebook::from_frequencies(&scaled);

        let max = (0..book.len()).map(|s| book.entry(s as u8).len).max().unwrap();
        prop_assert!(max <= 63);

        // Kraft equality: canonical Huffman codes describe a full tree.
        if book.len() > 1 {
            let total: u128 = (0..book.len())
                .map(|s| 1u128 << (max - book.entry(s as u8).len))
                .sum();
            prop_assert_eq!(total, 1u128 << max);
        }
    }
}
