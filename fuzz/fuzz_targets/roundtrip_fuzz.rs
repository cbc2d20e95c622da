#![no_main]
use libfuzzer_sys::fuzz_target;

// Any set derived from the input must survive a full roundtrip.
fuzz_target!(|data: &[u8]| {
    let mut set: Vec<u64> = data
        .chunks_exact(8)
        .map(|c| u64::from_le_bytes(c.try_into().unwrap()))
        .collect();
    set.sort_unstable();
    set.dedup();

    let mut encoded = Vec::new();
    ncrlite::compress_sorted(&mut encoded, &set).unwrap();
    let decoded = ncrlite::decompress(encoded.as_slice()).unwrap();
    assert_eq!(decoded, set);
});
