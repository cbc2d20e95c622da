#![no_main]
use libfuzzer_sys::fuzz_target;
use ncrlite::Decompressor;

// Arbitrary bytes must decode to an error or a set, never a panic.
fuzz_target!(|data: &[u8]| {
    let mut d = match Decompressor::new(data) {
        Ok(d) => d,
        Err(_) => return,
    };

    // Drain incrementally with a cap, so hostile size headers cannot
    // force huge allocations.
    let mut chunk = [0u64; 256];
    let mut budget = 1usize << 16;
    while d.remaining() > 0 && budget > 0 {
        let n = chunk.len().min(d.remaining() as usize).min(budget);
        if d.read(&mut chunk[..n]).is_err() {
            return;
        }
        budget -= n;
    }
});
