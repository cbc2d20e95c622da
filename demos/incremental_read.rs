use ncrlite::Decompressor;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let set: Vec<u64> = (0..10_000u64).map(|i| i * 37).collect();

    let mut encoded = Vec::new();
    ncrlite::compress_sorted(&mut encoded, &set)?;

    // Stream the set back out in fixed-size chunks without ever holding
    // the whole thing in memory.
    let mut d = Decompressor::new(encoded.as_slice())?;
    let mut chunk = [0u64; 512];
    let mut total = 0u64;
    while d.remaining() > 0 {
        let n = chunk.len().min(d.remaining() as usize);
        d.read(&mut chunk[..n])?;
        total += n as u64;
    }

    println!(
        "decoded {total} values from {} bytes ({} read)",
        encoded.len(),
        d.bytes_read()
    );

    Ok(())
}
