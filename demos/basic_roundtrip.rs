fn main() -> Result<(), Box<dyn std::error::Error>> {
    let ids = vec![5u64, 15, 35, 150, 500, 1500];

    let mut encoded = Vec::new();
    ncrlite::compress(&mut encoded, &ids)?;

    let restored = ncrlite::decompress(encoded.as_slice())?;
    assert_eq!(restored, ids);

    println!(
        "{} values ({} raw bytes) -> {} compressed bytes",
        ids.len(),
        ids.len() * 8,
        encoded.len()
    );

    Ok(())
}
