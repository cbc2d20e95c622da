// Set compression: sort, delta-transform, Huffman-code the delta
// bitlengths, pack residual bits, frame with the endmarker.

use std::io::Write;

use crate::bitio::BitWriter;
use crate::error::Error;
use crate::huffman::Codebook;

/// Byte appended after the last delta so the decoder's peek-driven loop
/// always has a byte of lookahead without running off the stream.
pub(crate) const ENDMARKER: u64 = 0xAA;

/// Index of the most significant set bit; `d` must be nonzero.
#[inline]
pub(crate) fn bitlen(d: u64) -> u32 {
    63 - d.leading_zeros()
}

/// Compress `set` to `w`. The set may be in any order but must not
/// contain duplicates.
pub fn compress<W: Write>(w: W, set: &[u64]) -> Result<(), Error> {
    let mut sorted = set.to_vec();
    sorted.sort_unstable();
    compress_sorted(w, &sorted)
}

/// Compress an already ascending, duplicate-free `set` to `w`.
///
/// # Panics
///
/// Panics if `set` is not strictly increasing. That is a caller bug, not
/// a recoverable condition; use [`compress`] for unsorted input.
pub fn compress_sorted<W: Write>(w: W, set: &[u64]) -> Result<(), Error> {
    let mut bw = BitWriter::new(w);

    bw.write_uvarint(set.len() as u64);
    bw.check()?;

    if set.is_empty() {
        return bw.close();
    }
    if set.len() == 1 {
        bw.write_uvarint(set[0]);
        return bw.close();
    }

    // The first delta is shifted up by one so that no delta is zero.
    // With at least two elements set[0] cannot be u64::MAX, so the shift
    // cannot overflow.
    let mut deltas = Vec::with_capacity(set.len());
    deltas.push(set[0] + 1);
    for pair in set.windows(2) {
        assert!(pair[1] > pair[0], "set has duplicates or is not sorted");
        deltas.push(pair[1] - pair[0]);
    }

    // Histogram of delta bitlengths; the alphabet ends at the largest
    // bitlength that occurs.
    let mut freq: Vec<u64> = Vec::new();
    for &d in &deltas {
        let bn = bitlen(d) as usize;
        if bn >= freq.len() {
            freq.resize(bn + 1, 0);
        }
        freq[bn] += 1;
    }

    let codebook = Codebook::from_frequencies(&freq);
    codebook.pack(&mut bw);
    bw.check()?;

    // Each delta: the codeword for its bitlength, then its bits below the
    // (implicit) most significant one.
    for &d in &deltas {
        let bn = bitlen(d);
        let entry = codebook.entry(bn as u8);
        bw.write_bits(entry.code, u32::from(entry.len));
        bw.write_bits(d ^ (1 << bn), bn);
    }

    bw.write_bits(ENDMARKER, 8);
    bw.close()
}
