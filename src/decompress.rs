// Incremental decompression: parse the header, rebuild the prefix-table
// decoder, stream deltas back into ascending values.

use std::io::{Read, Write};

use crate::bitio::BitReader;
use crate::compress::ENDMARKER;
use crate::error::Error;
use crate::huffman::PrefixTable;

/// Decompress a whole set from `r`. The result is sorted ascending.
pub fn decompress<R: Read>(r: R) -> Result<Vec<u64>, Error> {
    let mut d = Decompressor::new(r)?;
    let mut out = vec![0u64; d.remaining() as usize];
    d.read(&mut out)?;
    Ok(out)
}

/// Pull-based decompressor.
///
/// Construction parses the stream header (and for two or more elements
/// the Huffman codebook); `read` then hands out elements in ascending
/// order in whatever slice sizes the caller asks for.
pub struct Decompressor<R: Read> {
    br: BitReader<R>,
    size: u64,
    remaining: u64,
    /// None while `size <= 1`, or when the codebook is trivial and every
    /// delta is one.
    table: Option<PrefixTable>,
    prev: u64,
    started: bool,
}

impl<R: Read> Decompressor<R> {
    pub fn new(r: R) -> Result<Self, Error> {
        Self::build(r, None)
    }

    /// Like `new`, but writes a human-readable dump of the header to
    /// `log` while parsing it.
    pub fn with_logging(r: R, log: Box<dyn Write>) -> Result<Self, Error> {
        Self::build(r, Some(log))
    }

    fn build(r: R, mut log: Option<Box<dyn Write>>) -> Result<Self, Error> {
        let mut br = BitReader::new(r);

        let size = br.read_uvarint();
        br.check()?;

        if let Some(l) = log.as_mut() {
            let _ = writeln!(l, "size                 {size}");
        }

        // The single element of a size-1 stream is read lazily; only
        // larger streams carry a codebook.
        let table = if size >= 2 {
            PrefixTable::unpack(&mut br, &mut log)?
        } else {
            None
        };

        Ok(Self {
            br,
            size,
            remaining: size,
            table,
            prev: 0,
            started: false,
        })
    }

    /// Elements not yet delivered.
    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    /// Compressed bytes consumed so far, read-ahead included.
    pub fn bytes_read(&self) -> u64 {
        self.br.bytes_read()
    }

    /// Fill `out` with the next `out.len()` elements, in ascending order.
    ///
    /// Asking for more than `remaining()` fails with [`Error::NoMore`]
    /// before anything is delivered; the stream can still be drained with
    /// smaller reads afterwards.
    pub fn read(&mut self, out: &mut [u64]) -> Result<(), Error> {
        if out.is_empty() {
            return Ok(());
        }
        if self.remaining < out.len() as u64 {
            return Err(Error::NoMore);
        }

        if self.size == 1 {
            out[0] = self.br.read_uvarint();
            self.br.check()?;
            self.remaining = 0;
            return Ok(());
        }

        let mut prev = self.prev;
        let mut started = self.started;

        match &self.table {
            Some(table) => {
                for slot in out.iter_mut() {
                    let bitlen = table.decode_symbol(&mut self.br);
                    let residual = self.br.read_bits(u32::from(bitlen));
                    let delta = residual | (1u64 << bitlen);
                    *slot = advance(&mut prev, &mut started, delta);
                }
            }
            None => {
                // Trivial codebook: every delta is one, no payload bits.
                for slot in out.iter_mut() {
                    *slot = advance(&mut prev, &mut started, 1);
                }
            }
        }
        self.prev = prev;
        self.started = started;
        self.br.check()?;

        self.remaining -= out.len() as u64;

        if self.remaining == 0 {
            let marker = self.br.read_bits(8);
            self.br.check()?;
            if marker != ENDMARKER {
                return Err(Error::BadEndmarker {
                    found: marker as u8,
                });
            }
        }

        Ok(())
    }
}

// Turn a delta into the next value. The first element undoes the +1
// shift applied to the first delta; wrapping arithmetic keeps corrupt
// streams from panicking before the endmarker check catches them.
fn advance(prev: &mut u64, started: &mut bool, delta: u64) -> u64 {
    let mut val = prev.wrapping_add(delta);
    if !*started {
        val = val.wrapping_sub(1);
        *started = true;
    }
    *prev = val;
    val
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compress::compress_sorted;

    fn encode(set: &[u64]) -> Vec<u8> {
        let mut buf = Vec::new();
        compress_sorted(&mut buf, set).unwrap();
        buf
    }

    #[test]
    fn empty_stream() {
        let buf = encode(&[]);
        assert_eq!(decompress(buf.as_slice()).unwrap(), Vec::<u64>::new());
    }

    #[test]
    fn singleton_is_read_lazily() {
        let buf = encode(&[123_456_789]);
        let mut d = Decompressor::new(buf.as_slice()).unwrap();
        assert_eq!(d.remaining(), 1);

        let mut out = [0u64; 1];
        d.read(&mut out).unwrap();
        assert_eq!(out[0], 123_456_789);
        assert_eq!(d.remaining(), 0);
        assert!(matches!(d.read(&mut out), Err(Error::NoMore)));
    }

    #[test]
    fn oversized_read_fails_without_consuming() {
        let buf = encode(&[10, 20, 30]);
        let mut d = Decompressor::new(buf.as_slice()).unwrap();

        let mut too_big = [0u64; 4];
        assert!(matches!(d.read(&mut too_big), Err(Error::NoMore)));
        assert_eq!(d.remaining(), 3);

        // The stream is still intact.
        let mut out = [0u64; 3];
        d.read(&mut out).unwrap();
        assert_eq!(out, [10, 20, 30]);
    }

    #[test]
    fn oversized_read_on_singleton_delivers_nothing() {
        let buf = encode(&[7]);
        let mut d = Decompressor::new(buf.as_slice()).unwrap();

        let mut out = [0u64; 2];
        assert!(matches!(d.read(&mut out), Err(Error::NoMore)));
        assert_eq!(out, [0, 0]);
        assert_eq!(d.remaining(), 1);

        d.read(&mut out[..1]).unwrap();
        assert_eq!(out[0], 7);
    }

    #[test]
    fn zero_length_read_always_succeeds() {
        let buf = encode(&[]);
        let mut d = Decompressor::new(buf.as_slice()).unwrap();
        d.read(&mut []).unwrap();

        let buf2 = encode(&[1, 2, 3]);
        let mut d = Decompressor::new(buf2.as_slice()).unwrap();
        d.read(&mut []).unwrap();
        assert_eq!(d.remaining(), 3);
    }

    #[test]
    fn trivial_codebook_run() {
        // Consecutive values make every delta one; no payload bits, no
        // prefix table.
        let set: Vec<u64> = (100..200).collect();
        let buf = encode(&set);
        assert_eq!(decompress(buf.as_slice()).unwrap(), set);
    }

    #[test]
    fn chunked_reads_match_one_shot() {
        let set: Vec<u64> = (0..64).map(|i| 1u64 << i).collect();
        let buf = encode(&set);

        let mut d = Decompressor::new(buf.as_slice()).unwrap();
        let mut got = Vec::new();
        for chunk_len in [1usize, 2, 5, 13, 43] {
            let n = chunk_len.min(d.remaining() as usize);
            let mut chunk = vec![0u64; n];
            d.read(&mut chunk).unwrap();
            got.extend_from_slice(&chunk);
        }
        assert_eq!(got, set);
        assert_eq!(d.remaining(), 0);
    }

    #[test]
    fn bytes_read_tracks_stream() {
        let buf = encode(&[5, 15, 35, 150, 500, 1500]);
        let mut d = Decompressor::new(buf.as_slice()).unwrap();
        assert!(d.bytes_read() > 0);
        let mut out = [0u64; 6];
        d.read(&mut out).unwrap();
        assert!(d.bytes_read() >= buf.len() as u64);
    }

    #[test]
    fn header_dump_is_written() {
        #[derive(Clone, Default)]
        struct SharedBuf(std::rc::Rc<std::cell::RefCell<Vec<u8>>>);
        impl Write for SharedBuf {
            fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                self.0.borrow_mut().extend_from_slice(buf);
                Ok(buf.len())
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let buf = encode(&[5, 15, 35, 150, 500, 1500]);
        let sink = SharedBuf::default();
        let mut d =
            Decompressor::with_logging(buf.as_slice(), Box::new(sink.clone())).unwrap();
        let mut out = [0u64; 6];
        d.read(&mut out).unwrap();

        let dump = String::from_utf8(sink.0.borrow().clone()).unwrap();
        assert!(dump.contains("size                 6"));
        assert!(dump.contains("max bitlength"));
        assert!(dump.contains("Codebook bitlengths:"));
    }
}
