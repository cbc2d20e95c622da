//! ncrlite: a compact codec for unordered sets of distinct `u64`s.
//!
//! Given a set of distinct unsigned 64-bit integers, [`compress`]
//! produces a byte stream from which [`decompress`] reconstructs the set,
//! sorted ascending, bit-exactly. On this shape of data it approaches the
//! information-theoretic limit of `log2 C(N, k)` bits and consistently
//! beats general-purpose compressors.
//!
//! The pipeline: sort, delta-encode (the first delta shifted up by one so
//! no delta is zero), Huffman-code the *bitlengths* of the deltas with a
//! canonical code shipped as lengths only, then pack each delta's bits
//! below its most significant one verbatim. Streams of two or more
//! elements end with an `0xAA` endmarker so the decoder can peek ahead
//! safely.
//!
//! # Quick Start
//!
//! ```
//! let mut buf = Vec::new();
//! ncrlite::compress(&mut buf, &[150, 35, 15, 500, 5, 1500]).unwrap();
//!
//! let set = ncrlite::decompress(buf.as_slice()).unwrap();
//! assert_eq!(set, vec![5, 15, 35, 150, 500, 1500]);
//! ```
//!
//! Incremental decoding over any `Read`:
//!
//! ```
//! use ncrlite::Decompressor;
//!
//! # let mut buf = Vec::new();
//! # ncrlite::compress(&mut buf, &(0u64..100).collect::<Vec<_>>()).unwrap();
//! let mut d = Decompressor::new(buf.as_slice()).unwrap();
//! let mut chunk = [0u64; 32];
//! while d.remaining() > 0 {
//!     let n = chunk.len().min(d.remaining() as usize);
//!     d.read(&mut chunk[..n]).unwrap();
//!     // use chunk[..n]
//! }
//! ```
//!
//! The wire format is not stable across versions: a stream is only
//! guaranteed to decode with the version that produced it.

pub mod bitio;
mod compress;
mod decompress;
pub mod error;
pub mod huffman;

#[cfg(feature = "cli")]
pub mod cli;

pub use compress::{compress, compress_sorted};
pub use decompress::{decompress, Decompressor};
pub use error::Error;
