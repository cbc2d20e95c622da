// Error surface for the codec.
//
// One enum covers both directions. The bit-level layer is sticky: it
// retains the first failure and reports it from `check()` on every later
// call, so `Clone` is implemented by hand (the io payload is reduced to
// its kind and message when duplicated).

use std::fmt;
use std::io;

#[derive(Debug)]
pub enum Error {
    /// The underlying source/sink failed, or the stream ended early.
    Io(io::Error),
    /// A uvarint (or Elias-δ prefix) did not fit in 64 bits.
    VarintOverflow,
    /// The codebook header's length-delta run is malformed.
    InvalidCodebook,
    /// The trailing byte of the stream was not the `0xAA` endmarker.
    BadEndmarker { found: u8 },
    /// More elements were requested than remain in the stream.
    NoMore,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::VarintOverflow => write!(f, "uvarint overflows 64 bits"),
            Self::InvalidCodebook => write!(f, "invalid codelength in Huffman table"),
            Self::BadEndmarker { found } => {
                write!(f, "incorrect endmarker: expected 0xAA, got {found:#04X}")
            }
            Self::NoMore => write!(f, "reading beyond end of set"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl Clone for Error {
    fn clone(&self) -> Self {
        match self {
            Self::Io(e) => Self::Io(io::Error::new(e.kind(), e.to_string())),
            Self::VarintOverflow => Self::VarintOverflow,
            Self::InvalidCodebook => Self::InvalidCodebook,
            Self::BadEndmarker { found } => Self::BadEndmarker { found: *found },
            Self::NoMore => Self::NoMore,
        }
    }
}

// Truncated input surfaces as an I/O error, not a decode error.
pub(crate) fn unexpected_eof() -> Error {
    Error::Io(io::Error::new(
        io::ErrorKind::UnexpectedEof,
        "bit stream ended early",
    ))
}
