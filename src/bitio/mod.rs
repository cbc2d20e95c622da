// Packed little-endian bit stream I/O.
//
// Fields of arbitrary width are packed into bytes little-endian and
// streamed LSB-first; both ends buffer 64 bits. On top of raw bit fields
// the layer provides two variable-length integer sub-codings: a
// little-endian base-128 uvarint (one whole byte per group) and Elias-δ.
//
// Errors are sticky. Operations return raw values and never fail
// directly; the first I/O failure is retained and surfaced by `check()`,
// and every operation after it is a no-op.

pub mod reader;
pub mod writer;

pub use reader::BitReader;
pub use writer::BitWriter;
