//! Error taxonomy for the HU01 decoder.
//!
//! Every kind here is fatal for the stream it occurred on (spec.md §7):
//! the facade never attempts recovery, and a decoder that has returned one
//! of these must be `reset()` before it can be used again.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// File-level magic mismatch, or declared header size below the
    /// minimum 40 bytes.
    #[error("bad HU01 file header: {0}")]
    BadFileHeader(&'static str),

    /// Block-level magic mismatch (expected `SCBH`).
    #[error("bad SCBH block header: {0}")]
    BadBlockHeader(&'static str),

    /// The 256-byte code-length descriptor does not describe a complete
    /// canonical Huffman code (parity or completeness violated), or
    /// `counts[0] >= 511`.
    #[error("invalid Huffman code-length table: {0}")]
    BadTable(&'static str),

    /// A decoded back-reference points before the start of the block's
    /// plaintext buffer.
    #[error("back-reference points before block start (offset {offset}, dst position {dst_pos})")]
    BadReference { offset: i64, dst_pos: usize },

    /// A length-extension codepath produced a reserved value.
    #[error("bad bit stream: {0}")]
    BadBitStream(&'static str),

    /// The block's decoded bytes do not match the header's declared CRC-32.
    #[error("block CRC-32 mismatch: expected {expected:#010x}, got {actual:#010x}")]
    CrcMismatch { expected: u32, actual: u32 },
}
