//! Per-block `SCBH` header (spec.md §3, §4.3).
//!
//! ```text
//! Offset  Size  Field
//!    0      4   magic             = "SCBH" (0x48424353 LE)
//!    4      4   header_size       (LE u32)
//!    8      4   decompressed_size (LE u32)
//!   12      4   expected_crc      (LE u32)
//!   16      4   compressed_size   (LE u32)
//! ```
//!
//! `compressed_size` includes the 256-byte code-length table when the block
//! is Huffman-coded (i.e. not a raw copy — see `is_raw_block`).

use crate::error::DecodeError;
use crate::input_buffer::InputBuffer;

/// `"SCBH"` as a little-endian u32.
pub const MAGIC: u32 = 0x4842_4353;

/// Fixed size of the block header itself, in bytes.
pub const BLOCK_HEADER_SIZE: usize = 20;

/// Raw (uncompressed) blocks never exceed this decompressed size; see
/// `is_raw_block`.
pub const RAW_BLOCK_SIZE_LIMIT: u32 = 2048;

#[derive(Debug, Clone, Copy)]
pub struct BlockHeader {
    pub decompressed_size: u32,
    pub expected_crc: u32,
    pub compressed_size: u32,
}

impl BlockHeader {
    /// Empirical heuristic preserved from the reference implementation
    /// (spec.md §3, §9 open question): a block is a verbatim copy, with no
    /// Huffman table and no bit stream, exactly when its compressed size
    /// equals its decompressed size *and* that size is below 2048 bytes.
    #[inline]
    pub fn is_raw_block(&self) -> bool {
        self.compressed_size == self.decompressed_size
            && self.decompressed_size < RAW_BLOCK_SIZE_LIMIT
    }
}

pub enum BlockResult<'a> {
    /// Not enough bytes yet to parse the header and payload in full.
    NeedMore,
    /// Header parsed and payload fully present; cursor has *not* been
    /// advanced yet (call `advance_past` after consuming `payload`).
    Ready {
        header: BlockHeader,
        payload: &'a [u8],
    },
}

/// Attempt to parse one block header plus its full payload at `input`'s
/// current cursor.
pub fn try_read(input: &InputBuffer) -> Result<BlockResult<'_>, DecodeError> {
    if input.remaining() < BLOCK_HEADER_SIZE {
        return Ok(BlockResult::NeedMore);
    }

    let magic = input.peek_le_u32(0);
    if magic != MAGIC {
        return Err(DecodeError::BadBlockHeader("magic mismatch"));
    }

    let header_size = input.peek_le_u32(4) as usize;
    let decompressed_size = input.peek_le_u32(8);
    let expected_crc = input.peek_le_u32(12);
    let compressed_size = input.peek_le_u32(16);

    let total = header_size
        .checked_add(compressed_size as usize)
        .ok_or(DecodeError::BadBlockHeader("header_size + compressed_size overflows"))?;
    if input.remaining() < total {
        return Ok(BlockResult::NeedMore);
    }

    let payload = &input.slice(total)[header_size..];
    Ok(BlockResult::Ready {
        header: BlockHeader { decompressed_size, expected_crc, compressed_size },
        payload,
    })
}

/// Consume the block's header + payload bytes, once the caller is done
/// reading `payload` from a preceding `Ready`.
pub fn advance_past(input: &mut InputBuffer) {
    let header_size = input.peek_le_u32(4) as usize;
    let compressed_size = input.peek_le_u32(16) as usize;
    input.advance(header_size + compressed_size);
}
