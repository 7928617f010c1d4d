//! Per-block decompression: Huffman-coded bit stream -> LZ77 literal/match
//! stream -> plaintext, with CRC-32 verification (spec.md §4.5).
//!
//! The reference implementation this was reconstructed from threads the bit
//! reader, the table lookup, and the literal/match dispatch through a flat
//! web of gotos. Rust has no goto, so the loop below is written as an
//! explicit state machine instead — one `match` arm per label the original
//! jumped to (spec.md §9 names twelve of them). The label addresses are
//! kept as doc comments on each variant: they're the only stable vocabulary
//! for comparing this decoder against the disassembly it came from.

use crc32fast::Hasher as Crc32;

use crate::error::DecodeError;
use crate::huffman::{self, DecodeTable, NUM_SYMBOLS};

/// Longest code length the table format supports; also bounds the
/// secondary-tree descent depth (`MAX_CODE_LEN - TABLE_BITS`).
const MAX_CODE_LEN: u32 = huffman::MAX_CODE_LEN as u32;

/// Slack bytes allocated past `decompressed_size` to absorb the reference
/// decompressor's known one-or-two-byte overrun (spec.md §9 open question;
/// never exposed to callers, never counted toward CRC).
const OVERRUN_SLACK: usize = 4;

/// Shift-register bit reader, MSB-first, refilled 16 bits at a time
/// (spec.md §4.5 steps 1 and 4). `bit_count` tracks how many of the top
/// bits are "fresh" relative to the last refill; it goes negative exactly
/// when a consume has eaten into not-yet-refilled territory, which is the
/// refill trigger.
struct BitReader<'a> {
    src: &'a [u8],
    pos: usize,
    bit_reg: u32,
    bit_count: i32,
}

impl<'a> BitReader<'a> {
    fn new(src: &'a [u8]) -> Self {
        let mut r = Self { src, pos: 0, bit_reg: 0, bit_count: 0 };
        // 0x1B9C5 — prime with two 16-bit words; bit_count starts at 16
        // rather than 32 because the accounting below is biased to track
        // bits beyond the last whole 16-bit refill, not total valid bits.
        let hi = r.next_u16le() as u32;
        let lo = r.next_u16le() as u32;
        r.bit_reg = (hi << 16) | lo;
        r.bit_count = 16;
        r
    }

    fn next_u16le(&mut self) -> u16 {
        let v = if self.pos + 1 < self.src.len() {
            u16::from_le_bytes([self.src[self.pos], self.src[self.pos + 1]])
        } else if self.pos < self.src.len() {
            self.src[self.pos] as u16
        } else {
            0
        };
        self.pos += 2;
        v
    }

    #[inline]
    fn exhausted(&self) -> bool {
        self.pos >= self.src.len() && self.bit_count < 0
    }

    /// Peek `n` bits (0..=16) from the top of the register without
    /// consuming them. `n == 0` always yields `0`.
    #[inline]
    fn peek(&self, n: u32) -> u32 {
        if n == 0 {
            0
        } else {
            self.bit_reg >> (32 - n)
        }
    }

    /// 0x1BA84 — consume `n` bits, refilling from `src` if the deficit
    /// goes negative.
    fn consume(&mut self, n: u32) {
        if n == 0 {
            return;
        }
        self.bit_reg = self.bit_reg.wrapping_shl(n);
        self.bit_count -= n as i32;
        if self.bit_count < 0 {
            let word = self.next_u16le() as u32;
            self.bit_reg |= word << (-self.bit_count);
            self.bit_count += 16;
        }
    }

    /// Consume and return `n` (<=16) bits as a plain integer, MSB-first.
    fn read_bits(&mut self, n: u32) -> u32 {
        let v = self.peek(n);
        self.consume(n);
        v
    }
}

/// Canonical state labels from the disassembled reference decoder
/// (spec.md §9). Not used for runtime dispatch beyond documentation
/// anchors — the loop below follows this order but Rust's control flow
/// makes an explicit enum-driven `match` unnecessary busywork once the
/// shape is this linear.
#[allow(dead_code)]
enum Label {
    /// 0x1BA44 — fetch next symbol from the direct table.
    FetchSymbol,
    /// 0x1BA56 — resolve a long code via the secondary region.
    ResolveLongCode,
    /// 0x1BA84 — consume the matched code's bit length, refill if needed.
    ConsumeLength,
    /// 0x1BAD0 — dispatch on symbol: literal vs. length/distance.
    Dispatch,
    /// 0x1BAFA — literal path: emit one byte.
    EmitLiteral,
    /// 0x1BB1A — match path: decode extra distance bits.
    DecodeDistance,
    /// 0x1BB2B — match path: decode length class / extensions.
    DecodeLength,
    /// 0x1BB55 — perform the overlapping copy.
    CopyMatch,
    /// 0x1B9C5 — refill bit register from the next 16-bit word.
    Refill,
    /// 0x1B9E1 — check source-exhausted / dest-full termination.
    CheckDone,
    /// 0x1B9E6 — block complete.
    Done,
    /// 0x36670 — fatal error exit.
    Fail,
}

/// Decodes one Huffman-coded block's payload into plaintext, verifying its
/// CRC-32 against `expected_crc`.
///
/// `payload` is the block's compressed bytes *after* the 256-byte
/// code-length descriptor (the caller splits that off to build `table`).
/// `decompressed_size` is the header's declared plaintext length.
pub fn decode_block(
    table: &DecodeTable,
    payload: &[u8],
    decompressed_size: u32,
    expected_crc: u32,
) -> Result<Vec<u8>, DecodeError> {
    let target = decompressed_size as usize;
    let mut out = vec![0u8; target + OVERRUN_SLACK];
    let mut written: usize = 0;

    let mut bits = BitReader::new(payload);

    // 0x1B9E1 / 0x1B9E6 — main loop: stop once we've produced the declared
    // amount, or the compressed side has nothing left to offer.
    while written < target && !bits.exhausted() {
        // 0x1BA44 — direct top-10-bit lookup.
        let mut idx = bits.peek(huffman::TABLE_BITS) as usize;
        let mut entry = table.lookup(idx);

        // 0x1BA56 — secondary region: each extra bit doubles the index and
        // folds in the new bit, until the entry's sign bit clears.
        let mut extra = 0u32;
        while huffman::is_long(entry) {
            extra += 1;
            if extra > MAX_CODE_LEN - huffman::TABLE_BITS {
                return Err(DecodeError::BadBitStream("long-code descent exceeded max code length"));
            }
            let bit = (bits.bit_reg >> (32 - huffman::TABLE_BITS - extra)) & 1;
            idx = idx * 2 + bit as usize;
            entry = table.lookup(idx);
        }

        // 0x1BA84 — now that the full code length is known, consume it in
        // one shot (covers both the short and long cases uniformly).
        let len = huffman::entry_len(entry);
        if len == 0 {
            return Err(DecodeError::BadBitStream("resolved to a zero-length code"));
        }
        bits.consume(len);
        let symbol = huffman::entry_symbol(entry);

        // 0x1BAD0 — dispatch.
        if (symbol as usize) < 256 {
            // 0x1BAFA — literal.
            if written < out.len() {
                out[written] = symbol as u8;
            }
            written += 1;
        } else {
            // 0x1BB1A / 0x1BB2B — match: decode distance then length.
            let code = (symbol as u32) - 256;
            let extra_bits = code >> 4;
            let length_class = code & 0xF;

            let distance_extra = bits.read_bits(extra_bits);
            let distance = (1u32 << extra_bits) | distance_extra;

            let length = decode_length(&mut bits, length_class)?;

            if (distance as usize) > written {
                return Err(DecodeError::BadReference { offset: -(distance as i64), dst_pos: written });
            }

            // 0x1BB55 — overlapping copy, clipped at the slack boundary
            // rather than growing the buffer (spec.md §9 open question).
            let mut src_pos = written - distance as usize;
            for _ in 0..length {
                let byte = if src_pos < out.len() { out[src_pos] } else { 0 };
                if written < out.len() {
                    out[written] = byte;
                }
                written += 1;
                src_pos += 1;
            }
        }
    }

    out.truncate(target);

    let mut hasher = Crc32::new();
    hasher.update(&out);
    let actual = hasher.finalize();
    if actual != expected_crc {
        return Err(DecodeError::CrcMismatch { expected: expected_crc, actual });
    }

    Ok(out)
}

/// Length-class resolution (spec.md §4.5, §9 open question on the nibble's
/// upper values): classes 0..14 are the direct base `class + 3`; class 15
/// triggers an 8-bit extension, and an extension value of exactly `0x0F`
/// escalates once more to a 16-bit extension, whose value must stay below
/// `0x10E` or the stream is rejected as malformed.
fn decode_length(bits: &mut BitReader<'_>, length_class: u32) -> Result<u32, DecodeError> {
    if length_class < 15 {
        return Ok(length_class + 3);
    }
    let ext8 = bits.read_bits(8);
    if ext8 != 0x0F {
        return Ok(18 + ext8);
    }
    let ext16 = bits.read_bits(16);
    if ext16 >= 0x10E {
        return Err(DecodeError::BadBitStream("length extension out of range"));
    }
    Ok(33 + ext16)
}

/// A raw (uncompressed) block: no table, no bit stream, just a CRC-checked
/// copy (spec.md §3, §4.3 — see `BlockHeader::is_raw_block`).
pub fn decode_raw_block(payload: &[u8], expected_crc: u32) -> Result<Vec<u8>, DecodeError> {
    let mut hasher = Crc32::new();
    hasher.update(payload);
    let actual = hasher.finalize();
    if actual != expected_crc {
        return Err(DecodeError::CrcMismatch { expected: expected_crc, actual });
    }
    Ok(payload.to_vec())
}

/// Splits a Huffman-coded block's payload into its 256-byte code-length
/// descriptor and the remaining compressed bit stream.
pub fn split_table_and_stream(payload: &[u8]) -> Result<(&[u8; 256], &[u8]), DecodeError> {
    if payload.len() < 256 {
        return Err(DecodeError::BadBlockHeader("payload shorter than the 256-byte code-length table"));
    }
    let (table_bytes, stream) = payload.split_at(256);
    Ok((table_bytes.try_into().expect("split_at(256) yields a 256-byte slice"), stream))
}
