//! Test-only HU01 stream encoder.
//!
//! There is no encoder in the library: HU01 is a read-only interop format
//! here, and the production code never writes it. These helpers exist
//! purely so integration tests have conformant fixtures to feed the real
//! decoder, without needing a sample file from the wild.
//!
//! The Huffman path only ever emits literals (a flat 8-bit code covering
//! symbols 0..255) — enough to exercise the full header/block/table/bit
//! stream pipeline end to end. It never emits a match/back-reference symbol
//! or a code longer than 10 bits, so that coverage lives in
//! `src/decoder.rs`'s unit tests instead, which hand-build tables and bit
//! streams to drive `decode_block` through the `symbol >= 256` branch, the
//! length-extension ladder, and the long-code secondary-region descent
//! directly.

pub const FILE_MAGIC: u32 = 0x3130_5548;
pub const BLOCK_MAGIC: u32 = 0x4842_4353;

fn le32(v: u32) -> [u8; 4] {
    v.to_le_bytes()
}

fn crc32(bytes: &[u8]) -> u32 {
    let mut h = crc32fast::Hasher::new();
    h.update(bytes);
    h.finalize()
}

/// Assemble a full HU01 stream: file header + however many block byte
/// vectors the caller already built.
pub fn file(declared_size: u32, blocks: &[Vec<u8>]) -> Vec<u8> {
    let mut out = vec![0u8; 40];
    out[0..4].copy_from_slice(&FILE_MAGIC.to_le_bytes());
    out[4..8].copy_from_slice(&le32(40));
    out[32..36].copy_from_slice(&le32(declared_size));
    for block in blocks {
        out.extend_from_slice(block);
    }
    out
}

/// A raw (uncompressed) block: header + verbatim payload, CRC over the
/// payload (spec.md §3's `is_raw_block` heuristic: compressed size equals
/// decompressed size and both are below 2048).
pub fn raw_block(payload: &[u8]) -> Vec<u8> {
    assert!(payload.len() < 2048, "raw_block fixture helper only covers the < 2048 heuristic range");
    let header_size = 20u32;
    let mut out = vec![0u8; header_size as usize];
    out[0..4].copy_from_slice(&BLOCK_MAGIC.to_le_bytes());
    out[4..8].copy_from_slice(&le32(header_size));
    out[8..12].copy_from_slice(&le32(payload.len() as u32));
    out[12..16].copy_from_slice(&le32(crc32(payload)));
    out[16..20].copy_from_slice(&le32(payload.len() as u32));
    out.extend_from_slice(payload);
    out
}

/// Pack MSB-first bits into the 16-bit-word / little-endian-bytes layout
/// the decoder's bit reader expects.
fn pack_bits(bits: &[u8]) -> Vec<u8> {
    let mut bits = bits.to_vec();
    while bits.len() % 16 != 0 {
        bits.push(0);
    }
    let mut out = Vec::new();
    for chunk in bits.chunks(16) {
        let mut word: u16 = 0;
        for &b in chunk {
            word = (word << 1) | b as u16;
        }
        out.extend_from_slice(&word.to_le_bytes());
    }
    out
}

/// A flat 8-bit code-length descriptor covering literal symbols 0..255
/// (and nothing else): byte `i` for `i < 128` is `0x88` (both nibbles 8),
/// the remaining 128 bytes are zero.
fn flat_literal_descriptor() -> [u8; 256] {
    let mut d = [0u8; 256];
    for b in d.iter_mut().take(128) {
        *b = 0x88;
    }
    d
}

/// A Huffman-coded block whose payload is encoded as flat 8-bit literals
/// (each byte of `payload` becomes its own 8-bit code, numerically equal
/// to its byte value, per the canonical assignment for a flat length-8
/// code over 256 symbols in ascending order).
pub fn literal_huffman_block(payload: &[u8]) -> Vec<u8> {
    let descriptor = flat_literal_descriptor();

    let mut bits = Vec::with_capacity(payload.len() * 8);
    for &byte in payload {
        for i in (0..8).rev() {
            bits.push((byte >> i) & 1);
        }
    }
    let bitstream = pack_bits(&bits);

    let mut block_payload = Vec::with_capacity(256 + bitstream.len());
    block_payload.extend_from_slice(&descriptor);
    block_payload.extend_from_slice(&bitstream);

    let header_size = 20u32;
    let mut out = vec![0u8; header_size as usize];
    out[0..4].copy_from_slice(&BLOCK_MAGIC.to_le_bytes());
    out[4..8].copy_from_slice(&le32(header_size));
    out[8..12].copy_from_slice(&le32(payload.len() as u32));
    out[12..16].copy_from_slice(&le32(crc32(payload)));
    out[16..20].copy_from_slice(&le32(block_payload.len() as u32));
    out.extend_from_slice(&block_payload);
    out
}
