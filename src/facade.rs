//! `Hu01Decoder` — the incremental push-based API (spec.md §4.6).
//!
//! Callers feed compressed bytes in via [`Hu01Decoder::add_input`] as they
//! arrive (over a socket, from a file, whatever) and drain decoded
//! plaintext via [`Hu01Decoder::decompress`] whenever convenient. Nothing
//! here blocks, spawns a thread, or touches I/O directly — see
//! [`crate::sink`] for the adapter that does.

use log::{debug, trace, warn};

use crate::block::{self, BlockResult};
use crate::decoder;
use crate::error::DecodeError;
use crate::header::{self, HeaderResult};
use crate::huffman;
use crate::input_buffer::InputBuffer;
use crate::options::DecoderOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    AwaitingFileHeader,
    AwaitingBlock,
    Done,
}

/// Streaming HU01 decoder: push compressed bytes in, pull plaintext out.
///
/// Not `Send`/`Sync` by omission — a single decoder is meant to be driven
/// from one thread at a time (spec.md §5).
pub struct Hu01Decoder {
    phase: Phase,
    input: InputBuffer,
    pending_output: Vec<u8>,
    declared_size: u64,
    produced: u64,
    options: DecoderOptions,
}

impl Hu01Decoder {
    pub fn new() -> Self {
        Self::with_options(DecoderOptions::default())
    }

    pub fn with_options(options: DecoderOptions) -> Self {
        Self {
            phase: Phase::AwaitingFileHeader,
            input: InputBuffer::with_capacity(options.initial_input_capacity),
            pending_output: Vec::with_capacity(options.initial_output_capacity),
            declared_size: 0,
            produced: 0,
            options,
        }
    }

    /// Append more compressed bytes. Never blocks, never parses past what
    /// it can fully validate with what's been given so far.
    pub fn add_input(&mut self, bytes: &[u8]) {
        trace!("add_input: {} bytes", bytes.len());
        self.input.append(bytes);
    }

    /// Drive the state machine as far as the currently buffered input
    /// allows, returning newly produced plaintext.
    ///
    /// Returns an empty `Vec` (never an error) when more input is needed.
    /// A returned `Err` is fatal for this decoder: the stream is corrupt
    /// and the caller must [`Hu01Decoder::reset`] before reusing it.
    pub fn decompress(&mut self) -> Result<Vec<u8>, DecodeError> {
        loop {
            match self.phase {
                Phase::Done => return Ok(std::mem::take(&mut self.pending_output)),
                Phase::AwaitingFileHeader => match header::try_read(&self.input)? {
                    HeaderResult::NeedMore => return Ok(std::mem::take(&mut self.pending_output)),
                    HeaderResult::Ready { declared_size } => {
                        header::advance_past(&mut self.input);
                        debug!("file header parsed: declared_size={declared_size}");
                        self.declared_size = declared_size;
                        self.phase = Phase::AwaitingBlock;
                        if declared_size == 0 {
                            self.phase = Phase::Done;
                        }
                    }
                },
                Phase::AwaitingBlock => {
                    match block::try_read(&self.input)? {
                        BlockResult::NeedMore => return Ok(std::mem::take(&mut self.pending_output)),
                        BlockResult::Ready { header, payload } => {
                            let decoded = if header.is_raw_block() {
                                trace!("raw block, {} bytes", header.decompressed_size);
                                decoder::decode_raw_block(payload, header.expected_crc)?
                            } else {
                                let (table_bytes, stream) = decoder::split_table_and_stream(payload)?;
                                let lengths = huffman::split_nibbles(table_bytes);
                                let table = huffman::build(&lengths)?;
                                trace!(
                                    "huffman block, compressed={} decompressed={}",
                                    header.compressed_size, header.decompressed_size
                                );
                                decoder::decode_block(
                                    &table,
                                    stream,
                                    header.decompressed_size,
                                    header.expected_crc,
                                )?
                            };
                            block::advance_past(&mut self.input);
                            self.produced += decoded.len() as u64;
                            self.pending_output.extend_from_slice(&decoded);

                            if self.produced >= self.declared_size {
                                if self.produced > self.declared_size {
                                    warn!(
                                        "produced {} bytes, more than declared {}",
                                        self.produced, self.declared_size
                                    );
                                }
                                self.phase = Phase::Done;
                            }
                        }
                    }
                }
            }
        }
    }

    /// `true` once every declared byte has been produced and handed back
    /// through `decompress`.
    pub fn finished(&self) -> bool {
        self.phase == Phase::Done && self.pending_output.is_empty()
    }

    /// Reset to a freshly-constructed state, discarding all buffered input
    /// and pending output, keeping the same `DecoderOptions`.
    pub fn reset(&mut self) {
        self.input.clear();
        self.pending_output.clear();
        self.declared_size = 0;
        self.produced = 0;
        self.phase = Phase::AwaitingFileHeader;
    }
}

impl Default for Hu01Decoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn le32(v: u32) -> [u8; 4] {
        v.to_le_bytes()
    }

    fn file_header(declared_size: u32) -> Vec<u8> {
        let mut v = vec![0u8; 40];
        v[0..4].copy_from_slice(&header::MAGIC.to_le_bytes());
        v[4..8].copy_from_slice(&le32(40));
        v[32..36].copy_from_slice(&le32(declared_size));
        v
    }

    fn raw_block(payload: &[u8]) -> Vec<u8> {
        let mut hasher = crc32fast::Hasher::new();
        hasher.update(payload);
        let crc = hasher.finalize();

        let header_size = 20u32;
        let mut v = vec![0u8; header_size as usize];
        v[0..4].copy_from_slice(&block::MAGIC.to_le_bytes());
        v[4..8].copy_from_slice(&le32(header_size));
        v[8..12].copy_from_slice(&le32(payload.len() as u32));
        v[12..16].copy_from_slice(&le32(crc));
        v[16..20].copy_from_slice(&le32(payload.len() as u32));
        v.extend_from_slice(payload);
        v
    }

    #[test]
    fn decodes_a_single_raw_block_stream() {
        let payload = b"hello, hu01";
        let mut stream = file_header(payload.len() as u32);
        stream.extend_from_slice(&raw_block(payload));

        let mut decoder = Hu01Decoder::new();
        decoder.add_input(&stream);
        let out = decoder.decompress().unwrap();
        assert_eq!(out, payload);
        assert!(decoder.finished());
    }

    #[test]
    fn byte_at_a_time_feed_is_equivalent() {
        let payload = b"chunked delivery exercises NeedMore paths";
        let mut stream = file_header(payload.len() as u32);
        stream.extend_from_slice(&raw_block(payload));

        let mut decoder = Hu01Decoder::new();
        let mut out = Vec::new();
        for &b in &stream {
            decoder.add_input(&[b]);
            out.extend(decoder.decompress().unwrap());
        }
        assert_eq!(out, payload);
        assert!(decoder.finished());
    }

    #[test]
    fn empty_declared_size_finishes_immediately() {
        let stream = file_header(0);
        let mut decoder = Hu01Decoder::new();
        decoder.add_input(&stream);
        let out = decoder.decompress().unwrap();
        assert!(out.is_empty());
        assert!(decoder.finished());
    }

    #[test]
    fn reset_clears_state_for_reuse() {
        let payload = b"first stream";
        let mut stream = file_header(payload.len() as u32);
        stream.extend_from_slice(&raw_block(payload));

        let mut decoder = Hu01Decoder::new();
        decoder.add_input(&stream);
        decoder.decompress().unwrap();
        assert!(decoder.finished());

        decoder.reset();
        assert!(!decoder.finished());

        let payload2 = b"second stream after reset";
        let mut stream2 = file_header(payload2.len() as u32);
        stream2.extend_from_slice(&raw_block(payload2));
        decoder.add_input(&stream2);
        let out = decoder.decompress().unwrap();
        assert_eq!(out, payload2);
    }

    #[test]
    fn corrupt_crc_is_fatal() {
        let payload = b"tampered";
        let mut stream = file_header(payload.len() as u32);
        let mut block_bytes = raw_block(payload);
        let last = block_bytes.len() - 1;
        block_bytes[last] ^= 0xFF;
        stream.extend_from_slice(&block_bytes);

        let mut decoder = Hu01Decoder::new();
        decoder.add_input(&stream);
        let err = decoder.decompress().unwrap_err();
        assert!(matches!(err, DecodeError::CrcMismatch { .. }));
    }
}
