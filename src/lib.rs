//! Streaming decoder for Microsoft's HU01 compressed container, the format
//! DeltaSync uses to transport compressed email bodies.
//!
//! The entry point is [`Hu01Decoder`]: push compressed bytes in with
//! [`Hu01Decoder::add_input`], pull plaintext out with
//! [`Hu01Decoder::decompress`]. The decoder never performs I/O itself —
//! pair it with [`sink::ByteSink`] when writing decoded bytes somewhere
//! byte-oriented.

pub mod block;
pub mod decoder;
pub mod error;
pub mod facade;
pub mod header;
pub mod huffman;
pub mod input_buffer;
pub mod options;
pub mod sink;

pub use error::DecodeError;
pub use facade::Hu01Decoder;
pub use options::DecoderOptions;
pub use sink::{ByteSink, Hu01Writer, SinkError};
