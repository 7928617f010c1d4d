//! Write-side adapter: hands decoded plaintext to whatever the caller
//! wants bytes written to, without the core decoder ever touching I/O
//! itself (spec.md §5 Non-goals — no sockets, no files inside the core).

use std::io;

use thiserror::Error;

use crate::error::DecodeError;
use crate::facade::Hu01Decoder;
use crate::options::DecoderOptions;

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("sink write failed: {0}")]
    Io(#[from] io::Error),

    /// The underlying decoder failed; the original [`DecodeError`] is kept
    /// as the cause rather than collapsed into an I/O error (spec.md §7:
    /// "preserving the original kind as a cause").
    #[error("HU01 decode failed: {0}")]
    Decode(#[from] DecodeError),
}

/// A destination for decoded bytes. Implemented for any [`std::io::Write`]
/// so callers can hand a `File`, a `Vec<u8>` wrapped in a cursor, or a
/// socket straight to [`Hu01Writer`].
pub trait ByteSink {
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), SinkError>;
    fn flush(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
    fn close(&mut self) -> Result<(), SinkError> {
        self.flush()
    }
}

impl<W: io::Write> ByteSink for W {
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), SinkError> {
        io::Write::write_all(self, bytes).map_err(SinkError::from)
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        io::Write::flush(self).map_err(SinkError::from)
    }
}

/// Write-side adapter (spec.md §4.6, §6): wraps an [`Hu01Decoder`] under a
/// [`ByteSink`]. The caller writes compressed bytes in; the adapter decodes
/// them and forwards the decompressed bytes straight to the inner sink.
///
/// This contributes no decoding logic of its own — it is a thin shim that
/// calls [`Hu01Decoder::add_input`] then drains [`Hu01Decoder::decompress`]
/// into `inner` (spec.md §4.6: "it contributes no additional logic").
pub struct Hu01Writer<W> {
    decoder: Hu01Decoder,
    inner: W,
}

impl<W: ByteSink> Hu01Writer<W> {
    pub fn new(inner: W) -> Self {
        Self { decoder: Hu01Decoder::new(), inner }
    }

    pub fn with_options(inner: W, options: DecoderOptions) -> Self {
        Self { decoder: Hu01Decoder::with_options(options), inner }
    }

    /// Feed compressed bytes, decode whatever that completes, and forward
    /// the result to the inner sink. A decode failure is fatal for this
    /// adapter, same as for the decoder it wraps (spec.md §7); the adapter
    /// itself is not reset automatically.
    pub fn write(&mut self, bytes: &[u8]) -> Result<(), SinkError> {
        self.decoder.add_input(bytes);
        let decoded = self.decoder.decompress()?;
        if !decoded.is_empty() {
            self.inner.write_all(&decoded)?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), SinkError> {
        self.inner.flush()
    }

    pub fn close(&mut self) -> Result<(), SinkError> {
        self.inner.close()
    }

    /// `true` once the wrapped decoder has emitted every declared byte.
    pub fn finished(&self) -> bool {
        self.decoder.finished()
    }

    /// Discard the wrapped decoder's state for reuse on a new stream. The
    /// inner sink is untouched — callers that need a fresh destination too
    /// construct a new `Hu01Writer`.
    pub fn reset(&mut self) {
        self.decoder.reset();
    }
}
