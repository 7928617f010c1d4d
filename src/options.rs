//! Tunable capacity hints for a [`crate::Hu01Decoder`].
//!
//! Mirrors the role of a packer's options struct: nothing here changes
//! decode *semantics*, only how eagerly the internal buffers preallocate.

/// Construction-time sizing hints. All fields are advisory; a decoder
/// built with the wrong guess still works, it just reallocates more.
#[derive(Debug, Clone, Copy)]
pub struct DecoderOptions {
    /// Initial capacity reserved for the not-yet-consumed compressed-input
    /// accumulator.
    pub initial_input_capacity: usize,
    /// Initial capacity reserved for the pending-decoded-output queue.
    pub initial_output_capacity: usize,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            initial_input_capacity: 8 * 1024,
            initial_output_capacity: 64 * 1024,
        }
    }
}
