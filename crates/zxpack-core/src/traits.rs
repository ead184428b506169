//! The packing trait implemented by each codec crate.

use crate::error::Result;
use crate::progress::Progress;
use crate::types::{Format, Packed};

/// One-shot packing into a complete Hrust output block.
///
/// Packers are cheap value types constructed per job; all working state
/// lives inside the call and is discarded when it returns.
pub trait Packer {
    /// The bitstream format this packer produces.
    fn format(&self) -> Format;

    /// Upper bound on the output size for an input of `input_len` bytes.
    ///
    /// Useful for pre-allocating output buffers. The bound is loose; the
    /// parsers never let the stream expand beyond roughly 5% plus a small
    /// constant even for incompressible data.
    fn max_packed_size(&self, input_len: usize) -> usize {
        input_len + input_len / 20 + 100
    }

    /// Pack `input` into a complete output block (header included).
    fn pack(&self, input: &[u8]) -> Result<Packed>;

    /// Pack `input`, reporting parser progress to `progress`.
    fn pack_with_progress(&self, input: &[u8], progress: &mut dyn Progress) -> Result<Packed>;
}
