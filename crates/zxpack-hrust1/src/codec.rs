//! Hrust 1 packer front-end.

use tracing::debug;
use zxpack_core::{
    Error, Format, NullProgress, Packed, Packer, Progress, Result, MAX_INPUT_SIZE, MIN_INPUT_SIZE,
    TAIL_LEN,
};

use crate::cost::END_MARKER_BITS;
use crate::emit::{self, HEADER_LEN};
use crate::parse::Parser;

/// Optimal packer for the Hrust 1 "HR" block format.
///
/// The format stores the last six input bytes raw after the header and
/// compresses the rest. The packed-size header field covers the whole
/// block, so it is patched in after emission.
#[derive(Debug, Default, Clone, Copy)]
pub struct Hrust1Packer;

impl Hrust1Packer {
    pub fn new() -> Self {
        Self
    }
}

impl Packer for Hrust1Packer {
    fn format(&self) -> Format {
        Format::Hrust1
    }

    fn pack(&self, input: &[u8]) -> Result<Packed> {
        self.pack_with_progress(input, &mut NullProgress)
    }

    fn pack_with_progress(&self, input: &[u8], progress: &mut dyn Progress) -> Result<Packed> {
        let n = input.len();
        if n < MIN_INPUT_SIZE {
            return Err(Error::InputTooSmall { size: n });
        }
        if n > MAX_INPUT_SIZE {
            return Err(Error::InputTooLarge { size: n });
        }

        let mut parser = Parser::new(&input[..n - TAIL_LEN]);
        let stream_bits = parser.run(progress) + END_MARKER_BITS;
        let predicted = HEADER_LEN + TAIL_LEN + (stream_bits as usize + 7) / 8;

        let mut out = emit::emit(input, &parser)?;

        // The final control word may pad up to one byte beyond the bit
        // count; anything else means the walk and the tables disagree.
        if out.len() != predicted && out.len() != predicted + 1 {
            return Err(Error::inconsistency(
                "pack",
                format!("emitted {} bytes where {} were predicted", out.len(), predicted),
            ));
        }
        if out.len() > MAX_INPUT_SIZE {
            return Err(Error::PackedTooLarge { size: out.len() });
        }

        let total = out.len() as u16;
        out[4..6].copy_from_slice(&total.to_le_bytes());

        progress.done();
        debug!(
            input_len = n,
            packed_len = out.len(),
            "packed Hrust 1 block"
        );
        Ok(Packed {
            data: out,
            stored: false,
        })
    }
}
