//! Hrust 2.1 packer front-end with automatic stored fallback.

use tracing::debug;
use zxpack_core::{
    Error, Format, NullProgress, Packed, Packer, Progress, Result, MAX_INPUT_SIZE, MIN_INPUT_SIZE,
    TAIL_LEN,
};

use crate::cost::END_MARKER_BITS;
use crate::emit::{self, HEADER_LEN};
use crate::parse::Parser;

/// Optimal packer for the Hrust 2.1 "hr21" block format.
///
/// Inputs below 7 bytes have no room for a compressed stream and are
/// always stored. Larger inputs are compressed first; the stored form
/// wins whenever it is no larger, or when the compressed block would
/// overflow the 16-bit packed-size field.
#[derive(Debug, Default, Clone, Copy)]
pub struct Hrust2Packer;

impl Hrust2Packer {
    pub fn new() -> Self {
        Self
    }
}

impl Packer for Hrust2Packer {
    fn format(&self) -> Format {
        Format::Hrust2
    }

    fn pack(&self, input: &[u8]) -> Result<Packed> {
        self.pack_with_progress(input, &mut NullProgress)
    }

    fn pack_with_progress(&self, input: &[u8], progress: &mut dyn Progress) -> Result<Packed> {
        let n = input.len();
        if n > MAX_INPUT_SIZE {
            return Err(Error::InputTooLarge { size: n });
        }

        if n < MIN_INPUT_SIZE {
            progress.done();
            debug!(input_len = n, "stored Hrust 2.1 block (input below minimum)");
            return Ok(Packed {
                data: emit::emit_stored(input),
                stored: true,
            });
        }

        let mut parser = Parser::new(&input[..n - TAIL_LEN]);
        let stream_bits = parser.run(progress) + END_MARKER_BITS;
        let compressed_size = HEADER_LEN + TAIL_LEN + (stream_bits as usize + 7) / 8;
        let stored_size = HEADER_LEN + n;

        if stored_size <= compressed_size || compressed_size > MAX_INPUT_SIZE {
            progress.done();
            debug!(
                input_len = n,
                compressed_size, "stored Hrust 2.1 block (compression did not pay)"
            );
            return Ok(Packed {
                data: emit::emit_stored(input),
                stored: true,
            });
        }

        let out = emit::emit(input, &parser, compressed_size)?;
        if out.len() != compressed_size {
            return Err(Error::inconsistency(
                "pack",
                format!(
                    "emitted {} bytes where exactly {} were predicted",
                    out.len(),
                    compressed_size
                ),
            ));
        }

        progress.done();
        debug!(
            input_len = n,
            packed_len = out.len(),
            "packed Hrust 2.1 block"
        );
        Ok(Packed {
            data: out,
            stored: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn tiny_input_is_stored() {
        let packed = Hrust2Packer::new().pack(b"abc").unwrap();
        assert!(packed.stored);
        assert_eq!(packed.data.len(), 3 + HEADER_LEN);
    }

    #[test]
    fn rejects_oversized_input() {
        let err = Hrust2Packer::new().pack(&vec![0u8; 0x10000]).unwrap_err();
        assert!(matches!(err, Error::InputTooLarge { .. }));
    }

    #[test]
    fn compressible_input_compresses() {
        let input = vec![7u8; 2000];
        let packed = Hrust2Packer::new().pack(&input).unwrap();
        assert!(!packed.stored);
        assert!(packed.data.len() < input.len());
        assert_eq!(&packed.data[0..4], b"hr21");
    }

    #[test]
    fn incompressible_input_falls_back_to_stored() {
        // Uniform random bytes; anything with arithmetic structure (a
        // multiplicative hash of the index, say) has long-period
        // regularities the parser finds and compresses.
        let mut rng = StdRng::seed_from_u64(21);
        let input: Vec<u8> = (0..1000).map(|_| rng.gen()).collect();
        let packed = Hrust2Packer::new().pack(&input).unwrap();
        assert!(packed.stored);
        assert_eq!(packed.data.len(), input.len() + HEADER_LEN);
        assert_eq!(packed.data[3], emit::STORED_MARKER);
    }

    #[test]
    fn packed_size_field_excludes_header() {
        let input = b"yadda yadda yadda yadda yadda yadda";
        let packed = Hrust2Packer::new().pack(input).unwrap();
        assert!(!packed.stored);
        let body = u16::from_le_bytes([packed.data[6], packed.data[7]]);
        assert_eq!(body as usize, packed.data.len() - HEADER_LEN);
    }
}
