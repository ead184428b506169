//! # zxpack
//!
//! Optimal compressors for the ZX Spectrum Hrust block formats.
//!
//! Two formats are supported, each producing a complete self-describing
//! block (header included) that the original Z80 depackers accept:
//!
//! - [`Format::Hrust1`] - the classic "HR" format with 16-bit control
//!   words and a cyclic window register gating far distances.
//! - [`Format::Hrust2`] - the "hr21" format with control bytes, graded
//!   far-distance codes and an automatic stored fallback.
//!
//! Both packers find the bit-length optimal parse by dynamic programming,
//! so the output is the smallest stream the format can express for the
//! given input. Inputs are capped at 65535 bytes by the headers' 16-bit
//! size fields.
//!
//! ## Example
//!
//! ```
//! use zxpack::{pack, Format};
//!
//! let data = b"hello hello hello hello hello hello";
//! let packed = pack(data, Format::Hrust2).unwrap();
//! assert!(packed.len() < data.len() + 8);
//! ```

pub use zxpack_core::{
    Error, Format, MatchFinder, NullProgress, Packed, Packer, Progress, Result, MAX_INPUT_SIZE,
    MIN_INPUT_SIZE, TAIL_LEN,
};
pub use zxpack_hrust1::Hrust1Packer;
pub use zxpack_hrust2::Hrust2Packer;

/// Pack `input` into a complete output block in the given format.
pub fn pack(input: &[u8], format: Format) -> Result<Packed> {
    pack_with_progress(input, format, &mut NullProgress)
}

/// Pack `input`, reporting parser progress to `progress`.
pub fn pack_with_progress(
    input: &[u8],
    format: Format,
    progress: &mut dyn Progress,
) -> Result<Packed> {
    match format {
        Format::Hrust1 => Hrust1Packer::new().pack_with_progress(input, progress),
        Format::Hrust2 => Hrust2Packer::new().pack_with_progress(input, progress),
    }
}
