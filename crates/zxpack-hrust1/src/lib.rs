//! # zxpack-hrust1
//!
//! Optimal compressor for the Hrust 1 format ("HR" header), as used by
//! ZX Spectrum loaders. The bitstream interleaves data bytes with 16-bit
//! control words and carries a persistent window register D in 1..=8 that
//! gates which far reference distances are encodable; switching the
//! register costs a 13-bit escape per cyclic increment step.
//!
//! The parser performs backward dynamic programming over every position
//! and register value, so the emitted stream is bit-length minimal among
//! all legal operation sequences. See [`Hrust1Packer`].
//!
//! ## Example
//!
//! ```ignore
//! use zxpack_core::Packer;
//! use zxpack_hrust1::Hrust1Packer;
//!
//! let packed = Hrust1Packer::new().pack(data)?;
//! ```

pub mod codec;
pub mod cost;
pub mod emit;
pub mod parse;

pub use codec::Hrust1Packer;
pub use parse::{Op, Parser, INITIAL_REGISTER};
