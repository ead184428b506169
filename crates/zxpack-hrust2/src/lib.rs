//! # zxpack-hrust2
//!
//! Optimal compressor for the Hrust 2.1 format ("hr21" header). Compared
//! to its predecessor the bitstream drops the window register and the
//! ref-insert-ref operation, switches from 16-bit control words to lazily
//! placed control bytes, and adds a stored mode for incompressible or
//! tiny inputs.
//!
//! The parser performs backward dynamic programming over positions alone,
//! so the emitted stream is bit-length minimal among all legal operation
//! sequences, and the packed size is known exactly before emission.
//! See [`Hrust2Packer`].

pub mod codec;
pub mod cost;
pub mod emit;
pub mod parse;

pub use codec::Hrust2Packer;
pub use parse::{Op, Parser};
