//! # zxpack-core
//!
//! Core types, traits and the shared match finder for the zxpack
//! Hrust compressors.
//!
//! The Hrust formats were designed for the ZX Spectrum, so every limit in
//! here is small by modern standards: inputs are capped at 65535 bytes and
//! the last 6 bytes of every input are reserved as raw tail bytes that the
//! packers never reference.
//!
//! ## Contents
//!
//! - [`Error`] / [`Result`] - error type shared by all codec crates
//! - [`Format`], [`Packed`] and the size limits
//! - [`Packer`] - one-shot compression trait implemented by each codec
//! - [`Progress`] - fire-and-forget progress reporting
//! - [`MatchFinder`] - Z-function longest-match tables for the parsers

pub mod error;
pub mod matchlen;
pub mod progress;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
pub use matchlen::MatchFinder;
pub use progress::{NullProgress, Progress};
pub use traits::Packer;
pub use types::{Format, Packed, MAX_INPUT_SIZE, MIN_INPUT_SIZE, TAIL_LEN};
