//! Error types for packing operations.

use thiserror::Error;

use crate::types::{MAX_INPUT_SIZE, MIN_INPUT_SIZE};

/// Result type alias for packing operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Packing error types.
#[derive(Debug, Error)]
pub enum Error {
    /// Input is shorter than the smallest compressible size.
    ///
    /// The formats reserve the last 6 input bytes as raw tail bytes and
    /// always copy the first byte verbatim, so anything below 7 bytes has
    /// no room for a compressed stream at all.
    #[error("input of {size} bytes is too small to compress (minimum is {MIN_INPUT_SIZE})")]
    InputTooSmall { size: usize },

    /// Input exceeds the 16-bit size field of the headers.
    #[error("input of {size} bytes exceeds the {MAX_INPUT_SIZE}-byte format limit")]
    InputTooLarge { size: usize },

    /// The packed stream does not fit the 16-bit packed-size header field.
    #[error("packed size {size} does not fit the 16-bit header field")]
    PackedTooLarge { size: usize },

    /// An internal invariant of the parser or emitter was violated.
    ///
    /// This is a programming-contract failure (for example the emitted
    /// size disagreeing with the size the parser predicted), never a
    /// property of the input. It aborts the job and is not recoverable.
    #[error("internal consistency violation in {stage}: {message}")]
    Inconsistency {
        stage: &'static str,
        message: String,
    },

    /// I/O error from the surrounding driver.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an internal-consistency error for the given pipeline stage.
    pub fn inconsistency(stage: &'static str, message: impl Into<String>) -> Self {
        Error::Inconsistency {
            stage,
            message: message.into(),
        }
    }
}
