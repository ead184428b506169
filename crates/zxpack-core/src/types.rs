//! Core type definitions for the Hrust packers.

/// Largest input either format can describe: the headers carry the input
/// size in a 16-bit field.
pub const MAX_INPUT_SIZE: usize = 0xFFFF;

/// Smallest compressible input: 6 reserved tail bytes plus at least one
/// byte of compressed stream.
pub const MIN_INPUT_SIZE: usize = 7;

/// Number of trailing input bytes that are always emitted raw, directly
/// after the header. Backreferences never reach into this region, which
/// lets the match finder run without bounds checks near the end of input.
pub const TAIL_LEN: usize = 6;

/// Target bitstream format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// Hrust 1 ("HR" header): 16-bit control words and a cyclic window
    /// register that gates far reference distances.
    Hrust1,
    /// Hrust 2.1 ("hr21" header): 8-bit control bytes, self-describing
    /// far-distance codes and a stored fallback.
    Hrust2,
}

impl Format {
    /// Get the format name as a string.
    pub fn name(self) -> &'static str {
        match self {
            Format::Hrust1 => "hrust1",
            Format::Hrust2 => "hrust2",
        }
    }

    /// Conventional file extension for packed output.
    pub fn extension(self) -> &'static str {
        match self {
            Format::Hrust1 => "HR",
            Format::Hrust2 => "hr21",
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of a packing job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packed {
    /// The complete output block, header included.
    pub data: Vec<u8>,
    /// Whether the stored (verbatim) representation was used instead of
    /// the compressed stream. Only Hrust 2 can store.
    pub stored: bool,
}

impl Packed {
    /// Total output size in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the output block is empty (never true for a successful job).
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
