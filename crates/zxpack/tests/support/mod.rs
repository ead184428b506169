//! Reference depackers used as oracles by the integration tests.
//!
//! These mirror the Z80 depacker logic byte for byte but are written for
//! clarity, not speed, and panic on malformed streams; they exist only to
//! prove the packers' output decodes back to the input.

pub mod hrust1;
pub mod hrust2;

/// Append `count` bytes copied from `dist` bytes back (dist negative),
/// one at a time so overlapping copies repeat the freshly written bytes.
pub fn copy_back(out: &mut Vec<u8>, dist: i32, count: usize) {
    assert!(dist < 0, "copy distance must be negative, got {dist}");
    for _ in 0..count {
        let src = out.len() as i32 + dist;
        assert!(src >= 0, "copy source before start of output");
        let b = out[src as usize];
        out.push(b);
    }
}
