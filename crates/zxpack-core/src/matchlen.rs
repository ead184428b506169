//! Longest-match tables via the Z-function.
//!
//! For a fixed anchor position the parsers need, for every backward
//! distance, the length of the longest run that matches the bytes at the
//! anchor. Instead of pairwise byte comparisons this is computed in one
//! linear pass: the window `input[pos..] ++ input[..]` (a second copy of
//! the input appended so that backward distances map to valid indices) is
//! fed to the Z-function, which yields for every offset the length of the
//! longest common prefix with the window itself. The offset `len - k` then
//! corresponds exactly to backward distance `-k`.
//!
//! The table depends on the anchor, so it is recomputed per position; with
//! the 65535-byte input ceiling the resulting O(n^2) total is acceptable.

/// Z-function match finder over a fixed input buffer.
///
/// One instance is owned by a single parsing job. `compute` fills the
/// table for an anchor position; `match_len` reads it.
#[derive(Debug)]
pub struct MatchFinder {
    /// The input followed by a second copy of itself.
    doubled: Vec<u8>,
    /// Length of the (single) input.
    len: usize,
    /// Z-values for the current anchor. `z[0]` is unused.
    z: Vec<u32>,
}

impl MatchFinder {
    /// Create a match finder over `input` (the compressible core of the
    /// buffer, i.e. without the reserved tail bytes).
    pub fn new(input: &[u8]) -> Self {
        let len = input.len();
        let mut doubled = Vec::with_capacity(len * 2);
        doubled.extend_from_slice(input);
        doubled.extend_from_slice(input);
        Self {
            doubled,
            len,
            z: vec![0; len.max(1)],
        }
    }

    /// Length of the underlying input.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the underlying input is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The input bytes (single copy).
    pub fn input(&self) -> &[u8] {
        &self.doubled[..self.len]
    }

    /// Recompute the match table for the window anchored at `pos`.
    pub fn compute(&mut self, pos: usize) {
        debug_assert!(pos < self.len);

        // Window: the suffix at `pos` followed by the whole input again.
        let n = 2 * self.len - pos;
        let s = &self.doubled[pos..];
        let z = &mut self.z;

        let mut l = 0usize;
        let mut r = 0usize;
        for i in 1..self.len {
            let mut zi = if i > r {
                0
            } else {
                (z[i - l] as usize).min(r + 1 - i)
            };
            while i + zi < n && s[i + zi] == s[zi] {
                zi += 1;
            }
            if i + zi - 1 > r {
                r = i + zi - 1;
                l = i;
            }
            z[i] = zi as u32;
        }
    }

    /// Longest match at the most recent anchor for the negative backward
    /// distance `dist` (`-pos <= dist <= -1`).
    #[inline]
    pub fn match_len(&self, dist: i32) -> usize {
        debug_assert!(dist < 0);
        self.z[(self.len as i32 + dist) as usize] as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Byte-by-byte reference: longest run at `pos` matching `pos - k`,
    /// capped at the end of input (the parsers never grow a match past it).
    fn naive_match_len(input: &[u8], pos: usize, k: usize) -> usize {
        let cap = input.len() - pos;
        let mut n = 0;
        while n < cap && input[pos + n] == input[pos - k + n] {
            n += 1;
        }
        n
    }

    fn check_all_positions(input: &[u8]) {
        let mut finder = MatchFinder::new(input);
        for pos in 1..input.len() {
            finder.compute(pos);
            let cap = input.len() - pos;
            for k in 1..=pos {
                let got = finder.match_len(-(k as i32)).min(cap);
                let want = naive_match_len(input, pos, k);
                assert_eq!(
                    got, want,
                    "pos {pos} dist -{k}: finder said {got}, reference {want}"
                );
            }
        }
    }

    #[test]
    fn repeating_pattern() {
        check_all_positions(b"abcabcabcabc");
    }

    #[test]
    fn all_same_byte() {
        check_all_positions(&[0x55; 40]);
    }

    #[test]
    fn no_repeats() {
        check_all_positions(b"abcdefghijklmnop");
    }

    #[test]
    fn mixed_content() {
        check_all_positions(b"the rain in spain stays mainly in the plain");
    }

    #[test]
    fn overlapping_match_is_found() {
        // Distance 1 in a run of identical bytes: the match overlaps its
        // own output, which the format allows.
        let input = [7u8; 16];
        let mut finder = MatchFinder::new(&input);
        finder.compute(8);
        assert!(finder.match_len(-1) >= 8);
    }

    #[test]
    fn single_byte_core() {
        // A 7-byte input leaves a 1-byte core; nothing to compute, but
        // construction must work.
        let finder = MatchFinder::new(&[42]);
        assert_eq!(finder.len(), 1);
    }
}
