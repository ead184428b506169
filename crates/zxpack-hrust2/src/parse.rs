//! Optimal parse for the Hrust 2.1 bitstream.
//!
//! Backward dynamic programming over positions: `cost[pos]` is the
//! minimum number of stream bits needed to encode `core[pos..]`, and
//! `solution[pos]` records the operation that achieves it. The format
//! has no persistent stream state, so one cost per position suffices.

use zxpack_core::{Error, MatchFinder, Progress, Result};

use crate::cost::{self, IMPOSSIBLE, LITERAL_BITS, MAX_REF_COUNT, RAW_RUN_EXTRA_BITS};

/// A single operation of the parsed solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// One byte, copied verbatim.
    Literal,
    /// `len` bytes copied verbatim under a single prefix, `len` even.
    Raw { len: u16 },
    /// Copy `count` bytes from `dist` bytes back (`dist` negative).
    Ref { count: u16, dist: i32 },
}

/// Optimal parser over the compressible core of the input.
#[derive(Debug)]
pub struct Parser {
    finder: MatchFinder,
    cost: Vec<u32>,
    solution: Vec<Op>,
}

impl Parser {
    pub fn new(core: &[u8]) -> Self {
        let len = core.len();
        Self {
            finder: MatchFinder::new(core),
            cost: vec![0; len + 1],
            solution: vec![Op::Literal; len + 1],
        }
    }

    /// Solve every position and return the total stream bit count up to
    /// but not including the end-of-stream marker. The first byte is
    /// always emitted raw, hence the flat 8.
    pub fn run(&mut self, progress: &mut dyn Progress) -> u32 {
        let len = self.finder.input().len();
        self.cost[len] = 0;
        for pos in (1..len).rev() {
            if pos & 0x3FF == 0 {
                progress.report(len, len - pos);
            }
            self.solve_position(pos);
        }
        8 + self.cost[1]
    }

    /// The operation chosen at `pos` by the last [`run`](Self::run).
    pub fn op_at(&self, pos: usize) -> Result<Op> {
        if pos == 0 || pos >= self.solution.len() {
            return Err(Error::inconsistency(
                "parse",
                format!("operation lookup at position {pos}"),
            ));
        }
        Ok(self.solution[pos])
    }

    #[cfg(test)]
    pub fn cost_at(&self, pos: usize) -> u32 {
        self.cost[pos]
    }

    fn solve_position(&mut self, pos: usize) {
        let len = self.finder.input().len();

        let mut best = LITERAL_BITS + self.cost[pos + 1];
        let mut best_op = Op::Literal;

        for cnt in (12..=42usize).step_by(2) {
            if pos + cnt > len {
                break;
            }
            let t = RAW_RUN_EXTRA_BITS + cnt as u32 * 8 + self.cost[pos + cnt];
            if t < best {
                best = t;
                best_op = Op::Raw { len: cnt as u16 };
            }
        }

        self.cost[pos] = best;
        self.solution[pos] = best_op;

        // Backreference scan. `cnt` only grows across the distance loop:
        // each count is evaluated once, at the nearest distance reaching
        // it, and the encoded length never shrinks with farther distances.
        self.finder.compute(pos);
        let mut cnt = 0usize;
        let mut next_pos = pos;
        'dist: for k in 1..=pos {
            let dist = -(k as i32);
            let match_cnt = self.finder.match_len(dist);

            while cnt + 1 <= match_cnt {
                if next_pos >= len || cnt >= MAX_REF_COUNT {
                    break 'dist;
                }
                cnt += 1;
                next_pos += 1;

                let bits = cost::ref_bits(cnt as u16, dist);
                if bits == IMPOSSIBLE {
                    continue;
                }
                let t = bits + self.cost[next_pos];
                if t < self.cost[pos] {
                    self.cost[pos] = t;
                    self.solution[pos] = Op::Ref {
                        count: cnt as u16,
                        dist,
                    };
                }
            }
        }
    }
}
