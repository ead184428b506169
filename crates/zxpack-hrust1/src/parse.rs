//! Optimal parse for Hrust 1 via backward dynamic programming.
//!
//! The DP state is `(position, register)`: `cost[pos][d]` is the minimum
//! number of bits needed to encode the rest of the compressible core
//! starting at `pos`, given that the window register currently holds the
//! value with index `d`. The table is filled backward from the end of the
//! core; the emitter then reads the recorded operations forward.
//!
//! Carrying the register as DP state is what makes the result optimal: a
//! register switch costs a flat 13 bits per cyclic increment step and only
//! pays off if enough later far references amortize it, which no local
//! rule can decide.

use zxpack_core::{Error, MatchFinder, Progress, Result};

use crate::cost::{self, IMPOSSIBLE, LITERAL_BITS, MAX_REF_COUNT, RAW_RUN_EXTRA_BITS, REGISTER_STEP_BITS};

/// Number of window register values (1..=8).
pub const REGISTER_COUNT: usize = 8;

/// Register value the depacker starts with.
pub const INITIAL_REGISTER: u8 = 2;

/// One operation of the parse, as recorded per `(position, register)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// Copy one input byte verbatim.
    Literal,
    /// Copy a run of 12..=42 (even) input bytes verbatim.
    Raw { len: u16 },
    /// Copy `count` bytes from `dist` bytes behind, after switching the
    /// window register to `reg`. Counts 1 and 2 never touch the register.
    Ref { count: u16, dist: i32, reg: u8 },
    /// Copy one byte from `dist` behind, insert one literal, copy one
    /// more byte from the same source offset (+2).
    RefInsertRef { dist: i32 },
}

/// Backward-DP parser for one compression job.
///
/// Owns the match finder and the cost/solution tables; construct one per
/// job over the compressible core (input without the reserved tail).
#[derive(Debug)]
pub struct Parser {
    finder: MatchFinder,
    cost: Vec<[u32; REGISTER_COUNT]>,
    solution: Vec<[Op; REGISTER_COUNT]>,
}

impl Parser {
    /// Create a parser over the compressible core bytes.
    pub fn new(core: &[u8]) -> Self {
        let len = core.len();
        Self {
            finder: MatchFinder::new(core),
            cost: vec![[IMPOSSIBLE; REGISTER_COUNT]; len + 1],
            solution: vec![[Op::Literal; REGISTER_COUNT]; len + 1],
        }
    }

    /// Run the dynamic program.
    ///
    /// Returns the total stream length in bits for the whole core,
    /// including the 8 bits of the always-raw first byte but not the
    /// end-of-stream marker.
    pub fn run(&mut self, progress: &mut dyn Progress) -> u32 {
        let len = self.finder.len();
        self.cost[len] = [0; REGISTER_COUNT];

        for pos in (1..len).rev() {
            if pos & 0x1FF == 0 {
                progress.report(len, len - pos);
            }
            self.solve_position(pos);
        }

        8 + self.cost[1][(INITIAL_REGISTER - 1) as usize]
    }

    /// The operation recorded for `pos` under register value `reg`.
    pub fn op_at(&self, pos: usize, reg: u8) -> Result<Op> {
        let len = self.finder.len();
        if pos < 1 || pos >= len {
            return Err(Error::inconsistency(
                "parse",
                format!("operation lookup at position {pos} outside 1..{len}"),
            ));
        }
        if !(INITIAL_REGISTER..=8).contains(&reg) {
            return Err(Error::inconsistency(
                "parse",
                format!("operation lookup with register {reg}"),
            ));
        }
        Ok(self.solution[pos][(reg - 1) as usize])
    }

    /// Remaining-bits cost at `pos` under register value `reg` (tests).
    #[cfg(test)]
    pub fn cost_at(&self, pos: usize, reg: u8) -> u32 {
        self.cost[pos][(reg - 1) as usize]
    }

    fn solve_position(&mut self, pos: usize) {
        let len = self.finder.len();

        // Candidates whose cost does not depend on the backreference
        // machinery: literal, raw run, ref-insert-ref.
        let rir_dist = self.find_rir_source(pos);
        for d in (INITIAL_REGISTER - 1) as usize..REGISTER_COUNT {
            let mut best = LITERAL_BITS + self.cost[pos + 1][d];
            let mut best_op = Op::Literal;

            for i in 0..16usize {
                let cnt = i * 2 + 12;
                if pos + cnt > len {
                    break;
                }
                let t = RAW_RUN_EXTRA_BITS + cnt as u32 * 8 + self.cost[pos + cnt][d];
                if t < best {
                    best = t;
                    best_op = Op::Raw { len: cnt as u16 };
                }
            }

            if let Some(dist) = rir_dist {
                let t = cost::rir_bits(dist) + self.cost[pos + 3][d];
                if t < best {
                    best = t;
                    best_op = Op::RefInsertRef { dist };
                }
            }

            self.cost[pos][d] = best;
            self.solution[pos][d] = best_op;
        }

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

                if cnt < 3 {
                    // Short codes never touch the register.
                    for reg in INITIAL_REGISTER..=8u8 {
                        let d = (reg - 1) as usize;
                        let bits = cost::ref_bits(cnt as u16, dist, reg);
                        let t = bits + self.cost[next_pos][d];
                        if t < self.cost[pos][d] {
                            self.cost[pos][d] = t;
                            self.solution[pos][d] = Op::Ref {
                                count: cnt as u16,
                                dist,
                                reg,
                            };
                        }
                    }
                    continue;
                }

                // Every target register is explored; the switch surcharge
                // is 13 bits per cyclic increment step from the current
                // register to the target.
                for new_reg in INITIAL_REGISTER..=8u8 {
                    let bits = cost::ref_bits(cnt as u16, dist, new_reg);
                    let with_continuation = bits + self.cost[next_pos][(new_reg - 1) as usize];
                    for reg in INITIAL_REGISTER..=8u8 {
                        let steps = (new_reg.wrapping_sub(reg) & 7) as u32;
                        let t = steps * REGISTER_STEP_BITS + with_continuation;
                        let d = (reg - 1) as usize;
                        if t < self.cost[pos][d] {
                            self.cost[pos][d] = t;
                            self.solution[pos][d] = Op::Ref {
                                count: cnt as u16,
                                dist,
                                reg: new_reg,
                            };
                        }
                    }
                }
            }
        }
    }

    /// Nearest earlier position whose byte matches at relative offsets 0
    /// and 2, within the ref-insert-ref distance limit. Nearest wins.
    fn find_rir_source(&self, pos: usize) -> Option<i32> {
        let input = self.finder.input();
        if pos + 3 > input.len() {
            return None;
        }
        for copy_pos in (0..pos).rev() {
            let dist = copy_pos as i32 - pos as i32;
            if dist < -79 {
                return None;
            }
            if input[copy_pos] == input[pos] && input[copy_pos + 2] == input[pos + 2] {
                return Some(dist);
            }
        }
        None
    }
}
