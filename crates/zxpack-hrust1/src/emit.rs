//! Bit-exact serialization of the Hrust 1 stream.
//!
//! The stream interleaves plain data bytes with 16-bit control words.
//! A control word's slot is reserved in the output the moment the
//! previous word fills up, and later data bytes are written after it;
//! the depacker's cursor lands on the slot exactly when it runs out of
//! control bits. Bits accumulate MSB-first within a word; words are
//! stored little-endian.
//!
//! After the end-of-stream marker the last word is padded with zero bits,
//! or dropped entirely if it never received a bit.

use zxpack_core::{Error, Result, TAIL_LEN};

use crate::parse::{Op, Parser, INITIAL_REGISTER};

/// Header length: "HR", input size, packed size (patched by the codec).
pub const HEADER_LEN: usize = 6;

/// Interleaved byte/control-word output stream.
#[derive(Debug)]
struct BitFlow {
    out: Vec<u8>,
    /// Offset of the control word currently being filled.
    ctrl_pos: usize,
    /// Bits already in that word, 0..=15.
    ctrl_bits: u32,
}

impl BitFlow {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            out: Vec::with_capacity(capacity),
            ctrl_pos: 0,
            ctrl_bits: 0,
        }
    }

    #[inline]
    fn byte(&mut self, b: u8) {
        self.out.push(b);
    }

    /// Reserve a fresh control-word slot at the current output position.
    fn open_word(&mut self) {
        self.ctrl_pos = self.out.len();
        self.out.push(0);
        self.out.push(0);
        self.ctrl_bits = 0;
    }

    #[inline]
    fn bit(&mut self, bit: u32) {
        let word = u16::from_le_bytes([self.out[self.ctrl_pos], self.out[self.ctrl_pos + 1]]);
        let word = (word << 1) | (bit & 1) as u16;
        self.out[self.ctrl_pos..self.ctrl_pos + 2].copy_from_slice(&word.to_le_bytes());
        self.ctrl_bits += 1;
        if self.ctrl_bits == 16 {
            self.open_word();
        }
    }

    /// Write the low `n` bits of `value`, most significant first.
    fn bits_msb(&mut self, value: u32, n: u32) {
        for i in (0..n).rev() {
            self.bit(value >> i);
        }
    }

    /// Pad the last control word with zero bits, or drop it if empty.
    fn finalize(&mut self) -> Result<()> {
        if self.ctrl_bits == 0 {
            if self.ctrl_pos != self.out.len() - 2 {
                return Err(Error::inconsistency(
                    "emit",
                    "empty trailing control word is not at the end of the stream",
                ));
            }
            self.out.truncate(self.out.len() - 2);
        } else {
            let word = u16::from_le_bytes([self.out[self.ctrl_pos], self.out[self.ctrl_pos + 1]]);
            let word = word << (16 - self.ctrl_bits);
            self.out[self.ctrl_pos..self.ctrl_pos + 2].copy_from_slice(&word.to_le_bytes());
        }
        Ok(())
    }
}

/// Serialize the parsed solution for `input` into a complete Hrust 1
/// block. The packed-size header field is left zero for the codec to
/// patch once the total is known.
pub fn emit(input: &[u8], parser: &Parser) -> Result<Vec<u8>> {
    let n = input.len();
    let end_pos = n - TAIL_LEN;
    let mut f = BitFlow::with_capacity(n + n / 20 + 100);

    f.byte(b'H');
    f.byte(b'R');
    f.byte(n as u8);
    f.byte((n >> 8) as u8);
    f.byte(0); // placeholder for
    f.byte(0); // the packed size

    for &b in &input[n - TAIL_LEN..] {
        f.byte(b);
    }

    f.open_word();

    let mut pos = 0usize;
    f.byte(input[pos]); // first byte is always raw
    pos += 1;

    let mut reg = INITIAL_REGISTER;

    while pos != end_pos {
        if pos > end_pos {
            return Err(Error::inconsistency(
                "emit",
                format!("operation walk overshot the core at position {pos}"),
            ));
        }

        match parser.op_at(pos, reg)? {
            Op::Literal => {
                f.bit(1);
                f.byte(input[pos]);
                pos += 1;
            }
            Op::Raw { len } => {
                if !(12..=42).contains(&len) || len % 2 != 0 {
                    return Err(Error::inconsistency("emit", format!("raw run of {len} bytes")));
                }
                f.bits_msb(0b0110001, 7);
                f.bits_msb(((len - 12) / 2) as u32, 4);
                for _ in 0..len {
                    f.byte(input[pos]);
                    pos += 1;
                }
            }
            Op::RefInsertRef { dist } => {
                emit_rir(&mut f, dist)?;
                f.byte(input[pos + 1]);
                pos += 3;
            }
            Op::Ref { count, dist, reg: target } => {
                if dist >= 0 {
                    return Err(Error::inconsistency(
                        "emit",
                        format!("non-negative reference distance {dist}"),
                    ));
                }
                if count >= 3 {
                    if !(1..=8).contains(&target) {
                        return Err(Error::inconsistency(
                            "emit",
                            format!("register target {target} out of range"),
                        ));
                    }
                    while reg != target {
                        reg = (reg & 7) + 1;
                        f.bits_msb(0b00110, 5);
                        f.byte(0xFE);
                    }
                    f.bit(0);
                    emit_large_count(&mut f, count)?;
                    emit_long_dist(&mut f, dist, reg)?;
                } else if count == 2 {
                    emit_pair(&mut f, dist)?;
                } else if count == 1 {
                    if dist < -8 {
                        return Err(Error::inconsistency(
                            "emit",
                            format!("single-byte reference at distance {dist}"),
                        ));
                    }
                    f.bits_msb(0b000, 3);
                    f.bits_msb(dist as u32, 3);
                } else {
                    return Err(Error::inconsistency("emit", "zero-length reference"));
                }
                pos += count as usize;
            }
        }
    }

    // End-of-stream marker: the count escape with the reserved code 15.
    f.bits_msb(0b0110000, 7);
    f.bits_msb(15, 7);

    f.finalize()?;
    Ok(f.out)
}

/// Ref-insert-ref: three encodings by distance range and parity.
fn emit_rir(f: &mut BitFlow, dist: i32) -> Result<()> {
    if !(-79..0).contains(&dist) {
        return Err(Error::inconsistency(
            "emit",
            format!("ref-insert-ref distance {dist} out of range"),
        ));
    }
    f.bit(0);
    if dist >= -16 {
        f.bits_msb(0b11001, 5);
        f.bits_msb(dist as u32, 4);
    } else if dist & 1 == 0 {
        f.bits_msb(0b0110, 4);
        let t = (((dist + 15) ^ 2) - 1) >> 1;
        f.byte(t as u8);
    } else {
        f.bits_msb(0b1001, 4);
        let t = (((dist + 15) ^ 3) - 1) >> 1;
        f.byte(t as u8);
    }
    Ok(())
}

/// Two-byte reference: 3-bit prefix + four distance classes.
fn emit_pair(f: &mut BitFlow, dist: i32) -> Result<()> {
    f.bits_msb(0b001, 3);
    if dist >= -32 {
        f.bits_msb(0b11, 2);
        f.bits_msb(dist as u32, 5);
    } else if dist >= -256 {
        f.bits_msb(0b10, 2);
        f.byte(dist as u8);
    } else if dist >= -512 {
        f.bits_msb(0b01, 2);
        f.byte(dist as u8);
    } else if dist >= -768 {
        f.bits_msb(0b00, 2);
        f.byte(dist as u8);
    } else {
        return Err(Error::inconsistency(
            "emit",
            format!("two-byte reference at distance {dist}"),
        ));
    }
    Ok(())
}

/// Counts 3 and up: 2-bit code, base-3 digit groups, or the 7-bit escape.
fn emit_large_count(f: &mut BitFlow, count: u16) -> Result<()> {
    let mut cnt = count as i32;
    if cnt < 3 {
        return Err(Error::inconsistency("emit", format!("large count {cnt}")));
    }
    if cnt == 3 {
        f.bit(1);
        f.bit(0);
    } else if cnt < 16 {
        let mut i = 0;
        while i < 5 && cnt >= 0 {
            let t = cnt.min(3);
            f.bit((t >> 1) as u32);
            f.bit(t as u32);
            cnt -= 3;
            i += 1;
        }
    } else {
        f.bits_msb(0b110000, 6);
        if cnt < 128 {
            f.bits_msb(cnt as u32, 7);
        } else {
            if cnt > 0xEFF {
                return Err(Error::inconsistency("emit", format!("count {cnt} above cap")));
            }
            f.bits_msb((cnt >> 8) as u32, 7);
            f.byte(cnt as u8);
        }
    }
    Ok(())
}

/// Distances of references with count >= 3. Far distances spend `reg`
/// high bits, so the register must already hold the operation's target.
fn emit_long_dist(f: &mut BitFlow, dist: i32, reg: u8) -> Result<()> {
    if dist >= 0 || dist < -65535 {
        return Err(Error::inconsistency(
            "emit",
            format!("reference distance {dist} out of range"),
        ));
    }
    if dist >= -32 {
        f.bit(1);
        f.bit(0);
        f.bits_msb(dist as u32, 5);
    } else if dist >= -256 {
        f.bit(0);
        f.bit(1);
        f.byte(dist as u8);
    } else if dist >= -512 {
        f.bit(0);
        f.bit(0);
        f.byte(dist as u8);
    } else {
        let high = dist >> 8;
        if !(2..=8).contains(&reg) || high < -(1i32 << reg) {
            return Err(Error::inconsistency(
                "emit",
                format!("distance {dist} not expressible under register {reg}"),
            ));
        }
        f.bit(1);
        f.bit(1);
        f.bits_msb(high as u32, reg as u32);
        f.byte(dist as u8);
    }
    Ok(())
}
