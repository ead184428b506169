//! Bit-exact serialization of the Hrust 2.1 stream.
//!
//! Control units are single bytes placed lazily: a slot is appended the
//! moment the first bit of a new unit is written, never ahead of time,
//! so a partially filled trailing byte is the only padding the stream
//! ever carries. Bits accumulate MSB-first.

use zxpack_core::{Error, Result, TAIL_LEN};

use crate::parse::{Op, Parser};

/// Header length: "hr21", input size, packed size.
pub const HEADER_LEN: usize = 8;

/// Stored-mode marker replacing the '1' in the header magic.
pub const STORED_MARKER: u8 = b'1' + 0x80;

/// Interleaved byte/control-byte output stream.
#[derive(Debug)]
struct BitFlow {
    out: Vec<u8>,
    ctrl_pos: usize,
    /// Bits still free in the open control byte, 0 when none is open.
    ctrl_free: u32,
}

impl BitFlow {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            out: Vec::with_capacity(capacity),
            ctrl_pos: 0,
            ctrl_free: 0,
        }
    }

    #[inline]
    fn byte(&mut self, b: u8) {
        self.out.push(b);
    }

    #[inline]
    fn bit(&mut self, bit: u32) {
        if self.ctrl_free == 0 {
            self.ctrl_pos = self.out.len();
            self.out.push(0);
            self.ctrl_free = 8;
        }
        self.out[self.ctrl_pos] = (self.out[self.ctrl_pos] << 1) | (bit & 1) as u8;
        self.ctrl_free -= 1;
    }

    /// Write the low `n` bits of `value`, most significant first.
    fn bits_msb(&mut self, value: u32, n: u32) {
        for i in (0..n).rev() {
            self.bit(value >> i);
        }
    }

    /// Left-align the open control byte; zero bits pad the remainder.
    fn finalize(&mut self) {
        if self.ctrl_free != 0 {
            self.out[self.ctrl_pos] <<= self.ctrl_free;
        }
    }
}

/// Serialize `input` as a stored block: header with the stored marker,
/// both size fields set to the input length, then the raw bytes.
pub fn emit_stored(input: &[u8]) -> Vec<u8> {
    let n = input.len() as u16;
    let mut out = Vec::with_capacity(input.len() + HEADER_LEN);
    out.extend_from_slice(b"hr2");
    out.push(STORED_MARKER);
    out.extend_from_slice(&n.to_le_bytes());
    out.extend_from_slice(&n.to_le_bytes());
    out.extend_from_slice(input);
    out
}

/// Serialize the parsed solution for `input` into a complete compressed
/// block. `packed_size` is the already-known total block length; the
/// header field carries it minus the header itself.
pub fn emit(input: &[u8], parser: &Parser, packed_size: usize) -> Result<Vec<u8>> {
    let n = input.len();
    let end_pos = n - TAIL_LEN;
    let mut f = BitFlow::with_capacity(packed_size);

    f.byte(b'h');
    f.byte(b'r');
    f.byte(b'2');
    f.byte(b'1');
    f.byte(n as u8);
    f.byte((n >> 8) as u8);
    let body = (packed_size - HEADER_LEN) as u16;
    f.byte(body as u8);
    f.byte((body >> 8) as u8);

    for &b in &input[n - TAIL_LEN..] {
        f.byte(b);
    }

    let mut pos = 0usize;
    f.byte(input[pos]); // first byte is always raw
    pos += 1;

    while pos != end_pos {
        if pos > end_pos {
            return Err(Error::inconsistency(
                "emit",
                format!("operation walk overshot the core at position {pos}"),
            ));
        }

        match parser.op_at(pos)? {
            Op::Literal => {
                f.bit(1);
                f.byte(input[pos]);
                pos += 1;
            }
            Op::Raw { len } => {
                if !(12..=42).contains(&len) || len % 2 != 0 {
                    return Err(Error::inconsistency("emit", format!("raw run of {len} bytes")));
                }
                f.bits_msb(0b011000, 6);
                f.bits_msb(((len - 12) / 2) as u32, 4);
                for _ in 0..len {
                    f.byte(input[pos]);
                    pos += 1;
                }
            }
            Op::Ref { count, dist } => {
                if dist >= 0 {
                    return Err(Error::inconsistency(
                        "emit",
                        format!("non-negative reference distance {dist}"),
                    ));
                }
                if count >= 3 {
                    f.bit(0);
                    emit_large_count(&mut f, count)?;
                    emit_long_dist(&mut f, dist)?;
                } else if count == 2 {
                    if dist < -256 {
                        return Err(Error::inconsistency(
                            "emit",
                            format!("two-byte reference at distance {dist}"),
                        ));
                    }
                    f.bits_msb(0b001, 3);
                    f.byte(dist as u8);
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

    // End-of-stream marker: the count escape with a zero byte.
    f.bits_msb(0b011001, 6);
    f.byte(0);

    f.finalize();
    Ok(f.out)
}

/// Counts 3 and up: 2-bit code, base-3 digit groups, or the byte escape.
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
        f.bits_msb(0b11001, 5);
        if cnt < 256 {
            f.byte(cnt as u8);
        } else {
            if cnt > 0xFFF {
                return Err(Error::inconsistency("emit", format!("count {cnt} above cap")));
            }
            f.byte((cnt >> 8) as u8);
            f.byte(cnt as u8);
        }
    }
    Ok(())
}

/// Distances of references with count >= 3: the high byte picks one of
/// six classes, the low byte always follows.
fn emit_long_dist(f: &mut BitFlow, dist: i32) -> Result<()> {
    if dist >= 0 || dist < -65535 {
        return Err(Error::inconsistency(
            "emit",
            format!("reference distance {dist} out of range"),
        ));
    }
    let high = dist >> 8;
    if high == -1 {
        f.bit(1);
    } else {
        f.bit(0);
        if high >= -3 {
            f.bit(1);
            f.bit(1);
            f.bit(!high as u32);
        } else if high >= -7 {
            f.bit(1);
            f.bit(0);
            f.bits_msb((high + 3) as u32, 2);
        } else if high >= -15 {
            f.bit(0);
            f.bit(1);
            f.bits_msb((high + 7) as u32, 3);
        } else {
            f.bit(0);
            f.bit(0);
            if high >= -30 {
                f.bits_msb((high + 15) as u32, 4);
            } else {
                f.bits_msb(0, 4);
                f.byte(high as u8);
            }
        }
    }
    f.byte(dist as u8);
    Ok(())
}
