//! Reference depacker for the Hrust 1 "HR" block format.

use super::copy_back;

/// 16-bit control words fetched eagerly: the packer reserves the next
/// word's slot the moment the previous one fills, so the reader must
/// load it at that same point, before any following data bytes.
struct BitReader<'a> {
    data: &'a [u8],
    cursor: usize,
    word: u16,
    bits_left: u32,
}

impl<'a> BitReader<'a> {
    fn new(data: &'a [u8], word_pos: usize) -> Self {
        Self {
            data,
            cursor: word_pos + 2,
            word: u16::from_le_bytes([data[word_pos], data[word_pos + 1]]),
            bits_left: 16,
        }
    }

    fn bit(&mut self) -> u32 {
        assert!(self.bits_left > 0, "read past the final control word");
        self.bits_left -= 1;
        let b = (self.word >> self.bits_left) & 1;
        if self.bits_left == 0 && self.cursor + 2 <= self.data.len() {
            self.word = u16::from_le_bytes([self.data[self.cursor], self.data[self.cursor + 1]]);
            self.cursor += 2;
            self.bits_left = 16;
        }
        b as u32
    }

    fn bits(&mut self, n: u32) -> u32 {
        let mut v = 0;
        for _ in 0..n {
            v = (v << 1) | self.bit();
        }
        v
    }

    fn byte(&mut self) -> u8 {
        let b = self.data[self.cursor];
        self.cursor += 1;
        b
    }
}

/// Decode a complete "HR" block back to the original bytes.
pub fn unpack(block: &[u8]) -> Vec<u8> {
    assert_eq!(&block[0..2], b"HR", "bad magic");
    let input_size = u16::from_le_bytes([block[2], block[3]]) as usize;
    let packed_size = u16::from_le_bytes([block[4], block[5]]) as usize;
    assert_eq!(packed_size, block.len(), "packed size field mismatch");
    let tail = &block[6..12];

    let mut r = BitReader::new(block, 12);
    let mut out: Vec<u8> = Vec::with_capacity(input_size);
    let mut reg: u32 = 2;

    let first = r.byte();
    out.push(first);

    loop {
        if r.bit() == 1 {
            let b = r.byte();
            out.push(b);
            continue;
        }
        match r.bits(2) {
            0b00 => {
                let dist = r.bits(3) as i32 - 8;
                copy_back(&mut out, dist, 1);
            }
            0b01 => match r.bits(2) {
                0b11 => {
                    let dist = r.bits(5) as i32 - 32;
                    copy_back(&mut out, dist, 2);
                }
                0b10 => {
                    let b = r.byte();
                    if b == 0xFE {
                        reg = (reg & 7) + 1;
                    } else if b >= 224 {
                        ref_insert_ref(&mut out, &mut r, rir_dist(b, 2));
                    } else {
                        copy_back(&mut out, b as i32 - 256, 2);
                    }
                }
                0b01 => {
                    let b = r.byte();
                    copy_back(&mut out, b as i32 - 512, 2);
                }
                0b00 => {
                    let b = r.byte();
                    copy_back(&mut out, b as i32 - 768, 2);
                }
                _ => unreachable!(),
            },
            0b10 => {
                long_ref(&mut out, &mut r, 3, reg);
            }
            0b11 => {
                let mut total = 3usize;
                let mut groups = 1;
                while groups < 5 {
                    let g = r.bits(2) as usize;
                    groups += 1;
                    total += g;
                    if g < 3 {
                        break;
                    }
                }
                if total == 3 {
                    if r.bit() == 1 {
                        // near ref-insert-ref
                        let dist = r.bits(4) as i32 - 16;
                        ref_insert_ref(&mut out, &mut r, dist);
                    } else if r.bit() == 1 {
                        // raw run
                        let len = r.bits(4) as usize * 2 + 12;
                        for _ in 0..len {
                            let b = r.byte();
                            out.push(b);
                        }
                    } else {
                        let v = r.bits(7) as usize;
                        if v == 15 {
                            break; // end of stream
                        }
                        let count = if v < 15 { (v << 8) | r.byte() as usize } else { v };
                        long_ref(&mut out, &mut r, count, reg);
                    }
                } else {
                    long_ref(&mut out, &mut r, total, reg);
                }
            }
            _ => unreachable!(),
        }
    }

    out.extend_from_slice(tail);
    assert_eq!(out.len(), input_size, "decoded length mismatch");
    out
}

/// Distances of references with count >= 3; `reg` high bits for the far
/// class. A distance byte >= 224 in the one-byte class is a carved-out
/// odd-distance ref-insert-ref instead.
fn long_ref(out: &mut Vec<u8>, r: &mut BitReader<'_>, count: usize, reg: u32) {
    let dist = match r.bits(2) {
        0b10 => r.bits(5) as i32 - 32,
        0b01 => {
            let b = r.byte();
            if b >= 224 {
                assert_eq!(count, 3, "odd ref-insert-ref under a non-3 count");
                ref_insert_ref(out, r, rir_dist(b, 3));
                return;
            }
            b as i32 - 256
        }
        0b00 => r.byte() as i32 - 512,
        0b11 => {
            let high = r.bits(reg) as i32 - (1 << reg);
            let low = r.byte() as i32;
            (high << 8) | low
        }
        _ => unreachable!(),
    };
    copy_back(out, dist, count);
}

/// Invert the far ref-insert-ref distance byte; `mask` is 2 for even
/// distances, 3 for odd.
fn rir_dist(b: u8, mask: i32) -> i32 {
    let t = b as i32 - 256;
    ((t * 2 + 1) ^ mask) - 15
}

/// Copy one byte from `dist` back, insert the next literal, copy the
/// byte two past the original source.
fn ref_insert_ref(out: &mut Vec<u8>, r: &mut BitReader<'_>, dist: i32) {
    copy_back(out, dist, 1);
    let b = r.byte();
    out.push(b);
    copy_back(out, dist, 1);
}
