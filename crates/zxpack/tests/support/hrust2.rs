//! Reference depacker for the Hrust 2.1 "hr21" block format.

use super::copy_back;

/// Control bytes fetched lazily, mirroring the packer's lazy slot
/// placement: the next control byte is loaded only when a bit is
/// actually demanded.
struct BitReader<'a> {
    data: &'a [u8],
    cursor: usize,
    ctrl: u8,
    bits_left: u32,
}

impl<'a> BitReader<'a> {
    fn new(data: &'a [u8], cursor: usize) -> Self {
        Self {
            data,
            cursor,
            ctrl: 0,
            bits_left: 0,
        }
    }

    fn bit(&mut self) -> u32 {
        if self.bits_left == 0 {
            self.ctrl = self.data[self.cursor];
            self.cursor += 1;
            self.bits_left = 8;
        }
        self.bits_left -= 1;
        ((self.ctrl >> self.bits_left) & 1) as u32
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

/// Decode a complete "hr21" block (stored or compressed) back to the
/// original bytes.
pub fn unpack(block: &[u8]) -> Vec<u8> {
    assert_eq!(&block[0..3], b"hr2", "bad magic");
    let input_size = u16::from_le_bytes([block[4], block[5]]) as usize;
    let body_size = u16::from_le_bytes([block[6], block[7]]) as usize;

    if block[3] == b'1' + 0x80 {
        // stored block: both size fields hold the input size
        assert_eq!(body_size, input_size, "stored size fields disagree");
        assert_eq!(block.len(), input_size + 8);
        return block[8..].to_vec();
    }
    assert_eq!(block[3], b'1', "bad magic");
    assert_eq!(body_size + 8, block.len(), "packed size field mismatch");
    let tail = &block[8..14];

    let mut r = BitReader::new(block, 14);
    let mut out: Vec<u8> = Vec::with_capacity(input_size);
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
            0b01 => {
                let dist = r.byte() as i32 - 256;
                copy_back(&mut out, dist, 2);
            }
            0b10 => {
                let dist = long_dist(&mut r);
                copy_back(&mut out, dist, 3);
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
                    if r.bit() == 0 {
                        // raw run
                        let len = r.bits(4) as usize * 2 + 12;
                        for _ in 0..len {
                            let b = r.byte();
                            out.push(b);
                        }
                    } else {
                        let b = r.byte() as usize;
                        if b == 0 {
                            break; // end of stream
                        }
                        let count = if b < 16 { (b << 8) | r.byte() as usize } else { b };
                        let dist = long_dist(&mut r);
                        copy_back(&mut out, dist, count);
                    }
                } else {
                    let dist = long_dist(&mut r);
                    copy_back(&mut out, dist, total);
                }
            }
            _ => unreachable!(),
        }
    }

    out.extend_from_slice(tail);
    assert_eq!(out.len(), input_size, "decoded length mismatch");
    out
}

/// Distances of references with count >= 3: graded high-byte classes,
/// then the low byte.
fn long_dist(r: &mut BitReader<'_>) -> i32 {
    let high = if r.bit() == 1 {
        -1
    } else {
        match r.bits(2) {
            0b11 => r.bit() as i32 - 3,
            0b10 => r.bits(2) as i32 - 7,
            0b01 => r.bits(3) as i32 - 15,
            0b00 => {
                let v = r.bits(4) as i32;
                if v != 0 {
                    v - 31
                } else {
                    r.byte() as i32 - 256
                }
            }
            _ => unreachable!(),
        }
    };
    let low = r.byte() as i32;
    (high << 8) | low
}
