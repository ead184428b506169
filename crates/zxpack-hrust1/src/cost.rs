//! Exact encoded bit lengths for Hrust 1 operations.
//!
//! Every function here is a pure function of the operation's shape; the
//! parser adds the returned lengths to its cost table, and the emitter
//! later produces exactly that many bits. Shapes the format cannot
//! express at all yield [`IMPOSSIBLE`], which the dynamic program treats
//! as "do not consider this branch" rather than an error.

/// Sentinel cost for operation shapes the format cannot represent.
/// Large enough never to win a minimum, small enough not to overflow
/// when continuation costs are added.
pub const IMPOSSIBLE: u32 = 0x0FFF_FFFF;

/// One literal byte: 1 flag bit + 8 data bits.
pub const LITERAL_BITS: u32 = 1 + 8;

/// Raw-run overhead: 7-bit prefix + 4-bit run-size selector (the run
/// bytes themselves add 8 bits each).
pub const RAW_RUN_EXTRA_BITS: u32 = 7 + 4;

/// One cyclic register increment: 5-bit escape prefix + the 0xFE byte.
pub const REGISTER_STEP_BITS: u32 = 5 + 8;

/// End-of-stream marker: the count escape prefix + the reserved 7-bit code.
pub const END_MARKER_BITS: u32 = 7 + 7;

/// Hard cap on backreference counts in this format.
pub const MAX_REF_COUNT: usize = 0xEFF;

/// Encoded length (including the leading flag bit) of counts 3..=15.
/// Count 3 has a dedicated 2-bit code; 4..=15 use base-3 digit groups.
const COUNT_BITS: [u32; 16] = [0, 0, 0, 3, 5, 5, 7, 7, 7, 9, 9, 9, 11, 11, 11, 11];

/// Encoded bit length of a backreference of `count` bytes at negative
/// distance `dist`, assuming the window register holds `reg` (1..=8).
///
/// Counts 1 and 2 use short dedicated codes that ignore the register;
/// far distances of longer references need `reg` extra high bits and are
/// [`IMPOSSIBLE`] when the high byte does not fit the register's range.
pub fn ref_bits(count: u16, dist: i32, reg: u8) -> u32 {
    debug_assert!(count >= 1);
    debug_assert!(dist < 0);

    if count == 1 {
        return if dist >= -8 { 6 } else { IMPOSSIBLE };
    }
    if count == 2 {
        if dist >= -32 {
            return 5 + 5;
        }
        if dist >= -768 {
            return 5 + 8;
        }
        return IMPOSSIBLE;
    }

    let cnt_bits = match count as usize {
        3..=15 => COUNT_BITS[count as usize],
        16..=127 => 7 + 7,
        128..=MAX_REF_COUNT => 7 + 7 + 8,
        _ => return IMPOSSIBLE,
    };

    let dist_bits = if dist >= -32 {
        2 + 5
    } else if dist >= -512 {
        2 + 8
    } else {
        let high = dist >> 8;
        if high < -(1i32 << reg) {
            return IMPOSSIBLE;
        }
        2 + reg as u32 + 8
    };

    cnt_bits + dist_bits
}

/// Encoded bit length of a ref-insert-ref operation at negative distance
/// `dist` (always covers 3 input bytes: copy, literal, copy).
///
/// Callers guarantee `-79 <= dist <= -1`; the near form gets a 4-bit
/// distance, the far form one distance byte.
pub fn rir_bits(dist: i32) -> u32 {
    debug_assert!((-79..0).contains(&dist));
    if dist >= -16 {
        6 + 4 + 8
    } else {
        5 + 8 + 8
    }
}
