//! Exact encoded bit lengths for Hrust 2.1 operations.
//!
//! The parser adds these lengths to its cost table and the emitter later
//! produces exactly that many bits, which is what makes the packed size
//! predictable before emission. Shapes the format cannot express yield
//! [`IMPOSSIBLE`].

/// Sentinel cost for operation shapes the format cannot represent.
pub const IMPOSSIBLE: u32 = 0x0FFF_FFFF;

/// One literal byte: 1 flag bit + 8 data bits.
pub const LITERAL_BITS: u32 = 1 + 8;

/// Raw-run overhead: 6-bit prefix + 4-bit run-size selector.
pub const RAW_RUN_EXTRA_BITS: u32 = 6 + 4;

/// End-of-stream marker: the count escape prefix + a zero byte.
pub const END_MARKER_BITS: u32 = 6 + 8;

/// Hard cap on backreference counts in this format.
pub const MAX_REF_COUNT: usize = 0xFFF;

/// Encoded length (including the leading flag bit) of counts 3..=15.
const COUNT_BITS: [u32; 16] = [0, 0, 0, 3, 5, 5, 7, 7, 7, 9, 9, 9, 11, 11, 11, 11];

/// Encoded bit length of the distance part of a count >= 3 reference,
/// including the low-byte that every class carries.
pub fn dist_bits(dist: i32) -> u32 {
    debug_assert!(dist < 0);
    match dist >> 8 {
        -1 => 1 + 8,
        -3..=-2 => 1 + 2 + 1 + 8,
        -7..=-4 => 1 + 2 + 2 + 8,
        -15..=-8 => 1 + 2 + 3 + 8,
        -30..=-16 => 1 + 2 + 4 + 8,
        _ => 1 + 2 + 4 + 8 + 8,
    }
}

/// Encoded bit length of a backreference of `count` bytes at negative
/// distance `dist`.
///
/// Counts 1 and 2 use short dedicated codes with tight distance limits;
/// counts 3 and up pay the count code plus the graded distance classes.
pub fn ref_bits(count: u16, dist: i32) -> u32 {
    debug_assert!(count >= 1);
    debug_assert!(dist < 0);

    if count == 1 {
        return if dist >= -8 { 6 } else { IMPOSSIBLE };
    }
    if count == 2 {
        return if dist >= -256 { 3 + 8 } else { IMPOSSIBLE };
    }

    let cnt_bits = match count as usize {
        3..=15 => COUNT_BITS[count as usize],
        16..=255 => 6 + 8,
        256..=MAX_REF_COUNT => 6 + 16,
        _ => return IMPOSSIBLE,
    };

    cnt_bits + dist_bits(dist)
}
