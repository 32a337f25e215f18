#![no_std]

//! Small helpers shared by the simulator crates: bit arithmetic on address
//! widths and the collection types used by the `no_std` + `alloc` code.

pub use hashbrown::HashMap;

/// Mask with the low `bits` bits set. `bits >= 64` yields all ones.
#[inline]
pub const fn low_mask(bits: u32) -> u64 {
    if bits >= u64::BITS {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}

/// `2^bits`, or `None` when it does not fit in a `u64`.
#[inline]
pub const fn pow2(bits: u32) -> Option<u64> {
    if bits >= u64::BITS {
        None
    } else {
        Some(1u64 << bits)
    }
}

/// Integer division rounding up. `divisor` must be non-zero.
#[inline]
pub const fn div_ceil(value: u32, divisor: u32) -> u32 {
    value.div_ceil(divisor)
}

/// Absolute difference of two unsigned values.
#[inline]
pub const fn abs_diff(a: u64, b: u64) -> u64 {
    if a > b { a - b } else { b - a }
}

// ============================================================================
// Unit Tests
// ============================================================================
