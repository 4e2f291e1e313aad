// Copyright 2025 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Packing and unpacking of the fixed-width fields carried by strip instances.
//!
//! Instances store pairs of 16-bit values (position, widths, image origin,
//! extend modes) in a single `u32`, and colors as four bytes in a single `u32`.
//! The low half (or lowest byte) always holds the first field.

/// Split a `u32` into its low and high 16-bit halves, returned as `(lo, hi)`.
#[inline(always)]
pub const fn unpack_u16_pair(word: u32) -> (u32, u32) {
    (word & 0xFFFF, word >> 16)
}

/// Pack two `u16` values into a single `u32`, `lo` in bits 0-15 and `hi` in bits 16-31.
#[inline(always)]
pub const fn pack_u16_pair(lo: u16, hi: u16) -> u32 {
    (lo as u32) | ((hi as u32) << 16)
}

/// Unpack a color stored as `r | g << 8 | b << 16 | a << 24` into normalized components.
///
/// This is done with plain shifts and masks instead of a dedicated
/// "unpack 4x8 unorm" operation, which not every target provides.
#[inline(always)]
pub fn unpack_rgba8(word: u32) -> [f32; 4] {
    [
        (word & 0xFF) as f32 / 255.0,
        ((word >> 8) & 0xFF) as f32 / 255.0,
        ((word >> 16) & 0xFF) as f32 / 255.0,
        (word >> 24) as f32 / 255.0,
    ]
}

/// Pack four color bytes, in `[r, g, b, a]` order, into a single `u32`.
#[inline(always)]
pub const fn pack_rgba8(rgba: [u8; 4]) -> u32 {
    u32::from_le_bytes(rgba)
}
