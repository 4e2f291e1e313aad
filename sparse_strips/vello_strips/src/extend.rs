// Copyright 2025 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mapping image sample coordinates back into `[0, 1]`.

use peniko::Extend;

/// Decode an extend mode tag. Unrecognized tags decode as [`Extend::Reflect`].
#[inline(always)]
pub fn extend_from_u32(tag: u32) -> Extend {
    match tag {
        0 => Extend::Pad,
        1 => Extend::Repeat,
        _ => Extend::Reflect,
    }
}

/// Apply `mode` to a normalized coordinate `t`.
///
/// The result is in `[0, 1]` for finite `t`.
#[inline(always)]
pub fn extend(t: f32, mode: Extend) -> f32 {
    match mode {
        Extend::Pad => t.clamp(0.0, 1.0),
        // `floor` rather than truncation, so negative coordinates wrap too.
        Extend::Repeat => t - t.floor(),
        // A triangle wave with period 2.
        Extend::Reflect => (t - 2.0 * (t * 0.5).round()).abs(),
    }
}
