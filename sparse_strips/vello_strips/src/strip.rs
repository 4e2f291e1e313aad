// Copyright 2025 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Strip instances, the per-strip records consumed by the vertex stage.

use bytemuck::{Pod, Zeroable};
use peniko::color::PremulRgba8;
use peniko::Extend;

use crate::pack::{pack_rgba8, pack_u16_pair, unpack_u16_pair};

/// How the pixels of a strip get their color.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaintType {
    /// A solid color, fully covering the strip.
    Solid = 0,
    /// A solid color modulated by sampled coverage.
    Alpha = 1,
    /// A sampled image.
    Image = 2,
}

impl PaintType {
    /// Decode a paint tag.
    ///
    /// Unrecognized tags decode as [`PaintType::Solid`], which shades with the
    /// packed color like the other color paints.
    #[inline(always)]
    pub fn from_u32(tag: u32) -> Self {
        match tag {
            1 => Self::Alpha,
            2 => Self::Image,
            _ => Self::Solid,
        }
    }

    /// Whether `tag` is one of the known paint tags.
    pub fn is_known(tag: u32) -> bool {
        tag <= Self::Image as u32
    }
}

/// Parameters of an image paint for a single strip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImagePaint {
    /// Image-space position sampled at the strip's top-left pixel.
    pub origin: [u16; 2],
    /// Extend mode applied horizontally.
    pub x_extend: Extend,
    /// Extend mode applied vertically.
    pub y_extend: Extend,
    /// Image-space step per screen pixel along x.
    pub x_advance: [f32; 2],
    /// Image-space step per screen pixel along y.
    pub y_advance: [f32; 2],
}

/// A single strip, laid out the way it is uploaded as a per-instance vertex buffer.
///
/// Every strip covers [`STRIP_HEIGHT`](crate::config::STRIP_HEIGHT) rows. The first
/// `dense_width` columns sample coverage from the alpha texture, starting at column
/// `col_idx`. The remaining columns are fully covered.
#[repr(C)]
#[derive(Debug, Clone, Copy, Zeroable, Pod, PartialEq)]
pub struct StripInstance {
    /// Top-left pixel of the strip, `x` in the low and `y` in the high half.
    pub xy: u32,
    /// `width` in the low and `dense_width` in the high half.
    pub widths: u32,
    /// Index of the strip's first coverage column in the alpha texture.
    pub col_idx: u32,
    /// A [`PaintType`] tag.
    pub paint_type: u32,
    /// Premultiplied RGBA for color paints, `(extend_x, extend_y)` for images.
    pub paint_data: u32,
    /// Image-space origin `(u, v)` of an image paint.
    pub uv: u32,
    /// Image-space step per screen pixel along x.
    pub x_advance: [f32; 2],
    /// Image-space step per screen pixel along y.
    pub y_advance: [f32; 2],
}

impl StripInstance {
    /// A fully covered strip of a solid color.
    pub fn solid(x: u16, y: u16, width: u16, color: PremulRgba8) -> Self {
        Self {
            xy: pack_u16_pair(x, y),
            widths: pack_u16_pair(width, 0),
            col_idx: 0,
            paint_type: PaintType::Solid as u32,
            paint_data: pack_color(color),
            uv: 0,
            x_advance: [0.0; 2],
            y_advance: [0.0; 2],
        }
    }

    /// A solid color strip whose first `dense_width` columns take their coverage
    /// from the alpha texture, starting at column `col_idx`.
    pub fn alpha_fill(
        x: u16,
        y: u16,
        width: u16,
        dense_width: u16,
        col_idx: u32,
        color: PremulRgba8,
    ) -> Self {
        Self {
            xy: pack_u16_pair(x, y),
            widths: pack_u16_pair(width, dense_width),
            col_idx,
            paint_type: PaintType::Alpha as u32,
            paint_data: pack_color(color),
            uv: 0,
            x_advance: [0.0; 2],
            y_advance: [0.0; 2],
        }
    }

    /// A strip painted with the bound image.
    pub fn image(
        x: u16,
        y: u16,
        width: u16,
        dense_width: u16,
        col_idx: u32,
        paint: &ImagePaint,
    ) -> Self {
        Self {
            xy: pack_u16_pair(x, y),
            widths: pack_u16_pair(width, dense_width),
            col_idx,
            paint_type: PaintType::Image as u32,
            paint_data: pack_u16_pair(paint.x_extend as u16, paint.y_extend as u16),
            uv: pack_u16_pair(paint.origin[0], paint.origin[1]),
            x_advance: paint.x_advance,
            y_advance: paint.y_advance,
        }
    }

    /// The x coordinate of the strip's top-left pixel.
    #[inline(always)]
    pub fn x(&self) -> u32 {
        unpack_u16_pair(self.xy).0
    }

    /// The y coordinate of the strip's top-left pixel.
    #[inline(always)]
    pub fn y(&self) -> u32 {
        unpack_u16_pair(self.xy).1
    }

    /// The total width of the strip in pixels.
    #[inline(always)]
    pub fn width(&self) -> u32 {
        unpack_u16_pair(self.widths).0
    }

    /// The width of the leading span that samples coverage.
    #[inline(always)]
    pub fn dense_width(&self) -> u32 {
        unpack_u16_pair(self.widths).1
    }

    /// The decoded paint type.
    #[inline(always)]
    pub fn paint(&self) -> PaintType {
        PaintType::from_u32(self.paint_type)
    }

    /// One past the last coverage column this strip reads.
    pub fn dense_end(&self) -> u64 {
        u64::from(self.col_idx) + u64::from(self.dense_width())
    }
}

fn pack_color(color: PremulRgba8) -> u32 {
    pack_rgba8([color.r, color.g, color.b, color.a])
}
