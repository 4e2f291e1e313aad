// Copyright 2025 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The vertex stage: expanding a strip instance into the four corners of a quad.

use crate::config::Config;
use crate::pack::unpack_u16_pair;
use crate::strip::{PaintType, StripInstance};

/// The outputs of the vertex stage for one corner.
///
/// After interpolation across the quad, the same record is the input of the
/// fragment stage. Fields documented as flat are identical for all corners of a strip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexOutput {
    /// Paint type (flat).
    pub paint_type: PaintType,
    /// Coverage-space coordinate: the coverage column along x, the pixel row along y.
    pub tex_coord: [f32; 2],
    /// Image-space sample position, normalized by the image size but not extended yet.
    pub sample_xy: [f32; 2],
    /// One past the last dense coverage column (flat).
    pub dense_end: u32,
    /// Packed premultiplied color of color paints (flat).
    pub color: u32,
    /// Packed `(extend_x, extend_y)` of image paints (flat).
    pub extend_modes: u32,
    /// Clip-space position.
    pub position: [f32; 4],
}

/// Compute the outputs for corner `corner` of `instance`.
///
/// Bit 0 of `corner` selects the right edge, bit 1 the bottom edge, so corners
/// `0..4` are top-left, top-right, bottom-left and bottom-right, the order of a
/// triangle strip. `image_size` is only used by image paints.
pub fn vs_main(
    config: &Config,
    instance: &StripInstance,
    corner: u32,
    image_size: [u32; 2],
) -> VertexOutput {
    let corner_x = (corner & 1) as f32;
    let corner_y = ((corner >> 1) & 1) as f32;

    let (x0, y0) = unpack_u16_pair(instance.xy);
    let (width, dense_width) = unpack_u16_pair(instance.widths);

    let dx = corner_x * width as f32;
    let dy = corner_y * config.strip_height as f32;
    let pix_x = x0 as f32 + dx;
    let pix_y = y0 as f32 + dy;

    // Pixel space has its origin at the top left, clip space at the bottom left.
    let ndc_x = pix_x * 2.0 / config.width as f32 - 1.0;
    let ndc_y = 1.0 - pix_y * 2.0 / config.height as f32;

    let paint_type = PaintType::from_u32(instance.paint_type);
    let mut out = VertexOutput {
        paint_type,
        tex_coord: [instance.col_idx as f32 + dx, pix_y],
        sample_xy: [0.0; 2],
        dense_end: instance.col_idx.wrapping_add(dense_width),
        color: 0,
        extend_modes: 0,
        position: [ndc_x, ndc_y, 0.0, 1.0],
    };

    if paint_type == PaintType::Image {
        let (u0, v0) = unpack_u16_pair(instance.uv);
        let [xa, ya] = [instance.x_advance, instance.y_advance];
        let u = u0 as f32 + xa[0] * dx + ya[0] * dy;
        let v = v0 as f32 + xa[1] * dx + ya[1] * dy;
        out.sample_xy = [u / image_size[0] as f32, v / image_size[1] as f32];
        out.extend_modes = instance.paint_data;
    } else {
        out.color = instance.paint_data;
    }

    out
}

/// Run the vertex stage for all four corners of `instance`.
pub fn expand(
    config: &Config,
    instance: &StripInstance,
    image_size: [u32; 2],
) -> [VertexOutput; 4] {
    [0, 1, 2, 3].map(|corner| vs_main(config, instance, corner, image_size))
}

impl VertexOutput {
    /// Interpolate the outputs of a quad at `(t, s)`, where `t` runs from the left to
    /// the right edge and `s` from the top to the bottom edge.
    ///
    /// Flat fields are taken from the first corner.
    pub fn interpolate(quad: &[Self; 4], t: f32, s: f32) -> Self {
        let bilerp = |f: fn(&Self) -> [f32; 2], i: usize| {
            let top = lerp(f(&quad[0])[i], f(&quad[1])[i], t);
            let bottom = lerp(f(&quad[2])[i], f(&quad[3])[i], t);
            lerp(top, bottom, s)
        };
        let tex_coord = |v: &Self| v.tex_coord;
        let sample_xy = |v: &Self| v.sample_xy;
        let xy = |v: &Self| [v.position[0], v.position[1]];

        Self {
            tex_coord: [bilerp(tex_coord, 0), bilerp(tex_coord, 1)],
            sample_xy: [bilerp(sample_xy, 0), bilerp(sample_xy, 1)],
            position: [bilerp(xy, 0), bilerp(xy, 1), 0.0, 1.0],
            ..quad[0]
        }
    }
}

#[inline(always)]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
