// Copyright 2025 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The fragment stage: shading a single covered pixel of a strip.

use crate::alphas::{column_alpha, locate, select_channel, AlphaSource};
use crate::config::Config;
use crate::extend::{extend, extend_from_u32};
use crate::image::ImageSampler;
use crate::pack::{unpack_rgba8, unpack_u16_pair};
use crate::strip::PaintType;
use crate::vertex::VertexOutput;

/// Compute the premultiplied color of the pixel described by the interpolated `input`.
///
/// Only pixels in the dense span of a strip read the alpha texture, all others
/// are fully covered. `image` is sampled by image paints; without one they
/// shade transparent. The result is not blended with anything.
#[inline]
pub fn fs_main<A: AlphaSource + ?Sized>(
    config: &Config,
    input: &VertexOutput,
    alphas: &A,
    image: Option<&dyn ImageSampler>,
) -> [f32; 4] {
    #[expect(clippy::cast_possible_truncation, reason = "floored texture coordinates")]
    let (x, y) = (
        input.tex_coord[0].floor() as u32,
        input.tex_coord[1].floor() as u32,
    );

    let alpha = if x < input.dense_end {
        let loc = locate(x, config.alphas_tex_width(), config.alphas_tex_width_bits);
        let texel = alphas.texel(loc.x, loc.y);
        column_alpha(select_channel(texel, loc.channel), y)
    } else {
        1.0
    };

    let color = match input.paint_type {
        PaintType::Solid | PaintType::Alpha => unpack_rgba8(input.color),
        PaintType::Image => {
            let (extend_x, extend_y) = unpack_u16_pair(input.extend_modes);
            let uv = [
                extend(input.sample_xy[0], extend_from_u32(extend_x)),
                extend(input.sample_xy[1], extend_from_u32(extend_y)),
            ];
            image.map_or([0.0; 4], |image| image.sample(uv))
        }
    };

    color.map(|c| c * alpha)
}
