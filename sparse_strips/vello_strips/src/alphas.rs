// Copyright 2025 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The packed coverage ("alpha") texture and its addressing scheme.
//!
//! Coverage is produced one column at a time: a column is a `u32` holding one
//! byte of coverage for each of the four rows of a strip, the top row in the
//! lowest byte. Texels have four `u32` channels, so a texel holds four
//! consecutive columns, and texels are laid out row-major in a texture whose
//! width is a power of two.

use crate::config::STRIP_HEIGHT;
use crate::render::RenderError;

/// The number of coverage columns stored in a single texel.
pub const COLUMNS_PER_TEXEL: u32 = 4;

/// The largest alpha texture dimension we allocate.
///
/// This is the limit of downlevel (WebGL2) targets.
pub const MAX_TEXTURE_DIMENSION: u32 = 2048;

/// The physical location of a coverage column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TexelLocation {
    /// Texel column.
    pub x: u32,
    /// Texel row.
    pub y: u32,
    /// The channel within the texel.
    pub channel: u32,
}

/// Map a coverage column to its texel and channel.
///
/// `tex_width` must be a power of two equal to `1 << width_bits`.
#[inline(always)]
pub const fn locate(column: u32, tex_width: u32, width_bits: u32) -> TexelLocation {
    let texel_index = column / COLUMNS_PER_TEXEL;
    TexelLocation {
        x: texel_index & (tex_width - 1),
        y: texel_index >> width_bits,
        channel: column % COLUMNS_PER_TEXEL,
    }
}

/// Pick a channel out of a texel. Out-of-range channels read channel 0.
#[inline(always)]
pub fn select_channel(texel: [u32; 4], channel: u32) -> u32 {
    match channel {
        1 => texel[1],
        2 => texel[2],
        3 => texel[3],
        _ => texel[0],
    }
}

/// Extract the coverage byte for pixel row `y` from a column, normalized to `[0, 1]`.
#[inline(always)]
pub fn column_alpha(column: u32, y: u32) -> f32 {
    let shift = (y % STRIP_HEIGHT) * 8;
    ((column >> shift) & 0xFF) as f32 / 255.0
}

/// Read access to coverage texels.
pub trait AlphaSource {
    /// Load the texel at `(x, y)`.
    fn texel(&self, x: u32, y: u32) -> [u32; 4];
}

/// A CPU-side alpha texture.
#[derive(Debug, Clone, Default)]
pub struct AlphaTexture {
    texels: Vec<[u32; 4]>,
    width_bits: u32,
    height: u32,
}

impl AlphaTexture {
    /// Lay out `alphas`, one entry per coverage column, into a texture that is
    /// `1 << width_bits` texels wide.
    ///
    /// The texture is at least one row high and padded with zero coverage.
    ///
    /// # Errors
    ///
    /// [`RenderError::AlphaTextureTooLarge`] if either dimension would exceed
    /// [`MAX_TEXTURE_DIMENSION`]. Nothing is allocated in that case.
    pub fn new(alphas: &[u32], width_bits: u32) -> Result<Self, RenderError> {
        let width = 1_usize.checked_shl(width_bits).unwrap_or(usize::MAX);
        let texel_count = alphas.len().div_ceil(COLUMNS_PER_TEXEL as usize);
        let height = texel_count.div_ceil(width).max(1);

        let to_u32 = |n: usize| u32::try_from(n).unwrap_or(u32::MAX);
        let max = MAX_TEXTURE_DIMENSION as usize;
        if width > max || height > max {
            return Err(RenderError::AlphaTextureTooLarge {
                width: to_u32(width),
                height: to_u32(height),
            });
        }

        let mut texels = Vec::with_capacity(width * height);
        texels.extend(alphas.chunks(COLUMNS_PER_TEXEL as usize).map(|chunk| {
            let mut texel = [0; 4];
            texel[..chunk.len()].copy_from_slice(chunk);
            texel
        }));
        texels.resize(width * height, [0; 4]);

        Ok(Self {
            texels,
            width_bits,
            height: to_u32(height),
        })
    }

    /// The width of the texture in texels.
    pub fn width(&self) -> u32 {
        1 << self.width_bits
    }

    /// The height of the texture in texels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The number of coverage columns the texture has room for.
    pub fn capacity(&self) -> usize {
        self.texels.len() * COLUMNS_PER_TEXEL as usize
    }

    /// The raw texel data, row-major.
    pub fn data(&self) -> &[[u32; 4]] {
        &self.texels
    }

    /// Read the coverage of `column` at pixel row `y`.
    pub fn alpha(&self, column: u32, y: u32) -> f32 {
        let loc = locate(column, self.width(), self.width_bits);
        column_alpha(select_channel(self.texel(loc.x, loc.y), loc.channel), y)
    }
}

impl AlphaSource for AlphaTexture {
    #[inline(always)]
    fn texel(&self, x: u32, y: u32) -> [u32; 4] {
        if x >= self.width() {
            return [0; 4];
        }
        let idx = ((y as usize) << self.width_bits) + x as usize;
        self.texels.get(idx).copied().unwrap_or_default()
    }
}

impl<T: AlphaSource + ?Sized> AlphaSource for &T {
    #[inline(always)]
    fn texel(&self, x: u32, y: u32) -> [u32; 4] {
        (**self).texel(x, y)
    }
}
