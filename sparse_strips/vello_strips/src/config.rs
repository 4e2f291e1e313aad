// Copyright 2025 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-pass uniform configuration shared by the vertex and fragment stages.

use bytemuck::{Pod, Zeroable};
use thiserror::Error;

/// The height of every strip, in pixels.
///
/// Each coverage column packs one byte per row into a `u32`, so this is also
/// the number of rows stored per texel channel.
pub const STRIP_HEIGHT: u32 = 4;

/// Dimensions of the rendering target.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct RenderSize {
    /// Width of the rendering target.
    pub width: u32,
    /// Height of the rendering target.
    pub height: u32,
}

/// Configuration for the strip renderer.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable, PartialEq, Eq)]
pub struct Config {
    /// Width of the rendering target.
    pub width: u32,
    /// Height of the rendering target.
    pub height: u32,
    /// Height of a strip in the rendering.
    pub strip_height: u32,
    /// Number of trailing zeros in `alphas_tex_width` (log2 of width).
    /// Pre-calculated on CPU since downlevel targets do not support `firstTrailingBit`.
    pub alphas_tex_width_bits: u32,
}

/// Errors for configurations the strip renderer cannot work with.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The render target has no pixels.
    #[error("Render target must not be empty ({width}x{height})")]
    ZeroSize {
        /// The requested width.
        width: u32,
        /// The requested height.
        height: u32,
    },
    /// Coverage is packed four rows per channel, so only that strip height is supported.
    #[error("Unsupported strip height {0}, expected {STRIP_HEIGHT}")]
    UnsupportedStripHeight(u32),
    /// The alpha texture is addressed with masks and shifts.
    #[error("Alpha texture width {0} is not a power of two")]
    AlphaTextureWidthNotPowerOfTwo(u32),
    /// `alphas_tex_width_bits` does not describe a `u32` width.
    #[error("Alpha texture width of 2^{0} texels does not fit in a u32")]
    AlphaTextureWidthBitsOutOfRange(u32),
}

impl Config {
    /// Create a validated configuration for a target of the given size and an alpha
    /// texture that is `alphas_tex_width` texels wide.
    pub fn new(size: RenderSize, alphas_tex_width: u32) -> Result<Self, ConfigError> {
        if !alphas_tex_width.is_power_of_two() {
            return Err(ConfigError::AlphaTextureWidthNotPowerOfTwo(alphas_tex_width));
        }
        let config = Self {
            width: size.width,
            height: size.height,
            strip_height: STRIP_HEIGHT,
            alphas_tex_width_bits: alphas_tex_width.trailing_zeros(),
        };
        config.validate()?;

        Ok(config)
    }

    /// Check the invariants the shading stages rely on.
    ///
    /// Useful for configurations assembled field by field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::ZeroSize {
                width: self.width,
                height: self.height,
            });
        }
        if self.strip_height != STRIP_HEIGHT {
            return Err(ConfigError::UnsupportedStripHeight(self.strip_height));
        }
        if self.alphas_tex_width_bits >= u32::BITS {
            return Err(ConfigError::AlphaTextureWidthBitsOutOfRange(
                self.alphas_tex_width_bits,
            ));
        }

        Ok(())
    }

    /// The width of the alpha texture in texels.
    #[inline(always)]
    pub fn alphas_tex_width(&self) -> u32 {
        1 << self.alphas_tex_width_bits
    }

    /// The dimensions of the render target.
    pub fn size(&self) -> RenderSize {
        RenderSize {
            width: self.width,
            height: self.height,
        }
    }
}
