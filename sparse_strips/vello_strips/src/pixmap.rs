// Copyright 2025 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Premultiplied RGBA8 pixel buffers, used as render targets and image sources.

use peniko::color::{PremulRgba8, Rgba8};

use crate::config::RenderSize;

const TRANSPARENT: PremulRgba8 = PremulRgba8 {
    r: 0,
    g: 0,
    b: 0,
    a: 0,
};

/// A row-major buffer of premultiplied RGBA8 pixels with its origin at the top left.
#[derive(Debug, Clone, PartialEq)]
pub struct Pixmap {
    width: u16,
    height: u16,
    pixels: Vec<PremulRgba8>,
}

impl Pixmap {
    /// A transparent pixmap.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            pixels: vec![TRANSPARENT; usize::from(width) * usize::from(height)],
        }
    }

    /// Wrap row-major `pixels`.
    ///
    /// # Panics
    ///
    /// If `pixels` does not hold exactly `width * height` entries.
    pub fn from_parts(pixels: Vec<PremulRgba8>, width: u16, height: u16) -> Self {
        assert_eq!(
            pixels.len(),
            usize::from(width) * usize::from(height),
            "pixel count must equal width * height"
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Return the width of the pixmap.
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Return the height of the pixmap.
    pub fn height(&self) -> u16 {
        self.height
    }

    /// The dimensions as a render size.
    pub fn size(&self) -> RenderSize {
        RenderSize {
            width: u32::from(self.width),
            height: u32::from(self.height),
        }
    }

    /// Set every pixel to `color`.
    pub fn fill(&mut self, color: PremulRgba8) {
        self.pixels.fill(color);
    }

    /// The pixels in row-major order.
    pub fn data(&self) -> &[PremulRgba8] {
        &self.pixels
    }

    /// Mutable access to the pixels in row-major order.
    pub fn data_mut(&mut self) -> &mut [PremulRgba8] {
        &mut self.pixels
    }

    /// The raw bytes, `[r, g, b, a]` per pixel.
    pub fn data_as_u8_slice(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// The pixels of row `y`.
    ///
    /// # Panics
    ///
    /// If `y` is not less than the height.
    pub fn row(&self, y: u16) -> &[PremulRgba8] {
        assert!(y < self.height, "row {y} is outside a pixmap of height {}", self.height);
        let start = usize::from(y) * usize::from(self.width);
        &self.pixels[start..start + usize::from(self.width)]
    }

    #[inline(always)]
    fn index(&self, x: u16, y: u16) -> usize {
        usize::from(y) * usize::from(self.width) + usize::from(x)
    }

    /// The pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// If the position is outside the pixmap.
    #[inline(always)]
    pub fn sample(&self, x: u16, y: u16) -> PremulRgba8 {
        self.pixels[self.index(x, y)]
    }

    /// Overwrite the pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// If the position is outside the pixmap.
    #[inline(always)]
    pub fn set_pixel(&mut self, x: u16, y: u16, pixel: PremulRgba8) {
        let idx = self.index(x, y);
        self.pixels[idx] = pixel;
    }

    /// Convert to straight alpha, for example to hand the result to an encoder.
    pub fn take_unpremultiplied(self) -> Vec<Rgba8> {
        self.pixels.into_iter().map(unpremultiply).collect()
    }

    /// Decode a PNG, premultiplying its colors.
    #[cfg(feature = "png")]
    pub fn from_png(data: impl std::io::Read) -> Result<Self, png::DecodingError> {
        let mut decoder = png::Decoder::new(data);
        // Palettes are expanded, 16-bit channels stripped, and alpha is always present.
        decoder.set_transformations(
            png::Transformations::normalize_to_color8() | png::Transformations::ALPHA,
        );
        let mut reader = decoder.read_info()?;

        let too_large = |_| png::DecodingError::LimitsExceeded;
        let width = u16::try_from(reader.info().width).map_err(too_large)?;
        let height = u16::try_from(reader.info().height).map_err(too_large)?;

        let mut raw = vec![0; reader.output_buffer_size()];
        let frame = reader.next_frame(&mut raw)?;
        let raw = &raw[..frame.buffer_size()];

        let pixels: Vec<_> = match frame.color_type {
            png::ColorType::GrayscaleAlpha => raw
                .chunks_exact(2)
                .map(|p| premultiply(Rgba8 { r: p[0], g: p[0], b: p[0], a: p[1] }))
                .collect(),
            _ => raw
                .chunks_exact(4)
                .map(|p| premultiply(Rgba8 { r: p[0], g: p[1], b: p[2], a: p[3] }))
                .collect(),
        };
        if pixels.len() != usize::from(width) * usize::from(height) {
            return Err(png::DecodingError::LimitsExceeded);
        }

        Ok(Self::from_parts(pixels, width, height))
    }

    /// Encode as an 8-bit RGBA PNG.
    #[cfg(feature = "png")]
    pub fn into_png(self) -> Result<Vec<u8>, png::EncodingError> {
        let mut out = Vec::new();
        let mut encoder = png::Encoder::new(&mut out, self.size().width, self.size().height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);

        let straight = self.take_unpremultiplied();
        let mut writer = encoder.write_header()?;
        writer.write_image_data(bytemuck::cast_slice(&straight))?;
        writer.finish()?;

        Ok(out)
    }
}

#[cfg(feature = "png")]
fn premultiply(Rgba8 { r, g, b, a }: Rgba8) -> PremulRgba8 {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "the product divided by 255 fits in a byte"
    )]
    let scale = |c: u8| ((u16::from(c) * u16::from(a) + 127) / 255) as u8;
    PremulRgba8 {
        r: scale(r),
        g: scale(g),
        b: scale(b),
        a,
    }
}

fn unpremultiply(PremulRgba8 { r, g, b, a }: PremulRgba8) -> Rgba8 {
    if a == 0 {
        return Rgba8 { r, g, b, a };
    }
    let factor = 255.0 / f32::from(a);
    #[expect(clippy::cast_possible_truncation, reason = "rounded and saturated to a byte")]
    let scale = |c: u8| (f32::from(c) * factor).round().min(255.0) as u8;
    Rgba8 {
        r: scale(r),
        g: scale(g),
        b: scale(b),
        a,
    }
}
