// Copyright 2025 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A CPU pipeline that drives the vertex and fragment stages over a whole frame.
//!
//! It takes the place of the render pass: instances are expanded into quads,
//! quads are rasterized at pixel centers, fragments are shaded and then blended
//! into the target with premultiplied source-over, in submission order.

use peniko::color::PremulRgba8;
use thiserror::Error;

use crate::alphas::{AlphaTexture, MAX_TEXTURE_DIMENSION};
use crate::config::{Config, ConfigError};
use crate::fragment::fs_main;
use crate::image::{ImageCache, ImageId, ImageSampler, ImageSource};
use crate::pixmap::Pixmap;
use crate::strip::{PaintType, StripInstance};
use crate::vertex::{expand, VertexOutput};

const TRANSPARENT: PremulRgba8 = PremulRgba8 {
    r: 0,
    g: 0,
    b: 0,
    a: 0,
};

/// Contains the data needed for rendering a frame.
#[derive(Debug, Default, Clone)]
pub struct RenderData {
    /// Strips to be rendered, back to front.
    pub strips: Vec<StripInstance>,
    /// Coverage columns referenced by the strips, one `u32` of four row bytes each.
    pub alphas: Vec<u32>,
    /// The image sampled by image paints.
    pub image: Option<ImageId>,
}

/// Errors found while preparing a frame.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    /// A strip claims more dense columns than it is wide.
    #[error("Strip {index} has a dense width of {dense_width}, but is only {width} wide")]
    DenseWidthExceedsWidth {
        /// Index of the strip.
        index: usize,
        /// Width of the strip.
        width: u32,
        /// Dense width of the strip.
        dense_width: u32,
    },
    /// A strip reads coverage columns that were never allocated.
    #[error("Strip {index} reads coverage columns up to {end}, but only {allocated} exist")]
    ColumnsOutOfRange {
        /// Index of the strip.
        index: usize,
        /// One past the last column the strip reads.
        end: u64,
        /// The number of coverage columns.
        allocated: usize,
    },
    /// The coverage does not fit into an alpha texture.
    #[error(
        "Alpha texture of {width}x{height} exceeds the maximum dimension of {max}",
        max = MAX_TEXTURE_DIMENSION
    )]
    AlphaTextureTooLarge {
        /// Width of the alpha texture.
        width: u32,
        /// Height the alpha texture would need.
        height: u32,
    },
    /// A strip has an image paint, but the frame has no image.
    #[error("Strip {index} is painted with an image, but no image is bound")]
    MissingImage {
        /// Index of the strip.
        index: usize,
    },
    /// The frame's image is not in the image cache.
    #[error("Image {0:?} not found")]
    ImageNotFound(ImageId),
}

/// Resources built from a frame's [`RenderData`] by [`Renderer::prepare`].
#[derive(Debug)]
struct Resources {
    alphas: AlphaTexture,
    image: Option<ImageSource>,
}

/// A strip quad after the vertex stage, with its bounds in pixels.
#[derive(Debug)]
struct Quad {
    corners: [VertexOutput; 4],
    x0: f32,
    y0: f32,
    x1: f32,
    y1: f32,
}

impl Quad {
    /// Horizontal pixel range whose centers lie inside the quad.
    fn columns(&self, width: usize) -> core::ops::Range<usize> {
        first_pixel(self.x0).min(width)..first_pixel(self.x1).min(width)
    }

    /// Vertical pixel range whose centers lie inside the quad.
    fn rows(&self, height: usize) -> core::ops::Range<usize> {
        first_pixel(self.y0).min(height)..first_pixel(self.y1).min(height)
    }
}

/// The quads of a frame, binned by the rows they cover.
#[derive(Debug)]
struct Frame {
    quads: Vec<Quad>,
    /// For each row, the indices of the quads covering it in submission order.
    bins: Vec<Vec<usize>>,
}

/// The first pixel whose center is at or after `edge`.
#[inline(always)]
fn first_pixel(edge: f32) -> usize {
    #[expect(clippy::cast_possible_truncation, reason = "saturating float to int cast")]
    let pixel = (edge - 0.5).ceil().max(0.0) as usize;
    pixel
}

/// CPU renderer for strip instances.
#[derive(Debug)]
pub struct Renderer {
    config: Config,
    image_cache: ImageCache,
    /// Resources for the prepared frame, if any.
    resources: Option<Resources>,
}

impl Renderer {
    /// Creates a new renderer.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            image_cache: ImageCache::new(),
            resources: None,
        })
    }

    /// The configuration of the renderer.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The images available to frames.
    pub fn image_cache(&self) -> &ImageCache {
        &self.image_cache
    }

    /// Mutable access to the images available to frames.
    ///
    /// Changes take effect at the next [`prepare`](Self::prepare).
    pub fn image_cache_mut(&mut self) -> &mut ImageCache {
        &mut self.image_cache
    }

    /// Validate `render_data` and build the resources needed to render it.
    ///
    /// On error, the previously prepared frame is discarded.
    pub fn prepare(&mut self, render_data: &RenderData) -> Result<(), RenderError> {
        self.resources = None;

        let allocated = render_data.alphas.len();
        let mut unknown_paints = 0;
        for (index, strip) in render_data.strips.iter().enumerate() {
            let (width, dense_width) = (strip.width(), strip.dense_width());
            if dense_width > width {
                return Err(RenderError::DenseWidthExceedsWidth {
                    index,
                    width,
                    dense_width,
                });
            }
            if dense_width > 0 && strip.dense_end() > allocated as u64 {
                return Err(RenderError::ColumnsOutOfRange {
                    index,
                    end: strip.dense_end(),
                    allocated,
                });
            }
            if strip.paint() == PaintType::Image && render_data.image.is_none() {
                return Err(RenderError::MissingImage { index });
            }
            if !PaintType::is_known(strip.paint_type) {
                unknown_paints += 1;
            }
        }
        if unknown_paints > 0 {
            log::warn!(
                "{unknown_paints} strips have an unknown paint type and will be painted as solid"
            );
        }

        let alphas = AlphaTexture::new(&render_data.alphas, self.config.alphas_tex_width_bits)?;

        let image = match render_data.image {
            Some(id) => Some(
                self.image_cache
                    .get_image(id)
                    .ok_or(RenderError::ImageNotFound(id))?
                    .clone(),
            ),
            None => None,
        };

        log::debug!(
            "prepared {} strips, {} coverage columns in a {}x{} alpha texture",
            render_data.strips.len(),
            allocated,
            alphas.width(),
            alphas.height()
        );
        self.resources = Some(Resources { alphas, image });

        Ok(())
    }

    /// Render the prepared frame into `target`.
    ///
    /// The target is cleared to transparent first. If no frame was prepared, it
    /// stays transparent.
    pub fn render_to_pixmap(&self, render_data: &RenderData, target: &mut Pixmap) {
        target.fill(TRANSPARENT);

        let Some(resources) = &self.resources else {
            log::warn!("render_to_pixmap called without a prepared frame");
            return;
        };
        let (width, height) = (usize::from(target.width()), usize::from(target.height()));
        if width == 0 || height == 0 {
            return;
        }
        if target.size() != self.config.size() {
            log::warn!(
                "target is {width}x{height}, but the renderer is configured for {}x{}",
                self.config.width,
                self.config.height
            );
        }

        let frame = self.frame(render_data, resources, height);

        #[cfg(feature = "multithreading")]
        self.shade_parallel(resources, &frame, target.data_mut(), width);
        #[cfg(not(feature = "multithreading"))]
        self.shade_sequential(resources, &frame, target.data_mut(), width);
    }

    /// Prepare `render_data` and render it into `target`.
    pub fn render(
        &mut self,
        render_data: &RenderData,
        target: &mut Pixmap,
    ) -> Result<(), RenderError> {
        self.prepare(render_data)?;
        self.render_to_pixmap(render_data, target);
        Ok(())
    }

    /// Run the vertex stage and bin the resulting quads into the rows of a
    /// target that is `height` pixels high.
    fn frame(&self, render_data: &RenderData, resources: &Resources, height: usize) -> Frame {
        let image_size = resources.image.as_ref().map_or([1, 1], ImageSampler::size);
        let quads: Vec<Quad> = render_data
            .strips
            .iter()
            .map(|strip| self.quad(strip, image_size))
            .collect();

        let mut bins = vec![Vec::new(); height];
        for (idx, quad) in quads.iter().enumerate() {
            for bin in &mut bins[quad.rows(height)] {
                bin.push(idx);
            }
        }

        Frame { quads, bins }
    }

    #[cfg_attr(
        feature = "multithreading",
        allow(dead_code, reason = "only compared against the parallel path in tests")
    )]
    fn shade_sequential(
        &self,
        resources: &Resources,
        frame: &Frame,
        pixels: &mut [PremulRgba8],
        width: usize,
    ) {
        for (y, row) in pixels.chunks_exact_mut(width).enumerate() {
            self.shade_row(resources, &frame.quads, &frame.bins[y], y, row);
        }
    }

    #[cfg(feature = "multithreading")]
    fn shade_parallel(
        &self,
        resources: &Resources,
        frame: &Frame,
        pixels: &mut [PremulRgba8],
        width: usize,
    ) {
        use rayon::prelude::*;

        pixels
            .par_chunks_exact_mut(width)
            .enumerate()
            .for_each(|(y, row)| {
                self.shade_row(resources, &frame.quads, &frame.bins[y], y, row);
            });
    }

    fn quad(&self, strip: &StripInstance, image_size: [u32; 2]) -> Quad {
        let corners = expand(&self.config, strip, image_size);
        let [x0, y0] = self.to_pixel(&corners[0]);
        let [x1, y1] = self.to_pixel(&corners[3]);
        Quad {
            corners,
            x0,
            y0,
            x1,
            y1,
        }
    }

    /// The viewport transform, from clip space back to pixels.
    fn to_pixel(&self, vertex: &VertexOutput) -> [f32; 2] {
        let [x, y, ..] = vertex.position;
        [
            (x + 1.0) * 0.5 * self.config.width as f32,
            (1.0 - y) * 0.5 * self.config.height as f32,
        ]
    }

    fn shade_row(
        &self,
        resources: &Resources,
        quads: &[Quad],
        bin: &[usize],
        y: usize,
        row: &mut [PremulRgba8],
    ) {
        let image = resources.image.as_ref().map(|i| i as &dyn ImageSampler);
        let center_y = y as f32 + 0.5;

        for quad in bin.iter().map(|&idx| &quads[idx]) {
            let s = (center_y - quad.y0) / (quad.y1 - quad.y0);
            for x in quad.columns(row.len()) {
                let t = (x as f32 + 0.5 - quad.x0) / (quad.x1 - quad.x0);
                let input = VertexOutput::interpolate(&quad.corners, t, s);
                let color = fs_main(&self.config, &input, &resources.alphas, image);
                blend(&mut row[x], color);
            }
        }
    }
}

/// Premultiplied source-over: `dst = src + dst * (1 - src.a)`.
#[inline(always)]
fn blend(dst: &mut PremulRgba8, src: [f32; 4]) {
    let inv_alpha = 1.0 - src[3];
    let mix = |s: f32, d: u8| {
        #[expect(clippy::cast_possible_truncation, reason = "clamped to 0..=255")]
        let value = ((s + f32::from(d) / 255.0 * inv_alpha).clamp(0.0, 1.0) * 255.0).round() as u8;
        value
    };
    *dst = PremulRgba8 {
        r: mix(src[0], dst.r),
        g: mix(src[1], dst.g),
        b: mix(src[2], dst.b),
        a: mix(src[3], dst.a),
    };
}
