// Copyright 2025 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Image paint sources and the cache that owns them.

use std::collections::HashMap;
use std::sync::Arc;

use peniko::color::PremulRgba8;
use peniko::ImageQuality;

use crate::pixmap::Pixmap;

/// Identifier of an image in an [`ImageCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageId(u32);

impl ImageId {
    /// Create a new image ID.
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

/// Something the fragment stage can sample image paints from.
pub trait ImageSampler {
    /// The size of the image in pixels.
    fn size(&self) -> [u32; 2];

    /// Sample the premultiplied color at the normalized position `uv`.
    ///
    /// Positions outside `[0, 1]` are clamped to the edge.
    fn sample(&self, uv: [f32; 2]) -> [f32; 4];
}

/// An image with its sampling quality.
///
/// [`ImageQuality::Low`] samples the nearest pixel, the other qualities
/// filter bilinearly.
#[derive(Debug, Clone)]
pub struct ImageSource {
    /// The image data.
    pub pixmap: Arc<Pixmap>,
    /// The filter used when sampling.
    pub quality: ImageQuality,
}

impl ImageSource {
    /// Create a new image source.
    pub fn new(pixmap: Arc<Pixmap>, quality: ImageQuality) -> Self {
        Self { pixmap, quality }
    }

    #[inline(always)]
    fn texel(&self, x: i32, y: i32) -> [f32; 4] {
        let max_x = i32::from(self.pixmap.width()) - 1;
        let max_y = i32::from(self.pixmap.height()) - 1;
        #[expect(clippy::cast_possible_truncation, reason = "clamped to the pixmap size")]
        let PremulRgba8 { r, g, b, a } = self
            .pixmap
            .sample(x.clamp(0, max_x) as u16, y.clamp(0, max_y) as u16);
        [r, g, b, a].map(|c| f32::from(c) / 255.0)
    }
}

impl ImageSampler for ImageSource {
    fn size(&self) -> [u32; 2] {
        [
            u32::from(self.pixmap.width()),
            u32::from(self.pixmap.height()),
        ]
    }

    #[expect(clippy::cast_possible_truncation, reason = "floored pixel positions")]
    fn sample(&self, uv: [f32; 2]) -> [f32; 4] {
        if self.pixmap.width() == 0 || self.pixmap.height() == 0 {
            return [0.0; 4];
        }
        // Positions more than a pixel outside the image all read the edge.
        let (width, height) = (f32::from(self.pixmap.width()), f32::from(self.pixmap.height()));
        let x = (uv[0] * width).clamp(-1.0, width + 1.0);
        let y = (uv[1] * height).clamp(-1.0, height + 1.0);

        if self.quality == ImageQuality::Low {
            return self.texel(x.floor() as i32, y.floor() as i32);
        }

        // Pixel centers are at half-integer positions.
        let (x, y) = (x - 0.5, y - 0.5);
        let (x0, y0) = (x.floor(), y.floor());
        let (fx, fy) = (x - x0, y - y0);
        let (x0, y0) = (x0 as i32, y0 as i32);

        let top = mix(self.texel(x0, y0), self.texel(x0 + 1, y0), fx);
        let bottom = mix(self.texel(x0, y0 + 1), self.texel(x0 + 1, y0 + 1), fx);
        mix(top, bottom, fy)
    }
}

#[inline(always)]
fn mix(a: [f32; 4], b: [f32; 4], t: f32) -> [f32; 4] {
    [0, 1, 2, 3].map(|i| a[i] + (b[i] - a[i]) * t)
}

/// Manages the images strips can be painted with.
#[derive(Debug, Default)]
pub struct ImageCache {
    images: HashMap<ImageId, ImageSource>,
}

impl ImageCache {
    /// Create a new image cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an image, replacing any previous image with the same ID.
    pub fn upload_image(&mut self, id: ImageId, image: ImageSource) {
        log::debug!(
            "uploading image {} ({}x{})",
            id.as_u32(),
            image.pixmap.width(),
            image.pixmap.height()
        );
        self.images.insert(id, image);
    }

    /// Remove an image from the cache, returning it if it was present.
    pub fn remove_image(&mut self, id: ImageId) -> Option<ImageSource> {
        self.images.remove(&id)
    }

    /// Get a reference to an image.
    pub fn get_image(&self, id: ImageId) -> Option<&ImageSource> {
        self.images.get(&id)
    }

    /// The number of images in the cache.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Whether the cache holds no images.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}
