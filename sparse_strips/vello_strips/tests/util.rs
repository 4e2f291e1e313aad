// Copyright 2025 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Utility functions shared across different tests.

use vello_strips::peniko::color::PremulRgba8;
use vello_strips::{Config, Pixmap, RenderData, RenderSize, Renderer};

pub(crate) const TRANSPARENT: PremulRgba8 = rgba(0, 0, 0, 0);
pub(crate) const RED: PremulRgba8 = rgba(255, 0, 0, 255);
pub(crate) const GREEN: PremulRgba8 = rgba(0, 255, 0, 255);
pub(crate) const BLUE: PremulRgba8 = rgba(0, 0, 255, 255);
pub(crate) const WHITE: PremulRgba8 = rgba(255, 255, 255, 255);

pub(crate) const fn rgba(r: u8, g: u8, b: u8, a: u8) -> PremulRgba8 {
    PremulRgba8 { r, g, b, a }
}

pub(crate) fn get_renderer(width: u16, height: u16, alphas_tex_width: u32) -> Renderer {
    let size = RenderSize {
        width: u32::from(width),
        height: u32::from(height),
    };
    Renderer::new(Config::new(size, alphas_tex_width).unwrap()).unwrap()
}

/// Render `data` into a pixmap of the renderer's size.
pub(crate) fn render_pixmap(renderer: &mut Renderer, data: &RenderData) -> Pixmap {
    let config = renderer.config();
    let mut pixmap = Pixmap::new(config.width as u16, config.height as u16);
    renderer.render(data, &mut pixmap).unwrap();
    pixmap
}

/// Assert that each row of `pixmap` matches `expected`, a row-major grid of pixels.
pub(crate) fn check_pixels(pixmap: &Pixmap, expected: &[&[PremulRgba8]]) {
    assert_eq!(expected.len(), usize::from(pixmap.height()));
    for (y, row) in expected.iter().enumerate() {
        assert_eq!(row.len(), usize::from(pixmap.width()));
        for (x, pixel) in row.iter().enumerate() {
            assert_eq!(
                pixmap.sample(x as u16, y as u16),
                *pixel,
                "pixel ({x}, {y}) differs"
            );
        }
    }
}
