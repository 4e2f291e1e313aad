// Copyright 2025 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tests for basic functionality.

use crate::util::{
    check_pixels, get_renderer, render_pixmap, rgba, BLUE, GREEN, RED, TRANSPARENT, WHITE,
};
use vello_strips::peniko::color::PremulRgba8;
use vello_strips::{
    Config, ConfigError, Pixmap, RenderData, RenderError, RenderSize, Renderer, StripInstance,
};

#[test]
fn solid_strip() {
    let mut renderer = get_renderer(8, 4, 2);
    let data = RenderData {
        strips: vec![StripInstance::solid(0, 0, 2, RED)],
        ..Default::default()
    };
    let pixmap = render_pixmap(&mut renderer, &data);

    let mut row = [TRANSPARENT; 8];
    row[..2].fill(RED);
    let row: &[PremulRgba8] = &row;
    check_pixels(&pixmap, &[row, row, row, row]);
}

#[test]
fn partial_coverage() {
    let mut renderer = get_renderer(8, 4, 2);
    let data = RenderData {
        strips: vec![StripInstance::alpha_fill(0, 0, 2, 2, 0, RED)],
        // Column 0 is half covered in its top row, everything else is fully covered.
        alphas: vec![0xFFFF_FF80, 0xFFFF_FFFF],
        image: None,
    };
    let pixmap = render_pixmap(&mut renderer, &data);

    assert_eq!(pixmap.sample(0, 0), rgba(128, 0, 0, 128));
    assert_eq!(pixmap.sample(1, 0), RED);
    for y in 1..4 {
        assert_eq!(pixmap.sample(0, y), RED);
        assert_eq!(pixmap.sample(1, y), RED);
    }
    assert_eq!(pixmap.sample(2, 0), TRANSPARENT);
}

#[test]
fn coverage_rows() {
    let mut renderer = get_renderer(1, 4, 1);
    let data = RenderData {
        strips: vec![StripInstance::alpha_fill(0, 0, 1, 1, 0, WHITE)],
        alphas: vec![0xFF80_4000],
        image: None,
    };
    let pixmap = render_pixmap(&mut renderer, &data);

    check_pixels(
        &pixmap,
        &[
            &[TRANSPARENT],
            &[rgba(64, 64, 64, 64)],
            &[rgba(128, 128, 128, 128)],
            &[WHITE],
        ],
    );
}

#[test]
fn sparse_tail_is_fully_covered() {
    let mut renderer = get_renderer(8, 4, 2);
    let data = RenderData {
        // The dense columns have no coverage at all.
        strips: vec![StripInstance::alpha_fill(0, 0, 6, 2, 0, GREEN)],
        alphas: vec![0, 0],
        image: None,
    };
    let pixmap = render_pixmap(&mut renderer, &data);

    let mut row = [TRANSPARENT; 8];
    row[2..6].fill(GREEN);
    let row: &[PremulRgba8] = &row;
    check_pixels(&pixmap, &[row, row, row, row]);
}

#[test]
fn coverage_spans_texture_rows() {
    // A texture that is one texel wide holds four columns per row, so columns
    // 4 and 5 live in the second row of the texture.
    let mut renderer = get_renderer(2, 4, 1);
    let mut alphas = vec![0; 6];
    alphas[4] = 0xFFFF_FFFF;
    let data = RenderData {
        strips: vec![StripInstance::alpha_fill(0, 0, 2, 2, 4, BLUE)],
        alphas,
        image: None,
    };
    let pixmap = render_pixmap(&mut renderer, &data);

    let row: &[PremulRgba8] = &[BLUE, TRANSPARENT];
    check_pixels(&pixmap, &[row, row, row, row]);
}

#[test]
fn strips_are_blended_in_order() {
    let mut renderer = get_renderer(2, 4, 2);
    let half_blue = rgba(0, 0, 128, 128);
    let data = RenderData {
        strips: vec![
            StripInstance::solid(0, 0, 2, RED),
            StripInstance::solid(1, 0, 1, half_blue),
        ],
        ..Default::default()
    };
    let pixmap = render_pixmap(&mut renderer, &data);

    let row: &[PremulRgba8] = &[RED, rgba(127, 0, 128, 255)];
    check_pixels(&pixmap, &[row, row, row, row]);
}

#[test]
fn later_opaque_strip_wins() {
    let mut renderer = get_renderer(2, 4, 2);
    let data = RenderData {
        strips: vec![
            StripInstance::solid(0, 0, 2, RED),
            StripInstance::solid(0, 0, 2, GREEN),
        ],
        ..Default::default()
    };
    let pixmap = render_pixmap(&mut renderer, &data);
    assert!(pixmap.data().iter().all(|p| *p == GREEN));
}

#[test]
fn strip_rows_are_offset() {
    let mut renderer = get_renderer(2, 8, 2);
    let data = RenderData {
        strips: vec![StripInstance::solid(0, 4, 2, RED)],
        ..Default::default()
    };
    let pixmap = render_pixmap(&mut renderer, &data);

    let empty: &[PremulRgba8] = &[TRANSPARENT, TRANSPARENT];
    let red: &[PremulRgba8] = &[RED, RED];
    check_pixels(&pixmap, &[empty, empty, empty, empty, red, red, red, red]);
}

#[test]
fn strips_outside_target_are_clipped() {
    let mut renderer = get_renderer(4, 4, 2);
    let data = RenderData {
        strips: vec![
            StripInstance::solid(2, 0, 10, RED),
            StripInstance::solid(0, 8, 4, GREEN),
        ],
        ..Default::default()
    };
    let pixmap = render_pixmap(&mut renderer, &data);

    let row: &[PremulRgba8] = &[TRANSPARENT, TRANSPARENT, RED, RED];
    check_pixels(&pixmap, &[row, row, row, row]);
}

#[test]
fn unknown_paint_type_is_solid() {
    let mut renderer = get_renderer(2, 4, 2);
    let mut strip = StripInstance::solid(0, 0, 2, BLUE);
    strip.paint_type = 9;
    let data = RenderData {
        strips: vec![strip],
        ..Default::default()
    };
    let pixmap = render_pixmap(&mut renderer, &data);
    assert!(pixmap.data().iter().all(|p| *p == BLUE));
}

#[test]
fn empty_frame() {
    let mut renderer = get_renderer(4, 4, 2);
    let pixmap = render_pixmap(&mut renderer, &RenderData::default());
    assert!(pixmap.data().iter().all(|p| *p == TRANSPARENT));
}

#[test]
fn target_is_cleared() {
    let mut renderer = get_renderer(2, 4, 2);
    let mut pixmap = Pixmap::new(2, 4);
    pixmap.fill(RED);
    renderer.render(&RenderData::default(), &mut pixmap).unwrap();
    assert!(pixmap.data().iter().all(|p| *p == TRANSPARENT));
}

#[test]
fn failed_prepare_discards_frame() {
    let mut renderer = get_renderer(2, 4, 2);
    let good = RenderData {
        strips: vec![StripInstance::solid(0, 0, 2, RED)],
        ..Default::default()
    };
    renderer.prepare(&good).unwrap();

    let bad = RenderData {
        strips: vec![StripInstance::alpha_fill(0, 0, 2, 2, 0, RED)],
        ..Default::default()
    };
    assert_eq!(
        renderer.prepare(&bad),
        Err(RenderError::ColumnsOutOfRange {
            index: 0,
            end: 2,
            allocated: 0
        })
    );

    let mut pixmap = Pixmap::new(2, 4);
    renderer.render_to_pixmap(&good, &mut pixmap);
    assert!(pixmap.data().iter().all(|p| *p == TRANSPARENT));
}

#[test]
fn invalid_configs() {
    let size = RenderSize {
        width: 0,
        height: 4,
    };
    assert_eq!(
        Config::new(size, 2),
        Err(ConfigError::ZeroSize {
            width: 0,
            height: 4
        })
    );

    let size = RenderSize {
        width: 8,
        height: 4,
    };
    assert_eq!(
        Config::new(size, 3),
        Err(ConfigError::AlphaTextureWidthNotPowerOfTwo(3))
    );

    let config = Config {
        strip_height: 8,
        ..Config::new(size, 2).unwrap()
    };
    assert_eq!(
        Renderer::new(config).map(|_| ()),
        Err(ConfigError::UnsupportedStripHeight(8))
    );
}
