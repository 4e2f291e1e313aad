// Copyright 2025 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Strip compositing for the sparse strips renderer.
//!
//! A frame is a list of [`StripInstance`]s plus the coverage they reference.
//! Every strip is a run of pixels, [`STRIP_HEIGHT`](config::STRIP_HEIGHT) rows
//! tall. Its leading `dense_width` columns take their coverage from an
//! [`AlphaTexture`] and the rest of it is fully covered.
//!
//! The crate mirrors the two shader stages of the strip render pass:
//!
//! - [`vertex::vs_main`] expands an instance into a screen-space quad.
//! - [`fragment::fs_main`] shades one covered pixel of that quad.
//!
//! [`Renderer`] drives both stages on the CPU, rasterizing the quads and blending
//! them into a [`Pixmap`] with premultiplied source-over.
//!
//! ```
//! use vello_strips::peniko::color::PremulRgba8;
//! use vello_strips::{Config, Pixmap, RenderData, RenderSize, Renderer, StripInstance};
//!
//! let size = RenderSize { width: 2, height: 4 };
//! let mut renderer = Renderer::new(Config::new(size, 2).unwrap()).unwrap();
//! let red = PremulRgba8 { r: 255, g: 0, b: 0, a: 255 };
//! let data = RenderData {
//!     strips: vec![StripInstance::solid(0, 0, 2, red)],
//!     ..Default::default()
//! };
//!
//! let mut pixmap = Pixmap::new(2, 4);
//! renderer.render(&data, &mut pixmap).unwrap();
//! assert!(pixmap.data().iter().all(|p| *p == red));
//! ```
//!
//! # Features
//!
//! - `png` (enabled by default): Loading and saving [`Pixmap`]s as PNG.
//! - `multithreading`: Shade the rows of a frame in parallel.

// LINEBENDER LINT SET - lib.rs - v3
// See https://linebender.org/wiki/canonical-lints/
// These lints shouldn't apply to examples or tests.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
// These lints shouldn't apply to examples.
#![warn(clippy::print_stdout, clippy::print_stderr)]
// END LINEBENDER LINT SET
#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod alphas;
pub mod config;
pub mod extend;
pub mod fragment;
pub mod image;
pub mod pack;
pub mod pixmap;
mod render;
pub mod strip;
pub mod vertex;

pub use peniko;

pub use alphas::{AlphaSource, AlphaTexture};
pub use config::{Config, ConfigError, RenderSize};
pub use image::{ImageCache, ImageId, ImageSampler, ImageSource};
pub use pixmap::Pixmap;
pub use render::{RenderData, RenderError, Renderer};
pub use strip::{ImagePaint, PaintType, StripInstance};
