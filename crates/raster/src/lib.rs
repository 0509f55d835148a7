//! Rasterization for the penmark engine: the paper background, the procedural
//! handwriting renderer and the decoded-image cache.
//!
//! Everything draws in base page pixels (72 DPI); a [`Surface`] carries the scale
//! from base units to device pixels.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Cannot allocate a {width}x{height} surface")]
    SurfaceAllocation { width: u32, height: u32 },
    #[error("Image encoding failed: {0}")]
    Encoding(String),
}

pub mod background;
pub mod compose;
pub mod glyph;
pub mod images;
pub mod noise;
pub mod renderer;
pub mod surface;

pub use self::background::{apply_post_effects, paint_background};
pub use self::compose::{ComposeOptions, compose_page};
pub use self::images::{ImageStore, decode_image_to_pixmap};
pub use self::noise::{GlyphSeed, page_seed};
pub use self::renderer::{GlyphPlacement, GlyphRenderer, PageRender};
pub use self::surface::Surface;

#[cfg(test)]
mod renderer_test;
