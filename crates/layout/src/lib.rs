use penmark_types::GeometryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    #[error("Invalid layout settings: {0}")]
    InvalidSettings(String),
}

pub mod algorithms;
pub mod config;
pub mod direction;
pub(crate) mod engine;
pub mod fonts;
pub mod interface;
pub mod metrics;
pub mod output;

pub use self::config::LayoutConfig;
pub use self::engine::{Paginator, paginate};
pub use self::fonts::{Typeface, TypefaceRegistry, baseline_offset};
pub use self::interface::{ImageSizer, NoImages};
pub use self::metrics::{AverageWidthMetrics, FontMetrics, GlyphMetrics, TextStyle};
pub use self::output::{BreakKind, ImagePlacement, LaidOutPage, Line, Span};

// Re-export geometry types used by callers of `paginate`
pub use penmark_types::{PageGeometry, Rect, Size};

#[cfg(test)]
mod list_test;
#[cfg(test)]
mod test_utils;
#[cfg(test)]
mod text_test;
