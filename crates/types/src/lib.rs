pub mod color;
pub mod document;
pub mod font;
pub mod geometry;
pub mod ids;
pub mod paper;
pub mod settings;

pub use color::Color;
pub use document::{Document, DocumentError, Page};
pub use font::{FontStyle, FontWeight};
pub use geometry::{GeometryError, Margins, PageGeometry, Rect, Size};
pub use ids::PageId;
pub use paper::{Orientation, PaperMaterial, PaperSettings, PaperSize, RulePattern};
pub use settings::{
    AgingSettings, DecorationSettings, InkFlow, InkSettings, JitterSettings, RenderingSettings,
};
