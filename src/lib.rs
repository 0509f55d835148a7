//! # penmark
//!
//! Procedural handwriting synthesis. Lightly marked-up text is paginated onto a ruled
//! paper grid, drawn glyph by glyph with seeded jitter over a generated paper
//! background, and exported as PDF, PNG, JPEG or a ZIP of page images.
//!
//! The engine lives in the `penmark-*` crates; this crate wires them together behind
//! [`SessionBuilder`] and ships the command line tool.

pub mod builder;
pub mod error;

pub use builder::{SessionBuilder, split_pages};
pub use error::PenmarkError;

pub use penmark_core::{
    Document, EngineConfig, ExportFormat, ExportOutput, ExportRequest, ExportedFile, FontFile,
    Margins, Page, PageSelection, PreviewFrame, PreviewOutcome, PreviewTicket, RenderingSettings,
    Session, SessionError,
};
pub use penmark_export::{ExportError, parse_page_range};
pub use penmark_markup::tokenize;
pub use penmark_types::{
    AgingSettings, Color, DecorationSettings, InkFlow, InkSettings, JitterSettings, Orientation,
    PaperMaterial, PaperSettings, PaperSize, RulePattern,
};
