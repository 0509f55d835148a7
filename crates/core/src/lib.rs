//! # penmark-core
//!
//! The editing session that ties the engine together. A [`Session`] owns the document,
//! the rendering settings and the typeface registry, renders latest-wins previews of
//! the current page and drives exports.

pub use penmark_export as export;
pub use penmark_layout as layout;
pub use penmark_markup as markup;
pub use penmark_raster as raster;
pub use penmark_types as types;

pub mod config;
pub mod error;
pub mod preview;
pub mod session;

pub use config::{EngineConfig, FontFile};
pub use error::SessionError;
pub use preview::{PreviewFrame, PreviewOutcome, PreviewTicket};
pub use session::Session;

pub use penmark_export::{ExportFormat, ExportOutput, ExportRequest, ExportedFile, PageSelection};
pub use penmark_types::{Document, Margins, Page, RenderingSettings};

#[cfg(test)]
mod session_test;
