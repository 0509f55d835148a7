//! Errors surfaced by session operations.

use penmark_export::ExportError;
use penmark_layout::LayoutError;
use penmark_raster::RenderError;
use penmark_traits::FontError;
use penmark_types::{DocumentError, GeometryError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Font(#[from] FontError),
}

impl From<GeometryError> for SessionError {
    fn from(e: GeometryError) -> Self {
        SessionError::Layout(LayoutError::Geometry(e))
    }
}
