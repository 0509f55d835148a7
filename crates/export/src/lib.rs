//! Export for the penmark engine: page selection, offscreen rendering at the target
//! DPI, and PDF, PNG, JPEG or ZIP encoding.

use penmark_layout::LayoutError;
use penmark_raster::RenderError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid export request: {0}")]
    InvalidRequest(String),
    #[error("The page selection is empty")]
    NoPages,
}

pub mod encode;
pub mod job;
pub mod output;
pub mod pdf;
pub mod pipeline;
pub mod range;

pub use self::job::{ExportFormat, ExportJob, ExportRequest, PageSelection};
pub use self::output::{ExportOutput, ExportedFile};
pub use self::pdf::PdfAssembler;
pub use self::pipeline::{Exporter, Sheet};
pub use self::range::parse_page_range;

#[cfg(test)]
mod pipeline_test;
