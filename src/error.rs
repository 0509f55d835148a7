use penmark_core::SessionError;
use penmark_export::ExportError;
use thiserror::Error;

/// Errors from building a session or running the command line tool.
#[derive(Error, Debug)]
pub enum PenmarkError {
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Export failed: {0}")]
    Export(#[from] ExportError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}
