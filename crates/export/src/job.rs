use crate::ExportError;
use crate::range::parse_page_range;
use serde::{Deserialize, Serialize};

pub const DEFAULT_DPI: u32 = 150;
pub const MAX_DPI: u32 = 1200;
pub const DEFAULT_QUALITY: f32 = 0.92;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Pdf,
    Png,
    #[serde(alias = "jpeg")]
    Jpg,
    Zip,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Png => "png",
            ExportFormat::Jpg => "jpg",
            ExportFormat::Zip => "zip",
        }
    }

    pub fn parse(s: &str) -> Result<Self, String> {
        match s.trim().to_lowercase().as_str() {
            "pdf" => Ok(ExportFormat::Pdf),
            "png" => Ok(ExportFormat::Png),
            "jpg" | "jpeg" => Ok(ExportFormat::Jpg),
            "zip" => Ok(ExportFormat::Zip),
            other => Err(format!("Unknown export format '{}'", other)),
        }
    }

    /// Whether the format can carry an alpha channel.
    pub fn supports_transparency(self) -> bool {
        matches!(self, ExportFormat::Png | ExportFormat::Zip)
    }
}

/// Which pages an export covers, as written in a request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PageSelection {
    #[default]
    All,
    Current,
    Range(String),
}

impl From<String> for PageSelection {
    fn from(s: String) -> Self {
        match s.trim().to_lowercase().as_str() {
            "all" => PageSelection::All,
            "current" => PageSelection::Current,
            _ => PageSelection::Range(s),
        }
    }
}

impl From<PageSelection> for String {
    fn from(selection: PageSelection) -> Self {
        match selection {
            PageSelection::All => "all".to_string(),
            PageSelection::Current => "current".to_string(),
            PageSelection::Range(spec) => spec,
        }
    }
}

impl PageSelection {
    /// Resolves to sorted 0-based indices of a document with `page_count` pages.
    pub fn resolve(&self, page_count: usize, current: usize) -> Vec<usize> {
        match self {
            PageSelection::All => (0..page_count).collect(),
            PageSelection::Current if current < page_count => vec![current],
            PageSelection::Current => Vec::new(),
            PageSelection::Range(spec) => parse_page_range(spec, page_count),
        }
    }
}

/// An export request as a caller writes it, e.g. from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExportRequest {
    pub format: ExportFormat,
    pub page_range: PageSelection,
    /// Lossy compression quality, 0.0 to 1.0.
    pub quality: f32,
    pub dpi: u32,
    pub transparent: bool,
}

impl Default for ExportRequest {
    fn default() -> Self {
        Self {
            format: ExportFormat::Pdf,
            page_range: PageSelection::All,
            quality: DEFAULT_QUALITY,
            dpi: DEFAULT_DPI,
            transparent: false,
        }
    }
}

/// A validated request bound to concrete page indices.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportJob {
    pub format: ExportFormat,
    pub pages: Vec<usize>,
    pub quality: f32,
    pub dpi: u32,
    pub transparent: bool,
}

impl ExportJob {
    /// # Errors
    ///
    /// `InvalidRequest` for a DPI outside `1..=MAX_DPI`, and `NoPages` when the
    /// selection resolves to nothing.
    pub fn from_request(
        request: &ExportRequest,
        page_count: usize,
        current: usize,
    ) -> Result<Self, ExportError> {
        if request.dpi == 0 || request.dpi > MAX_DPI {
            return Err(ExportError::InvalidRequest(format!(
                "DPI must be between 1 and {}, got {}",
                MAX_DPI, request.dpi
            )));
        }
        let pages = request.page_range.resolve(page_count, current);
        if pages.is_empty() {
            return Err(ExportError::NoPages);
        }
        let transparent = request.transparent && request.format.supports_transparency();
        if request.transparent && !transparent {
            log::debug!("{:?} export cannot be transparent; painting paper", request.format);
        }
        Ok(Self {
            format: request.format,
            pages,
            quality: if request.quality.is_finite() {
                request.quality.clamp(0.0, 1.0)
            } else {
                DEFAULT_QUALITY
            },
            dpi: request.dpi,
            transparent,
        })
    }

    /// Device pixels per base unit.
    pub fn scale(&self) -> f32 {
        self.dpi as f32 / 72.0
    }

    /// JPEG quality on the encoder's 1..=100 scale.
    pub fn jpeg_quality(&self) -> u8 {
        (self.quality * 100.0).round().clamp(1.0, 100.0) as u8
    }
}
