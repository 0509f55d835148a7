//! Engine configuration loadable from JSON.

use crate::error::SessionError;
use penmark_export::ExportRequest;
use penmark_types::RenderingSettings;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const DEFAULT_SEED: u64 = 0x5eed;

/// A font file to register when the session starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontFile {
    pub path: PathBuf,
    /// Family to register under; the font's own family name when absent.
    #[serde(default)]
    pub family: Option<String>,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    pub settings: RenderingSettings,
    pub seed: u64,
    pub fonts: Vec<FontFile>,
    /// Load installed system fonts as the fallback below registered faces.
    pub system_fonts: bool,
    /// Directory relative image sources are resolved against.
    pub resource_dir: Option<PathBuf>,
    pub export: ExportRequest,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            settings: RenderingSettings::default(),
            seed: DEFAULT_SEED,
            fonts: Vec::new(),
            system_fonts: true,
            resource_dir: None,
            export: ExportRequest::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self, SessionError> {
        let mut config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a config file. Relative font paths and `resourceDir` are resolved against
    /// the file's directory.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SessionError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| {
            SessionError::Io(io::Error::new(
                e.kind(),
                format!("Failed to read config from '{}': {}", path.display(), e),
            ))
        })?;
        let mut config = Self::from_json_str(&json)?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        for font in &mut config.fonts {
            if font.path.is_relative() {
                font.path = base.join(&font.path);
            }
        }
        if let Some(dir) = &config.resource_dir
            && dir.is_relative()
        {
            config.resource_dir = Some(base.join(dir));
        }
        Ok(config)
    }

    /// Rejects settings that cannot produce a page.
    pub fn validate(&mut self) -> Result<(), SessionError> {
        self.settings.page_geometry(None)?;
        if !(self.settings.font_size_px > 0.0) {
            return Err(SessionError::Config(format!(
                "fontSizePx must be positive, got {}",
                self.settings.font_size_px
            )));
        }
        Ok(())
    }
}
