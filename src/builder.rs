use crate::error::PenmarkError;
use penmark_core::{EngineConfig, FontFile, RenderingSettings, Session};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Page separator in plain text input.
pub const PAGE_BREAK: char = '\u{c}';

/// Splits plain text input into page texts at form feeds.
pub fn split_pages(text: &str) -> Vec<String> {
    text.split(PAGE_BREAK).map(str::to_string).collect()
}

/// A builder for creating a [`Session`].
#[derive(Debug, Default)]
pub struct SessionBuilder {
    config: EngineConfig,
    texts: Option<Vec<String>>,
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a JSON engine config. Relative paths in it resolve against its directory.
    pub fn with_config_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, PenmarkError> {
        self.config = EngineConfig::load(path)?;
        Ok(self)
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_settings(mut self, settings: RenderingSettings) -> Self {
        self.config.settings = settings;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    /// Registers a font file under the family name it declares.
    pub fn with_font_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config.fonts.push(FontFile {
            path: path.as_ref().to_path_buf(),
            family: None,
            bold: false,
            italic: false,
        });
        self
    }

    pub fn with_system_fonts(mut self, system_fonts: bool) -> Self {
        self.config.system_fonts = system_fonts;
        self
    }

    pub fn with_resource_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.config.resource_dir = Some(dir.into());
        self
    }

    pub fn with_texts<I, S>(mut self, texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.texts = Some(texts.into_iter().map(Into::into).collect());
        self
    }

    /// Reads the document from a file: a JSON array of page texts for `.json`, otherwise
    /// plain text with pages separated by form feeds. Relative image sources resolve
    /// against the file's directory unless a resource directory is already set.
    pub fn with_text_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, PenmarkError> {
        let path_ref = path.as_ref();
        let source = fs::read_to_string(path_ref).map_err(|e| {
            PenmarkError::Io(io::Error::new(
                e.kind(),
                format!("Failed to read text from '{}': {}", path_ref.display(), e),
            ))
        })?;

        let texts = match path_ref.extension().and_then(|s| s.to_str()) {
            Some("json") => serde_json::from_str::<Vec<String>>(&source)?,
            _ => split_pages(&source),
        };
        log::info!("Loaded {} page(s) from {}", texts.len(), path_ref.display());

        if self.config.resource_dir.is_none() {
            let base = path_ref
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            self.config.resource_dir = Some(base.to_path_buf());
        }
        self.texts = Some(texts);
        Ok(self)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Consumes the builder and creates the session.
    pub fn build(self) -> Result<Session, PenmarkError> {
        let mut session = Session::from_config(&self.config)?;
        if let Some(texts) = self.texts {
            session.load_texts(texts);
        }
        Ok(session)
    }
}
