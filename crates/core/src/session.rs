//! An editing session: the document, its settings and the resources every render of it
//! shares.

use crate::config::{DEFAULT_SEED, EngineConfig};
use crate::error::SessionError;
use crate::preview::{PreviewFrame, PreviewOutcome, PreviewSlot, PreviewTicket};
use penmark_export::{ExportJob, ExportOutput, ExportRequest, Exporter};
use penmark_layout::{FontMetrics, LaidOutPage, LayoutConfig, PageGeometry, Paginator, TypefaceRegistry};
use penmark_markup::tokenize;
use penmark_raster::{ComposeOptions, GlyphRenderer, ImageStore, Surface, compose_page, page_seed};
use penmark_resource::{DataUriResourceProvider, FilesystemResourceProvider};
use penmark_traits::ResourceProvider;
use penmark_types::{Document, FontStyle, FontWeight, Margins, PageId, RenderingSettings};
use std::sync::Arc;

pub struct Session {
    document: Document,
    settings: RenderingSettings,
    registry: TypefaceRegistry,
    images: ImageStore,
    seed: u64,
    current: usize,
    layout_config: LayoutConfig,
    preview: PreviewSlot,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("pages", &self.document.len())
            .field("current", &self.current)
            .field("seed", &self.seed)
            .field("registry", &self.registry)
            .finish()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(RenderingSettings::default())
    }
}

impl Session {
    /// A session with one blank page, no registered typefaces and `data:` image
    /// sources only.
    pub fn new(settings: RenderingSettings) -> Self {
        Self {
            document: Document::new(),
            settings,
            registry: TypefaceRegistry::new(),
            images: ImageStore::new(Arc::new(DataUriResourceProvider::new())),
            seed: DEFAULT_SEED,
            current: 0,
            layout_config: LayoutConfig::default(),
            preview: PreviewSlot::default(),
        }
    }

    /// Builds a session from a config: registers its font files and resolves relative
    /// image sources against `resource_dir`.
    pub fn from_config(config: &EngineConfig) -> Result<Self, SessionError> {
        let mut session = Self::new(config.settings.clone()).with_seed(config.seed);
        session.settings.page_geometry(None)?;

        #[cfg(feature = "system-fonts")]
        {
            session.registry = session.registry.with_system_fonts(config.system_fonts);
        }

        if let Some(dir) = &config.resource_dir {
            let files: Arc<dyn ResourceProvider> = Arc::new(FilesystemResourceProvider::new(dir));
            session = session.with_resources(Arc::new(DataUriResourceProvider::with_fallback(files)));
        }

        for font in &config.fonts {
            let bytes = std::fs::read(&font.path).map_err(|e| {
                SessionError::Config(format!("Cannot read font '{}': {}", font.path.display(), e))
            })?;
            let family = match &font.family {
                Some(family) => {
                    session.registry.register(
                        family,
                        FontWeight::from_bold(font.bold),
                        FontStyle::from_italic(font.italic),
                        bytes,
                    )?;
                    family.clone()
                }
                None => session.registry.register_bytes(bytes)?,
            };
            log::debug!("Registered font '{}' from {}", family, font.path.display());
        }
        Ok(session)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Replaces the image source; previously decoded images are dropped.
    pub fn with_resources(mut self, provider: Arc<dyn ResourceProvider>) -> Self {
        self.images = ImageStore::new(provider);
        self
    }

    pub fn with_layout_config(mut self, config: LayoutConfig) -> Self {
        self.layout_config = config;
        self
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn settings(&self) -> &RenderingSettings {
        &self.settings
    }

    pub fn registry(&self) -> &TypefaceRegistry {
        &self.registry
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn set_seed(&mut self, seed: u64) {
        self.seed = seed;
    }

    /// Swaps in new settings after checking they still yield a usable page.
    pub fn set_settings(&mut self, settings: RenderingSettings) -> Result<(), SessionError> {
        settings.page_geometry(None)?;
        self.settings = settings;
        Ok(())
    }

    pub fn current_page(&self) -> usize {
        self.current
    }

    pub fn set_current_page(&mut self, index: usize) -> Result<(), SessionError> {
        if index >= self.document.len() {
            return Err(penmark_types::DocumentError::IndexOutOfRange {
                index,
                len: self.document.len(),
            }
            .into());
        }
        self.current = index;
        Ok(())
    }

    /// Replaces the whole document with one page per text.
    pub fn load_texts<I, S>(&mut self, texts: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.document = Document::from_texts(texts);
        self.current = 0;
    }

    pub fn set_text(&mut self, index: usize, text: impl Into<String>) -> Result<(), SessionError> {
        let len = self.document.len();
        let page = self
            .document
            .get_mut(index)
            .ok_or(penmark_types::DocumentError::IndexOutOfRange { index, len })?;
        page.text = text.into();
        Ok(())
    }

    /// Overrides the margins of one page; `None` restores the session margins.
    pub fn set_page_margins(&mut self, index: usize, margins: Option<Margins>) -> Result<(), SessionError> {
        if let Some(m) = &margins {
            self.settings.page_geometry(Some(m))?;
        }
        let len = self.document.len();
        let page = self
            .document
            .get_mut(index)
            .ok_or(penmark_types::DocumentError::IndexOutOfRange { index, len })?;
        page.margins = margins;
        Ok(())
    }

    pub fn insert_blank_page(&mut self, index: usize) -> Result<PageId, SessionError> {
        let id = self.document.insert(index, "")?;
        if index <= self.current {
            self.current += 1;
        }
        Ok(id)
    }

    pub fn remove_page(&mut self, index: usize) -> Result<(), SessionError> {
        self.document.remove(index)?;
        if index < self.current {
            self.current -= 1;
        }
        self.current = self.current.min(self.document.len().saturating_sub(1));
        Ok(())
    }

    pub fn duplicate_page(&mut self, index: usize) -> Result<PageId, SessionError> {
        let id = self.document.duplicate(index)?;
        if index < self.current {
            self.current += 1;
        }
        Ok(id)
    }

    pub fn move_page(&mut self, from: usize, to: usize) -> Result<(), SessionError> {
        self.document.move_page(from, to)?;
        let current = self.current;
        if current == from {
            self.current = to;
        } else if from < current && current <= to {
            self.current -= 1;
        } else if to <= current && current < from {
            self.current += 1;
        }
        Ok(())
    }

    pub fn register_font(
        &self,
        family: &str,
        weight: FontWeight,
        style: FontStyle,
        data: Vec<u8>,
    ) -> Result<(), SessionError> {
        self.registry.register(family, weight, style, data)?;
        Ok(())
    }

    /// Registers a font under the family name it declares and returns that name.
    pub fn register_font_bytes(&self, data: Vec<u8>) -> Result<String, SessionError> {
        Ok(self.registry.register_bytes(data)?)
    }

    /// Releases every face of `family`; returns how many were removed.
    pub fn unregister_font(&self, family: &str) -> usize {
        self.registry.unregister(family)
    }

    fn metrics(&self) -> FontMetrics {
        FontMetrics::new(self.registry.clone(), self.settings.font_family.clone())
    }

    fn page_geometry(&self, index: usize) -> Result<PageGeometry, SessionError> {
        let page = self.document.get(index).ok_or(
            penmark_types::DocumentError::IndexOutOfRange {
                index,
                len: self.document.len(),
            },
        )?;
        Ok(self.settings.page_geometry(page.margins.as_ref())?)
    }

    /// Lays out the text of one document page. More than one result means the text
    /// overflows the page.
    pub fn paginate_page(&self, index: usize) -> Result<Vec<LaidOutPage>, SessionError> {
        let geometry = self.page_geometry(index)?;
        let text = self.document.get(index).map(|p| p.text.as_str()).unwrap_or("");
        let metrics = self.metrics();
        Ok(Paginator::new(self.layout_config).paginate(
            &tokenize(text),
            &geometry,
            &self.settings,
            &metrics,
            &self.images,
        )?)
    }

    /// Moves overflowing text of a page onto new pages inserted right after it.
    /// Returns how many pages were added.
    pub fn reflow_page(&mut self, index: usize) -> Result<usize, SessionError> {
        let laid_out = self.paginate_page(index)?;
        if laid_out.len() <= 1 {
            return Ok(0);
        }
        let tokens = tokenize(&self.document.pages()[index].text);
        let texts: Vec<String> = laid_out.iter().map(|p| p.source_markup(&tokens)).collect();
        let added = texts.len() - 1;
        self.document.split_page(index, texts)?;
        log::debug!("Reflowed page {} into {} new page(s)", index + 1, added);
        Ok(added)
    }

    /// Reflows every page from the first onwards until nothing overflows.
    pub fn reflow_all(&mut self) -> Result<usize, SessionError> {
        let mut added = 0;
        let mut index = 0;
        while index < self.document.len() {
            added += self.reflow_page(index)?;
            index += 1;
        }
        Ok(added)
    }

    /// Starts a preview render; only the newest ticket may commit.
    pub fn begin_preview(&self) -> PreviewTicket {
        self.preview.begin(self.current)
    }

    /// Renders the ticket's page at `scale` device pixels per base unit and commits it
    /// unless a newer preview has been requested meanwhile.
    pub fn render_preview(&self, ticket: PreviewTicket, scale: f32) -> Result<PreviewOutcome, SessionError> {
        let geometry = self.page_geometry(ticket.page_index)?;
        let laid_out = self.paginate_page(ticket.page_index)?;
        let Some(first) = laid_out.first() else {
            return Err(SessionError::Config("pagination produced no pages".to_string()));
        };

        let metrics = self.metrics();
        let renderer = GlyphRenderer::new(&self.registry, &metrics).with_images(&self.images);
        let mut surface = Surface::new(geometry.width(), geometry.height(), scale)?;
        let render = compose_page(
            &mut surface,
            first,
            &geometry,
            &self.settings,
            &renderer,
            ComposeOptions::preview(page_seed(self.seed, ticket.page_index)),
        );

        Ok(self.preview.commit(PreviewFrame {
            generation: ticket.generation,
            page_index: ticket.page_index,
            surface,
            render,
            overflow_pages: laid_out.len() - 1,
        }))
    }

    /// Runs `f` on the last committed preview, if any.
    pub fn with_preview<R>(&self, f: impl FnOnce(&PreviewFrame) -> R) -> Option<R> {
        self.preview.with_frame(f)
    }

    pub fn export(&self, request: &ExportRequest) -> Result<ExportOutput, SessionError> {
        let job = ExportJob::from_request(request, self.document.len(), self.current)?;
        let metrics = self.metrics();
        let output = Exporter::new(&self.registry, &metrics)
            .with_images(&self.images)
            .with_seed(self.seed)
            .with_layout_config(self.layout_config)
            .export(&self.document, &self.settings, &job)?;
        Ok(output)
    }
}
