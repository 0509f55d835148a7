//! Offscreen export: every selected page is paginated again and rendered on a fresh
//! surface at the job's DPI, then encoded.

use crate::encode::{encode_jpeg, encode_png};
use crate::job::{ExportFormat, ExportJob};
use crate::output::{ExportOutput, ExportedFile, sheet_file_name, zip_files};
use crate::pdf::PdfAssembler;
use crate::ExportError;
use penmark_layout::{
    GlyphMetrics, ImageSizer, LayoutConfig, LayoutError, NoImages, PageGeometry, Paginator,
    TypefaceRegistry,
};
use penmark_markup::tokenize;
use penmark_raster::{ComposeOptions, GlyphRenderer, ImageStore, Surface, compose_page, page_seed};
use penmark_types::{Document, Page, RenderingSettings};

/// One rendered sheet. A document page normally yields one; overflowing text yields
/// more.
pub struct Sheet<'s> {
    pub page_index: usize,
    pub sheet: usize,
    pub geometry: &'s PageGeometry,
    pub surface: &'s Surface,
}

pub struct Exporter<'a> {
    registry: &'a TypefaceRegistry,
    metrics: &'a dyn GlyphMetrics,
    images: Option<&'a ImageStore>,
    seed_base: u64,
    paginator: Paginator,
}

impl<'a> Exporter<'a> {
    pub fn new(registry: &'a TypefaceRegistry, metrics: &'a dyn GlyphMetrics) -> Self {
        Self {
            registry,
            metrics,
            images: None,
            seed_base: 0,
            paginator: Paginator::default(),
        }
    }

    pub fn with_images(mut self, images: &'a ImageStore) -> Self {
        self.images = Some(images);
        self
    }

    pub fn with_seed(mut self, seed_base: u64) -> Self {
        self.seed_base = seed_base;
        self
    }

    pub fn with_layout_config(mut self, config: LayoutConfig) -> Self {
        self.paginator = Paginator::new(config);
        self
    }

    pub fn export(
        &self,
        document: &Document,
        settings: &RenderingSettings,
        job: &ExportJob,
    ) -> Result<ExportOutput, ExportError> {
        log::debug!(
            "Exporting {} page(s) as {:?} at {} DPI",
            job.pages.len(),
            job.format,
            job.dpi
        );
        match job.format {
            ExportFormat::Pdf => {
                let mut pdf = PdfAssembler::new();
                self.for_each_sheet(document, settings, job, |sheet| {
                    let jpeg = encode_jpeg(sheet.surface, job.jpeg_quality())?;
                    pdf.add_jpeg_page(
                        jpeg,
                        sheet.surface.width(),
                        sheet.surface.height(),
                        sheet.geometry.width(),
                        sheet.geometry.height(),
                    )?;
                    Ok(())
                })?;
                Ok(ExportOutput::Blob(ExportedFile {
                    name: "document.pdf".to_string(),
                    mime: "application/pdf",
                    bytes: pdf.finish()?,
                }))
            }
            ExportFormat::Png | ExportFormat::Zip => {
                let mut files = Vec::new();
                self.for_each_sheet(document, settings, job, |sheet| {
                    files.push(ExportedFile {
                        name: sheet_file_name(sheet.page_index, sheet.sheet, "png"),
                        mime: "image/png",
                        bytes: encode_png(sheet.surface)?,
                    });
                    Ok(())
                })?;
                if job.format == ExportFormat::Zip {
                    Ok(ExportOutput::Blob(ExportedFile {
                        name: "pages.zip".to_string(),
                        mime: "application/zip",
                        bytes: zip_files(&files)?,
                    }))
                } else {
                    Ok(ExportOutput::Files(files))
                }
            }
            ExportFormat::Jpg => {
                let mut files = Vec::new();
                self.for_each_sheet(document, settings, job, |sheet| {
                    files.push(ExportedFile {
                        name: sheet_file_name(sheet.page_index, sheet.sheet, "jpg"),
                        mime: "image/jpeg",
                        bytes: encode_jpeg(sheet.surface, job.jpeg_quality())?,
                    });
                    Ok(())
                })?;
                Ok(ExportOutput::Files(files))
            }
        }
    }

    /// Renders the selected pages in ascending order, handing each finished sheet to
    /// `f` before the next is drawn.
    pub fn for_each_sheet<F>(
        &self,
        document: &Document,
        settings: &RenderingSettings,
        job: &ExportJob,
        mut f: F,
    ) -> Result<(), ExportError>
    where
        F: FnMut(Sheet<'_>) -> Result<(), ExportError>,
    {
        let mut renderer = GlyphRenderer::new(self.registry, self.metrics);
        if let Some(images) = self.images {
            renderer = renderer.with_images(images);
        }
        let sizer: &dyn ImageSizer = match self.images {
            Some(images) => images,
            None => &NoImages,
        };

        for &index in &job.pages {
            let Some(page) = document.get(index) else {
                log::warn!("Page {} is not in the document; skipping", index + 1);
                continue;
            };
            let geometry = page_geometry(page, settings)?;
            let laid_out = self.paginator.paginate(
                &tokenize(&page.text),
                &geometry,
                settings,
                self.metrics,
                sizer,
            )?;
            if laid_out.len() > 1 {
                log::warn!(
                    "Page {} overflows; exporting it as {} sheets",
                    index + 1,
                    laid_out.len()
                );
            }

            let options = ComposeOptions::export(page_seed(self.seed_base, index), job.transparent);
            for (sheet, laid) in laid_out.iter().enumerate() {
                let mut surface =
                    Surface::for_dpi(geometry.width(), geometry.height(), job.dpi as f32)?;
                compose_page(&mut surface, laid, &geometry, settings, &renderer, options);
                f(Sheet {
                    page_index: index,
                    sheet,
                    geometry: &geometry,
                    surface: &surface,
                })?;
            }
        }
        Ok(())
    }
}

fn page_geometry(page: &Page, settings: &RenderingSettings) -> Result<PageGeometry, ExportError> {
    settings
        .page_geometry(page.margins.as_ref())
        .map_err(|e| ExportError::Layout(LayoutError::from(e)))
}
