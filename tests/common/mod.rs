use lopdf::Document as LopdfDocument;
use penmark::{
    ExportFormat, ExportOutput, ExportRequest, PageSelection, PenmarkError, Session, SessionBuilder,
};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A session without system fonts, so output does not depend on the host.
pub fn session_with_pages<I, S>(texts: I) -> Result<Session, PenmarkError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    SessionBuilder::new()
        .with_system_fonts(false)
        .with_seed(2024)
        .with_texts(texts)
        .build()
}

pub fn numbered_pages(count: usize) -> Vec<String> {
    (1..=count)
        .map(|i| format!("<h2>Page {}</h2>\n<p>Dear reader, this is page number {}.</p>", i, i))
        .collect()
}

pub fn request(format: ExportFormat, pages: &str, dpi: u32) -> ExportRequest {
    ExportRequest {
        format,
        page_range: PageSelection::from(pages.to_string()),
        dpi,
        ..ExportRequest::default()
    }
}

/// Wrapper around an exported PDF with helper methods
pub struct ExportedPdf {
    pub doc: LopdfDocument,
}

impl ExportedPdf {
    pub fn from_output(output: ExportOutput) -> Result<Self, Box<dyn std::error::Error>> {
        let ExportOutput::Blob(file) = output else {
            return Err("PDF export should produce a single blob".into());
        };
        let doc = LopdfDocument::load_mem(&file.bytes)?;
        Ok(Self { doc })
    }

    pub fn page_count(&self) -> usize {
        self.doc.get_pages().len()
    }

    /// MediaBox width and height of the 1-based `page`.
    pub fn media_size(&self, page: u32) -> Result<(f32, f32), Box<dyn std::error::Error>> {
        let pages = self.doc.get_pages();
        let id = pages.get(&page).ok_or("no such page")?;
        let dict = self.doc.get_object(*id)?.as_dict()?;
        let media_box = dict.get(b"MediaBox")?.as_array()?;
        Ok((media_box[2].as_float()?, media_box[3].as_float()?))
    }
}
