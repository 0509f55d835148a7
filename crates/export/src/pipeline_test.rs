#![cfg(test)]

use crate::{ExportError, ExportFormat, ExportJob, ExportOutput, ExportRequest, Exporter, PageSelection};
use lopdf::Document as LopdfDocument;
use penmark_layout::{AverageWidthMetrics, LayoutError, TypefaceRegistry};
use penmark_types::{Document, GeometryError, Margins, RenderingSettings};
use std::io::Cursor;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn five_pages() -> Document {
    Document::from_texts((1..=5).map(|i| format!("This is page number {}.", i)))
}

fn run(
    document: &Document,
    settings: &RenderingSettings,
    request: ExportRequest,
    current: usize,
) -> Result<ExportOutput, ExportError> {
    let registry = TypefaceRegistry::new();
    let metrics = AverageWidthMetrics::default();
    let job = ExportJob::from_request(&request, document.len(), current)?;
    Exporter::new(&registry, &metrics)
        .with_seed(42)
        .export(document, settings, &job)
}

fn request(format: ExportFormat, range: &str, dpi: u32) -> ExportRequest {
    ExportRequest {
        format,
        page_range: PageSelection::from(range.to_string()),
        dpi,
        ..ExportRequest::default()
    }
}

#[test]
fn test_current_page_exports_exactly_one_image() {
    init_logging();
    let output = run(
        &five_pages(),
        &RenderingSettings::default(),
        request(ExportFormat::Png, "current", 36),
        2,
    )
    .unwrap();

    let ExportOutput::Files(files) = output else {
        panic!("png export yields loose files");
    };
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].name, "page-3.png");

    let decoded = image::load_from_memory(&files[0].bytes).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (298, 421));
}

#[test]
fn test_surface_size_follows_dpi() {
    let output = run(
        &five_pages(),
        &RenderingSettings::default(),
        request(ExportFormat::Jpg, "1", 100),
        0,
    )
    .unwrap();
    let file = output.files()[0];
    assert_eq!(file.mime, "image/jpeg");

    let decoded = image::load_from_memory(&file.bytes).unwrap();
    let expected_w = (595.0f32 * 100.0 / 72.0).round() as u32;
    let expected_h = (842.0f32 * 100.0 / 72.0).round() as u32;
    assert_eq!((decoded.width(), decoded.height()), (expected_w, expected_h));
}

#[test]
fn test_pdf_has_one_physical_page_per_selected_page() {
    let output = run(
        &five_pages(),
        &RenderingSettings::default(),
        request(ExportFormat::Pdf, "1,3-4", 36),
        0,
    )
    .unwrap();
    let ExportOutput::Blob(file) = output else {
        panic!("pdf export yields one blob");
    };
    assert_eq!(file.mime, "application/pdf");

    let doc = LopdfDocument::load_mem(&file.bytes).unwrap();
    let pages = doc.get_pages();
    assert_eq!(pages.len(), 3);
    let first = doc.get_object(pages[&1]).unwrap().as_dict().unwrap();
    let media_box = first.get(b"MediaBox").unwrap().as_array().unwrap();
    assert_eq!(media_box[2].as_float().unwrap(), 595.0);
    assert_eq!(media_box[3].as_float().unwrap(), 842.0);
}

#[test]
fn test_zip_contains_an_image_per_page() {
    let output = run(
        &five_pages(),
        &RenderingSettings::default(),
        request(ExportFormat::Zip, "all", 24),
        0,
    )
    .unwrap();
    let ExportOutput::Blob(file) = output else {
        panic!("zip export yields one blob");
    };

    let archive = zip::ZipArchive::new(Cursor::new(file.bytes)).unwrap();
    let mut names: Vec<&str> = archive.file_names().collect();
    names.sort();
    assert_eq!(
        names,
        vec!["page-1.png", "page-2.png", "page-3.png", "page-4.png", "page-5.png"]
    );
}

#[test]
fn test_transparent_png_has_no_paper() {
    let mut request = request(ExportFormat::Png, "1", 24);
    request.transparent = true;
    let output = run(&five_pages(), &RenderingSettings::default(), request, 0).unwrap();

    let decoded = image::load_from_memory(&output.files()[0].bytes)
        .unwrap()
        .to_rgba8();
    assert_eq!(decoded.get_pixel(0, 0).0[3], 0);
    assert!(decoded.pixels().any(|p| p.0[3] > 0), "ink is still drawn");
}

#[test]
fn test_overflowing_page_exports_extra_sheets() {
    let document = Document::from_texts(["word ".repeat(3000)]);
    let output = run(
        &document,
        &RenderingSettings::default(),
        request(ExportFormat::Png, "all", 12),
        0,
    )
    .unwrap();

    let names: Vec<&str> = output.files().iter().map(|f| f.name.as_str()).collect();
    assert!(names.len() > 1);
    assert_eq!(names[0], "page-1.png");
    assert_eq!(names[1], "page-1-2.png");
}

#[test]
fn test_page_margin_override_is_validated() {
    let mut document = five_pages();
    document.get_mut(1).unwrap().margins = Some(Margins::new(500.0, 60.0, 400.0, 80.0));
    let err = run(
        &document,
        &RenderingSettings::default(),
        request(ExportFormat::Png, "2", 24),
        0,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        ExportError::Layout(LayoutError::Geometry(GeometryError::UnusablePageArea { .. }))
    ));
}

#[test]
fn test_export_is_reproducible() {
    let export = || {
        run(
            &five_pages(),
            &RenderingSettings::default(),
            request(ExportFormat::Png, "2", 24),
            0,
        )
        .unwrap()
    };
    assert_eq!(export(), export());
}
