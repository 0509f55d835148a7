mod common;

use common::{ExportedPdf, TestResult, init_logging, numbered_pages, request, session_with_pages};
use penmark::{ExportFormat, ExportOutput, PaperSize, Orientation, RenderingSettings, SessionError};
use std::io::Cursor;
use std::time::Duration;

#[test]
fn test_current_page_png_at_36_dpi() -> TestResult {
    init_logging();
    let mut session = session_with_pages(numbered_pages(5))?;
    session.set_current_page(2)?;

    let output = session.export(&request(ExportFormat::Png, "current", 36))?;
    let files = output.files();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].name, "page-3.png");
    assert_eq!(files[0].mime, "image/png");

    let image = image::load_from_memory(&files[0].bytes)?;
    assert_eq!((image.width(), image.height()), (298, 421));
    Ok(())
}

#[test]
fn test_pdf_pages_follow_the_selection() -> TestResult {
    let session = session_with_pages(numbered_pages(6))?;
    let pdf = ExportedPdf::from_output(session.export(&request(ExportFormat::Pdf, "2-3,5", 24))?)?;
    assert_eq!(pdf.page_count(), 3);
    assert_eq!(pdf.media_size(1)?, (595.0, 842.0));
    Ok(())
}

#[test]
fn test_landscape_letter_pdf_uses_rotated_media_box() -> TestResult {
    let mut session = session_with_pages(["Across the long edge."])?;
    let mut settings = RenderingSettings::default();
    settings.paper.size = PaperSize::Letter;
    settings.paper.orientation = Orientation::Landscape;
    session.set_settings(settings)?;

    let pdf = ExportedPdf::from_output(session.export(&request(ExportFormat::Pdf, "all", 24))?)?;
    assert_eq!(pdf.media_size(1)?, (792.0, 612.0));
    Ok(())
}

#[test]
fn test_zip_archives_every_page() -> TestResult {
    let session = session_with_pages(numbered_pages(3))?;
    let ExportOutput::Blob(file) = session.export(&request(ExportFormat::Zip, "all", 18))? else {
        return Err("zip export should produce a single blob".into());
    };
    assert_eq!(file.name, "pages.zip");

    let mut archive = zip::ZipArchive::new(Cursor::new(file.bytes))?;
    assert_eq!(archive.len(), 3);
    let entry = archive.by_name("page-2.png")?;
    assert!(entry.size() > 0);
    Ok(())
}

#[test]
fn test_jpeg_export_writes_one_file_per_page() -> TestResult {
    let session = session_with_pages(numbered_pages(2))?;
    let output = session.export(&request(ExportFormat::Jpg, "all", 18))?;

    let dir = tempfile::tempdir()?;
    let written = output.write_to_dir(dir.path(), Duration::ZERO)?;
    assert_eq!(written.len(), 2);
    assert!(written[1].ends_with("page-2.jpg"));

    let image = image::open(&written[0])?;
    assert_eq!(image.color(), image::ColorType::Rgb8);
    Ok(())
}

#[test]
fn test_same_seed_exports_identical_bytes() -> TestResult {
    let export = || -> Result<Vec<u8>, Box<dyn std::error::Error>> {
        let session = session_with_pages(numbered_pages(2))?;
        let output = session.export(&request(ExportFormat::Png, "2", 24))?;
        Ok(output.files()[0].bytes.clone())
    };
    assert_eq!(export()?, export()?);
    Ok(())
}

#[test]
fn test_out_of_range_selection_is_rejected() -> TestResult {
    let session = session_with_pages(numbered_pages(2))?;
    let err = session
        .export(&request(ExportFormat::Pdf, "5-7", 24))
        .unwrap_err();
    assert!(matches!(
        err,
        SessionError::Export(penmark::ExportError::NoPages)
    ));
    Ok(())
}
