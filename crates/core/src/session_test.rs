#![cfg(test)]

use crate::{EngineConfig, ExportFormat, ExportOutput, ExportRequest, FontFile, PageSelection, Session, SessionError};
use penmark_types::{GeometryError, Margins, RenderingSettings};
use std::fs;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn quiet_config() -> EngineConfig {
    EngineConfig {
        system_fonts: false,
        ..EngineConfig::default()
    }
}

fn five_page_session() -> Session {
    let mut session = Session::default().with_seed(42);
    session.load_texts((1..=5).map(|i| format!("This is page number {}.", i)));
    session
}

#[test]
fn test_page_operations_track_the_current_page() {
    let mut session = five_page_session();
    session.set_current_page(4).unwrap();
    session.remove_page(4).unwrap();
    assert_eq!(session.current_page(), 3);

    session.move_page(3, 0).unwrap();
    assert_eq!(session.current_page(), 0);
    assert_eq!(session.document().pages()[0].text, "This is page number 4.");

    session.duplicate_page(0).unwrap();
    session.insert_blank_page(0).unwrap();
    assert_eq!(session.document().len(), 6);
    assert_eq!(session.document().pages()[0].text, "");

    assert!(matches!(
        session.set_current_page(6),
        Err(SessionError::Document(_))
    ));
}

#[test]
fn test_current_page_follows_edits_around_it() {
    let mut session = five_page_session();
    let current_text = |s: &Session| s.document().pages()[s.current_page()].text.clone();

    session.set_current_page(2).unwrap();
    session.move_page(0, 4).unwrap();
    assert_eq!(session.current_page(), 1);
    assert_eq!(current_text(&session), "This is page number 3.");

    session.move_page(4, 0).unwrap();
    assert_eq!(session.current_page(), 2);
    assert_eq!(current_text(&session), "This is page number 3.");

    session.set_current_page(3).unwrap();
    session.remove_page(0).unwrap();
    assert_eq!(session.current_page(), 2);
    assert_eq!(current_text(&session), "This is page number 4.");

    session.insert_blank_page(0).unwrap();
    session.duplicate_page(0).unwrap();
    assert_eq!(current_text(&session), "This is page number 4.");

    let output = session
        .export(&ExportRequest {
            format: ExportFormat::Png,
            page_range: PageSelection::Current,
            dpi: 12,
            ..ExportRequest::default()
        })
        .unwrap();
    let expected = format!("page-{}.png", session.current_page() + 1);
    assert_eq!(output.files()[0].name, expected);
}

#[test]
fn test_unusable_settings_are_rejected_and_kept_out() {
    let mut session = Session::default();
    let bad = RenderingSettings {
        margins: Margins::new(500.0, 60.0, 400.0, 80.0),
        ..RenderingSettings::default()
    };
    let err = session.set_settings(bad).unwrap_err();
    assert!(matches!(
        err,
        SessionError::Layout(penmark_layout::LayoutError::Geometry(
            GeometryError::UnusablePageArea { .. }
        ))
    ));
    assert_eq!(session.settings(), &RenderingSettings::default());

    assert!(session
        .set_page_margins(0, Some(Margins::new(500.0, 60.0, 400.0, 80.0)))
        .is_err());
    assert!(session.document().pages()[0].margins.is_none());
}

#[test]
fn test_reflow_moves_overflow_onto_new_pages() {
    init_logging();
    let mut session = Session::default();
    session.load_texts(["<p>".to_string() + &"word ".repeat(3000) + "</p>", "tail".to_string()]);

    let overflow = session.paginate_page(0).unwrap().len();
    assert!(overflow > 1);

    let added = session.reflow_page(0).unwrap();
    assert_eq!(added, overflow - 1);
    assert_eq!(session.document().len(), overflow + 1);
    assert_eq!(session.document().pages()[overflow].text, "tail");

    let words: usize = session.document().pages()[..overflow]
        .iter()
        .map(|p| p.text.matches("word").count())
        .sum();
    assert_eq!(words, 3000);
    assert_eq!(session.paginate_page(0).unwrap().len(), 1);
}

#[test]
fn test_short_pages_do_not_reflow() {
    let mut session = five_page_session();
    assert_eq!(session.reflow_all().unwrap(), 0);
    assert_eq!(session.document().len(), 5);
}

#[test]
fn test_stale_preview_is_discarded() {
    init_logging();
    let mut session = five_page_session();
    let slow = session.begin_preview();
    session.set_current_page(1).unwrap();
    let fast = session.begin_preview();

    let committed = session.render_preview(fast, 0.25).unwrap();
    assert!(committed.is_committed());
    let stale = session.render_preview(slow, 0.25).unwrap();
    assert!(!stale.is_committed());

    let (page, width) = session
        .with_preview(|frame| (frame.page_index, frame.surface.width()))
        .unwrap();
    assert_eq!(page, 1);
    assert_eq!(width, (595.0f32 * 0.25).round() as u32);
}

#[test]
fn test_preview_matches_export_for_the_same_page() {
    let session = five_page_session();
    let ticket = session.begin_preview();
    session.render_preview(ticket, 0.5).unwrap();
    let glyphs = session.with_preview(|f| f.render.glyphs.len()).unwrap();
    assert_eq!(glyphs, "This is page number 1.".chars().filter(|c| !c.is_whitespace()).count());
}

#[test]
fn test_export_current_page_through_the_session() {
    init_logging();
    let mut session = five_page_session();
    session.set_current_page(2).unwrap();
    let output = session
        .export(&ExportRequest {
            format: ExportFormat::Png,
            page_range: PageSelection::Current,
            dpi: 36,
            ..ExportRequest::default()
        })
        .unwrap();

    let ExportOutput::Files(files) = output else {
        panic!("png export yields loose files");
    };
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].name, "page-3.png");
}

#[test]
fn test_empty_selection_is_an_error() {
    let session = five_page_session();
    let err = session
        .export(&ExportRequest {
            page_range: PageSelection::Range("8-9".into()),
            ..ExportRequest::default()
        })
        .unwrap_err();
    assert!(matches!(
        err,
        SessionError::Export(penmark_export::ExportError::NoPages)
    ));
}

#[test]
fn test_config_resource_dir_serves_images() {
    let dir = tempfile::tempdir().unwrap();
    image::RgbaImage::from_pixel(8, 4, image::Rgba([0, 0, 255, 255]))
        .save(dir.path().join("dot.png"))
        .unwrap();

    let config = EngineConfig {
        resource_dir: Some(dir.path().to_path_buf()),
        ..quiet_config()
    };
    let mut session = Session::from_config(&config).unwrap();
    session.set_text(0, r#"<img src="dot.png"> caption"#).unwrap();

    let pages = session.paginate_page(0).unwrap();
    assert_eq!(pages[0].images.len(), 1);
}

#[test]
fn test_unreadable_font_file_fails_the_config() {
    let config = EngineConfig {
        fonts: vec![FontFile {
            path: "/nonexistent/hand.ttf".into(),
            family: None,
            bold: false,
            italic: false,
        }],
        ..quiet_config()
    };
    let err = Session::from_config(&config).unwrap_err();
    assert!(matches!(err, SessionError::Config(_)));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("junk.ttf");
    fs::write(&path, b"not a font").unwrap();
    let config = EngineConfig {
        fonts: vec![FontFile {
            path,
            family: Some("Hand".into()),
            bold: false,
            italic: false,
        }],
        ..quiet_config()
    };
    assert!(matches!(
        Session::from_config(&config),
        Err(SessionError::Font(_))
    ));
}
