use crate::interface::{ImageSizer, NoImages};
use crate::metrics::AverageWidthMetrics;
use crate::output::LaidOutPage;
use crate::{LayoutError, paginate};
use penmark_markup::tokenize;
use penmark_types::{Margins, PageGeometry, RenderingSettings};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// 595x842 page, margins 80/60/80/80, 40px line pitch: 17 lines of 455px each.
pub fn test_geometry() -> PageGeometry {
    PageGeometry::new(595.0, 842.0, Margins::new(80.0, 60.0, 80.0, 80.0), 40.0)
        .expect("valid test geometry")
}

/// 20px text without extra spacing, so with the default heuristic an `a` is 10px
/// wide and a space 5.6px.
pub fn test_settings() -> RenderingSettings {
    RenderingSettings {
        font_size_px: 20.0,
        letter_spacing_px: 0.0,
        word_spacing_px: 0.0,
        ..Default::default()
    }
}

pub fn layout(markup: &str) -> Vec<LaidOutPage> {
    layout_with(markup, &test_geometry(), &NoImages).expect("layout succeeds")
}

pub fn layout_with(
    markup: &str,
    geometry: &PageGeometry,
    images: &dyn ImageSizer,
) -> Result<Vec<LaidOutPage>, LayoutError> {
    init_logging();
    let tokens = tokenize(markup);
    paginate(
        &tokens,
        geometry,
        &test_settings(),
        &AverageWidthMetrics::default(),
        images,
    )
}

/// Joins the text of every page back together: hyphens inserted by the engine are
/// removed, word pieces re-joined, and words separated by single spaces.
pub fn reconstruct(pages: &[LaidOutPage]) -> String {
    let mut out = String::new();
    for span in pages
        .iter()
        .flat_map(|p| &p.lines)
        .flat_map(|l| &l.spans)
        .filter(|s| !s.marker)
    {
        let text = if span.hyphenated {
            span.text.strip_suffix('-').unwrap_or(&span.text)
        } else {
            span.text.as_str()
        };
        if span.char_offset == 0 && !out.is_empty() {
            out.push(' ');
        }
        out.push_str(text);
    }
    out
}

pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
