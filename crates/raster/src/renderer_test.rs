#![cfg(test)]

use crate::images::tests::png_bytes;
use crate::{ComposeOptions, GlyphRenderer, ImageStore, PageRender, Surface, compose_page};
use penmark_layout::{
    AverageWidthMetrics, ImageSizer, LaidOutPage, NoImages, PageGeometry, TypefaceRegistry,
    paginate,
};
use penmark_markup::tokenize;
use penmark_traits::InMemoryResourceProvider;
use penmark_types::{JitterSettings, Margins, RenderingSettings};
use std::sync::Arc;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn geometry() -> PageGeometry {
    PageGeometry::new(300.0, 400.0, Margins::all(40.0), 30.0).unwrap()
}

fn settings() -> RenderingSettings {
    RenderingSettings {
        font_size_px: 18.0,
        line_pitch_px: 30.0,
        margins: Margins::all(40.0),
        ..RenderingSettings::default()
    }
}

fn lay_out(text: &str, settings: &RenderingSettings, images: &dyn ImageSizer) -> Vec<LaidOutPage> {
    paginate(
        &tokenize(text),
        &geometry(),
        settings,
        &AverageWidthMetrics::default(),
        images,
    )
    .unwrap()
}

fn render(page: &LaidOutPage, settings: &RenderingSettings, seed: u64) -> (Vec<u8>, PageRender) {
    let registry = TypefaceRegistry::new();
    let metrics = AverageWidthMetrics::default();
    let renderer = GlyphRenderer::new(&registry, &metrics);
    let mut surface = Surface::new(300.0, 400.0, 1.0).unwrap();
    let report = compose_page(
        &mut surface,
        page,
        &geometry(),
        settings,
        &renderer,
        ComposeOptions::preview(seed),
    );
    (surface.pixmap().data().to_vec(), report)
}

const SAMPLE: &str = "<p>Dear <b>friend</b>, the <i>ink</i> is <u>still wet</u>.</p>\nSee you soon.";

#[test]
fn test_same_seed_renders_identical_pixels() {
    init_logging();
    let settings = settings();
    let pages = lay_out(SAMPLE, &settings, &NoImages);

    let (first, report) = render(&pages[0], &settings, 1234);
    let (second, _) = render(&pages[0], &settings, 1234);
    assert_eq!(first, second);
    assert_eq!(report.glyphs.len(), pages[0].glyph_count());

    let (other, _) = render(&pages[0], &settings, 1235);
    assert_ne!(first, other);
}

#[test]
fn test_missing_typeface_falls_back_to_strokes() {
    init_logging();
    let settings = settings();
    let pages = lay_out("hello", &settings, &NoImages);

    let registry = TypefaceRegistry::new();
    let metrics = AverageWidthMetrics::default();
    let renderer = GlyphRenderer::new(&registry, &metrics);
    let mut surface = Surface::new(300.0, 400.0, 1.0).unwrap();
    let report = renderer.render_page(&mut surface, &pages[0], &settings, 7);

    assert_eq!(report.fallback_glyphs(), 5);
    let inked = surface.to_rgba_image().pixels().filter(|p| p.0[3] > 0).count();
    assert!(inked > 0, "fallback strokes leave ink on a transparent surface");
}

#[test]
fn test_render_drift_is_bounded_by_spacing_jitter() {
    let mut settings = settings();
    settings.jitter = JitterSettings {
        spacing_px: 0.5,
        ..JitterSettings::default()
    };
    let text = "Handwriting drifts only as far as its spacing jitter allows. ".repeat(8);
    let pages = lay_out(&text, &settings, &NoImages);
    let (_, report) = render(&pages[0], &settings, 99);

    let spans = pages[0].lines.iter().flat_map(|l| &l.spans);
    for (span, drift) in spans.zip(&report.span_drift) {
        let bound = span.text.chars().count() as f32 * 0.5 + 1e-3;
        assert!(drift.abs() <= bound, "{:?} drifted {}", span.text, drift);
    }

    settings.jitter.spacing_px = 0.0;
    let (_, report) = render(&pages[0], &settings, 99);
    assert!(report.max_drift() < 1e-3);
}

#[test]
fn test_rtl_glyphs_advance_leftward() {
    let settings = settings();
    let pages = lay_out("مرحبا", &settings, &NoImages);
    let (_, report) = render(&pages[0], &settings, 5);

    let xs: Vec<f32> = report.glyphs.iter().map(|g| g.x).collect();
    assert_eq!(xs.len(), 5);
    assert!(xs.windows(2).all(|w| w[1] < w[0]), "{:?}", xs);
}

#[test]
fn test_baseline_stays_near_the_rule() {
    let settings = settings();
    let pages = lay_out(&"steady hand ".repeat(30), &settings, &NoImages);
    let (_, report) = render(&pages[0], &settings, 11);

    let jitter = &settings.jitter;
    let lift = penmark_layout::baseline_offset(&settings.font_family) * settings.font_size_px;
    let tolerance = jitter.baseline_px + jitter.drift_amplitude_px + 1e-3;
    for glyph in &report.glyphs {
        let nearest = pages[0]
            .lines
            .iter()
            .map(|line| (glyph.baseline_y - (line.baseline_y - lift)).abs())
            .fold(f32::INFINITY, f32::min);
        assert!(nearest <= tolerance, "{:?} strays {} from its rule", glyph.ch, nearest);
    }
}

#[test]
fn test_images_are_drawn_or_skipped() {
    init_logging();
    let provider = InMemoryResourceProvider::new();
    provider.add("red.png", png_bytes(20, 10, [255, 0, 0, 255])).unwrap();
    let store = ImageStore::new(Arc::new(provider));

    let settings = settings();
    let pages = lay_out(
        r#"<img src="red.png"><img src="gone.png">after"#,
        &settings,
        &store,
    );
    let placement = &pages[0].images[0];
    assert_eq!(pages[0].images.len(), 1, "unavailable images get no placement");

    let registry = TypefaceRegistry::new();
    let metrics = AverageWidthMetrics::default();
    let renderer = GlyphRenderer::new(&registry, &metrics).with_images(&store);
    let mut surface = Surface::new(300.0, 400.0, 1.0).unwrap();
    let report = renderer.render_page(&mut surface, &pages[0], &settings, 1);
    assert_eq!(report.images_drawn, 1);

    let image = surface.to_rgba_image();
    let center = image.get_pixel(
        (placement.x + placement.width / 2.0) as u32,
        (placement.y + placement.height / 2.0) as u32,
    );
    assert_eq!(center.0, [255, 0, 0, 255]);

    // Without a store the same placement is skipped, not fatal.
    let bare = GlyphRenderer::new(&registry, &metrics);
    let report = bare.render_page(&mut surface, &pages[0], &settings, 1);
    assert_eq!(report.images_skipped, 1);
}

#[test]
fn test_transparent_compose_leaves_paper_out() {
    let settings = settings();
    let pages = lay_out("", &settings, &NoImages);
    let registry = TypefaceRegistry::new();
    let metrics = AverageWidthMetrics::default();
    let renderer = GlyphRenderer::new(&registry, &metrics);

    let mut surface = Surface::new(300.0, 400.0, 1.0).unwrap();
    compose_page(
        &mut surface,
        &pages[0],
        &geometry(),
        &settings,
        &renderer,
        ComposeOptions::export(3, true),
    );
    assert!(surface.pixmap().data().iter().all(|&b| b == 0));

    compose_page(
        &mut surface,
        &pages[0],
        &geometry(),
        &settings,
        &renderer,
        ComposeOptions::export(3, false),
    );
    assert!(surface.to_rgba_image().pixels().all(|p| p.0[3] == 255));
}
