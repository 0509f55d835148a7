//! Procedural handwriting: draws the glyphs of a laid-out page with seeded jitter,
//! pressure, bleed and ink decorations.

use crate::glyph::{fallback_strokes, outline_path};
use crate::images::ImageStore;
use crate::noise::{self, GlyphSeed};
use crate::surface::{Surface, sk_color};
use penmark_layout::{
    GlyphMetrics, LaidOutPage, Line, Span, TextStyle, Typeface, TypefaceRegistry, baseline_offset,
};
use penmark_types::{Color, RenderingSettings};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use std::sync::Arc;
use tiny_skia::{
    FillRule, FilterQuality, GradientStop, LineCap, LineJoin, LinearGradient, Paint, Path,
    PathBuilder, PixmapPaint, Point, SpreadMode, Stroke, Transform,
};

/// Bleed passes are only drawn once `bleeding × flow` exceeds this.
pub const BLEED_THRESHOLD: f32 = 0.3;
const MAX_BLEED_PASSES: usize = 3;
const ITALIC_EXTRA_SLANT_DEG: f32 = 10.0;

const SPACING_SALT: u64 = 0x51;
const ROTATION_SALT: u64 = 0x52;
const DRIFT_SALT: u64 = 0x53;
const UNDERLINE_SALT: u64 = 0x54;

/// Where one glyph was drawn, in base page units.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphPlacement {
    pub ch: char,
    pub x: f32,
    pub baseline_y: f32,
    pub advance: f32,
    pub font_size_px: f32,
    pub rotation_deg: f32,
    pub bold: bool,
    pub italic: bool,
    /// Drawn with procedural strokes instead of a typeface outline.
    pub fallback: bool,
}

/// What a page render drew.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageRender {
    pub glyphs: Vec<GlyphPlacement>,
    /// Rendered width minus laid-out width, per span in page order.
    pub span_drift: Vec<f32>,
    pub images_drawn: usize,
    pub images_skipped: usize,
}

impl PageRender {
    pub fn fallback_glyphs(&self) -> usize {
        self.glyphs.iter().filter(|g| g.fallback).count()
    }

    pub fn max_drift(&self) -> f32 {
        self.span_drift.iter().fold(0.0, |m, d| m.max(d.abs()))
    }
}

enum Shape {
    Outline { path: Path, face_is_bold: bool },
    Strokes(Path),
}

impl Shape {
    fn path(&self) -> &Path {
        match self {
            Shape::Outline { path, .. } | Shape::Strokes(path) => path,
        }
    }
}

/// Per-glyph values drawn from the glyph's seeded generator.
struct GlyphVariation {
    dx: f32,
    dy: f32,
    size_factor: f32,
    ink: Color,
    opacity: f32,
    blot: bool,
    splatter: bool,
}

fn signed(rng: &mut StdRng) -> f32 {
    rng.random::<f32>() * 2.0 - 1.0
}

impl GlyphVariation {
    fn sample(rng: &mut StdRng, settings: &RenderingSettings) -> Self {
        let jitter = &settings.jitter;
        let ink = &settings.ink;
        let spread = ink.variation * 255.0;
        let dx = signed(rng) * jitter.letter_px;
        let dy = signed(rng) * jitter.baseline_px;
        let size_factor = 1.0 + signed(rng) * jitter.size;
        let color = ink
            .color
            .shift(signed(rng) * spread, signed(rng) * spread, signed(rng) * spread);
        let pressure = 1.0 - rng.random::<f32>() * settings.pressure_variance;
        let blot_chance = settings.decoration.blot_probability * ink.flow.blot_factor();
        let blot = rng.random_bool(blot_chance.clamp(0.0, 1.0) as f64);
        let splatter = rng.random_bool(settings.decoration.splatter_probability.clamp(0.0, 1.0) as f64);
        Self {
            dx,
            dy,
            size_factor,
            ink: color,
            opacity: (ink.flow.opacity() * pressure).clamp(0.05, 1.0),
            blot,
            splatter,
        }
    }
}

/// Draws laid-out pages. Advances come from the same [`GlyphMetrics`] the page was
/// paginated with.
pub struct GlyphRenderer<'a> {
    registry: &'a TypefaceRegistry,
    metrics: &'a dyn GlyphMetrics,
    images: Option<&'a ImageStore>,
}

impl<'a> GlyphRenderer<'a> {
    pub fn new(registry: &'a TypefaceRegistry, metrics: &'a dyn GlyphMetrics) -> Self {
        Self {
            registry,
            metrics,
            images: None,
        }
    }

    pub fn with_images(mut self, images: &'a ImageStore) -> Self {
        self.images = Some(images);
        self
    }

    pub fn render_page(
        &self,
        surface: &mut Surface,
        page: &LaidOutPage,
        settings: &RenderingSettings,
        seed_base: u64,
    ) -> PageRender {
        let mut out = PageRender::default();
        let mut faces: HashMap<(bool, bool), Option<Arc<Typeface>>> = HashMap::new();

        for line in &page.lines {
            for span in &line.spans {
                let drift = self.render_span(
                    surface,
                    page.index,
                    line,
                    span,
                    settings,
                    seed_base,
                    &mut faces,
                    &mut out.glyphs,
                );
                out.span_drift.push(drift);
                if span.underline {
                    draw_underline(surface, line, span, settings, seed_base);
                }
            }
        }

        if out.fallback_glyphs() > 0 {
            log::warn!(
                "Typeface '{}' could not draw {} glyph(s) on page {}; using fallback strokes",
                settings.font_family,
                out.fallback_glyphs(),
                page.index + 1
            );
        }

        self.draw_images(surface, page, &mut out);
        log::debug!(
            "Rendered page {}: {} glyphs, {} images",
            page.index + 1,
            out.glyphs.len(),
            out.images_drawn
        );
        out
    }

    /// Draws one span and returns how far its rendered width strayed from the layout.
    #[allow(clippy::too_many_arguments)]
    fn render_span(
        &self,
        surface: &mut Surface,
        page_index: usize,
        line: &Line,
        span: &Span,
        settings: &RenderingSettings,
        seed_base: u64,
        faces: &mut HashMap<(bool, bool), Option<Arc<Typeface>>>,
        placements: &mut Vec<GlyphPlacement>,
    ) -> f32 {
        let style = &span.style;
        let jitter = &settings.jitter;
        let drift_seed = noise::mix(
            noise::mix(seed_base, DRIFT_SALT),
            ((page_index as u64) << 32) | line.paragraph_index as u64,
        );
        let typeface = faces
            .entry((style.bold, style.italic))
            .or_insert_with(|| {
                self.registry
                    .resolve(&settings.font_family, style.weight(), style.style())
            })
            .clone();

        let mut pen = if line.rtl { span.x + span.width } else { span.x };
        let mut rendered = 0.0;
        for (i, ch) in span.text.chars().enumerate() {
            let seed = GlyphSeed {
                page: page_index,
                paragraph: line.paragraph_index,
                word: span.word_index,
                ch: span.char_offset + i,
            };
            let key = seed.derive(seed_base);
            let spacing = noise::noise(key ^ SPACING_SALT) * jitter.spacing_px;
            let advance = self.metrics.advance(ch, style) + settings.letter_spacing_px + spacing;
            rendered += advance;
            let x = if line.rtl { pen - advance } else { pen };
            pen = if line.rtl { pen - advance } else { pen + advance };
            if ch.is_whitespace() || ch.is_control() {
                continue;
            }

            let wavelength = jitter.drift_wavelength_px.max(1.0);
            let drift = noise::value_noise(x / wavelength, drift_seed) * jitter.drift_amplitude_px;
            let rotation = noise::noise(key ^ ROTATION_SALT) * jitter.rotation_deg;
            let mut rng = StdRng::seed_from_u64(key);
            let variation = GlyphVariation::sample(&mut rng, settings);

            let size = style.font_size_px * variation.size_factor;
            let lift = baseline_offset(&settings.font_family) * style.font_size_px;
            let origin_x = x + variation.dx;
            let origin_y = line.baseline_y - lift + variation.dy + drift;
            let slant = settings.slant_deg + if style.italic { ITALIC_EXTRA_SLANT_DEG } else { 0.0 };
            let local = Transform::from_translate(origin_x, origin_y)
                .pre_concat(Transform::from_rotate(rotation))
                .pre_concat(Transform::from_row(1.0, 0.0, -slant.to_radians().tan(), 1.0, 0.0, 0.0));
            let transform = surface.transform().pre_concat(local);

            let shape = typeface
                .as_deref()
                .and_then(|t| {
                    let face = t.as_face()?;
                    let path = outline_path(&face, ch, size)?;
                    Some(Shape::Outline {
                        path,
                        face_is_bold: face.is_bold(),
                    })
                })
                .or_else(|| fallback_strokes(ch, size, advance, key).map(Shape::Strokes));

            let fallback = matches!(shape, Some(Shape::Strokes(_)) | None);
            if let Some(shape) = &shape {
                draw_glyph(surface, shape, style, size, advance, &variation, settings, transform, &mut rng);
            }

            placements.push(GlyphPlacement {
                ch,
                x,
                baseline_y: origin_y,
                advance,
                font_size_px: size,
                rotation_deg: rotation,
                bold: style.bold,
                italic: style.italic,
                fallback,
            });
        }
        rendered - span.width
    }

    fn draw_images(&self, surface: &mut Surface, page: &LaidOutPage, out: &mut PageRender) {
        for placement in &page.images {
            let Some(pixmap) = self.images.and_then(|store| store.pixmap(&placement.src)) else {
                log::warn!("Skipping image '{}': not available", placement.src);
                out.images_skipped += 1;
                continue;
            };
            let sx = placement.width / pixmap.width() as f32;
            let sy = placement.height / pixmap.height() as f32;
            let transform = surface
                .transform()
                .pre_concat(Transform::from_row(sx, 0.0, 0.0, sy, placement.x, placement.y));
            let paint = PixmapPaint {
                quality: FilterQuality::Bilinear,
                ..PixmapPaint::default()
            };
            surface
                .pixmap_mut()
                .draw_pixmap(0, 0, tiny_skia::Pixmap::as_ref(&pixmap), &paint, transform, None);
            out.images_drawn += 1;
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_glyph(
    surface: &mut Surface,
    shape: &Shape,
    style: &TextStyle,
    size: f32,
    advance: f32,
    variation: &GlyphVariation,
    settings: &RenderingSettings,
    transform: Transform,
    rng: &mut StdRng,
) {
    let pixmap = surface.pixmap_mut();
    let path = shape.path();
    let round = |width: f32| Stroke {
        width,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Stroke::default()
    };

    let bleed = settings.bleeding * settings.ink.flow.bleed_factor();
    if bleed > BLEED_THRESHOLD {
        let passes = (((bleed - BLEED_THRESHOLD) / 0.2).ceil() as usize).clamp(1, MAX_BLEED_PASSES);
        let mut paint = Paint::default();
        paint.set_color(sk_color(variation.ink, 0.05 * bleed.min(1.0) * variation.opacity));
        for pass in 1..=passes {
            let width = pass as f32 * 0.6 * size / 20.0;
            pixmap.stroke_path(path, &paint, &round(width), transform, None);
        }
    }

    let mut paint = Paint::default();
    match LinearGradient::new(
        Point::from_xy(0.0, -size * 0.75),
        Point::from_xy(0.0, size * 0.1),
        vec![
            GradientStop::new(0.0, sk_color(variation.ink, variation.opacity)),
            GradientStop::new(1.0, sk_color(variation.ink.darken(0.3), variation.opacity)),
        ],
        SpreadMode::Pad,
        Transform::identity(),
    ) {
        Some(shader) => paint.shader = shader,
        None => paint.set_color(sk_color(variation.ink, variation.opacity)),
    }

    match shape {
        Shape::Outline { path, face_is_bold } => {
            pixmap.fill_path(path, &paint, FillRule::Winding, transform, None);
            if style.bold && !face_is_bold {
                pixmap.stroke_path(path, &paint, &round(size * 0.04), transform, None);
            }
        }
        Shape::Strokes(path) => {
            let weight = if style.bold { 1.5 } else { 1.0 };
            pixmap.stroke_path(path, &paint, &round(size * 0.075 * weight), transform, None);
        }
    }

    if variation.blot {
        let cx = rng.random::<f32>() * advance;
        let cy = -rng.random::<f32>() * size * 0.15;
        let radius = size * rng.random_range(0.05f32..0.09);
        if let Some(dot) = PathBuilder::from_circle(cx, cy, radius) {
            let mut paint = Paint::default();
            paint.set_color(sk_color(variation.ink, 0.25 * variation.opacity));
            pixmap.fill_path(&dot, &paint, FillRule::Winding, transform, None);
        }
    }

    if variation.splatter {
        let count = rng.random_range(2..=5);
        let mut pb = PathBuilder::new();
        for _ in 0..count {
            let angle = rng.random::<f32>() * std::f32::consts::TAU;
            let distance = size * rng.random_range(0.3f32..0.9);
            let radius = size * rng.random_range(0.01f32..0.03);
            pb.push_circle(
                advance / 2.0 + angle.cos() * distance,
                -size * 0.3 + angle.sin() * distance,
                radius,
            );
        }
        if let Some(dots) = pb.finish() {
            let mut paint = Paint::default();
            paint.set_color(sk_color(variation.ink, rng.random_range(0.3f32..0.6)));
            pixmap.fill_path(&dots, &paint, FillRule::Winding, transform, None);
        }
    }
}

/// Wavy stroke under a span, wobbling by up to `underline_wobble_px`.
fn draw_underline(
    surface: &mut Surface,
    line: &Line,
    span: &Span,
    settings: &RenderingSettings,
    seed_base: u64,
) {
    const STEP: f32 = 6.0;
    let seed = noise::mix(
        noise::mix(seed_base, UNDERLINE_SALT),
        ((line.paragraph_index as u64) << 32) | span.word_index as u64,
    );
    let wobble = settings.decoration.underline_wobble_px;
    let y = line.baseline_y + span.style.font_size_px * 0.12;
    let end = span.x + span.width;

    let mut pb = PathBuilder::new();
    pb.move_to(span.x, y + noise::value_noise(0.0, seed) * wobble);
    let mut x = span.x;
    while x < end {
        x = (x + STEP).min(end);
        let t = (x - span.x) / STEP;
        pb.line_to(x, y + noise::value_noise(t, seed) * wobble);
    }
    let Some(path) = pb.finish() else {
        return;
    };

    let mut paint = Paint::default();
    paint.set_color(sk_color(settings.ink.color, settings.ink.flow.opacity()));
    let stroke = Stroke {
        width: (span.style.font_size_px * 0.05).max(1.0),
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Stroke::default()
    };
    let transform = surface.transform();
    surface
        .pixmap_mut()
        .stroke_path(&path, &paint, &stroke, transform, None);
}
