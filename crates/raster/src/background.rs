//! Paper compositor: base fill, aging, rule overlays and grain before the glyphs, and
//! the vignette after them.

use crate::noise;
use crate::surface::{Surface, sk_color};
use penmark_types::{Color, PageGeometry, PaperMaterial, RenderingSettings, RulePattern};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tiny_skia::{
    BlendMode, FillRule, FilterQuality, GradientStop, LineCap, Paint, PathBuilder, Pattern,
    Pixmap, Point, PremultipliedColorU8, RadialGradient, Rect, Shader, SpreadMode, Stroke,
    Transform,
};

/// 5 mm in points, the pitch of graph and dot grids.
pub const GRID_PITCH: f32 = 14.17;
/// Distance between the left margin and the vertical margin rule.
pub const MARGIN_RULE_GAP: f32 = 8.0;

const RULE_COLOR: Color = Color::rgb(150, 180, 220);
const GRID_COLOR: Color = Color::rgb(160, 190, 215);
const DOT_COLOR: Color = Color::rgb(140, 150, 170);
const MARGIN_RULE_COLOR: Color = Color::rgb(214, 90, 90);
const SPOT_COLOR: Color = Color::rgb(140, 100, 50);
const GRAIN_TILE: u32 = 64;
const SPOT_SALT: u64 = 0x5907;
const GRAIN_SALT: u64 = 0x6a41;

/// Paints the sheet of paper under the glyphs.
pub fn paint_background(
    surface: &mut Surface,
    geometry: &PageGeometry,
    material: PaperMaterial,
    pattern: RulePattern,
    settings: &RenderingSettings,
    seed_base: u64,
) {
    let transform = surface.transform();
    let Some(page) = Rect::from_xywh(0.0, 0.0, geometry.width(), geometry.height()) else {
        return;
    };
    let aging = &settings.aging;

    let mut paint = Paint::default();
    paint.set_color(sk_color(material.base_color(), 1.0));
    surface.pixmap_mut().fill_rect(page, &paint, transform, None);

    if let Some(tint) = material.aging_tint() {
        let mut paint = Paint::default();
        paint.set_color(sk_color(tint, 0.5 + aging.intensity));
        surface.pixmap_mut().fill_rect(page, &paint, transform, None);
    }

    if material.has_spots() {
        paint_spots(surface, geometry, settings, seed_base);
    }

    match pattern {
        RulePattern::Blank => {}
        RulePattern::Ruled => paint_rules(surface, geometry),
        RulePattern::Graph => paint_grid(surface, geometry),
        RulePattern::Dotted => paint_dots(surface, geometry),
    }

    if material.has_margin_rule() || pattern == RulePattern::Ruled {
        let x = geometry.left_edge() - MARGIN_RULE_GAP;
        stroke_segments(
            surface,
            &[(x, 0.0, x, geometry.height())],
            MARGIN_RULE_COLOR.with_alpha(0.5),
            0.8,
        );
    }

    if aging.grain && aging.grain_opacity > 0.0 {
        paint_grain(surface, page, aging.grain_opacity, noise::mix(seed_base, GRAIN_SALT));
    }
}

/// Effects drawn over the finished page. Preview only; exports skip them.
pub fn apply_post_effects(surface: &mut Surface, geometry: &PageGeometry, settings: &RenderingSettings) {
    let strength = settings.aging.vignette.clamp(0.0, 1.0);
    if strength <= 0.0 {
        return;
    }
    let Some(page) = Rect::from_xywh(0.0, 0.0, geometry.width(), geometry.height()) else {
        return;
    };
    let center = Point::from_xy(geometry.width() / 2.0, geometry.height() / 2.0);
    let radius = geometry.width().hypot(geometry.height()) / 2.0;
    let stops = vec![
        GradientStop::new(0.0, tiny_skia::Color::from_rgba8(0, 0, 0, 0)),
        GradientStop::new(0.6, tiny_skia::Color::from_rgba8(0, 0, 0, 0)),
        GradientStop::new(1.0, sk_color(Color::BLACK, strength * 0.35)),
    ];
    let Some(shader) = RadialGradient::new(
        center,
        center,
        radius,
        stops,
        SpreadMode::Pad,
        Transform::identity(),
    ) else {
        return;
    };
    let paint = Paint {
        shader,
        ..Paint::default()
    };
    let transform = surface.transform();
    surface.pixmap_mut().fill_rect(page, &paint, transform, None);
}

/// Horizontal rules on every baseline of the content area.
fn paint_rules(surface: &mut Surface, geometry: &PageGeometry) {
    let pitch = geometry.line_pitch();
    let mut segments = Vec::new();
    let mut y = geometry.content_top() + pitch;
    while y <= geometry.content_bottom() + 0.01 {
        segments.push((0.0, y, geometry.width(), y));
        y += pitch;
    }
    stroke_segments(surface, &segments, RULE_COLOR.with_alpha(0.55), 0.75);
}

fn paint_grid(surface: &mut Surface, geometry: &PageGeometry) {
    let (w, h) = (geometry.width(), geometry.height());
    let mut segments = Vec::new();
    let mut x = GRID_PITCH;
    while x < w {
        segments.push((x, 0.0, x, h));
        x += GRID_PITCH;
    }
    let mut y = GRID_PITCH;
    while y < h {
        segments.push((0.0, y, w, y));
        y += GRID_PITCH;
    }
    stroke_segments(surface, &segments, GRID_COLOR.with_alpha(0.35), 0.5);
}

fn paint_dots(surface: &mut Surface, geometry: &PageGeometry) {
    let mut pb = PathBuilder::new();
    let mut y = GRID_PITCH;
    while y < geometry.height() {
        let mut x = GRID_PITCH;
        while x < geometry.width() {
            pb.push_circle(x, y, 0.7);
            x += GRID_PITCH;
        }
        y += GRID_PITCH;
    }
    let Some(path) = pb.finish() else {
        return;
    };
    let mut paint = Paint::default();
    paint.set_color(sk_color(DOT_COLOR, 0.5));
    let transform = surface.transform();
    surface
        .pixmap_mut()
        .fill_path(&path, &paint, FillRule::Winding, transform, None);
}

/// Sparse foxing spots, scattered from a seeded generator.
fn paint_spots(
    surface: &mut Surface,
    geometry: &PageGeometry,
    settings: &RenderingSettings,
    seed_base: u64,
) {
    let aging = &settings.aging;
    let area = geometry.width() * geometry.height();
    let count = (aging.spot_density * aging.intensity * area / 4_000.0).round() as usize;
    if count == 0 {
        return;
    }
    let mut rng = StdRng::seed_from_u64(noise::mix(seed_base, SPOT_SALT));
    let transform = surface.transform();
    for _ in 0..count {
        let cx = rng.random::<f32>() * geometry.width();
        let cy = rng.random::<f32>() * geometry.height();
        let radius = rng.random_range(2.0f32..9.0);
        let alpha = rng.random_range(0.04f32..0.12);
        let center = Point::from_xy(cx, cy);
        let stops = vec![
            GradientStop::new(0.0, sk_color(SPOT_COLOR, alpha)),
            GradientStop::new(1.0, sk_color(SPOT_COLOR, 0.0)),
        ];
        let (Some(shader), Some(path)) = (
            RadialGradient::new(center, center, radius, stops, SpreadMode::Pad, Transform::identity()),
            PathBuilder::from_circle(cx, cy, radius),
        ) else {
            continue;
        };
        let paint = Paint {
            shader,
            ..Paint::default()
        };
        surface
            .pixmap_mut()
            .fill_path(&path, &paint, FillRule::Winding, transform, None);
    }
}

/// Builds the tileable grain texture: near-white noise that only darkens under a
/// multiply blend.
fn grain_texture(seed: u64) -> Option<Pixmap> {
    let mut tile = Pixmap::new(GRAIN_TILE, GRAIN_TILE)?;
    for (i, px) in tile.pixels_mut().iter_mut().enumerate() {
        let v = 255 - (noise::noise(noise::mix(seed, i as u64)).abs() * 60.0) as u8;
        if let Some(c) = PremultipliedColorU8::from_rgba(v, v, v, 255) {
            *px = c;
        }
    }
    Some(tile)
}

fn paint_grain(surface: &mut Surface, page: Rect, opacity: f32, seed: u64) {
    let Some(tile) = grain_texture(seed) else {
        log::debug!("Grain texture could not be allocated; skipping grain");
        return;
    };
    // One texel per device pixel regardless of export density.
    let scale = surface.scale();
    let shader: Shader = Pattern::new(
        tile.as_ref(),
        SpreadMode::Repeat,
        FilterQuality::Nearest,
        opacity.clamp(0.0, 1.0),
        Transform::from_scale(1.0 / scale, 1.0 / scale),
    );
    let paint = Paint {
        shader,
        blend_mode: BlendMode::Multiply,
        ..Paint::default()
    };
    let transform = surface.transform();
    surface.pixmap_mut().fill_rect(page, &paint, transform, None);
}

fn stroke_segments(surface: &mut Surface, segments: &[(f32, f32, f32, f32)], color: Color, width: f32) {
    let mut pb = PathBuilder::new();
    for &(x0, y0, x1, y1) in segments {
        pb.move_to(x0, y0);
        pb.line_to(x1, y1);
    }
    let Some(path) = pb.finish() else {
        return;
    };
    let mut paint = Paint::default();
    paint.set_color(sk_color(color, 1.0));
    let stroke = Stroke {
        width,
        line_cap: LineCap::Butt,
        ..Stroke::default()
    };
    let transform = surface.transform();
    surface
        .pixmap_mut()
        .stroke_path(&path, &paint, &stroke, transform, None);
}
