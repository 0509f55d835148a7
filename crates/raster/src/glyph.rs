//! Glyph shapes in glyph-local coordinates: origin on the baseline at the left edge of
//! the advance, y growing downwards.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tiny_skia::{Path, PathBuilder};
use ttf_parser::{Face, OutlineBuilder};

/// Collects a TrueType outline into a tiny-skia path, flipping the font's y-up space.
struct OutlinePathBuilder {
    builder: PathBuilder,
    scale: f32,
}

impl OutlineBuilder for OutlinePathBuilder {
    fn move_to(&mut self, x: f32, y: f32) {
        self.builder.move_to(x * self.scale, -y * self.scale);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.builder.line_to(x * self.scale, -y * self.scale);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.builder
            .quad_to(x1 * self.scale, -y1 * self.scale, x * self.scale, -y * self.scale);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.builder.cubic_to(
            x1 * self.scale,
            -y1 * self.scale,
            x2 * self.scale,
            -y2 * self.scale,
            x * self.scale,
            -y * self.scale,
        );
    }

    fn close(&mut self) {
        self.builder.close();
    }
}

/// Outline of `ch` at `size_px`, or `None` when the face has no outline for it.
pub fn outline_path(face: &Face<'_>, ch: char, size_px: f32) -> Option<Path> {
    let glyph = face.glyph_index(ch)?;
    let units = face.units_per_em();
    if units == 0 {
        return None;
    }
    let mut builder = OutlinePathBuilder {
        builder: PathBuilder::new(),
        scale: size_px / units as f32,
    };
    face.outline_glyph(glyph, &mut builder)?;
    builder.builder.finish()
}

/// Procedural pen strokes standing in for a glyph no typeface can draw. The strokes
/// are meant to be stroked, not filled, and depend only on `ch`, `size_px`, `advance`
/// and `seed`.
pub fn fallback_strokes(ch: char, size_px: f32, advance: f32, seed: u64) -> Option<Path> {
    let mut rng = StdRng::seed_from_u64(seed ^ ch as u64);
    let width = (advance * 0.75).max(size_px * 0.1);
    let left = (advance - width) / 2.0;
    let height = if ch.is_ascii_punctuation() {
        size_px * 0.15
    } else if ch.is_uppercase() || ch.is_ascii_digit() {
        size_px * 0.7
    } else {
        size_px * 0.48
    };

    let mut point = |rng: &mut StdRng| {
        (
            left + rng.random::<f32>() * width,
            -rng.random::<f32>() * height,
        )
    };

    let strokes = 1 + (ch as u32 % 3) as usize;
    let mut pb = PathBuilder::new();
    for _ in 0..strokes {
        let (x0, y0) = point(&mut rng);
        let (x1, y1) = point(&mut rng);
        let (x2, y2) = point(&mut rng);
        let (x3, y3) = point(&mut rng);
        pb.move_to(x0, y0);
        pb.cubic_to(x1, y1, x2, y2, x3, y3);
    }
    pb.finish()
}
