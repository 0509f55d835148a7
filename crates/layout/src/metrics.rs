//! Advance widths shared by pagination and rendering.
//!
//! Both passes measure through the same [`GlyphMetrics`] value, so a line the engine
//! decided fits is drawn with the same nominal widths; the only remaining difference is
//! the renderer's seeded spacing jitter.

use crate::config::LayoutConfig;
use crate::fonts::TypefaceRegistry;
use penmark_types::{FontStyle, FontWeight};
use std::collections::HashMap;
use std::sync::RwLock;

/// Formatting that affects how wide a character is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font_size_px: f32,
    pub bold: bool,
    pub italic: bool,
}

impl TextStyle {
    pub fn new(font_size_px: f32) -> Self {
        Self {
            font_size_px,
            bold: false,
            italic: false,
        }
    }

    pub fn weight(&self) -> FontWeight {
        FontWeight::from_bold(self.bold)
    }

    pub fn style(&self) -> FontStyle {
        FontStyle::from_italic(self.italic)
    }
}

pub trait GlyphMetrics: Send + Sync {
    /// Horizontal advance of `ch` in pixels, without letter spacing.
    fn advance(&self, ch: char, style: &TextStyle) -> f32;

    fn measure(&self, text: &str, style: &TextStyle) -> f32 {
        text.chars().map(|c| self.advance(c, style)).sum()
    }
}

/// Width estimate used when no typeface is available: a fixed fraction of the font
/// size per character, with coarse narrow/wide classes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AverageWidthMetrics {
    pub width_ratio: f32,
    pub bold_factor: f32,
}

impl Default for AverageWidthMetrics {
    fn default() -> Self {
        let config = LayoutConfig::default();
        Self {
            width_ratio: config.average_char_width_ratio,
            bold_factor: config.bold_width_factor,
        }
    }
}

impl AverageWidthMetrics {
    fn class_factor(ch: char) -> f32 {
        match ch {
            ' ' | '\u{a0}' | '\t' => 0.56,
            'i' | 'l' | 'j' | 't' | 'f' | 'r' | 'I' | '.' | ',' | ';' | ':' | '\'' | '!' | '|' => 0.6,
            'm' | 'w' | 'M' | 'W' | '@' | '%' => 1.45,
            c if c.is_uppercase() => 1.2,
            c if c.is_control() => 0.0,
            _ => 1.0,
        }
    }
}

impl GlyphMetrics for AverageWidthMetrics {
    fn advance(&self, ch: char, style: &TextStyle) -> f32 {
        let base = style.font_size_px * self.width_ratio * Self::class_factor(ch);
        if style.bold { base * self.bold_factor } else { base }
    }
}

type AdvanceKey = (char, bool, bool);

/// Real advance widths from the active typeface, falling back per character to the
/// average-width estimate for missing glyphs or a missing face.
pub struct FontMetrics {
    registry: TypefaceRegistry,
    family: String,
    fallback: AverageWidthMetrics,
    /// Advance per em, `None` when the face lacks the glyph.
    cache: RwLock<HashMap<AdvanceKey, Option<f32>>>,
}

impl std::fmt::Debug for FontMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontMetrics")
            .field("family", &self.family)
            .finish()
    }
}

impl FontMetrics {
    pub fn new(registry: TypefaceRegistry, family: impl Into<String>) -> Self {
        Self {
            registry,
            family: family.into(),
            fallback: AverageWidthMetrics::default(),
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_fallback(mut self, fallback: AverageWidthMetrics) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn registry(&self) -> &TypefaceRegistry {
        &self.registry
    }

    fn advance_per_em(&self, ch: char, style: &TextStyle) -> Option<f32> {
        let key = (ch, style.bold, style.italic);
        if let Ok(cache) = self.cache.read()
            && let Some(hit) = cache.get(&key)
        {
            return *hit;
        }

        let lookup_char = if ch == '\u{a0}' || ch == '\t' { ' ' } else { ch };
        let per_em = self
            .registry
            .resolve(&self.family, style.weight(), style.style())
            .and_then(|typeface| {
                let face = typeface.as_face()?;
                let glyph = face.glyph_index(lookup_char)?;
                let advance = face.glyph_hor_advance(glyph)?;
                let units = face.units_per_em();
                (units > 0).then(|| advance as f32 / units as f32)
            });

        if let Ok(mut cache) = self.cache.write() {
            cache.insert(key, per_em);
        }
        per_em
    }
}

impl GlyphMetrics for FontMetrics {
    fn advance(&self, ch: char, style: &TextStyle) -> f32 {
        if ch.is_control() {
            return 0.0;
        }
        match self.advance_per_em(ch, style) {
            Some(per_em) => per_em * style.font_size_px,
            None => self.fallback.advance(ch, style),
        }
    }
}
