//! The variation parameters handed to a render pass as a whole.
//!
//! Every struct here deserializes from camelCase JSON with all fields optional, so a
//! caller may supply only the knobs it cares about:
//!
//! ```json
//! { "fontSizePx": 22, "ink": { "color": "#1b2a6b", "flow": "fountain" } }
//! ```
//!
//! Lengths are in base pixels (72 DPI); export scales them with the surface.
use crate::color::Color;
use crate::geometry::{GeometryError, Margins, PageGeometry};
use crate::paper::PaperSettings;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InkFlow {
    Fine,
    #[default]
    Medium,
    Heavy,
    Fountain,
}

impl InkFlow {
    /// Base stroke opacity before pressure variation.
    pub fn opacity(self) -> f32 {
        match self {
            InkFlow::Fine => 0.82,
            InkFlow::Medium => 0.9,
            InkFlow::Heavy => 0.97,
            InkFlow::Fountain => 0.93,
        }
    }

    /// Multiplier applied to the blot probability.
    pub fn blot_factor(self) -> f32 {
        match self {
            InkFlow::Fine => 0.3,
            InkFlow::Medium => 1.0,
            InkFlow::Heavy => 1.8,
            InkFlow::Fountain => 2.4,
        }
    }

    /// Multiplier applied to the bleeding intensity.
    pub fn bleed_factor(self) -> f32 {
        match self {
            InkFlow::Fine => 0.5,
            InkFlow::Medium => 1.0,
            InkFlow::Heavy => 1.4,
            InkFlow::Fountain => 1.7,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InkSettings {
    pub color: Color,
    pub flow: InkFlow,
    /// Maximum per-channel colour deviation, as a fraction of 255.
    pub variation: f32,
}

impl Default for InkSettings {
    fn default() -> Self {
        Self {
            color: Color::rgb(0x1b, 0x2a, 0x6b),
            flow: InkFlow::Medium,
            variation: 0.06,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct JitterSettings {
    /// Stroke position offset magnitude, px.
    pub letter_px: f32,
    /// Per-glyph vertical offset magnitude, px.
    pub baseline_px: f32,
    /// Per-glyph rotation magnitude, degrees.
    pub rotation_deg: f32,
    /// Relative glyph size deviation (0.05 = ±5%).
    pub size: f32,
    /// Letter-spacing deviation magnitude, px.
    pub spacing_px: f32,
    /// Amplitude of the low-frequency baseline wave, px.
    pub drift_amplitude_px: f32,
    /// Wavelength of the baseline wave, px.
    pub drift_wavelength_px: f32,
}

impl Default for JitterSettings {
    fn default() -> Self {
        Self {
            letter_px: 0.6,
            baseline_px: 0.9,
            rotation_deg: 2.5,
            size: 0.04,
            spacing_px: 0.5,
            drift_amplitude_px: 1.6,
            drift_wavelength_px: 180.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DecorationSettings {
    /// Chance per glyph of scattering tiny ink droplets around it.
    pub splatter_probability: f32,
    /// Chance per glyph (before ink-flow scaling) of a blot near the baseline.
    pub blot_probability: f32,
    /// Vertical wobble of underlines, px.
    pub underline_wobble_px: f32,
}

impl Default for DecorationSettings {
    fn default() -> Self {
        Self {
            splatter_probability: 0.05,
            blot_probability: 0.04,
            underline_wobble_px: 0.8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AgingSettings {
    /// Overall strength of tint, spots and grain, 0..1.
    pub intensity: f32,
    pub grain: bool,
    pub grain_opacity: f32,
    /// Strength of the screen-only edge vignette, 0..1.
    pub vignette: f32,
    /// Spots per 10 000 px² on materials that show spots.
    pub spot_density: f32,
}

impl Default for AgingSettings {
    fn default() -> Self {
        Self {
            intensity: 0.5,
            grain: true,
            grain_opacity: 0.06,
            vignette: 0.25,
            spot_density: 0.15,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderingSettings {
    pub font_family: String,
    pub font_size_px: f32,
    pub line_pitch_px: f32,
    pub margins: Margins,
    pub letter_spacing_px: f32,
    pub word_spacing_px: f32,
    /// Forward lean of the strokes, degrees. Positive leans right.
    pub slant_deg: f32,
    pub pressure_variance: f32,
    /// Ink bleeding intensity, 0..1.
    pub bleeding: f32,
    pub ink: InkSettings,
    pub jitter: JitterSettings,
    pub decoration: DecorationSettings,
    pub aging: AgingSettings,
    pub paper: PaperSettings,
}

impl Default for RenderingSettings {
    fn default() -> Self {
        Self {
            font_family: "Caveat".to_string(),
            font_size_px: 20.0,
            line_pitch_px: 28.0,
            margins: Margins::new(64.0, 48.0, 56.0, 72.0),
            letter_spacing_px: 0.4,
            word_spacing_px: 0.0,
            slant_deg: 4.0,
            pressure_variance: 0.15,
            bleeding: 0.25,
            ink: InkSettings::default(),
            jitter: JitterSettings::default(),
            decoration: DecorationSettings::default(),
            aging: AgingSettings::default(),
            paper: PaperSettings::default(),
        }
    }
}

impl RenderingSettings {
    /// Derives the base-resolution page geometry from the paper sub-record, using
    /// `margins` instead of the settings' own margins when given.
    pub fn page_geometry(&self, margins: Option<&Margins>) -> Result<PageGeometry, GeometryError> {
        let (width, height) = self.paper.page_size_pt();
        PageGeometry::new(
            width,
            height,
            margins.unwrap_or(&self.margins).clone(),
            self.line_pitch_px,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paper::{PaperMaterial, PaperSize};

    #[test]
    fn partial_json_keeps_defaults() {
        let json = r##"{
            "fontSizePx": 24,
            "ink": { "color": "#000000", "flow": "fountain" },
            "paper": { "size": "letter", "material": "vintage" },
            "margins": "40 30"
        }"##;
        let s: RenderingSettings = serde_json::from_str(json).unwrap();
        assert_eq!(s.font_size_px, 24.0);
        assert_eq!(s.ink.flow, InkFlow::Fountain);
        assert_eq!(s.ink.variation, InkSettings::default().variation);
        assert_eq!(s.paper.size, PaperSize::Letter);
        assert_eq!(s.paper.material, PaperMaterial::Vintage);
        assert_eq!(s.margins, Margins::new(40.0, 30.0, 40.0, 30.0));
        assert_eq!(s.jitter, JitterSettings::default());
    }

    #[test]
    fn geometry_follows_paper_and_override() {
        let s = RenderingSettings::default();
        let g = s.page_geometry(None).unwrap();
        assert_eq!((g.width(), g.height()), (595.0, 842.0));
        let g = s.page_geometry(Some(&Margins::all(10.0))).unwrap();
        assert_eq!(g.left_edge(), 10.0);
    }
}
