//! Paper sizes, orientation, materials and rule patterns.
use crate::color::Color;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaperSize {
    #[default]
    A4,
    Letter,
    A5,
    A6,
    Legal,
    Tabloid,
}

impl PaperSize {
    /// Portrait dimensions in points (1pt = 1px at the 72 DPI base resolution).
    pub fn dimensions_pt(self) -> (f32, f32) {
        match self {
            PaperSize::A4 => (595.0, 842.0),
            PaperSize::Letter => (612.0, 792.0),
            PaperSize::A5 => (420.0, 595.0),
            PaperSize::A6 => (298.0, 420.0),
            PaperSize::Legal => (612.0, 1008.0),
            PaperSize::Tabloid => (792.0, 1224.0),
        }
    }

    pub fn parse(s: &str) -> Result<Self, String> {
        match s.trim().to_lowercase().as_str() {
            "a4" => Ok(PaperSize::A4),
            "letter" => Ok(PaperSize::Letter),
            "a5" => Ok(PaperSize::A5),
            "a6" => Ok(PaperSize::A6),
            "legal" => Ok(PaperSize::Legal),
            "tabloid" => Ok(PaperSize::Tabloid),
            _ => Err(format!("Unknown paper size: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaperMaterial {
    #[default]
    White,
    Ruled,
    Cream,
    Vintage,
    Aged,
    Kraft,
}

impl PaperMaterial {
    pub fn base_color(self) -> Color {
        match self {
            PaperMaterial::White => Color::rgb(253, 253, 251),
            PaperMaterial::Ruled => Color::rgb(250, 251, 253),
            PaperMaterial::Cream => Color::rgb(250, 244, 225),
            PaperMaterial::Vintage => Color::rgb(238, 226, 196),
            PaperMaterial::Aged => Color::rgb(233, 222, 198),
            PaperMaterial::Kraft => Color::rgb(204, 170, 125),
        }
    }

    /// Translucent wash laid over the base fill; `None` for materials that do not age.
    pub fn aging_tint(self) -> Option<Color> {
        match self {
            PaperMaterial::Cream => Some(Color::rgb(226, 196, 140).with_alpha(0.08)),
            PaperMaterial::Vintage => Some(Color::rgb(180, 140, 80).with_alpha(0.12)),
            PaperMaterial::Aged => Some(Color::rgb(160, 120, 70).with_alpha(0.10)),
            _ => None,
        }
    }

    /// Whether sparse foxing spots are scattered over the sheet.
    pub fn has_spots(self) -> bool {
        matches!(self, PaperMaterial::Vintage | PaperMaterial::Cream)
    }

    /// Whether the vertical margin rule is always drawn.
    pub fn has_margin_rule(self) -> bool {
        matches!(
            self,
            PaperMaterial::Ruled | PaperMaterial::White | PaperMaterial::Aged
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RulePattern {
    Blank,
    #[default]
    Ruled,
    Graph,
    Dotted,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PaperSettings {
    pub size: PaperSize,
    pub orientation: Orientation,
    pub material: PaperMaterial,
    pub pattern: RulePattern,
}

impl PaperSettings {
    /// Page dimensions in points after applying the orientation.
    pub fn page_size_pt(&self) -> (f32, f32) {
        let (w, h) = self.size.dimensions_pt();
        match self.orientation {
            Orientation::Portrait => (w, h),
            Orientation::Landscape => (h, w),
        }
    }
}
