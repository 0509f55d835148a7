use serde::{de, Deserialize, Deserializer, Serialize};
use std::hash::{Hash, Hasher};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn zero() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
        }
    }

    /// Scales `self` down (never up) so it fits inside `bounds`, keeping the aspect ratio.
    pub fn fit_within(self, bounds: Size) -> Size {
        if self.width <= 0.0 || self.height <= 0.0 {
            return Size::zero();
        }
        let k = (bounds.width / self.width)
            .min(bounds.height / self.height)
            .min(1.0);
        Size::new(self.width * k, self.height * k)
    }
}

#[derive(Serialize, Debug, Default, Clone, PartialEq)]
pub struct Margins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Hash for Margins {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.top.to_bits().hash(state);
        self.right.to_bits().hash(state);
        self.bottom.to_bits().hash(state);
        self.left.to_bits().hash(state);
    }
}

impl Eq for Margins {}

impl Margins {
    pub fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    pub fn all(value: f32) -> Self {
        Self::new(value, value, value, value)
    }

    pub fn scaled(&self, factor: f32) -> Self {
        Self::new(
            self.top * factor,
            self.right * factor,
            self.bottom * factor,
            self.left * factor,
        )
    }

    /// Parse a CSS-style length (e.g. "10px", "5mm", "12"). Unitless values are pixels
    /// at the 72 DPI base resolution.
    fn parse_length(input: &str) -> Result<f32, String> {
        let input = input.trim();
        let (number, factor) = if let Some(v) = input.strip_suffix("px") {
            (v, 1.0)
        } else if let Some(v) = input.strip_suffix("pt") {
            (v, 1.0)
        } else if let Some(v) = input.strip_suffix("in") {
            (v, 72.0)
        } else if let Some(v) = input.strip_suffix("cm") {
            (v, 28.35)
        } else if let Some(v) = input.strip_suffix("mm") {
            (v, 2.835)
        } else {
            (input, 1.0)
        };
        number
            .trim()
            .parse::<f32>()
            .map(|v| v * factor)
            .map_err(|e| format!("Invalid number: {}", e))
    }

    /// Parse CSS-style margin shorthand (1, 2, or 4 values)
    pub fn parse_shorthand(input: &str) -> Result<Self, String> {
        let values = input
            .split_whitespace()
            .map(Self::parse_length)
            .collect::<Result<Vec<_>, _>>()?;

        match values.as_slice() {
            [all] => Ok(Margins::all(*all)),
            [y, x] => Ok(Margins::new(*y, *x, *y, *x)),
            [top, right, bottom, left] => Ok(Margins::new(*top, *right, *bottom, *left)),
            _ => Err(format!(
                "Invalid margin shorthand: expected 1, 2, or 4 values, got {}",
                values.len()
            )),
        }
    }
}

impl<'de> Deserialize<'de> for Margins {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct MarginsVisitor;
        impl<'de> de::Visitor<'de> for MarginsVisitor {
            type Value = Margins;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a string like '40' or '40px 60px' or a map")
            }

            fn visit_str<E>(self, value: &str) -> Result<Margins, E>
            where
                E: de::Error,
            {
                Margins::parse_shorthand(value).map_err(E::custom)
            }

            fn visit_f64<E>(self, value: f64) -> Result<Margins, E>
            where
                E: de::Error,
            {
                Ok(Margins::all(value as f32))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Margins, E>
            where
                E: de::Error,
            {
                Ok(Margins::all(value as f32))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Margins, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut margins = Margins::default();
                while let Some(key) = map.next_key::<String>()? {
                    match key.as_str() {
                        "top" => margins.top = map.next_value()?,
                        "right" => margins.right = map.next_value()?,
                        "bottom" => margins.bottom = map.next_value()?,
                        "left" => margins.left = map.next_value()?,
                        _ => {
                            let _ = map.next_value::<de::IgnoredAny>()?;
                        }
                    }
                }
                Ok(margins)
            }
        }
        deserializer.deserialize_any(MarginsVisitor)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("Page size must be positive, got {width:.2}x{height:.2}.")]
    NonPositiveSize { width: f32, height: f32 },
    #[error("Line pitch must be positive, got {0:.2}.")]
    NonPositiveLinePitch(f32),
    #[error("Unusable page geometry: bottom edge {bottom:.2} is not below top margin {top:.2}.")]
    UnusablePageArea { top: f32, bottom: f32 },
    #[error("Unusable page geometry: right edge {right:.2} is not right of left margin {left:.2}.")]
    NoHorizontalSpace { left: f32, right: f32 },
    #[error("Line pitch {pitch:.2} exceeds the usable page height {available:.2}.")]
    LinePitchTooLarge { pitch: f32, available: f32 },
}

/// The fixed rectangle, margins and line pitch that bound where content may be placed.
///
/// Construction validates that at least one full line fits inside the margins, so
/// the pagination loop can always make progress.
#[derive(Debug, Clone, PartialEq)]
pub struct PageGeometry {
    width: f32,
    height: f32,
    margins: Margins,
    line_pitch: f32,
}

impl PageGeometry {
    pub fn new(
        width: f32,
        height: f32,
        margins: Margins,
        line_pitch: f32,
    ) -> Result<Self, GeometryError> {
        if !(width > 0.0 && height > 0.0) {
            return Err(GeometryError::NonPositiveSize { width, height });
        }
        if !(line_pitch > 0.0) {
            return Err(GeometryError::NonPositiveLinePitch(line_pitch));
        }
        let bottom = height - margins.bottom;
        if !(bottom > margins.top) {
            return Err(GeometryError::UnusablePageArea {
                top: margins.top,
                bottom,
            });
        }
        let right = width - margins.right;
        if !(right > margins.left) {
            return Err(GeometryError::NoHorizontalSpace {
                left: margins.left,
                right,
            });
        }
        let available = bottom - margins.top;
        if line_pitch > available {
            return Err(GeometryError::LinePitchTooLarge {
                pitch: line_pitch,
                available,
            });
        }
        Ok(Self {
            width,
            height,
            margins,
            line_pitch,
        })
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn margins(&self) -> &Margins {
        &self.margins
    }

    pub fn line_pitch(&self) -> f32 {
        self.line_pitch
    }

    pub fn content_top(&self) -> f32 {
        self.margins.top
    }

    pub fn content_bottom(&self) -> f32 {
        self.height - self.margins.bottom
    }

    pub fn left_edge(&self) -> f32 {
        self.margins.left
    }

    pub fn right_edge(&self) -> f32 {
        self.width - self.margins.right
    }

    pub fn usable_width(&self) -> f32 {
        self.right_edge() - self.left_edge()
    }

    pub fn usable_height(&self) -> f32 {
        self.content_bottom() - self.content_top()
    }

    pub fn content_rect(&self) -> Rect {
        Rect::new(
            self.left_edge(),
            self.content_top(),
            self.usable_width(),
            self.usable_height(),
        )
    }

    /// Same page with a different set of margins (e.g. a per-page override).
    pub fn with_margins(&self, margins: Margins) -> Result<Self, GeometryError> {
        Self::new(self.width, self.height, margins, self.line_pitch)
    }

    /// Uniformly scales every dimension. Validity is preserved for positive factors.
    pub fn scaled(&self, factor: f32) -> Result<Self, GeometryError> {
        Self::new(
            self.width * factor,
            self.height * factor,
            self.margins.scaled(factor),
            self.line_pitch * factor,
        )
    }
}
