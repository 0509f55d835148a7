use crate::RenderError;
use image::RgbaImage;
use penmark_types::Color;
use tiny_skia::{Pixmap, Transform};

/// A pixel buffer plus the scale from base page units to its pixels.
pub struct Surface {
    pixmap: Pixmap,
    scale: f32,
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("width", &self.pixmap.width())
            .field("height", &self.pixmap.height())
            .field("scale", &self.scale)
            .finish()
    }
}

impl Surface {
    /// Allocates a transparent surface of `round(base * scale)` pixels per axis.
    pub fn new(base_width: f32, base_height: f32, scale: f32) -> Result<Self, RenderError> {
        let width = (base_width * scale).round().max(1.0) as u32;
        let height = (base_height * scale).round().max(1.0) as u32;
        let pixmap =
            Pixmap::new(width, height).ok_or(RenderError::SurfaceAllocation { width, height })?;
        Ok(Self { pixmap, scale })
    }

    /// Surface for an export at `dpi`, relative to the 72 DPI base resolution.
    pub fn for_dpi(base_width: f32, base_height: f32, dpi: f32) -> Result<Self, RenderError> {
        Self::new(base_width, base_height, dpi / 72.0)
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Maps base page units to device pixels.
    pub fn transform(&self) -> Transform {
        Transform::from_scale(self.scale, self.scale)
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn pixmap_mut(&mut self) -> &mut Pixmap {
        &mut self.pixmap
    }

    pub fn clear(&mut self) {
        self.pixmap.fill(tiny_skia::Color::TRANSPARENT);
    }

    /// Straight-alpha RGBA copy of the surface.
    pub fn to_rgba_image(&self) -> RgbaImage {
        let mut out = RgbaImage::new(self.width(), self.height());
        for (dst, src) in out.pixels_mut().zip(self.pixmap.pixels()) {
            let c = src.demultiply();
            *dst = image::Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
        }
        out
    }

    pub fn encode_png(&self) -> Result<Vec<u8>, RenderError> {
        self.pixmap
            .encode_png()
            .map_err(|e| RenderError::Encoding(e.to_string()))
    }
}

/// Converts a penmark colour to a tiny-skia colour, multiplying its alpha by `opacity`.
pub fn sk_color(color: Color, opacity: f32) -> tiny_skia::Color {
    let alpha = (color.a * opacity).clamp(0.0, 1.0);
    tiny_skia::Color::from_rgba8(color.r, color.g, color.b, (alpha * 255.0).round() as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimensions_follow_scale() {
        let surface = Surface::for_dpi(595.0, 842.0, 150.0).unwrap();
        assert_eq!(surface.width(), (595.0f32 * 150.0 / 72.0).round() as u32);
        assert_eq!(surface.height(), (842.0f32 * 150.0 / 72.0).round() as u32);

        let base = Surface::new(595.0, 842.0, 1.0).unwrap();
        assert_eq!((base.width(), base.height()), (595, 842));
    }

    #[test]
    fn new_surface_is_transparent() {
        let surface = Surface::new(10.0, 10.0, 1.0).unwrap();
        let image = surface.to_rgba_image();
        assert!(image.pixels().all(|p| p.0[3] == 0));
    }

    #[test]
    fn png_encoding_produces_signature() {
        let surface = Surface::new(4.0, 4.0, 1.0).unwrap();
        let png = surface.encode_png().unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn colour_alpha_is_scaled() {
        let c = sk_color(Color::rgb(10, 20, 30).with_alpha(0.5), 0.5);
        assert!((c.alpha() - 0.25).abs() < 0.01);
    }
}
