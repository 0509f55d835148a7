//! Raster encoders for finished surfaces.

use crate::ExportError;
use image::codecs::jpeg::JpegEncoder;
use image::{Rgb, RgbImage};
use penmark_raster::Surface;

pub fn encode_png(surface: &Surface) -> Result<Vec<u8>, ExportError> {
    Ok(surface.encode_png()?)
}

/// Encodes the surface as JPEG, compositing any transparency over white first.
pub fn encode_jpeg(surface: &Surface, quality: u8) -> Result<Vec<u8>, ExportError> {
    let rgba = surface.to_rgba_image();
    let flattened = RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let over_white = |c: u8| {
            let a = a as u32;
            ((c as u32 * a + 255 * (255 - a) + 127) / 255) as u8
        };
        Rgb([over_white(r), over_white(g), over_white(b)])
    });

    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut bytes, quality.clamp(1, 100)).encode_image(&flattened)?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transparent_surface_flattens_to_white_jpeg() {
        let surface = Surface::new(8.0, 8.0, 1.0).unwrap();
        let jpeg = encode_jpeg(&surface, 90).unwrap();
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);

        let decoded = image::load_from_memory(&jpeg).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), (8, 8));
        assert!(decoded.pixels().all(|p| p.0.iter().all(|&c| c >= 250)));
    }

    #[test]
    fn png_keeps_dimensions() {
        let surface = Surface::new(12.0, 5.0, 2.0).unwrap();
        let png = encode_png(&surface).unwrap();
        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (24, 10));
    }
}
