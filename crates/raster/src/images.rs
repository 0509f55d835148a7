//! Decoded inline images, cached for the lifetime of a render context.

use penmark_layout::ImageSizer;
use penmark_traits::ResourceProvider;
use penmark_types::Size;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tiny_skia::{Pixmap, PremultipliedColorU8};

fn premultiply(c: u8, a: u8) -> u8 {
    let v = c as u16 * a as u16 + 127;
    ((v + (v >> 8)) >> 8) as u8
}

/// Decodes PNG or JPEG bytes into a premultiplied pixmap.
pub fn decode_image_to_pixmap(bytes: &[u8]) -> Result<Pixmap, String> {
    let rgba = image::load_from_memory(bytes)
        .map_err(|e| e.to_string())?
        .to_rgba8();
    let (width, height) = rgba.dimensions();
    let mut pixmap =
        Pixmap::new(width, height).ok_or_else(|| format!("invalid image size {}x{}", width, height))?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(rgba.pixels()) {
        let [r, g, b, a] = src.0;
        if let Some(c) = PremultipliedColorU8::from_rgba(
            premultiply(r, a),
            premultiply(g, a),
            premultiply(b, a),
            a,
        ) {
            *dst = c;
        }
    }
    Ok(pixmap)
}

/// Loads images through a [`ResourceProvider`] and keeps the decoded pixmaps. Failures
/// are cached too, so a broken source is reported once and then skipped.
pub struct ImageStore {
    provider: Arc<dyn ResourceProvider>,
    cache: RwLock<HashMap<String, Option<Arc<Pixmap>>>>,
}

impl std::fmt::Debug for ImageStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageStore")
            .field("provider", &self.provider.name())
            .field("cached", &self.len())
            .finish()
    }
}

impl ImageStore {
    pub fn new(provider: Arc<dyn ResourceProvider>) -> Self {
        Self {
            provider,
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn pixmap(&self, src: &str) -> Option<Arc<Pixmap>> {
        if let Ok(cache) = self.cache.read()
            && let Some(hit) = cache.get(src)
        {
            return hit.clone();
        }

        let decoded = match self.provider.load(src) {
            Ok(bytes) => match decode_image_to_pixmap(&bytes) {
                Ok(pixmap) => {
                    log::debug!("Decoded image '{}' ({}x{})", src, pixmap.width(), pixmap.height());
                    Some(Arc::new(pixmap))
                }
                Err(e) => {
                    log::warn!("Image '{}' could not be decoded: {}", src, e);
                    None
                }
            },
            Err(e) => {
                log::warn!("Image '{}' could not be loaded: {}", src, e);
                None
            }
        };

        if let Ok(mut cache) = self.cache.write() {
            cache.insert(src.to_string(), decoded.clone());
        }
        decoded
    }

    /// Drops every cached decode, successful or not.
    pub fn clear(&self) {
        if let Ok(mut cache) = self.cache.write() {
            cache.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.cache.read().map(|c| c.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ImageSizer for ImageStore {
    fn image_size(&self, src: &str) -> Option<Size> {
        self.pixmap(src)
            .map(|p| Size::new(p.width() as f32, p.height() as f32))
    }
}
