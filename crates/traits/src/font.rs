//! FontProvider trait for supplying typeface bytes from outside the engine.

use penmark_types::{FontStyle, FontWeight};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use thiserror::Error;

/// Shared, immutable font file bytes.
pub type SharedFontData = Arc<Vec<u8>>;

#[derive(Error, Debug, Clone)]
pub enum FontError {
    #[error("Font not found: {family} ({weight:?}, {style:?})")]
    NotFound {
        family: String,
        weight: FontWeight,
        style: FontStyle,
    },

    #[error("Failed to load font from '{path}': {message}")]
    LoadFailed { path: String, message: String },

    #[error("Invalid font data: {0}")]
    InvalidData(String),
}

/// Describes the face being asked for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FontQuery {
    pub family: String,
    pub weight: FontWeight,
    pub style: FontStyle,
}

impl FontQuery {
    pub fn new(family: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            weight: FontWeight::Regular,
            style: FontStyle::Normal,
        }
    }

    pub fn with_weight(mut self, weight: FontWeight) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_style(mut self, style: FontStyle) -> Self {
        self.style = style;
        self
    }
}

/// A source of font bytes consulted before the system font database.
pub trait FontProvider: Send + Sync {
    fn load_font(&self, query: &FontQuery) -> Result<SharedFontData, FontError>;

    fn has_family(&self, family: &str) -> bool;
}

type FaceKey = (String, FontWeight, FontStyle);

/// Pre-loaded fonts keyed by lower-cased family, weight and style.
#[derive(Debug, Default)]
pub struct InMemoryFontProvider {
    faces: RwLock<HashMap<FaceKey, SharedFontData>>,
}

impl InMemoryFontProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_font(
        &self,
        family: &str,
        weight: FontWeight,
        style: FontStyle,
        data: Vec<u8>,
    ) -> Result<(), FontError> {
        let mut faces = self.faces.write().map_err(|_| FontError::LoadFailed {
            path: family.to_string(),
            message: "font store lock poisoned".to_string(),
        })?;
        faces.insert((family.to_lowercase(), weight, style), Arc::new(data));
        Ok(())
    }
}

impl FontProvider for InMemoryFontProvider {
    fn load_font(&self, query: &FontQuery) -> Result<SharedFontData, FontError> {
        let faces = self.faces.read().map_err(|_| FontError::LoadFailed {
            path: query.family.clone(),
            message: "font store lock poisoned".to_string(),
        })?;
        let family = query.family.to_lowercase();
        faces
            .get(&(family.clone(), query.weight, query.style))
            .or_else(|| faces.get(&(family, FontWeight::Regular, FontStyle::Normal)))
            .cloned()
            .ok_or_else(|| FontError::NotFound {
                family: query.family.clone(),
                weight: query.weight,
                style: query.style,
            })
    }

    fn has_family(&self, family: &str) -> bool {
        let family = family.to_lowercase();
        self.faces
            .read()
            .map(|f| f.keys().any(|(name, _, _)| *name == family))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_regular_face_of_the_family() {
        let provider = InMemoryFontProvider::new();
        provider
            .add_font("Caveat", FontWeight::Regular, FontStyle::Normal, vec![1, 2])
            .unwrap();

        let query = FontQuery::new("caveat").with_weight(FontWeight::Bold);
        assert_eq!(&*provider.load_font(&query).unwrap(), &[1, 2]);
        assert!(provider.has_family("CAVEAT"));
        assert!(matches!(
            provider.load_font(&FontQuery::new("Other")),
            Err(FontError::NotFound { .. })
        ));
    }
}
