//! Typeface registry shared by pagination and rendering.
//!
//! A `TypefaceRegistry` is owned by the session that created it; faces registered on it
//! are visible only through that registry and are released by `unregister` or when the
//! last clone is dropped.
//!
//! Resolution order for `(family, weight, style)`:
//! 1. faces registered on this registry (exact, then the family's regular face)
//! 2. the optional external `FontProvider`
//! 3. system fonts via fontdb (feature `system-fonts`), family then generic sans
//! 4. `None`: callers fall back to the average-width metrics and procedural strokes

use penmark_traits::{FontError, FontProvider, FontQuery, SharedFontData};
use penmark_types::{FontStyle, FontWeight};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Parsed-on-demand font bytes plus the family they were resolved for.
pub struct Typeface {
    family: String,
    data: SharedFontData,
}

impl std::fmt::Debug for Typeface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Typeface")
            .field("family", &self.family)
            .field("data_len", &self.data.len())
            .finish()
    }
}

impl Typeface {
    pub fn new(family: impl Into<String>, data: SharedFontData) -> Self {
        Self {
            family: family.into(),
            data,
        }
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn data(&self) -> &SharedFontData {
        &self.data
    }

    /// Creates a lightweight face view over the font data.
    pub fn as_face(&self) -> Option<ttf_parser::Face<'_>> {
        ttf_parser::Face::parse(&self.data, 0).ok()
    }
}

#[derive(Debug, Clone, Hash, PartialEq, Eq)]
struct FaceKey {
    family: String,
    weight: FontWeight,
    style: FontStyle,
}

impl FaceKey {
    fn new(family: &str, weight: FontWeight, style: FontStyle) -> Self {
        Self {
            family: family.trim().to_lowercase(),
            weight,
            style,
        }
    }
}

/// Fraction of the font size by which a family's strokes are lifted so they sit on the
/// ruled line. Handwriting faces differ a lot in how deep their descenders hang.
pub fn baseline_offset(family: &str) -> f32 {
    match family.trim().to_lowercase().as_str() {
        "caveat" => 0.10,
        "homemade apple" => 0.18,
        "indie flower" => 0.14,
        "dancing script" => 0.08,
        "shadows into light" => 0.16,
        "reenie beanie" => 0.12,
        "kalam" => 0.09,
        "patrick hand" => 0.11,
        "rock salt" => 0.2,
        _ => 0.12,
    }
}

/// A session-scoped set of typefaces.
#[derive(Clone)]
pub struct TypefaceRegistry {
    registered: Arc<RwLock<HashMap<FaceKey, Arc<Typeface>>>>,
    external_provider: Option<Arc<dyn FontProvider>>,
    /// Provider and system lookups, including misses.
    resolved_cache: Arc<RwLock<HashMap<FaceKey, Option<Arc<Typeface>>>>>,
    #[cfg(feature = "system-fonts")]
    db: Arc<RwLock<fontdb::Database>>,
}

impl std::fmt::Debug for TypefaceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypefaceRegistry")
            .field("families", &self.families())
            .field("has_provider", &self.external_provider.is_some())
            .finish()
    }
}

impl Default for TypefaceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypefaceRegistry {
    /// An empty registry with no system fonts loaded.
    pub fn new() -> Self {
        Self {
            registered: Arc::new(RwLock::new(HashMap::new())),
            external_provider: None,
            resolved_cache: Arc::new(RwLock::new(HashMap::new())),
            #[cfg(feature = "system-fonts")]
            db: Arc::new(RwLock::new(fontdb::Database::new())),
        }
    }

    /// Fonts from the provider are consulted after registered faces.
    pub fn with_provider(mut self, provider: Arc<dyn FontProvider>) -> Self {
        self.external_provider = Some(provider);
        self.clear_resolved();
        self
    }

    /// Loads the platform's installed fonts into the fallback database.
    #[cfg(feature = "system-fonts")]
    pub fn with_system_fonts(self, enable: bool) -> Self {
        if enable && let Ok(mut db) = self.db.write() {
            db.load_system_fonts();
            log::debug!("Loaded {} system font faces", db.len());
        }
        self.clear_resolved();
        self
    }

    /// Registers font bytes for one face of `family`.
    ///
    /// # Errors
    ///
    /// Returns `FontError::InvalidData` if the bytes are not a parseable font.
    pub fn register(
        &self,
        family: &str,
        weight: FontWeight,
        style: FontStyle,
        data: Vec<u8>,
    ) -> Result<(), FontError> {
        if let Err(e) = ttf_parser::Face::parse(&data, 0) {
            return Err(FontError::InvalidData(format!(
                "'{}' is not a usable font: {}",
                family, e
            )));
        }
        let key = FaceKey::new(family, weight, style);
        let mut registered = self.registered.write().map_err(|_| FontError::LoadFailed {
            path: family.to_string(),
            message: "typeface registry lock poisoned".to_string(),
        })?;
        log::debug!(
            "Registering typeface '{}' ({:?}, {:?}), {} bytes",
            family,
            weight,
            style,
            data.len()
        );
        registered.insert(key, Arc::new(Typeface::new(family.trim(), Arc::new(data))));
        drop(registered);
        self.clear_resolved();
        Ok(())
    }

    /// Registers a font file under the family name stored inside it, with weight and
    /// style read from the font's own flags. Returns the family name.
    pub fn register_bytes(&self, data: Vec<u8>) -> Result<String, FontError> {
        let (family, weight, style) = {
            let face = ttf_parser::Face::parse(&data, 0)
                .map_err(|e| FontError::InvalidData(e.to_string()))?;
            let family = extract_family_name(&face)
                .ok_or_else(|| FontError::InvalidData("font has no family name".to_string()))?;
            let weight = FontWeight::from_bold(face.is_bold());
            let style = FontStyle::from_italic(face.is_italic());
            (family, weight, style)
        };
        self.register(&family, weight, style, data)?;
        Ok(family)
    }

    /// Drops every registered face of `family`. Returns how many faces were released.
    pub fn unregister(&self, family: &str) -> usize {
        let family = family.trim().to_lowercase();
        let removed = match self.registered.write() {
            Ok(mut registered) => {
                let before = registered.len();
                registered.retain(|key, _| key.family != family);
                before - registered.len()
            }
            Err(_) => {
                log::warn!("Typeface registry lock poisoned; '{}' not released", family);
                0
            }
        };
        if removed > 0 {
            log::debug!("Released {} face(s) of '{}'", removed, family);
            self.clear_resolved();
        }
        removed
    }

    /// Families registered directly on this registry, sorted.
    pub fn families(&self) -> Vec<String> {
        let mut families: Vec<String> = self
            .registered
            .read()
            .map(|r| r.values().map(|t| t.family().to_string()).collect())
            .unwrap_or_default();
        families.sort_by_key(|f| f.to_lowercase());
        families.dedup_by(|a, b| a.eq_ignore_ascii_case(b));
        families
    }

    pub fn is_registered(&self, family: &str) -> bool {
        let family = family.trim().to_lowercase();
        self.registered
            .read()
            .map(|r| r.keys().any(|k| k.family == family))
            .unwrap_or(false)
    }

    /// Finds the best face for the request, or `None` when nothing at all is available.
    pub fn resolve(&self, family: &str, weight: FontWeight, style: FontStyle) -> Option<Arc<Typeface>> {
        let key = FaceKey::new(family, weight, style);

        if let Ok(registered) = self.registered.read() {
            let regular = FaceKey::new(family, FontWeight::Regular, FontStyle::Normal);
            if let Some(face) = registered.get(&key).or_else(|| registered.get(&regular)) {
                return Some(face.clone());
            }
        }

        if let Ok(cache) = self.resolved_cache.read()
            && let Some(hit) = cache.get(&key)
        {
            return hit.clone();
        }

        let found = self
            .resolve_from_provider(family, weight, style)
            .or_else(|| self.resolve_from_system(family, weight, style));
        if found.is_none() {
            log::debug!("No typeface for '{}' ({:?}, {:?})", family, weight, style);
        }
        if let Ok(mut cache) = self.resolved_cache.write() {
            cache.insert(key, found.clone());
        }
        found
    }

    fn resolve_from_provider(
        &self,
        family: &str,
        weight: FontWeight,
        style: FontStyle,
    ) -> Option<Arc<Typeface>> {
        let provider = self.external_provider.as_ref()?;
        let query = FontQuery::new(family).with_weight(weight).with_style(style);
        match provider.load_font(&query) {
            Ok(data) => {
                log::debug!("Typeface '{}' found via external provider", family);
                Some(Arc::new(Typeface::new(family, data)))
            }
            Err(e) => {
                log::debug!("External provider miss: {}", e);
                None
            }
        }
    }

    #[cfg(feature = "system-fonts")]
    fn resolve_from_system(
        &self,
        family: &str,
        weight: FontWeight,
        style: FontStyle,
    ) -> Option<Arc<Typeface>> {
        let db = self.db.read().ok()?;
        let query = fontdb::Query {
            families: &[fontdb::Family::Name(family), fontdb::Family::SansSerif],
            weight: fontdb::Weight(weight.numeric_value()),
            stretch: fontdb::Stretch::Normal,
            style: match style {
                FontStyle::Normal => fontdb::Style::Normal,
                FontStyle::Italic => fontdb::Style::Italic,
            },
        };
        let id = db.query(&query)?;
        let face_info = db.face(id)?;
        let resolved_family = face_info
            .families
            .first()
            .map(|(name, _)| name.clone())
            .unwrap_or_else(|| family.to_string());

        let bytes: Vec<u8> = match &face_info.source {
            fontdb::Source::Binary(data) => data.as_ref().as_ref().to_vec(),
            fontdb::Source::File(path) => match std::fs::read(path) {
                Ok(bytes) => bytes,
                Err(e) => {
                    log::warn!("Failed to read system font {}: {}", path.display(), e);
                    return None;
                }
            },
            _ => return None,
        };
        log::debug!("Typeface '{}' resolved to system face '{}'", family, resolved_family);
        Some(Arc::new(Typeface::new(resolved_family, Arc::new(bytes))))
    }

    #[cfg(not(feature = "system-fonts"))]
    fn resolve_from_system(
        &self,
        _family: &str,
        _weight: FontWeight,
        _style: FontStyle,
    ) -> Option<Arc<Typeface>> {
        None
    }

    fn clear_resolved(&self) {
        if let Ok(mut cache) = self.resolved_cache.write() {
            cache.clear();
        }
    }
}

fn extract_family_name(face: &ttf_parser::Face<'_>) -> Option<String> {
    let names = face.names();
    [
        ttf_parser::name_id::TYPOGRAPHIC_FAMILY,
        ttf_parser::name_id::FAMILY,
    ]
    .iter()
    .find_map(|id| {
        names
            .into_iter()
            .filter(|n| n.name_id == *id)
            .find_map(|n| n.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use penmark_traits::InMemoryFontProvider;

    #[test]
    fn garbage_bytes_are_rejected() {
        let registry = TypefaceRegistry::new();
        let err = registry
            .register("Broken", FontWeight::Regular, FontStyle::Normal, vec![0, 1, 2, 3])
            .unwrap_err();
        assert!(matches!(err, FontError::InvalidData(_)));
        assert!(!registry.is_registered("Broken"));
        assert!(registry.register_bytes(vec![9; 16]).is_err());
    }

    #[test]
    fn provider_bytes_are_returned_without_parsing() {
        let provider = InMemoryFontProvider::new();
        provider
            .add_font("Scribble", FontWeight::Regular, FontStyle::Normal, vec![1, 2, 3])
            .unwrap();
        let registry = TypefaceRegistry::new().with_provider(Arc::new(provider));

        let face = registry
            .resolve("scribble", FontWeight::Bold, FontStyle::Italic)
            .unwrap();
        assert_eq!(face.family(), "scribble");
        assert_eq!(face.data().len(), 3);
        assert!(face.as_face().is_none());
    }

    #[test]
    fn empty_registry_resolves_to_none_without_system_fonts() {
        let registry = TypefaceRegistry::new();
        assert!(
            registry
                .resolve("Nothing", FontWeight::Regular, FontStyle::Normal)
                .is_none()
        );
        assert_eq!(registry.unregister("Nothing"), 0);
        assert!(registry.families().is_empty());
    }

    #[test]
    fn face_keys_ignore_case_and_padding() {
        assert_eq!(
            FaceKey::new(" Caveat", FontWeight::Bold, FontStyle::Normal),
            FaceKey::new("caveat", FontWeight::Bold, FontStyle::Normal)
        );
        assert_ne!(
            FaceKey::new("caveat", FontWeight::Bold, FontStyle::Normal),
            FaceKey::new("caveat", FontWeight::Regular, FontStyle::Normal)
        );
    }

    #[test]
    fn baseline_offsets_are_static() {
        assert_eq!(baseline_offset("Caveat"), baseline_offset("caveat"));
        assert_eq!(baseline_offset("Unknown Hand"), 0.12);
    }
}
