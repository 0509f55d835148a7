//! ResourceProvider trait for resolving the `src` of inline images.
//!
//! The pagination engine needs an image's intrinsic size before it can reserve lines,
//! and the renderer needs its pixels; both go through this seam so the core never
//! touches the filesystem or network directly.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{Arc, RwLock};
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ResourceError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Failed to load resource '{path}': {message}")]
    LoadFailed { path: String, message: String },

    #[error("Invalid resource format: {0}")]
    InvalidFormat(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for ResourceError {
    fn from(err: std::io::Error) -> Self {
        ResourceError::Io(err.to_string())
    }
}

/// Shared resource bytes.
pub type SharedResourceData = Arc<Vec<u8>>;

/// Loads raw resource bytes by the `src` string found in markup.
///
/// Implementations:
/// - `InMemoryResourceProvider` (here): pre-populated map, usable anywhere.
/// - `FilesystemResourceProvider` / `DataUriResourceProvider` (penmark-resource).
pub trait ResourceProvider: Send + Sync + Debug {
    /// Load a resource by its `src`.
    fn load(&self, src: &str) -> Result<SharedResourceData, ResourceError>;

    /// Whether `load` would find something for `src`.
    fn exists(&self, src: &str) -> bool;

    /// Human-readable provider name for logging.
    fn name(&self) -> &'static str;
}

/// A resource provider backed by a map filled before rendering.
#[derive(Debug, Default)]
pub struct InMemoryResourceProvider {
    resources: RwLock<HashMap<String, SharedResourceData>>,
}

impl InMemoryResourceProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `data` under `src`, replacing any previous entry.
    ///
    /// # Errors
    ///
    /// Returns `ResourceError::LoadFailed` if the internal lock is poisoned.
    pub fn add(&self, src: impl Into<String>, data: Vec<u8>) -> Result<(), ResourceError> {
        let src = src.into();
        let mut resources = self
            .resources
            .write()
            .map_err(|_| ResourceError::LoadFailed {
                path: src.clone(),
                message: "resource store lock poisoned".to_string(),
            })?;
        resources.insert(src, Arc::new(data));
        Ok(())
    }

    pub fn remove(&self, src: &str) -> Option<SharedResourceData> {
        self.resources.write().ok()?.remove(src)
    }

    pub fn len(&self) -> usize {
        self.resources.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ResourceProvider for InMemoryResourceProvider {
    fn load(&self, src: &str) -> Result<SharedResourceData, ResourceError> {
        let resources = self
            .resources
            .read()
            .map_err(|_| ResourceError::LoadFailed {
                path: src.to_string(),
                message: "resource store lock poisoned".to_string(),
            })?;
        resources
            .get(src)
            .cloned()
            .ok_or_else(|| ResourceError::NotFound(src.to_string()))
    }

    fn exists(&self, src: &str) -> bool {
        self.resources
            .read()
            .map(|r| r.contains_key(src))
            .unwrap_or(false)
    }

    fn name(&self) -> &'static str {
        "InMemoryResourceProvider"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_load_and_overwrite() {
        let provider = InMemoryResourceProvider::new();
        provider.add("logo.png", b"one".to_vec()).unwrap();
        provider.add("logo.png", b"two".to_vec()).unwrap();

        assert_eq!(&*provider.load("logo.png").unwrap(), b"two");
        assert_eq!(provider.len(), 1);
        assert!(provider.exists("logo.png"));
    }

    #[test]
    fn missing_resource_is_not_found() {
        let provider = InMemoryResourceProvider::new();
        assert!(matches!(
            provider.load("nope.png"),
            Err(ResourceError::NotFound(_))
        ));
        assert!(provider.remove("nope.png").is_none());
        assert!(provider.is_empty());
    }

    #[test]
    fn io_errors_convert() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: ResourceError = io_err.into();
        assert!(matches!(err, ResourceError::Io(_)));
        assert!(err.to_string().contains("denied"));
    }
}
