//! Loads image sources from a base directory.
//!
//! Every `src` is resolved relative to the base and must stay inside it: absolute
//! paths and `..` escapes are reported as not found.

use penmark_traits::{ResourceError, ResourceProvider, SharedResourceData};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

#[derive(Debug)]
pub struct FilesystemResourceProvider {
    base_path: PathBuf,
    canonical_base: Option<PathBuf>,
}

impl FilesystemResourceProvider {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        let base_path = base_path.as_ref().to_path_buf();
        let canonical_base = base_path.canonicalize().ok();
        Self {
            base_path,
            canonical_base,
        }
    }

    pub fn base(&self) -> &Path {
        &self.base_path
    }

    /// `None` when `src` would leave the base directory.
    fn resolve(&self, src: &str) -> Option<PathBuf> {
        let relative = src.strip_prefix("file://").unwrap_or(src);
        let relative = Path::new(relative);
        if relative.is_absolute() {
            return None;
        }
        if relative
            .components()
            .any(|c| matches!(c, Component::ParentDir))
        {
            return None;
        }

        let joined = self.base_path.join(relative);
        match (joined.canonicalize(), &self.canonical_base) {
            (Ok(canonical), Some(base)) => canonical.starts_with(base).then_some(canonical),
            _ => Some(joined),
        }
    }
}

impl ResourceProvider for FilesystemResourceProvider {
    fn load(&self, src: &str) -> Result<SharedResourceData, ResourceError> {
        let Some(path) = self.resolve(src) else {
            log::warn!("Refusing image source outside the base directory: {}", src);
            return Err(ResourceError::NotFound(format!("{} (outside base path)", src)));
        };

        log::debug!("Loading image source {:?}", path);
        std::fs::read(&path).map(Arc::new).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ResourceError::NotFound(src.to_string())
            } else {
                ResourceError::LoadFailed {
                    path: src.to_string(),
                    message: e.to_string(),
                }
            }
        })
    }

    fn exists(&self, src: &str) -> bool {
        self.resolve(src).is_some_and(|p| p.is_file())
    }

    fn name(&self) -> &'static str {
        "FilesystemResourceProvider"
    }
}
