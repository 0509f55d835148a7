//! Resource provider implementations for image sources.
//!
//! - [`FilesystemResourceProvider`]: files under a sandboxed base directory.
//! - [`DataUriResourceProvider`]: inline `data:` URIs, delegating anything else.

mod data_uri;
mod filesystem;

pub use data_uri::{DataUriResourceProvider, decode_data_uri};
pub use filesystem::FilesystemResourceProvider;
pub use penmark_traits::{InMemoryResourceProvider, ResourceError, ResourceProvider, SharedResourceData};
