use base64::Engine;
use penmark_traits::{ResourceError, ResourceProvider, SharedResourceData};
use std::sync::Arc;

/// Decodes a `data:[<mime>][;base64],<payload>` URI into its MIME type and bytes.
///
/// Non-base64 payloads are taken as raw bytes. Returns `None` when `uri` is not a data
/// URI at all.
pub fn decode_data_uri(uri: &str) -> Option<Result<(String, Vec<u8>), ResourceError>> {
    let rest = uri.strip_prefix("data:")?;
    let Some((header, payload)) = rest.split_once(',') else {
        return Some(Err(ResourceError::InvalidFormat(
            "data URI without a ',' separator".to_string(),
        )));
    };

    let mime = header
        .split(';')
        .next()
        .filter(|m| !m.is_empty())
        .unwrap_or("application/octet-stream")
        .to_string();

    let bytes = if header.split(';').any(|p| p.eq_ignore_ascii_case("base64")) {
        let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
        match base64::engine::general_purpose::STANDARD.decode(compact) {
            Ok(bytes) => bytes,
            Err(e) => {
                return Some(Err(ResourceError::InvalidFormat(format!(
                    "bad base64 payload: {}",
                    e
                ))));
            }
        }
    } else {
        payload.as_bytes().to_vec()
    };

    Some(Ok((mime, bytes)))
}

/// Resolves `data:` URIs inline and hands every other `src` to an optional inner
/// provider.
#[derive(Debug, Default)]
pub struct DataUriResourceProvider {
    fallback: Option<Arc<dyn ResourceProvider>>,
}

impl DataUriResourceProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fallback(fallback: Arc<dyn ResourceProvider>) -> Self {
        Self {
            fallback: Some(fallback),
        }
    }
}

impl ResourceProvider for DataUriResourceProvider {
    fn load(&self, src: &str) -> Result<SharedResourceData, ResourceError> {
        match decode_data_uri(src) {
            Some(decoded) => {
                let (mime, bytes) = decoded?;
                log::debug!("Decoded inline {} image ({} bytes)", mime, bytes.len());
                Ok(Arc::new(bytes))
            }
            None => match &self.fallback {
                Some(inner) => inner.load(src),
                None => Err(ResourceError::NotFound(src.to_string())),
            },
        }
    }

    fn exists(&self, src: &str) -> bool {
        match decode_data_uri(src) {
            Some(decoded) => decoded.is_ok(),
            None => self.fallback.as_ref().is_some_and(|inner| inner.exists(src)),
        }
    }

    fn name(&self) -> &'static str {
        "DataUriResourceProvider"
    }
}
