//! Asset loading contract and errors

use thiserror::Error;

/// Errors that can occur while loading a model asset
#[derive(Debug, Clone, Error)]
pub enum AssetLoadError {
    #[error("Asset unreachable at '{url}': {reason}")]
    Unreachable { url: String, reason: String },

    #[error("Malformed model content: {0}")]
    Malformed(String),

    #[error("Model contains no scene nodes")]
    Empty,
}

/// Fetches raw model bytes for a resolved URL.
///
/// The configurator core never talks to the network itself; hosts provide
/// a source (HTTP client, local file reader, test stub) and the session
/// turns its bytes into a scene graph.
pub trait ModelSource {
    fn fetch(&mut self, url: &str) -> Result<Vec<u8>, AssetLoadError>;
}

/// Reads models from the local filesystem, the fallback path convention
#[derive(Debug, Default)]
pub struct FileModelSource {
    /// Directory that local-convention URLs are resolved against
    pub root: std::path::PathBuf,
}

impl FileModelSource {
    pub fn new(root: impl Into<std::path::PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ModelSource for FileModelSource {
    fn fetch(&mut self, url: &str) -> Result<Vec<u8>, AssetLoadError> {
        let relative = url.trim_start_matches('/');
        let path = self.root.join(relative);
        std::fs::read(&path).map_err(|e| AssetLoadError::Unreachable {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}
