//! Asset resolution with deterministic local fallback
//!
//! The resolver turns a logical asset path into a fetchable URL. Remote
//! store failures are fully absorbed here: the configurator degrades to
//! the local static path convention rather than failing outright. This is
//! the only place in the system where a network failure is swallowed.

use serde::Deserialize;
use thiserror::Error;

/// Errors from the backing asset store
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Store request failed: {0}")]
    Http(String),

    #[error("No store entry for '{0}'")]
    MissingEntry(String),

    #[error("Malformed store response: {0}")]
    Malformed(String),
}

/// The backing asset store interface
pub trait AssetStore {
    /// Public URL for an asset path
    fn get_public_url(&mut self, path: &str) -> Result<String, StoreError>;

    /// Asset names under a prefix
    fn list(&mut self, prefix: &str) -> Result<Vec<String>, StoreError>;
}

#[derive(Debug, Deserialize)]
struct PublicUrlResponse {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    assets: Vec<String>,
}

/// HTTP-backed asset store client
pub struct HttpAssetStore {
    agent: ureq::Agent,
    base_url: String,
}

impl HttpAssetStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            agent: ureq::Agent::new_with_defaults(),
            base_url: base_url.into(),
        }
    }
}

impl AssetStore for HttpAssetStore {
    fn get_public_url(&mut self, path: &str) -> Result<String, StoreError> {
        let endpoint = format!("{}/api/assets/public-url", self.base_url);
        let mut response = self
            .agent
            .get(&endpoint)
            .query("path", path)
            .call()
            .map_err(|e| StoreError::Http(e.to_string()))?;
        let text = response
            .body_mut()
            .read_to_string()
            .map_err(|e| StoreError::Http(e.to_string()))?;
        let body: PublicUrlResponse =
            serde_json::from_str(&text).map_err(|e| StoreError::Malformed(e.to_string()))?;
        if body.url.is_empty() {
            return Err(StoreError::MissingEntry(path.to_string()));
        }
        Ok(body.url)
    }

    fn list(&mut self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let endpoint = format!("{}/api/assets/list", self.base_url);
        let mut response = self
            .agent
            .get(&endpoint)
            .query("prefix", prefix)
            .call()
            .map_err(|e| StoreError::Http(e.to_string()))?;
        let text = response
            .body_mut()
            .read_to_string()
            .map_err(|e| StoreError::Http(e.to_string()))?;
        let body: ListResponse =
            serde_json::from_str(&text).map_err(|e| StoreError::Malformed(e.to_string()))?;
        Ok(body.assets)
    }
}

/// Resolves logical asset paths to fetchable URLs.
///
/// With no store configured, or on any store failure, resolution falls
/// back to the local convention `/models/<path>` (interiors keep their
/// `interiors/` prefix under it). `resolve` never fails.
#[derive(Default)]
pub struct AssetResolver {
    store: Option<Box<dyn AssetStore>>,
}

impl AssetResolver {
    /// Resolver using only the local path convention
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolver backed by a remote asset store
    pub fn with_store(store: Box<dyn AssetStore>) -> Self {
        Self { store: Some(store) }
    }

    /// Resolve an asset path to a URL; infallible by contract
    pub fn resolve(&mut self, path: &str) -> String {
        if let Some(store) = &mut self.store {
            match store.get_public_url(path) {
                Ok(url) => return url,
                Err(e) => {
                    tracing::debug!("Store lookup for '{}' failed, using local path: {}", path, e);
                }
            }
        }
        Self::local_path(path)
    }

    /// The local static path convention
    fn local_path(path: &str) -> String {
        let trimmed = path.trim_start_matches('/');
        if let Some(rest) = trimmed.strip_prefix("models/") {
            format!("/models/{rest}")
        } else {
            format!("/models/{trimmed}")
        }
    }
}

impl std::fmt::Debug for AssetResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetResolver")
            .field("has_store", &self.store.is_some())
            .finish()
    }
}
