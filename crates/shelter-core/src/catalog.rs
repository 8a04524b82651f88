//! Model catalog: the loadable shelter models
//!
//! The catalog is external configuration. A built-in set covers the
//! shipped product line; deployments can override it with a RON file.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors loading a catalog file
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to parse catalog: {0}")]
    Parse(String),

    #[error("Duplicate model slug: {0}")]
    DuplicateSlug(String),
}

/// Identifies one loadable 3D shelter model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    /// Stable identifier used in routes and asset paths (e.g. "trecc")
    pub slug: String,
    /// Human-readable product name
    pub display_name: String,
    /// Asset path within the model store (e.g. "trecc.glb")
    pub asset_path: String,
    /// Separate interior model, when the product ships one
    #[serde(default)]
    pub interior_asset_path: Option<String>,
    /// Informational only; not used by geometry logic
    #[serde(default)]
    pub dimensions: Option<String>,
    #[serde(default)]
    pub weight_kg: Option<f32>,
    #[serde(default)]
    pub capacity: Option<String>,
}

impl ModelDescriptor {
    pub fn new(
        slug: impl Into<String>,
        display_name: impl Into<String>,
        asset_path: impl Into<String>,
    ) -> Self {
        Self {
            slug: slug.into(),
            display_name: display_name.into(),
            asset_path: asset_path.into(),
            interior_asset_path: None,
            dimensions: None,
            weight_kg: None,
            capacity: None,
        }
    }
}

/// Catalog of shelter models keyed by slug
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelCatalog {
    models: HashMap<String, ModelDescriptor>,
}

impl ModelCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The shipped product line
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        for descriptor in [
            ModelDescriptor {
                slug: "trecc".into(),
                display_name: "TRECC Expandable Shelter".into(),
                asset_path: "trecc.glb".into(),
                interior_asset_path: Some("interiors/Trecc.glb".into()),
                dimensions: Some("6.1m x 2.4m x 2.6m".into()),
                weight_kg: Some(1950.0),
                capacity: Some("8 personnel".into()),
            },
            ModelDescriptor {
                slug: "command-posting".into(),
                display_name: "Command Post Shelter".into(),
                asset_path: "command-posting.glb".into(),
                interior_asset_path: Some("interiors/CommandPosting.glb".into()),
                dimensions: Some("6.1m x 4.8m x 2.6m".into()),
                weight_kg: Some(2400.0),
                capacity: Some("12 personnel".into()),
            },
            ModelDescriptor {
                slug: "field-hospital".into(),
                display_name: "Field Hospital Module".into(),
                asset_path: "field-hospital.glb".into(),
                interior_asset_path: Some("interiors/FieldHospital.glb".into()),
                dimensions: Some("12.2m x 4.8m x 2.6m".into()),
                weight_kg: Some(4100.0),
                capacity: Some("20 beds".into()),
            },
        ] {
            // Builtin slugs are unique by construction
            catalog.models.insert(descriptor.slug.clone(), descriptor);
        }
        catalog
    }

    /// Look up a model by slug; unknown slugs are `None`, not an error
    pub fn get(&self, slug: &str) -> Option<&ModelDescriptor> {
        self.models.get(slug)
    }

    /// Add a model, rejecting duplicate slugs
    pub fn insert(&mut self, descriptor: ModelDescriptor) -> Result<(), CatalogError> {
        if self.models.contains_key(&descriptor.slug) {
            return Err(CatalogError::DuplicateSlug(descriptor.slug));
        }
        self.models.insert(descriptor.slug.clone(), descriptor);
        Ok(())
    }

    /// All descriptors, sorted by slug for stable display order
    pub fn models(&self) -> Vec<&ModelDescriptor> {
        let mut all: Vec<_> = self.models.values().collect();
        all.sort_by(|a, b| a.slug.cmp(&b.slug));
        all
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Parse a catalog from RON
    pub fn from_ron_str(content: &str) -> Result<Self, CatalogError> {
        ron::from_str(content).map_err(|e| CatalogError::Parse(e.to_string()))
    }

    /// Serialize the catalog to pretty RON
    pub fn to_ron_string(&self) -> Result<String, CatalogError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| CatalogError::Parse(e.to_string()))
    }
}
