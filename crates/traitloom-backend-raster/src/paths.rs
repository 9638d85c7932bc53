//! Asset path resolution

use crate::error::RenderError;
use std::path::PathBuf;
use traitloom_core::{CollectionConfig, SHARED_SCOPE, TraitAsset};

/// Maps trait assets to files in the asset store
#[derive(Debug, Clone)]
pub struct AssetResolver {
    root: PathBuf,
    extensions: Vec<String>,
}

impl AssetResolver {
    pub fn new(root: impl Into<PathBuf>, extensions: Vec<String>) -> Self {
        Self {
            root: root.into(),
            extensions,
        }
    }

    /// Resolver using the collection's image extensions
    pub fn for_collection(root: impl Into<PathBuf>, config: &CollectionConfig) -> Self {
        let extensions = config
            .image_extensions
            .iter()
            .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
            .collect();
        Self::new(root, extensions)
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    /// Find the file for `asset`, character folder first, then shared
    pub fn resolve(&self, character: &str, asset: &TraitAsset) -> Result<PathBuf, RenderError> {
        let tier_root = self.root.join(asset.tier.as_str());

        for scope in [character, SHARED_SCOPE] {
            let folder = tier_root.join(scope).join(&asset.layer);
            for ext in &self.extensions {
                let path = folder.join(format!("{}.{}", asset.identifier, ext));
                if path.is_file() {
                    return Ok(path);
                }
            }
        }

        Err(RenderError::MissingAsset {
            layer: asset.layer.clone(),
            identifier: asset.identifier.clone(),
            searched: tier_root,
        })
    }
}
