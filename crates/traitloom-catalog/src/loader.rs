//! Asset-store scanning
//!
//! Layout: `<root>/<tier>/<character|shared>/<folder>/<identifier>.<ext>`.
//! A missing or unreadable folder is an empty entry, never an error.

use crate::catalog::TraitCatalog;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use traitloom_core::{CollectionConfig, RarityTier, SHARED_SCOPE, TraitAsset};

/// Loader configuration
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Asset-store root
    pub root: PathBuf,
    /// Recognised image extensions (lowercase, no dot)
    pub extensions: Vec<String>,
}

impl LoaderConfig {
    /// Loader settings for a collection rooted at `root`
    pub fn for_collection(root: impl Into<PathBuf>, config: &CollectionConfig) -> Self {
        Self {
            root: root.into(),
            extensions: config
                .image_extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
                .collect(),
        }
    }
}

/// Builds a [`TraitCatalog`] from an asset store
pub struct CatalogLoader {
    config: LoaderConfig,
}

impl CatalogLoader {
    /// Create a new loader
    pub fn new(config: LoaderConfig) -> Self {
        Self { config }
    }

    /// Get configuration
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Folder of one catalog entry
    pub fn folder_path(&self, tier: RarityTier, scope: &str, folder: &str) -> PathBuf {
        self.config
            .root
            .join(tier.as_str())
            .join(scope)
            .join(folder)
    }

    /// Scan every folder the collection declares
    pub fn load(&self, collection: &CollectionConfig) -> TraitCatalog {
        let mut catalog = TraitCatalog::new();

        for tier in RarityTier::ALL {
            let folders = declared_folders(collection, tier);
            let scopes = collection
                .characters
                .iter()
                .map(String::as_str)
                .chain(std::iter::once(SHARED_SCOPE));

            for scope in scopes {
                for folder in &folders {
                    let assets = self.scan_folder(tier, scope, folder);
                    catalog.insert(tier, scope, folder.as_str(), assets);
                }
            }
        }

        info!(
            "Loaded {} trait assets from {}",
            catalog.asset_count(),
            self.config.root.display()
        );

        catalog
    }

    /// Read one folder, sorted by identifier
    pub fn scan_folder(&self, tier: RarityTier, scope: &str, folder: &str) -> Vec<TraitAsset> {
        let path = self.folder_path(tier, scope, folder);

        let entries = match std::fs::read_dir(&path) {
            Ok(entries) => entries,
            Err(e) => {
                debug!("Skipping {}: {}", path.display(), e);
                return Vec::new();
            }
        };

        let mut assets: Vec<TraitAsset> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|p| p.is_file() && self.is_image(p))
            .filter_map(|p| TraitAsset::from_path(folder, &p, tier))
            .collect();

        assets.sort_by(|a, b| a.identifier.cmp(&b.identifier));
        assets.dedup_by(|a, b| a.identifier == b.identifier);
        assets
    }

    fn is_image(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| {
                let e = e.to_ascii_lowercase();
                self.config.extensions.iter().any(|ext| *ext == e)
            })
            .unwrap_or(false)
    }
}

/// Folders a tier may hold: its own layer order, plus the legendary spelling
/// of every inheritable common layer.
fn declared_folders(collection: &CollectionConfig, tier: RarityTier) -> BTreeSet<String> {
    let mut folders: BTreeSet<String> = collection.tier(tier).layers.iter().cloned().collect();

    if tier == RarityTier::Legendary {
        let constraints = &collection.constraints;
        for layer in &collection.common.layers {
            if constraints.is_inheritance_eligible(layer) {
                folders.insert(constraints.legendary_folder(layer).to_string());
            }
        }
    }

    folders
}
