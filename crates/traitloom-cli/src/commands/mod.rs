//! Subcommand implementations

pub mod catalog;
pub mod generate;
pub mod init;
pub mod preview;

use std::path::Path;
use tracing::info;
use traitloom_catalog::{CatalogLoader, LoaderConfig, TraitCatalog};
use traitloom_core::{CollectionConfig, ConfigError};

/// Load the collection config, or fall back to the built-in default
pub fn load_config(path: Option<&Path>) -> Result<CollectionConfig, ConfigError> {
    match path {
        Some(path) => {
            info!("Loading collection config from {}", path.display());
            CollectionConfig::load(path)
        }
        None => {
            info!("No config given, using defaults");
            Ok(CollectionConfig::default())
        }
    }
}

/// Scan the asset store for a collection
pub fn load_catalog(assets: &Path, config: &CollectionConfig) -> TraitCatalog {
    CatalogLoader::new(LoaderConfig::for_collection(assets, config)).load(config)
}
