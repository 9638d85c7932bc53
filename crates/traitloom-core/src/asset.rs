//! Trait assets
//!
//! One asset is one image file in the asset store. Its identifier is the file
//! name without extension and is the key used for lookups, fingerprints and
//! path resolution.

use crate::tier::RarityTier;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A single trait value for one layer
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TraitAsset {
    /// Asset-store folder the file lives in (e.g. `shirt`, `clothes`)
    pub layer: String,
    /// Human-readable name
    pub display_name: String,
    /// Stable key derived from the file name
    pub identifier: String,
    /// Catalog the asset was loaded from
    pub tier: RarityTier,
}

impl TraitAsset {
    /// Create an asset, deriving the display name from the identifier
    pub fn new(layer: impl Into<String>, identifier: impl Into<String>, tier: RarityTier) -> Self {
        let identifier = identifier.into();
        Self {
            layer: layer.into(),
            display_name: deslug(&identifier),
            identifier,
            tier,
        }
    }

    /// Build an asset from an image path; `None` if the path has no usable stem
    pub fn from_path(layer: &str, path: &Path, tier: RarityTier) -> Option<Self> {
        let stem = path.file_stem()?.to_str()?;
        if stem.is_empty() || stem.starts_with('.') {
            return None;
        }
        Some(Self::new(layer, stem, tier))
    }

    /// Whether this asset came from the legendary catalog
    pub fn is_legendary(&self) -> bool {
        self.tier == RarityTier::Legendary
    }

    /// Case-insensitive substring match against any of `patterns`
    pub fn matches_any(&self, patterns: &[String]) -> bool {
        let id = self.identifier.to_ascii_lowercase();
        patterns
            .iter()
            .any(|p| !p.is_empty() && id.contains(&p.to_ascii_lowercase()))
    }
}

/// Turn `laser_eyes-red` into `Laser Eyes Red`
pub fn deslug(slug: &str) -> String {
    slug.split(['_', '-', ' '])
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
