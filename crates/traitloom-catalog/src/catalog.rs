//! In-memory trait catalog
//!
//! Keyed by (tier, scope, folder) where scope is a character name or the
//! shared scope. Read-only once built; share it behind an `Arc`.

use serde::Serialize;
use std::collections::HashMap;
use traitloom_core::{RarityTier, SHARED_SCOPE, TraitAsset};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CatalogKey {
    tier: RarityTier,
    scope: String,
    folder: String,
}

/// Per-folder asset counts, for reporting
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntryStats {
    pub tier: RarityTier,
    pub scope: String,
    pub folder: String,
    pub assets: usize,
}

/// Trait assets by tier, scope and layer folder
#[derive(Debug, Clone, Default)]
pub struct TraitCatalog {
    entries: HashMap<CatalogKey, Vec<TraitAsset>>,
}

impl TraitCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the asset list for one (tier, scope, folder) entry
    pub fn insert(
        &mut self,
        tier: RarityTier,
        scope: impl Into<String>,
        folder: impl Into<String>,
        assets: Vec<TraitAsset>,
    ) {
        let key = CatalogKey {
            tier,
            scope: scope.into(),
            folder: folder.into(),
        };
        self.entries.insert(key, assets);
    }

    /// Convenience for tests and tooling: insert assets built from identifiers
    pub fn insert_identifiers(
        &mut self,
        tier: RarityTier,
        scope: &str,
        folder: &str,
        identifiers: &[&str],
    ) {
        let assets = identifiers
            .iter()
            .map(|id| TraitAsset::new(folder, *id, tier))
            .collect();
        self.insert(tier, scope, folder, assets);
    }

    /// Exact entry for one scope
    pub fn scoped(&self, tier: RarityTier, scope: &str, folder: &str) -> &[TraitAsset] {
        let key = CatalogKey {
            tier,
            scope: scope.to_string(),
            folder: folder.to_string(),
        };
        self.entries.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Candidate pool for a character: its own list if non-empty, else the shared list
    pub fn layer(&self, tier: RarityTier, character: &str, folder: &str) -> &[TraitAsset] {
        let own = self.scoped(tier, character, folder);
        if !own.is_empty() {
            return own;
        }
        self.scoped(tier, SHARED_SCOPE, folder)
    }

    /// Total number of assets across all entries
    pub fn asset_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.asset_count() == 0
    }

    /// Non-empty entries, sorted by tier, scope and folder
    pub fn stats(&self) -> Vec<CatalogEntryStats> {
        let mut stats: Vec<_> = self
            .entries
            .iter()
            .filter(|(_, assets)| !assets.is_empty())
            .map(|(key, assets)| CatalogEntryStats {
                tier: key.tier,
                scope: key.scope.clone(),
                folder: key.folder.clone(),
                assets: assets.len(),
            })
            .collect();

        stats.sort_by(|a, b| {
            (a.tier, &a.scope, &a.folder).cmp(&(b.tier, &b.scope, &b.folder))
        });
        stats
    }
}
