//! Selected compositions and their fingerprints

use crate::asset::TraitAsset;
use crate::tier::RarityTier;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel written into fingerprints for empty layers
pub const NONE_SENTINEL: &str = "none";

/// One layer slot and what fills it
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayerAssignment {
    /// Layer name as it appears in the tier's layer order
    pub layer: String,
    /// Asset, or `None` when the layer contributes nothing
    pub asset: Option<TraitAsset>,
}

/// A fully resolved trait combination for one character instance
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectedComposition {
    /// Character name
    pub character: String,
    /// Tier the composition was generated for
    pub tier: RarityTier,
    /// Assignments in z-order (bottom first)
    pub assignments: Vec<LayerAssignment>,
    /// Whether legendary inheritance was requested
    pub inheritance: bool,
}

impl SelectedComposition {
    /// Asset assigned to a layer, by exact layer name
    pub fn get(&self, layer: &str) -> Option<&TraitAsset> {
        self.assignments
            .iter()
            .find(|a| a.layer == layer)
            .and_then(|a| a.asset.as_ref())
    }

    /// Non-empty assignments in z-order
    pub fn present(&self) -> impl Iterator<Item = (&str, &TraitAsset)> {
        self.assignments
            .iter()
            .filter_map(|a| a.asset.as_ref().map(|asset| (a.layer.as_str(), asset)))
    }

    /// Number of non-empty layers
    pub fn layer_count(&self) -> usize {
        self.present().count()
    }

    /// Canonical uniqueness key
    pub fn fingerprint(&self) -> Fingerprint {
        let mut parts = Vec::with_capacity(self.assignments.len() + 2);
        parts.push(self.character.as_str());
        parts.push(self.tier.as_str());
        for assignment in &self.assignments {
            parts.push(
                assignment
                    .asset
                    .as_ref()
                    .map(|a| a.identifier.as_str())
                    .unwrap_or(NONE_SENTINEL),
            );
        }
        Fingerprint(parts.join("|"))
    }
}

/// Canonical string identifying a composition
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// BLAKE3 digest of the fingerprint as lowercase hex
    pub fn dna(&self) -> String {
        blake3::hash(self.0.as_bytes()).to_hex().to_string()
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
