//! Cross-layer rules
//!
//! The constraint table names which layers play which role (eyes, shirt, head
//! accessory, ...), which identifiers belong to which trait class, the
//! base-color pairings for hands, and which common layers may borrow from the
//! legendary catalog. Trait classes are case-insensitive substring patterns
//! over asset identifiers.

use crate::asset::TraitAsset;
use crate::composition::SelectedComposition;
use crate::tier::RarityTier;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Layer names for each rule-bearing role, in common-tier naming
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerRoles {
    pub base: String,
    pub eyes: String,
    pub eyewear: String,
    pub shirt: String,
    pub head: String,
    pub necklace: String,
    pub hand: String,
    pub accessory: String,
    pub side_hand: String,
    pub side_accessory: String,
}

impl Default for LayerRoles {
    fn default() -> Self {
        Self {
            base: "base".to_string(),
            eyes: "eyes".to_string(),
            eyewear: "eyewear".to_string(),
            shirt: "shirt".to_string(),
            head: "head_acc".to_string(),
            necklace: "necklaces".to_string(),
            hand: "hand".to_string(),
            accessory: "accessory".to_string(),
            side_hand: "side_hand".to_string(),
            side_accessory: "side_accessory".to_string(),
        }
    }
}

/// Which accessory family a composition uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessoryMode {
    /// Hand plus primary accessory
    Primary,
    /// Side hand plus side accessory
    Secondary,
    /// Primary accessory with no hand
    AccessoryOnly,
}

impl AccessoryMode {
    /// Modes in draw order
    pub const ALL: [AccessoryMode; 3] = [
        AccessoryMode::Primary,
        AccessoryMode::Secondary,
        AccessoryMode::AccessoryOnly,
    ];

    /// Layers this mode may fill
    pub fn active_layers<'a>(&self, roles: &'a LayerRoles) -> Vec<&'a str> {
        match self {
            Self::Primary => vec![roles.hand.as_str(), roles.accessory.as_str()],
            Self::Secondary => vec![roles.side_hand.as_str(), roles.side_accessory.as_str()],
            Self::AccessoryOnly => vec![roles.accessory.as_str()],
        }
    }
}

/// Hand art matched to a base color
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pairing {
    /// Tier the pairing applies to
    pub tier: RarityTier,
    /// Base identifier
    pub base: String,
    /// Matching hand identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hand: Option<String>,
    /// Matching side-hand identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side_hand: Option<String>,
}

impl Pairing {
    pub fn new(tier: RarityTier, base: impl Into<String>) -> Self {
        Self {
            tier,
            base: base.into(),
            hand: None,
            side_hand: None,
        }
    }

    pub fn with_hand(mut self, hand: impl Into<String>) -> Self {
        self.hand = Some(hand.into());
        self
    }

    pub fn with_side_hand(mut self, side_hand: impl Into<String>) -> Self {
        self.side_hand = Some(side_hand.into());
        self
    }
}

/// A rule broken by a finished composition
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstraintViolation {
    #[error("Eyewear {eyewear} worn over legendary eyes {eyes}")]
    EyewearOverLegendaryEyes { eyes: String, eyewear: String },

    #[error("Shirt {shirt} blocks {layer} ({trait_id})")]
    BlockedByShirt {
        shirt: String,
        layer: String,
        trait_id: String,
    },

    #[error("Astronaut shirt {shirt} with legendary eyes {eyes}")]
    AstronautWithLegendaryEyes { shirt: String, eyes: String },

    #[error("Face-covering {head} conflicts with {layer} ({trait_id})")]
    FaceCovered {
        head: String,
        layer: String,
        trait_id: String,
    },

    #[error("Both primary and secondary accessory families are present")]
    MixedAccessoryFamilies,
}

/// Static rule configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstraintTable {
    /// Role to layer-name mapping
    pub roles: LayerRoles,
    /// Hoodie-class shirts: block head accessories and necklaces
    pub hoodie_patterns: Vec<String>,
    /// Astronaut-class shirts: block head accessories, necklaces, eyewear and legendary eyes
    pub astronaut_patterns: Vec<String>,
    /// Face-covering head accessories: clear eyewear, demote legendary eyes
    pub face_covering_patterns: Vec<String>,
    /// Legendary shirts that block head accessories and necklaces
    pub legendary_outerwear_patterns: Vec<String>,
    /// Base color to hand pairings
    pub pairings: Vec<Pairing>,
    /// Common layers that may be inherited from the legendary catalog
    pub inheritance_eligible: Vec<String>,
    /// Common layer name to legendary folder name (`shirt` -> `clothes`)
    pub legendary_aliases: BTreeMap<String, String>,
}

impl Default for ConstraintTable {
    fn default() -> Self {
        let strings = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();

        let mut legendary_aliases = BTreeMap::new();
        legendary_aliases.insert("shirt".to_string(), "clothes".to_string());

        Self {
            roles: LayerRoles::default(),
            hoodie_patterns: strings(&["hoodie"]),
            astronaut_patterns: strings(&["astronaut", "spacesuit"]),
            face_covering_patterns: strings(&["mask", "helmet", "balaclava"]),
            legendary_outerwear_patterns: strings(&["jacket", "coat", "cape", "robe", "armor"]),
            pairings: Vec::new(),
            inheritance_eligible: strings(&["background", "shirt", "eyes", "head_acc"]),
            legendary_aliases,
        }
    }
}

impl ConstraintTable {
    /// Folder a common layer maps to in the legendary catalog
    pub fn legendary_folder<'a>(&'a self, layer: &'a str) -> &'a str {
        self.legendary_aliases
            .get(layer)
            .map(String::as_str)
            .unwrap_or(layer)
    }

    /// Common-tier name for a layer that may be spelled the legendary way
    pub fn canonical_layer<'a>(&'a self, layer: &'a str) -> &'a str {
        self.legendary_aliases
            .iter()
            .find(|(_, folder)| folder.as_str() == layer)
            .map(|(common, _)| common.as_str())
            .unwrap_or(layer)
    }

    /// Whether `layer` (either spelling) plays `role`
    pub fn is_role(&self, layer: &str, role: &str) -> bool {
        self.canonical_layer(layer) == role
    }

    /// Whether `layer` may be inherited
    pub fn is_inheritance_eligible(&self, layer: &str) -> bool {
        let canonical = self.canonical_layer(layer);
        self.inheritance_eligible.iter().any(|l| l == canonical)
    }

    /// Paired identifier for a hand-family layer given the selected base
    pub fn pairing(&self, tier: RarityTier, base: &str, layer: &str) -> Option<&str> {
        let pairing = self
            .pairings
            .iter()
            .find(|p| p.tier == tier && p.base == base)?;

        let canonical = self.canonical_layer(layer);
        if canonical == self.roles.hand {
            pairing.hand.as_deref()
        } else if canonical == self.roles.side_hand {
            pairing.side_hand.as_deref()
        } else {
            None
        }
    }

    pub fn is_hoodie(&self, asset: &TraitAsset) -> bool {
        asset.matches_any(&self.hoodie_patterns)
    }

    pub fn is_astronaut(&self, asset: &TraitAsset) -> bool {
        asset.matches_any(&self.astronaut_patterns)
    }

    pub fn is_face_covering(&self, asset: &TraitAsset) -> bool {
        asset.matches_any(&self.face_covering_patterns)
    }

    /// Legendary shirts count as outerwear only when they match a pattern
    pub fn is_legendary_outerwear(&self, asset: &TraitAsset) -> bool {
        asset.is_legendary() && asset.matches_any(&self.legendary_outerwear_patterns)
    }

    /// Any eyes drawn from the legendary catalog count as legendary eyes
    pub fn is_legendary_eyes(&self, asset: &TraitAsset) -> bool {
        asset.is_legendary()
    }

    /// Whether a shirt blocks head accessories and necklaces
    pub fn shirt_blocks_head(&self, shirt: &TraitAsset) -> bool {
        self.is_hoodie(shirt) || self.is_astronaut(shirt) || self.is_legendary_outerwear(shirt)
    }

    /// Look up the asset filling `role` in a composition
    pub fn find<'a>(
        &self,
        composition: &'a SelectedComposition,
        role: &str,
    ) -> Option<&'a TraitAsset> {
        composition
            .assignments
            .iter()
            .find(|a| self.is_role(&a.layer, role))
            .and_then(|a| a.asset.as_ref())
    }

    /// At least one eligible layer holds a legendary asset
    pub fn has_inherited_layer(&self, composition: &SelectedComposition) -> bool {
        composition.assignments.iter().any(|a| {
            self.is_inheritance_eligible(&a.layer)
                && a.asset.as_ref().is_some_and(TraitAsset::is_legendary)
        })
    }

    /// Verify every mutual-exclusion and blocking rule
    pub fn check(&self, composition: &SelectedComposition) -> Result<(), ConstraintViolation> {
        let roles = &self.roles;
        let eyes = self.find(composition, &roles.eyes);
        let eyewear = self.find(composition, &roles.eyewear);
        let shirt = self.find(composition, &roles.shirt);
        let head = self.find(composition, &roles.head);
        let necklace = self.find(composition, &roles.necklace);

        let legendary_eyes = eyes.filter(|e| self.is_legendary_eyes(e));

        if let (Some(eyes), Some(eyewear)) = (legendary_eyes, eyewear) {
            return Err(ConstraintViolation::EyewearOverLegendaryEyes {
                eyes: eyes.identifier.clone(),
                eyewear: eyewear.identifier.clone(),
            });
        }

        if let Some(shirt) = shirt {
            if self.is_astronaut(shirt) {
                if let Some(eyewear) = eyewear {
                    return Err(blocked(shirt, &roles.eyewear, eyewear));
                }
                if let Some(eyes) = legendary_eyes {
                    return Err(ConstraintViolation::AstronautWithLegendaryEyes {
                        shirt: shirt.identifier.clone(),
                        eyes: eyes.identifier.clone(),
                    });
                }
            }

            if self.shirt_blocks_head(shirt) {
                if let Some(head) = head {
                    return Err(blocked(shirt, &roles.head, head));
                }
                if let Some(necklace) = necklace {
                    return Err(blocked(shirt, &roles.necklace, necklace));
                }
            }
        }

        if let Some(head) = head.filter(|h| self.is_face_covering(h)) {
            let conflict = eyewear
                .map(|e| (&roles.eyewear, e))
                .or_else(|| legendary_eyes.map(|e| (&roles.eyes, e)));
            if let Some((layer, asset)) = conflict {
                return Err(ConstraintViolation::FaceCovered {
                    head: head.identifier.clone(),
                    layer: layer.clone(),
                    trait_id: asset.identifier.clone(),
                });
            }
        }

        let primary = [&roles.hand, &roles.accessory]
            .iter()
            .any(|role| self.find(composition, role).is_some());
        let secondary = [&roles.side_hand, &roles.side_accessory]
            .iter()
            .any(|role| self.find(composition, role).is_some());
        if primary && secondary {
            return Err(ConstraintViolation::MixedAccessoryFamilies);
        }

        Ok(())
    }
}

fn blocked(shirt: &TraitAsset, layer: &str, asset: &TraitAsset) -> ConstraintViolation {
    ConstraintViolation::BlockedByShirt {
        shirt: shirt.identifier.clone(),
        layer: layer.to_string(),
        trait_id: asset.identifier.clone(),
    }
}
