//! Per-item metadata documents

use crate::planner::PlannedItem;
use serde::{Deserialize, Serialize};
use traitloom_core::{CollectionConfig, deslug};

/// One `{trait_type, value}` pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub trait_type: String,
    pub value: String,
}

impl Attribute {
    pub fn new(trait_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            trait_type: trait_type.into(),
            value: value.into(),
        }
    }
}

/// Metadata written next to each rendered image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub name: String,
    pub description: String,
    /// Image file name, relative to the images directory
    pub image: String,
    pub edition: u64,
    /// BLAKE3 digest of the composition fingerprint
    pub dna: String,
    pub character: String,
    pub rarity: String,
    pub inherited: bool,
    pub attributes: Vec<Attribute>,
}

impl TokenMetadata {
    pub fn from_item(config: &CollectionConfig, item: &PlannedItem) -> Self {
        let composition = &item.composition;
        let table = &config.constraints;

        let mut attributes = vec![
            Attribute::new("Character", deslug(&composition.character)),
            Attribute::new("Rarity", composition.tier.label()),
        ];
        attributes.extend(composition.present().map(|(layer, asset)| {
            Attribute::new(deslug(table.canonical_layer(layer)), asset.display_name.clone())
        }));

        Self {
            name: format!("{} #{}", config.name, item.id),
            description: config.description.clone(),
            image: image_file_name(item.id),
            edition: item.id,
            dna: composition.fingerprint().dna(),
            character: composition.character.clone(),
            rarity: composition.tier.label().to_string(),
            inherited: composition.inheritance,
            attributes,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// `<id>.png`
pub fn image_file_name(id: u64) -> String {
    format!("{id}.png")
}

/// `<id>.json`
pub fn metadata_file_name(id: u64) -> String {
    format!("{id}.json")
}
