//! Collection configuration
//!
//! Everything static about a collection lives here: the characters, each
//! tier's layer order and optional-layer probabilities, pixel offsets for
//! misaligned art, the constraint table and the quota knobs. The document is
//! JSON; every field has a default so partial files are accepted.

use crate::constraints::ConstraintTable;
use crate::error::ConfigError;
use crate::tier::RarityTier;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

/// Output canvas dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 1024,
        }
    }
}

/// Pixel nudge applied to a layer when compositing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerOffset {
    #[serde(default)]
    pub top: i64,
    #[serde(default)]
    pub left: i64,
}

impl LayerOffset {
    pub fn new(top: i64, left: i64) -> Self {
        Self { top, left }
    }

    pub fn is_zero(&self) -> bool {
        self.top == 0 && self.left == 0
    }
}

/// Per-tier layer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierConfig {
    /// Layer order, bottom first
    pub layers: Vec<String>,
    /// Optional layers and their inclusion probability (0-100)
    #[serde(default)]
    pub optional: BTreeMap<String, f64>,
    /// Probability (0-100) that any accessory-family layer is used
    #[serde(default = "default_accessory_chance")]
    pub accessory_chance: f64,
    /// Pixel offsets by layer name
    #[serde(default)]
    pub offsets: BTreeMap<String, LayerOffset>,
}

fn default_accessory_chance() -> f64 {
    60.0
}

impl TierConfig {
    /// Create a tier with the given layer order and nothing optional
    pub fn new<S: Into<String>>(layers: impl IntoIterator<Item = S>) -> Self {
        Self {
            layers: layers.into_iter().map(Into::into).collect(),
            optional: BTreeMap::new(),
            accessory_chance: default_accessory_chance(),
            offsets: BTreeMap::new(),
        }
    }

    /// Mark a layer optional
    pub fn with_optional(mut self, layer: impl Into<String>, chance: f64) -> Self {
        self.optional.insert(layer.into(), chance);
        self
    }

    /// Set the accessory presence probability
    pub fn with_accessory_chance(mut self, chance: f64) -> Self {
        self.accessory_chance = chance;
        self
    }

    /// Set a layer offset
    pub fn with_offset(mut self, layer: impl Into<String>, offset: LayerOffset) -> Self {
        self.offsets.insert(layer.into(), offset);
        self
    }

    /// Inclusion probability for an optional layer
    pub fn optional_chance(&self, layer: &str) -> Option<f64> {
        self.optional.get(layer).copied()
    }

    /// Offset for a layer, zero if unset
    pub fn offset(&self, layer: &str) -> LayerOffset {
        self.offsets.get(layer).copied().unwrap_or_default()
    }

    pub fn has_layer(&self, layer: &str) -> bool {
        self.layers.iter().any(|l| l == layer)
    }

    fn validate(&self, tier: RarityTier) -> Result<(), ConfigError> {
        if self.layers.is_empty() {
            return Err(ConfigError::Invalid(format!("{tier} tier has no layers")));
        }

        let mut seen = HashSet::new();
        for layer in &self.layers {
            if !seen.insert(layer.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "{tier} tier lists layer {layer} twice"
                )));
            }
        }

        for (layer, chance) in &self.optional {
            if !self.has_layer(layer) {
                return Err(ConfigError::Invalid(format!(
                    "{tier} optional layer {layer} is not in the layer order"
                )));
            }
            check_percent(&format!("{tier} optional {layer}"), *chance)?;
        }

        check_percent(&format!("{tier} accessory chance"), self.accessory_chance)
    }
}

fn check_percent(what: &str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!(
            "{what} must be within 0-100, got {value}"
        )))
    }
}

/// Complete static configuration for one collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionConfig {
    /// Collection name, used in token names
    pub name: String,
    /// Description copied into metadata
    pub description: String,
    /// Characters, in generation order
    pub characters: Vec<String>,
    /// Output canvas
    pub canvas: CanvasSize,
    /// Legendary tier layers
    pub legendary: TierConfig,
    /// Common tier layers
    pub common: TierConfig,
    /// Cross-layer rules
    pub constraints: ConstraintTable,
    /// Share of each character's count drawn from the legendary tier (0-100)
    pub legendary_percent: f64,
    /// Attempt budget per requested composition
    pub attempt_multiplier: u32,
    /// Compositions rendered concurrently per batch
    pub render_batch_size: usize,
    /// Image extensions recognised in the asset store
    pub image_extensions: Vec<String>,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        let legendary = TierConfig::new([
            "background",
            "base",
            "clothes",
            "eyes",
            "necklaces",
            "head_acc",
            "hand",
            "accessory",
            "side_hand",
            "side_accessory",
        ])
        .with_optional("necklaces", 20.0)
        .with_optional("head_acc", 35.0)
        .with_accessory_chance(50.0);

        let common = TierConfig::new([
            "background",
            "base",
            "shirt",
            "eyes",
            "eyewear",
            "necklaces",
            "head_acc",
            "hand",
            "accessory",
            "side_hand",
            "side_accessory",
        ])
        .with_optional("shirt", 90.0)
        .with_optional("eyewear", 25.0)
        .with_optional("necklaces", 30.0)
        .with_optional("head_acc", 45.0)
        .with_accessory_chance(60.0);

        Self {
            name: "Traitloom".to_string(),
            description: "A generative collection".to_string(),
            characters: ["bear", "fox", "cat", "frog"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
            canvas: CanvasSize::default(),
            legendary,
            common,
            constraints: ConstraintTable::default(),
            legendary_percent: 2.0,
            attempt_multiplier: 30,
            render_batch_size: 16,
            image_extensions: vec!["png".to_string()],
        }
    }
}

impl CollectionConfig {
    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Write the config as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Layer config for a tier
    pub fn tier(&self, tier: RarityTier) -> &TierConfig {
        match tier {
            RarityTier::Legendary => &self.legendary,
            RarityTier::Common => &self.common,
        }
    }

    pub fn has_character(&self, character: &str) -> bool {
        self.characters.iter().any(|c| c == character)
    }

    /// Check internal consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.characters.is_empty() {
            return Err(ConfigError::Invalid("no characters configured".to_string()));
        }

        let mut seen = HashSet::new();
        for character in &self.characters {
            if character.is_empty() || character == crate::SHARED_SCOPE {
                return Err(ConfigError::Invalid(format!(
                    "invalid character name: {character:?}"
                )));
            }
            if !seen.insert(character.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "character {character} listed twice"
                )));
            }
        }

        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(ConfigError::Invalid("canvas must be non-empty".to_string()));
        }

        self.legendary.validate(RarityTier::Legendary)?;
        self.common.validate(RarityTier::Common)?;

        check_percent("legendary percent", self.legendary_percent)?;

        if self.attempt_multiplier == 0 {
            return Err(ConfigError::Invalid(
                "attempt multiplier must be at least 1".to_string(),
            ));
        }

        if self.render_batch_size == 0 {
            return Err(ConfigError::Invalid(
                "render batch size must be at least 1".to_string(),
            ));
        }

        if self.image_extensions.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one image extension is required".to_string(),
            ));
        }

        for layer in &self.constraints.inheritance_eligible {
            if !self.common.has_layer(layer) {
                return Err(ConfigError::Invalid(format!(
                    "inheritance-eligible layer {layer} is not a common layer"
                )));
            }
        }

        Ok(())
    }
}
