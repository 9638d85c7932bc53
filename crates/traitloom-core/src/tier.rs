//! Rarity tiers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which catalog a composition (or an asset) belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RarityTier {
    /// Scarce, hand-crafted catalog
    Legendary,
    /// Bulk catalog
    Common,
}

impl RarityTier {
    /// All tiers, legendary first
    pub const ALL: [RarityTier; 2] = [RarityTier::Legendary, RarityTier::Common];

    /// Folder / wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Legendary => "legendary",
            Self::Common => "common",
        }
    }

    /// Human-readable label used in metadata
    pub fn label(&self) -> &'static str {
        match self {
            Self::Legendary => "Legendary",
            Self::Common => "Common",
        }
    }
}

impl fmt::Display for RarityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown tier name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown rarity tier: {0}")]
pub struct UnknownTier(pub String);

impl FromStr for RarityTier {
    type Err = UnknownTier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legendary" => Ok(Self::Legendary),
            "common" => Ok(Self::Common),
            other => Err(UnknownTier(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roundtrip() {
        for tier in RarityTier::ALL {
            assert_eq!(tier.as_str().parse::<RarityTier>(), Ok(tier));
        }
        assert_eq!("  Legendary ".parse::<RarityTier>(), Ok(RarityTier::Legendary));
    }

    #[test]
    fn test_parse_unknown() {
        assert!("mythic".parse::<RarityTier>().is_err());
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&RarityTier::Common).unwrap();
        assert_eq!(json, "\"common\"");
    }
}
