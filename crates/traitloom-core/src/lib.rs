//! Traitloom Core - shared types for the trait-composition engine
//!
//! Traitloom samples unique, rule-valid combinations of layered character art
//! and renders each one as an image plus metadata.
//!
//! # Pipeline
//!
//! ```text
//! CollectionConfig ─┐
//! Asset store ──→ TraitCatalog → Selector → Deduplicator → BatchPlanner
//!                                                              │
//!                                      Compositor + Metadata ←─┘
//! ```
//!
//! This crate holds everything the stages agree on: the deterministic PRNG,
//! rarity tiers, trait assets, the collection configuration and constraint
//! table, compositions with their fingerprints, and generation jobs.

pub mod asset;
pub mod composition;
pub mod config;
pub mod constraints;
pub mod error;
pub mod job;
pub mod prng;
pub mod tier;

/// Asset-store scope holding art shared by every character of a tier
pub const SHARED_SCOPE: &str = "shared";

// Re-export commonly used types
pub use asset::{TraitAsset, deslug};
pub use composition::{Fingerprint, LayerAssignment, SelectedComposition};
pub use config::{CanvasSize, CollectionConfig, LayerOffset, TierConfig};
pub use constraints::{AccessoryMode, ConstraintTable, ConstraintViolation, LayerRoles, Pairing};
pub use error::{ConfigError, JobError};
pub use job::{CharacterQuota, GenerationJob};
pub use prng::Prng;
pub use tier::RarityTier;
