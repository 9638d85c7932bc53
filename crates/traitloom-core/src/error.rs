//! Error types shared across Traitloom crates

use std::path::PathBuf;
use thiserror::Error;

/// Collection configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config not found: {0}")]
    NotFound(PathBuf),

    #[error("Invalid config: {0}")]
    Invalid(String),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Generation job rejected before any work starts
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JobError {
    #[error("Requested count must be at least 1")]
    ZeroCount,

    #[error("Unknown character: {0}")]
    UnknownCharacter(String),

    #[error("No characters selected")]
    NoCharacters,

    #[error("Inheritance count {requested} exceeds common quota {available} for {character}")]
    InheritanceExceedsCommon {
        character: String,
        requested: u32,
        available: u32,
    },

    #[error("Identifiers starting at {start} overflow for {count} items")]
    IdRangeOverflow { start: u64, count: u64 },
}
