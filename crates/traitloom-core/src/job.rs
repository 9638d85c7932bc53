//! Generation jobs and per-character quotas

use crate::config::CollectionConfig;
use crate::error::JobError;
use serde::{Deserialize, Serialize};

/// Input to the batch planner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationJob {
    /// Base seed for the whole run
    pub seed: u32,
    /// Compositions generated per character (all tiers)
    pub per_character_count: u32,
    /// Common compositions per character that borrow from the legendary catalog
    pub per_character_inheritance: u32,
    /// Identifier given to the first item after shuffling
    pub starting_id: u64,
    /// Characters to generate; empty means every configured character
    #[serde(default)]
    pub characters: Vec<String>,
}

/// How one character's count splits across groups
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharacterQuota {
    pub legendary: u32,
    pub common: u32,
    /// Portion of `common` that requests inheritance
    pub inherit: u32,
}

impl CharacterQuota {
    pub fn total(&self) -> u32 {
        self.legendary + self.common
    }
}

impl GenerationJob {
    pub fn new(seed: u32, per_character_count: u32) -> Self {
        Self {
            seed,
            per_character_count,
            per_character_inheritance: 0,
            starting_id: 1,
            characters: Vec::new(),
        }
    }

    pub fn with_inheritance(mut self, count: u32) -> Self {
        self.per_character_inheritance = count;
        self
    }

    pub fn with_starting_id(mut self, id: u64) -> Self {
        self.starting_id = id;
        self
    }

    pub fn with_characters<S: Into<String>>(
        mut self,
        characters: impl IntoIterator<Item = S>,
    ) -> Self {
        self.characters = characters.into_iter().map(Into::into).collect();
        self
    }

    /// Characters this job covers, in configured order when unspecified
    pub fn characters<'a>(&'a self, config: &'a CollectionConfig) -> Vec<&'a str> {
        if self.characters.is_empty() {
            config.characters.iter().map(String::as_str).collect()
        } else {
            self.characters.iter().map(String::as_str).collect()
        }
    }

    /// Split `per_character_count` into legendary, common and inheritance quotas
    pub fn quota(&self, config: &CollectionConfig) -> CharacterQuota {
        let count = self.per_character_count;
        let legendary =
            ((f64::from(count) * config.legendary_percent / 100.0).round() as u32).min(count);
        let common = count - legendary;

        CharacterQuota {
            legendary,
            common,
            inherit: self.per_character_inheritance,
        }
    }

    /// Reject invalid input before any work starts
    pub fn validate(&self, config: &CollectionConfig) -> Result<CharacterQuota, JobError> {
        if self.per_character_count == 0 {
            return Err(JobError::ZeroCount);
        }

        let characters = self.characters(config);
        if characters.is_empty() {
            return Err(JobError::NoCharacters);
        }
        if let Some(unknown) = characters.iter().find(|c| !config.has_character(c)) {
            return Err(JobError::UnknownCharacter(unknown.to_string()));
        }

        let quota = self.quota(config);
        if quota.inherit > quota.common {
            return Err(JobError::InheritanceExceedsCommon {
                character: characters[0].to_string(),
                requested: quota.inherit,
                available: quota.common,
            });
        }

        let count = u64::from(quota.total()) * characters.len() as u64;
        if self.starting_id.checked_add(count).is_none() {
            return Err(JobError::IdRangeOverflow {
                start: self.starting_id,
                count,
            });
        }

        Ok(quota)
    }
}
