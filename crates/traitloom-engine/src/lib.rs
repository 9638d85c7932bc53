//! Traitloom Engine - selection, deduplication and planning
//!
//! ```text
//! GenerationJob → BatchPlanner ─┬→ fill_group → attempt → Selector::select
//!                               └→ shuffle → PlannedItem { id, composition }
//! ```
//!
//! Everything here is deterministic for a given catalog, config and seed.
//! Rendering lives in `traitloom-backend-raster`.

pub mod dedup;
pub mod metadata;
pub mod planner;
pub mod selector;

#[cfg(test)]
mod fixtures;

pub use dedup::{
    GroupOutcome, GroupRequest, GroupStats, attempt, fill_group, first_valid, is_valid,
};
pub use metadata::{Attribute, TokenMetadata, image_file_name, metadata_file_name};
pub use planner::{
    BatchPlanner, GROUP_SEED_STRIDE, GenerationPlan, PlannedItem, group_seed,
};
pub use selector::{AccessoryRoll, ActiveClasses, SelectionRequest, Selector, WalkState};
