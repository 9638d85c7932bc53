//! Retry-until-unique group filling
//!
//! Every attempt is a pure function of `(request, base_seed, index)`, so a
//! group can be replayed exactly. The accepted-fingerprint set is owned by the
//! caller and shared by every group of a run.

use crate::selector::{SelectionRequest, Selector};
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, warn};
use traitloom_core::{Fingerprint, Prng, RarityTier, SelectedComposition};

/// One homogeneous batch of compositions to produce
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupRequest {
    pub request: SelectionRequest,
    pub count: u32,
}

impl GroupRequest {
    pub fn new(request: SelectionRequest, count: u32) -> Self {
        Self { request, count }
    }
}

/// Counters for one filled group
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupStats {
    pub character: String,
    pub tier: RarityTier,
    pub inherit: bool,
    pub requested: u32,
    pub accepted: u32,
    pub attempts: u32,
    pub duplicates: u32,
    /// Attempts that broke a constraint or missed the inheritance guarantee
    pub rejected: u32,
}

impl GroupStats {
    fn new(group: &GroupRequest) -> Self {
        Self {
            character: group.request.character.clone(),
            tier: group.request.tier,
            inherit: group.request.wants_inheritance(),
            requested: group.count,
            accepted: 0,
            attempts: 0,
            duplicates: 0,
            rejected: 0,
        }
    }

    /// Compositions requested but never produced
    pub fn shortfall(&self) -> u32 {
        self.requested.saturating_sub(self.accepted)
    }
}

/// Result of filling one group
#[derive(Debug, Clone)]
pub struct GroupOutcome {
    pub compositions: Vec<SelectedComposition>,
    pub stats: GroupStats,
}

/// Run attempt `index` of a group
pub fn attempt(
    selector: &Selector<'_>,
    request: &SelectionRequest,
    base_seed: u32,
    index: u32,
) -> SelectedComposition {
    let mut rng = Prng::new(base_seed.wrapping_add(index));
    selector.select(request, &mut rng)
}

/// Whether a composition is acceptable on its own, before uniqueness
pub fn is_valid(
    selector: &Selector<'_>,
    request: &SelectionRequest,
    composition: &SelectedComposition,
) -> bool {
    let table = &selector.config().constraints;
    if let Err(violation) = table.check(composition) {
        debug!("Rejected {}: {}", composition.fingerprint(), violation);
        return false;
    }
    !request.wants_inheritance() || table.has_inherited_layer(composition)
}

/// First valid composition among attempts `0..budget` from `base_seed`
///
/// Single-composition counterpart of [`fill_group`]: the same attempt
/// sequence and acceptance test, without the uniqueness set.
pub fn first_valid(
    selector: &Selector<'_>,
    request: &SelectionRequest,
    base_seed: u32,
    budget: u32,
) -> Option<SelectedComposition> {
    let found = (0..budget)
        .map(|index| attempt(selector, request, base_seed, index))
        .find(|composition| is_valid(selector, request, composition));

    if found.is_none() {
        warn!(
            "{} {}: no valid composition in {} attempts from seed {}",
            request.character, request.tier, budget, base_seed
        );
    }
    found
}

/// Produce up to `group.count` unique compositions
///
/// Gives up after `count * attempt_multiplier` attempts. A shortfall is
/// logged and reported in the stats, never raised.
pub fn fill_group(
    selector: &Selector<'_>,
    group: &GroupRequest,
    base_seed: u32,
    seen: &mut HashSet<Fingerprint>,
) -> GroupOutcome {
    let mut stats = GroupStats::new(group);
    let mut compositions = Vec::with_capacity(group.count as usize);
    let budget = group
        .count
        .saturating_mul(selector.config().attempt_multiplier.max(1));

    while stats.accepted < group.count && stats.attempts < budget {
        let composition = attempt(selector, &group.request, base_seed, stats.attempts);
        stats.attempts += 1;

        if !is_valid(selector, &group.request, &composition) {
            stats.rejected += 1;
            continue;
        }

        if !seen.insert(composition.fingerprint()) {
            stats.duplicates += 1;
            continue;
        }

        compositions.push(composition);
        stats.accepted += 1;
    }

    if stats.shortfall() > 0 {
        warn!(
            "{} {} group{}: produced {} of {} after {} attempts ({} duplicates, {} rejected)",
            stats.character,
            stats.tier,
            if stats.inherit { " (inherited)" } else { "" },
            stats.accepted,
            stats.requested,
            stats.attempts,
            stats.duplicates,
            stats.rejected
        );
    }

    GroupOutcome {
        compositions,
        stats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use traitloom_catalog::TraitCatalog;
    use traitloom_core::CollectionConfig;

    /// Five backgrounds times six bases, every other layer empty
    fn small_space() -> (TraitCatalog, CollectionConfig) {
        let mut catalog = TraitCatalog::new();
        let backgrounds = ["a", "b", "c", "d", "e"];
        let bases = ["f1", "f2", "f3", "f4", "f5", "f6"];
        catalog.insert_identifiers(RarityTier::Common, "fox", "background", &backgrounds);
        catalog.insert_identifiers(RarityTier::Common, "fox", "base", &bases);
        (catalog, CollectionConfig::default())
    }

    #[test]
    fn test_attempt_is_pure() {
        let catalog = fixtures::catalog();
        let config = fixtures::config();
        let selector = Selector::new(&catalog, &config);
        let request = SelectionRequest::new("bear", RarityTier::Common);

        assert_eq!(
            attempt(&selector, &request, 77, 3),
            attempt(&selector, &request, 77, 3)
        );
        assert_eq!(
            attempt(&selector, &request, 77, 3),
            attempt(&selector, &request, 80, 0)
        );
    }

    #[test]
    fn test_fill_group_unique() {
        let catalog = fixtures::catalog();
        let config = fixtures::config();
        let selector = Selector::new(&catalog, &config);
        let group = GroupRequest::new(SelectionRequest::new("bear", RarityTier::Common), 40);

        let mut seen = HashSet::new();
        let outcome = fill_group(&selector, &group, 1, &mut seen);

        assert_eq!(outcome.stats.accepted, 40);
        assert_eq!(outcome.compositions.len(), 40);
        assert_eq!(seen.len(), 40);

        let unique: HashSet<_> = outcome.compositions.iter().map(|c| c.fingerprint()).collect();
        assert_eq!(unique.len(), 40);
    }

    #[test]
    fn test_fox_small_space_shortfall() {
        let (catalog, config) = small_space();
        let selector = Selector::new(&catalog, &config);
        let group = GroupRequest::new(SelectionRequest::new("fox", RarityTier::Common), 50);

        let mut seen = HashSet::new();
        let outcome = fill_group(&selector, &group, 42, &mut seen);

        assert!(outcome.stats.accepted <= 30);
        assert!(outcome.stats.shortfall() >= 20);
        assert_eq!(outcome.stats.attempts, 50 * config.attempt_multiplier);
        assert_eq!(
            outcome.stats.accepted + outcome.stats.duplicates + outcome.stats.rejected,
            outcome.stats.attempts
        );
    }

    #[test]
    fn test_seen_set_spans_groups() {
        let (catalog, config) = small_space();
        let selector = Selector::new(&catalog, &config);
        let group = GroupRequest::new(SelectionRequest::new("fox", RarityTier::Common), 30);

        let mut seen = HashSet::new();
        let first = fill_group(&selector, &group, 1, &mut seen);
        let second = fill_group(&selector, &group, 2, &mut seen);

        assert_eq!(first.stats.accepted + second.stats.accepted, seen.len() as u32);
        assert!(seen.len() <= 30);
    }

    #[test]
    fn test_inheritance_guarantee() {
        let catalog = fixtures::catalog();
        let config = fixtures::config();
        let table = &config.constraints;
        let selector = Selector::new(&catalog, &config);
        let group = GroupRequest::new(
            SelectionRequest::new("bear", RarityTier::Common).with_inheritance(true),
            25,
        );

        let outcome = fill_group(&selector, &group, 9, &mut HashSet::new());
        assert_eq!(outcome.stats.accepted, 25);
        for comp in &outcome.compositions {
            assert!(table.has_inherited_layer(comp));
            assert!(comp.inheritance);
        }
    }

    #[test]
    fn test_inheritance_unsatisfiable_rejects() {
        // No legendary art at all: nothing can be inherited
        let mut catalog = TraitCatalog::new();
        catalog.insert_identifiers(RarityTier::Common, "bear", "base", &["brown_fur"]);
        let config = CollectionConfig::default();
        let selector = Selector::new(&catalog, &config);
        let group = GroupRequest::new(
            SelectionRequest::new("bear", RarityTier::Common).with_inheritance(true),
            2,
        );

        let outcome = fill_group(&selector, &group, 0, &mut HashSet::new());
        assert_eq!(outcome.stats.accepted, 0);
        assert_eq!(outcome.stats.rejected, outcome.stats.attempts);
        assert_eq!(outcome.stats.shortfall(), 2);
    }

    #[test]
    fn test_first_valid_always_inherits() {
        let catalog = fixtures::catalog();
        let config = fixtures::config();
        let table = &config.constraints;
        let selector = Selector::new(&catalog, &config);
        let request = SelectionRequest::new("bear", RarityTier::Common).with_inheritance(true);
        let budget = config.attempt_multiplier;

        for seed in 0..1000 {
            let comp = first_valid(&selector, &request, seed, budget)
                .unwrap_or_else(|| panic!("seed {seed}: nothing valid"));
            assert!(table.has_inherited_layer(&comp), "seed {seed}");
            assert_eq!(table.check(&comp), Ok(()), "seed {seed}");
        }
    }

    #[test]
    fn test_first_valid_matches_plain_select() {
        // Without inheritance the very first attempt already passes
        let catalog = fixtures::catalog();
        let config = fixtures::config();
        let selector = Selector::new(&catalog, &config);
        let request = SelectionRequest::new("fox", RarityTier::Common);

        assert_eq!(
            first_valid(&selector, &request, 31, 10),
            Some(attempt(&selector, &request, 31, 0))
        );
    }

    #[test]
    fn test_first_valid_exhausted() {
        let mut catalog = TraitCatalog::new();
        catalog.insert_identifiers(RarityTier::Common, "bear", "base", &["brown_fur"]);
        let config = CollectionConfig::default();
        let selector = Selector::new(&catalog, &config);
        let request = SelectionRequest::new("bear", RarityTier::Common).with_inheritance(true);

        assert_eq!(first_valid(&selector, &request, 0, 20), None);
        assert_eq!(first_valid(&selector, &request, 0, 0), None);
    }

    #[test]
    fn test_zero_count_group() {
        let catalog = fixtures::catalog();
        let config = fixtures::config();
        let selector = Selector::new(&catalog, &config);
        let group = GroupRequest::new(SelectionRequest::new("bear", RarityTier::Legendary), 0);

        let outcome = fill_group(&selector, &group, 0, &mut HashSet::new());
        assert!(outcome.compositions.is_empty());
        assert_eq!(outcome.stats.attempts, 0);
    }
}
