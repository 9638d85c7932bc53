//! Batch planning
//!
//! Turns a [`GenerationJob`] into a numbered list of unique compositions.
//! Groups run in a fixed order (per character: legendary, common with
//! inheritance, plain common) so a job and its seed always yield the same plan.

use crate::dedup::{GroupRequest, GroupStats, fill_group};
use crate::selector::{SelectionRequest, Selector};
use std::collections::HashSet;
use tracing::info;
use traitloom_catalog::TraitCatalog;
use traitloom_core::{
    CollectionConfig, GenerationJob, JobError, Prng, RarityTier, SelectedComposition,
};

/// Distance between the base seeds of consecutive groups
pub const GROUP_SEED_STRIDE: u32 = 1_000_003;

/// Mixed into the job seed for the final shuffle
const SHUFFLE_SALT: u32 = 0x9E37_79B9;

/// A composition with its final identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedItem {
    pub id: u64,
    pub composition: SelectedComposition,
}

/// Output of a planning pass
#[derive(Debug, Clone, Default)]
pub struct GenerationPlan {
    /// Items in identifier order
    pub items: Vec<PlannedItem>,
    /// Per-group counters, in execution order
    pub outcomes: Vec<GroupStats>,
}

impl GenerationPlan {
    /// Compositions requested but not produced, across all groups
    pub fn shortfall(&self) -> u32 {
        self.outcomes.iter().map(GroupStats::shortfall).sum()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Plans generation runs against one catalog and config
pub struct BatchPlanner<'a> {
    selector: Selector<'a>,
}

impl<'a> BatchPlanner<'a> {
    pub fn new(catalog: &'a TraitCatalog, config: &'a CollectionConfig) -> Self {
        Self {
            selector: Selector::new(catalog, config),
        }
    }

    /// Group requests for a job, in execution order
    pub fn groups(&self, job: &GenerationJob) -> Result<Vec<GroupRequest>, JobError> {
        let config = self.selector.config();
        let quota = job.validate(config)?;

        let mut groups = Vec::new();
        for character in job.characters(config) {
            let legendary = SelectionRequest::new(character, RarityTier::Legendary);
            let inherited =
                SelectionRequest::new(character, RarityTier::Common).with_inheritance(true);
            let plain = SelectionRequest::new(character, RarityTier::Common);

            for (request, count) in [
                (legendary, quota.legendary),
                (inherited, quota.inherit),
                (plain, quota.common - quota.inherit),
            ] {
                if count > 0 {
                    groups.push(GroupRequest::new(request, count));
                }
            }
        }

        Ok(groups)
    }

    /// Fill every group, shuffle, and assign identifiers
    pub fn plan(&self, job: &GenerationJob) -> Result<GenerationPlan, JobError> {
        let groups = self.groups(job)?;

        let mut seen = HashSet::new();
        let mut compositions = Vec::new();
        let mut outcomes = Vec::with_capacity(groups.len());

        for (index, group) in groups.iter().enumerate() {
            let base_seed = group_seed(job.seed, index);
            let outcome = fill_group(&self.selector, group, base_seed, &mut seen);
            compositions.extend(outcome.compositions);
            outcomes.push(outcome.stats);
        }

        let mut rng = Prng::new(job.seed ^ SHUFFLE_SALT);
        rng.shuffle(&mut compositions);

        let items = compositions
            .into_iter()
            .zip(job.starting_id..)
            .map(|(composition, id)| PlannedItem { id, composition })
            .collect();

        let plan = GenerationPlan { items, outcomes };
        info!(
            "Planned {} compositions in {} groups (shortfall {})",
            plan.len(),
            plan.outcomes.len(),
            plan.shortfall()
        );

        Ok(plan)
    }
}

/// Base seed of the group at `index`
pub fn group_seed(seed: u32, index: usize) -> u32 {
    seed.wrapping_add((index as u32).wrapping_mul(GROUP_SEED_STRIDE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use std::collections::HashMap;

    fn fingerprints(plan: &GenerationPlan) -> Vec<String> {
        plan.items
            .iter()
            .map(|i| i.composition.fingerprint().to_string())
            .collect()
    }

    #[test]
    fn test_group_order() {
        let catalog = fixtures::catalog();
        let mut config = fixtures::config();
        config.legendary_percent = 10.0;
        let planner = BatchPlanner::new(&catalog, &config);
        let job = GenerationJob::new(1, 20)
            .with_inheritance(4)
            .with_characters(["bear", "fox"]);

        let groups = planner.groups(&job).unwrap();
        let shape: Vec<_> = groups
            .iter()
            .map(|g| (g.request.character.as_str(), g.request.tier, g.request.inherit, g.count))
            .collect();

        assert_eq!(
            shape,
            vec![
                ("bear", RarityTier::Legendary, false, 2),
                ("bear", RarityTier::Common, true, 4),
                ("bear", RarityTier::Common, false, 14),
                ("fox", RarityTier::Legendary, false, 2),
                ("fox", RarityTier::Common, true, 4),
                ("fox", RarityTier::Common, false, 14),
            ]
        );
    }

    #[test]
    fn test_plan_deterministic() {
        let catalog = fixtures::catalog();
        let config = fixtures::config();
        let planner = BatchPlanner::new(&catalog, &config);
        let job = GenerationJob::new(12345, 30)
            .with_inheritance(5)
            .with_characters(["bear", "fox"]);

        let a = planner.plan(&job).unwrap();
        let b = planner.plan(&job).unwrap();
        assert_eq!(a.items, b.items);

        let other_job = GenerationJob::new(54321, 30).with_characters(["bear", "fox"]);
        let other = planner.plan(&other_job).unwrap();
        assert_ne!(fingerprints(&a), fingerprints(&other));
    }

    #[test]
    fn test_plan_unique_and_numbered() {
        let catalog = fixtures::catalog();
        let config = fixtures::config();
        let planner = BatchPlanner::new(&catalog, &config);
        let job = GenerationJob::new(7, 25)
            .with_inheritance(5)
            .with_starting_id(100)
            .with_characters(["bear", "fox"]);

        let plan = planner.plan(&job).unwrap();
        let unique: HashSet<_> = fingerprints(&plan).into_iter().collect();
        assert_eq!(unique.len(), plan.len());

        let ids: Vec<u64> = plan.items.iter().map(|i| i.id).collect();
        let expected: Vec<u64> = (100..100 + plan.len() as u64).collect();
        assert_eq!(ids, expected);

        for item in &plan.items {
            assert_eq!(config.constraints.check(&item.composition), Ok(()));
            if item.composition.inheritance {
                assert!(config.constraints.has_inherited_layer(&item.composition));
            }
        }
    }

    #[test]
    fn test_renumbering_mixes_characters() {
        let catalog = fixtures::catalog();
        let config = fixtures::config();
        let planner = BatchPlanner::new(&catalog, &config);
        let job = GenerationJob::new(99, 40).with_characters(["bear", "fox"]);

        let plan = planner.plan(&job).unwrap();
        let half = plan.len() / 2;
        let first_half: HashSet<_> = plan.items[..half]
            .iter()
            .map(|i| i.composition.character.as_str())
            .collect();
        assert_eq!(first_half.len(), 2);
    }

    #[test]
    fn test_renumbering_spreads_every_group() {
        let catalog = fixtures::catalog();
        let mut config = fixtures::config();
        config.legendary_percent = 25.0;
        let planner = BatchPlanner::new(&catalog, &config);

        // (tier, character) -> relative positions in [0, 1] across all runs
        let mut positions: HashMap<(RarityTier, String), Vec<f64>> = HashMap::new();

        for seed in 1..=8 {
            let job = GenerationJob::new(seed, 40).with_characters(["bear", "fox"]);
            let plan = planner.plan(&job).unwrap();
            assert_eq!(plan.shortfall(), 0);

            let half = plan.len() / 2;
            let last = (plan.len() - 1) as f64;
            let mut halves: HashMap<(RarityTier, &str), [bool; 2]> = HashMap::new();

            for (pos, item) in plan.items.iter().enumerate() {
                let comp = &item.composition;
                let group = (comp.tier, comp.character.as_str());
                halves.entry(group).or_default()[usize::from(pos >= half)] = true;
                positions
                    .entry((comp.tier, comp.character.clone()))
                    .or_default()
                    .push(pos as f64 / last);
            }

            assert_eq!(halves.len(), 4, "seed {seed}");
            for (group, seen) in &halves {
                assert_eq!(*seen, [true, true], "seed {seed}: {group:?} confined to one half");
            }
        }

        for (group, spread) in &positions {
            let mean = spread.iter().sum::<f64>() / spread.len() as f64;
            assert!((mean - 0.5).abs() < 0.15, "{group:?} mean position {mean}");
        }
    }

    #[test]
    fn test_small_space_shortfall() {
        let mut catalog = TraitCatalog::new();
        let backgrounds = ["a", "b", "c", "d", "e"];
        let bases = ["f1", "f2", "f3", "f4", "f5", "f6"];
        catalog.insert_identifiers(RarityTier::Common, "fox", "background", &backgrounds);
        catalog.insert_identifiers(RarityTier::Common, "fox", "base", &bases);
        let mut config = CollectionConfig::default();
        config.legendary_percent = 0.0;
        let planner = BatchPlanner::new(&catalog, &config);

        let plan = planner.plan(&GenerationJob::new(5, 50).with_characters(["fox"])).unwrap();
        assert!(plan.len() <= 30);
        assert!(plan.shortfall() >= 20);
    }

    #[test]
    fn test_invalid_jobs() {
        let catalog = fixtures::catalog();
        let config = fixtures::config();
        let planner = BatchPlanner::new(&catalog, &config);

        assert!(matches!(
            planner.plan(&GenerationJob::new(1, 0)),
            Err(JobError::ZeroCount)
        ));
        assert!(matches!(
            planner.plan(&GenerationJob::new(1, 5).with_characters(["dragon"])),
            Err(JobError::UnknownCharacter(_))
        ));
        assert!(matches!(
            planner.plan(&GenerationJob::new(1, 5).with_inheritance(6)),
            Err(JobError::InheritanceExceedsCommon { .. })
        ));
        assert!(matches!(
            planner.plan(
                &GenerationJob::new(1, 3)
                    .with_characters(["bear"])
                    .with_starting_id(u64::MAX)
            ),
            Err(JobError::IdRangeOverflow { .. })
        ));
    }

    #[test]
    fn test_group_seed_wraps() {
        assert_eq!(group_seed(10, 0), 10);
        assert_eq!(group_seed(10, 2), 10 + 2 * GROUP_SEED_STRIDE);
        assert_eq!(group_seed(u32::MAX, 1), GROUP_SEED_STRIDE - 1);
    }
}
