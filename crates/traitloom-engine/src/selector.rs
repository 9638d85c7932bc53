//! Constraint-aware trait selection
//!
//! One call to [`Selector::select`] walks the tier's layer order bottom to top
//! and fills every layer with an asset or nothing. Rules that depend on
//! earlier layers (legendary eyes hide eyewear, hoodies hide head accessories,
//! a face-covering head accessory undoes eyewear and legendary eyes) are
//! tracked in a [`WalkState`] that is threaded through the walk.
//!
//! Draw order is part of the output contract: the same request and seed must
//! always yield the same composition, so the sequence of PRNG calls below
//! must not be reordered.

use bitflags::bitflags;
use std::collections::BTreeSet;
use traitloom_catalog::TraitCatalog;
use traitloom_core::{
    AccessoryMode, CollectionConfig, ConstraintTable, LayerAssignment, Prng, RarityTier,
    SelectedComposition, TierConfig, TraitAsset,
};

bitflags! {
    /// Trait classes already placed during the walk
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ActiveClasses: u8 {
        const LEGENDARY_EYES = 1 << 0;
        const HOODIE = 1 << 1;
        const ASTRONAUT = 1 << 2;
        const LEGENDARY_OUTERWEAR = 1 << 3;
        const FACE_COVERED = 1 << 4;

        /// Classes that hide eyewear
        const BLOCKS_EYEWEAR =
            Self::LEGENDARY_EYES.bits() | Self::ASTRONAUT.bits() | Self::FACE_COVERED.bits();
        /// Classes that hide head accessories and necklaces
        const BLOCKS_HEAD =
            Self::HOODIE.bits() | Self::ASTRONAUT.bits() | Self::LEGENDARY_OUTERWEAR.bits();
        /// Classes that force eyes from the common pool
        const COMMON_EYES_ONLY = Self::ASTRONAUT.bits() | Self::FACE_COVERED.bits();
    }
}

/// What to generate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionRequest {
    pub character: String,
    pub tier: RarityTier,
    /// Base identifier to use when it exists in the base pool
    pub forced_base: Option<String>,
    /// Borrow at least one layer from the legendary catalog (common tier only)
    pub inherit: bool,
}

impl SelectionRequest {
    pub fn new(character: impl Into<String>, tier: RarityTier) -> Self {
        Self {
            character: character.into(),
            tier,
            forced_base: None,
            inherit: false,
        }
    }

    pub fn with_forced_base(mut self, base: impl Into<String>) -> Self {
        self.forced_base = Some(base.into());
        self
    }

    pub fn with_inheritance(mut self, inherit: bool) -> Self {
        self.inherit = inherit;
        self
    }

    /// Inheritance only applies to the common tier
    pub fn wants_inheritance(&self) -> bool {
        self.inherit && self.tier == RarityTier::Common
    }
}

/// Accessory pre-roll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessoryRoll {
    pub mode: AccessoryMode,
    /// Whether any accessory-family layer is used at all
    pub present: bool,
}

/// Mutable state carried across the per-layer walk
#[derive(Debug, Clone)]
pub struct WalkState {
    pub classes: ActiveClasses,
    pub accessory: AccessoryRoll,
    /// Layers marked to draw from the legendary catalog
    pub inherit: BTreeSet<String>,
    pub assignments: Vec<LayerAssignment>,
}

impl WalkState {
    fn new(accessory: AccessoryRoll, inherit: BTreeSet<String>, capacity: usize) -> Self {
        Self {
            classes: ActiveClasses::empty(),
            accessory,
            inherit,
            assignments: Vec::with_capacity(capacity),
        }
    }

    fn assign(&mut self, layer: &str, asset: Option<TraitAsset>) {
        self.assignments.push(LayerAssignment {
            layer: layer.to_string(),
            asset,
        });
    }

    fn slot_mut(&mut self, table: &ConstraintTable, role: &str) -> Option<&mut LayerAssignment> {
        self.assignments
            .iter_mut()
            .find(|a| table.is_role(&a.layer, role))
    }

    fn asset(&self, table: &ConstraintTable, role: &str) -> Option<&TraitAsset> {
        self.assignments
            .iter()
            .find(|a| table.is_role(&a.layer, role))
            .and_then(|a| a.asset.as_ref())
    }
}

/// Resolves compositions against a catalog and a collection config
#[derive(Clone, Copy)]
pub struct Selector<'a> {
    catalog: &'a TraitCatalog,
    config: &'a CollectionConfig,
}

impl<'a> Selector<'a> {
    pub fn new(catalog: &'a TraitCatalog, config: &'a CollectionConfig) -> Self {
        Self { catalog, config }
    }

    pub fn config(&self) -> &'a CollectionConfig {
        self.config
    }

    pub fn catalog(&self) -> &'a TraitCatalog {
        self.catalog
    }

    fn table(&self) -> &'a ConstraintTable {
        &self.config.constraints
    }

    /// Resolve one composition
    pub fn select(&self, request: &SelectionRequest, rng: &mut Prng) -> SelectedComposition {
        let tier = self.config.tier(request.tier);

        let accessory = self.roll_accessory(tier, rng);
        let inherit = if request.wants_inheritance() {
            self.roll_inheritance(tier, rng)
        } else {
            BTreeSet::new()
        };

        let mut state = WalkState::new(accessory, inherit, tier.layers.len());
        for layer in &tier.layers {
            self.resolve_layer(layer, request, tier, &mut state, rng);
        }

        SelectedComposition {
            character: request.character.clone(),
            tier: request.tier,
            assignments: state.assignments,
            inheritance: request.wants_inheritance(),
        }
    }

    /// Pick the accessory family and whether it shows up at all
    pub fn roll_accessory(&self, tier: &TierConfig, rng: &mut Prng) -> AccessoryRoll {
        let mode = AccessoryMode::ALL[rng.next_int(0, 2) as usize];
        let present = rng.chance(tier.accessory_chance);
        AccessoryRoll { mode, present }
    }

    /// Mark eligible layers for inheritance, at least one
    pub fn roll_inheritance(&self, tier: &TierConfig, rng: &mut Prng) -> BTreeSet<String> {
        let table = self.table();
        let eligible: Vec<&String> = tier
            .layers
            .iter()
            .filter(|l| table.is_inheritance_eligible(l))
            .collect();

        let mut marked = BTreeSet::new();
        for layer in &eligible {
            if rng.chance(50.0) {
                marked.insert((*layer).clone());
            }
        }

        if marked.is_empty() && !eligible.is_empty() {
            let forced = eligible[rng.next_index(eligible.len())];
            marked.insert(forced.clone());
        }

        marked
    }

    fn resolve_layer(
        &self,
        layer: &str,
        request: &SelectionRequest,
        tier: &TierConfig,
        state: &mut WalkState,
        rng: &mut Prng,
    ) {
        if self.is_suppressed(layer, state) {
            state.assign(layer, None);
            return;
        }

        if let Some(chance) = tier.optional_chance(layer) {
            if !rng.chance(chance) {
                state.assign(layer, None);
                return;
            }
        }

        let pool = self.pool(layer, request, state);
        let asset = self.choose(layer, request, pool, state, rng);

        if let Some(asset) = &asset {
            self.apply_side_effects(layer, asset, request, state, rng);
        }
        state.assign(layer, asset);
    }

    fn is_suppressed(&self, layer: &str, state: &WalkState) -> bool {
        let table = self.table();
        let roles = &table.roles;
        let canonical = table.canonical_layer(layer);

        if canonical == roles.eyewear {
            return state.classes.intersects(ActiveClasses::BLOCKS_EYEWEAR);
        }

        if canonical == roles.head || canonical == roles.necklace {
            return state.classes.intersects(ActiveClasses::BLOCKS_HEAD);
        }

        if self.is_accessory_family(canonical) {
            return !state.accessory.present
                || !state.accessory.mode.active_layers(roles).contains(&canonical);
        }

        false
    }

    fn is_accessory_family(&self, canonical: &str) -> bool {
        let roles = &self.table().roles;
        [
            &roles.hand,
            &roles.accessory,
            &roles.side_hand,
            &roles.side_accessory,
        ]
        .iter()
        .any(|role| role.as_str() == canonical)
    }

    /// Candidate pool for a layer
    fn pool(&self, layer: &str, request: &SelectionRequest, state: &WalkState) -> &'a [TraitAsset] {
        let table = self.table();
        let canonical = table.canonical_layer(layer);

        if canonical == table.roles.eyes
            && state.classes.intersects(ActiveClasses::COMMON_EYES_ONLY)
        {
            return self
                .catalog
                .layer(RarityTier::Common, &request.character, canonical);
        }

        if state.inherit.contains(layer) {
            return self.catalog.layer(
                RarityTier::Legendary,
                &request.character,
                table.legendary_folder(layer),
            );
        }

        self.catalog.layer(request.tier, &request.character, layer)
    }

    fn choose(
        &self,
        layer: &str,
        request: &SelectionRequest,
        pool: &[TraitAsset],
        state: &WalkState,
        rng: &mut Prng,
    ) -> Option<TraitAsset> {
        if pool.is_empty() {
            return None;
        }

        let table = self.table();
        let roles = &table.roles;
        let canonical = table.canonical_layer(layer);

        if canonical == roles.hand || canonical == roles.side_hand {
            let paired = state
                .asset(table, &roles.base)
                .and_then(|base| table.pairing(request.tier, &base.identifier, layer))
                .and_then(|id| pool.iter().find(|a| a.identifier == id));
            if let Some(asset) = paired {
                return Some(asset.clone());
            }
        }

        if canonical == roles.base {
            let forced = request
                .forced_base
                .as_deref()
                .and_then(|id| pool.iter().find(|a| a.identifier == id));
            if let Some(asset) = forced {
                return Some(asset.clone());
            }
        }

        rng.pick(pool).cloned()
    }

    fn apply_side_effects(
        &self,
        layer: &str,
        asset: &TraitAsset,
        request: &SelectionRequest,
        state: &mut WalkState,
        rng: &mut Prng,
    ) {
        let table = self.table();
        let roles = &table.roles;
        let canonical = table.canonical_layer(layer);

        if canonical == roles.eyes {
            state
                .classes
                .set(ActiveClasses::LEGENDARY_EYES, table.is_legendary_eyes(asset));
        } else if canonical == roles.shirt {
            state.classes.set(ActiveClasses::HOODIE, table.is_hoodie(asset));
            state
                .classes
                .set(ActiveClasses::ASTRONAUT, table.is_astronaut(asset));
            state.classes.set(
                ActiveClasses::LEGENDARY_OUTERWEAR,
                table.is_legendary_outerwear(asset),
            );
        } else if canonical == roles.head && table.is_face_covering(asset) {
            state.classes.insert(ActiveClasses::FACE_COVERED);
            self.uncover_face(request, state, rng);
        }
    }

    /// Eyes precede the head accessory, so a face covering has to undo them after the fact
    fn uncover_face(&self, request: &SelectionRequest, state: &mut WalkState, rng: &mut Prng) {
        let table = self.table();
        let roles = &table.roles;

        if let Some(slot) = state.slot_mut(table, &roles.eyewear) {
            slot.asset = None;
        }

        if state.classes.contains(ActiveClasses::LEGENDARY_EYES) {
            let pool = self
                .catalog
                .layer(RarityTier::Common, &request.character, &roles.eyes);
            let replacement = rng.pick(pool).cloned();

            if let Some(slot) = state.slot_mut(table, &roles.eyes) {
                slot.asset = replacement;
            }
            state.classes.remove(ActiveClasses::LEGENDARY_EYES);
        }
    }
}
