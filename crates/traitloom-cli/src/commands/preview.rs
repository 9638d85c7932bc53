//! Preview command

use crate::commands::{load_catalog, load_config};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use traitloom_backend_raster::{AssetResolver, CompositionRenderer};
use traitloom_catalog::TraitCatalog;
use traitloom_core::{CollectionConfig, JobError, RarityTier, SelectedComposition};
use traitloom_engine::{SelectionRequest, Selector, first_valid};

pub struct PreviewOptions {
    pub character: String,
    pub tier: RarityTier,
    pub seed: u32,
    pub inherit: bool,
    pub output: Option<PathBuf>,
    pub json: bool,
}

pub fn run(
    config_path: Option<&Path>,
    assets: &Path,
    options: PreviewOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = Arc::new(load_config(config_path)?);
    if !config.has_character(&options.character) {
        return Err(JobError::UnknownCharacter(options.character).into());
    }

    let catalog = load_catalog(assets, &config);
    let composition = compose(&catalog, &config, &options)?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&composition)?);
    } else {
        print_composition(&composition);
    }

    if let Some(path) = options.output {
        let resolver = AssetResolver::for_collection(assets, &config);
        let renderer = CompositionRenderer::new(Arc::clone(&config), resolver);
        renderer.render_to_file(&composition, &path)?;
        info!("Preview written to {}", path.display());
    }

    Ok(())
}

/// Walk attempts from the seed until one passes the same checks a batch applies
fn compose(
    catalog: &TraitCatalog,
    config: &CollectionConfig,
    options: &PreviewOptions,
) -> Result<SelectedComposition, String> {
    let selector = Selector::new(catalog, config);
    let request = SelectionRequest::new(options.character.as_str(), options.tier)
        .with_inheritance(options.inherit);
    let budget = config.attempt_multiplier.max(1);

    first_valid(&selector, &request, options.seed, budget).ok_or_else(|| {
        format!(
            "No valid {} {} composition within {} attempts of seed {}",
            options.character, options.tier, budget, options.seed
        )
    })
}

fn print_composition(composition: &SelectedComposition) {
    let fingerprint = composition.fingerprint();

    println!("Character: {}", composition.character);
    println!("Tier:      {}", composition.tier.label());
    println!("DNA:       {}", fingerprint.dna());
    println!("==============================");
    for assignment in &composition.assignments {
        match &assignment.asset {
            Some(asset) => println!(
                "  {:<16} {} ({}, {})",
                assignment.layer, asset.display_name, asset.identifier, asset.tier
            ),
            None => println!("  {:<16} -", assignment.layer),
        }
    }
    println!();
    println!("Fingerprint: {}", fingerprint);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(character: &str, seed: u32, inherit: bool) -> PreviewOptions {
        PreviewOptions {
            character: character.to_string(),
            tier: RarityTier::Common,
            seed,
            inherit,
            output: None,
            json: false,
        }
    }

    /// Only backgrounds have legendary art, while eyes are also eligible
    fn partial_legendary() -> (TraitCatalog, CollectionConfig) {
        let mut catalog = TraitCatalog::new();
        catalog.insert_identifiers(RarityTier::Common, "bear", "background", &["sky", "sea"]);
        catalog.insert_identifiers(RarityTier::Common, "bear", "base", &["brown_fur"]);
        catalog.insert_identifiers(RarityTier::Common, "bear", "eyes", &["round", "sleepy"]);
        catalog.insert_identifiers(RarityTier::Legendary, "bear", "background", &["galaxy"]);

        let mut config = CollectionConfig::default();
        config.constraints.inheritance_eligible =
            vec!["background".to_string(), "eyes".to_string()];
        (catalog, config)
    }

    #[test]
    fn test_preview_inherit_always_inherits() {
        let (catalog, config) = partial_legendary();

        for seed in 0..500 {
            let comp = compose(&catalog, &config, &options("bear", seed, true)).unwrap();
            assert!(comp.inheritance);
            assert!(config.constraints.has_inherited_layer(&comp), "seed {seed}");
        }
    }

    #[test]
    fn test_preview_without_inherit_is_first_walk() {
        let (catalog, config) = partial_legendary();
        let selector = Selector::new(&catalog, &config);
        let request = SelectionRequest::new("bear", RarityTier::Common);

        let comp = compose(&catalog, &config, &options("bear", 8, false)).unwrap();
        assert_eq!(comp, selector.select(&request, &mut traitloom_core::Prng::new(8)));
    }

    #[test]
    fn test_preview_reports_unsatisfiable_inheritance() {
        let mut catalog = TraitCatalog::new();
        catalog.insert_identifiers(RarityTier::Common, "bear", "base", &["brown_fur"]);
        let config = CollectionConfig::default();

        let err = compose(&catalog, &config, &options("bear", 3, true)).unwrap_err();
        assert!(err.contains("No valid bear"));
    }
}
