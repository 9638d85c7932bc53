//! Generate command

use crate::commands::{load_catalog, load_config};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use traitloom_backend_raster::{AssetResolver, BatchRenderer, CompositionRenderer, RenderJob};
use traitloom_core::GenerationJob;
use traitloom_engine::{BatchPlanner, GenerationPlan, TokenMetadata, metadata_file_name};

/// File holding every item's metadata as one array
const COMBINED_METADATA: &str = "_metadata.json";

pub struct GenerateOptions {
    pub seed: u32,
    pub count: u32,
    pub inherit: u32,
    pub start_id: u64,
    pub characters: Vec<String>,
    pub batch_size: Option<usize>,
    pub render: bool,
}

pub async fn run(
    config_path: Option<&Path>,
    assets: &Path,
    out: &Path,
    options: GenerateOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = Arc::new(load_config(config_path)?);
    let catalog = Arc::new(load_catalog(assets, &config));

    if catalog.is_empty() {
        warn!("No trait assets found under {}", assets.display());
    }

    let job = GenerationJob::new(options.seed, options.count)
        .with_inheritance(options.inherit)
        .with_starting_id(options.start_id)
        .with_characters(options.characters);

    let plan = BatchPlanner::new(&catalog, &config).plan(&job)?;

    let metadata: Vec<TokenMetadata> = plan
        .items
        .iter()
        .map(|item| TokenMetadata::from_item(&config, item))
        .collect();
    write_metadata(&out.join("metadata"), &metadata)?;
    info!("Wrote metadata for {} items", metadata.len());

    let mut failed = 0;
    if options.render {
        let resolver = AssetResolver::for_collection(assets, &config);
        let renderer = Arc::new(CompositionRenderer::new(Arc::clone(&config), resolver));
        let batch_size = options.batch_size.unwrap_or(config.render_batch_size);
        let batch = BatchRenderer::new(renderer, out.join("images"), batch_size);

        let jobs = plan
            .items
            .iter()
            .map(|item| RenderJob::new(item.id, item.composition.clone()))
            .collect();
        let report = batch.render_all(jobs).await;
        failed = report.failures.len();
    }

    print_summary(&plan, failed, out);
    Ok(())
}

/// Write `<id>.json` per item plus the combined array
fn write_metadata(
    dir: &Path,
    metadata: &[TokenMetadata],
) -> Result<(), Box<dyn std::error::Error>> {
    fs::create_dir_all(dir)?;

    for meta in metadata {
        fs::write(dir.join(metadata_file_name(meta.edition)), meta.to_json()?)?;
    }

    let combined = serde_json::to_string_pretty(metadata)?;
    fs::write(dir.join(COMBINED_METADATA), combined)?;
    Ok(())
}

fn print_summary(plan: &GenerationPlan, failed: usize, out: &Path) {
    println!("Generated {} compositions", plan.len());
    println!("==============================");
    for group in &plan.outcomes {
        println!(
            "  {:<10} {:<10} {:<9} {:>5}/{:<5} attempts {:>6}  duplicates {:>6}  rejected {:>6}",
            group.character,
            group.tier.label(),
            if group.inherit { "inherit" } else { "" },
            group.accepted,
            group.requested,
            group.attempts,
            group.duplicates,
            group.rejected
        );
    }

    if plan.shortfall() > 0 {
        println!();
        println!(
            "Shortfall: {} compositions could not be made unique. \
             Add more trait art or lower the count.",
            plan.shortfall()
        );
    }

    if failed > 0 {
        println!();
        println!("{} items failed to render; see the log for details.", failed);
    }

    println!();
    println!("Output written to {}", out.display());
}
