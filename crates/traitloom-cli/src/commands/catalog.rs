//! Catalog command

use crate::commands::{load_catalog, load_config};
use std::path::Path;

pub fn run(
    config_path: Option<&Path>,
    assets: &Path,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;
    let catalog = load_catalog(assets, &config);
    let stats = catalog.stats();

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("Asset store: {}", assets.display());
    println!();

    if stats.is_empty() {
        println!("No trait assets found.");
        println!("Expected layout: <tier>/<character|shared>/<layer>/<identifier>.png");
        return Ok(());
    }

    println!("{:<10} {:<12} {:<16} {:>6}", "TIER", "SCOPE", "LAYER", "ASSETS");
    for entry in &stats {
        println!(
            "{:<10} {:<12} {:<16} {:>6}",
            entry.tier.as_str(),
            entry.scope,
            entry.folder,
            entry.assets
        );
    }

    println!();
    println!("Total: {} assets", catalog.asset_count());
    Ok(())
}
