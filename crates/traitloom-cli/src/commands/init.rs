//! Init command

use std::path::Path;
use traitloom_core::{CollectionConfig, ConfigError};

pub fn run(path: &Path, force: bool) -> Result<(), ConfigError> {
    if path.exists() && !force {
        return Err(ConfigError::Invalid(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }

    CollectionConfig::default().save(path)?;
    println!("Default collection config written to {}", path.display());
    Ok(())
}
