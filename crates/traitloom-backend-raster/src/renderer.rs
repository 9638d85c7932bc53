//! Composition renderer
//!
//! Resolves every present layer of a composition to a file, decodes the files
//! in parallel and hands the stack to the [`LayerCompositor`].

use crate::compositor::{LayerCompositor, RenderLayer};
use crate::error::RenderError;
use crate::paths::AssetResolver;
use image::RgbaImage;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;
use traitloom_core::{CollectionConfig, SelectedComposition};

/// Turns compositions into images
pub struct CompositionRenderer {
    config: Arc<CollectionConfig>,
    resolver: AssetResolver,
}

impl CompositionRenderer {
    /// Create a new renderer
    pub fn new(config: Arc<CollectionConfig>, resolver: AssetResolver) -> Self {
        Self { config, resolver }
    }

    /// Get configuration
    pub fn config(&self) -> &CollectionConfig {
        &self.config
    }

    pub fn resolver(&self) -> &AssetResolver {
        &self.resolver
    }

    /// Render one composition to an in-memory image
    pub fn render(&self, composition: &SelectedComposition) -> Result<RgbaImage, RenderError> {
        let tier = self.config.tier(composition.tier);
        let canvas = self.config.canvas;

        let sources = composition
            .present()
            .map(|(layer, asset)| {
                let path = self.resolver.resolve(&composition.character, asset)?;
                Ok::<_, RenderError>((layer, path))
            })
            .collect::<Result<Vec<(&str, PathBuf)>, _>>()?;

        if sources.is_empty() {
            return Err(RenderError::NoLayers);
        }

        let layers = sources
            .par_iter()
            .map(|(layer, path)| {
                RenderLayer::load(*layer, path, canvas).map(|l| l.with_offset(tier.offset(layer)))
            })
            .collect::<Result<Vec<_>, RenderError>>()?;

        let mut compositor = LayerCompositor::new(canvas);
        for layer in layers {
            compositor.add_layer(layer);
        }

        debug!(
            "Composited {} layers for {}",
            compositor.len(),
            composition.fingerprint()
        );

        compositor.composite()
    }

    /// Render and write a PNG
    pub fn render_to_file(
        &self,
        composition: &SelectedComposition,
        path: &Path,
    ) -> Result<(), RenderError> {
        let image = self.render(composition)?;
        write_png(&image, path)
    }
}

/// Write an image as PNG, creating parent directories
pub fn write_png(image: &RgbaImage, path: &Path) -> Result<(), RenderError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    image.save_with_format(path, image::ImageFormat::Png)?;
    Ok(())
}
