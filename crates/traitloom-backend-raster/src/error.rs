//! Render error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors from compositing or writing one image
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Missing asset {identifier} for layer {layer} (looked under {searched})")]
    MissingAsset {
        layer: String,
        identifier: String,
        searched: PathBuf,
    },

    #[error("Composition has no layers to render")]
    NoLayers,

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
