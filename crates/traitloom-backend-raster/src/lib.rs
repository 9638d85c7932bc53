//! Traitloom Raster Backend
//!
//! Stacks layer PNGs from the asset store into finished images. Decoding runs
//! on rayon, whole images run as tokio blocking tasks in fixed-size batches.

pub mod batch;
pub mod compositor;
pub mod error;
pub mod paths;
pub mod renderer;

pub use batch::{BatchRenderer, RenderFailure, RenderJob, RenderReport};
pub use compositor::{LayerCompositor, RenderLayer, fit_to_canvas};
pub use error::RenderError;
pub use paths::AssetResolver;
pub use renderer::{CompositionRenderer, write_png};
