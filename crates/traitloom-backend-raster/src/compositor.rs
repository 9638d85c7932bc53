//! Layer composition
//!
//! Stacks decoded trait layers into one canvas-sized image.

use crate::error::RenderError;
use image::imageops::{self, FilterType};
use image::RgbaImage;
use std::path::Path;
use traitloom_core::{CanvasSize, LayerOffset};

/// A decoded layer ready for compositing
#[derive(Debug, Clone)]
pub struct RenderLayer {
    /// Layer name
    pub name: String,
    /// Pixels, already at canvas size
    pub image: RgbaImage,
    /// Placement on the canvas
    pub offset: LayerOffset,
}

impl RenderLayer {
    pub fn new(name: impl Into<String>, image: RgbaImage) -> Self {
        Self {
            name: name.into(),
            image,
            offset: LayerOffset::default(),
        }
    }

    /// Set offset
    pub fn with_offset(mut self, offset: LayerOffset) -> Self {
        self.offset = offset;
        self
    }

    /// Decode an image file and stretch it to the canvas
    pub fn load(
        name: impl Into<String>,
        path: &Path,
        canvas: CanvasSize,
    ) -> Result<Self, RenderError> {
        let image = image::open(path)?.to_rgba8();
        Ok(Self::new(name, fit_to_canvas(image, canvas)))
    }
}

/// Resize to the canvas, ignoring aspect ratio
pub fn fit_to_canvas(image: RgbaImage, canvas: CanvasSize) -> RgbaImage {
    if image.dimensions() == (canvas.width, canvas.height) {
        return image;
    }
    imageops::resize(&image, canvas.width, canvas.height, FilterType::Triangle)
}

/// Layer compositor
pub struct LayerCompositor {
    layers: Vec<RenderLayer>,
    canvas: CanvasSize,
}

impl LayerCompositor {
    /// Create a new compositor
    pub fn new(canvas: CanvasSize) -> Self {
        Self {
            layers: Vec::new(),
            canvas,
        }
    }

    /// Add a layer on top of the current stack
    pub fn add_layer(&mut self, layer: RenderLayer) {
        self.layers.push(layer);
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Composite all layers in insertion order
    ///
    /// The first layer is copied as-is; the rest are alpha-blended over it.
    pub fn composite(&self) -> Result<RgbaImage, RenderError> {
        let (first, rest) = self.layers.split_first().ok_or(RenderError::NoLayers)?;

        let mut output = RgbaImage::new(self.canvas.width, self.canvas.height);
        imageops::replace(&mut output, &first.image, first.offset.left, first.offset.top);

        for layer in rest {
            imageops::overlay(&mut output, &layer.image, layer.offset.left, layer.offset.top);
        }

        Ok(output)
    }
}
