//! Batched rendering on the blocking pool
//!
//! Items are rendered in fixed-size chunks. Every item in a chunk is its own
//! blocking task writing `<images>/<id>.png`; a failed item is reported and
//! the rest of the run continues.

use crate::renderer::CompositionRenderer;
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{error, info};
use traitloom_core::SelectedComposition;

/// One image to produce
#[derive(Debug, Clone)]
pub struct RenderJob {
    pub id: u64,
    pub composition: SelectedComposition,
}

impl RenderJob {
    pub fn new(id: u64, composition: SelectedComposition) -> Self {
        Self { id, composition }
    }
}

/// An item that could not be rendered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderFailure {
    pub id: u64,
    pub error: String,
}

/// Outcome of a batch run
#[derive(Debug, Clone, Default)]
pub struct RenderReport {
    /// Identifiers written, ascending
    pub rendered: Vec<u64>,
    /// Failed items, ascending by identifier
    pub failures: Vec<RenderFailure>,
}

impl RenderReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Renders many compositions with bounded parallelism
pub struct BatchRenderer {
    renderer: Arc<CompositionRenderer>,
    images_dir: PathBuf,
    batch_size: usize,
}

impl BatchRenderer {
    pub fn new(
        renderer: Arc<CompositionRenderer>,
        images_dir: impl Into<PathBuf>,
        batch_size: usize,
    ) -> Self {
        Self {
            renderer,
            images_dir: images_dir.into(),
            batch_size: batch_size.max(1),
        }
    }

    /// Output path for an item
    pub fn image_path(&self, id: u64) -> PathBuf {
        self.images_dir.join(format!("{id}.png"))
    }

    /// Render every job, one chunk at a time
    pub async fn render_all(&self, jobs: Vec<RenderJob>) -> RenderReport {
        let mut report = RenderReport::default();
        let total = jobs.len();

        for (index, chunk) in jobs.chunks(self.batch_size).enumerate() {
            self.render_chunk(chunk, &mut report).await;
            info!(
                "Batch {} done ({}/{} items)",
                index + 1,
                report.rendered.len() + report.failures.len(),
                total
            );
        }

        report.rendered.sort_unstable();
        report.failures.sort_by_key(|f| f.id);
        report
    }

    async fn render_chunk(&self, chunk: &[RenderJob], report: &mut RenderReport) {
        let mut pending: BTreeSet<u64> = chunk.iter().map(|j| j.id).collect();
        let mut set = JoinSet::new();

        for job in chunk {
            let renderer = Arc::clone(&self.renderer);
            let path = self.image_path(job.id);
            let job = job.clone();

            set.spawn_blocking(move || {
                let result = renderer.render_to_file(&job.composition, &path);
                (job.id, result)
            });
        }

        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((id, Ok(()))) => {
                    pending.remove(&id);
                    report.rendered.push(id);
                }
                Ok((id, Err(e))) => {
                    pending.remove(&id);
                    error!("Failed to render item {}: {}", id, e);
                    report.failures.push(RenderFailure {
                        id,
                        error: e.to_string(),
                    });
                }
                Err(e) => {
                    error!("Render task aborted: {}", e);
                }
            }
        }

        // Tasks that panicked never reported their id
        for id in pending {
            report.failures.push(RenderFailure {
                id,
                error: "render task panicked".to_string(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::AssetResolver;
    use crate::renderer::tests::{composition, save, small_config};
    use image::{Rgba, RgbaImage};
    use tempfile::TempDir;

    fn batch(root: &std::path::Path, out: &std::path::Path, size: usize) -> BatchRenderer {
        let config = small_config();
        let resolver = AssetResolver::for_collection(root, &config);
        let renderer = CompositionRenderer::new(Arc::new(config), resolver);
        BatchRenderer::new(Arc::new(renderer), out, size)
    }

    #[tokio::test]
    async fn test_render_all() {
        let dir = TempDir::new().unwrap();
        let sky = RgbaImage::from_pixel(8, 8, Rgba([1, 2, 3, 255]));
        let sea = RgbaImage::from_pixel(8, 8, Rgba([4, 5, 6, 255]));
        save(dir.path(), "common/shared/background/sky.png", &sky);
        save(dir.path(), "common/shared/background/sea.png", &sea);

        let out = dir.path().join("images");
        let renderer = batch(dir.path(), &out, 2);

        let jobs = vec![
            RenderJob::new(3, composition(&[("background", "sky")])),
            RenderJob::new(1, composition(&[("background", "sea")])),
            RenderJob::new(2, composition(&[("background", "sky")])),
        ];
        let report = renderer.render_all(jobs).await;

        assert!(report.is_complete());
        assert_eq!(report.rendered, vec![1, 2, 3]);
        for id in 1..=3 {
            assert!(renderer.image_path(id).is_file());
        }
    }

    #[tokio::test]
    async fn test_failures_do_not_abort() {
        let dir = TempDir::new().unwrap();
        save(dir.path(), "common/shared/background/sky.png", &RgbaImage::new(8, 8));

        let out = dir.path().join("images");
        let renderer = batch(dir.path(), &out, 16);

        let jobs = vec![
            RenderJob::new(10, composition(&[("background", "sky")])),
            RenderJob::new(11, composition(&[("background", "missing")])),
            RenderJob::new(12, composition(&[("background", "sky")])),
        ];
        let report = renderer.render_all(jobs).await;

        assert_eq!(report.rendered, vec![10, 12]);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].id, 11);
        assert!(report.failures[0].error.contains("missing"));
        assert!(!renderer.image_path(11).exists());
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let dir = TempDir::new().unwrap();
        let renderer = batch(dir.path(), dir.path(), 0);

        let report = renderer.render_all(Vec::new()).await;
        assert!(report.rendered.is_empty());
        assert!(report.is_complete());
    }
}
