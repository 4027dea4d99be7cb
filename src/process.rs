//! Batch processing: selections in, encoded assets out.
//!
//! For each selected rectangle, in order:
//!
//! ```text
//! crop ──► remove_background ──► upscale(scale) ──► encode PNG ──► Artifact
//! ```
//!
//! ## Run state
//!
//! A [`BatchProcessor`] is either idle or running. A run only starts when the
//! job has at least one rectangle, and a request that arrives while another
//! run holds the guard is turned away as [`SkipReason::AlreadyRunning`]. Both
//! are silent no-ops rather than errors.
//!
//! ## Per-asset recovery
//!
//! One bad asset never aborts the batch. When the processed buffer fails to
//! encode, the artifact falls back to the encoded, unprocessed crop
//! ([`ArtifactStatus::Fallback`]). When that fails too, or the rectangle does
//! not overlap the image at all, the artifact is kept with empty bytes and
//! [`ArtifactStatus::Failed`]. A run therefore always yields exactly one
//! artifact per rectangle, in selection order.
//!
//! ## Progress events
//!
//! [`BatchProcessor::run`] optionally streams a [`ProcessEvent`] per asset
//! over an `mpsc` channel so a front end can report progress while the batch
//! is still going. The artifact list itself is only returned once complete.

use crate::imaging::{
    Dimensions, ImageBackend, PixelBuffer, ScaleFactor, remove_background, upscale,
};
use crate::naming::{asset_name, parse_asset_name};
use crate::types::Rectangle;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use tracing::{debug, info, warn};

/// How an artifact came to be.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ArtifactStatus {
    /// Background removed, upscaled and encoded.
    Processed,
    /// Holds the unprocessed crop because the processed buffer failed to encode.
    Fallback { reason: String },
    /// Nothing could be encoded; `encoded_image` is empty.
    Failed { reason: String },
}

impl ArtifactStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ArtifactStatus::Processed => "processed",
            ArtifactStatus::Fallback { .. } => "fallback",
            ArtifactStatus::Failed { .. } => "failed",
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            ArtifactStatus::Processed => None,
            ArtifactStatus::Fallback { reason } | ArtifactStatus::Failed { reason } => {
                Some(reason)
            }
        }
    }
}

/// The finished, encoded output of one selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    /// 0-based position in the selection list at run time.
    pub index: usize,
    /// `asset_{index+1}.png`
    pub name: String,
    /// PNG bytes. Not serialized into manifests.
    #[serde(skip)]
    pub encoded_image: Vec<u8>,
    pub source_rectangle: Rectangle,
    /// Size of the encoded image.
    pub dimensions: Dimensions,
    pub status: ArtifactStatus,
}

impl Artifact {
    pub fn is_failed(&self) -> bool {
        matches!(self.status, ArtifactStatus::Failed { .. })
    }
}

/// Look up an artifact by file name (`asset_2.png`) or 1-based number (`2`).
pub fn find_artifact<'a>(artifacts: &'a [Artifact], name: &str) -> Option<&'a Artifact> {
    artifacts.get(parse_asset_name(name)?)
}

/// Snapshot of everything a run needs, taken when the run is requested.
#[derive(Debug, Clone)]
pub struct BatchJob<'a> {
    pub source: &'a PixelBuffer,
    pub rectangles: Vec<Rectangle>,
    pub scale: ScaleFactor,
}

/// Why a run request did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No source image has been loaded.
    NoImage,
    /// The selection set is empty.
    NoSelection,
    /// Another run is in flight.
    AlreadyRunning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    Completed(Vec<Artifact>),
    Skipped(SkipReason),
}

/// Progress events emitted while a batch runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessEvent {
    RunStarted {
        assets: usize,
        scale: ScaleFactor,
    },
    AssetProcessed {
        index: usize,
        name: String,
        rectangle: Rectangle,
        dimensions: Dimensions,
        status: ArtifactStatus,
    },
}

/// Marks the processor as running until dropped.
#[derive(Debug)]
pub struct RunGuard<'a> {
    running: &'a AtomicBool,
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Release);
    }
}

/// Turns a [`BatchJob`] into artifacts using a codec backend.
pub struct BatchProcessor<B> {
    backend: B,
    running: AtomicBool,
}

impl<B: ImageBackend> BatchProcessor<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            running: AtomicBool::new(false),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Claim the idle → running transition. `None` while another run holds it.
    pub fn try_begin(&self) -> Option<RunGuard<'_>> {
        self.running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| RunGuard {
                running: &self.running,
            })
    }

    /// Process every rectangle of `job`, in order.
    pub fn run(&self, job: BatchJob<'_>, events: Option<Sender<ProcessEvent>>) -> BatchOutcome {
        if job.rectangles.is_empty() {
            debug!("run requested with no selections");
            return BatchOutcome::Skipped(SkipReason::NoSelection);
        }
        let Some(_guard) = self.try_begin() else {
            warn!("run requested while another run is in progress; ignored");
            return BatchOutcome::Skipped(SkipReason::AlreadyRunning);
        };

        info!(
            assets = job.rectangles.len(),
            scale = %job.scale,
            "processing assets"
        );
        send(
            &events,
            ProcessEvent::RunStarted {
                assets: job.rectangles.len(),
                scale: job.scale,
            },
        );

        let mut artifacts = Vec::with_capacity(job.rectangles.len());
        for (index, rect) in job.rectangles.iter().enumerate() {
            let artifact = self.process_one(job.source, index, *rect, job.scale);
            send(
                &events,
                ProcessEvent::AssetProcessed {
                    index,
                    name: artifact.name.clone(),
                    rectangle: artifact.source_rectangle,
                    dimensions: artifact.dimensions,
                    status: artifact.status.clone(),
                },
            );
            artifacts.push(artifact);
        }

        BatchOutcome::Completed(artifacts)
    }

    fn process_one(
        &self,
        source: &PixelBuffer,
        index: usize,
        rect: Rectangle,
        scale: ScaleFactor,
    ) -> Artifact {
        let name = asset_name(index);
        let failed = |reason: String| Artifact {
            index,
            name: name.clone(),
            encoded_image: Vec::new(),
            source_rectangle: rect,
            dimensions: Dimensions::default(),
            status: ArtifactStatus::Failed { reason },
        };

        let crop = source.crop(rect);
        if crop.is_empty() {
            warn!(asset = %name, %rect, "selection does not overlap the source image");
            return failed(format!("selection {rect} does not overlap the source image"));
        }
        debug!(asset = %name, %rect, "cropped");

        let processed = upscale(remove_background(crop.clone()), scale);
        match self.backend.encode_png(&processed) {
            Ok(bytes) => Artifact {
                index,
                name: name.clone(),
                encoded_image: bytes,
                source_rectangle: rect,
                dimensions: processed.dimensions(),
                status: ArtifactStatus::Processed,
            },
            Err(err) => {
                warn!(asset = %name, error = %err, "encode failed; falling back to the unprocessed crop");
                match self.backend.encode_png(&crop) {
                    Ok(bytes) => Artifact {
                        index,
                        name: name.clone(),
                        encoded_image: bytes,
                        source_rectangle: rect,
                        dimensions: crop.dimensions(),
                        status: ArtifactStatus::Fallback {
                            reason: err.to_string(),
                        },
                    },
                    Err(fallback_err) => {
                        warn!(asset = %name, error = %fallback_err, "fallback encode failed");
                        failed(format!("{err}; fallback: {fallback_err}"))
                    }
                }
            }
        }
    }
}

fn send(events: &Option<Sender<ProcessEvent>>, event: ProcessEvent) {
    if let Some(tx) = events {
        // A dropped receiver only means nobody is listening.
        let _ = tx.send(event);
    }
}
