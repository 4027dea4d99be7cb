//! The editing session: one source image, its selections, the upscale
//! setting, and the artifacts of the last run.
//!
//! All state lives in this explicit context object rather than in globals.
//! The lifecycle rules are:
//!
//! - Loading an image replaces the source wholesale and resets both the
//!   selections and the artifacts. A load that fails to decode leaves the
//!   session exactly as it was.
//! - Changing the scale affects the next run only; existing artifacts keep
//!   the scale they were produced with ([`Session::artifact_scale`]).
//! - A run snapshots the selections and scale, and the finished artifact list
//!   replaces the previous one in a single assignment. Removing a selection
//!   afterwards does not touch the artifacts, which are then stale until the
//!   next run.
//! - Clearing all selections discards the artifacts as well.

use crate::archive::{ArchiveError, build_archive};
use crate::imaging::{BackendError, Dimensions, ImageBackend, PixelBuffer, ScaleFactor};
use crate::process::{
    Artifact, BatchJob, BatchOutcome, BatchProcessor, ProcessEvent, SkipReason,
};
use crate::selection::Selector;
use crate::types::Rectangle;
use std::sync::mpsc::Sender;
use tracing::info;

/// Result of [`Session::process`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Completed { assets: usize },
    Skipped(SkipReason),
}

struct LoadedImage {
    pixels: PixelBuffer,
    selector: Selector,
}

pub struct Session<B> {
    processor: BatchProcessor<B>,
    loaded: Option<LoadedImage>,
    scale: ScaleFactor,
    artifacts: Vec<Artifact>,
    artifact_scale: Option<ScaleFactor>,
}

impl<B: ImageBackend> Session<B> {
    pub fn new(backend: B, scale: ScaleFactor) -> Self {
        Self {
            processor: BatchProcessor::new(backend),
            loaded: None,
            scale,
            artifacts: Vec::new(),
            artifact_scale: None,
        }
    }

    pub fn backend(&self) -> &B {
        self.processor.backend()
    }

    /// Decode `bytes` and make the result the session's source image.
    pub fn load_image(&mut self, bytes: &[u8]) -> Result<Dimensions, BackendError> {
        let pixels = self.processor.backend().decode(bytes)?;
        Ok(self.set_source(pixels))
    }

    /// Install an already-decoded source image, resetting selections and
    /// artifacts.
    pub fn set_source(&mut self, pixels: PixelBuffer) -> Dimensions {
        let dims = pixels.dimensions();
        info!(%dims, "source image loaded");
        self.loaded = Some(LoadedImage {
            selector: Selector::new(dims),
            pixels,
        });
        self.artifacts = Vec::new();
        self.artifact_scale = None;
        dims
    }

    pub fn source(&self) -> Option<&PixelBuffer> {
        self.loaded.as_ref().map(|l| &l.pixels)
    }

    pub fn selector(&self) -> Option<&Selector> {
        self.loaded.as_ref().map(|l| &l.selector)
    }

    /// Mutable access to the selector. `None` until an image is loaded.
    pub fn selector_mut(&mut self) -> Option<&mut Selector> {
        self.loaded.as_mut().map(|l| &mut l.selector)
    }

    pub fn selections(&self) -> &[Rectangle] {
        self.selector().map(Selector::rectangles).unwrap_or_default()
    }

    pub fn remove_selection(&mut self, index: usize) -> Option<Rectangle> {
        self.selector_mut()?.remove(index)
    }

    /// Drop every selection and the artifacts built from them.
    pub fn clear_selections(&mut self) {
        if let Some(selector) = self.selector_mut() {
            selector.clear();
        }
        self.artifacts = Vec::new();
        self.artifact_scale = None;
    }

    pub fn scale(&self) -> ScaleFactor {
        self.scale
    }

    pub fn set_scale(&mut self, scale: ScaleFactor) {
        self.scale = scale;
    }

    /// Run the batch over the current selections.
    pub fn process(&mut self, events: Option<Sender<ProcessEvent>>) -> RunOutcome {
        let Some(loaded) = self.loaded.as_ref() else {
            return RunOutcome::Skipped(SkipReason::NoImage);
        };
        let job = BatchJob {
            source: &loaded.pixels,
            rectangles: loaded.selector.rectangles().to_vec(),
            scale: self.scale,
        };
        match self.processor.run(job, events) {
            BatchOutcome::Completed(artifacts) => {
                let assets = artifacts.len();
                self.artifacts = artifacts;
                self.artifact_scale = Some(self.scale);
                RunOutcome::Completed { assets }
            }
            BatchOutcome::Skipped(reason) => RunOutcome::Skipped(reason),
        }
    }

    pub fn artifacts(&self) -> &[Artifact] {
        &self.artifacts
    }

    /// Scale the current artifacts were produced with.
    pub fn artifact_scale(&self) -> Option<ScaleFactor> {
        self.artifact_scale
    }

    /// Bundle the current artifacts. `None` when there is nothing to export.
    pub fn archive(&self) -> Result<Option<Vec<u8>>, ArchiveError> {
        build_archive(&self.artifacts)
    }
}
