//! Rectangle selection over the source image.
//!
//! The [`Selector`] owns the ordered selection set. Order is creation order,
//! which is also display order and asset index: the rectangle at position `i`
//! becomes `asset_{i+1}.png`.
//!
//! ## Coordinate space
//!
//! Every point handed to the selector is in **source-image pixel space**.
//! A front end that tracks a pointer over a scaled display surface must map
//! positions with
//! [`map_to_source`](crate::imaging::calculations::map_to_source) first.
//!
//! ## Drag lifecycle
//!
//! ```text
//! begin(anchor) ──► update(point) ──► … ──► finish(point) / commit(candidate)
//!                                      └──► cancel()
//! ```
//!
//! `update` is pure: it computes the candidate rectangle for the overlay but
//! never touches the selection set. Only `commit` appends, and only when the
//! candidate is larger than [`MIN_SELECTION_DIM`] on both axes. Smaller drags
//! (including plain clicks) are dropped without an error.
//!
//! ## Selection files
//!
//! A [`SelectionFile`] replays recorded selections without a pointer:
//!
//! ```json
//! {
//!   "display": [400, 400],
//!   "rectangles": [{ "x": 30, "y": 30, "width": 40, "height": 40 }],
//!   "drags": [{ "from": [120, 120], "to": [280, 280] }]
//! }
//! ```
//!
//! `rectangles` are source-pixel rectangles. `drags` are pointer positions:
//! on a display surface of size `display` when given, in source pixels
//! otherwise. Rectangles are applied before drags.

use crate::imaging::Dimensions;
use crate::imaging::calculations::{bounding_box, clamp_point, clamp_rect, map_to_source};
use crate::types::{MIN_SELECTION_DIM, Point, Rectangle};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct Selector {
    bounds: Dimensions,
    anchor: Option<Point>,
    rectangles: Vec<Rectangle>,
}

impl Selector {
    /// Empty selector over an image of the given size.
    pub fn new(bounds: Dimensions) -> Self {
        Self {
            bounds,
            anchor: None,
            rectangles: Vec::new(),
        }
    }

    pub fn bounds(&self) -> Dimensions {
        self.bounds
    }

    /// Committed rectangles in asset order.
    pub fn rectangles(&self) -> &[Rectangle] {
        &self.rectangles
    }

    pub fn len(&self) -> usize {
        self.rectangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rectangles.is_empty()
    }

    /// Whether a drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.anchor.is_some()
    }

    /// Start a drag at `point`.
    pub fn begin(&mut self, point: Point) {
        self.anchor = Some(clamp_point(point, self.bounds));
    }

    /// Candidate rectangle for the current pointer position, or `None` when no
    /// drag is in progress.
    pub fn update(&self, point: Point) -> Option<Rectangle> {
        let anchor = self.anchor?;
        Some(bounding_box(anchor, clamp_point(point, self.bounds)))
    }

    /// Append `candidate` if it clears the minimum size; ends any drag.
    ///
    /// The candidate is first clamped to the image. Returns the index the
    /// rectangle was stored at, or `None` if it was too small.
    pub fn commit(&mut self, candidate: Rectangle) -> Option<usize> {
        self.anchor = None;
        let rect = clamp_rect(candidate, self.bounds);
        if !rect.meets_minimum() {
            debug!(
                %rect,
                min = MIN_SELECTION_DIM,
                "selection below minimum size dropped"
            );
            return None;
        }
        self.rectangles.push(rect);
        Some(self.rectangles.len() - 1)
    }

    /// End the drag at `point` and commit the resulting rectangle.
    pub fn finish(&mut self, point: Point) -> Option<usize> {
        let candidate = self.update(point)?;
        self.commit(candidate)
    }

    /// Abandon the drag without committing anything.
    pub fn cancel(&mut self) {
        self.anchor = None;
    }

    /// Remove the rectangle at `index`. Later rectangles shift down by one.
    ///
    /// Out-of-range indices are ignored.
    pub fn remove(&mut self, index: usize) -> Option<Rectangle> {
        (index < self.rectangles.len()).then(|| self.rectangles.remove(index))
    }

    /// Drop every committed rectangle.
    pub fn clear(&mut self) {
        self.rectangles.clear();
        self.anchor = None;
    }
}

#[derive(Error, Debug)]
pub enum SelectionFileError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid selection file: {0}")]
    Parse(String),
}

/// One recorded pointer drag.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Drag {
    pub from: [f64; 2],
    pub to: [f64; 2],
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SelectionFile {
    /// Rendered size of the display surface the drags were recorded on.
    pub display: Option<[f64; 2]>,
    pub rectangles: Vec<Rectangle>,
    pub drags: Vec<Drag>,
}

impl SelectionFile {
    pub fn load(path: &Path) -> Result<Self, SelectionFileError> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SelectionFileError> {
        let file: SelectionFile = serde_json::from_str(json)?;
        if let Some([w, h]) = file.display {
            if !(w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0) {
                return Err(SelectionFileError::Parse(format!(
                    "display size must be positive, got [{w}, {h}]"
                )));
            }
        }
        Ok(file)
    }

    /// Commit everything in the file to `selector`, returning the candidates
    /// that were dropped for being too small.
    pub fn apply(&self, selector: &mut Selector) -> Vec<Rectangle> {
        let mut dropped = commit_all(selector, &self.rectangles);
        for drag in &self.drags {
            let from = self.to_source(drag.from, selector.bounds());
            let to = self.to_source(drag.to, selector.bounds());
            selector.begin(from);
            let Some(candidate) = selector.update(to) else {
                continue;
            };
            if selector.commit(candidate).is_none() {
                dropped.push(candidate);
            }
        }
        dropped
    }

    fn to_source(&self, [x, y]: [f64; 2], bounds: Dimensions) -> Point {
        match self.display {
            Some([w, h]) => map_to_source((x, y), (w, h), bounds),
            None => map_to_source(
                (x, y),
                (bounds.width as f64, bounds.height as f64),
                bounds,
            ),
        }
    }
}

/// Commit each of `rects` in order, returning the ones that were dropped.
pub fn commit_all(selector: &mut Selector, rects: &[Rectangle]) -> Vec<Rectangle> {
    rects
        .iter()
        .filter(|rect| selector.commit(**rect).is_none())
        .copied()
        .collect()
}
