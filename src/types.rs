//! Shared geometry types used across the selection, processing and export stages.
//!
//! Every coordinate here is in **source-image pixel space**: `(0, 0)` is the
//! top-left pixel of the loaded image and one unit is one source pixel. Display
//! or CSS coordinates must be mapped with
//! [`calculations::map_to_source`](crate::imaging::calculations::map_to_source)
//! before they reach the selector.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Rectangles must be strictly larger than this on both axes to be kept.
pub const MIN_SELECTION_DIM: u32 = 10;

/// A pointer position in source-image pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

impl Point {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned region of the source image marking one asset's extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rectangle {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rectangle {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge.
    pub fn right(&self) -> u32 {
        self.x.saturating_add(self.width)
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> u32 {
        self.y.saturating_add(self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Whether this rectangle is large enough to become a selection.
    pub fn meets_minimum(&self) -> bool {
        self.width > MIN_SELECTION_DIM && self.height > MIN_SELECTION_DIM
    }
}

impl fmt::Display for Rectangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{} @ ({},{})", self.width, self.height, self.x, self.y)
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseRectError {
    #[error("expected x,y,width,height but got {0:?}")]
    Shape(String),
    #[error("invalid number {0:?} in rectangle")]
    Number(String),
}

/// Parses the `x,y,width,height` form used by `--rect`.
impl FromStr for Rectangle {
    type Err = ParseRectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(ParseRectError::Shape(s.to_string()));
        }
        let mut values = [0u32; 4];
        for (slot, part) in values.iter_mut().zip(&parts) {
            *slot = part
                .parse()
                .map_err(|_| ParseRectError::Number(part.to_string()))?;
        }
        let [x, y, width, height] = values;
        Ok(Self::new(x, y, width, height))
    }
}
