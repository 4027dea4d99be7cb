//! Parameter types for pixel operations.
//!
//! These describe *what* to do; [`operations`](super::operations) does it.
//!
//! - [`ScaleFactor`]: the upscale multiplier. Only 1×, 2× and 4× exist, so an
//!   unsupported factor cannot be constructed.
//! - [`ChromaKey`]: the reference background color and the Manhattan RGB
//!   distance under which a pixel counts as background.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Pixels closer than this (sum of absolute RGB deltas) to the reference color
/// are made transparent.
pub const BACKGROUND_THRESHOLD: u32 = 50;

/// Integer upscale factor applied to every asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum ScaleFactor {
    X1,
    #[default]
    X2,
    X4,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported scale factor {0} (expected 1, 2 or 4)")]
pub struct UnsupportedScale(pub String);

impl ScaleFactor {
    pub fn value(self) -> u32 {
        match self {
            ScaleFactor::X1 => 1,
            ScaleFactor::X2 => 2,
            ScaleFactor::X4 => 4,
        }
    }
}

impl TryFrom<u32> for ScaleFactor {
    type Error = UnsupportedScale;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(ScaleFactor::X1),
            2 => Ok(ScaleFactor::X2),
            4 => Ok(ScaleFactor::X4),
            other => Err(UnsupportedScale(other.to_string())),
        }
    }
}

impl From<ScaleFactor> for u32 {
    fn from(scale: ScaleFactor) -> Self {
        scale.value()
    }
}

/// Accepts `2` as well as `2x`.
impl FromStr for ScaleFactor {
    type Err = UnsupportedScale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_suffix('x')
            .or_else(|| trimmed.strip_suffix('X'))
            .unwrap_or(trimmed);
        digits
            .parse::<u32>()
            .map_err(|_| UnsupportedScale(s.to_string()))
            .and_then(ScaleFactor::try_from)
    }
}

impl fmt::Display for ScaleFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x", self.value())
    }
}

/// Background color key sampled from a crop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChromaKey {
    pub reference: [u8; 3],
    pub threshold: u32,
}

impl ChromaKey {
    pub fn new(reference: [u8; 3]) -> Self {
        Self {
            reference,
            threshold: BACKGROUND_THRESHOLD,
        }
    }

    /// Manhattan distance in RGB space; alpha does not participate.
    pub fn distance(&self, rgb: [u8; 3]) -> u32 {
        rgb.iter()
            .zip(self.reference.iter())
            .map(|(&c, &r)| c.abs_diff(r) as u32)
            .sum()
    }

    pub fn is_background(&self, rgb: [u8; 3]) -> bool {
        self.distance(rgb) < self.threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_factor_accepts_supported_values() {
        assert_eq!(ScaleFactor::try_from(1), Ok(ScaleFactor::X1));
        assert_eq!(ScaleFactor::try_from(2), Ok(ScaleFactor::X2));
        assert_eq!(ScaleFactor::try_from(4), Ok(ScaleFactor::X4));
        assert!(ScaleFactor::try_from(3).is_err());
        assert!(ScaleFactor::try_from(0).is_err());
    }

    #[test]
    fn scale_factor_default_is_2x() {
        assert_eq!(ScaleFactor::default().value(), 2);
    }

    #[test]
    fn scale_factor_parses_suffix() {
        assert_eq!("4x".parse::<ScaleFactor>(), Ok(ScaleFactor::X4));
        assert_eq!("1".parse::<ScaleFactor>(), Ok(ScaleFactor::X1));
        assert!("8x".parse::<ScaleFactor>().is_err());
        assert!("two".parse::<ScaleFactor>().is_err());
    }

    #[test]
    fn scale_factor_serializes_as_number() {
        let json = serde_json::to_string(&ScaleFactor::X4).unwrap();
        assert_eq!(json, "4");
        let back: ScaleFactor = serde_json::from_str("1").unwrap();
        assert_eq!(back, ScaleFactor::X1);
        assert!(serde_json::from_str::<ScaleFactor>("3").is_err());
    }

    #[test]
    fn chroma_key_distance_ignores_alpha_and_sums_channels() {
        let key = ChromaKey::new([255, 0, 0]);
        assert_eq!(key.distance([255, 10, 5]), 15);
        assert_eq!(key.distance([0, 255, 0]), 510);
    }

    #[test]
    fn chroma_key_threshold_is_exclusive() {
        let key = ChromaKey::new([100, 100, 100]);
        assert!(key.is_background([149, 100, 100]));
        assert!(!key.is_background([150, 100, 100]));
    }
}
