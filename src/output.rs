//! CLI output formatting for every command.
//!
//! # Asset-First Display
//!
//! Output is organized around assets, not files. Each asset is shown by its
//! positional index and name, with the source rectangle and output size as
//! indented context lines. File paths only appear in the export summary.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! sheet.png (100x100)
//! Selections
//! 001 asset_1.png
//!     Source: 40x40 @ (30,30)
//!     Output: 80x80 at 2x
//! Dropped
//!     5x40 @ (0,0): needs more than 10px on both sides
//! ```
//!
//! ## Extract
//!
//! ```text
//! Processing 2 assets at 2x
//! 001 asset_1.png
//!     Source: 40x40 @ (30,30)
//!     Output: 80x80
//! 002 asset_2.png
//!     Source: 20x20 @ (0,0)
//!     Output: 20x20 (fallback: encode error: ...)
//!
//! Wrote asset_1.png
//! Wrote asset_2.png
//! Archive: game-assets.zip (2 assets)
//! Manifest: manifest.json
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::export::ExportReport;
use crate::imaging::calculations::scaled_dimensions;
use crate::imaging::{Dimensions, ScaleFactor};
use crate::naming::asset_name;
use crate::process::{ArtifactStatus, ProcessEvent, SkipReason};
use crate::types::{MIN_SELECTION_DIM, Rectangle};
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Zero-padded three-digit positional index (1-based).
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `001 asset_1.png` for the 0-based selection index.
fn asset_header(index: usize) -> String {
    format!("{} {}", format_index(index + 1), asset_name(index))
}

/// Path relative to `base` when possible, for shorter lines.
fn display_path(path: &Path, base: &Path) -> String {
    path.strip_prefix(base).unwrap_or(path).display().to_string()
}

// ============================================================================
// Check
// ============================================================================

pub fn format_check_output(
    image: &Path,
    source: Dimensions,
    selections: &[Rectangle],
    dropped: &[Rectangle],
    scale: ScaleFactor,
) -> Vec<String> {
    let mut lines = vec![format!("{} ({})", image.display(), source)];

    lines.push("Selections".to_string());
    if selections.is_empty() {
        lines.push(format!("{}(none)", indent(1)));
    }
    for (index, rect) in selections.iter().enumerate() {
        lines.push(asset_header(index));
        lines.push(format!("{}Source: {}", indent(1), rect));
        let output = scaled_dimensions(Dimensions::new(rect.width, rect.height), scale);
        lines.push(format!("{}Output: {} at {}", indent(1), output, scale));
    }

    if !dropped.is_empty() {
        lines.push("Dropped".to_string());
        for rect in dropped {
            lines.push(format!(
                "{}{}: needs more than {}px on both sides",
                indent(1),
                rect,
                MIN_SELECTION_DIM
            ));
        }
    }
    lines
}

pub fn print_check_output(
    image: &Path,
    source: Dimensions,
    selections: &[Rectangle],
    dropped: &[Rectangle],
    scale: ScaleFactor,
) {
    for line in format_check_output(image, source, selections, dropped, scale) {
        println!("{}", line);
    }
}

// ============================================================================
// Extract
// ============================================================================

/// Format a single batch progress event.
pub fn format_process_event(event: &ProcessEvent) -> Vec<String> {
    match event {
        ProcessEvent::RunStarted { assets, scale } => {
            let noun = if *assets == 1 { "asset" } else { "assets" };
            vec![format!("Processing {} {} at {}", assets, noun, scale)]
        }
        ProcessEvent::AssetProcessed {
            index,
            rectangle,
            dimensions,
            status,
            ..
        } => {
            let mut lines = vec![
                asset_header(*index),
                format!("{}Source: {}", indent(1), rectangle),
            ];
            lines.push(match status {
                ArtifactStatus::Processed => format!("{}Output: {}", indent(1), dimensions),
                ArtifactStatus::Fallback { reason } => {
                    format!("{}Output: {} (fallback: {})", indent(1), dimensions, reason)
                }
                ArtifactStatus::Failed { reason } => format!("{}Failed: {}", indent(1), reason),
            });
            lines
        }
    }
}

/// One-line explanation for a run that did nothing.
pub fn format_skip_reason(reason: SkipReason) -> String {
    match reason {
        SkipReason::NoImage => "No image loaded; nothing to process".to_string(),
        SkipReason::NoSelection => "No selections; nothing to process".to_string(),
        SkipReason::AlreadyRunning => "A run is already in progress".to_string(),
    }
}

pub fn format_export_output(report: &ExportReport, dir: &Path) -> Vec<String> {
    let mut lines = Vec::new();
    for path in &report.assets {
        lines.push(format!("Wrote {}", display_path(path, dir)));
    }
    for name in &report.skipped {
        lines.push(format!("Skipped {} (failed)", name));
    }
    if let Some(archive) = &report.archive {
        let noun = if archive.entries == 1 { "asset" } else { "assets" };
        lines.push(format!(
            "Archive: {} ({} {})",
            display_path(&archive.path, dir),
            archive.entries,
            noun
        ));
    }
    if let Some(manifest) = &report.manifest {
        lines.push(format!("Manifest: {}", display_path(manifest, dir)));
    }
    if lines.is_empty() {
        lines.push("Nothing exported".to_string());
    }
    lines
}

pub fn print_export_output(report: &ExportReport, dir: &Path) {
    for line in format_export_output(report, dir) {
        println!("{}", line);
    }
}
