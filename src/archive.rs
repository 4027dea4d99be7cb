//! Zip bundling of finished artifacts.
//!
//! Each artifact becomes one entry named after the artifact, holding its PNG
//! bytes unchanged. PNG data is already deflate-compressed, so entries are
//! stored rather than compressed again. Entry order follows artifact order.
//!
//! The archive always holds one entry per artifact, so `asset_N.png` inside
//! it lines up with selection N. A failed artifact has no bytes and becomes a
//! zero-length entry, logged as a warning. An empty artifact list produces no
//! archive at all.

use crate::process::Artifact;
use std::io::{Cursor, Write};
use thiserror::Error;
use tracing::{debug, warn};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Default file name for the bundle.
pub const DEFAULT_ARCHIVE_NAME: &str = "game-assets.zip";

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Build an in-memory zip of `artifacts`. `None` when `artifacts` is empty.
pub fn build_archive(artifacts: &[Artifact]) -> Result<Option<Vec<u8>>, ArchiveError> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

    if artifacts.is_empty() {
        return Ok(None);
    }
    for artifact in artifacts {
        if artifact.is_failed() {
            warn!(asset = %artifact.name, "failed asset archived as an empty entry");
        }
        writer.start_file(artifact.name.as_str(), options)?;
        writer.write_all(&artifact.encoded_image)?;
    }

    let bytes = writer.finish()?.into_inner();
    debug!(entries = artifacts.len(), bytes = bytes.len(), "archive built");
    Ok(Some(bytes))
}
