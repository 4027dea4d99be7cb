//! Writing finished artifacts to an output directory.
//!
//! ```text
//! out/
//! ├── asset_1.png        # one per artifact (export.individual)
//! ├── asset_2.png
//! ├── game-assets.zip    # one entry per artifact (export.archive_name)
//! └── manifest.json      # what was exported and how (export.manifest)
//! ```
//!
//! With `only`, a single asset is written on its own; the archive and
//! manifest still describe the whole run. Failed artifacts have no bytes and
//! are never written as files. They keep an empty entry in the archive and
//! stay in the manifest so the failure is visible.

use crate::archive::{ArchiveError, build_archive};
use crate::config::ExportConfig;
use crate::imaging::ScaleFactor;
use crate::process::{Artifact, find_artifact};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

pub const MANIFEST_FILENAME: &str = "manifest.json";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("archive error: {0}")]
    Archive(#[from] ArchiveError),
    #[error("no asset named {0:?}")]
    UnknownAsset(String),
}

/// What to export from a finished run.
#[derive(Debug, Clone)]
pub struct ExportRequest<'a> {
    pub artifacts: &'a [Artifact],
    /// Scale the artifacts were produced with.
    pub scale: ScaleFactor,
    /// Write just this asset (`asset_2.png` or `2`) instead of all of them.
    pub only: Option<&'a str>,
    /// Build the zip bundle.
    pub archive: bool,
}

/// `manifest.json` contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportManifest {
    pub scale: ScaleFactor,
    /// Archive file name, if one was written.
    pub archive: Option<String>,
    pub assets: Vec<Artifact>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveReport {
    pub path: PathBuf,
    pub entries: usize,
}

/// Everything that ended up on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportReport {
    pub assets: Vec<PathBuf>,
    /// Names of failed assets that were not written.
    pub skipped: Vec<String>,
    pub archive: Option<ArchiveReport>,
    pub manifest: Option<PathBuf>,
}

pub fn write_export(
    dir: &Path,
    request: &ExportRequest<'_>,
    config: &ExportConfig,
) -> Result<ExportReport, ExportError> {
    let selected: Vec<&Artifact> = match request.only {
        Some(name) => {
            let artifact = find_artifact(request.artifacts, name)
                .ok_or_else(|| ExportError::UnknownAsset(name.to_string()))?;
            vec![artifact]
        }
        None if config.individual => request.artifacts.iter().collect(),
        None => Vec::new(),
    };

    fs::create_dir_all(dir)?;
    let mut report = ExportReport::default();

    for artifact in selected {
        if artifact.is_failed() {
            warn!(asset = %artifact.name, "failed asset not written");
            report.skipped.push(artifact.name.clone());
            continue;
        }
        report.assets.push(write_asset(dir, artifact)?);
    }

    let bundle = if request.archive {
        build_archive(request.artifacts)?
    } else {
        None
    };
    if let Some(bytes) = bundle {
        let path = dir.join(&config.archive_name);
        fs::write(&path, bytes)?;
        debug!(path = %path.display(), "archive written");
        report.archive = Some(ArchiveReport {
            path,
            entries: request.artifacts.len(),
        });
    }

    if config.manifest {
        let manifest = ExportManifest {
            scale: request.scale,
            archive: report.archive.as_ref().map(|_| config.archive_name.clone()),
            assets: request.artifacts.to_vec(),
        };
        let path = dir.join(MANIFEST_FILENAME);
        fs::write(&path, serde_json::to_string_pretty(&manifest)?)?;
        report.manifest = Some(path);
    }

    Ok(report)
}

/// Write one artifact's PNG bytes as `dir/<name>`.
pub fn write_asset(dir: &Path, artifact: &Artifact) -> Result<PathBuf, ExportError> {
    let path = dir.join(&artifact.name);
    fs::write(&path, &artifact.encoded_image)?;
    debug!(path = %path.display(), bytes = artifact.encoded_image.len(), "asset written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{artifact, failed_artifact};
    use tempfile::TempDir;

    fn request(artifacts: &[Artifact]) -> ExportRequest<'_> {
        ExportRequest {
            artifacts,
            scale: ScaleFactor::X2,
            only: None,
            archive: true,
        }
    }

    fn read_manifest(dir: &Path) -> ExportManifest {
        let json = fs::read_to_string(dir.join(MANIFEST_FILENAME)).unwrap();
        serde_json::from_str(&json).unwrap()
    }

    #[test]
    fn writes_assets_archive_and_manifest() {
        let tmp = TempDir::new().unwrap();
        let artifacts = vec![artifact(0, b"one"), artifact(1, b"two")];

        let report = write_export(tmp.path(), &request(&artifacts), &ExportConfig::default())
            .unwrap();

        assert_eq!(
            report.assets,
            vec![tmp.path().join("asset_1.png"), tmp.path().join("asset_2.png")]
        );
        assert_eq!(fs::read(tmp.path().join("asset_2.png")).unwrap(), b"two");
        let archive = report.archive.unwrap();
        assert_eq!(archive.path, tmp.path().join("game-assets.zip"));
        assert_eq!(archive.entries, 2);
        assert!(archive.path.exists());

        let manifest = read_manifest(tmp.path());
        assert_eq!(manifest.scale, ScaleFactor::X2);
        assert_eq!(manifest.archive.as_deref(), Some("game-assets.zip"));
        assert_eq!(manifest.assets.len(), 2);
        assert_eq!(manifest.assets[1].name, "asset_2.png");
        // Bytes live in the PNG files, not the manifest.
        assert!(manifest.assets[1].encoded_image.is_empty());
    }

    #[test]
    fn only_writes_single_asset() {
        let tmp = TempDir::new().unwrap();
        let artifacts = vec![artifact(0, b"one"), artifact(1, b"two"), artifact(2, b"three")];
        let req = ExportRequest {
            only: Some("asset_2.png"),
            ..request(&artifacts)
        };

        let report = write_export(tmp.path(), &req, &ExportConfig::default()).unwrap();

        assert_eq!(report.assets, vec![tmp.path().join("asset_2.png")]);
        assert!(!tmp.path().join("asset_1.png").exists());
        assert_eq!(report.archive.map(|a| a.entries), Some(3));
    }

    #[test]
    fn only_unknown_asset_is_error() {
        let tmp = TempDir::new().unwrap();
        let artifacts = vec![artifact(0, b"one")];
        let req = ExportRequest {
            only: Some("asset_5.png"),
            ..request(&artifacts)
        };

        let err = write_export(tmp.path(), &req, &ExportConfig::default()).unwrap_err();
        assert!(matches!(err, ExportError::UnknownAsset(ref n) if n == "asset_5.png"));
    }

    #[test]
    fn failed_assets_are_skipped_but_listed() {
        let tmp = TempDir::new().unwrap();
        let artifacts = vec![artifact(0, b"one"), failed_artifact(1)];

        let report = write_export(tmp.path(), &request(&artifacts), &ExportConfig::default())
            .unwrap();

        assert_eq!(report.assets.len(), 1);
        assert_eq!(report.skipped, vec!["asset_2.png".to_string()]);
        assert!(!tmp.path().join("asset_2.png").exists());
        assert_eq!(report.archive.map(|a| a.entries), Some(2));
        assert!(read_manifest(tmp.path()).assets[1].is_failed());
    }

    #[test]
    fn no_archive_when_disabled() {
        let tmp = TempDir::new().unwrap();
        let artifacts = vec![artifact(0, b"one")];
        let req = ExportRequest {
            archive: false,
            ..request(&artifacts)
        };

        let report = write_export(tmp.path(), &req, &ExportConfig::default()).unwrap();

        assert_eq!(report.archive, None);
        assert!(!tmp.path().join("game-assets.zip").exists());
        assert_eq!(read_manifest(tmp.path()).archive, None);
    }

    #[test]
    fn empty_run_writes_manifest_only() {
        let tmp = TempDir::new().unwrap();
        let report = write_export(tmp.path(), &request(&[]), &ExportConfig::default()).unwrap();

        assert!(report.assets.is_empty());
        assert_eq!(report.archive, None);
        assert!(read_manifest(tmp.path()).assets.is_empty());
    }

    #[test]
    fn config_controls_outputs() {
        let tmp = TempDir::new().unwrap();
        let artifacts = vec![artifact(0, b"one")];
        let config = ExportConfig {
            archive_name: "sprites.zip".to_string(),
            individual: false,
            manifest: false,
        };

        let report = write_export(tmp.path(), &request(&artifacts), &config).unwrap();

        assert!(report.assets.is_empty());
        assert_eq!(report.manifest, None);
        assert!(!tmp.path().join(MANIFEST_FILENAME).exists());
        assert_eq!(
            report.archive.map(|a| a.path),
            Some(tmp.path().join("sprites.zip"))
        );
    }

    #[test]
    fn creates_missing_output_directory() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("nested/out");
        let artifacts = vec![artifact(0, b"one")];

        write_export(&dir, &request(&artifacts), &ExportConfig::default()).unwrap();
        assert!(dir.join("asset_1.png").exists());
    }
}
