//! Delivery of a finished artifact.
//!
//! Exporting writes the combined bytes to a scratch file named after their
//! SHA-256 digest, hands that file to a [`Delivery`] and releases the
//! scratch file afterwards, whether or not delivery succeeded. Each export
//! is single-shot: retrying means calling
//! [`ArtifactExporter::export_artifact`] again, which creates a fresh
//! handle.
//!
//! # Examples
//!
//! ```no_run
//! use pdfcombine::export::{ArtifactExporter, SaveToPath};
//!
//! # async fn example(bytes: Vec<u8>) -> pdfcombine::Result<()> {
//! let exporter = ArtifactExporter::new();
//! let delivery = SaveToPath::new("combined.pdf", false);
//! let outcome = exporter.export_artifact(&bytes, "combined.pdf", &delivery).await?;
//! println!("Saved {} ({})", outcome.destination.display(), outcome.digest);
//! # Ok(())
//! # }
//! ```

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tempfile::TempDir;
use tokio::task;
use tracing::{debug, warn};

use crate::error::{CombineError, Result};

/// Name used when no usable name is suggested.
pub const DEFAULT_ARTIFACT_NAME: &str = "combined.pdf";

/// Transient, content-addressed copy of an artifact.
///
/// The backing file lives in a private scratch directory that is removed by
/// [`ArtifactHandle::release`] or, failing that, when the handle is dropped.
#[derive(Debug)]
pub struct ArtifactHandle {
    scratch: TempDir,
    path: PathBuf,
    digest: String,
    len: u64,
}

impl ArtifactHandle {
    /// Write `bytes` to a new scratch file.
    ///
    /// When `root` is given the scratch directory is created inside it,
    /// otherwise in the system temporary directory.
    pub async fn create(bytes: &[u8], root: Option<&Path>) -> io::Result<Self> {
        let digest = hex::encode(Sha256::digest(bytes));

        let mut builder = tempfile::Builder::new();
        builder.prefix("pdfcombine-");
        let scratch = match root {
            Some(root) => builder.tempdir_in(root)?,
            None => builder.tempdir()?,
        };

        let path = scratch.path().join(format!("{digest}.pdf"));
        tokio::fs::write(&path, bytes).await?;

        debug!(digest = %digest, len = bytes.len(), "created artifact handle");

        Ok(Self {
            scratch,
            path,
            digest,
            len: bytes.len() as u64,
        })
    }

    /// Location of the scratch file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Hex-encoded SHA-256 digest of the content.
    pub fn digest(&self) -> &str {
        &self.digest
    }

    /// Content length in bytes.
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Whether the artifact is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Remove the scratch file and its directory.
    pub fn release(self) -> io::Result<()> {
        self.scratch.close()
    }
}

/// Hands an artifact over to its final destination.
#[async_trait]
pub trait Delivery: Send + Sync {
    /// Deliver `artifact` under `name`; returns where it ended up.
    async fn deliver(&self, artifact: &ArtifactHandle, name: &str) -> Result<PathBuf>;
}

/// Saves the artifact to an explicit path.
#[derive(Debug, Clone)]
pub struct SaveToPath {
    destination: PathBuf,
    overwrite: bool,
}

impl SaveToPath {
    /// Save to `destination`, replacing an existing file only if `overwrite`.
    pub fn new(destination: impl Into<PathBuf>, overwrite: bool) -> Self {
        Self {
            destination: destination.into(),
            overwrite,
        }
    }
}

#[async_trait]
impl Delivery for SaveToPath {
    async fn deliver(&self, artifact: &ArtifactHandle, name: &str) -> Result<PathBuf> {
        save_atomically(artifact, &self.destination, self.overwrite, name).await?;
        Ok(self.destination.clone())
    }
}

/// Saves the artifact under its suggested name inside a directory.
#[derive(Debug, Clone)]
pub struct SaveToDirectory {
    directory: PathBuf,
    overwrite: bool,
}

impl SaveToDirectory {
    /// Save into `directory`, replacing an existing file only if `overwrite`.
    pub fn new(directory: impl Into<PathBuf>, overwrite: bool) -> Self {
        Self {
            directory: directory.into(),
            overwrite,
        }
    }
}

#[async_trait]
impl Delivery for SaveToDirectory {
    async fn deliver(&self, artifact: &ArtifactHandle, name: &str) -> Result<PathBuf> {
        let destination = self.directory.join(name);
        save_atomically(artifact, &destination, self.overwrite, name).await?;
        Ok(destination)
    }
}

/// Copy the artifact into a temporary file beside `destination`, then
/// persist it under the final name.
///
/// The staging file is removed on every failure path.
async fn save_atomically(
    artifact: &ArtifactHandle,
    destination: &Path,
    overwrite: bool,
    name: &str,
) -> Result<()> {
    if !overwrite && tokio::fs::try_exists(destination).await.unwrap_or(false) {
        return Err(CombineError::output_exists(destination.to_path_buf()));
    }

    let source = artifact.path().to_path_buf();
    let target = destination.to_path_buf();

    let saved = task::spawn_blocking(move || -> io::Result<()> {
        let parent = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut staging = tempfile::Builder::new()
            .prefix(".pdfcombine-")
            .suffix(".tmp")
            .tempfile_in(parent)?;
        io::copy(&mut File::open(&source)?, staging.as_file_mut())?;
        staging.as_file().sync_all()?;

        if overwrite {
            staging.persist(&target)?;
        } else {
            staging.persist_noclobber(&target)?;
        }
        Ok(())
    })
    .await
    .map_err(|e| CombineError::delivery(name, io::Error::other(e)))?;

    match saved {
        Ok(()) => Ok(()),
        Err(e) if !overwrite && e.kind() == io::ErrorKind::AlreadyExists => {
            Err(CombineError::output_exists(destination.to_path_buf()))
        }
        Err(e) => Err(CombineError::delivery(name, e)),
    }
}

/// Reduce a suggested name to a bare `.pdf` file name.
///
/// Directory components and control characters are dropped; an empty result
/// falls back to [`DEFAULT_ARTIFACT_NAME`].
pub fn sanitize_name(suggested: &str) -> String {
    let base = suggested
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();
    let cleaned: String = base.chars().filter(|c| !c.is_control()).collect();
    let cleaned = cleaned.trim().trim_start_matches('.');

    if cleaned.is_empty() {
        return DEFAULT_ARTIFACT_NAME.to_string();
    }

    if cleaned.to_ascii_lowercase().ends_with(".pdf") {
        cleaned.to_string()
    } else {
        format!("{cleaned}.pdf")
    }
}
