//! Admission of candidate files into the document queue.
//!
//! Ingestion performs the only checks made before a merge: a superficial
//! type check (declared media type or `.pdf` extension) and optional size
//! limits. Nothing here parses document content; a file that passes the
//! type check but is not a valid PDF fails later, at decode time, as a
//! per-document failure.
//!
//! # Examples
//!
//! ```
//! use pdfcombine::ingest::{Candidate, Ingestor, SizeLimits};
//!
//! let ingestor = Ingestor::new(SizeLimits::default());
//! let admission = ingestor
//!     .admit(
//!         vec![
//!             Candidate::from_bytes("report.pdf", None, b"%PDF-1.4".to_vec()),
//!             Candidate::from_bytes("notes.txt", Some("text/plain"), b"hi".to_vec()),
//!         ],
//!         0,
//!     )
//!     .unwrap();
//!
//! assert_eq!(admission.accepted.len(), 1);
//! assert_eq!(admission.skipped, ["notes.txt"]);
//! ```

use std::path::{Path, PathBuf};

use futures::{StreamExt, TryStreamExt, stream};
use serde::Serialize;
use tracing::debug;

use crate::collection::{NewDocument, Payload};
use crate::error::{CombineError, LimitViolation, Result};

/// Media type accepted at ingestion.
pub const PDF_MEDIA_TYPE: &str = "application/pdf";

/// A file offered for queuing.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// File name shown to the user.
    pub name: String,
    /// Declared media type, when the source provides one.
    pub media_type: Option<String>,
    /// Size in bytes.
    pub size_bytes: u64,
    /// Reference to the raw bytes.
    pub payload: Payload,
}

impl Candidate {
    /// Describe a file on disk without reading its content.
    ///
    /// # Errors
    ///
    /// Returns [`CombineError::FileNotFound`] if the path does not exist, or
    /// an I/O error if its metadata cannot be read.
    pub async fn from_path(path: &Path) -> Result<Self> {
        let metadata = match tokio::fs::metadata(path).await {
            Ok(metadata) => metadata,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(CombineError::file_not_found(path.to_path_buf()));
            }
            Err(err) => return Err(err.into()),
        };

        if !metadata.is_file() {
            return Err(CombineError::other(format!(
                "Not a regular file: {}",
                path.display()
            )));
        }

        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self {
            name,
            media_type: None,
            size_bytes: metadata.len(),
            payload: Payload::File(path.to_path_buf()),
        })
    }

    /// Describe several files on disk, in the given order.
    pub async fn from_paths(paths: &[PathBuf]) -> Result<Vec<Self>> {
        stream::iter(paths)
            .then(|path| Self::from_path(path))
            .try_collect()
            .await
    }

    /// Wrap an in-memory buffer.
    pub fn from_bytes(name: impl Into<String>, media_type: Option<&str>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.map(str::to_string),
            size_bytes: bytes.len() as u64,
            payload: Payload::Memory(bytes.into()),
        }
    }

    /// Whether the candidate looks like a PDF by media type or extension.
    pub fn is_pdf(&self) -> bool {
        let declared = self
            .media_type
            .as_deref()
            .is_some_and(|media_type| media_type.eq_ignore_ascii_case(PDF_MEDIA_TYPE));

        declared || self.name.to_ascii_lowercase().ends_with(".pdf")
    }
}

/// Optional size limits applied at ingestion.
///
/// A limit of `0` disables that check. Both checks are disabled by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SizeLimits {
    /// Largest accepted single document, in bytes.
    pub max_document_bytes: u64,
    /// Largest accepted queue total, in bytes.
    pub max_total_bytes: u64,
}

impl SizeLimits {
    /// Whether any limit is active.
    pub fn is_enabled(&self) -> bool {
        self.max_document_bytes > 0 || self.max_total_bytes > 0
    }
}

/// Documents admitted by one ingestion call.
#[derive(Debug, Default)]
pub struct Admission {
    /// Candidates that passed every check, in input order.
    pub accepted: Vec<NewDocument>,
    /// Names of candidates dropped by the type check.
    pub skipped: Vec<String>,
}

/// Filters candidates before they reach the queue.
#[derive(Debug, Clone, Default)]
pub struct Ingestor {
    limits: SizeLimits,
}

impl Ingestor {
    /// Create an ingestor with the given limits.
    pub fn new(limits: SizeLimits) -> Self {
        Self { limits }
    }

    /// Active size limits.
    pub fn limits(&self) -> SizeLimits {
        self.limits
    }

    /// Filter `candidates` and check them against the size limits.
    ///
    /// Candidates that are not PDFs are dropped without an error. The
    /// aggregate limit counts `existing_total` bytes already queued.
    ///
    /// # Errors
    ///
    /// Returns [`CombineError::SizeLimitExceeded`] naming every violation if
    /// any limit is exceeded; nothing is admitted in that case.
    pub fn admit(&self, candidates: Vec<Candidate>, existing_total: u64) -> Result<Admission> {
        let mut admission = Admission::default();
        let mut kept = Vec::with_capacity(candidates.len());

        for candidate in candidates {
            if candidate.is_pdf() {
                kept.push(candidate);
            } else {
                debug!(name = %candidate.name, "skipping non-PDF candidate");
                admission.skipped.push(candidate.name);
            }
        }

        if self.limits.is_enabled() {
            let violations = self.check_limits(&kept, existing_total);
            if !violations.is_empty() {
                return Err(CombineError::SizeLimitExceeded { violations });
            }
        }

        admission.accepted = kept
            .into_iter()
            .map(|candidate| NewDocument {
                display_name: candidate.name,
                size_bytes: candidate.size_bytes,
                payload: candidate.payload,
            })
            .collect();

        Ok(admission)
    }

    fn check_limits(&self, candidates: &[Candidate], existing_total: u64) -> Vec<LimitViolation> {
        let mut violations = Vec::new();

        if self.limits.max_document_bytes > 0 {
            violations.extend(
                candidates
                    .iter()
                    .filter(|c| c.size_bytes > self.limits.max_document_bytes)
                    .map(|c| LimitViolation::Document {
                        name: c.name.clone(),
                        size: c.size_bytes,
                        limit: self.limits.max_document_bytes,
                    }),
            );
        }

        if self.limits.max_total_bytes > 0 {
            let total = candidates
                .iter()
                .fold(existing_total, |sum, c| sum.saturating_add(c.size_bytes));

            if total > self.limits.max_total_bytes {
                violations.push(LimitViolation::Aggregate {
                    names: candidates.iter().map(|c| c.name.clone()).collect(),
                    total,
                    limit: self.limits.max_total_bytes,
                });
            }
        }

        violations
    }
}
