//! Sequential merge of a queue snapshot into one output document.
//!
//! Documents are resolved, decoded and appended one at a time, in snapshot
//! order, so at most one decoded document is held at once. A document that
//! cannot be read or decoded is recorded as a failure and the run moves on.
//! Once every document has been visited the output is encoded a single
//! time; an encode failure ends the run with no output.
//!
//! Progress is reported after every document, scaled to the `0..=80` band.
//! The remaining band is reserved for encoding, and `100` is reported only
//! after a successful encode.
//!
//! # Examples
//!
//! ```no_run
//! use pdfcombine::codec::LopdfCodec;
//! use pdfcombine::collection::DocumentCollection;
//! use pdfcombine::merge::{MergeOrchestrator, NoProgress};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example(queue: DocumentCollection) -> pdfcombine::Result<()> {
//! let mut orchestrator = MergeOrchestrator::new(LopdfCodec::new());
//! let result = orchestrator
//!     .combine(&queue.snapshot(), &mut NoProgress, &CancellationToken::new())
//!     .await?;
//! println!("{:?}: {} pages", result.status, result.total_pages);
//! # Ok(())
//! # }
//! ```

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::progress::ProgressSink;
use crate::codec::DocumentCodec;
use crate::collection::{CollectionSnapshot, Document, DocumentId};
use crate::error::{CombineError, Result};

/// Share of the progress range covered by per-document work.
const DECODE_BAND: f64 = 80.0;

/// Lifecycle of an orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeState {
    /// No run has happened yet.
    Idle,
    /// A run is in progress.
    Running,
    /// The last run merged every document.
    Completed,
    /// The last run merged some documents and skipped others.
    PartiallyCompleted,
    /// The last run produced no output.
    Failed,
}

/// Terminal status of one merge run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MergeStatus {
    /// Every document was merged and the output was encoded.
    Completed,
    /// At least one document failed, the rest were merged and encoded.
    PartiallyCompleted,
    /// Nothing usable was produced.
    Failed,
}

impl From<MergeStatus> for MergeState {
    fn from(status: MergeStatus) -> Self {
        match status {
            MergeStatus::Completed => Self::Completed,
            MergeStatus::PartiallyCompleted => Self::PartiallyCompleted,
            MergeStatus::Failed => Self::Failed,
        }
    }
}

/// What happened to one document during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum DocumentOutcome {
    /// All pages were appended to the output.
    Success {
        /// Document identity.
        id: DocumentId,
        /// Display name.
        name: String,
        /// Number of pages contributed.
        pages: usize,
    },
    /// The document was skipped.
    Failure {
        /// Document identity.
        id: DocumentId,
        /// Display name.
        name: String,
        /// Why it was skipped.
        reason: String,
    },
}

impl DocumentOutcome {
    /// Whether the document contributed its pages.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Identity of the document this outcome is about.
    pub fn id(&self) -> DocumentId {
        match self {
            Self::Success { id, .. } | Self::Failure { id, .. } => *id,
        }
    }
}

/// Result of one merge run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeResult {
    /// Terminal status.
    pub status: MergeStatus,
    /// Encoded output; present only when at least one document was merged
    /// and encoding succeeded.
    #[serde(skip)]
    pub output: Option<Vec<u8>>,
    /// Per-document outcomes, in snapshot order.
    pub outcomes: Vec<DocumentOutcome>,
    /// Last progress value reported.
    pub progress: u8,
    /// Revision of the snapshot this result was produced from.
    pub revision: u64,
    /// Fatal error message, if the run failed as a whole.
    pub failure: Option<String>,
    /// Pages in the output.
    pub total_pages: usize,
}

impl MergeResult {
    /// Number of documents that contributed pages.
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    /// Number of documents that were skipped.
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    /// Size of the encoded output, in bytes.
    pub fn output_size(&self) -> Option<u64> {
        self.output.as_ref().map(|bytes| bytes.len() as u64)
    }
}

/// Drives a codec over a queue snapshot.
#[derive(Debug)]
pub struct MergeOrchestrator<C> {
    codec: C,
    state: MergeState,
}

impl<C: DocumentCodec> MergeOrchestrator<C> {
    /// Create an idle orchestrator around `codec`.
    pub fn new(codec: C) -> Self {
        Self {
            codec,
            state: MergeState::Idle,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> MergeState {
        self.state
    }

    /// Whether a run is in progress.
    pub fn is_running(&self) -> bool {
        self.state == MergeState::Running
    }

    /// Borrow the codec.
    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Merge every document of `snapshot` into one output.
    ///
    /// Per-document failures and encode failures are recorded in the
    /// result rather than returned. An empty snapshot yields a `Failed`
    /// result without touching the codec.
    ///
    /// Runs cannot overlap since this borrows the orchestrator mutably. A
    /// run whose future is dropped before completion leaves the
    /// orchestrator in [`MergeState::Failed`].
    pub async fn combine<P>(
        &mut self,
        snapshot: &CollectionSnapshot,
        progress: &mut P,
        cancel: &CancellationToken,
    ) -> Result<MergeResult>
    where
        P: ProgressSink + ?Sized,
    {
        // `cancel` reaches the codec but is not checked between documents.
        let mut run = RunGuard::start(&mut self.state);
        let codec = &self.codec;

        let total = snapshot.len();
        let mut result = MergeResult {
            status: MergeStatus::Failed,
            output: None,
            outcomes: Vec::with_capacity(total),
            progress: 0,
            revision: snapshot.revision,
            failure: None,
            total_pages: 0,
        };

        if total == 0 {
            info!("nothing to combine");
            result.failure = Some("No documents to combine".to_string());
            run.finish(result.status);
            return Ok(result);
        }

        info!(documents = total, "combining documents");

        let mut output = codec.new_output();
        let mut pages_merged = 0;

        for (index, document) in snapshot.documents.iter().enumerate() {
            let outcome = match merge_document(codec, document, &mut output, cancel).await {
                Ok(pages) => {
                    pages_merged += pages;
                    DocumentOutcome::Success {
                        id: document.id(),
                        name: document.display_name().to_string(),
                        pages,
                    }
                }
                Err(err) => {
                    warn!(name = document.display_name(), error = %err, "skipping document");
                    DocumentOutcome::Failure {
                        id: document.id(),
                        name: document.display_name().to_string(),
                        reason: failure_reason(err),
                    }
                }
            };
            result.outcomes.push(outcome);

            result.progress = decode_progress(index + 1, total);
            progress.report(result.progress);
        }

        let succeeded = result.succeeded();
        if succeeded == 0 {
            warn!(documents = total, "no document could be decoded");
            result.failure = Some(format!(
                "None of the {total} document(s) could be decoded"
            ));
            run.finish(result.status);
            return Ok(result);
        }

        match codec.encode(output, cancel).await {
            Ok(bytes) => {
                result.status = if succeeded == total {
                    MergeStatus::Completed
                } else {
                    MergeStatus::PartiallyCompleted
                };
                result.total_pages = pages_merged;
                result.progress = 100;
                progress.report(result.progress);

                info!(
                    status = ?result.status,
                    pages = pages_merged,
                    bytes = bytes.len(),
                    skipped = total - succeeded,
                    "combine finished"
                );
                result.output = Some(bytes);
            }
            Err(err) => {
                let err = match err {
                    err @ CombineError::Encode { .. } => err,
                    other => CombineError::encode(other.to_string()),
                };
                warn!(error = %err, "encoding failed");
                result.failure = Some(err.to_string());
            }
        }

        run.finish(result.status);
        Ok(result)
    }
}

/// Resolve, decode and append one document; returns its page count.
async fn merge_document<C: DocumentCodec>(
    codec: &C,
    document: &Document,
    output: &mut C::Output,
    cancel: &CancellationToken,
) -> Result<usize> {
    let name = document.display_name();

    let bytes = document
        .payload()
        .load()
        .await
        .map_err(|e| CombineError::decode(name, format!("failed to read: {e}")))?;
    debug!(name, bytes = bytes.len(), "decoding document");

    let decoded = codec
        .decode(bytes, cancel)
        .await
        .map_err(|e| CombineError::decode(name, e.to_string()))?;

    codec
        .append_pages(output, decoded)
        .map_err(|e| CombineError::decode(name, format!("failed to copy pages: {e}")))
}

fn failure_reason(err: CombineError) -> String {
    match err {
        CombineError::Decode { reason, .. } => reason,
        other => other.to_string(),
    }
}

fn decode_progress(processed: usize, total: usize) -> u8 {
    (processed as f64 / total as f64 * DECODE_BAND).round() as u8
}

/// Moves the orchestrator to `Failed` if a run is dropped before finishing.
struct RunGuard<'a> {
    state: &'a mut MergeState,
    finished: bool,
}

impl<'a> RunGuard<'a> {
    fn start(state: &'a mut MergeState) -> Self {
        *state = MergeState::Running;
        Self {
            state,
            finished: false,
        }
    }

    fn finish(&mut self, status: MergeStatus) {
        *self.state = status.into();
        self.finished = true;
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            debug!("merge run dropped before finishing");
            *self.state = MergeState::Failed;
        }
    }
}
