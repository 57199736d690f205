//! Combine session: the state a caller holds between user actions.
//!
//! A [`MergeSession`] bundles the document queue, the orchestrator, the
//! ingestion rules and the most recent merge result. Any change to the
//! queue makes the held result stale, so it is never exported for an order
//! the user has since changed.
//!
//! # Examples
//!
//! ```no_run
//! use pdfcombine::codec::LopdfCodec;
//! use pdfcombine::export::SaveToPath;
//! use pdfcombine::ingest::{Candidate, SizeLimits};
//! use pdfcombine::merge::NoProgress;
//! use pdfcombine::session::MergeSession;
//! use std::path::PathBuf;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> pdfcombine::Result<()> {
//! let mut session = MergeSession::new(LopdfCodec::new(), SizeLimits::default());
//! let inputs = [PathBuf::from("a.pdf"), PathBuf::from("b.pdf")];
//! session.add_candidates(Candidate::from_paths(&inputs).await?)?;
//!
//! session.move_down(0)?;
//! session.combine(&mut NoProgress, &CancellationToken::new()).await?;
//! session.export("combined.pdf", &SaveToPath::new("combined.pdf", false)).await?;
//! # Ok(())
//! # }
//! ```

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::codec::DocumentCodec;
use crate::collection::{Document, DocumentCollection, DocumentId};
use crate::error::{CombineError, Result};
use crate::export::{ArtifactExporter, Delivery, DeliveryOutcome};
use crate::ingest::{Candidate, Ingestor, SizeLimits};
use crate::merge::{MergeOrchestrator, MergeResult, ProgressSink};

/// Documents queued by one [`MergeSession::add_candidates`] call.
#[derive(Debug, Default)]
pub struct Added {
    /// Identifiers of the queued documents, in order.
    pub ids: Vec<DocumentId>,
    /// Names of candidates dropped by the type check.
    pub skipped: Vec<String>,
}

/// Queue, orchestrator and last result for one user session.
#[derive(Debug)]
pub struct MergeSession<C> {
    collection: DocumentCollection,
    orchestrator: MergeOrchestrator<C>,
    ingestor: Ingestor,
    exporter: ArtifactExporter,
    last_result: Option<MergeResult>,
}

impl<C: DocumentCodec> MergeSession<C> {
    /// Create an empty session.
    pub fn new(codec: C, limits: SizeLimits) -> Self {
        Self {
            collection: DocumentCollection::new(),
            orchestrator: MergeOrchestrator::new(codec),
            ingestor: Ingestor::new(limits),
            exporter: ArtifactExporter::new(),
            last_result: None,
        }
    }

    /// Replace the exporter used by [`MergeSession::export`].
    pub fn with_exporter(mut self, exporter: ArtifactExporter) -> Self {
        self.exporter = exporter;
        self
    }

    /// Read access to the queue.
    pub fn collection(&self) -> &DocumentCollection {
        &self.collection
    }

    /// Queue the PDF candidates, in order.
    ///
    /// # Errors
    ///
    /// Returns [`CombineError::SizeLimitExceeded`] if the candidates would
    /// break a size limit; nothing is queued in that case.
    pub fn add_candidates(&mut self, candidates: Vec<Candidate>) -> Result<Added> {
        let admission = self
            .ingestor
            .admit(candidates, self.collection.total_size_bytes())?;

        Ok(Added {
            ids: self.collection.append(admission.accepted),
            skipped: admission.skipped,
        })
    }

    /// Remove the document at `index`.
    pub fn remove_at(&mut self, index: usize) -> Result<Document> {
        self.collection.remove_at(index)
    }

    /// Move the document at `index` one place earlier.
    pub fn move_up(&mut self, index: usize) -> Result<bool> {
        self.collection.move_up(index)
    }

    /// Move the document at `index` one place later.
    pub fn move_down(&mut self, index: usize) -> Result<bool> {
        self.collection.move_down(index)
    }

    /// Clear the queue and forget the last result.
    pub fn reset(&mut self) {
        self.collection.reset();
        self.last_result = None;
    }

    /// Whether a merge run is in progress.
    pub fn is_processing(&self) -> bool {
        self.orchestrator.is_running()
    }

    /// Whether combining is worthwhile right now.
    ///
    /// Requires at least two queued documents, no up-to-date result and no
    /// run in progress.
    pub fn can_combine(&self) -> bool {
        self.collection.len() >= 2 && self.current_result().is_none() && !self.is_processing()
    }

    /// Combine the current queue order.
    ///
    /// The result replaces any previously held one.
    pub async fn combine<P>(
        &mut self,
        progress: &mut P,
        cancel: &CancellationToken,
    ) -> Result<&MergeResult>
    where
        P: ProgressSink + ?Sized,
    {
        let snapshot = self.collection.snapshot();
        let result = self.orchestrator.combine(&snapshot, progress, cancel).await?;
        Ok(&*self.last_result.insert(result))
    }

    /// The last merge result, unless the queue has changed since.
    pub fn current_result(&self) -> Option<&MergeResult> {
        self.last_result
            .as_ref()
            .filter(|result| result.revision == self.collection.revision())
    }

    /// Deliver the current result's output.
    ///
    /// # Errors
    ///
    /// Fails if there is no up-to-date result with output, or if delivery
    /// fails.
    pub async fn export<D>(&self, suggested_name: &str, delivery: &D) -> Result<DeliveryOutcome>
    where
        D: Delivery + ?Sized,
    {
        let bytes = self
            .current_result()
            .and_then(|result| result.output.as_deref())
            .ok_or_else(|| CombineError::other("No up-to-date combined document to export"))?;

        debug!(bytes = bytes.len(), "exporting combined document");
        self.exporter
            .export_artifact(bytes, suggested_name, delivery)
            .await
    }
}
