//! pdfcombine - Combine PDF files into a single document.
//!
//! This library keeps an ordered queue of PDF documents, combines their
//! pages into one document and hands the result to a delivery target. It
//! supports:
//!
//! - Ordered queue editing (append, remove, move up and down, reset)
//! - Per-document and aggregate size limits at ingestion
//! - Tolerant merging: unreadable documents are skipped and reported
//! - Progress reporting during a merge run
//! - Content-addressed export with guaranteed scratch cleanup
//!
//! # Examples
//!
//! ## Combining files
//!
//! ```no_run
//! use pdfcombine::codec::LopdfCodec;
//! use pdfcombine::export::SaveToPath;
//! use pdfcombine::ingest::{Candidate, SizeLimits};
//! use pdfcombine::merge::{MergeStatus, NoProgress};
//! use pdfcombine::MergeSession;
//! use std::path::PathBuf;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> pdfcombine::Result<()> {
//! let mut session = MergeSession::new(LopdfCodec::new(), SizeLimits::default());
//! let inputs = [PathBuf::from("cover.pdf"), PathBuf::from("body.pdf")];
//! session.add_candidates(Candidate::from_paths(&inputs).await?)?;
//!
//! let result = session
//!     .combine(&mut NoProgress, &CancellationToken::new())
//!     .await?;
//! if result.status != MergeStatus::Failed {
//!     session
//!         .export("report.pdf", &SaveToPath::new("report.pdf", false))
//!         .await?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Using the orchestrator directly
//!
//! ```no_run
//! use pdfcombine::codec::LopdfCodec;
//! use pdfcombine::collection::{DocumentCollection, NewDocument};
//! use pdfcombine::merge::{MergeOrchestrator, RecordingProgress};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example(a: Vec<u8>, b: Vec<u8>) -> pdfcombine::Result<()> {
//! let mut queue = DocumentCollection::new();
//! queue.append([NewDocument::from_bytes("a.pdf", a), NewDocument::from_bytes("b.pdf", b)]);
//!
//! let mut orchestrator = MergeOrchestrator::new(LopdfCodec::new());
//! let mut progress = RecordingProgress::new();
//! let result = orchestrator
//!     .combine(&queue.snapshot(), &mut progress, &CancellationToken::new())
//!     .await?;
//! println!("{:?}: {} pages, progress {:?}", result.status, result.total_pages, progress.values);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cli;
pub mod codec;
pub mod collection;
pub mod config;
pub mod error;
pub mod export;
pub mod ingest;
pub mod merge;
pub mod output;
pub mod session;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{CombineError, Result};
pub use session::MergeSession;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
