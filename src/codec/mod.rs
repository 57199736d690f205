//! Document codec abstraction.
//!
//! A codec knows how to turn raw bytes into a page-bearing document, how to
//! append a document's pages to an accumulating output, and how to serialize
//! that output. The merge orchestrator only talks to this trait, so tests can
//! substitute a scripted codec for the real one.
//!
//! The production implementation is [`LopdfCodec`].

pub mod pdf;

pub use pdf::{LopdfCodec, MergedPdf};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::Result;

/// Decodes input documents and encodes the combined output.
#[async_trait]
pub trait DocumentCodec: Send + Sync {
    /// A decoded input document.
    type Decoded: Send;

    /// The accumulating combined document.
    type Output: Send;

    /// Create an empty output document.
    fn new_output(&self) -> Self::Output;

    /// Decode raw bytes into a document.
    ///
    /// Errors are reported per document and do not end a merge run.
    async fn decode(&self, bytes: Vec<u8>, cancel: &CancellationToken) -> Result<Self::Decoded>;

    /// Append every page of `document`, in its original order, to `output`.
    ///
    /// Consumes the decoded document and returns the number of pages added.
    fn append_pages(&self, output: &mut Self::Output, document: Self::Decoded) -> Result<usize>;

    /// Serialize the combined document.
    async fn encode(&self, output: Self::Output, cancel: &CancellationToken) -> Result<Vec<u8>>;
}
