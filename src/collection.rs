//! Ordered queue of documents waiting to be combined.
//!
//! The collection owns every queued [`Document`] and its position. Positions
//! are always contiguous (`0..len`) and match the index of the entry, and
//! every structural change bumps a revision counter so that a merge result
//! produced from an older snapshot can be recognised as stale.
//!
//! # Examples
//!
//! ```
//! use pdfcombine::collection::{DocumentCollection, NewDocument};
//!
//! let mut queue = DocumentCollection::new();
//! queue.append(vec![
//!     NewDocument::from_bytes("a.pdf", b"%PDF-1.4".to_vec()),
//!     NewDocument::from_bytes("b.pdf", b"%PDF-1.4".to_vec()),
//! ]);
//!
//! queue.move_up(1).unwrap();
//! assert_eq!(queue.get(0).unwrap().display_name(), "b.pdf");
//! assert_eq!(queue.total_size_bytes(), 16);
//! ```

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use crate::error::{CombineError, Result};

/// Stable identity of a queued document.
///
/// Identifiers are handed out by a [`DocumentCollection`] and never reused,
/// not even after [`DocumentCollection::reset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
#[serde(transparent)]
pub struct DocumentId(u64);

impl DocumentId {
    /// Raw numeric value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where the raw bytes of a document live.
///
/// Bytes are only resolved when a merge run reaches the document.
#[derive(Debug, Clone)]
pub enum Payload {
    /// Bytes already held in memory.
    Memory(Arc<[u8]>),
    /// Bytes to be read from a file on disk.
    File(PathBuf),
}

impl Payload {
    /// Resolve the payload into an owned buffer.
    pub async fn load(&self) -> io::Result<Vec<u8>> {
        match self {
            Self::Memory(bytes) => Ok(bytes.to_vec()),
            Self::File(path) => tokio::fs::read(path).await,
        }
    }
}

/// A document accepted by ingestion but not yet queued.
#[derive(Debug, Clone)]
pub struct NewDocument {
    /// Name shown to the user.
    pub display_name: String,
    /// Size reported at ingestion, in bytes.
    pub size_bytes: u64,
    /// Reference to the raw bytes.
    pub payload: Payload,
}

impl NewDocument {
    /// Wrap an in-memory buffer.
    pub fn from_bytes(display_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            display_name: display_name.into(),
            size_bytes: bytes.len() as u64,
            payload: Payload::Memory(bytes.into()),
        }
    }
}

/// One queued document.
#[derive(Debug, Clone)]
pub struct Document {
    id: DocumentId,
    display_name: String,
    size_bytes: u64,
    payload: Payload,
    position: usize,
}

impl Document {
    /// Stable identifier.
    pub fn id(&self) -> DocumentId {
        self.id
    }

    /// Name shown to the user.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Size reported at ingestion, in bytes.
    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    /// Reference to the raw bytes.
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Zero-based position in the queue.
    pub fn position(&self) -> usize {
        self.position
    }
}

/// Owned copy of the queue order, taken when a merge run starts.
#[derive(Debug, Clone, Default)]
pub struct CollectionSnapshot {
    /// Revision of the collection at the time of the snapshot.
    pub revision: u64,
    /// Documents in merge order.
    pub documents: Vec<Document>,
}

impl CollectionSnapshot {
    /// Number of documents in the snapshot.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether the snapshot holds no documents.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Ordered collection of queued documents.
#[derive(Debug, Default)]
pub struct DocumentCollection {
    entries: Vec<Document>,
    next_id: u64,
    revision: u64,
}

impl DocumentCollection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add documents to the end of the queue, preserving their order.
    ///
    /// Returns the identifiers assigned to the new entries. Appending an
    /// empty set leaves the collection untouched.
    pub fn append(&mut self, documents: impl IntoIterator<Item = NewDocument>) -> Vec<DocumentId> {
        let mut ids = Vec::new();

        for doc in documents {
            let id = DocumentId(self.next_id);
            self.next_id += 1;

            debug!(%id, name = %doc.display_name, size = doc.size_bytes, "queued document");

            self.entries.push(Document {
                id,
                display_name: doc.display_name,
                size_bytes: doc.size_bytes,
                payload: doc.payload,
                position: self.entries.len(),
            });
            ids.push(id);
        }

        if !ids.is_empty() {
            self.revision += 1;
        }

        ids
    }

    /// Remove the document at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`CombineError::OutOfRange`] if `index` does not address a
    /// queued document; the collection is left unchanged.
    pub fn remove_at(&mut self, index: usize) -> Result<Document> {
        self.check_index(index)?;

        let removed = self.entries.remove(index);
        self.renumber_from(index);
        self.revision += 1;

        debug!(id = %removed.id, index, "removed document");
        Ok(removed)
    }

    /// Swap the document at `index` with its predecessor.
    ///
    /// Returns `Ok(false)` without touching the collection when the document
    /// is already first.
    pub fn move_up(&mut self, index: usize) -> Result<bool> {
        self.check_index(index)?;

        if index == 0 {
            return Ok(false);
        }

        self.swap(index - 1, index);
        Ok(true)
    }

    /// Swap the document at `index` with its successor.
    ///
    /// Returns `Ok(false)` without touching the collection when the document
    /// is already last.
    pub fn move_down(&mut self, index: usize) -> Result<bool> {
        self.check_index(index)?;

        if index + 1 == self.entries.len() {
            return Ok(false);
        }

        self.swap(index, index + 1);
        Ok(true)
    }

    /// Remove every document.
    pub fn reset(&mut self) {
        let cleared = self.entries.len();
        self.entries.clear();
        self.revision += 1;

        debug!(cleared, "reset document queue");
    }

    /// Sum of the sizes of all queued documents, in bytes.
    pub fn total_size_bytes(&self) -> u64 {
        self.entries.iter().map(|doc| doc.size_bytes).sum()
    }

    /// Number of queued documents.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Document at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&Document> {
        self.entries.get(index)
    }

    /// Iterate over the queue in order.
    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.entries.iter()
    }

    /// Current revision; changes on every structural mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Take an owned copy of the current order.
    pub fn snapshot(&self) -> CollectionSnapshot {
        CollectionSnapshot {
            revision: self.revision,
            documents: self.entries.clone(),
        }
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.entries.len() {
            return Err(CombineError::OutOfRange {
                index,
                len: self.entries.len(),
            });
        }
        Ok(())
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.entries.swap(a, b);
        self.entries[a].position = a;
        self.entries[b].position = b;
        self.revision += 1;
    }

    fn renumber_from(&mut self, start: usize) {
        for (position, doc) in self.entries.iter_mut().enumerate().skip(start) {
            doc.position = position;
        }
    }
}
