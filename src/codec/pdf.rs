//! PDF codec backed by `lopdf`.
//!
//! Decoding and encoding are CPU-bound, so both run on the blocking thread
//! pool and are awaited from the merge task.
//!
//! Pages are moved into a single flat page tree owned by the output
//! document. Attributes a page inherits from its original tree (resources,
//! media box, crop box, rotation) are copied onto the page itself before it
//! is reparented, so every page renders the same after the move.

use async_trait::async_trait;
use lopdf::{Dictionary, Document, Object, ObjectId, StringFormat, dictionary};
use tokio::task;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::DocumentCodec;
use crate::config::{CompressionLevel, Metadata};
use crate::error::{CombineError, Result};

/// Page attributes that may be inherited from an ancestor page tree node.
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guard against cyclic `Parent` chains in malformed files.
const MAX_TREE_DEPTH: usize = 64;

/// Value written to the `Producer` entry of the output Info dictionary.
const PRODUCER: &str = concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION"));

/// Combined document under construction.
#[derive(Debug)]
pub struct MergedPdf {
    document: Document,
    pages_id: ObjectId,
    page_count: usize,
}

impl MergedPdf {
    fn new() -> Self {
        let mut document = Document::with_version("1.7");

        let pages_id = document.new_object_id();
        document.objects.insert(
            pages_id,
            dictionary! {
                "Type" => "Pages",
                "Kids" => Vec::<Object>::new(),
                "Count" => 0,
            }
            .into(),
        );

        let catalog_id = document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        document.trailer.set("Root", catalog_id);

        Self {
            document,
            pages_id,
            page_count: 0,
        }
    }

    /// Number of pages appended so far.
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Borrow the underlying document.
    pub fn document(&self) -> &Document {
        &self.document
    }
}

/// [`DocumentCodec`] implementation for PDF files.
#[derive(Debug, Clone, Default)]
pub struct LopdfCodec {
    compression: CompressionLevel,
    metadata: Metadata,
}

impl LopdfCodec {
    /// Create a codec with standard compression and no metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the compression applied when encoding.
    pub fn with_compression(mut self, compression: CompressionLevel) -> Self {
        self.compression = compression;
        self
    }

    /// Set the metadata written to the output Info dictionary.
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }
}

#[async_trait]
impl DocumentCodec for LopdfCodec {
    type Decoded = Document;
    type Output = MergedPdf;

    fn new_output(&self) -> MergedPdf {
        MergedPdf::new()
    }

    async fn decode(&self, bytes: Vec<u8>, _cancel: &CancellationToken) -> Result<Document> {
        task::spawn_blocking(move || -> Result<Document> {
            let document = Document::load_mem(&bytes)?;

            if document.is_encrypted() {
                return Err(CombineError::other("document is encrypted"));
            }

            Ok(document)
        })
        .await
        .map_err(|e| CombineError::other(format!("decode task failed: {e}")))?
    }

    fn append_pages(&self, output: &mut MergedPdf, mut document: Document) -> Result<usize> {
        document.renumber_objects_with(output.document.max_id + 1);

        let page_ids: Vec<ObjectId> = document.get_pages().into_values().collect();

        for &page_id in &page_ids {
            let inherited = inherited_attributes(&document, page_id);
            let page = document.get_object_mut(page_id).and_then(Object::as_dict_mut)?;

            for (key, value) in inherited {
                if !page.has(key) {
                    page.set(key, value);
                }
            }
            page.set("Parent", output.pages_id);
        }

        output.document.max_id = output.document.max_id.max(document.max_id);
        output.document.objects.extend(document.objects);

        let pages = output
            .document
            .get_object_mut(output.pages_id)
            .and_then(Object::as_dict_mut)?;
        pages
            .get_mut(b"Kids")
            .and_then(Object::as_array_mut)?
            .extend(page_ids.iter().copied().map(Object::Reference));

        output.page_count += page_ids.len();
        pages.set("Count", output.page_count as i64);

        debug!(
            added = page_ids.len(),
            total = output.page_count,
            "appended pages"
        );
        Ok(page_ids.len())
    }

    async fn encode(&self, output: MergedPdf, _cancel: &CancellationToken) -> Result<Vec<u8>> {
        let compression = self.compression;
        let metadata = self.metadata.clone();

        task::spawn_blocking(move || -> Result<Vec<u8>> {
            let mut document = output.document;

            write_info(&mut document, &metadata);

            // Source catalogs and page tree nodes are unreachable now.
            document.prune_objects();

            match compression {
                CompressionLevel::None => {}
                CompressionLevel::Standard => document.compress(),
                CompressionLevel::Maximum => {
                    document.delete_zero_length_streams();
                    document.compress();
                }
            }

            document.renumber_objects();

            let mut buffer = Vec::new();
            document
                .save_to(&mut buffer)
                .map_err(|e| CombineError::encode(e.to_string()))?;

            Ok(buffer)
        })
        .await
        .map_err(|e| CombineError::encode(format!("encode task failed: {e}")))?
    }
}

/// Collect inheritable attributes from the ancestors of `page_id`.
///
/// The nearest ancestor wins.
fn inherited_attributes(document: &Document, page_id: ObjectId) -> Vec<(&'static [u8], Object)> {
    let mut found: Vec<(&'static [u8], Object)> = Vec::new();
    let mut current = parent_of(document.get_dictionary(page_id).ok());
    let mut depth = 0;

    while let Some(node_id) = current {
        depth += 1;
        if depth > MAX_TREE_DEPTH {
            break;
        }

        let Ok(node) = document.get_dictionary(node_id) else {
            break;
        };

        for key in INHERITABLE {
            if found.iter().any(|(k, _)| *k == key) {
                continue;
            }
            if let Ok(value) = node.get(key) {
                found.push((key, value.clone()));
            }
        }

        current = parent_of(Some(node));
    }

    found
}

fn parent_of(node: Option<&Dictionary>) -> Option<ObjectId> {
    node?.get(b"Parent").and_then(Object::as_reference).ok()
}

fn write_info(document: &mut Document, metadata: &Metadata) {
    let mut info = Dictionary::new();

    let fields = [
        ("Title", &metadata.title),
        ("Author", &metadata.author),
        ("Subject", &metadata.subject),
        ("Keywords", &metadata.keywords),
    ];
    for (key, value) in fields {
        if let Some(value) = value {
            info.set(key, text(value));
        }
    }
    info.set("Producer", text(PRODUCER));

    let info_id = document.add_object(info);
    document.trailer.set("Info", info_id);
}

fn text(value: &str) -> Object {
    Object::String(value.as_bytes().to_vec(), StringFormat::Literal)
}
