//! Shared helpers for the integration tests.
//!
//! Fixtures are generated on the fly: every page of a labelled document
//! draws a single string such as `A-Page-2`, so tests can check which
//! pages ended up in the output and in what order.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use pdfcombine::ingest::Candidate;

/// Build a PDF with `pages` pages labelled `{label}-Page-{n}`.
pub fn labelled_pdf(label: &str, pages: usize) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });

    let mut kids: Vec<Object> = Vec::new();
    for n in 1..=pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 18.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new(
                    "Tj",
                    vec![Object::string_literal(format!("{label}-Page-{n}"))],
                ),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("encode page content"),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => font_id },
            },
        });
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages as i64,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }
        .into(),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).expect("save fixture");
    buffer
}

/// Labels drawn on each page of `bytes`, in page order.
pub fn page_labels(bytes: &[u8]) -> Vec<String> {
    let doc = Document::load_mem(bytes).expect("load combined document");
    doc.get_pages()
        .values()
        .map(|&page_id| {
            let content = doc.get_page_content(page_id).expect("page content");
            let content = String::from_utf8_lossy(&content);
            let start = content.find('(').expect("label start") + 1;
            let end = content[start..].find(')').expect("label end") + start;
            content[start..end].to_string()
        })
        .collect()
}

/// Expected labels for `pages` pages of `label`.
pub fn expected_labels(label: &str, pages: usize) -> Vec<String> {
    (1..=pages).map(|n| format!("{label}-Page-{n}")).collect()
}

/// An in-memory PDF candidate.
pub fn pdf_candidate(label: &str, pages: usize) -> Candidate {
    Candidate::from_bytes(
        format!("{label}.pdf"),
        Some("application/pdf"),
        labelled_pdf(label, pages),
    )
}

/// A candidate that claims to be a PDF but is not one.
pub fn corrupt_candidate(name: &str) -> Candidate {
    Candidate::from_bytes(
        name,
        Some("application/pdf"),
        b"%PDF-1.7\nthis is not really a pdf".to_vec(),
    )
}

/// Write a labelled fixture into `dir` and return its path.
pub fn write_fixture(dir: &Path, label: &str, pages: usize) -> PathBuf {
    let path = dir.join(format!("{label}.pdf"));
    std::fs::write(&path, labelled_pdf(label, pages)).expect("write fixture");
    path
}
