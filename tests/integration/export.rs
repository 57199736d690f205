//! Exporting a combined document.

use pdfcombine::MergeSession;
use pdfcombine::codec::LopdfCodec;
use pdfcombine::error::CombineError;
use pdfcombine::export::{ArtifactExporter, SaveToDirectory, SaveToPath};
use pdfcombine::ingest::SizeLimits;
use pdfcombine::merge::NoProgress;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

use super::common::{page_labels, pdf_candidate};

/// Session whose scratch files live under `scratch`.
async fn combined_session(scratch: &TempDir) -> MergeSession<LopdfCodec> {
    let mut session = MergeSession::new(LopdfCodec::new(), SizeLimits::default())
        .with_exporter(ArtifactExporter::with_scratch_root(scratch.path()));
    session
        .add_candidates(vec![pdf_candidate("A", 2), pdf_candidate("B", 1)])
        .unwrap();
    session
        .combine(&mut NoProgress, &CancellationToken::new())
        .await
        .unwrap();
    session
}

fn is_empty_dir(dir: &TempDir) -> bool {
    std::fs::read_dir(dir.path()).unwrap().next().is_none()
}

#[tokio::test]
async fn test_export_to_path_writes_combined_document() {
    let scratch = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    let session = combined_session(&scratch).await;
    let destination = target.path().join("report.pdf");

    let outcome = session
        .export("report.pdf", &SaveToPath::new(&destination, false))
        .await
        .unwrap();

    assert_eq!(outcome.destination, destination);
    assert_eq!(outcome.digest.len(), 64);

    let written = std::fs::read(&destination).unwrap();
    assert_eq!(written.len() as u64, outcome.size_bytes);
    assert_eq!(page_labels(&written), ["A-Page-1", "A-Page-2", "B-Page-1"]);
    assert!(is_empty_dir(&scratch), "scratch files must be released");
}

#[tokio::test]
async fn test_export_to_directory_uses_default_name() {
    let scratch = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    let session = combined_session(&scratch).await;

    let outcome = session
        .export("", &SaveToDirectory::new(target.path(), false))
        .await
        .unwrap();

    assert_eq!(outcome.name, "combined.pdf");
    assert!(target.path().join("combined.pdf").is_file());
}

#[tokio::test]
async fn test_failed_delivery_still_releases_scratch() {
    let scratch = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    let session = combined_session(&scratch).await;
    let destination = target.path().join("taken.pdf");
    std::fs::write(&destination, b"keep me").unwrap();

    let err = session
        .export("taken.pdf", &SaveToPath::new(&destination, false))
        .await
        .unwrap_err();

    assert!(matches!(err, CombineError::OutputExists { .. }));
    assert_eq!(std::fs::read(&destination).unwrap(), b"keep me");
    assert!(is_empty_dir(&scratch));
}

#[tokio::test]
async fn test_stale_result_cannot_be_exported() {
    let scratch = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    let mut session = combined_session(&scratch).await;
    session.move_down(0).unwrap();

    let result = session
        .export("x.pdf", &SaveToDirectory::new(target.path(), true))
        .await;

    assert!(result.is_err());
    assert!(is_empty_dir(&target));
}
