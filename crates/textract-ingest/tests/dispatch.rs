//! Facade tests. Missing and unsupported files are rejected before either
//! native library is touched; the corrupt-PDF case goes through MuPDF's
//! open, and none of them reach Tesseract.

use std::path::Path;

use textract_ingest::{ExtractError, extract};

#[test]
fn missing_png_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.png");
    assert!(matches!(extract(&path), Err(ExtractError::NotFound(_))));
}

#[test]
fn missing_pdf_is_not_found() {
    assert!(matches!(
        extract(Path::new("does/not/exist/report.pdf")),
        Err(ExtractError::NotFound(_))
    ));
}

#[test]
fn csv_is_unsupported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.csv");
    std::fs::write(&path, "a,b\n1,2\n").unwrap();

    match extract(&path) {
        Err(ExtractError::UnsupportedFormat(ext)) => assert_eq!(ext, ".csv"),
        other => panic!("expected UnsupportedFormat, got {other:?}"),
    }
}

#[cfg(feature = "pdf")]
#[test]
fn corrupt_pdf_is_extraction_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("corrupt.pdf");
    std::fs::write(&path, b"this is not a pdf").unwrap();

    assert!(matches!(
        extract(&path),
        Err(ExtractError::Extraction { .. })
    ));
}
