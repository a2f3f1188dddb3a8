use std::path::Path;

use textract_core::config_file::ConfigFile;
use textract_core::{Extractor, PdfBackend};
use textract_ocr_tesseract::TesseractEngine;

// Re-export domain types for convenience
pub use textract_core::{ExtractError, Extraction, FileKind, PageSource};

/// Extract text from a PDF or image file.
///
/// Dispatches on file extension:
/// - `.pdf` → MuPDF text layer, Tesseract for blank pages (requires `pdf`
///   feature / mupdf)
/// - `.png`/`.jpg`/`.jpeg`/`.tiff`/`.bmp`/`.gif` → Otsu binarization + Tesseract
/// - anything else → [`ExtractError::UnsupportedFormat`]
pub fn extract(path: &Path) -> Result<String, ExtractError> {
    extract_detailed(path).map(|e| e.text)
}

/// Like [`extract`], also reporting per-page provenance.
pub fn extract_detailed(path: &Path) -> Result<Extraction, ExtractError> {
    run(path, &TesseractEngine::default())
}

/// Extract using settings from an on-disk config (e.g. `[ocr] tessdata_dir`).
pub fn extract_with_config(path: &Path, config: &ConfigFile) -> Result<Extraction, ExtractError> {
    run(path, &engine_for(config))
}

fn engine_for(config: &ConfigFile) -> TesseractEngine {
    match config.tessdata_dir() {
        Some(dir) => TesseractEngine::new().with_datapath(dir),
        None => TesseractEngine::new(),
    }
}

fn run(path: &Path, ocr: &TesseractEngine) -> Result<Extraction, ExtractError> {
    let backend = pdf_backend();
    tracing::debug!(path = %path.display(), tessdata = ?ocr.datapath(), "starting extraction");
    Extractor::new(&backend, ocr).extract_detailed(path)
}

#[cfg(feature = "pdf")]
fn pdf_backend() -> impl PdfBackend {
    textract_pdf_mupdf::MupdfBackend::default()
}

#[cfg(not(feature = "pdf"))]
fn pdf_backend() -> impl PdfBackend {
    NoPdfSupport
}

/// Stand-in backend when mupdf is not compiled in; every open fails.
#[cfg(not(feature = "pdf"))]
struct NoPdfSupport;

#[cfg(not(feature = "pdf"))]
impl PdfBackend for NoPdfSupport {
    fn open(
        &self,
        _path: &Path,
    ) -> Result<Box<dyn textract_core::PdfDocument>, textract_core::BackendError> {
        Err(textract_core::BackendError::Open(
            "PDF support not compiled in (enable the `pdf` feature of textract-ingest)".into(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use textract_core::config_file::OcrConfig;

    #[test]
    fn engine_uses_configured_tessdata() {
        let config = ConfigFile {
            ocr: Some(OcrConfig {
                tessdata_dir: Some("/srv/tessdata".into()),
            }),
            ..Default::default()
        };
        assert_eq!(
            engine_for(&config).datapath(),
            Some(Path::new("/srv/tessdata"))
        );
        assert!(engine_for(&ConfigFile::default()).datapath().is_none());
    }

    #[cfg(not(feature = "pdf"))]
    #[test]
    fn pdf_without_feature_is_extraction_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.pdf");
        std::fs::write(&path, b"%PDF-1.7").unwrap();

        let err = extract(&path).unwrap_err();
        assert!(matches!(err, ExtractError::Extraction { .. }));
        let source = std::error::Error::source(&err).unwrap();
        assert!(source.to_string().contains("`pdf` feature"));
    }
}
