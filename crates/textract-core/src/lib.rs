use std::error::Error as StdError;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod backend;
pub mod config_file;
pub mod extractor;
pub mod mock;
pub mod ocr;
pub mod preprocess;

pub use backend::{BackendError, PdfBackend, PdfDocument};
pub use extractor::{Extractor, is_blank};
pub use ocr::{OcrEngine, OcrError};

/// Image extensions routed to the OCR pipeline (lowercase, without the dot).
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "tiff", "bmp", "gif"];

/// Errors surfaced by [`Extractor::extract`].
///
/// Collaborator failures (PDF backend, image decoding, OCR) are all folded into
/// [`ExtractError::Extraction`], which keeps the original error as its source.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("unsupported file format: {}", display_ext(.0))]
    UnsupportedFormat(String),
    #[error("{context}")]
    Extraction {
        context: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
}

fn display_ext(ext: &str) -> &str {
    if ext.is_empty() { "(no extension)" } else { ext }
}

impl ExtractError {
    pub(crate) fn extraction(
        context: impl Into<String>,
        source: impl Into<Box<dyn StdError + Send + Sync>>,
    ) -> Self {
        Self::Extraction {
            context: context.into(),
            source: source.into(),
        }
    }
}

/// Which pipeline a file is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Pdf,
    Image,
}

impl FileKind {
    /// Classify a path by its extension (case-insensitive).
    ///
    /// The file is never opened. Unknown or missing extensions yield
    /// [`ExtractError::UnsupportedFormat`] carrying the extension in `.ext`
    /// form, or an empty string when there is none.
    pub fn from_path(path: &Path) -> Result<Self, ExtractError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "pdf" => Ok(FileKind::Pdf),
            e if IMAGE_EXTENSIONS.contains(&e) => Ok(FileKind::Image),
            "" => Err(ExtractError::UnsupportedFormat(String::new())),
            e => Err(ExtractError::UnsupportedFormat(format!(".{e}"))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FileKind::Pdf => "pdf",
            FileKind::Image => "image",
        }
    }
}

/// Where the text of a single PDF page came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSource {
    /// The page's embedded text layer.
    Embedded,
    /// OCR over the rasterized page, because the text layer was blank.
    Ocr,
}

/// Detailed result of one extraction call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub kind: FileKind,
    /// Final text, trimmed of leading/trailing whitespace.
    pub text: String,
    /// Per-page provenance, in document order. Empty for images.
    pub pages: Vec<PageSource>,
}

impl Extraction {
    /// Number of PDF pages whose text had to be recovered with OCR.
    pub fn ocr_page_count(&self) -> usize {
        self.pages.iter().filter(|p| **p == PageSource::Ocr).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_pdf_case_insensitively() {
        assert_eq!(
            FileKind::from_path(Path::new("file.pdf")).unwrap(),
            FileKind::Pdf
        );
        assert_eq!(
            FileKind::from_path(Path::new("FILE.PDF")).unwrap(),
            FileKind::Pdf
        );
    }

    #[test]
    fn classifies_every_image_extension() {
        for ext in ["png", "JPG", "jpeg", "Tiff", "bmp", "GIF"] {
            let path = PathBuf::from(format!("scan.{ext}"));
            assert_eq!(FileKind::from_path(&path).unwrap(), FileKind::Image, "{ext}");
        }
    }

    #[test]
    fn unsupported_extension_is_reported_with_dot() {
        match FileKind::from_path(Path::new("data.csv")) {
            Err(ExtractError::UnsupportedFormat(ext)) => assert_eq!(ext, ".csv"),
            other => panic!("expected UnsupportedFormat, got {other:?}"),
        }
    }

    #[test]
    fn missing_extension_is_unsupported() {
        match FileKind::from_path(Path::new("README")) {
            Err(ExtractError::UnsupportedFormat(ext)) => assert!(ext.is_empty()),
            other => panic!("expected UnsupportedFormat, got {other:?}"),
        }
    }

    #[test]
    fn unsupported_message_mentions_extension() {
        let err = FileKind::from_path(Path::new("notes.docx")).unwrap_err();
        assert!(err.to_string().contains(".docx"));
    }

    #[test]
    fn unsupported_message_is_plain_text() {
        let err = FileKind::from_path(Path::new("data.csv")).unwrap_err();
        assert_eq!(err.to_string(), "unsupported file format: .csv");

        let err = FileKind::from_path(Path::new("README")).unwrap_err();
        assert_eq!(err.to_string(), "unsupported file format: (no extension)");
    }

    #[test]
    fn extraction_error_keeps_source() {
        let io = std::io::Error::other("corrupt xref table");
        let err = ExtractError::extraction("failed to open PDF", io);
        assert_eq!(err.to_string(), "failed to open PDF");
        let source = StdError::source(&err).expect("source retained");
        assert_eq!(source.to_string(), "corrupt xref table");
    }

    #[test]
    fn ocr_page_count_counts_only_ocr_pages() {
        let extraction = Extraction {
            kind: FileKind::Pdf,
            text: String::new(),
            pages: vec![PageSource::Embedded, PageSource::Ocr, PageSource::Ocr],
        };
        assert_eq!(extraction.ocr_page_count(), 2);
    }
}
