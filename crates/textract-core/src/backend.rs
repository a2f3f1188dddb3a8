use std::path::Path;

use image::RgbImage;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("failed to open PDF: {0}")]
    Open(String),
    #[error("failed to extract text from page {page}: {message}")]
    Text { page: usize, message: String },
    #[error("failed to render page {page}: {message}")]
    Render { page: usize, message: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for PDF backends.
///
/// A backend only knows how to open a file; everything page-level goes
/// through the returned [`PdfDocument`]. The OCR fallback and text assembly
/// live in [`crate::Extractor`].
pub trait PdfBackend: Send + Sync {
    /// Open and parse the document at `path`.
    fn open(&self, path: &Path) -> Result<Box<dyn PdfDocument>, BackendError>;
}

/// An open PDF document.
///
/// The handle owns the underlying library resources and releases them when
/// dropped. Page indices are zero-based and only valid while the handle lives.
pub trait PdfDocument {
    fn page_count(&self) -> Result<usize, BackendError>;

    /// Embedded text of one page as plain text. Image-only pages yield an
    /// empty or whitespace-only string.
    fn page_text(&self, page: usize) -> Result<String, BackendError>;

    /// Rasterize the full page to RGB at the backend's default resolution.
    fn render_page(&self, page: usize) -> Result<RgbImage, BackendError>;
}
