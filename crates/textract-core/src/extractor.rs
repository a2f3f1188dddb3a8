use std::path::Path;

use image::DynamicImage;

use crate::backend::PdfBackend;
use crate::ocr::OcrEngine;
use crate::preprocess;
use crate::{ExtractError, Extraction, FileKind, PageSource};

/// Extracts plain text from a PDF or raster image.
///
/// Pipeline:
/// 1. Reject missing files, then classify by extension
/// 2. PDFs: take each page's embedded text, rasterizing and OCR-ing pages
///    whose text layer is blank
/// 3. Images: decode to grayscale, binarize with Otsu, OCR
///
/// Every call is independent; the extractor holds no state besides its
/// collaborators.
pub struct Extractor<'a> {
    pdf: &'a dyn PdfBackend,
    ocr: &'a dyn OcrEngine,
}

impl std::fmt::Debug for Extractor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Extractor")
            .field("ocr", &self.ocr.name())
            .finish_non_exhaustive()
    }
}

impl<'a> Extractor<'a> {
    pub fn new(pdf: &'a dyn PdfBackend, ocr: &'a dyn OcrEngine) -> Self {
        Self { pdf, ocr }
    }

    /// Extract the text of `path`, trimmed.
    ///
    /// A source with no recoverable text yields an empty string; use
    /// [`Extractor::extract_detailed`] to see which pages went through OCR.
    pub fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        self.extract_detailed(path).map(|e| e.text)
    }

    /// Like [`Extractor::extract`], also reporting the file kind and the
    /// provenance of each PDF page.
    pub fn extract_detailed(&self, path: &Path) -> Result<Extraction, ExtractError> {
        if !path.is_file() {
            return Err(ExtractError::NotFound(path.to_path_buf()));
        }

        let kind = FileKind::from_path(path)?;
        let extraction = match kind {
            FileKind::Pdf => self.extract_pdf(path)?,
            FileKind::Image => self.extract_image(path)?,
        };

        tracing::info!(
            path = %path.display(),
            kind = kind.as_str(),
            pages = extraction.pages.len(),
            ocr_pages = extraction.ocr_page_count(),
            chars = extraction.text.len(),
            "extracted text"
        );
        Ok(extraction)
    }

    fn extract_pdf(&self, path: &Path) -> Result<Extraction, ExtractError> {
        // Dropped on every return path, which closes the document.
        let document = self
            .pdf
            .open(path)
            .map_err(|e| ExtractError::extraction("error reading PDF: failed to open", e))?;

        let page_count = document
            .page_count()
            .map_err(|e| ExtractError::extraction("error reading PDF: failed to list pages", e))?;

        let mut text = String::new();
        let mut pages = Vec::with_capacity(page_count);

        for index in 0..page_count {
            let embedded = document.page_text(index).map_err(|e| {
                ExtractError::extraction(format!("error reading PDF page {}", index + 1), e)
            })?;

            let (page_text, source) = if is_blank(&embedded) {
                let pixels = document.render_page(index).map_err(|e| {
                    ExtractError::extraction(format!("error rendering PDF page {}", index + 1), e)
                })?;
                let recognized = self
                    .ocr
                    .recognize(&DynamicImage::ImageRgb8(pixels))
                    .map_err(|e| {
                        ExtractError::extraction(format!("OCR failed on PDF page {}", index + 1), e)
                    })?;
                if is_blank(&recognized) {
                    tracing::warn!(page = index + 1, "page has no embedded text and OCR found none");
                }
                (recognized, PageSource::Ocr)
            } else {
                (embedded, PageSource::Embedded)
            };

            tracing::debug!(
                page = index + 1,
                source = ?source,
                chars = page_text.len(),
                "page extracted"
            );
            text.push_str(&page_text);
            text.push('\n');
            pages.push(source);
        }

        Ok(Extraction {
            kind: FileKind::Pdf,
            text: text.trim().to_string(),
            pages,
        })
    }

    fn extract_image(&self, path: &Path) -> Result<Extraction, ExtractError> {
        let gray = image::open(path)
            .map_err(|e| ExtractError::extraction("error reading image: failed to decode", e))?
            .to_luma8();

        let binary = DynamicImage::ImageLuma8(preprocess::binarize(&gray));

        let text = self
            .ocr
            .recognize(&binary)
            .map_err(|e| ExtractError::extraction("error reading image: OCR failed", e))?;

        Ok(Extraction {
            kind: FileKind::Image,
            text: text.trim().to_string(),
            pages: Vec::new(),
        })
    }
}

/// True when a page's text is empty or whitespace-only.
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}
