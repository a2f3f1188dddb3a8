use std::path::Path;

use image::RgbImage;
use mupdf::{Colorspace, Document, Matrix, Page, TextPageFlags};

use textract_core::{BackendError, PdfBackend, PdfDocument};

/// MuPDF-based implementation of [`PdfBackend`].
///
/// This crate is the sole AGPL island: it isolates the mupdf dependency
/// (which is AGPL-3.0) so that `textract-core` and the OCR crate do not
/// depend on it. The `textract-ingest` facade links it only with its `pdf`
/// feature.
///
/// Pages are rendered with the identity transform, i.e. MuPDF's default
/// 72 dpi, to device RGB without alpha.
#[derive(Debug, Default, Clone, Copy)]
pub struct MupdfBackend;

impl MupdfBackend {
    pub fn new() -> Self {
        Self
    }
}

impl PdfBackend for MupdfBackend {
    fn open(&self, path: &Path) -> Result<Box<dyn PdfDocument>, BackendError> {
        let path_str = path
            .to_str()
            .ok_or_else(|| BackendError::Open("invalid path encoding".into()))?;

        let document = Document::open(path_str).map_err(|e| BackendError::Open(e.to_string()))?;
        tracing::debug!(path = %path.display(), "opened PDF with MuPDF");

        Ok(Box::new(MupdfDocument { document }))
    }
}

/// An open MuPDF document. The native handle is freed on drop.
pub struct MupdfDocument {
    document: Document,
}

impl MupdfDocument {
    fn load_page(&self, page: usize) -> Result<Page, String> {
        let index = i32::try_from(page).map_err(|_| format!("page index {page} out of range"))?;
        self.document.load_page(index).map_err(|e| e.to_string())
    }
}

impl PdfDocument for MupdfDocument {
    fn page_count(&self) -> Result<usize, BackendError> {
        let count = self
            .document
            .page_count()
            .map_err(|e| BackendError::Open(e.to_string()))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    fn page_text(&self, page: usize) -> Result<String, BackendError> {
        let text_err = |message: String| BackendError::Text { page, message };

        let loaded = self.load_page(page).map_err(text_err)?;
        let text_page = loaded
            .to_text_page(TextPageFlags::empty())
            .map_err(|e| text_err(e.to_string()))?;

        // Use block/line iteration to match PyMuPDF's get_text() behavior
        let blocks = text_page.blocks().map(|block| {
            block
                .lines()
                .map(|line| {
                    line.chars()
                        .map(|c| c.char().unwrap_or('\u{FFFD}'))
                        .collect::<String>()
                })
                .collect::<Vec<_>>()
        });
        Ok(assemble_lines(blocks))
    }

    fn render_page(&self, page: usize) -> Result<RgbImage, BackendError> {
        let render_err = |message: String| BackendError::Render { page, message };

        let loaded = self.load_page(page).map_err(render_err)?;
        let pixmap = loaded
            .to_pixmap(&Matrix::IDENTITY, &Colorspace::device_rgb(), false, true)
            .map_err(|e| render_err(e.to_string()))?;

        let image = pixmap_to_rgb(
            pixmap.width() as u32,
            pixmap.height() as u32,
            pixmap.n() as usize,
            pixmap.stride() as usize,
            pixmap.samples(),
        )
        .map_err(render_err)?;

        tracing::debug!(
            page = page + 1,
            width = image.width(),
            height = image.height(),
            "rendered page"
        );
        Ok(image)
    }
}

/// Join text lines block by block, each line terminated by `\n`.
/// Block boundaries add nothing extra.
fn assemble_lines(blocks: impl Iterator<Item = Vec<String>>) -> String {
    let mut page_text = String::new();
    for line in blocks.flatten() {
        page_text.push_str(&line);
        page_text.push('\n');
    }
    page_text
}

/// Copy MuPDF pixmap samples into a packed [`RgbImage`].
///
/// Rows may be padded past `width * channels` bytes; a trailing alpha channel
/// is dropped.
fn pixmap_to_rgb(
    width: u32,
    height: u32,
    channels: usize,
    stride: usize,
    samples: &[u8],
) -> Result<RgbImage, String> {
    if channels != 3 && channels != 4 {
        return Err(format!("expected RGB pixmap, got {channels} channels"));
    }
    if height == 0 {
        return Ok(RgbImage::new(width, 0));
    }
    let row_len = width as usize * channels;
    if stride < row_len || samples.len() < stride * (height as usize - 1) + row_len {
        return Err(format!(
            "pixmap buffer too small: {} bytes for {width}x{height} (stride {stride})",
            samples.len()
        ));
    }

    let mut packed = Vec::with_capacity(width as usize * height as usize * 3);
    for row in 0..height as usize {
        let start = row * stride;
        let line = &samples[start..start + row_len];
        if channels == 3 {
            packed.extend_from_slice(line);
        } else {
            for px in line.chunks_exact(4) {
                packed.extend_from_slice(&px[..3]);
            }
        }
    }

    RgbImage::from_raw(width, height, packed).ok_or_else(|| "pixmap size mismatch".to_string())
}
