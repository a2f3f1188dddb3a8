//! Mock collaborators for testing.
//!
//! [`MockPdfBackend`] serves a fixed list of pages for any path and
//! [`MockOcr`] returns canned text, both counting their calls so tests can
//! assert which pipeline ran.

use std::path::Path;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use image::{ColorType, DynamicImage, RgbImage};

use crate::backend::{BackendError, PdfBackend, PdfDocument};
use crate::ocr::{OcrEngine, OcrError};

/// One page served by [`MockPdfBackend`].
#[derive(Clone, Debug)]
pub enum MockPage {
    /// A page whose embedded text layer holds this string.
    Text(String),
    /// An image-only page; its text layer is `layer` (usually empty).
    Scanned { layer: String },
    /// A page whose text extraction fails.
    Broken(String),
}

impl MockPage {
    pub fn text(s: &str) -> Self {
        MockPage::Text(s.to_string())
    }

    pub fn scanned() -> Self {
        MockPage::Scanned {
            layer: String::new(),
        }
    }
}

#[derive(Default)]
struct Counters {
    opens: AtomicUsize,
    renders: AtomicUsize,
    open_documents: AtomicUsize,
}

/// A hand-rolled mock implementing [`PdfBackend`].
pub struct MockPdfBackend {
    pages: Vec<MockPage>,
    open_error: Option<String>,
    render_error: Option<String>,
    counters: Arc<Counters>,
}

impl MockPdfBackend {
    pub fn new(pages: Vec<MockPage>) -> Self {
        Self {
            pages,
            open_error: None,
            render_error: None,
            counters: Arc::new(Counters::default()),
        }
    }

    /// A backend whose `open` always fails with `message`.
    pub fn failing_open(message: &str) -> Self {
        Self {
            open_error: Some(message.to_string()),
            ..Self::new(Vec::new())
        }
    }

    /// Make every `render_page` call fail with `message`.
    pub fn with_render_error(mut self, message: &str) -> Self {
        self.render_error = Some(message.to_string());
        self
    }

    /// How many times `open()` has been called.
    pub fn open_count(&self) -> usize {
        self.counters.opens.load(Ordering::SeqCst)
    }

    /// How many pages have been rasterized.
    pub fn render_count(&self) -> usize {
        self.counters.renders.load(Ordering::SeqCst)
    }

    /// Documents opened but not yet dropped.
    pub fn open_documents(&self) -> usize {
        self.counters.open_documents.load(Ordering::SeqCst)
    }
}

impl PdfBackend for MockPdfBackend {
    fn open(&self, _path: &Path) -> Result<Box<dyn PdfDocument>, BackendError> {
        self.counters.opens.fetch_add(1, Ordering::SeqCst);
        if let Some(msg) = &self.open_error {
            return Err(BackendError::Open(msg.clone()));
        }
        self.counters.open_documents.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockDocument {
            pages: self.pages.clone(),
            render_error: self.render_error.clone(),
            counters: Arc::clone(&self.counters),
        }))
    }
}

struct MockDocument {
    pages: Vec<MockPage>,
    render_error: Option<String>,
    counters: Arc<Counters>,
}

impl PdfDocument for MockDocument {
    fn page_count(&self) -> Result<usize, BackendError> {
        Ok(self.pages.len())
    }

    fn page_text(&self, page: usize) -> Result<String, BackendError> {
        match &self.pages[page] {
            MockPage::Text(s) => Ok(s.clone()),
            MockPage::Scanned { layer } => Ok(layer.clone()),
            MockPage::Broken(msg) => Err(BackendError::Text {
                page,
                message: msg.clone(),
            }),
        }
    }

    fn render_page(&self, page: usize) -> Result<RgbImage, BackendError> {
        self.counters.renders.fetch_add(1, Ordering::SeqCst);
        if let Some(msg) = &self.render_error {
            return Err(BackendError::Render {
                page,
                message: msg.clone(),
            });
        }
        Ok(RgbImage::new(4, 4))
    }
}

impl Drop for MockDocument {
    fn drop(&mut self) {
        self.counters.open_documents.fetch_sub(1, Ordering::SeqCst);
    }
}

/// What [`MockOcr`] saw for one call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeenImage {
    pub color: ColorType,
    pub width: u32,
    pub height: u32,
    /// True when every sample is 0 or 255.
    pub binary: bool,
}

/// A hand-rolled mock implementing [`OcrEngine`].
///
/// Returns responses in order, repeating the last one once exhausted.
pub struct MockOcr {
    responses: Mutex<Vec<Result<String, String>>>,
    fallback: Result<String, String>,
    seen: Mutex<Vec<SeenImage>>,
    call_count: AtomicUsize,
}

impl MockOcr {
    /// A mock that always recognizes `text`.
    pub fn new(text: &str) -> Self {
        Self::with_sequence(vec![text])
    }

    /// A mock that returns `texts` in order, repeating the last one.
    pub fn with_sequence(texts: Vec<&str>) -> Self {
        Self::from_results(texts.into_iter().map(|t| Ok(t.to_string())).collect())
    }

    /// A mock whose every call fails with `message`.
    pub fn failing(message: &str) -> Self {
        Self::from_results(vec![Err(message.to_string())])
    }

    fn from_results(mut responses: Vec<Result<String, String>>) -> Self {
        assert!(
            !responses.is_empty(),
            "sequence must have at least one response"
        );
        // Reverse so we can pop() from the front cheaply.
        responses.reverse();
        let fallback = responses[0].clone();
        Self {
            responses: Mutex::new(responses),
            fallback,
            seen: Mutex::new(Vec::new()),
            call_count: AtomicUsize::new(0),
        }
    }

    /// How many times `recognize()` has been called.
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Images passed to `recognize()`, in call order.
    pub fn seen(&self) -> Vec<SeenImage> {
        self.seen.lock().unwrap().clone()
    }
}

impl OcrEngine for MockOcr {
    fn name(&self) -> &str {
        "mock"
    }

    fn recognize(&self, image: &DynamicImage) -> Result<String, OcrError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(SeenImage {
            color: image.color(),
            width: image.width(),
            height: image.height(),
            binary: image.as_bytes().iter().all(|b| *b == 0 || *b == 255),
        });

        let response = self
            .responses
            .lock()
            .unwrap()
            .pop()
            .unwrap_or_else(|| self.fallback.clone());
        response.map_err(OcrError::Recognize)
    }
}
