use image::DynamicImage;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OcrError {
    #[error("failed to initialize OCR engine: {0}")]
    Init(String),
    #[error("OCR engine rejected image: {0}")]
    Image(String),
    #[error("OCR recognition failed: {0}")]
    Recognize(String),
}

/// Trait for OCR engines.
///
/// Engines receive a decoded image and return whatever text they recognize,
/// untrimmed. Recognizing nothing is `Ok(String::new())`, not an error.
pub trait OcrEngine: Send + Sync {
    /// Engine identifier used in logs (e.g. "tesseract").
    fn name(&self) -> &str;

    fn recognize(&self, image: &DynamicImage) -> Result<String, OcrError>;
}
