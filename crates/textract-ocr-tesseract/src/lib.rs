use std::path::{Path, PathBuf};

use image::DynamicImage;
use tesseract::Tesseract;

use textract_core::{OcrEngine, OcrError};

/// Trained-data language used for every recognition.
const LANGUAGE: &str = "eng";

/// Tesseract-based implementation of [`OcrEngine`].
///
/// A fresh Tesseract instance is created per call, so the engine itself holds
/// no native state and can be shared across threads.
#[derive(Debug, Default, Clone)]
pub struct TesseractEngine {
    /// Directory containing `eng.traineddata`. `None` lets Tesseract fall
    /// back to `TESSDATA_PREFIX` or its compiled-in default.
    datapath: Option<PathBuf>,
}

impl TesseractEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use trained data from `dir` instead of the default location.
    pub fn with_datapath(mut self, dir: impl Into<PathBuf>) -> Self {
        self.datapath = Some(dir.into());
        self
    }

    pub fn datapath(&self) -> Option<&Path> {
        self.datapath.as_deref()
    }
}

impl OcrEngine for TesseractEngine {
    fn name(&self) -> &str {
        "tesseract"
    }

    fn recognize(&self, image: &DynamicImage) -> Result<String, OcrError> {
        let frame = Frame::from_image(image)?;

        let datapath = match &self.datapath {
            Some(dir) => Some(
                dir.to_str()
                    .ok_or_else(|| OcrError::Init("invalid tessdata path encoding".into()))?,
            ),
            None => None,
        };

        let text = Tesseract::new(datapath, Some(LANGUAGE))
            .map_err(|e| OcrError::Init(e.to_string()))?
            .set_frame(
                &frame.data,
                frame.width,
                frame.height,
                frame.bytes_per_pixel,
                frame.bytes_per_line,
            )
            .map_err(|e| OcrError::Image(e.to_string()))?
            .recognize()
            .map_err(|e| OcrError::Recognize(e.to_string()))?
            .get_text()
            .map_err(|e| OcrError::Recognize(e.to_string()))?;

        tracing::trace!(
            width = frame.width,
            height = frame.height,
            chars = text.len(),
            "tesseract recognized"
        );
        Ok(text)
    }
}

/// Raw pixel layout handed to `TessBaseAPI::SetImage`.
#[derive(Debug, PartialEq, Eq)]
struct Frame {
    data: Vec<u8>,
    width: i32,
    height: i32,
    bytes_per_pixel: i32,
    bytes_per_line: i32,
}

impl Frame {
    /// Grayscale images are passed through as one byte per pixel; anything
    /// else is converted to packed RGB.
    fn from_image(image: &DynamicImage) -> Result<Self, OcrError> {
        let (data, bytes_per_pixel) = match image {
            DynamicImage::ImageLuma8(gray) => (gray.as_raw().clone(), 1),
            other => (other.to_rgb8().into_raw(), 3),
        };

        let width = dimension(image.width())?;
        let height = dimension(image.height())?;
        if width == 0 || height == 0 {
            return Err(OcrError::Image(format!(
                "empty image ({}x{})",
                image.width(),
                image.height()
            )));
        }

        Ok(Self {
            data,
            width,
            height,
            bytes_per_pixel,
            bytes_per_line: row_bytes(width, bytes_per_pixel)?,
        })
    }
}

fn row_bytes(width: i32, bytes_per_pixel: i32) -> Result<i32, OcrError> {
    width
        .checked_mul(bytes_per_pixel)
        .ok_or_else(|| OcrError::Image(format!("image row of {width} pixels too large")))
}

fn dimension(value: u32) -> Result<i32, OcrError> {
    i32::try_from(value).map_err(|_| OcrError::Image(format!("image dimension {value} too large")))
}
