use std::error::Error;
use std::io::Write;

use owo_colors::OwoColorize;
use textract_core::{Extraction, FileKind, PageSource};

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// Print where each page's text came from.
pub fn print_page_summary(
    w: &mut dyn Write,
    file_name: &str,
    extraction: &Extraction,
    color: ColorMode,
) -> std::io::Result<()> {
    match extraction.kind {
        FileKind::Image => {
            writeln!(w, "{}: image, OCR ({} chars)", file_name, extraction.text.len())?;
        }
        FileKind::Pdf => {
            writeln!(
                w,
                "{}: PDF, {} pages ({} via OCR)",
                file_name,
                extraction.pages.len(),
                extraction.ocr_page_count()
            )?;
            for (i, source) in extraction.pages.iter().enumerate() {
                let label = match source {
                    PageSource::Embedded => "embedded",
                    PageSource::Ocr => "ocr",
                };
                if color.enabled() && *source == PageSource::Ocr {
                    writeln!(w, "  page {:>3}: {}", i + 1, label.yellow())?;
                } else {
                    writeln!(w, "  page {:>3}: {}", i + 1, label)?;
                }
            }
        }
    }
    if extraction.text.is_empty() {
        if color.enabled() {
            writeln!(w, "{}", "(no text recovered)".dimmed())?;
        } else {
            writeln!(w, "(no text recovered)")?;
        }
    }
    Ok(())
}

/// Print an error and its source chain, one cause per line.
pub fn print_error(
    w: &mut dyn Write,
    err: &(dyn Error + 'static),
    color: ColorMode,
) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{} {}", "error:".red().bold(), err)?;
    } else {
        writeln!(w, "error: {}", err)?;
    }
    let mut source = err.source();
    while let Some(cause) = source {
        writeln!(w, "  caused by: {}", cause)?;
        source = cause.source();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(extraction: &Extraction) -> String {
        let mut buf = Vec::new();
        print_page_summary(&mut buf, "report.pdf", extraction, ColorMode(false)).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn pdf_summary_lists_pages() {
        let out = render(&Extraction {
            kind: FileKind::Pdf,
            text: "Q1 Summary\nQ2 Summary".into(),
            pages: vec![PageSource::Embedded, PageSource::Ocr],
        });
        assert!(out.starts_with("report.pdf: PDF, 2 pages (1 via OCR)\n"));
        assert!(out.contains("page   1: embedded"));
        assert!(out.contains("page   2: ocr"));
        assert!(!out.contains("no text recovered"));
    }

    #[test]
    fn empty_result_is_flagged() {
        let out = render(&Extraction {
            kind: FileKind::Image,
            text: String::new(),
            pages: vec![],
        });
        assert!(out.contains("image, OCR (0 chars)"));
        assert!(out.contains("(no text recovered)"));
    }

    #[test]
    fn error_chain_is_printed() {
        let err = textract_core::FileKind::from_path(std::path::Path::new("x.csv")).unwrap_err();
        let mut buf = Vec::new();
        print_error(&mut buf, &err, ColorMode(false)).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert!(out.starts_with("error: unsupported file format"));
        assert!(out.contains(".csv"));
    }
}
