use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use textract_core::config_file::{self, ConfigFile, OcrConfig};
use tracing_subscriber::EnvFilter;

mod output;

use output::ColorMode;

/// Extract plain text from a PDF or scanned image, falling back to OCR
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the .pdf, .png, .jpg, .jpeg, .tiff, .bmp or .gif file
    file_path: PathBuf,

    /// Write the extracted text to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Directory containing Tesseract trained data (eng.traineddata)
    #[arg(long, env = "TEXTRACT_TESSDATA")]
    tessdata: Option<PathBuf>,

    /// Print a per-page summary (embedded text vs. OCR) to stderr
    #[arg(long)]
    pages: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Log extraction progress (equivalent to RUST_LOG=debug)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Resolve configuration: CLI flags > env vars > config file > defaults
    let file_config = config_file::load_config();
    let config = resolve_config(&cli, file_config);
    let color = ColorMode(!cli.no_color && !config.no_color());

    let extraction = match textract_ingest::extract_with_config(&cli.file_path, &config) {
        Ok(extraction) => extraction,
        Err(e) => {
            output::print_error(&mut std::io::stderr(), &e, color)?;
            return Ok(ExitCode::FAILURE);
        }
    };

    if cli.pages {
        let file_name = cli
            .file_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| cli.file_path.display().to_string());
        output::print_page_summary(&mut std::io::stderr(), &file_name, &extraction, color)?;
    }

    let mut writer: Box<dyn Write> = if let Some(ref output_path) = cli.output {
        Box::new(std::fs::File::create(output_path)?)
    } else {
        Box::new(std::io::stdout())
    };
    writeln!(writer, "{}", extraction.text)?;
    writer.flush()?;

    Ok(ExitCode::SUCCESS)
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Layer command-line values over the loaded config file.
fn resolve_config(cli: &Cli, file_config: ConfigFile) -> ConfigFile {
    let flags = ConfigFile {
        ocr: Some(OcrConfig {
            tessdata_dir: cli
                .tessdata
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
        }),
        output: None,
    };
    config_file::merge(file_config, flags)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_overrides_config_file() {
        let cli = Cli::parse_from(["textract", "scan.png", "--tessdata", "/flag/tessdata"]);
        let file = ConfigFile {
            ocr: Some(OcrConfig {
                tessdata_dir: Some("/file/tessdata".into()),
            }),
            ..Default::default()
        };
        assert_eq!(
            resolve_config(&cli, file).tessdata_dir(),
            Some("/flag/tessdata")
        );
    }

    #[test]
    fn config_file_used_without_flag() {
        // Built directly so TEXTRACT_TESSDATA in the environment can't leak in.
        let cli = Cli {
            file_path: PathBuf::from("scan.png"),
            output: None,
            tessdata: None,
            pages: false,
            no_color: false,
            verbose: false,
        };
        let file = ConfigFile {
            ocr: Some(OcrConfig {
                tessdata_dir: Some("/file/tessdata".into()),
            }),
            ..Default::default()
        };
        assert_eq!(
            resolve_config(&cli, file).tessdata_dir(),
            Some("/file/tessdata")
        );
    }

    #[test]
    fn parses_all_flags() {
        let cli = Cli::parse_from([
            "textract",
            "report.pdf",
            "-o",
            "out.txt",
            "--pages",
            "--no-color",
            "-v",
        ]);
        assert_eq!(cli.file_path, PathBuf::from("report.pdf"));
        assert_eq!(cli.output, Some(PathBuf::from("out.txt")));
        assert!(cli.pages && cli.no_color && cli.verbose);
    }
}
