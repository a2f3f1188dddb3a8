use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
    pub ocr: Option<OcrConfig>,
    pub output: Option<OutputConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OcrConfig {
    /// Directory holding Tesseract trained data (`eng.traineddata`).
    pub tessdata_dir: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub no_color: Option<bool>,
}

impl ConfigFile {
    pub fn tessdata_dir(&self) -> Option<&str> {
        self.ocr.as_ref().and_then(|o| o.tessdata_dir.as_deref())
    }

    pub fn no_color(&self) -> bool {
        self.output
            .as_ref()
            .and_then(|o| o.no_color)
            .unwrap_or(false)
    }
}

/// Platform config directory path: `<config_dir>/textract/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("textract").join("config.toml"))
}

/// Load config by cascading CWD `.textract.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".textract.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparsable config file");
            None
        }
    }
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    ConfigFile {
        ocr: Some(OcrConfig {
            tessdata_dir: overlay
                .ocr
                .and_then(|o| o.tessdata_dir)
                .or_else(|| base.ocr.and_then(|o| o.tessdata_dir)),
        }),
        output: Some(OutputConfig {
            no_color: overlay
                .output
                .and_then(|o| o.no_color)
                .or_else(|| base.output.and_then(|o| o.no_color)),
        }),
    }
}

/// Save the current config to the platform config directory.
pub fn save_config(config: &ConfigFile) -> Result<PathBuf, String> {
    let path = config_path().ok_or_else(|| "Could not determine config directory".to_string())?;
    save_to_path(config, &path)?;
    Ok(path)
}

pub fn save_to_path(config: &ConfigFile, path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
    }
    let content =
        toml::to_string_pretty(config).map_err(|e| format!("Failed to serialize config: {}", e))?;
    std::fs::write(path, content).map_err(|e| format!("Failed to write config: {}", e))
}
