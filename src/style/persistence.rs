//! Style persistence: YAML load/save/reset for a user's style vector.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::vector::StyleVector;

#[derive(Debug, Error)]
pub enum StyleConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid style YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// `~/.jazzgen/style.yaml`, or `./.jazzgen/style.yaml` without a home directory.
pub fn default_style_path() -> PathBuf {
    let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(".jazzgen");
    path.push("style.yaml");
    path
}

/// Load a style from YAML. A missing file yields the default style; values
/// read from disk are clamped into range.
pub fn load_style(path: &Path) -> Result<StyleVector, StyleConfigError> {
    if !path.exists() {
        return Ok(StyleVector::default());
    }
    let content = std::fs::read_to_string(path)?;
    let style: StyleVector = serde_yaml::from_str(&content)?;
    Ok(style.validated())
}

/// Save a style, creating parent directories as needed.
pub fn save_style(path: &Path, style: &StyleVector) -> Result<(), StyleConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let yaml = serde_yaml::to_string(style)?;
    std::fs::write(path, yaml)?;
    log::debug!("saved style to {}", path.display());
    Ok(())
}

/// Remove the saved style and return the default.
pub fn reset_style(path: &Path) -> Result<StyleVector, StyleConfigError> {
    if path.exists() {
        std::fs::remove_file(path)?;
    }
    Ok(StyleVector::default())
}
