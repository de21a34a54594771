use std::path::{Path, PathBuf};

use crate::error::ReduceError;

/// Extensions accepted by the reducer.
pub const SUPPORTED_FORMATS: [&str; 4] = ["tif", "jpg", "gif", "png"];

/// Prefix prepended to the selected file name for the output image.
pub const OUTPUT_PREFIX: &str = "compressed_";

/// Accept a picked path only when one was chosen and its extension is on
/// the allow-list (case-insensitive).
pub fn validate_selection(selection: Option<PathBuf>) -> Result<PathBuf, ReduceError> {
    let path = selection.ok_or(ReduceError::UnsupportedImage)?;
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    if SUPPORTED_FORMATS.contains(&ext.as_str()) {
        Ok(path)
    } else {
        Err(ReduceError::UnsupportedImage)
    }
}

/// `compressed_<file name>`, extension included.
pub fn output_name(path: &Path) -> Result<PathBuf, ReduceError> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| ReduceError::InvalidPath(path.to_path_buf()))?;
    Ok(PathBuf::from(format!("{OUTPUT_PREFIX}{name}")))
}
