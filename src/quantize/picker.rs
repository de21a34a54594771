use std::path::PathBuf;

use super::format::SUPPORTED_FORMATS;

/// Something that can hand over the path of the image to process.
pub trait FilePicker {
    /// Prompt for a file; `None` when nothing was chosen.
    fn pick(&self) -> Option<PathBuf>;
}

/// Native "open file" dialog.
#[derive(Debug, Default)]
pub struct DialogPicker;

impl FilePicker for DialogPicker {
    fn pick(&self) -> Option<PathBuf> {
        rfd::FileDialog::new()
            .set_title("Open image")
            .add_filter("Supported images", &SUPPORTED_FORMATS)
            .add_filter("All files", &["*"])
            .pick_file()
    }
}

/// Returns a path decided up front, e.g. from `--input`.
#[derive(Debug, Clone, Default)]
pub struct FixedPicker(pub Option<PathBuf>);

impl FixedPicker {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(Some(path.into()))
    }
}

impl FilePicker for FixedPicker {
    fn pick(&self) -> Option<PathBuf> {
        self.0.clone()
    }
}
