use std::path::PathBuf;

/// Where an artifact is written.
///
/// `file_name` did not exist in `directory` when it was resolved. Nothing
/// stops another process from taking it afterwards; writers must create
/// the file exclusively.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TargetLocation {
    pub directory: PathBuf,
    /// Sanitized slug the file name was derived from.
    pub base_name: String,
    /// `<base_name>[_<n>].<ext>`
    pub file_name: String,
}

impl TargetLocation {
    pub fn path(&self) -> PathBuf {
        self.directory.join(&self.file_name)
    }
}
