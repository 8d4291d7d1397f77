use std::path::Path;

use transientcore::record::RawRecord;

pub mod filename;
pub mod matrix;
pub mod text;

/// Import failures surfaced per record; one bad file never aborts a batch.
#[derive(thiserror::Error, Debug)]
pub enum ImportError {
    #[error("file not found: {0}")]
    Missing(String),
    #[error("unrecognized format: {0:?}")]
    UnrecognizedFormat(String),
    #[error("malformed source: {0}")]
    Malformed(String),
}

/// Reserved calibration scan recorded by the acquisition software; it is
/// not a measurement and must be skipped.
pub fn is_calibration_artifact(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.eq_ignore_ascii_case("t-cal.mat"))
        .unwrap_or(false)
}

/// Dispatch by extension to one of the two known adapters.
pub fn import_file(path: &Path) -> Result<RawRecord, ImportError> {
    if !path.exists() {
        return Err(ImportError::Missing(path.display().to_string()));
    }
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    match ext.as_str() {
        "mat" => matrix::import(path),
        "txt" => text::import(path),
        other => Err(ImportError::UnrecognizedFormat(other.to_string())),
    }
}
