use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use transientcore::record::TransientRecord;

/// Writes the record's export artifact as `<save_name>.txt` under the
/// output directory, creating the directory if needed.
pub fn write_artifact(record: &TransientRecord, output_dir: &Path) -> anyhow::Result<PathBuf> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("creating output directory {}", output_dir.display()))?;
    let name = if record.save_name().is_empty() {
        "transient"
    } else {
        record.save_name()
    };
    let path = output_dir.join(format!("{name}.txt"));
    fs::write(&path, record.export_artifact())
        .with_context(|| format!("writing artifact {}", path.display()))?;
    Ok(path)
}
