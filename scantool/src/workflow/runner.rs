use std::path::{Path, PathBuf};

use anyhow::Context;
use log::info;
use transientcore::prelude::CleanConfig;
use transientcore::record::TransientRecord;

use crate::exporter;
use crate::importer;

/// Result of handling one input file.
#[derive(Debug)]
pub enum Outcome {
    Processed {
        save_name: String,
        artifact: PathBuf,
        samples: usize,
        unrecognized_keys: usize,
        provenance: String,
    },
    SkippedCalibration,
}

/// Per-batch counters. One runner handles one batch sequentially; there is
/// no shared state to guard.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub processed: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn record_processed(&mut self) {
        self.processed += 1;
    }

    pub fn record_skipped(&mut self) {
        self.skipped += 1;
    }

    pub fn record_failed(&mut self) {
        self.failed += 1;
    }
}

/// Drives one file through import, ingestion, cleaning, and export.
pub struct Runner {
    config: CleanConfig,
    output_dir: PathBuf,
    clean: bool,
}

impl Runner {
    pub fn new(config: CleanConfig, output_dir: PathBuf, clean: bool) -> Self {
        Self {
            config,
            output_dir,
            clean,
        }
    }

    pub fn process(&self, path: &Path) -> anyhow::Result<Outcome> {
        if importer::is_calibration_artifact(path) {
            info!("ignored calibration artifact {}", path.display());
            return Ok(Outcome::SkippedCalibration);
        }

        let raw = importer::import_file(path)
            .with_context(|| format!("importing {}", path.display()))?;
        let mut record = TransientRecord::new();
        let config = self.clean.then_some(&self.config);
        let unrecognized = record
            .ingest(raw, config)
            .with_context(|| format!("ingesting {}", path.display()))?;

        if record.save_name().is_empty() {
            let stem = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("transient");
            record.set_save_name(stem);
        }

        let artifact = exporter::write_artifact(&record, &self.output_dir)?;
        info!("exported {}", artifact.display());

        let provenance = serde_json::to_string(record.provenance())
            .context("serializing provenance log")?;
        Ok(Outcome::Processed {
            save_name: record.save_name().to_string(),
            artifact,
            samples: record.raw_time().len(),
            unrecognized_keys: unrecognized.len(),
            provenance,
        })
    }
}
