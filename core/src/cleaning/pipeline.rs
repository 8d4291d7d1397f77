use log::warn;

use crate::metadata::MetadataStore;
use crate::prelude::{CleanConfig, CleanError, CleanResult, TraceData, TraceStage};
use crate::provenance::ProvenanceLog;

use super::crop;
use super::{FlipTimeStage, FlipTraceStage, LowPassStage, NormalizeStage, RemoveDcStage, ShiftStage};

/// Fixed-order orchestration of the cleaning recipe.
///
/// Steps always run in the order crop, shift, flip time, remove DC, low
/// pass, flip trace, normalize; the config only chooses which of them run.
/// Output trace and provenance are rebuilt from the raw pair on every call,
/// never patched incrementally.
pub struct CleaningPipeline;

impl CleaningPipeline {
    pub fn clean(
        raw: &TraceData,
        metadata: &MetadataStore,
        config: &CleanConfig,
    ) -> CleanResult<(TraceData, ProvenanceLog)> {
        let mut log = ProvenanceLog::new();
        let mut data = if config.crop {
            crop::crop_and_log(raw, &mut log)?
        } else {
            raw.clone()
        };

        let mut stages: Vec<Box<dyn TraceStage>> = Vec::new();
        if let Some(offset) = config.shift_time {
            if offset != 0.0 {
                stages.push(Box::new(ShiftStage { offset }));
            }
        }
        if config.flip_time {
            stages.push(Box::new(FlipTimeStage));
        }
        if config.remove_dc {
            stages.push(Box::new(RemoveDcStage {
                window: config.dc_window,
            }));
        }
        if config.filter_low_pass {
            stages.push(Box::new(LowPassStage {
                cutoff_fraction: config.cutoff_fraction,
                order: config.filter_order,
            }));
        }
        if config.flip_trace {
            stages.push(Box::new(FlipTraceStage));
        }
        if let Some(field) = config.normalize_to {
            stages.push(Box::new(NormalizeStage::new(
                field.name(),
                metadata.number(field),
            )));
        }

        for stage in &stages {
            match stage.execute(&mut data, &mut log) {
                Ok(()) => {}
                Err(CleanError::NormalizationTarget(field)) => {
                    warn!("normalization by {field} skipped: reference unset or zero");
                }
                Err(err) => return Err(err),
            }
            if data.time.len() != data.trace.len() {
                return Err(CleanError::LengthMismatch {
                    time: data.time.len(),
                    trace: data.trace.len(),
                });
            }
        }

        Ok((data, log))
    }
}
