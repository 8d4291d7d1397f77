use crate::prelude::{CleanError, CleanResult, TraceData, TraceStage};
use crate::provenance::ProvenanceLog;

/// Scales the trace by a reference metadata value, typically a beam power.
///
/// The divisor is resolved by the caller from the metadata store; an unset
/// or zero reference is a guarded failure, never a silent division that
/// floods the trace with inf or NaN.
pub struct NormalizeStage {
    field_name: String,
    divisor: Option<f64>,
}

impl NormalizeStage {
    pub fn new(field_name: &str, divisor: Option<f64>) -> Self {
        Self {
            field_name: field_name.to_string(),
            divisor,
        }
    }
}

impl TraceStage for NormalizeStage {
    fn label(&self) -> &'static str {
        "Normalize"
    }

    fn execute(&self, data: &mut TraceData, log: &mut ProvenanceLog) -> CleanResult<()> {
        let divisor = match self.divisor {
            Some(value) if value != 0.0 => value,
            _ => return Err(CleanError::NormalizationTarget(self.field_name.clone())),
        };
        data.trace /= divisor;
        let key = format!("Normalized by {}", self.field_name.replace('_', " "));
        log.record_flag(&key);
        Ok(())
    }
}
