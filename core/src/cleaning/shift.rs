use serde_json::json;

use crate::prelude::{CleanResult, TraceData, TraceStage};
use crate::provenance::ProvenanceLog;

/// Redefines time zero by subtracting a fixed offset from the time axis.
///
/// Repeated shifts accumulate in the log as a sequence, so the full history
/// of where t = 0 moved stays auditable.
pub struct ShiftStage {
    pub offset: f64,
}

impl TraceStage for ShiftStage {
    fn label(&self) -> &'static str {
        "Shift Time"
    }

    fn execute(&self, data: &mut TraceData, log: &mut ProvenanceLog) -> CleanResult<()> {
        data.time -= self.offset;
        log.record_values(self.label(), false, &[json!(self.offset)]);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provenance::LogEntry;

    #[test]
    fn shift_moves_time_zero_and_accumulates() {
        let mut data = TraceData::from_vecs(vec![0.0, 1.0, 2.0], vec![0.1, 0.2, 0.3]).unwrap();
        let mut log = ProvenanceLog::new();
        let stage = ShiftStage { offset: 5.0 };

        stage.execute(&mut data, &mut log).unwrap();
        stage.execute(&mut data, &mut log).unwrap();

        assert_eq!(data.time.to_vec(), vec![-10.0, -9.0, -8.0]);
        assert_eq!(data.trace.to_vec(), vec![0.1, 0.2, 0.3]);
        assert_eq!(
            log.get("Shift Time"),
            Some(&LogEntry::Values(vec![json!(5.0), json!(5.0)]))
        );
    }
}
