use ndarray::s;

use crate::prelude::{CleanResult, TraceData, TraceStage};
use crate::provenance::ProvenanceLog;

/// Reverses the acquisition direction: sample order flips and t maps to -t,
/// keeping trace-to-time alignment.
pub struct FlipTimeStage;

impl TraceStage for FlipTimeStage {
    fn label(&self) -> &'static str {
        "Flip Time"
    }

    fn execute(&self, data: &mut TraceData, log: &mut ProvenanceLog) -> CleanResult<()> {
        data.time = data.time.slice(s![..;-1]).mapv(|t| -t);
        data.trace = data.trace.slice(s![..;-1]).to_owned();
        log.record_flag(self.label());
        Ok(())
    }
}

/// Sign-convention fix for the detector output.
pub struct FlipTraceStage;

impl TraceStage for FlipTraceStage {
    fn label(&self) -> &'static str {
        "Flip Trace"
    }

    fn execute(&self, data: &mut TraceData, log: &mut ProvenanceLog) -> CleanResult<()> {
        data.trace.mapv_inplace(|v| -v);
        log.record_flag(self.label());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flip_time_reverses_and_negates() {
        let mut data = TraceData::from_vecs(vec![3.0, 2.0, 1.0], vec![0.1, 0.2, 0.3]).unwrap();
        let mut log = ProvenanceLog::new();
        FlipTimeStage.execute(&mut data, &mut log).unwrap();
        assert_eq!(data.time.to_vec(), vec![-1.0, -2.0, -3.0]);
        assert_eq!(data.trace.to_vec(), vec![0.3, 0.2, 0.1]);
        assert!(log.is_flagged("Flip Time"));
    }

    #[test]
    fn flip_time_is_an_involution() {
        let original = TraceData::from_vecs(vec![3.0, 2.0, 1.0], vec![0.1, 0.2, 0.3]).unwrap();
        let mut data = original.clone();
        let mut log = ProvenanceLog::new();
        FlipTimeStage.execute(&mut data, &mut log).unwrap();
        FlipTimeStage.execute(&mut data, &mut log).unwrap();
        assert_eq!(data, original);
        assert!(!log.is_flagged("Flip Time"));
    }

    #[test]
    fn flip_trace_is_an_involution() {
        let original = TraceData::from_vecs(vec![0.0, 1.0], vec![0.5, -0.5]).unwrap();
        let mut data = original.clone();
        let mut log = ProvenanceLog::new();
        FlipTraceStage.execute(&mut data, &mut log).unwrap();
        assert_eq!(data.trace.to_vec(), vec![-0.5, 0.5]);
        FlipTraceStage.execute(&mut data, &mut log).unwrap();
        assert_eq!(data, original);
    }
}
