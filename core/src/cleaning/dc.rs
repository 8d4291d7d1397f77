use std::collections::BTreeMap;

use ndarray::s;
use serde_json::json;

use crate::prelude::{CleanError, CleanResult, TraceData, TraceStage};
use crate::provenance::ProvenanceLog;

/// Subtracts the static detector offset.
///
/// Samples at negative delay carry no pump-induced signal, so their mean is
/// the detector baseline. Negative delays sit at the start of the array once
/// the scan was flipped, otherwise at its end.
pub struct RemoveDcStage {
    pub window: usize,
}

impl TraceStage for RemoveDcStage {
    fn label(&self) -> &'static str {
        "Remove DC"
    }

    fn execute(&self, data: &mut TraceData, log: &mut ProvenanceLog) -> CleanResult<()> {
        if data.is_empty() {
            return Err(CleanError::InvalidInput(
                "cannot remove DC from an empty trace".into(),
            ));
        }
        let window = self.window.clamp(1, data.len());
        let baseline = if log.is_flagged("Flip Time") {
            data.trace.slice(s![..window])
        } else {
            data.trace.slice(s![data.len() - window..])
        };
        let shift = baseline.mean().unwrap_or(0.0);
        data.trace -= shift;
        log.record_params(
            self.label(),
            false,
            BTreeMap::from([
                ("window".to_string(), json!(window)),
                ("shift".to_string(), json!(shift)),
            ]),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn biased_trace(len: usize, bias: f64) -> TraceData {
        let time: Vec<f64> = (0..len).map(|i| i as f64).collect();
        // Signal in the front, quiet tail at negative delay.
        let trace: Vec<f64> = (0..len)
            .map(|i| if i < len / 2 { bias + 1.0 } else { bias })
            .collect();
        TraceData::from_vecs(time, trace).unwrap()
    }

    #[test]
    fn baseline_window_is_zero_mean_afterwards() {
        let mut data = biased_trace(100, 0.35);
        let mut log = ProvenanceLog::new();
        RemoveDcStage { window: 40 }.execute(&mut data, &mut log).unwrap();
        let tail = data.trace.slice(s![60..]).mean().unwrap_or(f64::NAN);
        assert!(tail.abs() < 1e-12, "tail mean {tail}");
    }

    #[test]
    fn flipped_scan_uses_the_leading_window() {
        let time: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let trace = vec![2.0, 2.0, 2.0, 9.0, 9.0, 9.0, 9.0, 9.0, 9.0, 9.0];
        let mut data = TraceData::from_vecs(time, trace).unwrap();
        let mut log = ProvenanceLog::new();
        log.record_flag("Flip Time");

        RemoveDcStage { window: 3 }.execute(&mut data, &mut log).unwrap();
        assert!((data.trace[0]).abs() < 1e-12);
        assert!((data.trace[9] - 7.0).abs() < 1e-12);
    }

    #[test]
    fn window_is_capped_at_the_trace_length() {
        let mut data = biased_trace(10, 1.0);
        let mut log = ProvenanceLog::new();
        RemoveDcStage { window: 40 }.execute(&mut data, &mut log).unwrap();
        assert_eq!(data.len(), 10);
    }

    #[test]
    fn empty_trace_is_rejected() {
        let mut data = TraceData::default();
        let mut log = ProvenanceLog::new();
        let result = RemoveDcStage { window: 40 }.execute(&mut data, &mut log);
        assert!(matches!(result, Err(CleanError::InvalidInput(_))));
    }
}
