use std::collections::BTreeMap;

use ndarray::Array1;
use serde_json::json;

use crate::math::{FilterHelper, StatsHelper};
use crate::prelude::{CleanResult, TraceData, TraceStage};
use crate::provenance::ProvenanceLog;

/// Zero-phase Butterworth low-pass over the trace.
pub struct LowPassStage {
    /// Cutoff as a fraction of the Nyquist frequency of the time axis.
    pub cutoff_fraction: f64,
    pub order: usize,
}

impl LowPassStage {
    /// Applies the filter and returns the resolved physical cutoff, the
    /// Nyquist frequency of the time axis times the cutoff fraction (THz
    /// for a picosecond axis).
    pub fn apply(&self, data: &mut TraceData, log: &mut ProvenanceLog) -> CleanResult<f64> {
        let samples = data.trace.to_vec();
        let filtered = FilterHelper::filtfilt_lowpass(&samples, self.cutoff_fraction, self.order)?;
        data.trace = Array1::from_vec(filtered);

        let time = data.time.to_vec();
        let frequency = StatsHelper::nyquist(&time) * self.cutoff_fraction;
        log.record_params(
            self.label(),
            false,
            BTreeMap::from([
                ("frequency".to_string(), json!(frequency)),
                ("nyq_factor".to_string(), json!(self.cutoff_fraction)),
                ("order".to_string(), json!(self.order)),
            ]),
        );
        Ok(frequency)
    }
}

impl TraceStage for LowPassStage {
    fn label(&self) -> &'static str {
        "Low Pass Filter"
    }

    fn execute(&self, data: &mut TraceData, log: &mut ProvenanceLog) -> CleanResult<()> {
        self.apply(data, log).map(|_| ())
    }
}
