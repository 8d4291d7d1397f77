use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::metadata::MetadataField;
use crate::provenance::ProvenanceLog;

/// Aligned (time, trace) sample pair flowing through the cleaning stages.
///
/// Sample `i` of `trace` was acquired at delay `time[i]`; every stage keeps
/// the two arrays the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceData {
    pub time: Array1<f64>,
    pub trace: Array1<f64>,
}

impl TraceData {
    pub fn new(time: Array1<f64>, trace: Array1<f64>) -> CleanResult<Self> {
        if time.len() != trace.len() {
            return Err(CleanError::LengthMismatch {
                time: time.len(),
                trace: trace.len(),
            });
        }
        Ok(Self { time, trace })
    }

    pub fn from_vecs(time: Vec<f64>, trace: Vec<f64>) -> CleanResult<Self> {
        Self::new(Array1::from_vec(time), Array1::from_vec(trace))
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}

impl Default for TraceData {
    fn default() -> Self {
        Self {
            time: Array1::zeros(0),
            trace: Array1::zeros(0),
        }
    }
}

/// Common error type for cleaning operations.
#[derive(thiserror::Error, Debug)]
pub enum CleanError {
    #[error("length mismatch: {time} time samples vs {trace} trace samples")]
    LengthMismatch { time: usize, trace: usize },
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid normalization target: {0}")]
    NormalizationTarget(String),
}

pub type CleanResult<T> = Result<T, CleanError>;

/// Trait describing one toggleable step of the cleaning recipe.
pub trait TraceStage {
    /// Key under which the step records itself in the provenance log.
    fn label(&self) -> &'static str;

    fn execute(&self, data: &mut TraceData, log: &mut ProvenanceLog) -> CleanResult<()>;
}

/// Per-step switches and parameters for the standard cleaning recipe.
///
/// Defaults reproduce the acquisition-side convention: crop the sweep, flip
/// the reversed stage direction, remove the detector offset, and smooth with
/// a gentle low-pass. Trace flip and normalization are opt-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanConfig {
    pub crop: bool,
    /// Offset subtracted from the time axis; `None` leaves t = 0 untouched.
    pub shift_time: Option<f64>,
    pub flip_time: bool,
    pub remove_dc: bool,
    /// Samples averaged for the baseline estimate.
    pub dc_window: usize,
    pub filter_low_pass: bool,
    /// Filter cutoff as a fraction of the Nyquist frequency.
    pub cutoff_fraction: f64,
    pub filter_order: usize,
    pub flip_trace: bool,
    /// Metadata field the trace is divided by after the other steps.
    pub normalize_to: Option<MetadataField>,
}

impl Default for CleanConfig {
    fn default() -> Self {
        Self {
            crop: true,
            shift_time: None,
            flip_time: true,
            remove_dc: true,
            dc_window: 40,
            filter_low_pass: true,
            cutoff_fraction: 0.1,
            filter_order: 2,
            flip_trace: false,
            normalize_to: None,
        }
    }
}
