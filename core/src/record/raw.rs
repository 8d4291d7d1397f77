use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::prelude::{CleanError, CleanResult};

/// Normalized acquisition handed over by an import adapter: two aligned
/// sample arrays plus whatever keyed metadata the source carried (header
/// lines, filename tokens, scalar instrument fields).
///
/// No ordering is guaranteed on `raw_time`; the stage may have swept in
/// either direction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawRecord {
    pub raw_time: Vec<f64>,
    pub raw_trace: Vec<f64>,
    pub keyed_info: BTreeMap<String, String>,
}

impl RawRecord {
    pub fn new(raw_time: Vec<f64>, raw_trace: Vec<f64>) -> CleanResult<Self> {
        if raw_time.len() != raw_trace.len() {
            return Err(CleanError::LengthMismatch {
                time: raw_time.len(),
                trace: raw_trace.len(),
            });
        }
        Ok(Self {
            raw_time,
            raw_trace,
            keyed_info: BTreeMap::new(),
        })
    }

    pub fn with_keyed_info(mut self, keyed_info: BTreeMap<String, String>) -> Self {
        self.keyed_info = keyed_info;
        self
    }

    pub fn len(&self) -> usize {
        self.raw_time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw_time.is_empty()
    }
}
