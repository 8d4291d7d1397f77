use std::collections::BTreeMap;

use log::info;
use ndarray::s;
use serde_json::json;

use crate::prelude::{CleanError, CleanResult, TraceData};
use crate::provenance::ProvenanceLog;

/// Index window of the monotonic sweep inside a raw time axis, inclusive at
/// both ends.
///
/// Acquisition runs park the delay stage before and after the sweep, so the
/// raw axis carries non-monotonic turnaround samples at its ends. The sweep
/// is the contiguous run between the global extrema: from the first index at
/// one extremum to the first index at the other. A purely monotonic axis
/// degenerates to the full range, which makes cropping idempotent.
pub fn sweep_window(time: &[f64]) -> CleanResult<(usize, usize)> {
    if time.len() < 2 {
        return Err(CleanError::InvalidInput(format!(
            "time axis too short to crop: {} samples",
            time.len()
        )));
    }
    let mut imax = 0usize;
    let mut imin = 0usize;
    for (index, &value) in time.iter().enumerate() {
        if value > time[imax] {
            imax = index;
        }
        if value < time[imin] {
            imin = index;
        }
    }
    if imax == imin {
        return Err(CleanError::InvalidInput("time axis is constant".into()));
    }
    Ok((imax.min(imin), imax.max(imin)))
}

/// Crops the raw pair to its monotonic sweep.
pub fn crop_sweep(raw: &TraceData) -> CleanResult<TraceData> {
    let time = raw.time.to_vec();
    let (start, end) = sweep_window(&time)?;
    let cropped_time = raw.time.slice(s![start..=end]).to_owned();
    let cropped_trace = raw.trace.slice(s![start..=end]).to_owned();
    info!(
        "cropped time scale to [{start}, {end}] of {} raw samples",
        raw.len()
    );
    TraceData::new(cropped_time, cropped_trace)
}

/// Crops and resets the provenance: a fresh crop invalidates the indices
/// and values every earlier entry refers to, so the log starts over.
pub fn crop_and_log(raw: &TraceData, log: &mut ProvenanceLog) -> CleanResult<TraceData> {
    let cropped = crop_sweep(raw)?;
    let maxtime = raw.time.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let mintime = raw.time.iter().cloned().fold(f64::INFINITY, f64::min);
    log.clear();
    log.record_params(
        "Crop Time Scale",
        false,
        BTreeMap::from([
            ("maxtime".to_string(), json!(maxtime)),
            ("mintime".to_string(), json!(mintime)),
        ]),
    );
    Ok(cropped)
}
