use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use transientcore::record::RawRecord;

use super::ImportError;

/// Imports a delimited text artifact: `name<TAB>value[<TAB>unit]` header
/// lines, a marker line, then comma-separated numeric rows.
///
/// Only the first two columns (the raw pair) are read back; cleaned columns
/// present in re-exported artifacts are regenerated by the pipeline instead
/// of being trusted, so they can never disagree with a fresh provenance log.
pub fn import(path: &Path) -> Result<RawRecord, ImportError> {
    let contents = fs::read_to_string(path)
        .map_err(|err| ImportError::Missing(format!("{}: {err}", path.display())))?;

    let mut keyed_info = BTreeMap::new();
    let mut raw_time = Vec::new();
    let mut raw_trace = Vec::new();
    let mut in_data = false;

    for line in contents.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.starts_with('#') {
            in_data = true;
            continue;
        }
        if let Some((time, trace)) = data_row(trimmed) {
            in_data = true;
            raw_time.push(time);
            raw_trace.push(trace);
            continue;
        }
        if !in_data {
            if let Some((name, value)) = header_pair(trimmed) {
                keyed_info.insert(name, value);
            }
        }
        // Non-numeric lines inside the data section (the column header)
        // are skipped.
    }

    if raw_time.is_empty() {
        return Err(ImportError::Malformed(format!(
            "{} contains no data rows",
            path.display()
        )));
    }

    RawRecord::new(raw_time, raw_trace)
        .map(|record| record.with_keyed_info(keyed_info))
        .map_err(|err| ImportError::Malformed(err.to_string()))
}

/// Splits a `name<TAB>value[<TAB>unit]` header line; the unit is redundant
/// and dropped.
fn header_pair(line: &str) -> Option<(String, String)> {
    let mut parts = line.splitn(3, '\t');
    let name = parts.next()?.trim();
    let value = parts.next()?.trim();
    if name.is_empty() || value.is_empty() {
        return None;
    }
    Some((name.to_string(), value.to_string()))
}

/// Parses the first two columns of a comma-separated numeric row.
fn data_row(line: &str) -> Option<(f64, f64)> {
    let mut parts = line.split(',');
    let time = parts.next()?.trim().parse::<f64>().ok()?;
    let trace = parts.next()?.trim().parse::<f64>().ok()?;
    Some((time, trace))
}
