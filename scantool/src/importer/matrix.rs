use std::fs::File;
use std::path::Path;

use matfile::{MatFile, NumericData};
use transientcore::record::RawRecord;

use super::{filename, ImportError};

/// Row layout of the `Daten` matrix written by the acquisition software:
/// trace samples in the first row, stage delays in the third.
const TRACE_ROW: usize = 0;
const TIME_ROW: usize = 2;

/// Imports a binary matrix container. Raw arrays come from the `Daten`
/// matrix, the static reflectivity from the scalar `DC` field, and the
/// remaining metadata from the filename convention.
pub fn import(path: &Path) -> Result<RawRecord, ImportError> {
    let file = File::open(path)
        .map_err(|err| ImportError::Missing(format!("{}: {err}", path.display())))?;
    let mat = MatFile::parse(file)
        .map_err(|err| ImportError::Malformed(format!("not a matrix container: {err}")))?;

    let daten = mat.find_by_name("Daten").ok_or_else(|| {
        ImportError::Malformed(format!("{} misses the Daten matrix", path.display()))
    })?;
    let size = daten.size();
    if size.len() != 2 || size[0] <= TIME_ROW {
        return Err(ImportError::Malformed(format!(
            "unexpected Daten shape {size:?}"
        )));
    }
    let rows = size[0];
    let columns = size[1];
    let values = numeric_values(daten.data()).ok_or_else(|| {
        ImportError::Malformed("Daten carries non-numeric data".to_string())
    })?;
    if values.len() < rows * columns {
        return Err(ImportError::Malformed(format!(
            "Daten holds {} values for shape {size:?}",
            values.len()
        )));
    }

    // MAT matrices are column-major: element (r, c) sits at c * rows + r.
    let extract_row =
        |row: usize| -> Vec<f64> { (0..columns).map(|c| values[c * rows + row]).collect() };
    let raw_trace = extract_row(TRACE_ROW);
    let raw_time = extract_row(TIME_ROW);

    let mut keyed_info = filename::keyed_info(path);
    let r0 = mat
        .find_by_name("DC")
        .and_then(|array| numeric_values(array.data()))
        .and_then(|scalars| scalars.first().copied());
    if let Some(r0) = r0 {
        keyed_info.insert("R0".to_string(), r0.to_string());
    }

    RawRecord::new(raw_time, raw_trace)
        .map(|record| record.with_keyed_info(keyed_info))
        .map_err(|err| ImportError::Malformed(err.to_string()))
}

fn numeric_values(data: &NumericData) -> Option<Vec<f64>> {
    match data {
        NumericData::Double { real, .. } => Some(real.clone()),
        NumericData::Single { real, .. } => Some(real.iter().map(|&v| f64::from(v)).collect()),
        _ => None,
    }
}
