use log::warn;
use ndarray::Array1;

use crate::cleaning::{
    crop, CleaningPipeline, FlipTimeStage, FlipTraceStage, LowPassStage, NormalizeStage,
    RemoveDcStage, ShiftStage,
};
use crate::metadata::{InstrumentConfig, MetadataField, MetadataStore};
use crate::prelude::{CleanConfig, CleanResult, TraceData, TraceStage};
use crate::provenance::ProvenanceLog;
use crate::record::RawRecord;

/// One pump-probe measurement: raw acquisition, cleaned trace, experiment
/// metadata, and the provenance of every transformation applied.
///
/// Raw and cleaned arrays never alias; cleaning works on its own copy and
/// can always be rebuilt from the untouched raw pair.
#[derive(Debug, Clone, Default)]
pub struct TransientRecord {
    raw: TraceData,
    cleaned: TraceData,
    metadata: MetadataStore,
    log: ProvenanceLog,
    save_name: String,
}

impl TransientRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_instrument(instrument: InstrumentConfig) -> Self {
        Self {
            metadata: MetadataStore::with_instrument(instrument),
            ..Self::default()
        }
    }

    /// Takes ownership of an adapter-produced record: stores the raw
    /// arrays, feeds the keyed metadata to the store, and runs the cleaning
    /// recipe unless suppressed with `None`.
    ///
    /// Returns the metadata keys that matched no known field; they are
    /// also warned about, but never abort the ingestion.
    pub fn ingest(
        &mut self,
        record: RawRecord,
        config: Option<&CleanConfig>,
    ) -> CleanResult<Vec<String>> {
        let RawRecord {
            raw_time,
            raw_trace,
            keyed_info,
        } = record;
        self.raw = TraceData::from_vecs(raw_time, raw_trace)?;
        self.cleaned = TraceData::default();
        self.log = ProvenanceLog::new();

        let unrecognized = self.metadata.set_from_keyed_info(&keyed_info);
        for key in &unrecognized {
            warn!("unrecognized metadata key {key:?}");
        }
        if self.save_name.is_empty() {
            self.save_name = self.derive_save_name();
        }
        if let Some(config) = config {
            self.clean(config)?;
        }
        Ok(unrecognized)
    }

    /// Runs the full recipe, rebuilding cleaned arrays and provenance from
    /// the raw pair.
    pub fn clean(&mut self, config: &CleanConfig) -> CleanResult<()> {
        let (cleaned, log) = CleaningPipeline::clean(&self.raw, &self.metadata, config)?;
        self.cleaned = cleaned;
        self.log = log;
        Ok(())
    }

    /// Isolates the monotonic sweep of the raw acquisition. Destructive
    /// reset: previously cleaned data and the whole provenance log are
    /// discarded.
    pub fn crop_time_scale(&mut self) -> CleanResult<()> {
        self.cleaned = crop::crop_and_log(&self.raw, &mut self.log)?;
        Ok(())
    }

    pub fn shift_time(&mut self, offset: f64) -> CleanResult<()> {
        self.seed_cleaned();
        ShiftStage { offset }.execute(&mut self.cleaned, &mut self.log)
    }

    pub fn flip_time(&mut self) -> CleanResult<()> {
        self.seed_cleaned();
        FlipTimeStage.execute(&mut self.cleaned, &mut self.log)
    }

    pub fn flip_trace(&mut self) -> CleanResult<()> {
        self.seed_cleaned();
        FlipTraceStage.execute(&mut self.cleaned, &mut self.log)
    }

    pub fn remove_dc(&mut self, window: usize) -> CleanResult<()> {
        self.seed_cleaned();
        RemoveDcStage { window }.execute(&mut self.cleaned, &mut self.log)
    }

    /// Returns the resolved physical cutoff frequency.
    pub fn filter_low_pass(&mut self, cutoff_fraction: f64, order: usize) -> CleanResult<f64> {
        self.seed_cleaned();
        LowPassStage {
            cutoff_fraction,
            order,
        }
        .apply(&mut self.cleaned, &mut self.log)
    }

    pub fn normalize_to_field(&mut self, field: MetadataField) -> CleanResult<()> {
        self.seed_cleaned();
        NormalizeStage::new(field.name(), self.metadata.number(field))
            .execute(&mut self.cleaned, &mut self.log)
    }

    /// Individual steps may run without a prior crop; they then start from
    /// a copy of the raw pair.
    fn seed_cleaned(&mut self) {
        if self.cleaned.is_empty() && !self.raw.is_empty() {
            self.cleaned = self.raw.clone();
        }
    }

    /// Serialized scan artifact: metadata triples, a delimiter, then the
    /// four aligned columns. Rows past the cleaned length carry only the
    /// raw pair.
    pub fn export_artifact(&self) -> String {
        let mut out = String::new();
        for (field, value) in self.metadata.non_default_fields() {
            out.push_str(&format!("{}\t{}\t{}\n", field.name(), value, field.unit()));
        }
        out.push_str(&format!("\n{}\n\n", Self::DATA_DELIMITER));
        out.push_str("raw_time\traw_trace\ttime\ttrace\n");
        for i in 0..self.raw.len() {
            if i < self.cleaned.len() {
                out.push_str(&format!(
                    "{},{},{},{}\n",
                    self.raw.time[i], self.raw.trace[i], self.cleaned.time[i], self.cleaned.trace[i]
                ));
            } else {
                out.push_str(&format!("{},{}\n", self.raw.time[i], self.raw.trace[i]));
            }
        }
        out
    }

    pub const DATA_DELIMITER: &'static str = "############### Data ###############";

    pub fn raw_time(&self) -> &Array1<f64> {
        &self.raw.time
    }

    pub fn raw_trace(&self) -> &Array1<f64> {
        &self.raw.trace
    }

    pub fn time(&self) -> &Array1<f64> {
        &self.cleaned.time
    }

    pub fn trace(&self) -> &Array1<f64> {
        &self.cleaned.trace
    }

    pub fn metadata(&self) -> &MetadataStore {
        &self.metadata
    }

    pub fn metadata_mut(&mut self) -> &mut MetadataStore {
        &mut self.metadata
    }

    pub fn provenance(&self) -> &ProvenanceLog {
        &self.log
    }

    pub fn save_name(&self) -> &str {
        &self.save_name
    }

    pub fn set_save_name(&mut self, name: impl Into<String>) {
        self.save_name = name.into();
    }

    fn derive_save_name(&self) -> String {
        let mut parts = Vec::new();
        if let Some(material) = self.metadata.text(MetadataField::Material) {
            parts.push(material.replace(' ', "-"));
        }
        if let Some(date) = self.metadata.text(MetadataField::Date) {
            parts.push(date.replace(' ', "_"));
        }
        if let Some(temperature) = self.metadata.number(MetadataField::Temperature) {
            parts.push(format!("{temperature}K"));
        }
        parts.join("_")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn sweep_record() -> RawRecord {
        // Short run-in, descending sweep, parked tail.
        let mut time = vec![4.0, 10.0];
        let mut trace = vec![0.2, 0.2];
        for i in 0..100 {
            let t = 10.0 - 0.2 * i as f64;
            time.push(t);
            trace.push(if t > 0.0 { 1.2 } else { 0.2 });
        }
        time.push(-9.85);
        trace.push(0.2);
        RawRecord::new(time, trace).unwrap()
    }

    fn keyed(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn ingest_cleans_and_reports_unknown_keys() {
        let raw = sweep_record().with_keyed_info(keyed(&[
            ("Material", "RuCl3"),
            ("Temperature", "7.0"),
            ("Chopper Phase", "12"),
        ]));
        let mut record = TransientRecord::new();
        let unrecognized = record.ingest(raw, Some(&CleanConfig::default())).unwrap();

        assert_eq!(unrecognized, vec!["Chopper Phase".to_string()]);
        assert_eq!(record.time().len(), record.trace().len());
        assert!(!record.time().is_empty());
        assert!(record.provenance().get("Crop Time Scale").is_some());
        assert_eq!(record.save_name(), "RuCl3_7K");
    }

    #[test]
    fn ingest_without_config_leaves_cleaned_empty() {
        let mut record = TransientRecord::new();
        record.ingest(sweep_record(), None).unwrap();
        assert!(record.time().is_empty());
        assert!(record.provenance().is_empty());
        assert!(!record.raw_time().is_empty());
    }

    #[test]
    fn cleaning_does_not_touch_the_raw_arrays() {
        let raw = sweep_record();
        let expected_time = raw.raw_time.clone();
        let mut record = TransientRecord::new();
        record.ingest(raw, Some(&CleanConfig::default())).unwrap();
        record.flip_trace().unwrap();
        assert_eq!(record.raw_time().to_vec(), expected_time);
    }

    #[test]
    fn normalization_guard_reports_and_preserves() {
        let mut record = TransientRecord::new();
        record.ingest(sweep_record(), None).unwrap();
        record.crop_time_scale().unwrap();
        let before = record.trace().to_vec();

        let result = record.normalize_to_field(MetadataField::DestructionPower);
        assert!(matches!(
            result,
            Err(crate::prelude::CleanError::NormalizationTarget(_))
        ));
        assert_eq!(record.trace().to_vec(), before);
    }

    #[test]
    fn individual_steps_work_without_a_prior_crop() {
        let mut record = TransientRecord::new();
        record.ingest(sweep_record(), None).unwrap();
        record.shift_time(1.0).unwrap();
        assert_eq!(record.time().len(), record.raw_time().len());
    }

    #[test]
    fn export_lists_metadata_then_aligned_columns() {
        let raw = sweep_record().with_keyed_info(keyed(&[("Material", "RuCl3")]));
        let mut record = TransientRecord::new();
        record.ingest(raw, Some(&CleanConfig::default())).unwrap();
        let artifact = record.export_artifact();

        assert!(artifact.starts_with("material\tRuCl3\t\n"));
        assert!(artifact.contains(TransientRecord::DATA_DELIMITER));
        assert!(artifact.contains("raw_time\traw_trace\ttime\ttrace"));

        let raw_rows = artifact
            .lines()
            .filter(|line| line.contains(',') && line.split(',').count() == 2)
            .count();
        // The turnaround samples dropped by the crop export as raw-only rows.
        assert_eq!(
            raw_rows,
            record.raw_time().len() - record.time().len()
        );
    }

    #[test]
    fn crop_resets_previous_provenance() {
        let mut record = TransientRecord::new();
        record.ingest(sweep_record(), None).unwrap();
        record.shift_time(2.0).unwrap();
        assert!(record.provenance().get("Shift Time").is_some());

        record.crop_time_scale().unwrap();
        assert!(record.provenance().get("Shift Time").is_none());
        assert!(record.provenance().get("Crop Time Scale").is_some());
    }
}
