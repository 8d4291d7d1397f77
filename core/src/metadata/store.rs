use std::collections::BTreeMap;
use std::fmt;

use log::warn;
use serde::{Deserialize, Serialize};

use super::energy::{energy_density, InstrumentConfig};
use super::field::MetadataField;

/// Value held by a metadata field: experiment parameters are either
/// numbers or free text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Number(value) => write!(f, "{value}"),
            FieldValue::Text(text) => write!(f, "{text}"),
        }
    }
}

/// Typed holder for the experiment parameters of one scan.
///
/// Fields are explicitly optional: an absent field was never measured, while
/// an explicit 0.0 (a 0 deg polarization, say) is a legitimate value and is
/// kept. The three `*_energy` fields are derived and recomputed whenever a
/// member of their power/spot triple changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataStore {
    values: BTreeMap<MetadataField, FieldValue>,
    instrument: InstrumentConfig,
}

impl MetadataStore {
    pub fn new() -> Self {
        Self::with_instrument(InstrumentConfig::default())
    }

    pub fn with_instrument(instrument: InstrumentConfig) -> Self {
        Self {
            values: BTreeMap::new(),
            instrument,
        }
    }

    pub fn instrument(&self) -> &InstrumentConfig {
        &self.instrument
    }

    pub fn number(&self, field: MetadataField) -> Option<f64> {
        match self.values.get(&field) {
            Some(FieldValue::Number(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn text(&self, field: MetadataField) -> Option<&str> {
        match self.values.get(&field) {
            Some(FieldValue::Text(text)) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Assigns a numeric field and refreshes the derived energies. Writes
    /// to a derived field are ignored since its value is owned by the
    /// recomputation.
    pub fn set_number(&mut self, field: MetadataField, value: f64) {
        if field.is_derived() {
            warn!("ignoring direct write to derived field {}", field.name());
            return;
        }
        if field.is_text() {
            warn!("field {} holds text, not a number", field.name());
            return;
        }
        self.values.insert(field, FieldValue::Number(value));
        self.recompute_energy_densities();
    }

    pub fn set_text(&mut self, field: MetadataField, value: impl Into<String>) {
        if !field.is_text() {
            warn!("field {} holds a number, not text", field.name());
            return;
        }
        self.values.insert(field, FieldValue::Text(value.into()));
    }

    pub fn unset(&mut self, field: MetadataField) {
        self.values.remove(&field);
        self.recompute_energy_densities();
    }

    /// Assigns every recognized key of an adapter-provided mapping and
    /// returns the keys that matched no field. Unrecognized keys are not
    /// fatal, they keep malformed filenames and headers diagnosable.
    pub fn set_from_keyed_info(&mut self, info: &BTreeMap<String, String>) -> Vec<String> {
        let mut unrecognized = Vec::new();
        for (key, value) in info {
            match MetadataField::parse(key) {
                // Derived energies stay recognized so re-imported artifacts
                // produce no noise, but their values come from the triple.
                Some(field) if field.is_derived() => {}
                Some(field) if field.is_text() => {
                    self.values
                        .insert(field, FieldValue::Text(value.trim().to_string()));
                }
                Some(field) => match value.trim().parse::<f64>() {
                    Ok(number) => {
                        self.values.insert(field, FieldValue::Number(number));
                    }
                    Err(_) => {
                        warn!(
                            "discarding non-numeric value {:?} for {}",
                            value,
                            field.name()
                        );
                    }
                },
                None => unrecognized.push(key.clone()),
            }
        }
        self.recompute_energy_densities();
        unrecognized
    }

    /// The fields that are actually set, in declaration order. This is the
    /// authoritative "what do we know about this scan" projection used by
    /// export.
    pub fn non_default_fields(&self) -> BTreeMap<MetadataField, FieldValue> {
        self.values.clone()
    }

    /// Unit of a parameter or column name, from its suffix alone.
    pub fn unit_of(&self, parameter: &str) -> &'static str {
        super::field::unit_of(parameter)
    }

    fn recompute_energy_densities(&mut self) {
        let chopped = self.instrument.chopped_rate_hz();
        let full = self.instrument.repetition_rate_hz;
        self.update_energy(
            MetadataField::PumpSpot,
            MetadataField::PumpPower,
            MetadataField::PumpEnergy,
            chopped,
        );
        self.update_energy(
            MetadataField::ProbeSpot,
            MetadataField::ProbePower,
            MetadataField::ProbeEnergy,
            chopped,
        );
        self.update_energy(
            MetadataField::DestructionSpot,
            MetadataField::DestructionPower,
            MetadataField::DestructionEnergy,
            full,
        );
    }

    fn update_energy(
        &mut self,
        spot: MetadataField,
        power: MetadataField,
        energy: MetadataField,
        pulse_rate_hz: f64,
    ) {
        let spot_value = self.number(spot).unwrap_or(0.0);
        let power_value = self.number(power).unwrap_or(0.0);
        match energy_density(spot_value, power_value, pulse_rate_hz) {
            Some(value) => {
                self.values.insert(energy, FieldValue::Number(value));
            }
            None => {
                self.values.remove(&energy);
            }
        }
    }
}

impl Default for MetadataStore {
    fn default() -> Self {
        Self::new()
    }
}
