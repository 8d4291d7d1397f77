use serde::{Deserialize, Serialize};

/// Closed set of experiment parameters carried by a scan.
///
/// Polarizations and the sample orientation are measured clockwise in the
/// propagation direction of the beam; spot sizes are FWHM diameters from a
/// Gaussian fit of the beam profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetadataField {
    Material,
    Sample,
    Date,
    PumpPower,
    ProbePower,
    DestructionPower,
    PumpSpot,
    ProbeSpot,
    DestructionSpot,
    PumpEnergy,
    ProbeEnergy,
    DestructionEnergy,
    PumpPolarization,
    ProbePolarization,
    DestructionPolarization,
    SampleOrientation,
    Temperature,
    R0,
}

impl MetadataField {
    pub const ALL: [MetadataField; 18] = [
        MetadataField::Material,
        MetadataField::Sample,
        MetadataField::Date,
        MetadataField::PumpPower,
        MetadataField::ProbePower,
        MetadataField::DestructionPower,
        MetadataField::PumpSpot,
        MetadataField::ProbeSpot,
        MetadataField::DestructionSpot,
        MetadataField::PumpEnergy,
        MetadataField::ProbeEnergy,
        MetadataField::DestructionEnergy,
        MetadataField::PumpPolarization,
        MetadataField::ProbePolarization,
        MetadataField::DestructionPolarization,
        MetadataField::SampleOrientation,
        MetadataField::Temperature,
        MetadataField::R0,
    ];

    /// Canonical name used in exported artifacts and header lines.
    pub fn name(&self) -> &'static str {
        match self {
            MetadataField::Material => "material",
            MetadataField::Sample => "sample",
            MetadataField::Date => "date",
            MetadataField::PumpPower => "pump_power",
            MetadataField::ProbePower => "probe_power",
            MetadataField::DestructionPower => "destruction_power",
            MetadataField::PumpSpot => "pump_spot",
            MetadataField::ProbeSpot => "probe_spot",
            MetadataField::DestructionSpot => "destruction_spot",
            MetadataField::PumpEnergy => "pump_energy",
            MetadataField::ProbeEnergy => "probe_energy",
            MetadataField::DestructionEnergy => "destruction_energy",
            MetadataField::PumpPolarization => "pump_polarization",
            MetadataField::ProbePolarization => "probe_polarization",
            MetadataField::DestructionPolarization => "destruction_polarization",
            MetadataField::SampleOrientation => "sample_orientation",
            MetadataField::Temperature => "temperature",
            MetadataField::R0 => "R0",
        }
    }

    /// Matches header and filename keys case-insensitively, with spaces
    /// normalized to underscores. "Scan Date" is the filename alias of
    /// `date`.
    pub fn parse(key: &str) -> Option<MetadataField> {
        let normalized = key.trim().to_ascii_lowercase().replace(' ', "_");
        let canonical = match normalized.as_str() {
            "scan_date" => "date",
            other => other,
        };
        MetadataField::ALL
            .iter()
            .copied()
            .find(|field| field.name().eq_ignore_ascii_case(canonical))
    }

    /// Text fields; everything else holds a number.
    pub fn is_text(&self) -> bool {
        matches!(
            self,
            MetadataField::Material | MetadataField::Sample | MetadataField::Date
        )
    }

    /// Derived fields are recomputed from their power/spot/rate triple and
    /// never assigned directly.
    pub fn is_derived(&self) -> bool {
        matches!(
            self,
            MetadataField::PumpEnergy
                | MetadataField::ProbeEnergy
                | MetadataField::DestructionEnergy
        )
    }

    pub fn unit(&self) -> &'static str {
        unit_of(self.name())
    }
}

/// Unit of a parameter or column name, derived from its suffix alone.
/// Unknown suffixes carry no unit.
pub fn unit_of(parameter: &str) -> &'static str {
    let suffix = parameter
        .rsplit('_')
        .next()
        .unwrap_or("")
        .to_ascii_lowercase();
    match suffix.as_str() {
        "power" => "mW",
        "polarization" | "orientation" => "deg",
        "r0" => "V",
        "energy" => "mJ/cm^2",
        "time" => "ps",
        _ => "",
    }
}
