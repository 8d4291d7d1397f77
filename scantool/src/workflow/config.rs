use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use transientcore::metadata::MetadataField;
use transientcore::prelude::CleanConfig;

/// YAML-facing mirror of the core cleaning configuration. The normalization
/// target is kept as a field name here so settings files stay readable.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanSettings {
    pub crop: bool,
    pub shift_time: Option<f64>,
    pub flip_time: bool,
    pub remove_dc: bool,
    pub dc_window: usize,
    pub filter_low_pass: bool,
    pub cutoff_fraction: f64,
    pub filter_order: usize,
    pub flip_trace: bool,
    pub normalize_to: Option<String>,
}

impl Default for CleanSettings {
    fn default() -> Self {
        let defaults = CleanConfig::default();
        Self {
            crop: defaults.crop,
            shift_time: defaults.shift_time,
            flip_time: defaults.flip_time,
            remove_dc: defaults.remove_dc,
            dc_window: defaults.dc_window,
            filter_low_pass: defaults.filter_low_pass,
            cutoff_fraction: defaults.cutoff_fraction,
            filter_order: defaults.filter_order,
            flip_trace: defaults.flip_trace,
            normalize_to: None,
        }
    }
}

impl CleanSettings {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading cleaning settings {}", path_ref.display()))?;
        let settings: CleanSettings = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing cleaning settings {}", path_ref.display()))?;
        Ok(settings)
    }

    pub fn from_args(shift: Option<f64>, normalize: Option<&str>) -> Self {
        Self {
            shift_time: shift,
            normalize_to: normalize.map(str::to_string),
            ..Self::default()
        }
    }

    pub fn to_clean_config(&self) -> anyhow::Result<CleanConfig> {
        let normalize_to = match self.normalize_to.as_deref() {
            Some(name) => Some(
                MetadataField::parse(name)
                    .with_context(|| format!("unknown metadata field {name:?}"))?,
            ),
            None => None,
        };
        Ok(CleanConfig {
            crop: self.crop,
            shift_time: self.shift_time,
            flip_time: self.flip_time,
            remove_dc: self.remove_dc,
            dc_window: self.dc_window,
            filter_low_pass: self.filter_low_pass,
            cutoff_fraction: self.cutoff_fraction,
            filter_order: self.filter_order,
            flip_trace: self.flip_trace,
            normalize_to,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn settings_from_args_produce_a_clean_config() {
        let settings = CleanSettings::from_args(Some(1.5), Some("pump_power"));
        let config = settings.to_clean_config().unwrap();
        assert_eq!(config.shift_time, Some(1.5));
        assert_eq!(config.normalize_to, Some(MetadataField::PumpPower));
        assert!(config.crop);
    }

    #[test]
    fn settings_load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"flip_time: false\ndc_window: 20\ncutoff_fraction: 0.2\n")
            .unwrap();
        let path = temp.into_temp_path();
        let settings = CleanSettings::load(&path).unwrap();
        assert!(!settings.flip_time);
        assert_eq!(settings.dc_window, 20);
        assert!(settings.crop);
    }

    #[test]
    fn unknown_normalization_field_is_an_error() {
        let settings = CleanSettings::from_args(None, Some("lock_in_gain"));
        assert!(settings.to_clean_config().is_err());
    }
}
