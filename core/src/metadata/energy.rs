use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Fixed parameters of the acquisition setup.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct InstrumentConfig {
    /// Laser repetition rate in Hz.
    pub repetition_rate_hz: f64,
}

impl Default for InstrumentConfig {
    fn default() -> Self {
        Self {
            repetition_rate_hz: 283_000.0,
        }
    }
}

impl InstrumentConfig {
    /// Pulse rate on the pump and probe channels, halved by the chopper.
    pub fn chopped_rate_hz(&self) -> f64 {
        self.repetition_rate_hz / 2.0
    }
}

/// Energy density deposited per pulse, in mJ/cm^2.
///
/// `spot_fwhm_um` is the FWHM beam diameter in micrometers, `power_mw` the
/// average power in mW and `pulse_rate_hz` the rate of pulses actually
/// reaching the sample. Pulse energy is `power / rate` [mJ] spread over the
/// FWHM disc `pi * (d / 2)^2` converted to cm^2. Returns `None` when power,
/// spot size, or rate is zero: a beam that is off or unprofiled has no
/// energy density, it is not an error.
pub fn energy_density(spot_fwhm_um: f64, power_mw: f64, pulse_rate_hz: f64) -> Option<f64> {
    if power_mw == 0.0 || spot_fwhm_um == 0.0 || pulse_rate_hz == 0.0 {
        return None;
    }
    let pulse_energy_mj = power_mw / pulse_rate_hz;
    let radius_cm = spot_fwhm_um / 2.0 * 1e-4;
    let area_cm2 = PI * radius_cm * radius_cm;
    Some(pulse_energy_mj / area_cm2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_power_or_spot_yields_nothing() {
        assert_eq!(energy_density(0.0, 1.0, 141_500.0), None);
        assert_eq!(energy_density(50.0, 0.0, 141_500.0), None);
        assert_eq!(energy_density(50.0, 1.0, 0.0), None);
    }

    #[test]
    fn reference_fluence_for_chopped_pump() {
        // 1 mW in a 50 um spot at half of 283 kHz.
        let value = energy_density(50.0, 1.0, 141_500.0).unwrap();
        assert!((value - 0.3599).abs() < 1e-3, "fluence {value}");
    }

    #[test]
    fn chopped_rate_is_half_the_repetition_rate() {
        let instrument = InstrumentConfig::default();
        assert_eq!(instrument.repetition_rate_hz, 283_000.0);
        assert_eq!(instrument.chopped_rate_hz(), 141_500.0);
    }
}
