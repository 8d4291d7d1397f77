use std::f64::consts::PI;

use crate::prelude::{CleanError, CleanResult};

/// One second-order section in direct form II transposed.
#[derive(Debug, Clone, Copy)]
struct Section {
    b0: f64,
    b1: f64,
    b2: f64,
    a1: f64,
    a2: f64,
}

impl Section {
    fn run(&self, input: &[f64]) -> Vec<f64> {
        let mut z1 = 0.0;
        let mut z2 = 0.0;
        let mut output = Vec::with_capacity(input.len());
        for &x in input {
            let y = self.b0 * x + z1;
            z1 = self.b1 * x - self.a1 * y + z2;
            z2 = self.b2 * x - self.a2 * y;
            output.push(y);
        }
        output
    }
}

/// Butterworth low-pass design and zero-phase application.
///
/// Filters are built as cascaded second-order sections for numerical
/// stability; coefficients come from the bilinear transform of the analog
/// prototype with a prewarped cutoff.
pub struct FilterHelper;

impl FilterHelper {
    /// Sections for a low-pass of the given order with cutoff expressed as
    /// a fraction of the Nyquist frequency.
    fn design_lowpass(order: usize, cutoff_fraction: f64) -> CleanResult<Vec<Section>> {
        if order == 0 {
            return Err(CleanError::InvalidInput(
                "filter order must be at least 1".into(),
            ));
        }
        if !(cutoff_fraction > 0.0 && cutoff_fraction < 1.0) {
            return Err(CleanError::InvalidInput(format!(
                "cutoff fraction {cutoff_fraction} outside (0, 1)"
            )));
        }

        let k = (PI * cutoff_fraction / 2.0).tan();
        let k2 = k * k;
        let mut sections = Vec::with_capacity(order / 2 + 1);

        for pair in 0..order / 2 {
            // Conjugate pole pair of the analog prototype, angle measured
            // from the negative real axis.
            let phi = PI * (2 * pair + 1) as f64 / (2 * order) as f64;
            let c = 2.0 * phi.cos();
            let delta = 1.0 + c * k + k2;
            sections.push(Section {
                b0: k2 / delta,
                b1: 2.0 * k2 / delta,
                b2: k2 / delta,
                a1: 2.0 * (k2 - 1.0) / delta,
                a2: (1.0 - c * k + k2) / delta,
            });
        }

        if order % 2 == 1 {
            // Real pole for odd orders.
            let delta = 1.0 + k;
            sections.push(Section {
                b0: k / delta,
                b1: k / delta,
                b2: 0.0,
                a1: (k - 1.0) / delta,
                a2: 0.0,
            });
        }

        Ok(sections)
    }

    /// Zero-phase low-pass: one forward pass and one reversed pass, with
    /// odd-reflection padding at both ends to suppress edge transients.
    pub fn filtfilt_lowpass(
        samples: &[f64],
        cutoff_fraction: f64,
        order: usize,
    ) -> CleanResult<Vec<f64>> {
        let sections = Self::design_lowpass(order, cutoff_fraction)?;
        if samples.len() < 2 {
            return Ok(samples.to_vec());
        }

        let pad = (3 * (order + 1)).min(samples.len() - 1);
        let first = samples[0];
        let last = samples[samples.len() - 1];
        let mut extended = Vec::with_capacity(samples.len() + 2 * pad);
        for i in (1..=pad).rev() {
            extended.push(2.0 * first - samples[i]);
        }
        extended.extend_from_slice(samples);
        for i in 1..=pad {
            extended.push(2.0 * last - samples[samples.len() - 1 - i]);
        }

        let mut work = extended;
        for section in &sections {
            work = section.run(&work);
        }
        work.reverse();
        for section in &sections {
            work = section.run(&work);
        }
        work.reverse();

        Ok(work[pad..pad + samples.len()].to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn design_rejects_degenerate_parameters() {
        assert!(FilterHelper::design_lowpass(0, 0.1).is_err());
        assert!(FilterHelper::design_lowpass(2, 0.0).is_err());
        assert!(FilterHelper::design_lowpass(2, 1.0).is_err());
    }

    #[test]
    fn sections_have_unity_dc_gain() {
        let sections = FilterHelper::design_lowpass(5, 0.2).unwrap();
        assert_eq!(sections.len(), 3);
        for section in sections {
            let gain =
                (section.b0 + section.b1 + section.b2) / (1.0 + section.a1 + section.a2);
            assert!((gain - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn output_length_matches_input() {
        let samples: Vec<f64> = (0..64).map(|i| (i as f64 * 0.3).sin()).collect();
        let filtered = FilterHelper::filtfilt_lowpass(&samples, 0.1, 2).unwrap();
        assert_eq!(filtered.len(), samples.len());
    }

    #[test]
    fn constant_signal_passes_unchanged() {
        let samples = vec![0.7; 50];
        let filtered = FilterHelper::filtfilt_lowpass(&samples, 0.1, 2).unwrap();
        for value in filtered {
            assert!((value - 0.7).abs() < 1e-9);
        }
    }

    #[test]
    fn fast_tone_is_suppressed_in_the_interior() {
        // 0.9 of Nyquist against a 0.1 cutoff; the edges keep a small
        // padding transient, the interior must be flat.
        let samples: Vec<f64> = (0..100)
            .map(|i| (2.0 * PI * 0.45 * i as f64).sin())
            .collect();
        let filtered = FilterHelper::filtfilt_lowpass(&samples, 0.1, 2).unwrap();
        let peak = filtered[20..80]
            .iter()
            .fold(0.0_f64, |acc, v| acc.max(v.abs()));
        assert!(peak < 0.05, "peak {peak}");
    }

    #[test]
    fn slow_peak_is_not_shifted() {
        // Zero-phase filtering must keep the peak of a slow feature in place.
        let samples: Vec<f64> = (0..101)
            .map(|i| {
                let x = (i as f64 - 50.0) / 10.0;
                (-x * x).exp()
            })
            .collect();
        let filtered = FilterHelper::filtfilt_lowpass(&samples, 0.2, 2).unwrap();
        let argmax = filtered
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap();
        assert!((argmax as i64 - 50).abs() <= 1, "peak moved to {argmax}");
    }
}
