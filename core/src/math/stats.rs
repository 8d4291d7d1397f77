pub struct StatsHelper;

impl StatsHelper {
    pub fn mean(samples: &[f64]) -> f64 {
        if samples.is_empty() {
            return 0.0;
        }
        samples.iter().sum::<f64>() / samples.len() as f64
    }

    /// Mean sampling interval of a (not necessarily uniform) time axis.
    pub fn sample_interval(time: &[f64]) -> f64 {
        if time.len() < 2 {
            return 0.0;
        }
        ((time[time.len() - 1] - time[0]) / (time.len() - 1) as f64).abs()
    }

    /// Nyquist frequency of the time axis; a picosecond axis yields THz.
    pub fn nyquist(time: &[f64]) -> f64 {
        let interval = Self::sample_interval(time);
        if interval == 0.0 {
            0.0
        } else {
            0.5 / interval
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_empty_sequence_is_zero() {
        assert_eq!(StatsHelper::mean(&[]), 0.0);
    }

    #[test]
    fn mean_of_values() {
        assert_eq!(StatsHelper::mean(&[1.0, 2.0, 3.0]), 2.0);
    }

    #[test]
    fn nyquist_from_half_picosecond_steps() {
        let time: Vec<f64> = (0..5).map(|i| i as f64 * 0.5).collect();
        assert!((StatsHelper::nyquist(&time) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn nyquist_of_descending_axis_is_positive() {
        let time = vec![2.0, 1.0, 0.0];
        assert!((StatsHelper::nyquist(&time) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn degenerate_axis_yields_zero_frequency() {
        assert_eq!(StatsHelper::nyquist(&[1.0]), 0.0);
    }
}
