pub struct StatsHelper;

impl StatsHelper {
    pub fn mean(samples: &[f32]) -> Option<f64> {
        if samples.is_empty() {
            return None;
        }
        let sum: f64 = samples.iter().map(|&v| f64::from(v)).sum();
        Some(sum / samples.len() as f64)
    }

    /// Percentile `q` (0..=100) with linear interpolation between order statistics.
    pub fn percentile<I>(samples: I, q: f64) -> Option<f64>
    where
        I: IntoIterator<Item = f32>,
    {
        let mut sorted: Vec<f64> = samples.into_iter().map(f64::from).collect();
        if sorted.is_empty() || !(0.0..=100.0).contains(&q) {
            return None;
        }
        if sorted.iter().any(|v| v.is_nan()) {
            return None;
        }
        sorted.sort_by(|a, b| a.total_cmp(b));

        let rank = q / 100.0 * (sorted.len() - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = rank.ceil() as usize;
        let fraction = rank - lower as f64;
        Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
    }

    pub fn round_to(value: f64, decimals: i32) -> f64 {
        let factor = 10f64.powi(decimals);
        (value * factor).round() / factor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_empty_sequence_is_none() {
        assert_eq!(StatsHelper::mean(&[]), None);
        assert_eq!(StatsHelper::mean(&[1.0, 2.0, 3.0]), Some(2.0));
    }

    #[test]
    fn percentile_interpolates_between_ranks() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(StatsHelper::percentile(values, 50.0), Some(3.0));
        assert_eq!(StatsHelper::percentile(values, 100.0), Some(5.0));
        let p95 = StatsHelper::percentile(values, 95.0).unwrap();
        assert!((p95 - 4.8).abs() < 1e-9);
    }

    #[test]
    fn percentile_rejects_empty_and_nan() {
        assert_eq!(StatsHelper::percentile(Vec::<f32>::new(), 95.0), None);
        assert_eq!(StatsHelper::percentile([1.0, f32::NAN], 95.0), None);
    }

    #[test]
    fn round_to_keeps_requested_decimals() {
        assert_eq!(StatsHelper::round_to(0.12345, 3), 0.123);
        assert_eq!(StatsHelper::round_to(-4.26, 1), -4.3);
    }
}
