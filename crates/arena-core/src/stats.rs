//! Descriptive statistics over drafted scores.

use serde::Serialize;

/// Eight-field summary of a draft record's scores.
///
/// `std` is the sample standard deviation (N−1 denominator), taken as zero
/// for a single observation. Percentiles interpolate linearly between order
/// statistics, so `[1, 2, 3, 4]` yields 1.75 / 2.5 / 3.25.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DraftStatistics {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    #[serde(rename = "25%")]
    pub p25: f64,
    #[serde(rename = "50%")]
    pub p50: f64,
    #[serde(rename = "75%")]
    pub p75: f64,
    pub max: f64,
}

impl DraftStatistics {
    /// Summarizes a score slice; `None` when the slice is empty.
    pub fn from_scores(scores: &[f64]) -> Option<Self> {
        if scores.is_empty() {
            return None;
        }

        let count = scores.len();
        let mean = scores.iter().sum::<f64>() / count as f64;
        let std = if count < 2 {
            0.0
        } else {
            let variance = scores
                .iter()
                .map(|score| (score - mean).powi(2))
                .sum::<f64>()
                / (count as f64 - 1.0);
            variance.sqrt()
        };

        let mut sorted = scores.to_vec();
        sorted.sort_by(f64::total_cmp);

        Some(Self {
            count,
            mean,
            std,
            min: sorted[0],
            p25: percentile(&sorted, 0.25),
            p50: percentile(&sorted, 0.50),
            p75: percentile(&sorted, 0.75),
            max: sorted[count - 1],
        })
    }
}

/// Linear-interpolation percentile over an ascending-sorted slice.
fn percentile(sorted: &[f64], quantile: f64) -> f64 {
    let position = quantile * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let fraction = position - lower as f64;
    if fraction == 0.0 {
        sorted[lower]
    } else {
        sorted[lower] + fraction * (sorted[lower + 1] - sorted[lower])
    }
}

#[cfg(test)]
mod tests {
    use super::DraftStatistics;

    #[test]
    fn quartiles_interpolate_linearly() {
        let stats = DraftStatistics::from_scores(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(stats.count, 4);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.p25, 1.75);
        assert_eq!(stats.p50, 2.5);
        assert_eq!(stats.p75, 3.25);
        assert_eq!(stats.max, 4.0);
    }

    #[test]
    fn mean_and_sample_std_use_n_minus_one() {
        let stats = DraftStatistics::from_scores(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert!((stats.mean - 2.5).abs() < 1e-12);
        assert!((stats.std - (5.0f64 / 3.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn single_observation_collapses_to_that_value() {
        let stats = DraftStatistics::from_scores(&[42.0]).unwrap();
        assert_eq!(stats.count, 1);
        assert_eq!(stats.std, 0.0);
        assert_eq!(stats.min, 42.0);
        assert_eq!(stats.p25, 42.0);
        assert_eq!(stats.p50, 42.0);
        assert_eq!(stats.p75, 42.0);
        assert_eq!(stats.max, 42.0);
    }

    #[test]
    fn empty_scores_yield_no_summary() {
        assert!(DraftStatistics::from_scores(&[]).is_none());
    }

    #[test]
    fn unsorted_input_is_handled() {
        let stats = DraftStatistics::from_scores(&[4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.p50, 2.5);
        assert_eq!(stats.max, 4.0);
    }

    #[test]
    fn serializes_percentile_field_names() {
        let stats = DraftStatistics::from_scores(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["count"], 4);
        assert_eq!(json["25%"], 1.75);
        assert_eq!(json["50%"], 2.5);
        assert_eq!(json["75%"], 3.25);
    }
}
