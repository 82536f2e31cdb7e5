//! Summary statistics over batches of survival rates.

use serde::Serialize;

/// Distribution of survival rates for one network.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SurvivalSummary {
    pub runs: usize,
    pub mean: f64,
    pub median: f64,
    /// 10th percentile, `floor(0.1 * (n - 1))` in sorted order.
    pub p10: f64,
    /// 90th percentile, `floor(0.9 * (n - 1))` in sorted order.
    pub p90: f64,
    pub min: f64,
    pub max: f64,
}

impl SurvivalSummary {
    /// `None` for an empty batch.
    pub fn from_rates(rates: &[f64]) -> Option<Self> {
        if rates.is_empty() {
            return None;
        }
        let mut sorted = rates.to_vec();
        sorted.sort_by(f64::total_cmp);
        let n = sorted.len();

        let mean = sorted.iter().sum::<f64>() / n as f64;
        let median = if n % 2 == 0 {
            (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
        } else {
            sorted[n / 2]
        };
        let percentile = |q: f64| sorted[(((n - 1) as f64) * q) as usize];

        Some(Self {
            runs: n,
            mean,
            median,
            p10: percentile(0.1),
            p90: percentile(0.9),
            min: sorted[0],
            max: sorted[n - 1],
        })
    }
}

/// One summary per network for rates laid out as consecutive
/// `repetitions`-long chunks.
pub fn summarize_by_network(rates: &[f64], repetitions: usize) -> Vec<SurvivalSummary> {
    if repetitions == 0 {
        return Vec::new();
    }
    rates
        .chunks(repetitions)
        .filter_map(SurvivalSummary::from_rates)
        .collect()
}
