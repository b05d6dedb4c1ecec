use serde::Serialize;

use super::{
    above_below_mean_counts, coefficient_of_variation, ma_ratio, mean, median, percentile,
    sample_std, z_scores,
};
use crate::classify::MomentumBand;

/// Summary statistics of one ticker's series under one Z-score window.
///
/// A pure function of the values and the window; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatSnapshot {
    /// Last value in date order.
    pub latest_value: f64,
    /// Arithmetic mean.
    pub mean: f64,
    /// Median.
    pub median: f64,
    /// Sample standard deviation, 0 for a single point.
    pub std_dev: f64,
    /// Smallest value.
    pub min: f64,
    /// Largest value.
    pub max: f64,
    /// Sum of all values.
    pub sum: f64,
    /// Z-score of the latest value.
    pub latest_z_score: f64,
    /// Percentile rank of the latest value, 0..=100.
    pub percentile: f64,
    /// Coefficient of variation in percent.
    pub cv: f64,
    /// Latest 5/21 moving-average ratio.
    pub ma_ratio_latest: f64,
    /// Mean of the whole MA-ratio sequence.
    pub ma_ratio_avg: f64,
    /// Momentum band of `ma_ratio_latest`.
    pub momentum_band: MomentumBand,
    /// Points strictly above the mean.
    pub days_above_mean: usize,
    /// Points strictly below the mean.
    pub days_below_mean: usize,
    /// Number of points.
    pub point_count: usize,
}

impl StatSnapshot {
    /// Compute the snapshot of date-ordered `values`; `None` when empty.
    pub fn compute(values: &[f64], window: Option<usize>) -> Option<Self> {
        let latest_value = *values.last()?;
        let z = z_scores(values, window);
        let ratios = ma_ratio(values);
        Some(Self::from_parts(values, latest_value, &z, &ratios))
    }

    /// Build from already computed Z-score and MA-ratio sequences.
    ///
    /// `z` and `ratios` must be the sequences of `values`; callers that also
    /// keep those sequences use this to avoid computing them twice.
    pub(crate) fn from_parts(values: &[f64], latest_value: f64, z: &[f64], ratios: &[f64]) -> Self {
        let m = mean(values);
        let std_dev = sample_std(values).unwrap_or(0.0);
        let (days_above_mean, days_below_mean) = above_below_mean_counts(values);
        let ma_ratio_latest = ratios.last().copied().unwrap_or(1.0);

        Self {
            latest_value,
            mean: m,
            median: median(values),
            std_dev,
            min: values.iter().copied().fold(f64::INFINITY, f64::min),
            max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            sum: values.iter().sum(),
            latest_z_score: z.last().copied().unwrap_or(0.0),
            percentile: percentile(values, latest_value),
            cv: coefficient_of_variation(std_dev, m),
            ma_ratio_latest,
            ma_ratio_avg: mean(ratios),
            momentum_band: MomentumBand::classify(ma_ratio_latest),
            days_above_mean,
            days_below_mean,
            point_count: values.len(),
        }
    }
}

/// How unusual the latest MA ratio is against the ratio's own history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaRatioSummary {
    /// Latest ratio.
    pub latest: f64,
    /// Mean ratio.
    pub average: f64,
    /// Sample standard deviation of the ratio, 0 for a single point.
    pub std_dev: f64,
    /// `(latest - average) / std_dev`, 0 when `std_dev` is 0.
    pub z_score: f64,
    /// Momentum band of `latest`.
    pub band: MomentumBand,
}

impl MaRatioSummary {
    /// Summarize an MA-ratio sequence; `None` when empty.
    pub fn from_ratios(ratios: &[f64]) -> Option<Self> {
        let latest = *ratios.last()?;
        let average = mean(ratios);
        let std_dev = sample_std(ratios).unwrap_or(0.0);
        let z_score = Some((latest - average) / std_dev)
            .filter(|z| std_dev > 0.0 && z.is_finite())
            .unwrap_or(0.0);
        Some(Self {
            latest,
            average,
            std_dev,
            z_score,
            band: MomentumBand::classify(latest),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_series_has_no_snapshot() {
        assert!(StatSnapshot::compute(&[], Some(21)).is_none());
        assert!(MaRatioSummary::from_ratios(&[]).is_none());
    }

    #[test]
    fn single_point_snapshot_is_degenerate_but_finite() {
        let s = StatSnapshot::compute(&[250.0], Some(21)).unwrap();
        assert_eq!(s.latest_value, 250.0);
        assert_eq!(s.std_dev, 0.0);
        assert_eq!(s.latest_z_score, 0.0);
        assert_eq!(s.percentile, 100.0);
        assert_eq!(s.cv, 0.0);
        assert_eq!(s.ma_ratio_latest, 1.0);
        assert_eq!(s.momentum_band, MomentumBand::Uptrend);
        assert_eq!((s.days_above_mean, s.days_below_mean), (0, 0));
        assert_eq!(s.point_count, 1);
    }

    #[test]
    fn snapshot_fields() {
        let s = StatSnapshot::compute(&[80.0, -20.0], Some(21)).unwrap();
        assert_eq!(s.latest_value, -20.0);
        assert_eq!(s.mean, 30.0);
        assert_eq!(s.median, 30.0);
        assert_eq!(s.min, -20.0);
        assert_eq!(s.max, 80.0);
        assert_eq!(s.sum, 60.0);
        assert_eq!(s.percentile, 50.0);
        assert_eq!((s.days_above_mean, s.days_below_mean), (1, 1));
        // global fallback: (-20 - 30) / sqrt(5000)
        assert!((s.latest_z_score - (-50.0 / 5000f64.sqrt())).abs() < 1e-12);
        assert!((s.cv - 100.0 * 5000f64.sqrt() / 30.0).abs() < 1e-9);
        // ma5 = ma21 = 30 at the last point
        assert_eq!(s.ma_ratio_latest, 1.0);
        assert_eq!(s.ma_ratio_avg, 1.0);
    }

    #[test]
    fn huge_values_produce_finite_statistics() {
        let s = StatSnapshot::compute(&[1e308; 3], Some(21)).unwrap();
        assert_eq!(s.mean, 1e308);
        assert_eq!(s.std_dev, 0.0);
        assert_eq!(s.cv, 0.0);
        assert_eq!(s.ma_ratio_latest, 1.0);
        assert_eq!(s.ma_ratio_avg, 1.0);
        assert_eq!(s.latest_z_score, 0.0);
        assert_eq!(s.momentum_band, MomentumBand::Uptrend);

        let s = StatSnapshot::compute(&[-1e308, 1e308, 5e307], None).unwrap();
        for v in [s.mean, s.median, s.std_dev, s.cv, s.latest_z_score, s.ma_ratio_latest, s.ma_ratio_avg] {
            assert!(v.is_finite());
        }
    }

    #[test]
    fn ma_summary_zero_spread() {
        let m = MaRatioSummary::from_ratios(&[1.2, 1.2, 1.2]).unwrap();
        assert_eq!(m.std_dev, 0.0);
        assert_eq!(m.z_score, 0.0);
        assert_eq!(m.band, MomentumBand::Uptrend);

        let m = MaRatioSummary::from_ratios(&[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(m.z_score, 1.0);
        assert_eq!(m.band, MomentumBand::StrongUptrend);
    }
}
