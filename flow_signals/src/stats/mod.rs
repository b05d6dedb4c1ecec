//! Numeric core: Z-scores, percentile rank, moving-average ratio and friends.
//!
//! Every function takes a single ticker's values already ordered by date.
//! Degenerate inputs never produce NaN or infinity:
//!
//! | condition | result |
//! |---|---|
//! | series of 0 or 1 points | Z-scores all 0 |
//! | zero variance (window or global) | Z-score 0 |
//! | 21-period mean exactly 0 | MA ratio 1 |
//! | mean exactly 0 | CV 0 |
//! | ratio or CV not representable | 1 / 0 |
//!
//! Variance is computed with the sample (n - 1) denominator. Zero variance is
//! detected by comparing the observations themselves, so a constant window
//! yields exactly 0 even when its floating-point mean is off by an ulp.

mod snapshot;

pub use snapshot::{MaRatioSummary, StatSnapshot};

/// Short leg of the MA ratio.
pub const MA_SHORT_PERIOD: usize = 5;
/// Long leg of the MA ratio.
pub const MA_LONG_PERIOD: usize = 21;
/// Z-score window used when none is configured.
pub const DEFAULT_Z_SCORE_WINDOW: usize = 21;

/// Arithmetic mean; 0 for an empty slice.
///
/// Falls back to an incremental mean when the plain sum overflows, so the
/// mean of finite values is always finite.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let total: f64 = values.iter().sum();
    if total.is_finite() {
        return total / values.len() as f64;
    }
    values.iter().enumerate().fold(0.0, |m, (i, &x)| {
        let n = (i + 1) as f64;
        m + (x / n - m / n)
    })
}

/// Median (midpoint average for even counts); 0 for an empty slice.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        let (lo, hi) = (sorted[mid - 1], sorted[mid]);
        lo + (hi - lo) / 2.0
    } else {
        sorted[mid]
    }
}

/// Sample standard deviation, or `None` when it is undefined (< 2 points)
/// or too large to represent.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    Some((ss / (values.len() - 1) as f64).sqrt()).filter(|s| s.is_finite())
}

fn is_constant(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] == w[1])
}

/// Z-score of `x` against `sample`, 0 when the sample has no spread.
fn z_against(x: f64, sample: &[f64]) -> f64 {
    if sample.len() < 2 || is_constant(sample) {
        return 0.0;
    }
    match sample_std(sample) {
        Some(std) if std > 0.0 && std.is_finite() => {
            let z = (x - mean(sample)) / std;
            if z.is_finite() { z } else { 0.0 }
        }
        _ => 0.0,
    }
}

/// Z-score of every point.
///
/// - 0 or 1 points: all zeros.
/// - `window` given and the series has at least `window` points: trailing
///   rolling mean/std over up to `window` points (minimum one), so the first
///   point always scores 0.
/// - otherwise: one global mean/std over the whole series.
pub fn z_scores(values: &[f64], window: Option<usize>) -> Vec<f64> {
    let n = values.len();
    if n <= 1 {
        return vec![0.0; n];
    }

    match window {
        Some(w) if w > 0 && n >= w => (0..n)
            .map(|i| {
                let start = (i + 1).saturating_sub(w);
                z_against(values[i], &values[start..=i])
            })
            .collect(),
        _ => values.iter().map(|&x| z_against(x, values)).collect(),
    }
}

/// Share of `values` less than or equal to `latest`, in percent.
///
/// Ties count as "less than or equal". Empty input yields 0.
pub fn percentile(values: &[f64], latest: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let at_or_below = values.iter().filter(|&&v| v <= latest).count();
    at_or_below as f64 / values.len() as f64 * 100.0
}

/// Trailing mean over up to `period` points (minimum one).
pub fn rolling_mean(values: &[f64], period: usize) -> Vec<f64> {
    let period = period.max(1);
    (0..values.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(period);
            mean(&values[start..=i])
        })
        .collect()
}

/// 5-period trailing mean divided by 21-period trailing mean.
///
/// Where the 21-period mean is exactly zero, or the quotient is not finite,
/// the ratio is defined as 1.
pub fn ma_ratio(values: &[f64]) -> Vec<f64> {
    let short = rolling_mean(values, MA_SHORT_PERIOD);
    let long = rolling_mean(values, MA_LONG_PERIOD);
    short
        .into_iter()
        .zip(long)
        .map(|(s, l)| {
            let r = s / l;
            if l == 0.0 || !r.is_finite() { 1.0 } else { r }
        })
        .collect()
}

/// `100 * std / |mean|`, or 0 when the mean is exactly zero or the result
/// is not finite.
pub fn coefficient_of_variation(std: f64, mean: f64) -> f64 {
    let cv = 100.0 * std / mean.abs();
    if mean == 0.0 || !cv.is_finite() { 0.0 } else { cv }
}

/// Counts strictly above and strictly below the arithmetic mean.
pub fn above_below_mean_counts(values: &[f64]) -> (usize, usize) {
    let m = mean(values);
    let above = values.iter().filter(|&&v| v > m).count();
    let below = values.iter().filter(|&&v| v < m).count();
    (above, below)
}

/// Pearson correlation, `None` when undefined (length mismatch, fewer than
/// two points or zero variance on either side).
pub fn pearson(a: &[f64], b: &[f64]) -> Option<f64> {
    if a.len() != b.len() || a.len() < 2 || is_constant(a) || is_constant(b) {
        return None;
    }
    let (ma, mb) = (mean(a), mean(b));
    let mut cov = 0.0;
    let mut va = 0.0;
    let mut vb = 0.0;
    for (x, y) in a.iter().zip(b) {
        cov += (x - ma) * (y - mb);
        va += (x - ma) * (x - ma);
        vb += (y - mb) * (y - mb);
    }
    let denom = (va * vb).sqrt();
    Some(cov / denom).filter(|r| denom > 0.0 && r.is_finite())
}
