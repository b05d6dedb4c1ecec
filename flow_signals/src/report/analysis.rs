use serde::Serialize;

use crate::{
    classify::ActivityLevel,
    models::{DateSeries, FlowPoint},
    price::PriceChange,
    stats::{MaRatioSummary, StatSnapshot, ma_ratio, z_scores},
};

/// One ticker's series under one flow type, with everything derived from it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickerAnalysis {
    /// Canonical ticker.
    pub ticker: String,
    /// Date-ordered points, for charting.
    pub points: Vec<FlowPoint>,
    /// Z-score per point.
    pub z_scores: Vec<f64>,
    /// 5/21 MA ratio per point.
    pub ma_ratios: Vec<f64>,
    /// Summary statistics.
    pub snapshot: StatSnapshot,
    /// Activity level of the latest Z-score.
    pub activity: ActivityLevel,
    /// Latest MA ratio against its own history.
    pub ma_ratio: MaRatioSummary,
    /// Closing-price change of the underlying, when prices were available.
    pub price_change: Option<PriceChange>,
}

impl TickerAnalysis {
    /// Analyze `series`; `None` when it is empty.
    pub fn build(
        ticker: &str,
        series: &DateSeries,
        window: Option<usize>,
        price_change: Option<PriceChange>,
    ) -> Option<Self> {
        let values = series.values();
        let latest = *values.last()?;
        let z = z_scores(&values, window);
        let ratios = ma_ratio(&values);
        let snapshot = StatSnapshot::from_parts(&values, latest, &z, &ratios);
        let ma_ratio = MaRatioSummary::from_ratios(&ratios)?;

        Some(Self {
            ticker: ticker.to_string(),
            points: series.to_points(ticker),
            activity: ActivityLevel::classify(snapshot.latest_z_score),
            z_scores: z,
            ma_ratios: ratios,
            snapshot,
            ma_ratio,
            price_change,
        })
    }
}
