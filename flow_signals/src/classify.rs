//! Band classification of Z-scores (activity) and MA ratios (momentum).
//!
//! Bands are half-open `[lower, upper)`: a value sitting exactly on a boundary
//! belongs to the higher band.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Activity level of the latest value relative to its own history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// `z < -1.5`
    ExtremeLight,
    /// `-1.5 <= z < -0.5`
    Light,
    /// `-0.5 <= z < 0.5`
    Neutral,
    /// `0.5 <= z < 1.5`
    Elevated,
    /// `z >= 1.5`
    Crowded,
}

impl ActivityLevel {
    /// Classify a Z-score. NaN is treated as neutral.
    pub fn classify(z: f64) -> Self {
        if z.is_nan() {
            ActivityLevel::Neutral
        } else if z < -1.5 {
            ActivityLevel::ExtremeLight
        } else if z < -0.5 {
            ActivityLevel::Light
        } else if z < 0.5 {
            ActivityLevel::Neutral
        } else if z < 1.5 {
            ActivityLevel::Elevated
        } else {
            ActivityLevel::Crowded
        }
    }

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            ActivityLevel::ExtremeLight => "Extreme Light",
            ActivityLevel::Light => "Light",
            ActivityLevel::Neutral => "Neutral",
            ActivityLevel::Elevated => "Elevated",
            ActivityLevel::Crowded => "Crowded",
        }
    }

    /// Severity rank, 0 (extreme light) through 4 (crowded).
    pub fn severity(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Momentum band of a 5/21 moving-average ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MomentumBand {
    /// `r < 0.5`
    StrongDowntrend,
    /// `0.5 <= r < 1.0`
    Downtrend,
    /// `1.0 <= r < 1.5`
    Uptrend,
    /// `r >= 1.5`
    StrongUptrend,
}

impl MomentumBand {
    /// Classify an MA ratio. NaN is treated as the neutral ratio 1.
    pub fn classify(ratio: f64) -> Self {
        let r = if ratio.is_nan() { 1.0 } else { ratio };
        if r < 0.5 {
            MomentumBand::StrongDowntrend
        } else if r < 1.0 {
            MomentumBand::Downtrend
        } else if r < 1.5 {
            MomentumBand::Uptrend
        } else {
            MomentumBand::StrongUptrend
        }
    }

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            MomentumBand::StrongDowntrend => "Strong Downtrend",
            MomentumBand::Downtrend => "Downtrend",
            MomentumBand::Uptrend => "Uptrend",
            MomentumBand::StrongUptrend => "Strong Uptrend",
        }
    }
}

impl fmt::Display for MomentumBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
