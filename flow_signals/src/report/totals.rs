use serde::Serialize;

use crate::combined::TickerComponents;

/// Options premium totals for one ticker over the whole range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SizeTotals {
    /// Small-bucket call premium.
    pub small_call: f64,
    /// Small-bucket put premium.
    pub small_put: f64,
    /// Large-bucket call premium.
    pub large_call: f64,
    /// Large-bucket put premium.
    pub large_put: f64,
}

impl SizeTotals {
    /// Sum the reconciled call and put series of both buckets.
    pub fn from_components(c: &TickerComponents) -> Self {
        Self {
            small_call: c.small.call.total(),
            small_put: c.small.put.total(),
            large_call: c.large.call.total(),
            large_put: c.large.put.total(),
        }
    }

    /// Calls across both buckets.
    pub fn combined_call(&self) -> f64 {
        self.small_call + self.large_call
    }

    /// Puts across both buckets.
    pub fn combined_put(&self) -> f64 {
        self.small_put + self.large_put
    }

    /// Combined calls minus combined puts.
    pub fn combined_net(&self) -> f64 {
        self.combined_call() - self.combined_put()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_totals() {
        let t = SizeTotals {
            small_call: 10.0,
            small_put: 4.0,
            large_call: 100.0,
            large_put: 150.0,
        };
        assert_eq!(t.combined_call(), 110.0);
        assert_eq!(t.combined_put(), 154.0);
        assert_eq!(t.combined_net(), -44.0);
    }
}
