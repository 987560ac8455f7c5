use serde::{Deserialize, Serialize};
use std::fmt;

const BILLION: f64 = 1_000_000_000.0;

/// Float market-cap bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarketCapTier {
    /// Below 5B.
    Small,
    /// [5B, 10B).
    Mid,
    /// [10B, 100B).
    Large,
    /// 100B and above.
    Mega,
}

/// Admission bundle attached to a market-cap tier, before time and
/// sentiment adjustments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierBundle {
    pub min_pct_change: f64,
    pub min_volume_ratio: f64,
    pub min_turnover: f64,
    pub max_risk_score: f64,
    /// Minimum inflow as a fraction of float cap.
    pub inflow_ratio: f64,
}

impl MarketCapTier {
    pub fn from_float_cap(float_market_cap: f64) -> Self {
        if float_market_cap < 5.0 * BILLION {
            MarketCapTier::Small
        } else if float_market_cap < 10.0 * BILLION {
            MarketCapTier::Mid
        } else if float_market_cap < 100.0 * BILLION {
            MarketCapTier::Large
        } else {
            MarketCapTier::Mega
        }
    }

    pub fn bundle(&self) -> TierBundle {
        match self {
            MarketCapTier::Small => TierBundle {
                min_pct_change: 2.0,
                min_volume_ratio: 1.2,
                min_turnover: 1.5,
                max_risk_score: 0.7,
                inflow_ratio: 0.002,
            },
            MarketCapTier::Mid => TierBundle {
                min_pct_change: 3.0,
                min_volume_ratio: 1.5,
                min_turnover: 2.0,
                max_risk_score: 0.6,
                inflow_ratio: 0.001,
            },
            MarketCapTier::Large => TierBundle {
                min_pct_change: 4.0,
                min_volume_ratio: 2.0,
                min_turnover: 2.5,
                max_risk_score: 0.5,
                inflow_ratio: 0.0005,
            },
            MarketCapTier::Mega => TierBundle {
                min_pct_change: 5.0,
                min_volume_ratio: 2.5,
                min_turnover: 3.0,
                max_risk_score: 0.4,
                inflow_ratio: 0.0002,
            },
        }
    }
}

impl fmt::Display for MarketCapTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarketCapTier::Small => write!(f, "SMALL"),
            MarketCapTier::Mid => write!(f, "MID"),
            MarketCapTier::Large => write!(f, "LARGE"),
            MarketCapTier::Mega => write!(f, "MEGA"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(MarketCapTier::from_float_cap(4.99e9), MarketCapTier::Small);
        assert_eq!(MarketCapTier::from_float_cap(5.0e9), MarketCapTier::Mid);
        assert_eq!(MarketCapTier::from_float_cap(1.0e10), MarketCapTier::Large);
        assert_eq!(MarketCapTier::from_float_cap(9.99e10), MarketCapTier::Large);
        assert_eq!(MarketCapTier::from_float_cap(1.0e11), MarketCapTier::Mega);
    }

    #[test]
    fn test_bundles_tighten_with_size() {
        let small = MarketCapTier::Small.bundle();
        let mega = MarketCapTier::Mega.bundle();
        assert!(small.min_pct_change < mega.min_pct_change);
        assert!(small.max_risk_score > mega.max_risk_score);
        assert!(small.inflow_ratio > mega.inflow_ratio);
    }
}
