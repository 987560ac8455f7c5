use crate::domain::values::market_cap::MarketCapTier;
use crate::domain::values::session::TradingSegment;
use crate::domain::values::sentiment::SentimentStage;
use serde::{Deserialize, Serialize};

/// Admission thresholds for one instrument at one moment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdSet {
    pub min_pct_change: f64,
    pub min_volume_ratio: f64,
    pub min_turnover: f64,
    pub min_capital_inflow: f64,
    pub max_risk_score: f64,
    /// `None` when the float cap was unknown and the default bundle applies.
    pub market_cap_tier: Option<MarketCapTier>,
    pub segment: TradingSegment,
    pub stage: SentimentStage,
}

impl ThresholdSet {
    pub fn is_default_bundle(&self) -> bool {
        self.market_cap_tier.is_none()
    }
}
