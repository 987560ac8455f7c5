use serde::{Deserialize, Serialize};
use std::fmt;

/// Opening call-auction print for one instrument.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AuctionRecord {
    pub open_price: f64,
    pub prev_close: f64,
    /// Auction volume against the trailing average; 0.0 is a real reading.
    pub open_volume_ratio: f64,
    pub open_amount: f64,
    pub high: f64,
    pub low: f64,
    pub opened_at_limit: bool,
    /// Previous session's percent change, used to size the expectation
    /// premium for focus stocks.
    #[serde(default)]
    pub yesterday_change_pct: Option<f64>,
}

impl AuctionRecord {
    /// Opening gap in percent.
    pub fn gap_pct(&self) -> f64 {
        if self.prev_close <= 0.0 {
            return 0.0;
        }
        (self.open_price - self.prev_close) / self.prev_close * 100.0
    }
}

/// Classifier verdict on the opening call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuctionAction {
    StrongBuy,
    Buy,
    Watch,
    Reject,
}

impl fmt::Display for AuctionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuctionAction::StrongBuy => write!(f, "STRONG_BUY"),
            AuctionAction::Buy => write!(f, "BUY"),
            AuctionAction::Watch => write!(f, "WATCH"),
            AuctionAction::Reject => write!(f, "REJECT"),
        }
    }
}

/// Auction data as delivered by the collaborator. Absence is explicit, so a
/// missing print is never confused with a zero volume ratio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AuctionData {
    Available(AuctionRecord),
    #[default]
    Unavailable,
}

impl AuctionData {
    pub fn record(&self) -> Option<&AuctionRecord> {
        match self {
            AuctionData::Available(r) => Some(r),
            AuctionData::Unavailable => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(open: f64, prev: f64) -> AuctionRecord {
        AuctionRecord {
            open_price: open,
            prev_close: prev,
            open_volume_ratio: 0.0,
            open_amount: 0.0,
            high: open,
            low: open,
            opened_at_limit: false,
            yesterday_change_pct: None,
        }
    }

    #[test]
    fn test_gap_pct() {
        assert!((record(10.3, 10.0).gap_pct() - 3.0).abs() < 1e-9);
        assert!((record(9.8, 10.0).gap_pct() + 2.0).abs() < 1e-9);
        assert_eq!(record(10.0, 0.0).gap_pct(), 0.0);
    }

    #[test]
    fn test_unavailable_deserializes_from_tag() {
        let data: AuctionData = serde_json::from_str(r#"{"status":"unavailable"}"#).unwrap();
        assert_eq!(data, AuctionData::Unavailable);
        assert!(data.record().is_none());
    }
}
