use crate::domain::values::board_tier::BoardTier;
use serde::{Deserialize, Serialize};

/// One instrument at evaluation time. Produced by the data collaborator,
/// already validated, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentSnapshot {
    pub id: String,
    #[serde(default)]
    pub sector: Option<String>,
    pub board: BoardTier,
    pub last_price: f64,
    pub prev_close: f64,
    pub pct_change: f64,
    pub volume: f64,
    pub amount: f64,
    /// Percent of float traded today.
    pub turnover_rate: f64,
    pub volume_ratio: f64,
    #[serde(default)]
    pub float_market_cap: Option<f64>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    #[serde(default)]
    pub bid_price: f64,
    #[serde(default)]
    pub bid_size: f64,
    #[serde(default)]
    pub ask_price: f64,
    #[serde(default)]
    pub ask_size: f64,
}

impl InstrumentSnapshot {
    /// Intraday risk in [0, 1]: half the day's amplitude relative to the
    /// board cap, half the pullback from the high.
    pub fn intraday_risk(&self) -> f64 {
        if self.prev_close <= 0.0 {
            return 1.0;
        }
        let range = (self.high - self.low).max(0.0);
        let amplitude_pct = range / self.prev_close * 100.0;
        let amplitude = (amplitude_pct / self.board.limit_pct()).min(1.0);
        let pullback = if range > 0.0 {
            ((self.high - self.last_price) / range).clamp(0.0, 1.0)
        } else {
            0.0
        };
        0.5 * amplitude + 0.5 * pullback
    }

    /// Bid notional over ask notional. `None` when both sides are empty;
    /// infinite when only the ask side is empty (sealed at the limit).
    pub fn bid_ask_ratio(&self) -> Option<f64> {
        let bid = (self.bid_price * self.bid_size).max(0.0);
        let ask = (self.ask_price * self.ask_size).max(0.0);
        match (bid > 0.0, ask > 0.0) {
            (false, false) => None,
            (_, false) => Some(f64::INFINITY),
            _ => Some(bid / ask),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(last: f64, high: f64, low: f64) -> InstrumentSnapshot {
        InstrumentSnapshot {
            id: "600000".into(),
            sector: None,
            board: BoardTier::Main,
            last_price: last,
            prev_close: 10.0,
            pct_change: (last - 10.0) / 10.0 * 100.0,
            volume: 0.0,
            amount: 0.0,
            turnover_rate: 0.0,
            volume_ratio: 0.0,
            float_market_cap: None,
            open: 10.0,
            high,
            low,
            bid_price: 0.0,
            bid_size: 0.0,
            ask_price: 0.0,
            ask_size: 0.0,
        }
    }

    #[test]
    fn test_intraday_risk_closing_at_high_is_amplitude_only() {
        // 5% range on a 10% board, closing at the high
        let s = snap(10.5, 10.5, 10.0);
        assert!((s.intraday_risk() - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_intraday_risk_full_pullback() {
        let s = snap(10.0, 11.0, 10.0);
        assert!((s.intraday_risk() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_flat_day_has_no_risk() {
        assert_eq!(snap(10.0, 10.0, 10.0).intraday_risk(), 0.0);
    }

    #[test]
    fn test_bid_ask_ratio() {
        let mut s = snap(10.0, 10.0, 10.0);
        assert_eq!(s.bid_ask_ratio(), None);
        s.bid_price = 10.0;
        s.bid_size = 1000.0;
        assert_eq!(s.bid_ask_ratio(), Some(f64::INFINITY));
        s.ask_price = 10.0;
        s.ask_size = 4000.0;
        assert_eq!(s.bid_ask_ratio(), Some(0.25));
    }
}
