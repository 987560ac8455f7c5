//! Exchange trading-day segments.
//!
//! Continuous trading runs 09:30–11:30 and 13:00–15:00 exchange time; the
//! call auction precedes it.

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradingSegment {
    CallAuction,
    /// First 30 minutes of continuous trading.
    Opening,
    MidSession,
    /// Last 30 minutes.
    Closing,
    AfterHours,
}

impl TradingSegment {
    pub fn from_time(time: NaiveTime) -> Self {
        let minutes = time.hour() * 60 + time.minute();
        match minutes {
            m if m < 9 * 60 + 30 => TradingSegment::CallAuction,
            m if m < 10 * 60 => TradingSegment::Opening,
            m if m < 14 * 60 + 30 => TradingSegment::MidSession,
            m if m < 15 * 60 => TradingSegment::Closing,
            // 15:00:00 sharp is the closing print
            m if m == 15 * 60 && time.second() == 0 => TradingSegment::Closing,
            _ => TradingSegment::AfterHours,
        }
    }

    /// Multiplier on the minimum capital inflow.
    pub fn inflow_multiplier(&self) -> f64 {
        match self {
            TradingSegment::CallAuction | TradingSegment::Opening => 0.8,
            TradingSegment::MidSession | TradingSegment::AfterHours => 1.0,
            TradingSegment::Closing => 1.2,
        }
    }

    /// The auction classifier only speaks during these segments.
    pub fn is_opening_window(&self) -> bool {
        matches!(self, TradingSegment::CallAuction | TradingSegment::Opening)
    }
}

impl fmt::Display for TradingSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradingSegment::CallAuction => write!(f, "CALL_AUCTION"),
            TradingSegment::Opening => write!(f, "OPENING"),
            TradingSegment::MidSession => write!(f, "MID_SESSION"),
            TradingSegment::Closing => write!(f, "CLOSING"),
            TradingSegment::AfterHours => write!(f, "AFTER_HOURS"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(h: u32, m: u32, s: u32) -> TradingSegment {
        TradingSegment::from_time(NaiveTime::from_hms_opt(h, m, s).unwrap())
    }

    #[test]
    fn test_segment_boundaries() {
        assert_eq!(at(9, 25, 0), TradingSegment::CallAuction);
        assert_eq!(at(9, 30, 0), TradingSegment::Opening);
        assert_eq!(at(9, 59, 59), TradingSegment::Opening);
        assert_eq!(at(10, 0, 0), TradingSegment::MidSession);
        assert_eq!(at(13, 15, 0), TradingSegment::MidSession);
        assert_eq!(at(14, 30, 0), TradingSegment::Closing);
        assert_eq!(at(15, 0, 0), TradingSegment::Closing);
        assert_eq!(at(15, 0, 1), TradingSegment::AfterHours);
    }

    #[test]
    fn test_opening_window() {
        assert!(at(9, 20, 0).is_opening_window());
        assert!(at(9, 45, 0).is_opening_window());
        assert!(!at(10, 30, 0).is_opening_window());
    }
}
