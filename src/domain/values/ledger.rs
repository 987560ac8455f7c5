use serde::{Deserialize, Serialize};
use std::fmt;

/// Yesterday's top-seat disclosure plus today's opening move.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LedgerFact {
    /// Net buy from top-tier seats in the prior session; `None` when the
    /// instrument was not on the disclosure list.
    #[serde(default)]
    pub top_seat_net_buy: Option<f64>,
    /// Today's opening percent change.
    pub open_change_pct: f64,
}

/// Opening-gap bucket for an instrument on the luxury list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LedgerBucket {
    /// Gap above 6%: the big seats are positioned to sell into strength.
    Trap,
    /// Gap in [-2%, 3%].
    WeakToStrong,
    /// Gap below -3%.
    BelowExpectation,
    /// Gap in (3%, 6%].
    Observation,
    /// Gap in [-3%, -2%): no rule applies.
    Neutral,
}

impl LedgerBucket {
    pub fn classify(open_change_pct: f64) -> Self {
        if open_change_pct > 6.0 {
            LedgerBucket::Trap
        } else if open_change_pct > 3.0 {
            LedgerBucket::Observation
        } else if open_change_pct >= -2.0 {
            LedgerBucket::WeakToStrong
        } else if open_change_pct < -3.0 {
            LedgerBucket::BelowExpectation
        } else {
            LedgerBucket::Neutral
        }
    }
}

impl fmt::Display for LedgerBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerBucket::Trap => write!(f, "trap"),
            LedgerBucket::WeakToStrong => write!(f, "weak-to-strong"),
            LedgerBucket::BelowExpectation => write!(f, "below expectation"),
            LedgerBucket::Observation => write!(f, "observation zone"),
            LedgerBucket::Neutral => write!(f, "neutral"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_breakpoints() {
        assert_eq!(LedgerBucket::classify(7.5), LedgerBucket::Trap);
        assert_eq!(LedgerBucket::classify(6.0), LedgerBucket::Observation);
        assert_eq!(LedgerBucket::classify(3.01), LedgerBucket::Observation);
        assert_eq!(LedgerBucket::classify(3.0), LedgerBucket::WeakToStrong);
        assert_eq!(LedgerBucket::classify(0.5), LedgerBucket::WeakToStrong);
        assert_eq!(LedgerBucket::classify(-2.0), LedgerBucket::WeakToStrong);
        assert_eq!(LedgerBucket::classify(-2.5), LedgerBucket::Neutral);
        assert_eq!(LedgerBucket::classify(-3.0), LedgerBucket::Neutral);
        assert_eq!(LedgerBucket::classify(-3.5), LedgerBucket::BelowExpectation);
    }
}
