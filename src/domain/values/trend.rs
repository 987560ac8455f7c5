use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Trend over the lookback window, derived externally from moving-average
/// slope and price-vs-average position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrendFact {
    Up,
    Down,
    Sideways,
}

impl fmt::Display for TrendFact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendFact::Up => write!(f, "UP"),
            TrendFact::Down => write!(f, "DOWN"),
            TrendFact::Sideways => write!(f, "SIDEWAYS"),
        }
    }
}

impl FromStr for TrendFact {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "UP" => Ok(TrendFact::Up),
            "DOWN" => Ok(TrendFact::Down),
            "SIDEWAYS" => Ok(TrendFact::Sideways),
            _ => Err(format!("Unknown trend: {s}")),
        }
    }
}
