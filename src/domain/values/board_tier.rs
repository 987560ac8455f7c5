use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Listing segment. Decides the daily price-move cap and the band treated
/// as "effectively at the cap".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BoardTier {
    Main,
    Growth,
    SciTech,
    Beijing,
}

impl BoardTier {
    /// Daily limit-up, in percent.
    pub fn limit_pct(&self) -> f64 {
        match self {
            BoardTier::Main => 10.0,
            BoardTier::Growth | BoardTier::SciTech => 20.0,
            BoardTier::Beijing => 30.0,
        }
    }

    /// Half a point below the hard cap, to tolerate tick rounding.
    pub fn near_limit_pct(&self) -> f64 {
        match self {
            BoardTier::Main => 9.5,
            BoardTier::Growth | BoardTier::SciTech => 19.5,
            BoardTier::Beijing => 29.5,
        }
    }

    pub fn is_near_limit(&self, pct_change: f64) -> bool {
        pct_change >= self.near_limit_pct()
    }

    /// Score multiplier applied when limit-up immunity is active.
    pub fn immunity_multiplier(&self) -> f64 {
        match self {
            BoardTier::Main => 1.0,
            BoardTier::Growth | BoardTier::SciTech | BoardTier::Beijing => 1.1,
        }
    }
}

impl fmt::Display for BoardTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardTier::Main => write!(f, "MAIN"),
            BoardTier::Growth => write!(f, "GROWTH"),
            BoardTier::SciTech => write!(f, "SCI_TECH"),
            BoardTier::Beijing => write!(f, "BEIJING"),
        }
    }
}

impl FromStr for BoardTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "MAIN" => Ok(BoardTier::Main),
            "GROWTH" => Ok(BoardTier::Growth),
            "SCI_TECH" | "SCITECH" => Ok(BoardTier::SciTech),
            "BEIJING" => Ok(BoardTier::Beijing),
            _ => Err(format!("Unknown board tier: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_near_limit_bands() {
        assert!(BoardTier::Main.is_near_limit(9.5));
        assert!(!BoardTier::Main.is_near_limit(9.49));
        assert!(BoardTier::Growth.is_near_limit(19.8));
        assert!(!BoardTier::SciTech.is_near_limit(12.0));
        assert!(BoardTier::Beijing.is_near_limit(29.5));
        assert!(!BoardTier::Beijing.is_near_limit(20.0));
    }

    #[test]
    fn test_immunity_multiplier_by_cap() {
        assert_eq!(BoardTier::Main.immunity_multiplier(), 1.0);
        assert_eq!(BoardTier::Growth.immunity_multiplier(), 1.1);
        assert_eq!(BoardTier::Beijing.immunity_multiplier(), 1.1);
    }

    #[test]
    fn test_parse_roundtrip_display() {
        for tier in [BoardTier::Main, BoardTier::Growth, BoardTier::SciTech, BoardTier::Beijing] {
            assert_eq!(tier.to_string().parse::<BoardTier>().unwrap(), tier);
        }
        assert!("nasdaq".parse::<BoardTier>().is_err());
    }
}
