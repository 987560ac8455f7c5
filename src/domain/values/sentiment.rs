//! Market-wide sentiment, refreshed by a collaborator and read-only here.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Coarse market mood label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Regime {
    Surge,
    Ebb,
    Chop,
    Freeze,
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Regime::Surge => write!(f, "SURGE"),
            Regime::Ebb => write!(f, "EBB"),
            Regime::Chop => write!(f, "CHOP"),
            Regime::Freeze => write!(f, "FREEZE"),
        }
    }
}

impl FromStr for Regime {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "SURGE" => Ok(Regime::Surge),
            "EBB" => Ok(Regime::Ebb),
            "CHOP" => Ok(Regime::Chop),
            "FREEZE" => Ok(Regime::Freeze),
            _ => Err(format!("Unknown sentiment regime: {s}")),
        }
    }
}

/// Position in the speculative cycle. Drives the inflow and risk multipliers
/// of the threshold calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SentimentStage {
    Start,
    Main,
    Climax,
    Divergence,
    Recession,
    Freeze,
}

impl SentimentStage {
    /// Applied to the minimum inflow; its inverse to the risk ceiling.
    pub fn inflow_multiplier(&self) -> f64 {
        match self {
            SentimentStage::Start | SentimentStage::Main | SentimentStage::Climax => 0.8,
            SentimentStage::Divergence => 1.0,
            SentimentStage::Recession | SentimentStage::Freeze => 1.2,
        }
    }
}

impl From<Regime> for SentimentStage {
    fn from(regime: Regime) -> Self {
        match regime {
            Regime::Surge => SentimentStage::Main,
            Regime::Chop => SentimentStage::Divergence,
            Regime::Ebb => SentimentStage::Recession,
            Regime::Freeze => SentimentStage::Freeze,
        }
    }
}

impl fmt::Display for SentimentStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SentimentStage::Start => write!(f, "START"),
            SentimentStage::Main => write!(f, "MAIN"),
            SentimentStage::Climax => write!(f, "CLIMAX"),
            SentimentStage::Divergence => write!(f, "DIVERGENCE"),
            SentimentStage::Recession => write!(f, "RECESSION"),
            SentimentStage::Freeze => write!(f, "FREEZE"),
        }
    }
}

impl FromStr for SentimentStage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "START" => Ok(SentimentStage::Start),
            "MAIN" => Ok(SentimentStage::Main),
            "CLIMAX" => Ok(SentimentStage::Climax),
            "DIVERGENCE" => Ok(SentimentStage::Divergence),
            "RECESSION" => Ok(SentimentStage::Recession),
            "FREEZE" => Ok(SentimentStage::Freeze),
            _ => Err(format!("Unknown sentiment stage: {s}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentState {
    /// 0 to 100.
    pub score: f64,
    pub regime: Regime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<SentimentStage>,
}

impl SentimentState {
    pub fn new(score: f64, regime: Regime) -> Self {
        Self {
            score: score.clamp(0.0, 100.0),
            regime,
            stage: None,
        }
    }

    pub fn with_stage(mut self, stage: SentimentStage) -> Self {
        self.stage = Some(stage);
        self
    }

    /// Explicit stage when the collaborator supplies one, otherwise derived
    /// from the regime.
    pub fn effective_stage(&self) -> SentimentStage {
        self.stage.unwrap_or_else(|| self.regime.into())
    }
}
