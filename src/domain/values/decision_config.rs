//! Rule constants for the decision pipeline.
//!
//! Defaults reproduce the production rule set. Hosts may override any
//! field through a JSON file; missing fields keep their defaults.

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Accepted range for `market_state_ttl_secs`.
pub const MARKET_STATE_TTL_RANGE: std::ops::RangeInclusive<u64> = 60..=600;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Below this sentiment score the market is frozen.
    pub freeze_score: f64,
    /// Score multiplier carried forward in an EBB regime.
    pub ebb_multiplier: f64,
    /// Above this sentiment score an UP trend earns the resonance bonus.
    pub resonance_score: f64,
    pub resonance_bonus: f64,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            freeze_score: 20.0,
            ebb_multiplier: 0.5,
            resonance_score: 60.0,
            resonance_bonus: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VetoConfig {
    /// Absolute outflow that fires the capital veto (negative amount).
    pub outflow_amount: f64,
    /// Outflow as a fraction of float cap that fires the capital veto.
    pub outflow_ratio: f64,
    pub resonance_multiplier: f64,
    pub accumulation_multiplier: f64,
    pub divergence_multiplier: f64,
}

impl Default for VetoConfig {
    fn default() -> Self {
        Self {
            outflow_amount: -50_000_000.0,
            outflow_ratio: -0.01,
            resonance_multiplier: 1.2,
            accumulation_multiplier: 0.9,
            divergence_multiplier: 0.4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    /// Admission bundle used when the float cap is unknown.
    pub default_min_pct_change: f64,
    pub default_min_volume_ratio: f64,
    pub default_min_turnover: f64,
    pub default_min_inflow: f64,
    pub default_max_risk_score: f64,
    /// Share of yesterday's traded amount that also bounds the inflow floor.
    pub yesterday_amount_ratio: f64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            default_min_pct_change: 3.0,
            default_min_volume_ratio: 1.5,
            default_min_turnover: 2.0,
            default_min_inflow: 10_000_000.0,
            default_max_risk_score: 0.6,
            yesterday_amount_ratio: 0.01,
        }
    }
}

/// Opening-auction premiums are in percent of the previous close.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuctionConfig {
    /// Non-focus premium and premium floor.
    pub base_premium_pct: f64,
    pub max_scaled_premium_pct: f64,
    pub premium_ceiling_pct: f64,
    /// Yesterday's gain assumed for a focus stock when none is supplied.
    pub assumed_focus_gain_pct: f64,
    pub limit_open_bonus: f64,
    pub explosive_bonus: f64,
}

impl Default for AuctionConfig {
    fn default() -> Self {
        Self {
            base_premium_pct: 0.5,
            max_scaled_premium_pct: 3.0,
            premium_ceiling_pct: 5.0,
            assumed_focus_gain_pct: 9.0,
            limit_open_bonus: 0.2,
            explosive_bonus: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectorConfig {
    pub min_limit_up_peers: u32,
    pub min_breadth: f64,
    pub weight_limit_up: f64,
    pub weight_breadth: f64,
    pub weight_inflow: f64,
    /// Conditions that must hold for the sector to count as resonant.
    pub min_conditions: usize,
}

impl Default for SectorConfig {
    fn default() -> Self {
        Self {
            min_limit_up_peers: 3,
            min_breadth: 0.35,
            weight_limit_up: 0.40,
            weight_breadth: 0.35,
            weight_inflow: 0.25,
            min_conditions: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Net buy above which the prior session counts as a luxury list.
    pub luxury_net_buy: f64,
    pub trap_score_cap: f64,
    pub weak_to_strong_multiplier: f64,
    pub below_expectation_multiplier: f64,
    pub observation_multiplier: f64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            luxury_net_buy: 50_000_000.0,
            trap_score_cap: 10.0,
            weak_to_strong_multiplier: 1.3,
            below_expectation_multiplier: 0.5,
            observation_multiplier: 0.9,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderBookConfig {
    /// Bid/ask notional ratio under which the book is considered weak.
    pub min_bid_ask_ratio: f64,
}

impl Default for OrderBookConfig {
    fn default() -> Self {
        Self {
            min_bid_ask_ratio: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionConfig {
    pub gate: GateConfig,
    pub veto: VetoConfig,
    pub thresholds: ThresholdConfig,
    pub sector: SectorConfig,
    pub auction: AuctionConfig,
    pub ledger: LedgerConfig,
    pub order_book: OrderBookConfig,
    pub buy_threshold: f64,
    pub immunity_buy_threshold: f64,
    /// Sentiment and sector snapshots older than this are treated as unknown.
    pub market_state_ttl_secs: u64,
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            gate: GateConfig::default(),
            veto: VetoConfig::default(),
            thresholds: ThresholdConfig::default(),
            sector: SectorConfig::default(),
            auction: AuctionConfig::default(),
            ledger: LedgerConfig::default(),
            order_book: OrderBookConfig::default(),
            buy_threshold: 85.0,
            immunity_buy_threshold: 75.0,
            market_state_ttl_secs: 300,
        }
    }
}

impl DecisionConfig {
    pub fn from_json(json: &str) -> Result<Self, String> {
        let config: DecisionConfig =
            serde_json::from_str(json).map_err(|e| format!("Invalid config JSON: {e}"))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=100.0).contains(&self.buy_threshold)
            || !(0.0..=100.0).contains(&self.immunity_buy_threshold)
        {
            return Err("BUY thresholds must be within 0..=100".into());
        }
        if self.sector.min_conditions == 0 || self.sector.min_conditions > 3 {
            return Err(format!(
                "sector.min_conditions must be 1..=3, got {}",
                self.sector.min_conditions
            ));
        }
        if self.veto.outflow_amount > 0.0 || self.veto.outflow_ratio > 0.0 {
            return Err("veto outflow thresholds must be negative".into());
        }
        if !MARKET_STATE_TTL_RANGE.contains(&self.market_state_ttl_secs) {
            return Err(format!(
                "market_state_ttl_secs must be {}..={}, got {}",
                MARKET_STATE_TTL_RANGE.start(),
                MARKET_STATE_TTL_RANGE.end(),
                self.market_state_ttl_secs
            ));
        }
        let auction = &self.auction;
        if auction.base_premium_pct > auction.premium_ceiling_pct {
            return Err("auction.base_premium_pct must not exceed premium_ceiling_pct".into());
        }
        Ok(())
    }

    /// Market-state TTL, clamped into the accepted range so an unvalidated
    /// config can never overflow the duration.
    pub fn market_state_ttl(&self) -> Duration {
        let secs = self
            .market_state_ttl_secs
            .clamp(*MARKET_STATE_TTL_RANGE.start(), *MARKET_STATE_TTL_RANGE.end());
        Duration::seconds(i64::try_from(secs).unwrap_or(600))
    }
}
