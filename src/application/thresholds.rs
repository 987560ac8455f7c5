//! Dynamic admission thresholds.
//!
//! Bundles come from the float market-cap tier; the minimum capital inflow
//! is then scaled by the time-of-day segment and the sentiment stage, and
//! the risk ceiling by the inverse of the stage factor.

use chrono::NaiveDateTime;
use tracing::debug;

use crate::domain::entities::inputs::InstrumentInputs;
use crate::domain::ports::stage::{EvaluationContext, Stage};
use crate::domain::values::decision_config::ThresholdConfig;
use crate::domain::values::market_cap::MarketCapTier;
use crate::domain::values::sentiment::SentimentStage;
use crate::domain::values::session::TradingSegment;
use crate::domain::values::thresholds::ThresholdSet;

#[derive(Debug, Clone, Default)]
pub struct DynamicThresholdCalculator {
    config: ThresholdConfig,
}

impl DynamicThresholdCalculator {
    pub fn new(config: ThresholdConfig) -> Self {
        Self { config }
    }

    pub fn compute(
        &self,
        float_market_cap: Option<f64>,
        timestamp: NaiveDateTime,
        stage: SentimentStage,
        yesterday_amount: Option<f64>,
    ) -> ThresholdSet {
        let segment = TradingSegment::from_time(timestamp.time());

        let cap = match float_market_cap {
            Some(cap) if cap > 0.0 => cap,
            _ => {
                return ThresholdSet {
                    min_pct_change: self.config.default_min_pct_change,
                    min_volume_ratio: self.config.default_min_volume_ratio,
                    min_turnover: self.config.default_min_turnover,
                    min_capital_inflow: self.config.default_min_inflow,
                    max_risk_score: self.config.default_max_risk_score,
                    market_cap_tier: None,
                    segment,
                    stage,
                }
            }
        };

        let tier = MarketCapTier::from_float_cap(cap);
        let bundle = tier.bundle();

        let cap_floor = cap * bundle.inflow_ratio;
        let base_inflow = match yesterday_amount {
            Some(amount) if amount > 0.0 => cap_floor.max(amount * self.config.yesterday_amount_ratio),
            _ => cap_floor,
        };

        let stage_factor = stage.inflow_multiplier();
        ThresholdSet {
            min_pct_change: bundle.min_pct_change,
            min_volume_ratio: bundle.min_volume_ratio,
            min_turnover: bundle.min_turnover,
            min_capital_inflow: base_inflow * segment.inflow_multiplier() * stage_factor,
            max_risk_score: bundle.max_risk_score / stage_factor,
            market_cap_tier: Some(tier),
            segment,
            stage,
        }
    }

    /// Every criterion the instrument misses; empty means admitted.
    pub fn failures(&self, thresholds: &ThresholdSet, inputs: &InstrumentInputs) -> Vec<String> {
        let snap = &inputs.snapshot;
        let mut failures = Vec::new();

        if snap.pct_change < thresholds.min_pct_change {
            failures.push(format!(
                "change {:.2}% < {:.1}%",
                snap.pct_change, thresholds.min_pct_change
            ));
        }
        if snap.volume_ratio < thresholds.min_volume_ratio {
            failures.push(format!(
                "volume ratio {:.2} < {:.1}",
                snap.volume_ratio, thresholds.min_volume_ratio
            ));
        }
        if snap.turnover_rate < thresholds.min_turnover {
            failures.push(format!(
                "turnover {:.2}% < {:.1}%",
                snap.turnover_rate, thresholds.min_turnover
            ));
        }
        if inputs.capital.net_amount < thresholds.min_capital_inflow {
            failures.push(format!(
                "inflow {:.0} < {:.0}",
                inputs.capital.net_amount, thresholds.min_capital_inflow
            ));
        }
        let risk = snap.intraday_risk();
        if risk > thresholds.max_risk_score {
            failures.push(format!(
                "intraday risk {:.2} > {:.2}",
                risk, thresholds.max_risk_score
            ));
        }
        failures
    }
}

impl Stage for DynamicThresholdCalculator {
    fn name(&self) -> &'static str {
        "dynamic_threshold"
    }

    fn apply(&self, mut ctx: EvaluationContext) -> EvaluationContext {
        let stage = ctx
            .sentiment
            .map(|s| s.effective_stage())
            .unwrap_or(SentimentStage::Divergence);
        let thresholds = self.compute(
            ctx.inputs.snapshot.float_market_cap,
            ctx.inputs.timestamp,
            stage,
            ctx.inputs.yesterday_amount,
        );
        ctx.thresholds = Some(thresholds);

        let tier = thresholds
            .market_cap_tier
            .map(|t| t.to_string())
            .unwrap_or_else(|| "default bundle, float cap unknown".into());

        if ctx.limit_up_immunity {
            ctx.note(self.name(), format!("bypassed by limit-up immunity ({tier})"));
            return ctx;
        }

        let failures = self.failures(&thresholds, &ctx.inputs);
        debug!(
            instrument = %ctx.inputs.snapshot.id,
            failures = failures.len(),
            "thresholds checked"
        );
        if failures.is_empty() {
            ctx.note(
                self.name(),
                format!("admitted ({tier}, {}, {})", thresholds.segment, thresholds.stage),
            );
        } else {
            ctx.reject(
                self.name(),
                format!("not admitted ({tier}): {}", failures.join(", ")),
            );
        }
        ctx
    }
}
