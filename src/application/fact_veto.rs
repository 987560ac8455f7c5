//! Fact-veto and resonance scorer.
//!
//! First-order observables override the narrative: a heavy capital outflow
//! sells, a falling trend waits. Limit-up immunity is checked before either
//! veto and skips both. Survivors get a multiplier from how capital and
//! trend line up.

use tracing::debug;

use crate::domain::ports::stage::{EvaluationContext, Stage};
use crate::domain::values::board_tier::BoardTier;
use crate::domain::values::capital_flow::CapitalFlowFact;
use crate::domain::values::decision_config::VetoConfig;
use crate::domain::values::signal::{RiskTier, Signal};
use crate::domain::values::trend::TrendFact;

#[derive(Debug, Clone, PartialEq)]
pub struct FactVetoOutcome {
    pub score: f64,
    pub forced_signal: Option<Signal>,
    pub risk_tier: RiskTier,
    pub fact_veto_fired: bool,
    pub limit_up_immunity: bool,
    pub multiplier: f64,
    /// Which branch decided, e.g. "capital veto", "resonance".
    pub verdict: &'static str,
    pub detail: String,
}

pub struct FactVetoScorer {
    config: VetoConfig,
}

impl FactVetoScorer {
    pub fn new(config: VetoConfig) -> Self {
        Self { config }
    }

    pub fn score(
        &self,
        capital: &CapitalFlowFact,
        trend: TrendFact,
        base_narrative_score: f64,
        board: BoardTier,
        pct_change: f64,
    ) -> FactVetoOutcome {
        let base = base_narrative_score.clamp(0.0, 100.0);

        if board.is_near_limit(pct_change) {
            let multiplier = board.immunity_multiplier();
            return FactVetoOutcome {
                score: (base * multiplier).clamp(0.0, 100.0),
                forced_signal: None,
                risk_tier: RiskTier::Medium,
                fact_veto_fired: false,
                limit_up_immunity: true,
                multiplier,
                verdict: "limit-up immunity",
                detail: format!(
                    "{:+.2}% at the {} limit band, vetoes skipped, x{multiplier}",
                    pct_change, board
                ),
            };
        }

        if let Some(detail) = self.capital_veto(capital) {
            return FactVetoOutcome {
                score: 0.0,
                forced_signal: Some(Signal::Sell),
                risk_tier: RiskTier::High,
                fact_veto_fired: true,
                limit_up_immunity: false,
                multiplier: 0.0,
                verdict: "capital veto",
                detail,
            };
        }

        if trend == TrendFact::Down {
            return FactVetoOutcome {
                score: 0.0,
                forced_signal: Some(Signal::Wait),
                risk_tier: RiskTier::High,
                fact_veto_fired: true,
                limit_up_immunity: false,
                multiplier: 0.0,
                verdict: "trend veto",
                detail: "trend is DOWN".into(),
            };
        }

        let (multiplier, risk_tier, verdict) = match (capital.is_inflow(), trend) {
            (true, TrendFact::Up) => (self.config.resonance_multiplier, RiskTier::Low, "resonance"),
            (true, _) => (self.config.accumulation_multiplier, RiskTier::Medium, "accumulation"),
            (false, TrendFact::Up) => (
                self.config.divergence_multiplier,
                RiskTier::High,
                "divergence / bull trap",
            ),
            (false, _) => (0.0, RiskTier::Low, "dead zone"),
        };

        FactVetoOutcome {
            score: (base * multiplier).clamp(0.0, 100.0),
            forced_signal: None,
            risk_tier,
            fact_veto_fired: false,
            limit_up_immunity: false,
            multiplier,
            verdict,
            detail: format!(
                "capital {:.0}, trend {}, {:.1} x{multiplier}",
                capital.net_amount, trend, base
            ),
        }
    }

    fn capital_veto(&self, capital: &CapitalFlowFact) -> Option<String> {
        if capital.net_amount < self.config.outflow_amount {
            return Some(format!(
                "net outflow {:.0} below {:.0}",
                capital.net_amount, self.config.outflow_amount
            ));
        }
        match capital.flow_to_cap_ratio() {
            Some(ratio) if ratio < self.config.outflow_ratio => Some(format!(
                "net outflow {:.2}% of float cap below {:.2}%",
                ratio * 100.0,
                self.config.outflow_ratio * 100.0
            )),
            _ => None,
        }
    }
}

impl Stage for FactVetoScorer {
    fn name(&self) -> &'static str {
        "fact_veto"
    }

    fn apply(&self, mut ctx: EvaluationContext) -> EvaluationContext {
        let inputs = &ctx.inputs;
        let mut capital = inputs.capital;
        if capital.float_market_cap.is_none() {
            capital.float_market_cap = inputs.snapshot.float_market_cap;
        }

        let outcome = self.score(
            &capital,
            inputs.trend,
            inputs.narrative_score,
            inputs.snapshot.board,
            inputs.snapshot.pct_change,
        );
        debug!(
            instrument = %inputs.snapshot.id,
            verdict = outcome.verdict,
            score = outcome.score,
            "fact veto scored"
        );

        ctx.limit_up_immunity = outcome.limit_up_immunity;
        ctx.fact_veto_fired = outcome.fact_veto_fired;
        ctx.risk_tier = outcome.risk_tier;
        let detail = format!("{}: {}", outcome.verdict, outcome.detail);

        match outcome.forced_signal {
            Some(signal) => ctx.halt(signal, self.name(), detail),
            None => {
                ctx.score = outcome.score;
                ctx.note(self.name(), detail);
            }
        }
        ctx
    }
}
