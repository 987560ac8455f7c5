//! Environmental gate: the market-wide circuit breaker.
//!
//! Runs first. A frozen market forces WAIT unless the instrument is already
//! in its board's limit band. Otherwise the gate only leaves instructions
//! (an EBB multiplier, a pending resonance bonus) for the orchestrator.

use tracing::debug;

use crate::domain::ports::stage::{EvaluationContext, Stage};
use crate::domain::values::board_tier::BoardTier;
use crate::domain::values::decision_config::GateConfig;
use crate::domain::values::sentiment::{Regime, SentimentState};
use crate::domain::values::signal::{RiskTier, Signal};

#[derive(Debug, Clone, PartialEq)]
pub struct GateResult {
    pub short_circuit: bool,
    pub forced_signal: Option<Signal>,
    /// Applied to the final score, not here.
    pub multiplier: f64,
    /// Added at the final combination step if the trend turns out UP.
    pub pending_resonance_bonus: Option<f64>,
    /// A freeze was waived for a limit-band instrument.
    pub bypassed: bool,
    pub reason: String,
}

pub struct EnvironmentalGate {
    config: GateConfig,
}

impl EnvironmentalGate {
    pub fn new(config: GateConfig) -> Self {
        Self { config }
    }

    pub fn gate(
        &self,
        sentiment: Option<&SentimentState>,
        pct_change: f64,
        board: BoardTier,
    ) -> GateResult {
        let sentiment = match sentiment {
            Some(s) => s,
            None => {
                return GateResult {
                    short_circuit: false,
                    forced_signal: None,
                    multiplier: 1.0,
                    pending_resonance_bonus: None,
                    bypassed: false,
                    reason: "sentiment unavailable, gate neutral".into(),
                }
            }
        };

        if sentiment.score < self.config.freeze_score {
            if board.is_near_limit(pct_change) {
                return GateResult {
                    short_circuit: false,
                    forced_signal: None,
                    multiplier: 1.0,
                    pending_resonance_bonus: None,
                    bypassed: true,
                    reason: format!(
                        "freeze (sentiment {:.0}) bypassed: {:+.2}% is inside the {} limit band",
                        sentiment.score, pct_change, board
                    ),
                };
            }
            return GateResult {
                short_circuit: true,
                forced_signal: Some(Signal::Wait),
                multiplier: 0.0,
                pending_resonance_bonus: None,
                bypassed: false,
                reason: format!("market frozen (sentiment {:.0})", sentiment.score),
            };
        }

        let multiplier = if sentiment.regime == Regime::Ebb {
            self.config.ebb_multiplier
        } else {
            1.0
        };
        let pending_resonance_bonus = if sentiment.score > self.config.resonance_score {
            Some(self.config.resonance_bonus)
        } else {
            None
        };

        let mut reason = format!("{} regime, sentiment {:.0}", sentiment.regime, sentiment.score);
        if multiplier != 1.0 {
            reason.push_str(&format!(", score x{multiplier}"));
        }
        if let Some(bonus) = pending_resonance_bonus {
            reason.push_str(&format!(", +{bonus:.0} pending on UP trend"));
        }

        GateResult {
            short_circuit: false,
            forced_signal: None,
            multiplier,
            pending_resonance_bonus,
            bypassed: false,
            reason,
        }
    }
}

impl Stage for EnvironmentalGate {
    fn name(&self) -> &'static str {
        "environmental_gate"
    }

    fn apply(&self, mut ctx: EvaluationContext) -> EvaluationContext {
        let snapshot = &ctx.inputs.snapshot;
        let result = self.gate(ctx.sentiment.as_ref(), snapshot.pct_change, snapshot.board);
        debug!(instrument = %snapshot.id, short_circuit = result.short_circuit, "{}", result.reason);

        if result.short_circuit {
            ctx.risk_tier = RiskTier::High;
            ctx.halt(
                result.forced_signal.unwrap_or(Signal::Wait),
                self.name(),
                result.reason,
            );
            return ctx;
        }

        ctx.environment_multiplier = result.multiplier;
        ctx.pending_resonance_bonus = result.pending_resonance_bonus;
        ctx.note(self.name(), result.reason);
        ctx
    }
}
