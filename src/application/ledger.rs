//! Institutional-ledger adjuster.
//!
//! When yesterday's top seats bought heavily, today's opening gap says
//! whether they are walking into a trap (gap too high), setting up a
//! weak-to-strong turn, or already disappointed. Can force WAIT on its own.

use tracing::debug;

use crate::domain::ports::stage::{EvaluationContext, Stage};
use crate::domain::values::decision_config::LedgerConfig;
use crate::domain::values::ledger::{LedgerBucket, LedgerFact};
use crate::domain::values::signal::{RiskTier, Signal};

#[derive(Debug, Clone, PartialEq)]
pub struct LedgerAdjustment {
    /// `None` when the instrument is not on the luxury list.
    pub bucket: Option<LedgerBucket>,
    pub score: f64,
    pub forced_signal: Option<Signal>,
    pub elevate_risk: bool,
    pub reason: String,
}

pub struct InstitutionalLedgerAdjuster {
    config: LedgerConfig,
}

impl InstitutionalLedgerAdjuster {
    pub fn new(config: LedgerConfig) -> Self {
        Self { config }
    }

    pub fn adjust(&self, ledger: Option<&LedgerFact>, current_score: f64) -> LedgerAdjustment {
        let luxury = ledger.and_then(|l| {
            l.top_seat_net_buy
                .filter(|amount| *amount > self.config.luxury_net_buy)
                .map(|amount| (amount, l.open_change_pct))
        });

        let (net_buy, open_change_pct) = match luxury {
            Some(v) => v,
            None => {
                return LedgerAdjustment {
                    bucket: None,
                    score: current_score,
                    forced_signal: None,
                    elevate_risk: false,
                    reason: "not on the luxury list".into(),
                }
            }
        };

        let bucket = LedgerBucket::classify(open_change_pct);
        let (score, forced_signal, elevate_risk) = match bucket {
            LedgerBucket::Trap => (
                current_score.min(self.config.trap_score_cap),
                Some(Signal::Wait),
                false,
            ),
            LedgerBucket::WeakToStrong => (
                (current_score * self.config.weak_to_strong_multiplier).min(100.0),
                None,
                false,
            ),
            LedgerBucket::BelowExpectation => (
                current_score * self.config.below_expectation_multiplier,
                None,
                false,
            ),
            LedgerBucket::Observation => (
                current_score * self.config.observation_multiplier,
                None,
                true,
            ),
            LedgerBucket::Neutral => (current_score, None, false),
        };

        LedgerAdjustment {
            bucket: Some(bucket),
            score,
            forced_signal,
            elevate_risk,
            reason: format!(
                "{bucket} (net buy {:.0}, open {:+.2}%)",
                net_buy, open_change_pct
            ),
        }
    }
}

impl Stage for InstitutionalLedgerAdjuster {
    fn name(&self) -> &'static str {
        "institutional_ledger"
    }

    fn apply(&self, mut ctx: EvaluationContext) -> EvaluationContext {
        let adjustment = self.adjust(ctx.inputs.ledger.as_ref(), ctx.score);
        if adjustment.bucket.is_none() {
            return ctx;
        }
        debug!(
            instrument = %ctx.inputs.snapshot.id,
            reason = %adjustment.reason,
            "ledger adjusted"
        );

        ctx.ledger_bucket = adjustment.bucket;
        ctx.score = adjustment.score;
        if adjustment.elevate_risk {
            ctx.risk_tier = RiskTier::High;
        }
        ctx.note(self.name(), adjustment.reason);
        if let Some(signal) = adjustment.forced_signal {
            ctx.forced_signal = Some(signal);
            ctx.halted = true;
        }
        ctx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adjuster() -> InstitutionalLedgerAdjuster {
        InstitutionalLedgerAdjuster::new(LedgerConfig::default())
    }

    fn fact(net_buy: f64, open: f64) -> LedgerFact {
        LedgerFact {
            top_seat_net_buy: Some(net_buy),
            open_change_pct: open,
        }
    }

    #[test]
    fn test_trap_caps_score_and_forces_wait() {
        let a = adjuster().adjust(Some(&fact(60_000_000.0, 7.5)), 90.0);
        assert_eq!(a.bucket, Some(LedgerBucket::Trap));
        assert_eq!(a.forced_signal, Some(Signal::Wait));
        assert!(a.score <= 10.0);
    }

    #[test]
    fn test_trap_keeps_lower_score() {
        let a = adjuster().adjust(Some(&fact(60_000_000.0, 7.5)), 4.0);
        assert_eq!(a.score, 4.0);
    }

    #[test]
    fn test_weak_to_strong_boost_is_capped() {
        let a = adjuster().adjust(Some(&fact(80_000_000.0, 0.5)), 90.0);
        assert_eq!(a.bucket, Some(LedgerBucket::WeakToStrong));
        assert_eq!(a.score, 100.0);
        let b = adjuster().adjust(Some(&fact(80_000_000.0, -1.0)), 50.0);
        assert!((b.score - 65.0).abs() < 1e-9);
    }

    #[test]
    fn test_below_expectation_halves() {
        let a = adjuster().adjust(Some(&fact(80_000_000.0, -4.0)), 80.0);
        assert_eq!(a.score, 40.0);
        assert_eq!(a.forced_signal, None);
    }

    #[test]
    fn test_observation_zone_elevates_risk() {
        let a = adjuster().adjust(Some(&fact(80_000_000.0, 4.5)), 80.0);
        assert_eq!(a.bucket, Some(LedgerBucket::Observation));
        assert!((a.score - 72.0).abs() < 1e-9);
        assert!(a.elevate_risk);
    }

    #[test]
    fn test_below_luxury_threshold_is_pass_through() {
        let small = adjuster().adjust(Some(&fact(50_000_000.0, 7.5)), 90.0);
        assert_eq!(small.bucket, None);
        assert_eq!(small.score, 90.0);
        assert_eq!(small.forced_signal, None);

        let absent = LedgerFact {
            top_seat_net_buy: None,
            open_change_pct: 7.5,
        };
        assert_eq!(adjuster().adjust(Some(&absent), 90.0).bucket, None);
        assert_eq!(adjuster().adjust(None, 90.0).score, 90.0);
    }
}
