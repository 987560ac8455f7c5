//! Stage port for the decision pipeline.
//!
//! Defines the [`Stage`] trait and the [`EvaluationContext`] every stage
//! reads and rewrites. One evaluation threads a single context through an
//! ordered list of stages; a stage that reaches a terminal verdict halts the
//! context and the remaining stages are skipped.
//!
//! # Overview
//!
//! - Implement [`Stage`] to add a rule layer without touching existing ones
//! - Record every decision with [`EvaluationContext::note`] so the final
//!   record explains itself
//! - Use [`EvaluationContext::halt`] for vetoes and
//!   [`EvaluationContext::reject`] for admission misses

use crate::domain::entities::decision::ReasonFragment;
use crate::domain::entities::inputs::{InstrumentInputs, MarketSnapshot};
use crate::domain::values::auction::AuctionAction;
use crate::domain::values::ledger::LedgerBucket;
use crate::domain::values::sector::SectorContext;
use crate::domain::values::sentiment::SentimentState;
use crate::domain::values::signal::{RiskTier, Signal};
use crate::domain::values::thresholds::ThresholdSet;

/// Working state of one evaluation.
#[derive(Debug, Clone)]
pub struct EvaluationContext {
    pub inputs: InstrumentInputs,
    pub sentiment: Option<SentimentState>,
    pub sector: Option<SectorContext>,

    /// Running score in [0, 100].
    pub score: f64,
    pub risk_tier: RiskTier,
    pub forced_signal: Option<Signal>,
    pub fact_veto_fired: bool,
    pub limit_up_immunity: bool,
    pub admitted: bool,
    /// Set once a stage reaches a terminal verdict.
    pub halted: bool,

    /// Deferred gate instructions, resolved by the orchestrator.
    pub environment_multiplier: f64,
    pub pending_resonance_bonus: Option<f64>,

    pub thresholds: Option<ThresholdSet>,
    pub sector_score: Option<f64>,
    pub auction_action: Option<AuctionAction>,
    pub ledger_bucket: Option<LedgerBucket>,
    pub reasons: Vec<ReasonFragment>,
}

impl EvaluationContext {
    pub fn new(inputs: &InstrumentInputs, market: &MarketSnapshot) -> Self {
        let sector = market.sector_for(inputs).cloned();
        Self {
            inputs: inputs.clone(),
            sentiment: market.sentiment,
            sector,
            score: inputs.narrative_score.clamp(0.0, 100.0),
            risk_tier: RiskTier::Medium,
            forced_signal: None,
            fact_veto_fired: false,
            limit_up_immunity: false,
            admitted: true,
            halted: false,
            environment_multiplier: 1.0,
            pending_resonance_bonus: None,
            thresholds: None,
            sector_score: None,
            auction_action: None,
            ledger_bucket: None,
            reasons: Vec::new(),
        }
    }

    pub fn note(&mut self, rule: &str, detail: impl Into<String>) {
        self.reasons.push(ReasonFragment::new(rule, detail));
    }

    /// Terminal verdict: no later stage runs.
    pub fn halt(&mut self, signal: Signal, rule: &str, detail: impl Into<String>) {
        self.forced_signal = Some(signal);
        self.score = 0.0;
        self.halted = true;
        self.note(rule, detail);
    }

    /// Admission miss: the instrument is dropped with a WAIT. The score
    /// reached so far is kept for the record.
    pub fn reject(&mut self, rule: &str, detail: impl Into<String>) {
        self.admitted = false;
        self.forced_signal = Some(Signal::Wait);
        self.halted = true;
        self.note(rule, detail);
    }
}

/// One named rule layer.
///
/// # Example
///
/// ```ignore
/// struct NoLateEntries;
///
/// impl Stage for NoLateEntries {
///     fn name(&self) -> &'static str { "no_late_entries" }
///
///     fn apply(&self, mut ctx: EvaluationContext) -> EvaluationContext {
///         ctx.note(self.name(), "checked");
///         ctx
///     }
/// }
/// ```
pub trait Stage: Send + Sync {
    /// Stable rule name, used as the reason-fragment key.
    fn name(&self) -> &'static str;

    /// Apply the rule. Must be pure: same context in, same context out.
    fn apply(&self, ctx: EvaluationContext) -> EvaluationContext;
}
