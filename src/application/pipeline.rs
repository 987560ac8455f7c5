//! The decision pipeline: an ordered list of named stages over one
//! evaluation context, followed by the final BUY/WAIT/SELL threshold.

use tracing::debug;

use crate::application::auction::AuctionStrengthClassifier;
use crate::application::fact_veto::FactVetoScorer;
use crate::application::gate::EnvironmentalGate;
use crate::application::ledger::InstitutionalLedgerAdjuster;
use crate::application::order_book::OrderBookCheck;
use crate::application::sector_resonance::SectorResonanceFilter;
use crate::application::thresholds::DynamicThresholdCalculator;
use crate::domain::entities::decision::DecisionRecord;
use crate::domain::entities::inputs::{InstrumentInputs, MarketSnapshot};
use crate::domain::ports::stage::{EvaluationContext, Stage};
use crate::domain::values::decision_config::DecisionConfig;
use crate::domain::values::signal::Signal;
use crate::domain::values::trend::TrendFact;

pub struct DecisionPipeline {
    stages: Vec<Box<dyn Stage>>,
    config: DecisionConfig,
}

impl DecisionPipeline {
    /// The production stage order. Fact vetoes run ahead of admission so an
    /// outflow SELL is never hidden behind an admission miss.
    pub fn standard(config: DecisionConfig) -> Self {
        let stages: Vec<Box<dyn Stage>> = vec![
            Box::new(EnvironmentalGate::new(config.gate.clone())),
            Box::new(FactVetoScorer::new(config.veto.clone())),
            Box::new(DynamicThresholdCalculator::new(config.thresholds.clone())),
            Box::new(SectorResonanceFilter::new(config.sector.clone())),
            Box::new(AuctionStrengthClassifier::new(config.auction.clone())),
            Box::new(InstitutionalLedgerAdjuster::new(config.ledger.clone())),
            Box::new(OrderBookCheck::new(config.order_book.clone())),
        ];
        Self { stages, config }
    }

    pub fn with_stages(config: DecisionConfig, stages: Vec<Box<dyn Stage>>) -> Self {
        Self { stages, config }
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    pub fn config(&self) -> &DecisionConfig {
        &self.config
    }

    /// Evaluate one instrument. Pure: identical inputs give an identical record.
    pub fn evaluate(&self, inputs: &InstrumentInputs, market: &MarketSnapshot) -> DecisionRecord {
        let mut ctx = EvaluationContext::new(inputs, market);
        for stage in &self.stages {
            ctx = stage.apply(ctx);
            if ctx.halted {
                debug!(instrument = %inputs.id(), stage = stage.name(), "halted");
                break;
            }
        }
        self.finalize(ctx)
    }

    fn finalize(&self, mut ctx: EvaluationContext) -> DecisionRecord {
        let signal = match ctx.forced_signal {
            Some(signal) => {
                ctx.score = round2(ctx.score.clamp(0.0, 100.0));
                let detail = format!("{signal} (forced, score {:.2})", ctx.score);
                ctx.note("verdict", detail);
                signal
            }
            None => {
                let mut score = ctx.score * ctx.environment_multiplier;
                if let Some(bonus) = ctx.pending_resonance_bonus {
                    if ctx.inputs.trend == TrendFact::Up {
                        score += bonus;
                    }
                }
                ctx.score = round2(score.clamp(0.0, 100.0));

                let threshold = if ctx.limit_up_immunity {
                    self.config.immunity_buy_threshold
                } else {
                    self.config.buy_threshold
                };
                let signal = if ctx.score >= threshold {
                    Signal::Buy
                } else {
                    Signal::Wait
                };
                let cmp = if signal == Signal::Buy { ">=" } else { "<" };
                let detail = format!("{signal} (score {:.2} {cmp} {threshold:.0})", ctx.score);
                ctx.note("verdict", detail);
                signal
            }
        };

        DecisionRecord {
            instrument_id: ctx.inputs.snapshot.id.clone(),
            signal,
            score: ctx.score,
            risk_tier: ctx.risk_tier,
            fact_veto_fired: ctx.fact_veto_fired,
            limit_up_immunity: ctx.limit_up_immunity,
            admitted: ctx.admitted,
            sector_score: ctx.sector_score,
            auction_action: ctx.auction_action,
            ledger_bucket: ctx.ledger_bucket,
            reasons: ctx.reasons,
        }
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Marker(&'static str);

    impl Stage for Marker {
        fn name(&self) -> &'static str {
            self.0
        }

        fn apply(&self, mut ctx: EvaluationContext) -> EvaluationContext {
            ctx.note(self.0, "ran");
            if self.0 == "stop" {
                ctx.halt(Signal::Wait, self.0, "stopped");
            }
            ctx
        }
    }

    #[test]
    fn test_standard_stage_order() {
        let p = DecisionPipeline::standard(DecisionConfig::default());
        assert_eq!(
            p.stage_names(),
            vec![
                "environmental_gate",
                "fact_veto",
                "dynamic_threshold",
                "sector_resonance",
                "auction_strength",
                "institutional_ledger",
                "order_book",
            ]
        );
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(80.0 * 1.2), 96.0);
        assert_eq!(round2(12.345_6), 12.35);
    }

    #[test]
    fn test_halt_skips_later_stages() {
        let p = DecisionPipeline::with_stages(
            DecisionConfig::default(),
            vec![Box::new(Marker("first")), Box::new(Marker("stop")), Box::new(Marker("never"))],
        );
        let inputs: InstrumentInputs = serde_json::from_value(serde_json::json!({
            "snapshot": {
                "id": "600000", "board": "MAIN", "last_price": 10.0, "prev_close": 10.0,
                "pct_change": 0.0, "volume": 0.0, "amount": 0.0, "turnover_rate": 0.0,
                "volume_ratio": 0.0, "open": 10.0, "high": 10.0, "low": 10.0
            },
            "capital": { "net_amount": 0.0 },
            "trend": "SIDEWAYS",
            "narrative_score": 50.0,
            "timestamp": "2024-03-14T10:30:00"
        }))
        .unwrap();
        let d = p.evaluate(&inputs, &MarketSnapshot::default());
        assert!(d.fired("first"));
        assert!(!d.fired("never"));
        assert_eq!(d.signal, Signal::Wait);
        assert_eq!(d.reasons.last().unwrap().rule, "verdict");
    }
}
