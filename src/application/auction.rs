//! Opening call-auction classifier.
//!
//! Focus stocks (yesterday's limit-ups) are judged against an expectation
//! premium sized by yesterday's gain. First-board candidates must show a
//! textbook breakout or an explosive gap. Outside the opening window the
//! classifier stays silent.

use serde::Serialize;
use tracing::debug;

use crate::domain::ports::stage::{EvaluationContext, Stage};
use crate::domain::values::auction::{AuctionAction, AuctionData, AuctionRecord};
use crate::domain::values::decision_config::AuctionConfig;
use crate::domain::values::session::TradingSegment;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AuctionVerdict {
    pub action: AuctionAction,
    pub confidence: f64,
    /// Expected opening gap, in percent.
    pub expectation_premium: f64,
    /// False outside the opening window or without an auction print; the
    /// orchestrator ignores such verdicts.
    pub evaluated: bool,
}

impl AuctionVerdict {
    fn neutral(expectation_premium: f64) -> Self {
        Self {
            action: AuctionAction::Watch,
            confidence: 0.0,
            expectation_premium,
            evaluated: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AuctionStrengthClassifier {
    config: AuctionConfig,
}

impl AuctionStrengthClassifier {
    pub fn new(config: AuctionConfig) -> Self {
        Self { config }
    }

    /// Expected opening gap in percent. A 9% gain maps to 2%.
    pub fn expectation_premium(&self, is_focus_stock: bool, yesterday_change_pct: Option<f64>) -> f64 {
        let cfg = &self.config;
        if !is_focus_stock {
            return cfg.base_premium_pct;
        }
        let gain = yesterday_change_pct.unwrap_or(cfg.assumed_focus_gain_pct).max(0.0);
        (2.0 * gain / 9.0)
            .min(cfg.max_scaled_premium_pct)
            .clamp(cfg.base_premium_pct, cfg.premium_ceiling_pct)
    }

    pub fn classify(
        &self,
        auction: &AuctionData,
        is_focus_stock: bool,
        segment: TradingSegment,
    ) -> AuctionVerdict {
        let record = auction.record();
        let premium =
            self.expectation_premium(is_focus_stock, record.and_then(|r| r.yesterday_change_pct));

        let record = match record {
            Some(r) if segment.is_opening_window() => r,
            _ => return AuctionVerdict::neutral(premium),
        };

        let (action, base_confidence) = if is_focus_stock {
            self.classify_focus(record, premium)
        } else {
            self.classify_first_board(record)
        };

        let confidence = if action == AuctionAction::Reject {
            0.0
        } else {
            let mut c = base_confidence;
            if record.opened_at_limit {
                c += self.config.limit_open_bonus;
            }
            if is_explosive(record) {
                c += self.config.explosive_bonus;
            }
            c.min(1.0)
        };

        AuctionVerdict {
            action,
            confidence,
            expectation_premium: premium,
            evaluated: true,
        }
    }

    fn classify_focus(&self, record: &AuctionRecord, premium: f64) -> (AuctionAction, f64) {
        let gap = record.gap_pct();
        let volume_ratio = record.open_volume_ratio;
        if gap < 0.0 || volume_ratio < 1.0 {
            (AuctionAction::Reject, 0.0)
        } else if gap >= premium && volume_ratio >= 2.0 {
            (AuctionAction::StrongBuy, 0.8)
        } else if gap >= premium {
            (AuctionAction::Buy, 0.6)
        } else {
            (AuctionAction::Watch, 0.3)
        }
    }

    fn classify_first_board(&self, record: &AuctionRecord) -> (AuctionAction, f64) {
        let gap = record.gap_pct();
        let volume_ratio = record.open_volume_ratio;
        let textbook = volume_ratio >= 3.0 && (1.0..=3.0).contains(&gap);
        if is_explosive(record) {
            (AuctionAction::StrongBuy, 0.8)
        } else if textbook {
            (AuctionAction::Buy, 0.7)
        } else if volume_ratio >= 1.5 && gap >= 2.0 {
            (AuctionAction::Watch, 0.4)
        } else {
            (AuctionAction::Reject, 0.0)
        }
    }
}

fn is_explosive(record: &AuctionRecord) -> bool {
    record.open_volume_ratio > 5.0 && record.gap_pct() > 5.0
}

impl Stage for AuctionStrengthClassifier {
    fn name(&self) -> &'static str {
        "auction_strength"
    }

    fn apply(&self, mut ctx: EvaluationContext) -> EvaluationContext {
        let segment = TradingSegment::from_time(ctx.inputs.timestamp.time());
        if !segment.is_opening_window() {
            return ctx;
        }

        let verdict = self.classify(&ctx.inputs.auction, ctx.inputs.is_focus_stock, segment);
        if !verdict.evaluated {
            ctx.note(self.name(), "auction data unavailable, ignored");
            return ctx;
        }
        debug!(
            instrument = %ctx.inputs.snapshot.id,
            action = %verdict.action,
            confidence = verdict.confidence,
            "auction classified"
        );

        ctx.auction_action = Some(verdict.action);
        let kind = if ctx.inputs.is_focus_stock { "focus" } else { "first board" };
        let detail = format!(
            "{} {} (confidence {:.2}, premium {:.2}%)",
            kind, verdict.action, verdict.confidence, verdict.expectation_premium
        );

        if verdict.action == AuctionAction::Reject && !ctx.limit_up_immunity {
            let reason = if ctx.inputs.is_focus_stock {
                "below expectation"
            } else {
                "no breakout"
            };
            ctx.reject(self.name(), format!("{reason}: {detail}"));
        } else {
            ctx.note(self.name(), detail);
        }
        ctx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(gap_pct: f64, volume_ratio: f64) -> AuctionData {
        AuctionData::Available(AuctionRecord {
            open_price: 10.0 * (1.0 + gap_pct / 100.0),
            prev_close: 10.0,
            open_volume_ratio: volume_ratio,
            open_amount: 5.0e7,
            high: 10.0 * (1.0 + gap_pct / 100.0),
            low: 10.0,
            opened_at_limit: false,
            yesterday_change_pct: Some(10.0),
        })
    }

    fn classify(data: &AuctionData, focus: bool) -> AuctionVerdict {
        AuctionStrengthClassifier::default().classify(data, focus, TradingSegment::CallAuction)
    }

    #[test]
    fn test_premium_scaling() {
        let c = AuctionStrengthClassifier::default();
        assert_eq!(c.expectation_premium(false, Some(10.0)), 0.5);
        assert!((c.expectation_premium(true, Some(9.0)) - 2.0).abs() < 1e-9);
        assert_eq!(c.expectation_premium(true, Some(20.0)), 3.0);
        assert_eq!(c.expectation_premium(true, Some(1.0)), 0.5);
        assert!((c.expectation_premium(true, None) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_focus_branch() {
        // premium for a 10% gain is 2.22%
        assert_eq!(classify(&record(-0.5, 3.0), true).action, AuctionAction::Reject);
        assert_eq!(classify(&record(3.0, 0.9), true).action, AuctionAction::Reject);
        assert_eq!(classify(&record(3.0, 2.5), true).action, AuctionAction::StrongBuy);
        assert_eq!(classify(&record(3.0, 1.5), true).action, AuctionAction::Buy);
        assert_eq!(classify(&record(1.0, 2.5), true).action, AuctionAction::Watch);
    }

    #[test]
    fn test_first_board_branch() {
        assert_eq!(classify(&record(2.0, 3.5), false).action, AuctionAction::Buy);
        assert_eq!(classify(&record(6.0, 5.5), false).action, AuctionAction::StrongBuy);
        assert_eq!(classify(&record(4.0, 2.0), false).action, AuctionAction::Watch);
        assert_eq!(classify(&record(0.5, 4.0), false).action, AuctionAction::Reject);
        assert_eq!(classify(&record(4.0, 1.2), false).action, AuctionAction::Reject);
    }

    #[test]
    fn test_bonuses_are_capped() {
        let explosive = classify(&record(6.0, 5.5), false);
        assert!((explosive.confidence - 0.9).abs() < 1e-9);

        let mut data = record(9.9, 8.0);
        if let AuctionData::Available(ref mut r) = data {
            r.opened_at_limit = true;
        }
        assert_eq!(classify(&data, false).confidence, 1.0);
    }

    #[test]
    fn test_configured_premium_and_bonus() {
        let c = AuctionStrengthClassifier::new(AuctionConfig {
            base_premium_pct: 1.0,
            explosive_bonus: 0.05,
            ..AuctionConfig::default()
        });
        assert_eq!(c.expectation_premium(false, None), 1.0);
        assert_eq!(c.expectation_premium(true, Some(2.0)), 1.0);
        let v = c.classify(&record(6.0, 5.5), false, TradingSegment::CallAuction);
        assert!((v.confidence - 0.85).abs() < 1e-9);
    }

    #[test]
    fn test_silent_outside_opening_window() {
        let v = AuctionStrengthClassifier::default().classify(&record(6.0, 5.5), false, TradingSegment::MidSession);
        assert!(!v.evaluated);
        assert_eq!(v.action, AuctionAction::Watch);
        assert_eq!(v.confidence, 0.0);
    }

    #[test]
    fn test_unavailable_is_neutral() {
        let v = classify(&AuctionData::Unavailable, true);
        assert!(!v.evaluated);
        assert_eq!(v.action, AuctionAction::Watch);
    }
}
