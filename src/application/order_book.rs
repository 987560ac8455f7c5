//! Best bid/ask check. A book where the sellers stack up against a thin
//! bid overrides any score.

use crate::domain::ports::stage::{EvaluationContext, Stage};
use crate::domain::values::decision_config::OrderBookConfig;
use crate::domain::values::signal::{RiskTier, Signal};

pub struct OrderBookCheck {
    config: OrderBookConfig,
}

impl OrderBookCheck {
    pub fn new(config: OrderBookConfig) -> Self {
        Self { config }
    }

    /// `None` when the book is unavailable, otherwise whether it is weak.
    pub fn is_weak(&self, bid_ask_ratio: Option<f64>) -> Option<bool> {
        bid_ask_ratio.map(|r| r < self.config.min_bid_ask_ratio)
    }
}

impl Stage for OrderBookCheck {
    fn name(&self) -> &'static str {
        "order_book"
    }

    fn apply(&self, mut ctx: EvaluationContext) -> EvaluationContext {
        let ratio = ctx.inputs.snapshot.bid_ask_ratio();
        match self.is_weak(ratio) {
            None => ctx.note(self.name(), "order book unavailable, skipped"),
            Some(false) => {}
            Some(true) => {
                ctx.forced_signal = Some(Signal::Wait);
                ctx.risk_tier = RiskTier::High;
                ctx.halted = true;
                ctx.note(
                    self.name(),
                    format!(
                        "weak order book: bid/ask notional {:.2} < {:.2}",
                        ratio.unwrap_or(0.0),
                        self.config.min_bid_ask_ratio
                    ),
                );
            }
        }
        ctx
    }
}
