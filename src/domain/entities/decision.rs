use crate::domain::values::auction::AuctionAction;
use crate::domain::values::ledger::LedgerBucket;
use crate::domain::values::signal::{RiskTier, Signal};
use serde::{Deserialize, Serialize};

/// One rule that fired, named for the audit trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReasonFragment {
    pub rule: String,
    pub detail: String,
}

impl ReasonFragment {
    pub fn new(rule: &str, detail: impl Into<String>) -> Self {
        Self {
            rule: rule.to_string(),
            detail: detail.into(),
        }
    }
}

/// Verdict for one instrument evaluation. Built fresh on every call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub instrument_id: String,
    pub signal: Signal,
    /// 0 to 100.
    pub score: f64,
    pub risk_tier: RiskTier,
    pub fact_veto_fired: bool,
    pub limit_up_immunity: bool,
    /// Passed (or bypassed) every admission gate.
    pub admitted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sector_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auction_action: Option<AuctionAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ledger_bucket: Option<LedgerBucket>,
    pub reasons: Vec<ReasonFragment>,
}

impl DecisionRecord {
    /// The degraded default: WAIT, zero score.
    pub fn wait(instrument_id: &str, reason: ReasonFragment) -> Self {
        Self {
            instrument_id: instrument_id.to_string(),
            signal: Signal::Wait,
            score: 0.0,
            risk_tier: RiskTier::High,
            fact_veto_fired: false,
            limit_up_immunity: false,
            admitted: false,
            sector_score: None,
            auction_action: None,
            ledger_bucket: None,
            reasons: vec![reason],
        }
    }

    /// Reasons joined in firing order, e.g. `"fact_veto: resonance; ledger: trap"`.
    pub fn justification(&self) -> String {
        self.reasons
            .iter()
            .map(|r| format!("{}: {}", r.rule, r.detail))
            .collect::<Vec<_>>()
            .join("; ")
    }

    pub fn fired(&self, rule: &str) -> bool {
        self.reasons.iter().any(|r| r.rule == rule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_justification_preserves_order() {
        let mut d = DecisionRecord::wait("000001", ReasonFragment::new("environmental_gate", "freeze"));
        d.reasons.push(ReasonFragment::new("verdict", "WAIT"));
        assert_eq!(d.justification(), "environmental_gate: freeze; verdict: WAIT");
        assert!(d.fired("verdict"));
        assert!(!d.fired("fact_veto"));
    }
}
