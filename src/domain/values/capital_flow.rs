use serde::{Deserialize, Serialize};

/// Net institutional money flow for the session, signed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapitalFlowFact {
    pub net_amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub float_market_cap: Option<f64>,
}

impl CapitalFlowFact {
    pub fn new(net_amount: f64) -> Self {
        Self {
            net_amount,
            float_market_cap: None,
        }
    }

    pub fn with_float_cap(mut self, float_market_cap: f64) -> Self {
        self.float_market_cap = Some(float_market_cap);
        self
    }

    /// Flow as a fraction of float market cap, when the cap is known and positive.
    pub fn flow_to_cap_ratio(&self) -> Option<f64> {
        match self.float_market_cap {
            Some(cap) if cap > 0.0 => Some(self.net_amount / cap),
            _ => None,
        }
    }

    pub fn is_inflow(&self) -> bool {
        self.net_amount > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_requires_positive_cap() {
        assert_eq!(CapitalFlowFact::new(-1.0e8).flow_to_cap_ratio(), None);
        assert_eq!(CapitalFlowFact::new(-1.0e8).with_float_cap(0.0).flow_to_cap_ratio(), None);
        let ratio = CapitalFlowFact::new(-5.0e7).with_float_cap(2.0e9).flow_to_cap_ratio().unwrap();
        assert!((ratio + 0.025).abs() < 1e-12);
    }

    #[test]
    fn test_zero_is_not_inflow() {
        assert!(!CapitalFlowFact::new(0.0).is_inflow());
        assert!(CapitalFlowFact::new(1.0).is_inflow());
    }
}
