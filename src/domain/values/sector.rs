use serde::{Deserialize, Serialize};

/// Peer-group statistics for the instrument's sector. Any field the
/// collaborator could not obtain is `None`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SectorContext {
    /// Peers at limit-up right now.
    #[serde(default)]
    pub limit_up_count: Option<u32>,
    /// Peers positive / peers total, in [0, 1].
    #[serde(default)]
    pub breadth: Option<f64>,
    /// Sector net inflow over the trailing window stayed positive.
    #[serde(default)]
    pub sustained_inflow: Option<bool>,
}

impl SectorContext {
    pub fn new(limit_up_count: u32, breadth: f64, sustained_inflow: bool) -> Self {
        Self {
            limit_up_count: Some(limit_up_count),
            breadth: Some(breadth.clamp(0.0, 1.0)),
            sustained_inflow: Some(sustained_inflow),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breadth_is_clamped() {
        assert_eq!(SectorContext::new(3, 1.4, true).breadth, Some(1.0));
        assert_eq!(SectorContext::new(3, -0.2, true).breadth, Some(0.0));
    }
}
