//! Cross-sectional confirmation: is the peer group moving with the
//! instrument, or is the move isolated?

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::debug;

use crate::domain::ports::stage::{EvaluationContext, Stage};
use crate::domain::values::decision_config::SectorConfig;
use crate::domain::values::sector::SectorContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectorCondition {
    LimitUpPeers,
    Breadth,
    SustainedInflow,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectorResonance {
    pub is_resonant: bool,
    /// Weighted sum of passed conditions, in [0, 1].
    pub score: f64,
    pub passed_conditions: BTreeSet<SectorCondition>,
    /// Conditions that could not be evaluated for lack of data.
    pub unknown_conditions: BTreeSet<SectorCondition>,
}

impl SectorResonance {
    pub fn data_unavailable(&self) -> bool {
        self.unknown_conditions.len() == 3
    }
}

pub struct SectorResonanceFilter {
    config: SectorConfig,
}

impl SectorResonanceFilter {
    pub fn new(config: SectorConfig) -> Self {
        Self { config }
    }

    /// Unknown data fails its condition.
    pub fn check_resonance(&self, sector: Option<&SectorContext>) -> SectorResonance {
        let empty = SectorContext::default();
        let sector = sector.unwrap_or(&empty);

        let checks = [
            (
                SectorCondition::LimitUpPeers,
                self.config.weight_limit_up,
                sector
                    .limit_up_count
                    .map(|n| n >= self.config.min_limit_up_peers),
            ),
            (
                SectorCondition::Breadth,
                self.config.weight_breadth,
                sector.breadth.map(|b| b >= self.config.min_breadth),
            ),
            (
                SectorCondition::SustainedInflow,
                self.config.weight_inflow,
                sector.sustained_inflow,
            ),
        ];

        let mut passed_conditions = BTreeSet::new();
        let mut unknown_conditions = BTreeSet::new();
        let mut score = 0.0;
        for (condition, weight, outcome) in checks {
            match outcome {
                Some(true) => {
                    passed_conditions.insert(condition);
                    score += weight;
                }
                Some(false) => {}
                None => {
                    unknown_conditions.insert(condition);
                }
            }
        }

        SectorResonance {
            is_resonant: passed_conditions.len() >= self.config.min_conditions,
            score,
            passed_conditions,
            unknown_conditions,
        }
    }
}

impl Stage for SectorResonanceFilter {
    fn name(&self) -> &'static str {
        "sector_resonance"
    }

    fn apply(&self, mut ctx: EvaluationContext) -> EvaluationContext {
        let result = self.check_resonance(ctx.sector.as_ref());
        ctx.sector_score = Some(result.score);
        debug!(
            instrument = %ctx.inputs.snapshot.id,
            resonant = result.is_resonant,
            score = result.score,
            "sector checked"
        );

        let passed = result.passed_conditions.len();
        if ctx.limit_up_immunity {
            ctx.note(
                self.name(),
                format!("bypassed by limit-up immunity ({passed} of 3, score {:.2})", result.score),
            );
        } else if result.is_resonant {
            ctx.note(
                self.name(),
                format!("resonant ({passed} of 3, score {:.2})", result.score),
            );
        } else if result.data_unavailable() {
            ctx.reject(self.name(), "sector data unavailable, rejected");
        } else {
            let mut detail = format!("isolated move ({passed} of 3, score {:.2})", result.score);
            if !result.unknown_conditions.is_empty() {
                detail.push_str(&format!(
                    ", {} condition(s) without data",
                    result.unknown_conditions.len()
                ));
            }
            ctx.reject(self.name(), detail);
        }
        ctx
    }
}
