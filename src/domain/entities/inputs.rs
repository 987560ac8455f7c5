use crate::domain::entities::snapshot::InstrumentSnapshot;
use crate::domain::values::auction::AuctionData;
use crate::domain::values::capital_flow::CapitalFlowFact;
use crate::domain::values::ledger::LedgerFact;
use crate::domain::values::sector::SectorContext;
use crate::domain::values::sentiment::SentimentState;
use crate::domain::values::trend::TrendFact;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Everything the collaborators supply about one instrument for one
/// evaluation tick. Each evaluation owns its copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentInputs {
    pub snapshot: InstrumentSnapshot,
    pub capital: CapitalFlowFact,
    pub trend: TrendFact,
    /// Narrative score in [0, 100] from the external scoring model.
    pub narrative_score: f64,
    #[serde(default)]
    pub auction: AuctionData,
    #[serde(default)]
    pub ledger: Option<LedgerFact>,
    /// At limit-up in the prior session.
    #[serde(default)]
    pub is_focus_stock: bool,
    #[serde(default)]
    pub yesterday_amount: Option<f64>,
    /// Exchange-local evaluation time.
    pub timestamp: NaiveDateTime,
}

impl InstrumentInputs {
    pub fn id(&self) -> &str {
        &self.snapshot.id
    }
}

/// Market-wide state resolved once per batch. `None` means unknown or
/// expired; the pipeline falls back to conservative defaults.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub sentiment: Option<SentimentState>,
    #[serde(default)]
    pub sectors: HashMap<String, SectorContext>,
    #[serde(default)]
    pub as_of: Option<DateTime<Utc>>,
}

impl MarketSnapshot {
    pub fn new(sentiment: Option<SentimentState>) -> Self {
        Self {
            sentiment,
            sectors: HashMap::new(),
            as_of: None,
        }
    }

    pub fn with_sector(mut self, name: &str, ctx: SectorContext) -> Self {
        self.sectors.insert(name.to_string(), ctx);
        self
    }

    pub fn sector_for(&self, inputs: &InstrumentInputs) -> Option<&SectorContext> {
        inputs
            .snapshot
            .sector
            .as_deref()
            .and_then(|name| self.sectors.get(name))
    }
}
