use crate::domain::entities::inputs::InstrumentInputs;
use crate::domain::error::DomainError;
use async_trait::async_trait;

/// Per-instrument inputs from a live feed or a historical replay.
#[async_trait]
pub trait InstrumentFeed: Send + Sync {
    /// Human-readable name of this feed.
    fn name(&self) -> &str;

    /// Identifiers this feed can supply.
    async fn instrument_ids(&self) -> Result<Vec<String>, DomainError>;

    /// Inputs for one identifier; `None` when the feed has nothing for it.
    async fn inputs(&self, id: &str) -> Result<Option<InstrumentInputs>, DomainError>;
}
