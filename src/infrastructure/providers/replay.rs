use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::entities::inputs::InstrumentInputs;
use crate::domain::error::DomainError;
use crate::domain::ports::instrument_feed::InstrumentFeed;
use crate::domain::ports::market_state::{MarketStateProvider, Observed};
use crate::domain::values::sector::SectorContext;
use crate::domain::values::sentiment::SentimentState;

/// On-disk replay format. Every collaborator value is stamped `as_of`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReplayFile {
    #[serde(default)]
    pub as_of: Option<DateTime<Utc>>,
    #[serde(default)]
    pub sentiment: Option<SentimentState>,
    #[serde(default)]
    pub sectors: HashMap<String, SectorContext>,
    #[serde(default)]
    pub instruments: Vec<InstrumentInputs>,
}

/// Historical replay, or an in-memory fixture built with the `with_*`
/// methods. Serves both the instrument feed and the market state.
pub struct ReplayProvider {
    name: String,
    as_of: Option<DateTime<Utc>>,
    stamped_at: DateTime<Utc>,
    sentiment: Option<Observed<SentimentState>>,
    sectors: HashMap<String, Observed<SectorContext>>,
    instruments: BTreeMap<String, InstrumentInputs>,
}

impl ReplayProvider {
    /// Empty in-memory provider on the wall clock.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            as_of: None,
            stamped_at: Utc::now(),
            sentiment: None,
            sectors: HashMap::new(),
            instruments: BTreeMap::new(),
        }
    }

    /// Pin the replay clock. Later `with_*` values are stamped at this time.
    pub fn at(mut self, as_of: DateTime<Utc>) -> Self {
        self.as_of = Some(as_of);
        self.stamped_at = as_of;
        self
    }

    pub fn with_sentiment(self, sentiment: SentimentState) -> Self {
        let at = self.stamped_at;
        self.with_sentiment_at(sentiment, at)
    }

    pub fn with_sentiment_at(mut self, sentiment: SentimentState, fetched_at: DateTime<Utc>) -> Self {
        self.sentiment = Some(Observed::new(sentiment, fetched_at));
        self
    }

    pub fn with_sector(self, name: &str, ctx: SectorContext) -> Self {
        let at = self.stamped_at;
        self.with_sector_at(name, ctx, at)
    }

    pub fn with_sector_at(mut self, name: &str, ctx: SectorContext, fetched_at: DateTime<Utc>) -> Self {
        self.sectors
            .insert(name.to_string(), Observed::new(ctx, fetched_at));
        self
    }

    pub fn with_instrument(mut self, inputs: InstrumentInputs) -> Self {
        self.instruments.insert(inputs.id().to_string(), inputs);
        self
    }

    pub fn from_file(file: ReplayFile, name: &str) -> Self {
        let mut provider = Self::new(name);
        if let Some(as_of) = file.as_of {
            provider = provider.at(as_of);
        }
        if let Some(sentiment) = file.sentiment {
            provider = provider.with_sentiment(sentiment);
        }
        for (sector, ctx) in file.sectors {
            provider = provider.with_sector(&sector, ctx);
        }
        for inputs in file.instruments {
            provider = provider.with_instrument(inputs);
        }
        provider
    }

    pub fn from_json(json: &str, name: &str) -> Result<Self, DomainError> {
        let file: ReplayFile = serde_json::from_str(json)?;
        Ok(Self::from_file(file, name))
    }

    pub fn load(path: &Path) -> Result<Self, DomainError> {
        let json = std::fs::read_to_string(path)?;
        let provider = Self::from_json(&json, &path.display().to_string())?;
        info!(
            replay = %path.display(),
            instruments = provider.instruments.len(),
            sectors = provider.sectors.len(),
            "replay loaded"
        );
        Ok(provider)
    }
}

#[async_trait]
impl InstrumentFeed for ReplayProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn instrument_ids(&self) -> Result<Vec<String>, DomainError> {
        Ok(self.instruments.keys().cloned().collect())
    }

    async fn inputs(&self, id: &str) -> Result<Option<InstrumentInputs>, DomainError> {
        Ok(self.instruments.get(id).cloned())
    }
}

#[async_trait]
impl MarketStateProvider for ReplayProvider {
    async fn sentiment(&self) -> Result<Option<Observed<SentimentState>>, DomainError> {
        Ok(self.sentiment.clone())
    }

    async fn sector(&self, name: &str) -> Result<Option<Observed<SectorContext>>, DomainError> {
        Ok(self.sectors.get(name).cloned())
    }

    fn as_of(&self) -> Option<DateTime<Utc>> {
        self.as_of
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::values::sentiment::Regime;

    #[tokio::test]
    async fn test_empty_file_is_valid() {
        let p = ReplayProvider::from_json("{}", "empty").unwrap();
        assert!(p.instrument_ids().await.unwrap().is_empty());
        assert!(p.sentiment().await.unwrap().is_none());
        assert!(MarketStateProvider::as_of(&p).is_none());
    }

    #[tokio::test]
    async fn test_values_are_stamped_at_replay_clock() {
        let as_of = "2024-03-14T02:30:00Z".parse::<DateTime<Utc>>().unwrap();
        let p = ReplayProvider::new("fixture")
            .at(as_of)
            .with_sentiment(SentimentState::new(55.0, Regime::Chop))
            .with_sector("semis", SectorContext::new(3, 0.4, true));
        assert_eq!(p.sentiment().await.unwrap().unwrap().fetched_at, as_of);
        assert_eq!(p.sector("semis").await.unwrap().unwrap().fetched_at, as_of);
        assert!(p.sector("banks").await.unwrap().is_none());
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = ReplayProvider::from_json("{\"instruments\": 3}", "bad").err().unwrap();
        assert!(matches!(err, DomainError::Parse(_)));
    }
}
