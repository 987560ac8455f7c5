use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::error::DomainError;
use crate::domain::ports::market_state::{MarketStateProvider, Observed};
use crate::domain::values::sector::SectorContext;
use crate::domain::values::sentiment::SentimentState;

/// TTL cache in front of a slower market-state provider. Readers never see
/// a half-refreshed entry: each value is replaced whole under the lock.
pub struct CachedMarketState<P: MarketStateProvider + ?Sized> {
    inner: Arc<P>,
    ttl: Duration,
    sentiment: RwLock<Option<Observed<SentimentState>>>,
    sectors: RwLock<HashMap<String, Observed<SectorContext>>>,
}

impl<P: MarketStateProvider + ?Sized> CachedMarketState<P> {
    pub fn new(inner: Arc<P>, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            sentiment: RwLock::new(None),
            sectors: RwLock::new(HashMap::new()),
        }
    }

    fn now(&self) -> DateTime<Utc> {
        self.inner.as_of().unwrap_or_else(Utc::now)
    }
}

#[async_trait]
impl<P: MarketStateProvider + ?Sized> MarketStateProvider for CachedMarketState<P> {
    async fn sentiment(&self) -> Result<Option<Observed<SentimentState>>, DomainError> {
        let now = self.now();
        if let Some(hit) = self.sentiment.read().await.as_ref() {
            if hit.is_fresh(now, self.ttl) {
                return Ok(Some(hit.clone()));
            }
        }

        debug!("refreshing sentiment");
        let fetched = self.inner.sentiment().await?;
        if let Some(observed) = &fetched {
            *self.sentiment.write().await = Some(observed.clone());
        }
        Ok(fetched)
    }

    async fn sector(&self, name: &str) -> Result<Option<Observed<SectorContext>>, DomainError> {
        let now = self.now();
        if let Some(hit) = self.sectors.read().await.get(name) {
            if hit.is_fresh(now, self.ttl) {
                return Ok(Some(hit.clone()));
            }
        }

        debug!(sector = name, "refreshing sector");
        let fetched = self.inner.sector(name).await?;
        if let Some(observed) = &fetched {
            self.sectors
                .write()
                .await
                .insert(name.to_string(), observed.clone());
        }
        Ok(fetched)
    }

    fn as_of(&self) -> Option<DateTime<Utc>> {
        self.inner.as_of()
    }
}
