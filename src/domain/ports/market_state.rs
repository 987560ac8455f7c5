use crate::domain::error::DomainError;
use crate::domain::values::sector::SectorContext;
use crate::domain::values::sentiment::SentimentState;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A collaborator value stamped with when it was produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observed<T> {
    pub value: T,
    pub fetched_at: DateTime<Utc>,
}

impl<T> Observed<T> {
    pub fn new(value: T, fetched_at: DateTime<Utc>) -> Self {
        Self { value, fetched_at }
    }

    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.fetched_at <= ttl
    }

    /// The value if still within `ttl` of `now`.
    pub fn fresh(self, now: DateTime<Utc>, ttl: Duration) -> Option<T> {
        if self.is_fresh(now, ttl) {
            Some(self.value)
        } else {
            None
        }
    }
}

/// Process-wide sentiment and sector statistics, refreshed outside the core.
#[async_trait]
pub trait MarketStateProvider: Send + Sync {
    async fn sentiment(&self) -> Result<Option<Observed<SentimentState>>, DomainError>;

    async fn sector(&self, name: &str) -> Result<Option<Observed<SectorContext>>, DomainError>;

    /// Clock of a historical replay. Live providers return `None` and the
    /// wall clock is used.
    fn as_of(&self) -> Option<DateTime<Utc>> {
        None
    }
}
