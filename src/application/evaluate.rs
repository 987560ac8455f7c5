//! Evaluate use case: resolves market state once, then runs the decision
//! pipeline for one instrument or fans out over a batch.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::application::pipeline::DecisionPipeline;
use crate::domain::entities::decision::{DecisionRecord, ReasonFragment};
use crate::domain::entities::inputs::{InstrumentInputs, MarketSnapshot};
use crate::domain::error::DomainError;
use crate::domain::ports::instrument_feed::InstrumentFeed;
use crate::domain::ports::market_state::MarketStateProvider;
use crate::domain::values::signal::Signal;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SignalCounts {
    pub buy: usize,
    pub sell: usize,
    pub wait: usize,
}

impl SignalCounts {
    pub fn tally<'a>(decisions: impl IntoIterator<Item = &'a DecisionRecord>) -> Self {
        let mut counts = Self::default();
        for d in decisions {
            counts.record(d.signal);
        }
        counts
    }

    fn record(&mut self, signal: Signal) {
        match signal {
            Signal::Buy => self.buy += 1,
            Signal::Sell => self.sell += 1,
            Signal::Wait => self.wait += 1,
        }
    }
}

/// Result of one batch run.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub batch_id: Uuid,
    pub evaluated_at: DateTime<Utc>,
    /// Clock the market state was resolved against.
    pub as_of: DateTime<Utc>,
    pub feed: String,
    pub counts: SignalCounts,
    pub decisions: BTreeMap<String, DecisionRecord>,
    /// Identifiers by score, highest first.
    pub ranked: Vec<String>,
    /// Requested identifiers the feed had nothing for.
    pub missing: Vec<String>,
}

impl BatchReport {
    pub fn buys(&self) -> impl Iterator<Item = &DecisionRecord> {
        self.ranked
            .iter()
            .filter_map(|id| self.decisions.get(id))
            .filter(|d| d.signal == Signal::Buy)
    }

    /// Keep only the decisions matching `keep`; ranking and counts follow.
    pub fn retain(&mut self, keep: impl Fn(&DecisionRecord) -> bool) {
        self.decisions.retain(|_, d| keep(d));
        let decisions = &self.decisions;
        self.ranked.retain(|id| decisions.contains_key(id));
        self.counts = SignalCounts::tally(self.decisions.values());
    }
}

pub struct EvaluateUseCase {
    feed: Arc<dyn InstrumentFeed>,
    market: Arc<dyn MarketStateProvider>,
    pipeline: Arc<DecisionPipeline>,
    ttl: Duration,
}

impl EvaluateUseCase {
    pub fn new(
        feed: Arc<dyn InstrumentFeed>,
        market: Arc<dyn MarketStateProvider>,
        pipeline: Arc<DecisionPipeline>,
    ) -> Self {
        let ttl = pipeline.config().market_state_ttl();
        Self {
            feed,
            market,
            pipeline,
            ttl,
        }
    }

    pub async fn evaluate(&self, id: &str) -> Result<DecisionRecord, DomainError> {
        let inputs = self
            .feed
            .inputs(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Instrument {id}")))?;
        let (market, _) = self.resolve_market(std::slice::from_ref(&inputs)).await;
        Ok(self.pipeline.evaluate(&inputs, &market))
    }

    /// Evaluate `ids`, or every instrument the feed knows when `None`.
    pub async fn evaluate_batch(&self, ids: Option<Vec<String>>) -> Result<BatchReport, DomainError> {
        let evaluated_at = Utc::now();
        let ids: BTreeSet<String> = match ids {
            Some(ids) => ids.into_iter().collect(),
            None => self.feed.instrument_ids().await?.into_iter().collect(),
        };

        let fetches: Vec<_> = ids
            .into_iter()
            .map(|id| {
                let feed = Arc::clone(&self.feed);
                let key = id.clone();
                (key, tokio::spawn(async move { feed.inputs(&id).await }))
            })
            .collect();

        let mut inputs = Vec::new();
        let mut missing = Vec::new();
        for (id, handle) in fetches {
            match handle.await {
                Ok(Ok(Some(i))) => inputs.push(i),
                Ok(Ok(None)) => missing.push(id),
                Ok(Err(e)) => {
                    warn!(instrument = %id, error = %e, "feed failed, skipping");
                    missing.push(id);
                }
                Err(e) => {
                    warn!(instrument = %id, error = %e, "fetch task failed, skipping");
                    missing.push(id);
                }
            }
        }

        let (market, as_of) = self.resolve_market(&inputs).await;
        let market = Arc::new(market);

        let evaluations: Vec<_> = inputs
            .into_iter()
            .map(|i| {
                let pipeline = Arc::clone(&self.pipeline);
                let market = Arc::clone(&market);
                let id = i.id().to_string();
                (id, tokio::spawn(async move { pipeline.evaluate(&i, &market) }))
            })
            .collect();

        let mut decisions = BTreeMap::new();
        for (id, handle) in evaluations {
            let decision = match handle.await {
                Ok(decision) => decision,
                Err(e) => {
                    warn!(instrument = %id, error = %e, "evaluation task failed, defaulting to WAIT");
                    let reason = ReasonFragment::new("pipeline", format!("evaluation failed: {e}"));
                    DecisionRecord::wait(&id, reason)
                }
            };
            decisions.insert(id, decision);
        }
        let counts = SignalCounts::tally(decisions.values());

        let mut ranked: Vec<&DecisionRecord> = decisions.values().collect();
        ranked.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.instrument_id.cmp(&b.instrument_id))
        });
        let ranked = ranked.into_iter().map(|d| d.instrument_id.clone()).collect();

        info!(
            evaluated = decisions.len(),
            buy = counts.buy,
            sell = counts.sell,
            wait = counts.wait,
            missing = missing.len(),
            "batch complete"
        );

        Ok(BatchReport {
            batch_id: Uuid::new_v4(),
            evaluated_at,
            as_of,
            feed: self.feed.name().to_string(),
            counts,
            decisions,
            ranked,
            missing,
        })
    }

    /// Resolve sentiment and every sector the inputs refer to, once, against
    /// a single clock. Stale or failing reads become unknown.
    async fn resolve_market(&self, inputs: &[InstrumentInputs]) -> (MarketSnapshot, DateTime<Utc>) {
        let now = self.market.as_of().unwrap_or_else(Utc::now);

        let sentiment = match self.market.sentiment().await {
            Ok(Some(observed)) => {
                let fetched_at = observed.fetched_at;
                let fresh = observed.fresh(now, self.ttl);
                if fresh.is_none() {
                    warn!(%fetched_at, %now, "sentiment is stale, treating as unknown");
                }
                fresh
            }
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "sentiment unavailable");
                None
            }
        };

        let names: BTreeSet<&str> = inputs
            .iter()
            .filter_map(|i| i.snapshot.sector.as_deref())
            .collect();
        let mut sectors = HashMap::new();
        for name in names {
            match self.market.sector(name).await {
                Ok(Some(observed)) => {
                    let fetched_at = observed.fetched_at;
                    match observed.fresh(now, self.ttl) {
                        Some(ctx) => {
                            sectors.insert(name.to_string(), ctx);
                        }
                        None => warn!(sector = name, %fetched_at, "sector data is stale"),
                    }
                }
                Ok(None) => {}
                Err(e) => warn!(sector = name, error = %e, "sector data unavailable"),
            }
        }

        let snapshot = MarketSnapshot {
            sentiment,
            sectors,
            as_of: Some(now),
        };
        (snapshot, now)
    }
}
