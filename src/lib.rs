pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;

use crate::application::evaluate::{BatchReport, EvaluateUseCase};
use crate::application::pipeline::DecisionPipeline;
use crate::application::thresholds::DynamicThresholdCalculator;
use crate::domain::entities::decision::DecisionRecord;
use crate::domain::entities::inputs::{InstrumentInputs, MarketSnapshot};
use crate::domain::error::DomainError;
use crate::domain::ports::instrument_feed::InstrumentFeed;
use crate::domain::ports::market_state::MarketStateProvider;
use crate::domain::values::decision_config::DecisionConfig;
use crate::domain::values::sentiment::SentimentStage;
use crate::domain::values::thresholds::ThresholdSet;
use crate::infrastructure::providers::{CachedMarketState, ReplayProvider};
use chrono::NaiveDateTime;
use std::path::Path;
use std::sync::Arc;

pub struct FactGate {
    evaluate_uc: EvaluateUseCase,
    pipeline: Arc<DecisionPipeline>,
}

impl FactGate {
    /// Build from the environment: `FACTGATE_CONFIG` (optional JSON rule
    /// config) and `FACTGATE_REPLAY` (replay file).
    pub fn new() -> Result<Self, DomainError> {
        let config = config_from_env()?;
        let replay = std::env::var("FACTGATE_REPLAY")
            .map_err(|_| DomainError::Config("FACTGATE_REPLAY is not set and no --replay given".into()))?;
        Self::from_replay(Path::new(&replay), config)
    }

    pub fn from_replay(path: &Path, config: DecisionConfig) -> Result<Self, DomainError> {
        let replay = Arc::new(ReplayProvider::load(path)?);
        Self::with_providers(replay.clone(), replay, config)
    }

    pub fn with_providers(
        feed: Arc<dyn InstrumentFeed>,
        market: Arc<dyn MarketStateProvider>,
        config: DecisionConfig,
    ) -> Result<Self, DomainError> {
        config.validate().map_err(DomainError::Config)?;
        let ttl = config.market_state_ttl();
        let market: Arc<dyn MarketStateProvider> = Arc::new(CachedMarketState::new(market, ttl));
        let pipeline = Arc::new(DecisionPipeline::standard(config));

        Ok(Self {
            evaluate_uc: EvaluateUseCase::new(feed, market, Arc::clone(&pipeline)),
            pipeline,
        })
    }

    pub fn config(&self) -> &DecisionConfig {
        self.pipeline.config()
    }

    // --- Evaluation ---

    pub async fn evaluate(&self, id: &str) -> Result<DecisionRecord, DomainError> {
        self.evaluate_uc.evaluate(id).await
    }

    pub async fn evaluate_batch(&self, ids: Option<Vec<String>>) -> Result<BatchReport, DomainError> {
        self.evaluate_uc.evaluate_batch(ids).await
    }

    /// Run the pipeline on caller-supplied inputs, bypassing the providers.
    pub fn evaluate_inputs(&self, inputs: &InstrumentInputs, market: &MarketSnapshot) -> DecisionRecord {
        self.pipeline.evaluate(inputs, market)
    }

    // --- Thresholds ---

    pub fn thresholds(
        &self,
        float_market_cap: Option<f64>,
        timestamp: NaiveDateTime,
        stage: SentimentStage,
        yesterday_amount: Option<f64>,
    ) -> ThresholdSet {
        DynamicThresholdCalculator::new(self.config().thresholds.clone()).compute(
            float_market_cap,
            timestamp,
            stage,
            yesterday_amount,
        )
    }
}

/// Rule config from `FACTGATE_CONFIG`, or defaults when unset.
pub fn config_from_env() -> Result<DecisionConfig, DomainError> {
    match std::env::var("FACTGATE_CONFIG") {
        Ok(path) => load_config(Path::new(&path)),
        Err(_) => Ok(DecisionConfig::default()),
    }
}

pub fn load_config(path: &Path) -> Result<DecisionConfig, DomainError> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| DomainError::Config(format!("cannot read {}: {e}", path.display())))?;
    DecisionConfig::from_json(&json).map_err(DomainError::Config)
}
