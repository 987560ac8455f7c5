//! Shared test helpers.

#![allow(dead_code)]

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use factgate::application::pipeline::DecisionPipeline;
use factgate::domain::entities::inputs::{InstrumentInputs, MarketSnapshot};
use factgate::domain::entities::snapshot::InstrumentSnapshot;
use factgate::domain::values::auction::{AuctionData, AuctionRecord};
use factgate::domain::values::board_tier::BoardTier;
use factgate::domain::values::capital_flow::CapitalFlowFact;
use factgate::domain::values::decision_config::DecisionConfig;
use factgate::domain::values::ledger::LedgerFact;
use factgate::domain::values::sector::SectorContext;
use factgate::domain::values::sentiment::{Regime, SentimentState};
use factgate::domain::values::trend::TrendFact;

pub const SECTOR: &str = "semiconductors";

pub fn pipeline() -> DecisionPipeline {
    DecisionPipeline::standard(DecisionConfig::default())
}

pub fn at(h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 14)
        .unwrap()
        .and_hms_opt(h, m, 0)
        .unwrap()
}

/// 10:30 local on the fixture day, as UTC+8.
pub fn as_of() -> DateTime<Utc> {
    "2024-03-14T02:30:00Z".parse().unwrap()
}

/// Mid-cap main-board stock up 5% mid-session with a healthy book: passes
/// every admission gate under a neutral market.
pub fn snapshot(id: &str) -> InstrumentSnapshot {
    InstrumentSnapshot {
        id: id.to_string(),
        sector: Some(SECTOR.to_string()),
        board: BoardTier::Main,
        last_price: 10.5,
        prev_close: 10.0,
        pct_change: 5.0,
        volume: 12_000_000.0,
        amount: 126_000_000.0,
        turnover_rate: 3.0,
        volume_ratio: 2.5,
        float_market_cap: Some(8.0e9),
        open: 10.1,
        high: 10.55,
        low: 10.0,
        bid_price: 10.49,
        bid_size: 50_000.0,
        ask_price: 10.5,
        ask_size: 20_000.0,
    }
}

pub fn inputs(id: &str, capital: f64, trend: TrendFact, narrative_score: f64) -> InstrumentInputs {
    InstrumentInputs {
        snapshot: snapshot(id),
        capital: CapitalFlowFact::new(capital),
        trend,
        narrative_score,
        auction: AuctionData::Unavailable,
        ledger: None,
        is_focus_stock: false,
        yesterday_amount: None,
        timestamp: at(10, 30),
    }
}

/// The textbook BUY: inflow with an up trend.
pub fn resonant(id: &str) -> InstrumentInputs {
    inputs(id, 50_000_000.0, TrendFact::Up, 80.0)
}

/// Price near the 10% cap.
pub fn at_limit(mut i: InstrumentInputs, pct_change: f64) -> InstrumentInputs {
    let s = &mut i.snapshot;
    s.pct_change = pct_change;
    s.last_price = s.prev_close * (1.0 + pct_change / 100.0);
    s.high = s.last_price;
    s.ask_size = 0.0;
    i
}

pub fn with_ledger(mut i: InstrumentInputs, net_buy: f64, open_change_pct: f64) -> InstrumentInputs {
    i.ledger = Some(LedgerFact {
        top_seat_net_buy: Some(net_buy),
        open_change_pct,
    });
    i
}

pub fn with_auction(mut i: InstrumentInputs, gap_pct: f64, volume_ratio: f64) -> InstrumentInputs {
    let open = i.snapshot.prev_close * (1.0 + gap_pct / 100.0);
    i.auction = AuctionData::Available(AuctionRecord {
        open_price: open,
        prev_close: i.snapshot.prev_close,
        open_volume_ratio: volume_ratio,
        open_amount: 30_000_000.0,
        high: open,
        low: open,
        opened_at_limit: false,
        yesterday_change_pct: None,
    });
    i
}

pub fn neutral_sentiment() -> SentimentState {
    SentimentState::new(50.0, Regime::Chop)
}

pub fn resonant_sector() -> SectorContext {
    SectorContext::new(4, 0.5, true)
}

pub fn market(sentiment: Option<SentimentState>) -> MarketSnapshot {
    MarketSnapshot::new(sentiment).with_sector(SECTOR, resonant_sector())
}

pub fn neutral_market() -> MarketSnapshot {
    market(Some(neutral_sentiment()))
}
