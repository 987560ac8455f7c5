mod common;

use std::collections::HashMap;
use std::io::Write;

use common::*;
use factgate::domain::error::DomainError;
use factgate::domain::values::decision_config::DecisionConfig;
use factgate::domain::values::signal::Signal;
use factgate::infrastructure::providers::ReplayFile;
use factgate::{load_config, FactGate};
use tempfile::NamedTempFile;

const HAND_WRITTEN: &str = r#"{
  "as_of": "2024-03-14T02:30:00Z",
  "sentiment": { "score": 50.0, "regime": "CHOP" },
  "sectors": {
    "semiconductors": { "limit_up_count": 4, "breadth": 0.5, "sustained_inflow": true }
  },
  "instruments": [
    {
      "snapshot": {
        "id": "688001", "sector": "semiconductors", "board": "SCI_TECH",
        "last_price": 21.0, "prev_close": 20.0, "pct_change": 5.0,
        "volume": 3000000.0, "amount": 63000000.0, "turnover_rate": 4.0,
        "volume_ratio": 2.2, "float_market_cap": 8000000000.0,
        "open": 20.2, "high": 21.1, "low": 20.0,
        "bid_price": 20.99, "bid_size": 30000.0, "ask_price": 21.0, "ask_size": 10000.0
      },
      "capital": { "net_amount": 40000000.0 },
      "trend": "UP",
      "narrative_score": 80.0,
      "timestamp": "2024-03-14T10:30:00"
    }
  ]
}"#;

fn write_temp(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[tokio::test]
async fn test_hand_written_replay() {
    let file = write_temp(HAND_WRITTEN);
    let gate = FactGate::from_replay(file.path(), DecisionConfig::default()).unwrap();
    let d = gate.evaluate("688001").await.unwrap();
    assert_eq!(d.signal, Signal::Buy);
    assert_eq!(d.score, 96.0);
}

#[tokio::test]
async fn test_serialized_replay_round_trips_through_the_facade() {
    let mut sectors = HashMap::new();
    sectors.insert(SECTOR.to_string(), resonant_sector());
    let replay = ReplayFile {
        as_of: Some(as_of()),
        sentiment: Some(neutral_sentiment()),
        sectors,
        instruments: vec![resonant("600100"), with_ledger(resonant("600200"), 60_000_000.0, 7.5)],
    };
    let file = write_temp(&serde_json::to_string(&replay).unwrap());

    let gate = FactGate::from_replay(file.path(), DecisionConfig::default()).unwrap();
    let report = gate.evaluate_batch(None).await.unwrap();
    assert_eq!(report.decisions["600100"].signal, Signal::Buy);
    assert_eq!(report.decisions["600200"].signal, Signal::Wait);

    let json = serde_json::to_value(&report.decisions["600200"]).unwrap();
    assert_eq!(json["signal"], "WAIT");
    assert_eq!(json["ledger_bucket"], "TRAP");
}

#[test]
fn test_missing_replay_file_is_io_error() {
    let err = FactGate::from_replay(std::path::Path::new("/nonexistent/replay.json"), DecisionConfig::default())
        .err()
        .unwrap();
    assert!(matches!(err, DomainError::Io(_)));
}

#[test]
fn test_load_config_overrides_defaults() {
    let file = write_temp(r#"{"buy_threshold": 90, "order_book": {"min_bid_ask_ratio": 0.8}}"#);
    let config = load_config(file.path()).unwrap();
    assert_eq!(config.buy_threshold, 90.0);
    assert_eq!(config.order_book.min_bid_ask_ratio, 0.8);
    assert_eq!(config.immunity_buy_threshold, 75.0);
}

#[test]
fn test_bad_config_is_config_error() {
    let file = write_temp("{ not json");
    assert!(matches!(load_config(file.path()), Err(DomainError::Config(_))));
    assert!(matches!(
        load_config(std::path::Path::new("/nonexistent/config.json")),
        Err(DomainError::Config(_))
    ));
}

#[tokio::test]
async fn test_stricter_config_changes_verdict() {
    let file = write_temp(HAND_WRITTEN);
    let config = DecisionConfig {
        buy_threshold: 97.0,
        ..DecisionConfig::default()
    };
    let gate = FactGate::from_replay(file.path(), config).unwrap();
    assert_eq!(gate.config().buy_threshold, 97.0);
    assert_eq!(gate.evaluate("688001").await.unwrap().signal, Signal::Wait);
}
