pub mod auction;
pub mod board_tier;
pub mod capital_flow;
pub mod decision_config;
pub mod ledger;
pub mod market_cap;
pub mod sector;
pub mod sentiment;
pub mod session;
pub mod signal;
pub mod thresholds;
pub mod trend;
