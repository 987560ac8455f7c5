pub mod instrument_feed;
pub mod market_state;
pub mod stage;
