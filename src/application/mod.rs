pub mod auction;
pub mod evaluate;
pub mod fact_veto;
pub mod gate;
pub mod ledger;
pub mod order_book;
pub mod pipeline;
pub mod sector_resonance;
pub mod thresholds;
