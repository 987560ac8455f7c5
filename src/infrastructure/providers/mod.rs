pub mod cached;
pub mod replay;

pub use cached::CachedMarketState;
pub use replay::{ReplayFile, ReplayProvider};
