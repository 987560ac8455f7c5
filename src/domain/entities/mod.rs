pub mod decision;
pub mod inputs;
pub mod snapshot;
