pub mod attendance;
pub mod directory;
pub mod history;
pub mod initialize;
pub mod ledger;
pub mod log;
pub mod migrate;
pub mod pool;
pub mod stats;
pub mod tasks;
