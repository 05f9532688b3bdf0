pub mod attendance;
pub mod audit;
pub mod backup;
pub mod clock;
pub mod ledger;
pub mod log;
pub mod matching;
pub mod reconcile;
pub mod timer;
