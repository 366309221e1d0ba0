/// Random alert feed.
pub mod alerts;
pub mod demand;
pub mod engine;
/// Solar, wind and biogas output models.
pub mod generation;
pub mod random;
/// Interval timers for the dashboard loop.
pub mod scheduler;
pub mod storage;
pub mod types;
pub mod weather;
