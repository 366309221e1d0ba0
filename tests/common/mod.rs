//! Shared test fixtures for integration tests.
#![allow(dead_code)]

use chrono::NaiveTime;
use rand::SeedableRng;
use rand::rngs::StdRng;

use microgrid_dash::config::DashboardConfig;
use microgrid_dash::dashboard::Dashboard;
use microgrid_dash::runner::Runner;
use microgrid_dash::sim::random::ScriptedSource;
use microgrid_dash::sim::types::TickContext;

/// Seed used across integration tests.
pub const SEED: u64 = 42;

/// Noon, so demand sits at the diurnal peak.
pub fn noon() -> NaiveTime {
    NaiveTime::from_hms_opt(12, 0, 0).unwrap()
}

/// Tick context at `hour:minute`.
pub fn ctx(hour: u32, minute: u32) -> TickContext {
    TickContext::at(NaiveTime::from_hms_opt(hour, minute, 0).unwrap())
}

/// Dashboard on the default config with a seeded generator.
pub fn seeded_dashboard(seed: u64) -> Dashboard<StdRng> {
    Dashboard::new(DashboardConfig::default(), StdRng::seed_from_u64(seed))
}

/// Dashboard whose every random draw returns `fraction`.
pub fn scripted_dashboard(fraction: f64) -> Dashboard<ScriptedSource> {
    Dashboard::new(DashboardConfig::default(), ScriptedSource::constant(fraction))
}

/// Runner on the default config starting at noon.
pub fn seeded_runner(seed: u64) -> Runner<StdRng> {
    Runner::new(DashboardConfig::default(), StdRng::seed_from_u64(seed), noon())
}
