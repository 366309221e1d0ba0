//! Terminal dashboard for a simulated microgrid.
//!
//! A seeded random-walk simulation of solar, wind, biogas, battery storage,
//! demand and weather, rendered as gauges, a sliding chart and KPI panels.

pub mod cli;
pub mod config;
/// Dashboard state, view controls and the render scene.
pub mod dashboard;
pub mod io;
pub mod logging;
pub mod runner;
/// Simulation step, random source and scheduler.
pub mod sim;
pub mod snapshot;
#[cfg(feature = "tui")]
pub mod tui;
