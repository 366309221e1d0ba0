//! Simulation step that derives a new snapshot from the previous one.

use tracing::{debug, info};

use crate::config::DashboardConfig;
use crate::snapshot::{Alert, SystemSnapshot};

use super::random::RandomSource;
use super::storage::BatteryMode;
use super::types::TickContext;
use super::{alerts, demand, generation, storage, weather};

/// Summary of one simulation step.
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    /// Battery branch taken this tick.
    pub battery_mode: BatteryMode,
    /// Random alert raised this tick, if any.
    pub alert: Option<Alert>,
    /// Threshold alerts raised this tick, oldest first.
    pub rule_alerts: Vec<Alert>,
}

/// Applies the physical relationships between weather, generation, demand
/// and storage to a snapshot, one tick at a time.
///
/// The simulator holds only parameters. State lives in the
/// [`SystemSnapshot`] passed in and randomness comes from the caller, so a
/// seeded source yields a reproducible sequence.
#[derive(Debug, Clone)]
pub struct Simulator {
    config: DashboardConfig,
}

impl Simulator {
    /// Creates a simulator with the given parameters.
    pub fn new(config: DashboardConfig) -> Self {
        Self { config }
    }

    /// Returns the simulation parameters.
    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Advances `snapshot` by one tick.
    ///
    /// # Arguments
    ///
    /// * `snapshot` - State mutated in place
    /// * `ctx` - Wall-clock hour and time label for this tick
    /// * `rng` - Source for every random draw
    ///
    /// # Returns
    ///
    /// The battery branch and any alert raised.
    pub fn step(
        &self,
        snapshot: &mut SystemSnapshot,
        ctx: &TickContext,
        rng: &mut impl RandomSource,
    ) -> StepOutcome {
        let cfg = &self.config;
        let held = alerts::conditions(snapshot, &cfg.alerts.rules);

        // 1. Weather drives solar output
        weather::walk(&mut snapshot.weather, &cfg.weather, rng);

        // 2. Generation
        let gen_state = &mut snapshot.generation;
        gen_state.solar = generation::solar(
            &cfg.solar,
            snapshot.weather.cloud_cover,
            snapshot.weather.temperature,
            rng,
        );
        gen_state.wind = generation::wind(&cfg.wind, rng);
        gen_state.biogas = generation::biogas(&cfg.biogas, rng);
        gen_state.total_generation =
            gen_state.solar.ac_power + gen_state.wind.power + gen_state.biogas.power;

        // 3. Demand
        snapshot.demand = demand::demand(&cfg.demand, ctx.hour, rng);

        // 4. Storage absorbs the imbalance
        let battery_mode = storage::balance(
            &mut snapshot.storage,
            snapshot.generation.total_generation,
            snapshot.demand.total_load,
            &cfg.battery,
        );
        storage::jitter_packs(&mut snapshot.storage, &cfg.battery, rng);

        // 5. Metrics and mirrored weather readings
        weather::refresh_metrics(&mut snapshot.system_metrics, rng);
        snapshot.weather.wind_speed = snapshot.generation.wind.wind_speed;
        snapshot.weather.irradiance = snapshot.generation.solar.irradiance;

        // 6. Alerts: thresholds first, then the random feed
        let time = ctx.time_label();
        let rule_alerts = alerts::raise_rules(snapshot, &held, &cfg.alerts, &time);
        let alert = alerts::maybe_raise(&mut snapshot.alerts, &cfg.alerts, &time, rng);
        for a in rule_alerts.iter().chain(&alert) {
            info!(id = a.id, kind = %a.kind, message = %a.message, "alert raised");
        }

        debug!(
            hour = ctx.hour,
            generation_kw = snapshot.generation.total_generation,
            demand_kw = snapshot.demand.total_load,
            soc = snapshot.storage.overall_soc,
            mode = ?battery_mode,
            "simulation step"
        );

        StepOutcome {
            battery_mode,
            alert,
            rule_alerts,
        }
    }
}
