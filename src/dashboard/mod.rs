//! Dashboard state store and its timer callbacks.
//!
//! [`Dashboard`] owns every piece of mutable state: the snapshot, the chart
//! window, the active panel, the simulated link and the emergency-stop dialog.
//! Timer callbacks and key handlers mutate it through `&mut self`; renderers
//! only ever see the read-only [`Scene`] it projects.

pub mod chart;
pub mod connection;
pub mod emergency;
pub mod render;
pub mod view;

use std::time::Duration;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::DashboardConfig;
use crate::sim::engine::{Simulator, StepOutcome};
use crate::sim::random::RandomSource;
use crate::sim::types::TickContext;
use crate::sim::{alerts, storage};
use crate::snapshot::{MergeOutcome, SnapshotError, SystemSnapshot};

use chart::{ChartPoint, ChartWindow};
use connection::{ConnectionMonitor, LinkEvent};
use emergency::EmergencyStop;
use render::{GaugeReading, Renderer, Scene};
use view::{Panel, ViewState};

/// Clock label shown before the first clock tick.
const CLOCK_PLACEHOLDER: &str = "--:--:--";

/// Failure of [`Dashboard::apply_snapshot`].
#[derive(Debug, Error)]
pub enum ApplyError<E: std::error::Error + 'static> {
    /// The payload was rejected; the snapshot is unchanged.
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    /// The payload was merged but drawing it failed.
    #[error("render failed: {0}")]
    Render(#[source] E),
}

/// Mutable dashboard state plus the random source driving it.
pub struct Dashboard<R: RandomSource> {
    snapshot: SystemSnapshot,
    simulator: Simulator,
    chart: ChartWindow,
    view: ViewState,
    connection: ConnectionMonitor,
    emergency: EmergencyStop,
    clock_label: String,
    ticks: u64,
    rng: R,
}

impl<R: RandomSource> Dashboard<R> {
    /// Creates a dashboard seeded with the startup snapshot.
    pub fn new(config: DashboardConfig, rng: R) -> Self {
        let mut snapshot = SystemSnapshot::initial(&config.weather);
        snapshot.storage.total_capacity = config.battery.capacity_kwh;
        Self {
            snapshot,
            chart: ChartWindow::new(config.chart.window),
            view: ViewState::default(),
            connection: ConnectionMonitor::new(config.connection.clone()),
            emergency: EmergencyStop::default(),
            clock_label: CLOCK_PLACEHOLDER.to_string(),
            ticks: 0,
            simulator: Simulator::new(config),
            rng,
        }
    }

    pub fn snapshot(&self) -> &SystemSnapshot {
        &self.snapshot
    }

    pub fn config(&self) -> &DashboardConfig {
        self.simulator.config()
    }

    pub fn chart(&self) -> &ChartWindow {
        &self.chart
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn connection(&self) -> &ConnectionMonitor {
        &self.connection
    }

    pub fn emergency(&self) -> &EmergencyStop {
        &self.emergency
    }

    pub fn emergency_mut(&mut self) -> &mut EmergencyStop {
        &mut self.emergency
    }

    pub fn clock_label(&self) -> &str {
        &self.clock_label
    }

    /// Simulation ticks completed so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Clock timer: refreshes the clock label.
    pub fn on_clock(&mut self, ctx: &TickContext) {
        self.clock_label = ctx.clock_label();
    }

    /// Simulation timer: steps the snapshot, appends a chart point and
    /// renders once.
    ///
    /// # Errors
    ///
    /// Propagates the renderer's error. The step itself has already been
    /// applied when rendering fails.
    pub fn on_simulation_tick<W: Renderer>(
        &mut self,
        ctx: &TickContext,
        renderer: &mut W,
    ) -> Result<StepOutcome, W::Error> {
        let outcome = self.simulator.step(&mut self.snapshot, ctx, &mut self.rng);
        self.chart.push(ChartPoint {
            label: ctx.time_label(),
            generation: self.snapshot.generation.total_generation,
            demand: self.snapshot.demand.total_load,
        });
        self.ticks += 1;
        renderer.render(&self.scene())?;
        Ok(outcome)
    }

    /// Connection timer: may drop the simulated link.
    pub fn on_connection_check(&mut self, now: Duration) -> Option<LinkEvent> {
        self.connection.check(now, &mut self.rng)
    }

    /// Restores the simulated link once its reconnect deadline passes.
    pub fn poll_reconnect(&mut self, now: Duration) -> Option<LinkEvent> {
        self.connection.poll(now)
    }

    /// Merges an externally supplied partial snapshot, then renders once.
    ///
    /// Only the known top-level sections present in `payload` are replaced;
    /// unknown keys are logged and skipped. Alerts are reordered newest
    /// first and cut to the configured maximum. Storage SOC is clamped to
    /// the battery band.
    ///
    /// # Errors
    ///
    /// [`ApplyError::Snapshot`] if the payload is rejected, in which case
    /// nothing is rendered and the state is unchanged.
    pub fn apply_snapshot<W: Renderer>(
        &mut self,
        payload: Value,
        renderer: &mut W,
    ) -> Result<MergeOutcome, ApplyError<W::Error>> {
        let outcome = self.snapshot.merge_partial(&payload)?;
        let cfg = self.simulator.config();
        alerts::normalize(&mut self.snapshot.alerts, cfg.alerts.max_len);
        storage::clamp_soc(&mut self.snapshot.storage, &cfg.battery);

        info!(applied = ?outcome.applied, "snapshot applied");
        if !outcome.ignored.is_empty() {
            debug!(ignored = ?outcome.ignored, "ignored snapshot keys");
        }

        renderer.render(&self.scene()).map_err(ApplyError::Render)?;
        Ok(outcome)
    }

    /// Activates `panel`, returning the previously active one.
    pub fn switch_panel(&mut self, panel: Panel) -> Panel {
        let prev = self.view.switch(panel);
        debug!(from = %prev, to = %panel, "panel switched");
        prev
    }

    /// Activates the next panel.
    pub fn cycle_panel(&mut self) -> Panel {
        self.view.cycle()
    }

    /// Current state projected for rendering.
    pub fn scene(&self) -> Scene<'_> {
        Scene {
            tick: self.ticks,
            clock: &self.clock_label,
            connection: self.connection.label(),
            panel: self.view.active(),
            nav: self.view.nav(),
            gauges: GaugeReading::from_snapshot(&self.snapshot, self.simulator.config()),
            chart: self.chart.points(),
            emergency: self.emergency.state(),
            snapshot: &self.snapshot,
            emergency_prompt: self.emergency.prompt(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveTime;
    use serde_json::json;

    use super::*;
    use crate::dashboard::render::CountingRenderer;
    use crate::sim::random::ScriptedSource;

    fn dashboard() -> Dashboard<ScriptedSource> {
        Dashboard::new(DashboardConfig::default(), ScriptedSource::constant(0.5))
    }

    fn ctx() -> TickContext {
        TickContext::at(NaiveTime::from_hms_opt(10, 30, 0).unwrap())
    }

    #[test]
    fn tick_pushes_chart_point_and_renders_once() {
        let mut dash = dashboard();
        let mut r = CountingRenderer::default();
        dash.on_simulation_tick(&ctx(), &mut r).unwrap();

        assert_eq!(r.renders, 1);
        assert_eq!(dash.chart().len(), 1);
        let p = dash.chart().latest().unwrap();
        assert_eq!(p.label, "10:30");
        assert_eq!(p.generation, dash.snapshot().generation.total_generation);
    }

    #[test]
    fn clock_updates_label() {
        let mut dash = dashboard();
        assert_eq!(dash.clock_label(), CLOCK_PLACEHOLDER);
        dash.on_clock(&ctx());
        assert_eq!(dash.clock_label(), "10:30:00");
    }

    #[test]
    fn rejected_apply_renders_nothing() {
        let mut dash = dashboard();
        let before = dash.snapshot().clone();
        let mut r = CountingRenderer::default();
        let err = dash.apply_snapshot(json!([1, 2]), &mut r).unwrap_err();
        assert!(matches!(err, ApplyError::Snapshot(SnapshotError::NotAnObject)));
        assert_eq!(r.renders, 0);
        assert_eq!(dash.snapshot(), &before);
    }

    #[test]
    fn applied_alerts_are_truncated() {
        let mut dash = dashboard();
        let alerts: Vec<Value> = (1..=8)
            .rev()
            .map(|id| json!({"id": id, "type": "info", "message": "m", "time": "09:00"}))
            .collect();
        let mut r = CountingRenderer::default();
        dash.apply_snapshot(json!({ "alerts": alerts }), &mut r)
            .unwrap();
        assert_eq!(dash.snapshot().alerts.len(), 5);
        assert_eq!(dash.snapshot().alerts[0].id, 8);
    }

    #[test]
    fn oldest_first_alerts_are_reordered() {
        let mut dash = dashboard();
        let alerts: Vec<Value> = (1..=10)
            .map(|id| json!({"id": id, "type": "info", "message": "m", "time": "09:00"}))
            .collect();
        let mut r = CountingRenderer::default();
        dash.apply_snapshot(json!({ "alerts": alerts }), &mut r)
            .unwrap();
        let ids: Vec<u64> = dash.snapshot().alerts.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![10, 9, 8, 7, 6]);
    }

    #[test]
    fn applied_soc_is_clamped_to_band() {
        let mut dash = dashboard();
        let mut storage = serde_json::to_value(&dash.snapshot().storage).unwrap();
        storage["overallSOC"] = json!(99.0);
        let mut r = CountingRenderer::default();
        dash.apply_snapshot(json!({ "storage": storage }), &mut r)
            .unwrap();
        assert_eq!(dash.snapshot().storage.overall_soc, 95.0);
    }

    #[test]
    fn total_capacity_follows_config() {
        let mut cfg = DashboardConfig::default();
        cfg.battery.capacity_kwh = 200.0;
        let dash = Dashboard::new(cfg, ScriptedSource::constant(0.5));
        assert_eq!(dash.snapshot().storage.total_capacity, 200.0);
    }
}
