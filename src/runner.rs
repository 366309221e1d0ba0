//! Dispatches due timers to the dashboard.
//!
//! The runner is clock-agnostic: callers feed it elapsed time. The TUI uses
//! wall time; headless mode jumps virtual time straight to each deadline.

use std::time::Duration;

use chrono::NaiveTime;

use crate::config::DashboardConfig;
use crate::dashboard::Dashboard;
use crate::dashboard::render::Renderer;
use crate::sim::random::RandomSource;
use crate::sim::scheduler::{Scheduler, Timer};
use crate::sim::types::TickContext;

pub struct Runner<R: RandomSource> {
    scheduler: Scheduler,
    dashboard: Dashboard<R>,
    start: NaiveTime,
}

impl<R: RandomSource> Runner<R> {
    /// Creates a runner whose elapsed time zero corresponds to `start`.
    pub fn new(config: DashboardConfig, rng: R, start: NaiveTime) -> Self {
        let t = &config.timing;
        let scheduler = Scheduler::new(
            t.clock_interval(),
            t.simulation_interval(),
            t.connection_interval(),
        );
        Self {
            scheduler,
            dashboard: Dashboard::new(config, rng),
            start,
        }
    }

    pub fn dashboard(&self) -> &Dashboard<R> {
        &self.dashboard
    }

    pub fn dashboard_mut(&mut self) -> &mut Dashboard<R> {
        &mut self.dashboard
    }

    /// Tick context for `elapsed` time since start.
    pub fn context(&self, elapsed: Duration) -> TickContext {
        TickContext::offset(self.start, elapsed)
    }

    /// Runs every callback due at `elapsed` and returns the timers that fired.
    ///
    /// # Errors
    ///
    /// Propagates the first render failure of a simulation tick.
    pub fn pump<W: Renderer>(
        &mut self,
        elapsed: Duration,
        renderer: &mut W,
    ) -> Result<Vec<Timer>, W::Error> {
        self.dashboard.poll_reconnect(elapsed);

        let fired = self.scheduler.due(elapsed);
        let ctx = self.context(elapsed);
        for timer in &fired {
            match timer {
                Timer::Clock => self.dashboard.on_clock(&ctx),
                Timer::Simulation => {
                    self.dashboard.on_simulation_tick(&ctx, renderer)?;
                }
                Timer::Connection => {
                    self.dashboard.on_connection_check(elapsed);
                }
            }
        }
        Ok(fired)
    }

    /// Time until the next timer or pending reconnect.
    pub fn until_next(&self, elapsed: Duration) -> Duration {
        let timers = self.scheduler.until_next(elapsed);
        match self.dashboard.connection().until_reconnect(elapsed) {
            Some(reconnect) => timers.min(reconnect),
            None => timers,
        }
    }

    /// Runs `ticks` simulation ticks on virtual time, rendering each one.
    ///
    /// Returns the virtual time elapsed.
    ///
    /// # Errors
    ///
    /// Propagates the first render failure.
    pub fn run_ticks<W: Renderer>(
        &mut self,
        ticks: u64,
        renderer: &mut W,
    ) -> Result<Duration, W::Error> {
        let target = self.dashboard.ticks() + ticks;
        let mut now = Duration::ZERO;
        while self.dashboard.ticks() < target {
            now += self.until_next(now).max(Duration::from_millis(1));
            self.pump(now, renderer)?;
        }
        Ok(now)
    }
}
