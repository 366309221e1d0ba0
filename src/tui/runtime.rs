//! TUI application state.

use std::time::{Duration, Instant};

use rand::rngs::StdRng;

use crate::dashboard::Dashboard;
use crate::dashboard::view::Panel;
use crate::runner::Runner;

/// Interactive session around a [`Runner`].
pub struct App {
    /// Timer dispatch and dashboard state.
    pub runner: Runner<StdRng>,
    /// Wall-clock origin of the runner's elapsed time.
    started: Instant,
    /// Whether the user has requested quit.
    pub quit: bool,
}

impl App {
    pub fn new(runner: Runner<StdRng>) -> Self {
        Self {
            runner,
            started: Instant::now(),
            quit: false,
        }
    }

    /// Wall time since the session started.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn dashboard(&self) -> &Dashboard<StdRng> {
        self.runner.dashboard()
    }

    /// Activates the panel at 1-based position `n`, if there is one.
    pub fn select_panel(&mut self, n: usize) {
        if let Some(panel) = n.checked_sub(1).and_then(|i| Panel::ALL.get(i)) {
            self.runner.dashboard_mut().switch_panel(*panel);
        }
    }

    pub fn next_panel(&mut self) {
        self.runner.dashboard_mut().cycle_panel();
    }

    pub fn request_stop(&mut self) {
        self.runner.dashboard_mut().emergency_mut().request();
    }

    pub fn confirm_stop(&mut self) {
        self.runner.dashboard_mut().emergency_mut().confirm();
    }

    /// Cancels a pending request or dismisses an acknowledgement.
    pub fn close_dialog(&mut self) {
        let stop = self.runner.dashboard_mut().emergency_mut();
        stop.cancel();
        stop.dismiss();
    }

    /// Whether the emergency-stop dialog is open.
    pub fn dialog_open(&self) -> bool {
        self.dashboard().emergency().prompt().is_some()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveTime;
    use rand::SeedableRng;

    use super::*;
    use crate::config::DashboardConfig;
    use crate::dashboard::emergency::StopState;

    fn app() -> App {
        let runner = Runner::new(
            DashboardConfig::default(),
            StdRng::seed_from_u64(42),
            NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
        );
        App::new(runner)
    }

    #[test]
    fn select_panel_by_number() {
        let mut app = app();
        app.select_panel(3);
        assert_eq!(app.dashboard().view().active(), Panel::Storage);
        app.select_panel(0);
        app.select_panel(9);
        assert_eq!(app.dashboard().view().active(), Panel::Storage);
    }

    #[test]
    fn stop_dialog_flow_leaves_snapshot_alone() {
        let mut app = app();
        let before = app.dashboard().snapshot().clone();
        app.request_stop();
        assert!(app.dialog_open());
        app.confirm_stop();
        assert_eq!(app.dashboard().emergency().state(), StopState::Acknowledged);
        app.close_dialog();
        assert!(!app.dialog_open());
        assert_eq!(app.dashboard().snapshot(), &before);
    }

    #[test]
    fn next_panel_cycles() {
        let mut app = app();
        app.next_panel();
        assert_eq!(app.dashboard().view().active(), Panel::Generation);
    }
}
