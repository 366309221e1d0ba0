//! Simulated link status shown in the header.

use std::time::Duration;

use tracing::{info, warn};

use crate::config::ConnectionConfig;
use crate::sim::random::RandomSource;

/// Link status.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LinkState {
    Connected,
    /// Dropped; restores once elapsed time reaches `until`.
    Reconnecting { until: Duration },
}

/// Transition reported by the monitor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LinkEvent {
    Dropped { reconnect_in: Duration },
    Restored,
}

/// Randomly drops and restores a pretend link. The simulation loop runs
/// regardless of its state.
#[derive(Debug, Clone)]
pub struct ConnectionMonitor {
    cfg: ConnectionConfig,
    state: LinkState,
}

impl ConnectionMonitor {
    pub fn new(cfg: ConnectionConfig) -> Self {
        Self {
            cfg,
            state: LinkState::Connected,
        }
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == LinkState::Connected
    }

    pub fn label(&self) -> &'static str {
        match self.state {
            LinkState::Connected => "Connected",
            LinkState::Reconnecting { .. } => "Reconnecting...",
        }
    }

    /// Periodic check at elapsed time `now`. While connected, drops the link
    /// with the configured probability and schedules the reconnect.
    pub fn check(&mut self, now: Duration, rng: &mut impl RandomSource) -> Option<LinkEvent> {
        if !self.is_connected() || !rng.chance(self.cfg.drop_probability) {
            return None;
        }
        let secs = rng.uniform(self.cfg.reconnect_min_s, self.cfg.reconnect_max_s);
        let reconnect_in = Duration::from_secs_f64(secs.max(0.0));
        self.state = LinkState::Reconnecting {
            until: now + reconnect_in,
        };
        warn!(reconnect_in_s = secs, "connection lost");
        Some(LinkEvent::Dropped { reconnect_in })
    }

    /// Restores the link once the reconnect deadline has passed.
    pub fn poll(&mut self, now: Duration) -> Option<LinkEvent> {
        match self.state {
            LinkState::Reconnecting { until } if now >= until => {
                self.state = LinkState::Connected;
                info!("connection restored");
                Some(LinkEvent::Restored)
            }
            _ => None,
        }
    }

    /// Time left until the pending reconnect, if any.
    pub fn until_reconnect(&self, now: Duration) -> Option<Duration> {
        match self.state {
            LinkState::Reconnecting { until } => Some(until.saturating_sub(now)),
            LinkState::Connected => None,
        }
    }
}
