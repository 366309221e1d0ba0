//! Cosmetic emergency-stop confirmation dialog.
//!
//! Confirming only acknowledges the request; no simulated state changes.

use serde::Serialize;
use tracing::warn;

/// Dialog state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StopState {
    #[default]
    Idle,
    /// Asking the operator to confirm.
    Confirming,
    /// Confirmed; acknowledgement shown until dismissed.
    Acknowledged,
}

#[derive(Debug, Clone, Default)]
pub struct EmergencyStop {
    state: StopState,
}

impl EmergencyStop {
    pub fn state(&self) -> StopState {
        self.state
    }

    /// Opens the confirmation dialog from `Idle`.
    pub fn request(&mut self) {
        if self.state == StopState::Idle {
            self.state = StopState::Confirming;
        }
    }

    /// Confirms a pending request. Returns `true` if one was pending.
    pub fn confirm(&mut self) -> bool {
        if self.state != StopState::Confirming {
            return false;
        }
        warn!("emergency stop confirmed by operator; simulated system unchanged");
        self.state = StopState::Acknowledged;
        true
    }

    /// Closes the dialog without acting.
    pub fn cancel(&mut self) {
        if self.state == StopState::Confirming {
            self.state = StopState::Idle;
        }
    }

    /// Clears the acknowledgement.
    pub fn dismiss(&mut self) {
        if self.state == StopState::Acknowledged {
            self.state = StopState::Idle;
        }
    }

    /// Short text for the current dialog, if one is open.
    pub fn prompt(&self) -> Option<&'static str> {
        match self.state {
            StopState::Idle => None,
            StopState::Confirming => Some("Confirm EMERGENCY STOP? (y/n)"),
            StopState::Acknowledged => Some("Emergency stop acknowledged (Enter to dismiss)"),
        }
    }
}
