//! Per-tick context handed to the simulation step.

use std::time::Duration;

use chrono::{Local, NaiveTime, Timelike};

/// Wall-clock context for one simulation tick.
///
/// # Examples
///
/// ```
/// use chrono::NaiveTime;
/// use microgrid_dash::sim::types::TickContext;
///
/// let start = NaiveTime::from_hms_opt(23, 59, 0).unwrap();
/// let ctx = TickContext::offset(start, std::time::Duration::from_secs(120));
/// assert_eq!(ctx.hour, 0);
/// assert_eq!(ctx.time_label(), "00:01");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickContext {
    /// Hour of day (0–23) keying the diurnal demand profile.
    pub hour: u32,
    /// Wall-clock time of the tick.
    pub time: NaiveTime,
}

impl TickContext {
    /// Context for an explicit time of day.
    pub fn at(time: NaiveTime) -> Self {
        Self {
            hour: time.hour(),
            time,
        }
    }

    /// Context for the current local time.
    pub fn now() -> Self {
        Self::at(Local::now().time())
    }

    /// Context for `start + elapsed`, wrapping at midnight.
    pub fn offset(start: NaiveTime, elapsed: Duration) -> Self {
        let secs = (u64::from(start.num_seconds_from_midnight()) + elapsed.as_secs()) % 86_400;
        let time = u32::try_from(secs)
            .ok()
            .and_then(|s| NaiveTime::from_num_seconds_from_midnight_opt(s, 0))
            .unwrap_or(start);
        Self::at(time)
    }

    /// `HH:MM` label stamped on alerts.
    pub fn time_label(&self) -> String {
        self.time.format("%H:%M").to_string()
    }

    /// `HH:MM:SS` label for the clock display.
    pub fn clock_label(&self) -> String {
        self.time.format("%H:%M:%S").to_string()
    }
}
