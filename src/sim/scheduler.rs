//! Periodic timers driving the dashboard loop.

use std::time::Duration;

/// The independent periodic callbacks of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timer {
    /// Clock label refresh.
    Clock,
    /// Simulation step followed by a render pass.
    Simulation,
    /// Cosmetic connection check.
    Connection,
}

#[derive(Debug, Clone)]
struct Interval {
    timer: Timer,
    period: Duration,
    next_due: Duration,
}

/// Fixed set of interval timers measured against elapsed time since start.
///
/// Each timer fires at most once per [`Scheduler::due`] call. After firing,
/// the next deadline is `now + period`: late polls shift the schedule rather
/// than replaying missed ticks.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use microgrid_dash::sim::scheduler::{Scheduler, Timer};
///
/// let mut sched = Scheduler::new(
///     Duration::from_secs(1),
///     Duration::from_secs(3),
///     Duration::from_secs(30),
/// );
/// assert!(sched.due(Duration::from_millis(500)).is_empty());
/// assert_eq!(sched.due(Duration::from_secs(1)), vec![Timer::Clock]);
/// assert_eq!(
///     sched.due(Duration::from_secs(3)),
///     vec![Timer::Clock, Timer::Simulation]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Scheduler {
    intervals: [Interval; 3],
}

impl Scheduler {
    /// Creates a scheduler whose timers first fire one period after start.
    pub fn new(clock: Duration, simulation: Duration, connection: Duration) -> Self {
        let interval = |timer, period: Duration| Interval {
            timer,
            period,
            next_due: period,
        };
        Self {
            intervals: [
                interval(Timer::Clock, clock),
                interval(Timer::Simulation, simulation),
                interval(Timer::Connection, connection),
            ],
        }
    }

    /// Returns the timers due at `now`, in declaration order, and re-arms them.
    pub fn due(&mut self, now: Duration) -> Vec<Timer> {
        let mut fired = Vec::new();
        for interval in &mut self.intervals {
            if now >= interval.next_due {
                interval.next_due = now + interval.period;
                fired.push(interval.timer);
            }
        }
        fired
    }

    /// Time remaining until the earliest deadline (zero if one is overdue).
    pub fn until_next(&self, now: Duration) -> Duration {
        self.intervals
            .iter()
            .map(|i| i.next_due.saturating_sub(now))
            .min()
            .unwrap_or_default()
    }

    /// Period of the given timer.
    pub fn period(&self, timer: Timer) -> Duration {
        self.intervals
            .iter()
            .find(|i| i.timer == timer)
            .map(|i| i.period)
            .unwrap_or_default()
    }
}
