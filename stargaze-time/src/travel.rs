//! The time-travel clock.
//!
//! Reports a simulated instant that plays forward or backward at one of a
//! fixed table of rates. The table is symmetric around a stopped entry and
//! spans one second per second to one week per second in the named steps a
//! user can click through.

use crate::clock::{Clock, RealClock};
use crate::constants::{
    MILLISECONDS_PER_DAY, SECONDS_PER_10MINUTE, SECONDS_PER_DAY, SECONDS_PER_HOUR,
    SECONDS_PER_MINUTE, SECONDS_PER_SECOND, SECONDS_PER_WEEK,
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A playback rate in simulated seconds per wall-clock second.
struct Speed {
    rate: f64,
    label: &'static str,
}

const fn speed(rate: i64, label: &'static str) -> Speed {
    Speed {
        rate: rate as f64,
        label,
    }
}

const SPEEDS: [Speed; 13] = [
    speed(-SECONDS_PER_WEEK, "1 week per second, backwards"),
    speed(-SECONDS_PER_DAY, "1 day per second, backwards"),
    speed(-SECONDS_PER_HOUR, "1 hour per second, backwards"),
    speed(-SECONDS_PER_10MINUTE, "10 minutes per second, backwards"),
    speed(-SECONDS_PER_MINUTE, "1 minute per second, backwards"),
    speed(-SECONDS_PER_SECOND, "1 second per second, backwards"),
    speed(0, "time stopped"),
    speed(SECONDS_PER_SECOND, "1 second per second"),
    speed(SECONDS_PER_MINUTE, "1 minute per second"),
    speed(SECONDS_PER_10MINUTE, "10 minutes per second"),
    speed(SECONDS_PER_HOUR, "1 hour per second"),
    speed(SECONDS_PER_DAY, "1 day per second"),
    speed(SECONDS_PER_WEEK, "1 week per second"),
];

const STOPPED_INDEX: usize = SPEEDS.len() / 2;

struct TravelState {
    speed_index: usize,
    /// Wall-clock instant `simulated_time` was last brought up to date.
    time_last_set: i64,
    simulated_time: i64,
}

/// A clock whose time is set by the user and plays at a selectable rate.
///
/// The wall clock is injected so the stepping behavior is testable; the
/// default is [`RealClock`].
pub struct TimeTravelClock {
    wall_clock: Arc<dyn Clock>,
    state: Mutex<TravelState>,
}

impl TimeTravelClock {
    pub fn new() -> Self {
        Self::with_wall_clock(Arc::new(RealClock))
    }

    pub fn with_wall_clock(wall_clock: Arc<dyn Clock>) -> Self {
        let now = wall_clock.now_millis();
        Self {
            wall_clock,
            state: Mutex::new(TravelState {
                speed_index: STOPPED_INDEX,
                time_last_set: now,
                simulated_time: now,
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, TravelState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Sets the simulated instant and pauses playback.
    pub fn set_time_travel_date(&self, epoch_millis: i64) {
        let mut state = self.state();
        log::debug!("time travel to {} ms, pausing", epoch_millis);
        state.speed_index = STOPPED_INDEX;
        state.time_last_set = self.wall_clock.now_millis();
        state.simulated_time = epoch_millis;
    }

    /// Steps one entry toward the fastest forward rate, clamped at the end
    /// of the table.
    pub fn accelerate_time_travel(&self) {
        let mut state = self.state();
        if state.speed_index < SPEEDS.len() - 1 {
            state.speed_index += 1;
            log::debug!("accelerating to {}", SPEEDS[state.speed_index].label);
        } else {
            log::debug!("already at maximum forward speed");
        }
    }

    /// Steps one entry toward the fastest backward rate, clamped at the
    /// start of the table.
    pub fn decelerate_time_travel(&self) {
        let mut state = self.state();
        if state.speed_index > 0 {
            state.speed_index -= 1;
            log::debug!("decelerating to {}", SPEEDS[state.speed_index].label);
        } else {
            log::debug!("already at maximum backward speed");
        }
    }

    /// Resets playback to the stopped entry.
    pub fn pause_time(&self) {
        log::debug!("pausing time");
        self.state().speed_index = STOPPED_INDEX;
    }

    /// A human-readable description of the current rate.
    pub fn speed_label(&self) -> &'static str {
        SPEEDS[self.state().speed_index].label
    }

    /// Current rate in simulated seconds per wall-clock second.
    pub fn speed(&self) -> f64 {
        SPEEDS[self.state().speed_index].rate
    }
}

impl Default for TimeTravelClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TimeTravelClock {
    fn now_millis(&self) -> i64 {
        let now = self.wall_clock.now_millis();
        let mut state = self.state();

        let elapsed = now - state.time_last_set;
        let rate = SPEEDS[state.speed_index].rate;
        let mut time_delta = (rate * elapsed as f64) as i64;

        if rate.abs() >= SECONDS_PER_DAY as f64 {
            // At a day per second or faster, step in whole days so the sky
            // shows the slow annual procession instead of a dizzying blur.
            let days = time_delta / MILLISECONDS_PER_DAY;
            if days == 0 {
                // Not a full day yet. Leave time_last_set alone so the
                // fraction keeps accumulating toward the next day boundary.
                return state.simulated_time;
            }
            time_delta = days * MILLISECONDS_PER_DAY;
        }

        state.time_last_set = now;
        state.simulated_time += time_delta;
        state.simulated_time
    }
}
