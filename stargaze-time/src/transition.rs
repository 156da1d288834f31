//! The composite clock that blends real time and time travel.
//!
//! Jumping the reported time instantly would snap the whole rendered sky to
//! a new orientation. Instead this clock runs a short smoothstep-eased
//! transition between the old and new instants, then hands off to the target
//! clock permanently.

use crate::clock::Clock;
use crate::travel::TimeTravelClock;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Duration of the eased transition between modes.
pub const TRANSITION_TIME_MILLIS: i64 = 2500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    RealTime,
    Transition,
    TimeTravel,
}

struct TransitionState {
    mode: Mode,
    transition_to: Mode,
    /// Simulated-time bounds of the current transition.
    start_time: i64,
    end_time: i64,
    /// Wall-clock instant the transition began.
    transition_started: i64,
}

/// A [`Clock`] that switches between a real clock and a [`TimeTravelClock`],
/// easing the reported time across every switch.
///
/// The real clock serves double duty: it is the source of reported time in
/// real-time mode and the metronome that paces transitions.
pub struct TransitioningCompositeClock {
    real_clock: Arc<dyn Clock>,
    time_travel_clock: Arc<TimeTravelClock>,
    state: Mutex<TransitionState>,
}

impl TransitioningCompositeClock {
    pub fn new(time_travel_clock: Arc<TimeTravelClock>, real_clock: Arc<dyn Clock>) -> Self {
        Self {
            real_clock,
            time_travel_clock,
            state: Mutex::new(TransitionState {
                mode: Mode::RealTime,
                transition_to: Mode::RealTime,
                start_time: 0,
                end_time: 0,
                transition_started: 0,
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, TransitionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Begins an eased transition from the currently reported time to
    /// `target_epoch_millis`, ending in time-travel mode with playback
    /// paused at the target.
    pub fn go_time_travel(&self, target_epoch_millis: i64) {
        let start_time = self.now_millis();
        self.time_travel_clock.set_time_travel_date(target_epoch_millis);

        let mut state = self.state();
        log::debug!(
            "transition to time travel: {} -> {}",
            start_time,
            target_epoch_millis
        );
        state.start_time = start_time;
        state.end_time = target_epoch_millis;
        state.mode = Mode::Transition;
        state.transition_to = Mode::TimeTravel;
        state.transition_started = self.real_clock.now_millis();
    }

    /// Begins an eased transition back to real time.
    ///
    /// The end point is real time at the moment the transition completes,
    /// so the handoff to the real clock is continuous.
    pub fn return_to_real_time(&self) {
        let start_time = self.now_millis();

        let mut state = self.state();
        log::debug!("transition back to real time from {}", start_time);
        let now = self.real_clock.now_millis();
        state.start_time = start_time;
        state.end_time = now + TRANSITION_TIME_MILLIS;
        state.mode = Mode::Transition;
        state.transition_to = Mode::RealTime;
        state.transition_started = now;
    }

    /// The embedded time-travel clock, for rate control while traveling.
    pub fn time_travel_clock(&self) -> &TimeTravelClock {
        &self.time_travel_clock
    }

    /// True while the clock reports time-travel (or transitioning) time.
    pub fn is_time_traveling(&self) -> bool {
        self.state().mode != Mode::RealTime
    }
}

/// Smoothly interpolates from `start` at `lambda = 0` to `end` at
/// `lambda = 1`, with zero velocity at both ends.
pub fn interpolate(start: f64, end: f64, lambda: f64) -> f64 {
    start + (3.0 * lambda * lambda - 2.0 * lambda * lambda * lambda) * (end - start)
}

impl Clock for TransitioningCompositeClock {
    fn now_millis(&self) -> i64 {
        let mut state = self.state();
        if state.mode == Mode::Transition {
            let elapsed = self.real_clock.now_millis() - state.transition_started;
            if elapsed > TRANSITION_TIME_MILLIS {
                state.mode = state.transition_to;
            } else {
                return interpolate(
                    state.start_time as f64,
                    state.end_time as f64,
                    elapsed as f64 / TRANSITION_TIME_MILLIS as f64,
                ) as i64;
            }
        }
        let mode = state.mode;
        drop(state);

        match mode {
            Mode::RealTime => self.real_clock.now_millis(),
            Mode::TimeTravel => self.time_travel_clock.now_millis(),
            // Handled above; a transition never survives to here.
            Mode::Transition => self.real_clock.now_millis(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::test_support::FakeClock;

    fn setup(start_millis: i64) -> (Arc<FakeClock>, TransitioningCompositeClock) {
        let wall = Arc::new(FakeClock::new(start_millis));
        let travel = Arc::new(TimeTravelClock::with_wall_clock(wall.clone()));
        let composite = TransitioningCompositeClock::new(travel, wall.clone());
        (wall, composite)
    }

    #[test]
    fn interpolation_endpoints_and_midpoint() {
        assert_eq!(interpolate(0.0, 10.0, 0.0), 0.0);
        assert_eq!(interpolate(0.0, 10.0, 1.0), 10.0);
        assert_eq!(interpolate(0.0, 10.0, 0.5), 5.0);

        // Monotone on [0, 1].
        let mut previous = f64::NEG_INFINITY;
        for i in 0..=100 {
            let value = interpolate(0.0, 10.0, i as f64 / 100.0);
            assert!(value >= previous);
            previous = value;
        }
    }

    #[test]
    fn reports_real_time_before_any_travel() {
        let (wall, composite) = setup(1000);
        assert_eq!(composite.now_millis(), 1000);
        assert!(!composite.is_time_traveling());

        wall.advance(500);
        assert_eq!(composite.now_millis(), 1500);
    }

    #[test]
    fn transition_into_time_travel() {
        let (wall, composite) = setup(1000);
        assert_eq!(composite.now_millis(), 1000);

        composite.go_time_travel(5000);
        assert!(composite.is_time_traveling());

        // Start of the transition reports the starting instant.
        assert_eq!(composite.now_millis(), 1000);

        // Halfway through the window the smoothstep is exactly halfway.
        wall.advance(TRANSITION_TIME_MILLIS / 2);
        assert_eq!(composite.now_millis(), 3000);

        // End of the window lands on the target.
        wall.advance(TRANSITION_TIME_MILLIS / 2);
        assert_eq!(composite.now_millis(), 5000);

        // Past the window the paused time-travel clock holds the target.
        wall.advance(1);
        assert_eq!(composite.now_millis(), 5000);
        wall.advance(10_000);
        assert_eq!(composite.now_millis(), 5000);
    }

    #[test]
    fn transition_back_to_real_time_converges() {
        let (wall, composite) = setup(1000);
        composite.go_time_travel(50_000);
        wall.advance(TRANSITION_TIME_MILLIS + 1);
        assert_eq!(composite.now_millis(), 50_000);

        composite.return_to_real_time();
        let wall_at_return = 1000 + TRANSITION_TIME_MILLIS + 1;
        let expected_end = wall_at_return + TRANSITION_TIME_MILLIS;

        // Starts from the traveled time.
        assert_eq!(composite.now_millis(), 50_000);

        // Ends at real time as of the end of the window.
        wall.advance(TRANSITION_TIME_MILLIS);
        assert_eq!(composite.now_millis(), expected_end);

        // The mode flips on the first read past the window.
        wall.advance(1);
        assert_eq!(composite.now_millis(), wall.now_millis());
        assert!(!composite.is_time_traveling());
    }

    #[test]
    fn travel_rate_controls_apply_after_transition() {
        let (wall, composite) = setup(0);
        composite.go_time_travel(100_000);
        wall.advance(TRANSITION_TIME_MILLIS + 1);
        assert_eq!(composite.now_millis(), 100_000);

        composite.time_travel_clock().accelerate_time_travel();
        wall.advance(2_000);
        assert_eq!(composite.now_millis(), 102_000);
    }
}
