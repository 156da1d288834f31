//! Time machinery for the stargaze pointing model.
//!
//! Two halves:
//!
//! - Astronomical time: Julian day, mean sidereal time and the RA/Dec of
//!   the zenith, in [`julian`].
//! - Clocks: the [`Clock`] trait behind which the model reads time, the
//!   user-steerable [`TimeTravelClock`], and the
//!   [`TransitioningCompositeClock`] that eases between real time and time
//!   travel, in [`clock`], [`travel`] and [`transition`].

pub mod clock;
pub mod constants;
pub mod errors;
pub mod julian;
pub mod parsing;
pub mod transition;
pub mod travel;

pub use clock::{Clock, RealClock};
pub use errors::{Result, TimeError};
pub use transition::{TransitioningCompositeClock, TRANSITION_TIME_MILLIS};
pub use travel::TimeTravelClock;
