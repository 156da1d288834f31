//! The astronomer orientation model.
//!
//! Computes where a handheld device points on the celestial sphere from its
//! sensors, the observer's location and the current (possibly simulated)
//! time, and exposes the controllers a sky-map UI drives it with.
//!
//! The pieces:
//!
//! - [`AstronomerModel`] — the reference-frame arithmetic and all observer
//!   state.
//! - [`Pointing`] — line of sight plus screen-up, read once per rendered
//!   frame.
//! - [`MagneticDeclinationCalculator`] — strategy for the compass-to-true
//!   north correction.
//! - [`controllers`] — sensor, manual, zoom, teleport and location control,
//!   and the [`ControllerGroup`](controllers::ControllerGroup) facade that
//!   also owns the time-travel clock stack.

pub mod astronomer;
pub mod controllers;
pub mod declination;
pub mod pointing;
pub mod smoothing;

pub use astronomer::{AstronomerModel, DEFAULT_FIELD_OF_VIEW_DEG};
pub use controllers::{Controller, ControllerGroup, SharedModel};
pub use declination::{
    MagneticDeclinationCalculator, PresetMagneticDeclination, ZeroMagneticDeclination,
};
pub use pointing::Pointing;
pub use smoothing::ExponentiallyWeightedSmoother;
