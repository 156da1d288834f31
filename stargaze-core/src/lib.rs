//! Core value types for the stargaze pointing model.
//!
//! This crate holds the pieces everything else is built from: 3D vectors and
//! 3x3 matrices for reference-frame algebra, angle wrapping helpers,
//! unit-sphere and RA/Dec coordinate types, and a validated observer
//! location. All of it is plain value computation — no I/O, no hidden state.

pub mod angle;
pub mod constants;
pub mod coords;
pub mod errors;
pub mod location;
pub mod matrix;

pub use coords::{EquatorialCoordinates, GeocentricCoordinates};
pub use errors::{CoreError, Result};
pub use location::GeoLocation;
pub use matrix::{Matrix3x3, Vector3};
