//! Linear-algebra primitives for reference-frame transformations.

mod matrix3x3;
mod vector3;

pub use matrix3x3::Matrix3x3;
pub use vector3::Vector3;
