//! Error type for the core value computations.
//!
//! Most of this crate is infallible arithmetic; errors only arise at the
//! boundaries where external data enters — observer locations from a
//! location service and coordinate strings typed by a user.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// A location component was non-finite or outside its valid range.
    #[error("invalid location: {0}")]
    InvalidLocation(String),

    /// A sexagesimal coordinate string could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),
}

/// Convenience alias for `Result<T, CoreError>`.
pub type Result<T> = std::result::Result<T, CoreError>;
