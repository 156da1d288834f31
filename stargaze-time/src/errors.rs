//! Error type for the time crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TimeError {
    /// A date/time string did not match any accepted format.
    #[error("unparseable date/time: '{0}'")]
    UnparseableDate(String),

    /// An epoch-millisecond value fell outside chrono's representable range.
    #[error("timestamp out of range: {0} ms")]
    TimestampOutOfRange(i64),
}

/// Convenience alias for `Result<T, TimeError>`.
pub type Result<T> = std::result::Result<T, TimeError>;
