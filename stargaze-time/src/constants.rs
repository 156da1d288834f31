//! Time-unit constants.

pub const MILLISECONDS_PER_SECOND: i64 = 1_000;
pub const MILLISECONDS_PER_MINUTE: i64 = 60_000;
pub const MILLISECONDS_PER_HOUR: i64 = 3_600_000;
pub const MILLISECONDS_PER_DAY: i64 = 86_400_000;

pub const SECONDS_PER_SECOND: i64 = 1;
pub const SECONDS_PER_MINUTE: i64 = 60;
pub const SECONDS_PER_10MINUTE: i64 = 600;
pub const SECONDS_PER_HOUR: i64 = 3_600;
pub const SECONDS_PER_DAY: i64 = 24 * SECONDS_PER_HOUR;
pub const SECONDS_PER_WEEK: i64 = 7 * SECONDS_PER_DAY;

/// Julian day number of the Unix epoch (1970-01-01 00:00 UTC).
pub const UNIX_EPOCH_JD: f64 = 2440587.5;
