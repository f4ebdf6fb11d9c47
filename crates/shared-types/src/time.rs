//! Time source port.
//!
//! Proof building and token verification read "now" through this trait so
//! tests can pin the clock.

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};

/// Time source trait for testability
pub trait TimeSource: Send + Sync {
    /// Milliseconds since the Unix epoch.
    fn now_millis(&self) -> i64;
}

/// System time implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// A clock frozen at a given instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedTimeSource(pub i64);

impl TimeSource for FixedTimeSource {
    fn now_millis(&self) -> i64 {
        self.0
    }
}

impl<T: TimeSource + ?Sized> TimeSource for std::sync::Arc<T> {
    fn now_millis(&self) -> i64 {
        (**self).now_millis()
    }
}

/// Convert Unix milliseconds to a UTC datetime, clamping out-of-range values
/// to the epoch.
pub fn datetime_from_millis(millis: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(millis)
        .single()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// RFC 3339 rendering with millisecond precision and a `Z` suffix.
pub fn iso8601_from_millis(millis: i64) -> String {
    datetime_from_millis(millis).to_rfc3339_opts(SecondsFormat::Millis, true)
}
