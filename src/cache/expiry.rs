//! Expiration Clock Module
//!
//! Converts relative timeouts into absolute millisecond expiry timestamps.

use std::time::Duration;

/// Expiry value for entries that never expire.
///
/// Half of the unsigned 64-bit range, so it also fits a signed BIGINT column.
pub const FOREVER: i64 = (u64::MAX >> 1) as i64;

// == Timeout ==
/// Relative timeout requested by a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Timeout {
    /// Use the cache's configured default timeout
    #[default]
    Default,
    /// Never expire
    Never,
    /// Expire after the given duration; zero means already expired
    After(Duration),
}

impl Timeout {
    /// Shorthand for `Timeout::After(Duration::from_secs(secs))`.
    pub fn secs(secs: u64) -> Self {
        Timeout::After(Duration::from_secs(secs))
    }
}

impl From<Duration> for Timeout {
    fn from(duration: Duration) -> Self {
        Timeout::After(duration)
    }
}

impl From<Option<Duration>> for Timeout {
    fn from(duration: Option<Duration>) -> Self {
        duration.map_or(Timeout::Never, Timeout::After)
    }
}

// == Backend Timeout ==
/// Returns the absolute expiry in milliseconds for `timeout`.
///
/// `default` is the cache's configured default; `None` means never expire.
pub fn backend_timeout(timeout: Timeout, default: Option<Duration>) -> i64 {
    let timeout = match timeout {
        Timeout::Default => Timeout::from(default),
        other => other,
    };

    match timeout {
        Timeout::Never | Timeout::Default => FOREVER,
        // A zero timeout expires the entry immediately
        Timeout::After(d) if d.is_zero() => now_ms() - 1000,
        Timeout::After(d) => {
            let ms = i64::try_from(d.as_millis()).unwrap_or(FOREVER);
            now_ms().saturating_add(ms).min(FOREVER)
        }
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
