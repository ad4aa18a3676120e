//! Time source for statistics windows.
//!
//! All timestamps in core are Unix epoch milliseconds (UTC).

use time::OffsetDateTime;

pub const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Supplies "now" to time-dependent calculations.
pub trait Clock {
    fn now_epoch_ms(&self) -> i64;
}

impl<T: Clock + ?Sized> Clock for &T {
    fn now_epoch_ms(&self) -> i64 {
        (**self).now_epoch_ms()
    }
}

/// Wall clock backed by `OffsetDateTime::now_utc`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_epoch_ms(&self) -> i64 {
        to_epoch_ms(OffsetDateTime::now_utc())
    }
}

/// Clock frozen at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now_epoch_ms(&self) -> i64 {
        self.0
    }
}

/// Converts a UTC instant to epoch milliseconds.
pub fn to_epoch_ms(value: OffsetDateTime) -> i64 {
    value.unix_timestamp() * 1000 + i64::from(value.millisecond())
}
