//! Time source.

use chrono::{DateTime, Utc};

/// Source of the current time, injected so track ids and timestamps are
/// reproducible in tests.
pub trait Clock {
    /// Current UTC time.
    fn now(&self) -> DateTime<Utc>;
}

/// [`Clock`] reading the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
