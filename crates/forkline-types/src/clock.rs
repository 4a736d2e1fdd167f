//! Injectable time sources.
//!
//! Operations capture the instant they were created. The engine never reads
//! the wall clock directly; it asks the [`Clock`] it was built with, so tests
//! and replays can pin time with a [`ManualClock`].

use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};

/// A source of the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    instant: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            instant: Mutex::new(start),
        }
    }

    /// Start at the UNIX epoch.
    pub fn epoch() -> Self {
        Self::new(DateTime::<Utc>::UNIX_EPOCH)
    }

    pub fn set(&self, instant: DateTime<Utc>) {
        *self.lock() = instant;
    }

    pub fn advance(&self, by: Duration) {
        let mut instant = self.lock();
        *instant += by;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, DateTime<Utc>> {
        // A poisoned lock still holds a valid instant.
        self.instant.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_is_after_2020() {
        let now = SystemClock.now();
        assert!(now.timestamp_millis() > 1_577_836_800_000);
    }

    #[test]
    fn manual_clock_holds_still() {
        let clock = ManualClock::epoch();
        assert_eq!(clock.now(), clock.now());
        assert_eq!(clock.now().timestamp(), 0);
    }

    #[test]
    fn manual_clock_advances_and_sets() {
        let clock = ManualClock::epoch();
        clock.advance(Duration::seconds(90));
        assert_eq!(clock.now().timestamp(), 90);

        let later = DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap();
        clock.set(later);
        assert_eq!(clock.now(), later);
    }
}
