//! Sources of the current local time

#[cfg(any(test, feature = "test-util"))]
use std::sync::Mutex;

#[cfg(any(test, feature = "test-util"))]
use chrono::TimeDelta;
use chrono::{Local, NaiveDateTime, SubsecRound};

/// Provides "now" as a local timestamp at millisecond precision.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;

    /// Midnight of the current local day
    fn start_of_today(&self) -> NaiveDateTime {
        self.now().date().and_time(chrono::NaiveTime::MIN)
    }
}

/// The platform clock in the local time zone
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local().trunc_subsecs(3)
    }
}

/// A clock that only moves when told to
#[cfg(any(test, feature = "test-util"))]
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<NaiveDateTime>,
}

#[cfg(any(test, feature = "test-util"))]
impl ManualClock {
    pub fn new(start: NaiveDateTime) -> Self {
        Self {
            now: Mutex::new(start.trunc_subsecs(3)),
        }
    }

    pub fn advance(&self, delta: TimeDelta) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += delta;
    }
}

#[cfg(any(test, feature = "test-util"))]
impl Clock for ManualClock {
    fn now(&self) -> NaiveDateTime {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}
