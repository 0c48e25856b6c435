//! Tick-driven elapsed-time counter
//!
//! The counter advances one second per tick instead of being derived from
//! `now - start`, so the shown value never jumps when the wall clock is
//! adjusted mid-session. A starved ticker makes it drift; that is accepted.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};
use tracing::debug;

use crate::time_format::format_elapsed;
use crate::{Error, Result};

/// Default cadence of the ticker
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Hours, minutes and seconds of a running session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ElapsedCounter {
    hours: u32,
    minutes: u32,
    seconds: u32,
}

impl ElapsedCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by one second, carrying into minutes and hours.
    ///
    /// Hours are not bounded here; only the rendering is limited to two
    /// digits.
    pub fn tick(&mut self) {
        self.seconds += 1;
        if self.seconds >= 60 {
            self.seconds = 0;
            self.minutes += 1;
        }
        if self.minutes >= 60 {
            self.minutes = 0;
            self.hours += 1;
        }
    }

    /// `HH:mm:ss`
    pub fn render(&self) -> String {
        format_elapsed(self.hours, self.minutes, self.seconds)
    }
}

/// Lifecycle of an [`ElapsedTimer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Idle,
    Running,
    Stopped,
}

#[derive(Debug)]
struct TimerInner {
    state: TimerState,
    counter: ElapsedCounter,
}

/// A one-shot session timer: `Idle -> Running -> Stopped`.
///
/// Ticks and [`stop`](Self::stop) take the same lock, and `stop` flips the
/// state before reading the final value, so no tick is applied after the
/// value has been handed out.
#[derive(Debug)]
pub struct ElapsedTimer {
    inner: Arc<Mutex<TimerInner>>,
    ticker: Mutex<Option<JoinHandle<()>>>,
    period: Duration,
}

impl Default for ElapsedTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl ElapsedTimer {
    pub fn new() -> Self {
        Self::with_period(TICK_PERIOD)
    }

    /// Create a timer that ticks every `period`
    pub fn with_period(period: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(TimerInner {
                state: TimerState::Idle,
                counter: ElapsedCounter::new(),
            })),
            ticker: Mutex::new(None),
            period,
        }
    }

    pub fn state(&self) -> TimerState {
        lock(&self.inner).state
    }

    /// Reset the counter and begin ticking.
    ///
    /// The first tick lands one period after this call. Must be called from
    /// within a Tokio runtime.
    pub fn start(&self) -> Result<()> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|_| Error::invalid_state("timer started outside of a Tokio runtime"))?;

        {
            let mut inner = lock(&self.inner);
            if inner.state != TimerState::Idle {
                return Err(Error::invalid_state(format!(
                    "timer cannot start while {:?}",
                    inner.state
                )));
            }
            inner.counter = ElapsedCounter::new();
            inner.state = TimerState::Running;
        }

        let shared = Arc::clone(&self.inner);
        let period = self.period;
        let handle = runtime.spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            loop {
                interval.tick().await;
                if !apply_tick(&shared) {
                    break;
                }
            }
        });

        *self.ticker.lock().unwrap_or_else(|e| e.into_inner()) = Some(handle);
        debug!("Elapsed timer started");
        Ok(())
    }

    /// Apply one tick. Returns `false` (and changes nothing) unless running.
    pub fn tick(&self) -> bool {
        apply_tick(&self.inner)
    }

    /// The counter's current rendering, at any point in the lifecycle
    pub fn current_string(&self) -> String {
        lock(&self.inner).counter.render()
    }

    /// Halt ticking and return the final `HH:mm:ss` value
    pub fn stop(&self) -> Result<String> {
        let final_value = {
            let mut inner = lock(&self.inner);
            if inner.state != TimerState::Running {
                return Err(Error::invalid_state(format!(
                    "timer cannot stop while {:?}",
                    inner.state
                )));
            }
            inner.state = TimerState::Stopped;
            inner.counter.render()
        };

        if let Some(handle) = self.ticker.lock().unwrap_or_else(|e| e.into_inner()).take() {
            handle.abort();
        }
        debug!("Elapsed timer stopped at {}", final_value);
        Ok(final_value)
    }
}

impl Drop for ElapsedTimer {
    fn drop(&mut self) {
        if let Some(handle) = self.ticker.lock().unwrap_or_else(|e| e.into_inner()).take() {
            handle.abort();
        }
    }
}

fn lock(inner: &Mutex<TimerInner>) -> MutexGuard<'_, TimerInner> {
    // the guarded data is plain counters, always consistent
    inner.lock().unwrap_or_else(|e| e.into_inner())
}

fn apply_tick(inner: &Mutex<TimerInner>) -> bool {
    let mut inner = lock(inner);
    if inner.state != TimerState::Running {
        return false;
    }
    inner.counter.tick();
    true
}
