//! Tick scheduling seam between the timer engine and its host loop.
//!
//! The engine never sleeps or owns a timer primitive. It asks a
//! [`TickScheduler`] for the next tick and cancels it on pause/reset; the
//! hosting event loop decides how the delay is honored.

use tokio::time::{Duration, Instant};

/// Delay between two ticks (one time unit).
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Schedules the engine's next tick.
pub trait TickScheduler {
    /// Requests one tick after `delay`, replacing any pending request.
    fn schedule_next_tick(&mut self, delay: Duration);

    /// Drops the pending tick, if any.
    fn cancel(&mut self);
}

// ============================================================================
// DeadlineScheduler
// ============================================================================

/// Scheduler backing the tokio event loop.
///
/// Holds at most one deadline. The loop sleeps until [`deadline`] and calls
/// [`fire`] before ticking the engine, so a cancelled deadline can never
/// produce a tick.
///
/// [`deadline`]: DeadlineScheduler::deadline
/// [`fire`]: DeadlineScheduler::fire
#[derive(Debug, Default)]
pub struct DeadlineScheduler {
    deadline: Option<Instant>,
}

impl DeadlineScheduler {
    /// Creates a scheduler with nothing pending.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the pending deadline.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Consumes the pending deadline. Returns false if it was cancelled.
    pub fn fire(&mut self) -> bool {
        self.deadline.take().is_some()
    }
}

impl TickScheduler for DeadlineScheduler {
    fn schedule_next_tick(&mut self, delay: Duration) {
        self.deadline = Some(Instant::now() + delay);
    }

    fn cancel(&mut self) {
        self.deadline = None;
    }
}

// ============================================================================
// ManualScheduler
// ============================================================================

/// Scheduler that only records requests. Tests drive ticks by hand.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    pending: Option<Duration>,
    schedule_calls: usize,
    cancel_calls: usize,
}

impl ManualScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if a tick is pending.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Returns the pending delay, if any.
    #[must_use]
    pub fn pending_delay(&self) -> Option<Duration> {
        self.pending
    }

    #[must_use]
    pub fn schedule_calls(&self) -> usize {
        self.schedule_calls
    }

    #[must_use]
    pub fn cancel_calls(&self) -> usize {
        self.cancel_calls
    }
}

impl TickScheduler for ManualScheduler {
    fn schedule_next_tick(&mut self, delay: Duration) {
        self.pending = Some(delay);
        self.schedule_calls += 1;
    }

    fn cancel(&mut self) {
        self.pending = None;
        self.cancel_calls += 1;
    }
}
