//! Timer engine for the Pomodoro timer.
//!
//! This module provides the core timer functionality:
//! - State transitions (Idle → Running ⇄ Paused, reset from anywhere)
//! - Countdown driven by externally delivered ticks
//! - Event firing for display, persistence and alerts
//! - Auto-continue between work and break phases

use chrono::NaiveDate;
use tokio::sync::mpsc;

use crate::types::{RunState, TimerDurations, TimerPhase, TimerState, ValidationError};

use super::scheduler::{TickScheduler, TICK_INTERVAL};

// ============================================================================
// TimerEvent
// ============================================================================

/// Timer events for the session controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEvent {
    /// Countdown started from the top of a phase
    Started {
        /// Phase being counted down
        phase: TimerPhase,
    },
    /// Paused countdown resumed
    Resumed {
        /// Remaining seconds at resume
        remaining_seconds: u32,
    },
    /// Countdown paused
    Paused {
        /// Remaining seconds at pause
        remaining_seconds: u32,
    },
    /// Timer reset to a full work phase
    Reset,
    /// Work phase completed, break started
    WorkCompleted {
        /// Sessions completed today, including this one
        sessions_completed: u32,
        /// Length of the break that just started
        break_minutes: u32,
    },
    /// Break phase completed, work started
    BreakCompleted {
        /// Length of the work phase that just started
        work_minutes: u32,
    },
    /// One second elapsed (tick)
    Tick {
        /// Phase after this tick
        phase: TimerPhase,
        /// Remaining seconds after this tick
        remaining_seconds: u32,
    },
}

impl TimerEvent {
    /// Returns true for the two phase-transition events.
    pub fn is_transition(&self) -> bool {
        matches!(self, Self::WorkCompleted { .. } | Self::BreakCompleted { .. })
    }
}

// ============================================================================
// TimerEngine
// ============================================================================

/// Timer engine that manages the countdown state and emits events.
///
/// The engine is driven: the host delivers [`tick`](Self::tick) whenever the
/// scheduler's pending request comes due.
pub struct TimerEngine<S: TickScheduler> {
    /// Current timer state
    state: TimerState,
    /// Next-tick scheduler implemented by the host loop
    scheduler: S,
    /// Event sender channel
    event_tx: mpsc::UnboundedSender<TimerEvent>,
}

impl<S: TickScheduler> TimerEngine<S> {
    /// Creates an engine around an existing state.
    pub fn new(state: TimerState, scheduler: S, event_tx: mpsc::UnboundedSender<TimerEvent>) -> Self {
        Self {
            state,
            scheduler,
            event_tx,
        }
    }

    /// Replaces the configured durations.
    ///
    /// An idle timer re-seats its countdown on the new length. A running or
    /// paused countdown keeps its remaining time; the new lengths apply from
    /// the next phase.
    ///
    /// # Errors
    ///
    /// Returns the validation error and keeps the prior durations if either
    /// value is out of range.
    pub fn configure(&mut self, durations: TimerDurations) -> Result<(), ValidationError> {
        durations.validate()?;
        self.state.durations = durations;
        if self.state.run_state == RunState::Idle {
            self.state.enter_phase(self.state.phase);
        }
        tracing::debug!(
            work = durations.work_minutes,
            brk = durations.break_minutes,
            "durations configured"
        );
        Ok(())
    }

    /// Starts or resumes the countdown.
    ///
    /// Starting from idle begins the current phase with a full countdown.
    /// Resuming from pause keeps the remaining time. No-op while running.
    pub fn start(&mut self) {
        match self.state.run_state {
            RunState::Running => {
                tracing::debug!("start ignored: already running");
                return;
            }
            RunState::Idle => {
                self.state.enter_phase(self.state.phase);
                self.emit(TimerEvent::Started {
                    phase: self.state.phase,
                });
            }
            RunState::Paused => {
                self.emit(TimerEvent::Resumed {
                    remaining_seconds: self.state.remaining_seconds,
                });
            }
        }

        self.state.run_state = RunState::Running;
        self.scheduler.schedule_next_tick(TICK_INTERVAL);
    }

    /// Pauses a running countdown and cancels the pending tick.
    pub fn pause(&mut self) {
        if !self.state.is_running() {
            tracing::debug!("pause ignored: not running");
            return;
        }

        self.state.run_state = RunState::Paused;
        self.scheduler.cancel();
        self.emit(TimerEvent::Paused {
            remaining_seconds: self.state.remaining_seconds,
        });
    }

    /// Stops the countdown and returns to a full, idle work phase.
    pub fn reset(&mut self) {
        self.scheduler.cancel();
        self.state.run_state = RunState::Idle;
        self.state.enter_phase(TimerPhase::Work);
        self.emit(TimerEvent::Reset);
    }

    /// Advances the countdown by one second.
    ///
    /// Ticks delivered while not running are ignored.
    pub fn tick(&mut self) {
        if !self.state.is_running() {
            tracing::debug!("stale tick ignored");
            return;
        }

        if self.state.tick() {
            self.handle_phase_complete();
        }

        self.emit(TimerEvent::Tick {
            phase: self.state.phase,
            remaining_seconds: self.state.remaining_seconds,
        });
        self.scheduler.schedule_next_tick(TICK_INTERVAL);
    }

    /// Handles a countdown reaching zero.
    ///
    /// The next phase starts immediately; the engine stays running.
    fn handle_phase_complete(&mut self) {
        let finished = self.state.phase;
        if finished == TimerPhase::Work {
            self.state.sessions_completed += 1;
        }
        self.state.enter_phase(finished.next());

        let event = match finished {
            TimerPhase::Work => {
                tracing::info!(
                    sessions = self.state.sessions_completed,
                    "work phase completed"
                );
                TimerEvent::WorkCompleted {
                    sessions_completed: self.state.sessions_completed,
                    break_minutes: self.state.durations.break_minutes,
                }
            }
            TimerPhase::Break => {
                tracing::info!("break phase completed");
                TimerEvent::BreakCompleted {
                    work_minutes: self.state.durations.work_minutes,
                }
            }
        };
        self.emit(event);
    }

    /// Records the date of a successful settings write.
    pub fn mark_saved(&mut self, date: NaiveDate) {
        self.state.last_saved_date = Some(date);
    }

    /// Returns a reference to the current timer state.
    pub fn state(&self) -> &TimerState {
        &self.state
    }

    /// Returns a reference to the scheduler.
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Returns a mutable reference to the scheduler.
    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Returns a mutable reference to the timer state (for testing).
    #[cfg(test)]
    pub fn state_mut(&mut self) -> &mut TimerState {
        &mut self.state
    }

    fn emit(&self, event: TimerEvent) {
        if self.event_tx.send(event).is_err() {
            tracing::warn!("timer event receiver dropped");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
