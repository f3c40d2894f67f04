//! Core data types for the Pomodoro timer.
//!
//! This module defines the data structures used for:
//! - Timer state management (phase, run state, countdown)
//! - Duration configuration with validation of user input

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Constants
// ============================================================================

/// Seconds per configured minute.
pub const SECONDS_PER_MINUTE: u32 = 60;

/// Default work duration in minutes.
pub const DEFAULT_WORK_MINUTES: u32 = 25;

/// Default break duration in minutes.
pub const DEFAULT_BREAK_MINUTES: u32 = 5;

/// Longest phase, in minutes, whose length in seconds fits a `u32`.
pub const MAX_PHASE_MINUTES: u32 = u32::MAX / SECONDS_PER_MINUTE;

/// Accepted phase durations in minutes: any positive whole number.
pub const PHASE_MINUTES_RANGE: std::ops::RangeInclusive<u32> = 1..=MAX_PHASE_MINUTES;

// ============================================================================
// ValidationError
// ============================================================================

/// Rejected user input. The value being edited keeps its previous state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The field does not contain a whole number.
    #[error("{field} must be a whole number, got '{input}'")]
    NotANumber {
        /// Human-readable field name
        field: &'static str,
        /// Raw user input
        input: String,
    },

    /// The number is outside the accepted range.
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        /// Human-readable field name
        field: &'static str,
        /// Parsed value
        value: i64,
        /// Smallest accepted value
        min: u32,
        /// Largest accepted value
        max: u32,
    },

    /// Not a `#RRGGBB` color.
    #[error("'{0}' is not a hex color like #7AA2F7")]
    InvalidColor(String),

    /// Unknown color role name.
    #[error("unknown color role '{0}' (expected primary, secondary, accent, text or warning)")]
    UnknownColorRole(String),

    /// Unknown appearance theme.
    #[error("unknown theme '{0}' (expected dark or light)")]
    UnknownTheme(String),

    /// Font family left empty.
    #[error("font family must not be empty")]
    EmptyFontFamily,
}

/// Parses a whole number typed by the user and checks it against `range`.
pub fn parse_bounded(
    field: &'static str,
    input: &str,
    range: std::ops::RangeInclusive<u32>,
) -> Result<u32, ValidationError> {
    let trimmed = input.trim();
    let value: i64 = trimmed.parse().map_err(|_| ValidationError::NotANumber {
        field,
        input: trimmed.to_string(),
    })?;

    let (min, max) = (*range.start(), *range.end());
    if value < i64::from(min) || value > i64::from(max) {
        return Err(ValidationError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(value as u32)
}

// ============================================================================
// TimerPhase
// ============================================================================

/// The current interval type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerPhase {
    /// Focused work interval
    #[default]
    Work,
    /// Break interval following a completed work interval
    Break,
}

impl TimerPhase {
    /// Returns the string representation of the phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerPhase::Work => "work",
            TimerPhase::Break => "break",
        }
    }

    /// Returns the phase that follows this one.
    pub fn next(&self) -> Self {
        match self {
            TimerPhase::Work => TimerPhase::Break,
            TimerPhase::Break => TimerPhase::Work,
        }
    }
}

// ============================================================================
// RunState
// ============================================================================

/// Whether the countdown is decrementing.
///
/// `Idle` is the paused-equivalent state at the top of a phase: nothing has
/// been counted down yet, so a new start may apply freshly typed durations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    /// Not started since launch or the last reset
    #[default]
    Idle,
    /// Counting down
    Running,
    /// Stopped mid-countdown, resumable
    Paused,
}

impl RunState {
    /// Returns the string representation of the run state.
    pub fn as_str(&self) -> &'static str {
        match self {
            RunState::Idle => "idle",
            RunState::Running => "running",
            RunState::Paused => "paused",
        }
    }
}

// ============================================================================
// TimerDurations
// ============================================================================

/// User-configured phase lengths in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerDurations {
    /// Work duration in minutes
    pub work_minutes: u32,
    /// Break duration in minutes
    pub break_minutes: u32,
}

impl Default for TimerDurations {
    fn default() -> Self {
        Self {
            work_minutes: DEFAULT_WORK_MINUTES,
            break_minutes: DEFAULT_BREAK_MINUTES,
        }
    }
}

impl TimerDurations {
    /// Creates durations without validation.
    pub fn new(work_minutes: u32, break_minutes: u32) -> Self {
        Self {
            work_minutes,
            break_minutes,
        }
    }

    /// Parses the two duration fields as typed by the user.
    pub fn parse(work_input: &str, break_input: &str) -> Result<Self, ValidationError> {
        let work_minutes = parse_bounded("work duration", work_input, PHASE_MINUTES_RANGE)?;
        let break_minutes = parse_bounded("break duration", break_input, PHASE_MINUTES_RANGE)?;
        Ok(Self {
            work_minutes,
            break_minutes,
        })
    }

    /// Validates the durations.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_range("work duration", self.work_minutes, PHASE_MINUTES_RANGE)?;
        check_range("break duration", self.break_minutes, PHASE_MINUTES_RANGE)
    }

    /// Length of `phase` in seconds.
    pub fn seconds_for(&self, phase: TimerPhase) -> u32 {
        let minutes = match phase {
            TimerPhase::Work => self.work_minutes,
            TimerPhase::Break => self.break_minutes,
        };
        minutes.saturating_mul(SECONDS_PER_MINUTE)
    }
}

fn check_range(
    field: &'static str,
    value: u32,
    range: std::ops::RangeInclusive<u32>,
) -> Result<(), ValidationError> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            field,
            value: i64::from(value),
            min: *range.start(),
            max: *range.end(),
        })
    }
}

// ============================================================================
// TimerState
// ============================================================================

/// The countdown state of one application session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    /// Current phase
    pub phase: TimerPhase,
    /// Whether the countdown is running, paused or idle
    pub run_state: RunState,
    /// Remaining seconds in the current phase
    pub remaining_seconds: u32,
    /// Configured durations
    pub durations: TimerDurations,
    /// Work phases completed today
    pub sessions_completed: u32,
    /// Date of the last settings write
    pub last_saved_date: Option<NaiveDate>,
}

impl TimerState {
    /// Creates an idle work-phase state with a full countdown.
    pub fn new(durations: TimerDurations) -> Self {
        Self {
            phase: TimerPhase::Work,
            run_state: RunState::Idle,
            remaining_seconds: durations.seconds_for(TimerPhase::Work),
            durations,
            sessions_completed: 0,
            last_saved_date: None,
        }
    }

    /// Sets the restored session counter.
    pub fn with_sessions(mut self, sessions_completed: u32, last_saved_date: Option<NaiveDate>) -> Self {
        self.sessions_completed = sessions_completed;
        self.last_saved_date = last_saved_date;
        self
    }

    /// Enters `phase` with a full countdown.
    pub fn enter_phase(&mut self, phase: TimerPhase) {
        self.phase = phase;
        self.remaining_seconds = self.durations.seconds_for(phase);
    }

    /// Decrements the countdown by one second.
    ///
    /// Returns true if the countdown has reached 0.
    pub fn tick(&mut self) -> bool {
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        self.remaining_seconds == 0
    }

    /// Returns true if the countdown is decrementing.
    pub fn is_running(&self) -> bool {
        self.run_state == RunState::Running
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod duration_parse_tests {
        use super::*;

        #[test]
        fn test_parse_valid() {
            let d = TimerDurations::parse("30", " 10 ").unwrap();
            assert_eq!(d, TimerDurations::new(30, 10));
        }

        #[test]
        fn test_parse_non_numeric() {
            let err = TimerDurations::parse("abc", "5").unwrap_err();
            assert!(matches!(err, ValidationError::NotANumber { .. }));
            assert!(err.to_string().contains("work duration"));
            assert!(err.to_string().contains("abc"));
        }

        #[test]
        fn test_parse_empty() {
            let err = TimerDurations::parse("25", "").unwrap_err();
            assert!(matches!(err, ValidationError::NotANumber { .. }));
            assert!(err.to_string().contains("break duration"));
        }

        #[test]
        fn test_parse_fraction_is_rejected() {
            assert!(TimerDurations::parse("2.5", "5").is_err());
        }

        #[test]
        fn test_parse_zero_and_negative() {
            assert_eq!(
                TimerDurations::parse("0", "5").unwrap_err(),
                ValidationError::OutOfRange {
                    field: "work duration",
                    value: 0,
                    min: 1,
                    max: MAX_PHASE_MINUTES
                }
            );
            assert!(matches!(
                TimerDurations::parse("25", "-3"),
                Err(ValidationError::OutOfRange { value: -3, .. })
            ));
        }

        #[test]
        fn test_parse_long_durations() {
            assert_eq!(
                TimerDurations::parse("180", "90").unwrap(),
                TimerDurations::new(180, 90)
            );
            assert_eq!(
                TimerDurations::parse("1440", "600").unwrap(),
                TimerDurations::new(1440, 600)
            );
        }

        #[test]
        fn test_parse_rejects_overflowing_minutes() {
            let too_long = (u64::from(MAX_PHASE_MINUTES) + 1).to_string();
            assert!(matches!(
                TimerDurations::parse(&too_long, "5"),
                Err(ValidationError::OutOfRange { .. })
            ));
            assert!(TimerDurations::parse(&MAX_PHASE_MINUTES.to_string(), "5").is_ok());
        }

        #[test]
        fn test_seconds_for_longest_phase_fits() {
            let d = TimerDurations::new(MAX_PHASE_MINUTES, 1);
            assert_eq!(d.seconds_for(TimerPhase::Work), MAX_PHASE_MINUTES * 60);
            assert_eq!(TimerDurations::new(u32::MAX, 1).seconds_for(TimerPhase::Work), u32::MAX);
        }

        #[test]
        fn test_validate() {
            assert!(TimerDurations::default().validate().is_ok());
            assert!(TimerDurations::new(0, 5).validate().is_err());
            assert!(TimerDurations::new(25, 0).validate().is_err());
            assert!(TimerDurations::new(300, 120).validate().is_ok());
        }
    }

    mod timer_state_tests {
        use super::*;

        #[test]
        fn test_new_state() {
            let state = TimerState::new(TimerDurations::default());
            assert_eq!(state.phase, TimerPhase::Work);
            assert_eq!(state.run_state, RunState::Idle);
            assert_eq!(state.remaining_seconds, 1500);
            assert_eq!(state.sessions_completed, 0);
            assert!(!state.is_running());
        }

        #[test]
        fn test_enter_phase() {
            let mut state = TimerState::new(TimerDurations::new(30, 7));
            state.enter_phase(TimerPhase::Break);
            assert_eq!(state.remaining_seconds, 7 * 60);
            state.enter_phase(TimerPhase::Work);
            assert_eq!(state.remaining_seconds, 30 * 60);
        }

        #[test]
        fn test_tick_saturates_at_zero() {
            let mut state = TimerState::new(TimerDurations::default());
            state.remaining_seconds = 1;
            assert!(state.tick());
            assert!(state.tick());
            assert_eq!(state.remaining_seconds, 0);
        }

        #[test]
        fn test_phase_next() {
            assert_eq!(TimerPhase::Work.next(), TimerPhase::Break);
            assert_eq!(TimerPhase::Break.next(), TimerPhase::Work);
        }

        #[test]
        fn test_serialize_phase() {
            let json = serde_json::to_string(&TimerPhase::Break).unwrap();
            assert_eq!(json, "\"break\"");
        }
    }
}
