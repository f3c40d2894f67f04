//! Persisted timer settings.
//!
//! Rewritten automatically after every completed work phase; merge-loaded
//! at startup.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::{
    TimerDurations, TimerState, DEFAULT_BREAK_MINUTES, DEFAULT_WORK_MINUTES, PHASE_MINUTES_RANGE,
};

/// The persisted subset of the timer state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsSnapshot {
    /// Work duration in minutes
    #[serde(rename = "work_time")]
    pub work_minutes: u32,
    /// Break duration in minutes
    #[serde(rename = "break_time")]
    pub break_minutes: u32,
    /// Work phases completed on `last_saved_date`
    pub sessions_completed: u32,
    /// Date of the write, `YYYY-MM-DD`
    #[serde(rename = "last_date")]
    pub last_saved_date: Option<NaiveDate>,
}

impl Default for SettingsSnapshot {
    fn default() -> Self {
        Self {
            work_minutes: DEFAULT_WORK_MINUTES,
            break_minutes: DEFAULT_BREAK_MINUTES,
            sessions_completed: 0,
            last_saved_date: None,
        }
    }
}

impl SettingsSnapshot {
    /// Captures the persisted subset of `state`, dated `today`.
    pub fn capture(state: &TimerState, today: NaiveDate) -> Self {
        Self {
            work_minutes: state.durations.work_minutes,
            break_minutes: state.durations.break_minutes,
            sessions_completed: state.sessions_completed,
            last_saved_date: Some(today),
        }
    }

    /// Applies the load-time policies.
    ///
    /// Stored durations are kept whatever the date; a zero duration falls
    /// back to its default. The session counter survives only if it was
    /// written today.
    pub fn resolve_for(mut self, today: NaiveDate) -> Self {
        if !PHASE_MINUTES_RANGE.contains(&self.work_minutes) {
            tracing::warn!(value = self.work_minutes, "stored work_time is not usable; using default");
            self.work_minutes = DEFAULT_WORK_MINUTES;
        }
        if !PHASE_MINUTES_RANGE.contains(&self.break_minutes) {
            tracing::warn!(value = self.break_minutes, "stored break_time is not usable; using default");
            self.break_minutes = DEFAULT_BREAK_MINUTES;
        }
        if self.last_saved_date != Some(today) {
            if self.sessions_completed > 0 {
                tracing::info!(
                    stored = self.sessions_completed,
                    "new day; session counter reset"
                );
            }
            self.sessions_completed = 0;
        }
        self
    }

    /// Returns the stored durations.
    pub fn durations(&self) -> TimerDurations {
        TimerDurations::new(self.work_minutes, self.break_minutes)
    }

    /// Builds the initial timer state for this session.
    pub fn into_state(self) -> TimerState {
        TimerState::new(self.durations()).with_sessions(self.sessions_completed, self.last_saved_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_serialize_uses_file_keys() {
        let snapshot = SettingsSnapshot {
            work_minutes: 30,
            break_minutes: 10,
            sessions_completed: 3,
            last_saved_date: Some(date(2026, 10, 14)),
        };
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("\"work_time\":30"));
        assert!(json.contains("\"break_time\":10"));
        assert!(json.contains("\"sessions_completed\":3"));
        assert!(json.contains("\"last_date\":\"2026-10-14\""));
    }

    #[test]
    fn test_resolve_same_day_keeps_count() {
        let today = date(2026, 10, 14);
        let snapshot = SettingsSnapshot {
            sessions_completed: 7,
            last_saved_date: Some(today),
            ..SettingsSnapshot::default()
        };
        assert_eq!(snapshot.resolve_for(today).sessions_completed, 7);
    }

    #[test]
    fn test_resolve_other_day_resets_count_keeps_durations() {
        let snapshot = SettingsSnapshot {
            work_minutes: 50,
            break_minutes: 10,
            sessions_completed: 7,
            last_saved_date: Some(date(2026, 10, 13)),
        };
        let resolved = snapshot.resolve_for(date(2026, 10, 14));
        assert_eq!(resolved.sessions_completed, 0);
        assert_eq!(resolved.work_minutes, 50);
        assert_eq!(resolved.break_minutes, 10);
    }

    #[test]
    fn test_resolve_missing_date_resets_count() {
        let snapshot = SettingsSnapshot {
            sessions_completed: 2,
            ..SettingsSnapshot::default()
        };
        assert_eq!(snapshot.resolve_for(date(2026, 10, 14)).sessions_completed, 0);
    }

    #[test]
    fn test_resolve_zero_duration_uses_default() {
        let snapshot = SettingsSnapshot {
            work_minutes: 0,
            break_minutes: 0,
            ..SettingsSnapshot::default()
        };
        let resolved = snapshot.resolve_for(date(2026, 10, 14));
        assert_eq!(resolved.work_minutes, 25);
        assert_eq!(resolved.break_minutes, 5);
    }

    #[test]
    fn test_resolve_keeps_long_durations() {
        let today = date(2026, 10, 14);
        let snapshot = SettingsSnapshot {
            work_minutes: 150,
            break_minutes: 500,
            sessions_completed: 2,
            last_saved_date: Some(today),
        };
        let resolved = snapshot.resolve_for(today);
        assert_eq!(resolved.durations(), TimerDurations::new(150, 500));
        assert_eq!(resolved.sessions_completed, 2);
    }

    #[test]
    fn test_capture_and_into_state() {
        let today = date(2026, 10, 14);
        let mut state = TimerState::new(TimerDurations::new(40, 8));
        state.sessions_completed = 2;

        let snapshot = SettingsSnapshot::capture(&state, today);
        assert_eq!(snapshot.last_saved_date, Some(today));

        let restored = snapshot.into_state();
        assert_eq!(restored.durations, TimerDurations::new(40, 8));
        assert_eq!(restored.sessions_completed, 2);
        assert_eq!(restored.remaining_seconds, 2400);
    }
}
