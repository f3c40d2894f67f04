//! Settings persistence for the Pomodoro timer.
//!
//! Two independent JSON files live in one directory:
//!
//! - `pomodoro_settings.json`: durations and today's session count, rewritten
//!   after every completed work phase
//! - `pomodoro_visual_settings.json`: appearance, written on explicit save
//!
//! Loading never fails. A missing file means defaults; a damaged or partial
//! file is merged key-by-key over the defaults.

mod clock;
mod error;
mod merge;
mod timer;
mod visual;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::SettingsError;
pub use merge::merge_over_defaults;
pub use timer::SettingsSnapshot;
pub use visual::{
    clamp_opacity, ColorRole, CustomColors, Theme, VisualSettings, FONT_SIZE_RANGE,
    MAIN_TRANSPARENCY_RANGE,
};

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

/// Directory name under the user's config directory.
pub const APP_DIR_NAME: &str = "pomodoro-desk";

/// Timer settings file name.
pub const TIMER_SETTINGS_FILE: &str = "pomodoro_settings.json";

/// Visual settings file name.
pub const VISUAL_SETTINGS_FILE: &str = "pomodoro_visual_settings.json";

/// Reads and writes both settings files in one directory.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    dir: PathBuf,
}

impl SettingsStore {
    /// Creates a store rooted at `dir`. Nothing is touched until a save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Creates a store in the per-user configuration directory.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::NoConfigDir` if the platform has none.
    pub fn default_location() -> Result<Self, SettingsError> {
        let base = dirs::config_dir().ok_or(SettingsError::NoConfigDir)?;
        Ok(Self::new(base.join(APP_DIR_NAME)))
    }

    /// Returns the settings directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn timer_path(&self) -> PathBuf {
        self.dir.join(TIMER_SETTINGS_FILE)
    }

    pub fn visual_path(&self) -> PathBuf {
        self.dir.join(VISUAL_SETTINGS_FILE)
    }

    /// Loads the timer settings with the day-boundary policy applied.
    pub fn load_timer(&self, today: NaiveDate) -> SettingsSnapshot {
        let snapshot = match read_document(&self.timer_path()) {
            Some(document) => merge_over_defaults(SettingsSnapshot::default(), &document),
            None => SettingsSnapshot::default(),
        };
        snapshot.resolve_for(today)
    }

    /// Overwrites the timer settings file.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub fn save_timer(&self, snapshot: &SettingsSnapshot) -> Result<(), SettingsError> {
        write_document(&self.timer_path(), snapshot)
    }

    /// Loads the visual settings merged over the defaults.
    pub fn load_visual(&self) -> VisualSettings {
        match read_document(&self.visual_path()) {
            Some(document) => merge_over_defaults(VisualSettings::default(), &document).normalized(),
            None => VisualSettings::default(),
        }
    }

    /// Writes every visual setting.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub fn save_visual(&self, settings: &VisualSettings) -> Result<(), SettingsError> {
        write_document(&self.visual_path(), settings)?;
        tracing::info!("visual settings saved");
        Ok(())
    }
}

/// Reads a JSON document. Missing or unreadable files yield `None`.
fn read_document(path: &Path) -> Option<Value> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "settings file not found; using defaults");
            return None;
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "could not read settings file");
            return None;
        }
    };

    match serde_json::from_str(&text) {
        Ok(document) => Some(document),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "settings file is not valid JSON");
            None
        }
    }
}

/// Writes `value` to a temporary file and renames it into place.
fn write_document<T: Serialize>(path: &Path, value: &T) -> Result<(), SettingsError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| SettingsError::io(parent, e))?;
    }

    let json = serde_json::to_string_pretty(value)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).map_err(|e| SettingsError::io(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| SettingsError::io(path, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    use crate::types::TimerDurations;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 14).unwrap()
    }

    fn store() -> (TempDir, SettingsStore) {
        let dir = TempDir::new().unwrap();
        let store = SettingsStore::new(dir.path().join("nested"));
        (dir, store)
    }

    #[test]
    fn test_load_missing_files_gives_defaults() {
        let (_dir, store) = store();
        assert_eq!(store.load_timer(today()), SettingsSnapshot::default());
        assert_eq!(store.load_visual(), VisualSettings::default());
    }

    #[test]
    fn test_save_creates_directory() {
        let (_dir, store) = store();
        store.save_visual(&VisualSettings::default()).unwrap();
        assert!(store.visual_path().exists());
        assert!(!store.dir().join("pomodoro_visual_settings.json.tmp").exists());
    }

    #[test]
    fn test_timer_round_trip_same_day() {
        let (_dir, store) = store();
        let snapshot = SettingsSnapshot {
            work_minutes: 45,
            break_minutes: 15,
            sessions_completed: 4,
            last_saved_date: Some(today()),
        };
        store.save_timer(&snapshot).unwrap();
        assert_eq!(store.load_timer(today()), snapshot);
    }

    #[test]
    fn test_timer_file_from_yesterday() {
        let (_dir, store) = store();
        fs::create_dir_all(store.dir()).unwrap();
        fs::write(
            store.timer_path(),
            r#"{"work_time": 30, "break_time": 6, "sessions_completed": 9, "last_date": "2026-10-13"}"#,
        )
        .unwrap();

        let loaded = store.load_timer(today());
        assert_eq!(loaded.sessions_completed, 0);
        assert_eq!(loaded.work_minutes, 30);
        assert_eq!(loaded.break_minutes, 6);
    }

    #[test]
    fn test_timer_file_with_bad_date_resets_count() {
        let (_dir, store) = store();
        fs::create_dir_all(store.dir()).unwrap();
        fs::write(
            store.timer_path(),
            r#"{"sessions_completed": 3, "last_date": "yesterday"}"#,
        )
        .unwrap();

        assert_eq!(store.load_timer(today()).sessions_completed, 0);
    }

    #[test]
    fn test_invalid_json_gives_defaults() {
        let (_dir, store) = store();
        fs::create_dir_all(store.dir()).unwrap();
        fs::write(store.visual_path(), "{ not json").unwrap();
        fs::write(store.timer_path(), "").unwrap();

        assert_eq!(store.load_visual(), VisualSettings::default());
        assert_eq!(store.load_timer(today()), SettingsSnapshot::default());
    }

    #[test]
    fn test_visual_partial_file() {
        let (_dir, store) = store();
        fs::create_dir_all(store.dir()).unwrap();
        fs::write(store.visual_path(), r#"{"font_size": 18}"#).unwrap();

        let loaded = store.load_visual();
        assert_eq!(
            loaded,
            VisualSettings {
                font_size: 18,
                ..VisualSettings::default()
            }
        );
    }

    #[test]
    fn test_visual_large_font_size_is_kept() {
        let (_dir, store) = store();
        fs::create_dir_all(store.dir()).unwrap();
        fs::write(store.visual_path(), r#"{"font_size": 250}"#).unwrap();

        assert_eq!(store.load_visual().font_size, 250);
    }

    #[test]
    fn test_timer_long_durations_are_kept() {
        let (_dir, store) = store();
        fs::create_dir_all(store.dir()).unwrap();
        fs::write(
            store.timer_path(),
            format!(
                r#"{{"work_time": 150, "break_time": 75, "sessions_completed": 2, "last_date": "{}"}}"#,
                today()
            ),
        )
        .unwrap();

        let loaded = store.load_timer(today());
        assert_eq!(loaded.durations(), TimerDurations::new(150, 75));
        assert_eq!(loaded.sessions_completed, 2);
    }

    #[test]
    fn test_visual_partial_colors_and_out_of_range_transparency() {
        let (_dir, store) = store();
        fs::create_dir_all(store.dir()).unwrap();
        fs::write(
            store.visual_path(),
            r##"{"custom_colors": {"accent": "#112233"}, "transparency": 0.1, "theme": "light"}"##,
        )
        .unwrap();

        let loaded = store.load_visual();
        assert_eq!(loaded.custom_colors.accent, "#112233");
        assert_eq!(loaded.custom_colors.primary, "#1A1B26");
        assert_eq!(loaded.transparency, 0.5);
        assert_eq!(loaded.theme, Theme::Light);
    }

    #[test]
    fn test_visual_round_trip_writes_everything() {
        let (_dir, store) = store();
        let mut settings = VisualSettings::default();
        settings.alert_sound = false;
        settings.set_transparency(0.8);
        store.save_visual(&settings).unwrap();

        let text = fs::read_to_string(store.visual_path()).unwrap();
        assert!(text.contains("\"alert_sound\": false"));
        assert!(text.contains("\"transparency\": 0.8"));
        assert_eq!(store.load_visual(), settings);
    }
}
