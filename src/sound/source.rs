//! Sound source management.
//!
//! The alert prefers a system sound from the platform's sound directories
//! and falls back to a generated tone.

use std::path::PathBuf;
use std::time::Duration;

/// Frequency of the fallback beep.
const TONE_FREQUENCY_HZ: f32 = 880.0;

/// Length of the fallback beep.
const TONE_DURATION: Duration = Duration::from_millis(400);

/// Represents the source of a sound to be played.
#[derive(Debug, Clone, PartialEq)]
pub enum SoundSource {
    /// A sound file shipped with the operating system.
    System {
        /// The name of the sound (e.g., "Glass").
        name: String,
        /// The full path to the sound file.
        path: PathBuf,
    },
    /// A generated sine tone.
    Tone {
        /// Frequency in hertz
        frequency_hz: f32,
        /// Length of the tone
        duration: Duration,
    },
}

impl SoundSource {
    /// Creates a new system sound source.
    #[must_use]
    pub fn system(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::System {
            name: name.into(),
            path: path.into(),
        }
    }

    /// The built-in alert beep.
    #[must_use]
    pub fn tone() -> Self {
        Self::Tone {
            frequency_hz: TONE_FREQUENCY_HZ,
            duration: TONE_DURATION,
        }
    }

    /// Returns the name of the sound source.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::System { name, .. } => name,
            Self::Tone { .. } => "tone",
        }
    }

    /// Returns true if this is a system sound.
    #[must_use]
    pub fn is_system(&self) -> bool {
        matches!(self, Self::System { .. })
    }
}

/// Directories to search for system sounds, in order of priority.
#[cfg(target_os = "macos")]
const SYSTEM_SOUND_DIRS: &[&str] = &["/System/Library/Sounds", "/Library/Sounds"];

#[cfg(target_os = "windows")]
const SYSTEM_SOUND_DIRS: &[&str] = &["C:\\Windows\\Media"];

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const SYSTEM_SOUND_DIRS: &[&str] = &[
    "/usr/share/sounds/freedesktop/stereo",
    "/usr/share/sounds",
];

/// Supported audio file extensions.
const SUPPORTED_EXTENSIONS: &[&str] = &["wav", "ogg", "oga", "mp3", "flac"];

/// Default sound names to try, in order of preference.
const DEFAULT_SOUND_NAMES: &[&str] = &[
    "Glass",
    "Ping",
    "Windows Exclamation",
    "complete",
    "bell",
];

/// Discovers available system sounds.
///
/// Returns an empty vector if no sounds are found.
#[must_use]
pub fn discover_system_sounds() -> Vec<SoundSource> {
    let mut sounds = Vec::new();

    for dir in SYSTEM_SOUND_DIRS {
        let Ok(entries) = std::fs::read_dir(dir) else {
            continue;
        };
        for entry in entries.flatten() {
            let file_path = entry.path();
            let supported = file_path
                .extension()
                .map(|ext| ext.to_string_lossy().to_lowercase())
                .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()));
            if !supported {
                continue;
            }
            if let Some(stem) = file_path.file_stem() {
                sounds.push(SoundSource::System {
                    name: stem.to_string_lossy().into_owned(),
                    path: file_path,
                });
            }
        }
    }

    // Sort by name for consistent ordering
    sounds.sort_by(|a, b| a.name().cmp(b.name()));
    sounds
}

/// Picks the alert sound: a preferred system sound, else the tone.
#[must_use]
pub fn default_alert_sound() -> SoundSource {
    let system_sounds = discover_system_sounds();

    DEFAULT_SOUND_NAMES
        .iter()
        .find_map(|preferred| {
            system_sounds
                .iter()
                .find(|s| s.name().eq_ignore_ascii_case(preferred))
                .cloned()
        })
        .unwrap_or_else(SoundSource::tone)
}
