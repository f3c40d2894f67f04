//! Alert sound played when a work session ends.
//!
//! Playback never blocks the timer: `ThreadedAlert` hands each alert to a
//! short-lived thread that opens the output device, plays the sound to the
//! end and exits.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │   AlertPlayer    │ ← Session calls play_alert()
//! └────────┬─────────┘
//!          │ std::thread
//!          ▼
//! ┌──────────────────┐     ┌──────────────────┐
//! │ RodioSoundPlayer │────▶│  System Sounds   │
//! │                  │     ├──────────────────┤
//! │                  │────▶│  Generated tone  │
//! └──────────────────┘     │  (fallback)      │
//!                          └──────────────────┘
//! ```

mod error;
mod player;
mod source;

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

pub use error::SoundError;
pub use player::RodioSoundPlayer;
pub use source::{default_alert_sound, discover_system_sounds, SoundSource};

/// Plays the end-of-work alert.
///
/// Implementations must return immediately and must not surface failures.
pub trait AlertPlayer {
    fn play_alert(&self);
}

/// Plays the alert on a background thread. Failures are logged at debug.
#[derive(Debug, Clone)]
pub struct ThreadedAlert {
    source: SoundSource,
}

impl ThreadedAlert {
    /// Creates a player for the preferred system sound.
    #[must_use]
    pub fn new() -> Self {
        Self::with_source(default_alert_sound())
    }

    #[must_use]
    pub fn with_source(source: SoundSource) -> Self {
        tracing::debug!(sound = source.name(), "alert sound selected");
        Self { source }
    }

    /// Spawns the playback thread.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::ThreadError` if the thread cannot be spawned.
    pub fn spawn(&self) -> Result<(), SoundError> {
        let source = self.source.clone();
        std::thread::Builder::new()
            .name("alert-sound".to_string())
            .spawn(move || {
                let played = RodioSoundPlayer::new().and_then(|p| p.play_to_end(&source));
                if let Err(e) = played {
                    tracing::debug!(error = %e, "alert sound not played");
                }
            })
            .map(|_| ())
            .map_err(|e| SoundError::ThreadError(e.to_string()))
    }
}

impl Default for ThreadedAlert {
    fn default() -> Self {
        Self::new()
    }
}

impl AlertPlayer for ThreadedAlert {
    fn play_alert(&self) {
        if let Err(e) = self.spawn() {
            tracing::debug!(error = %e, "alert sound not played");
        }
    }
}

/// Player used when sound is turned off for the whole process.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentAlert;

impl AlertPlayer for SilentAlert {
    fn play_alert(&self) {
        tracing::trace!("alert sound suppressed");
    }
}

/// Mock alert player for testing.
///
/// Clones share the same counters, so a test can keep one handle and give
/// the other to the code under test.
#[derive(Debug, Default, Clone)]
pub struct MockAlertPlayer {
    play_calls: Arc<AtomicUsize>,
    should_fail: Arc<AtomicBool>,
}

impl MockAlertPlayer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates a broken audio device. Calls are still counted.
    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    #[must_use]
    pub fn play_count(&self) -> usize {
        self.play_calls.load(Ordering::SeqCst)
    }
}

impl AlertPlayer for MockAlertPlayer {
    fn play_alert(&self) {
        self.play_calls.fetch_add(1, Ordering::SeqCst);
        if self.should_fail.load(Ordering::SeqCst) {
            tracing::debug!("mock alert failed");
        }
    }
}
