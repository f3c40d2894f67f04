//! Display synchronization for the Pomodoro timer.
//!
//! This module provides:
//! - `MM:SS` formatting of the countdown
//! - `DisplaySync`, which pushes the same frame to every attached surface
//! - The primary terminal surface and the optional floating widget
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  DisplayFrame  ┌───────────────────┐
//! │ DisplaySync  │───────────────▶│ primary (always)  │
//! │              │                ├───────────────────┤
//! │              │───────────────▶│ floating (Option) │──▶ FloatingWidget
//! └──────────────┘                └───────────────────┘
//! ```
//!
//! A floating surface that fails with [`SurfaceError::Detached`] (or any
//! other error) is dropped on the spot; the sync itself never fails.

mod error;
pub mod floating;
pub mod terminal;
pub mod title;

pub use error::SurfaceError;
pub use floating::{FloatingSurface, FloatingWidget, DEFAULT_FLOAT_OPACITY, FLOAT_OPACITY_RANGE};
pub use terminal::TerminalSurface;
pub use title::{floating_title, phase_emoji};

use std::sync::{Arc, Mutex};

use crate::types::{RunState, TimerPhase, TimerState};

/// Subject shown when the user has not typed one.
pub const DEFAULT_SUBJECT: &str = "Studying...";

/// Formats remaining seconds as zero-padded `MM:SS`.
pub fn format_time(remaining_seconds: u32) -> String {
    let minutes = remaining_seconds / 60;
    let seconds = remaining_seconds % 60;
    format!("{:02}:{:02}", minutes, seconds)
}

// ============================================================================
// DisplayFrame
// ============================================================================

/// Everything a surface needs to draw one update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayFrame {
    /// Remaining time as `MM:SS`
    pub time: String,
    /// Subject label, never empty
    pub subject: String,
    /// Current phase
    pub phase: TimerPhase,
    /// Whether the countdown is running, paused or idle
    pub run_state: RunState,
    /// Sessions completed today
    pub sessions_completed: u32,
}

impl DisplayFrame {
    /// Builds a frame from the timer state and the current subject text.
    pub fn from_state(state: &TimerState, subject: &str) -> Self {
        let subject = subject.trim();
        Self {
            time: format_time(state.remaining_seconds),
            subject: if subject.is_empty() {
                DEFAULT_SUBJECT.to_string()
            } else {
                subject.to_string()
            },
            phase: state.phase,
            run_state: state.run_state,
            sessions_completed: state.sessions_completed,
        }
    }

    /// Returns true if the countdown is decrementing.
    pub fn is_running(&self) -> bool {
        self.run_state == RunState::Running
    }
}

// ============================================================================
// DisplaySurface
// ============================================================================

/// Something that shows the timer.
pub trait DisplaySurface {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Draws `frame`.
    ///
    /// # Errors
    ///
    /// Returns `SurfaceError::Detached` once the surface has been destroyed.
    fn render(&mut self, frame: &DisplayFrame) -> Result<(), SurfaceError>;
}

// ============================================================================
// DisplaySync
// ============================================================================

/// Result of one sync pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncOutcome {
    /// The floating surface failed during this pass and was deregistered
    pub floating_detached: bool,
}

/// Distributes frames to the primary surface and the optional floating one.
pub struct DisplaySync {
    primary: Box<dyn DisplaySurface>,
    floating: Option<Box<dyn DisplaySurface>>,
}

impl DisplaySync {
    /// Creates a sync with only the primary surface attached.
    pub fn new(primary: Box<dyn DisplaySurface>) -> Self {
        Self {
            primary,
            floating: None,
        }
    }

    /// Attaches the floating surface, replacing any previous one.
    pub fn attach_floating(&mut self, surface: Box<dyn DisplaySurface>) {
        tracing::debug!(surface = surface.name(), "floating surface attached");
        self.floating = Some(surface);
    }

    /// Detaches the floating surface. Returns false if none was attached.
    pub fn detach_floating(&mut self) -> bool {
        let was_attached = self.floating.take().is_some();
        if was_attached {
            tracing::debug!("floating surface detached");
        }
        was_attached
    }

    /// Returns true if a floating surface is attached.
    pub fn is_floating_attached(&self) -> bool {
        self.floating.is_some()
    }

    /// Renders the current state on every attached surface.
    pub fn sync(&mut self, state: &TimerState, subject: &str) -> SyncOutcome {
        let frame = DisplayFrame::from_state(state, subject);

        if let Err(e) = self.primary.render(&frame) {
            tracing::warn!(surface = self.primary.name(), error = %e, "primary surface render failed");
        }

        let mut outcome = SyncOutcome::default();
        if let Some(floating) = self.floating.as_mut() {
            if let Err(e) = floating.render(&frame) {
                tracing::debug!(
                    surface = floating.name(),
                    error = %e,
                    "floating surface unavailable; deregistering"
                );
                self.floating = None;
                outcome.floating_detached = true;
            }
        }
        outcome
    }
}

// ============================================================================
// MockSurface
// ============================================================================

/// Recording surface for testing.
///
/// Clones share their recorded frames, so one clone can be handed to
/// `DisplaySync` while the test keeps the other.
#[derive(Debug, Clone, Default)]
pub struct MockSurface {
    frames: Arc<Mutex<Vec<DisplayFrame>>>,
    destroyed: Arc<std::sync::atomic::AtomicBool>,
}

impl MockSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following render fail with `Detached`.
    pub fn destroy(&self) {
        self.destroyed
            .store(true, std::sync::atomic::Ordering::SeqCst);
    }

    #[must_use]
    pub fn frames(&self) -> Vec<DisplayFrame> {
        self.frames.lock().unwrap().clone()
    }

    #[must_use]
    pub fn render_count(&self) -> usize {
        self.frames.lock().unwrap().len()
    }

    #[must_use]
    pub fn last_frame(&self) -> Option<DisplayFrame> {
        self.frames.lock().unwrap().last().cloned()
    }
}

impl DisplaySurface for MockSurface {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn render(&mut self, frame: &DisplayFrame) -> Result<(), SurfaceError> {
        if self.destroyed.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(SurfaceError::Detached);
        }
        self.frames.lock().unwrap().push(frame.clone());
        Ok(())
    }
}
