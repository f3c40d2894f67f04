//! pomodoro-desk library
//!
//! This library provides the core of the pomodoro-desk timer.
//! It includes:
//! - Timer engine with work/break phases and auto-continue
//! - Settings persistence with day-boundary session reset
//! - Display synchronization across the main window and a floating widget
//! - Session controller tying the engine to its side effects
//! - Alert sound playback and user notices
//! - CLI command parsing and the interactive event loop

pub mod cli;
pub mod display;
pub mod engine;
pub mod notice;
pub mod session;
pub mod settings;
pub mod sound;
pub mod types;

// Re-export commonly used types for convenience
pub use types::{RunState, TimerDurations, TimerPhase, TimerState, ValidationError};

pub use engine::{DeadlineScheduler, ManualScheduler, TickScheduler, TimerEngine, TimerEvent};

pub use settings::{
    Clock, FixedClock, SettingsError, SettingsSnapshot, SettingsStore, SystemClock,
    VisualSettings,
};

pub use display::{
    format_time, DisplayFrame, DisplaySurface, DisplaySync, FloatingSurface, FloatingWidget,
    MockSurface, SurfaceError, TerminalSurface,
};

pub use notice::{MockNotifier, Notice, Notifier, TerminalNotifier};

pub use session::{Session, SessionParts};

pub use sound::{AlertPlayer, MockAlertPlayer, SilentAlert, SoundError, ThreadedAlert};
