//! User-facing notices.
//!
//! A notice is the modal message box of a desktop app: phase changes,
//! rejected input and the result of saving the appearance settings.
//! `TerminalNotifier` prints them; `MockNotifier` records them for tests.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

// ============================================================================
// Notice
// ============================================================================

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Work phase finished; the break has started.
    BreakStarted {
        /// Sessions completed today
        sessions_completed: u32,
        /// Length of the break
        break_minutes: u32,
    },
    /// Break finished; back to work.
    BreakOver,
    /// Input rejected; nothing was changed.
    InvalidInput(String),
    /// Appearance settings written.
    VisualSaved,
    /// Appearance settings could not be written.
    VisualSaveFailed(String),
}

impl Notice {
    /// Returns the severity.
    pub fn level(&self) -> NoticeLevel {
        match self {
            Self::InvalidInput(_) | Self::VisualSaveFailed(_) => NoticeLevel::Error,
            _ => NoticeLevel::Info,
        }
    }

    /// Returns the title line.
    pub fn title(&self) -> &'static str {
        match self {
            Self::BreakStarted { .. } => "Break time!",
            Self::BreakOver => "Break over!",
            Self::InvalidInput(_) => "Error",
            Self::VisualSaved => "Saved",
            Self::VisualSaveFailed(_) => "Error",
        }
    }

    /// Returns the body text.
    pub fn message(&self) -> String {
        match self {
            Self::BreakStarted {
                sessions_completed,
                break_minutes,
            } => format!(
                "Session {} done. Take a {} minute break.",
                sessions_completed, break_minutes
            ),
            Self::BreakOver => "Time to get back to studying.".to_string(),
            Self::InvalidInput(reason) => reason.clone(),
            Self::VisualSaved => "Settings saved.".to_string(),
            Self::VisualSaveFailed(reason) => format!("Could not save settings: {}", reason),
        }
    }
}

// ============================================================================
// Notifier
// ============================================================================

/// Shows notices to the user.
pub trait Notifier {
    fn notify(&mut self, notice: &Notice);
}

/// Prints notices to the terminal. Errors go to the error stream.
pub struct TerminalNotifier<O: Write, E: Write> {
    out: O,
    err: E,
}

impl TerminalNotifier<io::Stdout, io::Stderr> {
    /// Prints to the process's stdout and stderr.
    pub fn stdio() -> Self {
        Self::new(io::stdout(), io::stderr())
    }
}

impl<O: Write, E: Write> TerminalNotifier<O, E> {
    pub fn new(out: O, err: E) -> Self {
        Self { out, err }
    }

    /// Consumes the notifier, returning both streams.
    pub fn into_inner(self) -> (O, E) {
        (self.out, self.err)
    }
}

impl<O: Write, E: Write> Notifier for TerminalNotifier<O, E> {
    fn notify(&mut self, notice: &Notice) {
        let written = match notice.level() {
            NoticeLevel::Info => writeln!(self.out, "* {}: {}", notice.title(), notice.message()),
            NoticeLevel::Error => writeln!(self.err, "{}: {}", notice.title(), notice.message()),
        };
        if let Err(e) = written {
            tracing::debug!(error = %e, "notice not shown");
        }
    }
}

/// Recording notifier for testing.
///
/// Clones share the recorded notices.
#[derive(Debug, Clone, Default)]
pub struct MockNotifier {
    notices: Arc<Mutex<Vec<Notice>>>,
}

impl MockNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.notices.lock().unwrap().len()
    }

    pub fn clear(&self) {
        self.notices.lock().unwrap().clear();
    }
}

impl Notifier for MockNotifier {
    fn notify(&mut self, notice: &Notice) {
        self.notices.lock().unwrap().push(notice.clone());
    }
}
