//! Title text for the floating widget (e.g., "🍅 15:30 · Thesis").
//!
//! The text generation logic is platform-independent and fully testable.

use crate::types::TimerPhase;

use super::DisplayFrame;

/// Emoji for work session
const WORKING_EMOJI: &str = "🍅";

/// Emoji for break session
const BREAK_EMOJI: &str = "☕";

/// Emoji for paused/idle state
const STOPPED_EMOJI: &str = "⏸";

/// Returns the emoji for the frame's phase and run state.
pub fn phase_emoji(phase: TimerPhase, running: bool) -> &'static str {
    match (running, phase) {
        (false, _) => STOPPED_EMOJI,
        (true, TimerPhase::Work) => WORKING_EMOJI,
        (true, TimerPhase::Break) => BREAK_EMOJI,
    }
}

/// Generates the widget title.
///
/// Format: `"<emoji> MM:SS · <subject>"`.
pub fn floating_title(frame: &DisplayFrame) -> String {
    format!(
        "{} {} · {}",
        phase_emoji(frame.phase, frame.is_running()),
        frame.time,
        frame.subject
    )
}
