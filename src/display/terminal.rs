//! The main window: the hosting terminal.
//!
//! Every frame is written to the terminal title (when attached to a TTY) so
//! the countdown stays visible without interrupting typed commands. A full
//! status line is printed only when the phase or run state changes.

use std::io::Write;

use crate::types::{RunState, TimerPhase};

use super::{DisplayFrame, DisplaySurface, SurfaceError};

/// Returns the label for a phase.
pub fn phase_label(phase: TimerPhase) -> &'static str {
    match phase {
        TimerPhase::Work => "Work",
        TimerPhase::Break => "Break",
    }
}

/// Formats the full status line of the main window.
pub fn status_line(frame: &DisplayFrame) -> String {
    let state = match frame.run_state {
        RunState::Running => String::new(),
        other => format!(" ({})", other.as_str()),
    };
    format!(
        "{} {}{}  |  {}  |  Sessions completed today: {}",
        phase_label(frame.phase),
        frame.time,
        state,
        frame.subject,
        frame.sessions_completed
    )
}

/// Primary surface writing to a terminal-like sink.
pub struct TerminalSurface<W: Write> {
    out: W,
    set_title: bool,
    last: Option<DisplayFrame>,
}

impl<W: Write> TerminalSurface<W> {
    /// Creates a surface. `set_title` enables the terminal title escape.
    pub fn new(out: W, set_title: bool) -> Self {
        Self {
            out,
            set_title,
            last: None,
        }
    }

    /// Returns the last rendered frame.
    pub fn last_frame(&self) -> Option<&DisplayFrame> {
        self.last.as_ref()
    }

    /// Consumes the surface, returning the sink.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn needs_status_line(&self, frame: &DisplayFrame) -> bool {
        match &self.last {
            None => true,
            Some(last) => {
                last.phase != frame.phase
                    || last.run_state != frame.run_state
                    || last.sessions_completed != frame.sessions_completed
                    || (!frame.is_running() && last.time != frame.time)
            }
        }
    }
}

impl<W: Write> DisplaySurface for TerminalSurface<W> {
    fn name(&self) -> &'static str {
        "terminal"
    }

    fn render(&mut self, frame: &DisplayFrame) -> Result<(), SurfaceError> {
        let io_err = |e: std::io::Error| SurfaceError::Render(e.to_string());

        if self.set_title {
            write!(
                self.out,
                "\x1b]2;{} {} - {}\x07",
                phase_label(frame.phase),
                frame.time,
                frame.subject
            )
            .map_err(io_err)?;
        }
        if self.needs_status_line(frame) {
            writeln!(self.out, "{}", status_line(frame)).map_err(io_err)?;
        }
        self.out.flush().map_err(io_err)?;

        self.last = Some(frame.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(time: &str, run_state: RunState) -> DisplayFrame {
        DisplayFrame {
            time: time.to_string(),
            subject: "Algebra".to_string(),
            phase: TimerPhase::Work,
            run_state,
            sessions_completed: 1,
        }
    }

    fn output(surface: TerminalSurface<Vec<u8>>) -> String {
        String::from_utf8(surface.into_inner()).unwrap()
    }

    #[test]
    fn test_status_line() {
        assert_eq!(
            status_line(&frame("24:59", RunState::Running)),
            "Work 24:59  |  Algebra  |  Sessions completed today: 1"
        );
        assert!(status_line(&frame("24:59", RunState::Paused)).contains("24:59 (paused)"));
        assert!(status_line(&frame("25:00", RunState::Idle)).contains("25:00 (idle)"));
    }

    #[test]
    fn test_first_frame_prints_status_line() {
        let mut surface = TerminalSurface::new(Vec::new(), false);
        surface.render(&frame("25:00", RunState::Idle)).unwrap();
        assert!(output(surface).contains("Work 25:00 (idle)"));
    }

    #[test]
    fn test_running_ticks_do_not_repeat_status_line() {
        let mut surface = TerminalSurface::new(Vec::new(), false);
        surface.render(&frame("25:00", RunState::Running)).unwrap();
        surface.render(&frame("24:59", RunState::Running)).unwrap();
        surface.render(&frame("24:58", RunState::Running)).unwrap();
        assert_eq!(surface.last_frame().unwrap().time, "24:58");
        assert_eq!(output(surface).lines().count(), 1);
    }

    #[test]
    fn test_pause_prints_status_line() {
        let mut surface = TerminalSurface::new(Vec::new(), false);
        surface.render(&frame("25:00", RunState::Running)).unwrap();
        surface.render(&frame("24:30", RunState::Paused)).unwrap();
        assert_eq!(output(surface).lines().count(), 2);
    }

    #[test]
    fn test_title_escape() {
        let mut surface = TerminalSurface::new(Vec::new(), true);
        surface.render(&frame("12:34", RunState::Running)).unwrap();
        assert!(output(surface).contains("\x1b]2;Work 12:34 - Algebra\x07"));
    }
}
