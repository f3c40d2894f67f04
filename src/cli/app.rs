//! The interactive shell hosting a session.
//!
//! One `current_thread` task serializes everything: the tick deadline,
//! typed commands and Ctrl-C are raced in a `select!` loop, and the
//! floating widget drains its frames after every iteration.

use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::Instant;

use crate::display::{terminal::status_line, DisplaySync, FloatingWidget, TerminalSurface};
use crate::engine::{DeadlineScheduler, TickScheduler};
use crate::notice::TerminalNotifier;
use crate::session::{Session, SessionParts};
use crate::settings::{SettingsStore, SystemClock};
use crate::sound::{AlertPlayer, SilentAlert, ThreadedAlert};

use super::commands::{CommandLine, SessionCommand};

/// Options taken from the process arguments.
#[derive(Debug, Clone, Default)]
pub struct AppOptions {
    /// Settings directory; the per-user config directory when `None`
    pub config_dir: Option<PathBuf>,
    /// Suppress the alert sound for this run
    pub no_sound: bool,
}

/// What the loop does after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Runs the timer until `quit`, end of input or Ctrl-C.
///
/// # Errors
///
/// Returns an error if no settings directory can be determined or stdin
/// cannot be read.
pub async fn run(options: AppOptions) -> Result<()> {
    let store = match options.config_dir {
        Some(dir) => SettingsStore::new(dir),
        None => SettingsStore::default_location().context("cannot locate the settings directory")?,
    };
    tracing::debug!(dir = %store.dir().display(), "settings directory");

    let alert: Box<dyn AlertPlayer> = if options.no_sound {
        Box::new(SilentAlert)
    } else {
        Box::new(ThreadedAlert::new())
    };

    let stdout = io::stdout();
    let set_title = stdout.is_terminal();
    println!("pomodoro-desk: type `help` for commands, `quit` to leave");

    let mut session = Session::open(SessionParts {
        store,
        clock: Box::new(SystemClock),
        scheduler: DeadlineScheduler::new(),
        display: DisplaySync::new(Box::new(TerminalSurface::new(stdout, set_title))),
        alert,
        notifier: Box::new(TerminalNotifier::stdio()),
    });
    let mut floating: Option<FloatingWidget> = None;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        let deadline = session.scheduler().deadline();
        tokio::select! {
            _ = sleep_until(deadline) => {
                if session.scheduler_mut().fire() {
                    session.tick();
                }
            }
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read command")? else {
                    tracing::debug!("end of input");
                    break;
                };
                if handle_line(&mut session, &mut floating, &line) == Flow::Quit {
                    break;
                }
            }
            signal = &mut ctrl_c => {
                if let Err(e) = signal {
                    tracing::warn!(error = %e, "failed to listen for Ctrl-C");
                }
                tracing::debug!("interrupted");
                break;
            }
        }

        if let Some(widget) = floating.as_mut() {
            widget.process_pending_updates();
        }
    }

    println!("Sessions completed today: {}", session.state().sessions_completed);
    Ok(())
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

/// Parses and executes one typed line.
pub fn handle_line<S: TickScheduler>(
    session: &mut Session<S>,
    floating: &mut Option<FloatingWidget>,
    line: &str,
) -> Flow {
    match CommandLine::parse_line(line) {
        Ok(Some(command)) => dispatch(session, floating, command),
        Ok(None) => Flow::Continue,
        Err(e) => {
            // Help output and usage errors both come through here
            if let Err(io_err) = e.print() {
                tracing::debug!(error = %io_err, "failed to print usage");
            }
            Flow::Continue
        }
    }
}

/// Executes one session command.
///
/// Rejected input is reported by the session as a notice, so the results
/// of the validating setters are not inspected here.
pub fn dispatch<S: TickScheduler>(
    session: &mut Session<S>,
    floating: &mut Option<FloatingWidget>,
    command: SessionCommand,
) -> Flow {
    match command {
        SessionCommand::Start { work, break_time } => {
            let _ = session.start(work.as_deref(), break_time.as_deref());
        }
        SessionCommand::Pause => session.pause(),
        SessionCommand::Reset => session.reset(),
        SessionCommand::Work { minutes } => session.set_work_input(&minutes),
        SessionCommand::Break { minutes } => session.set_break_input(&minutes),
        SessionCommand::Subject { words } => session.set_subject(&words.join(" ")),
        SessionCommand::Float => toggle_floating(session, floating),
        SessionCommand::FloatOpacity { value } => match floating.as_mut() {
            Some(widget) => println!("Floating timer opacity: {:.2}", widget.set_opacity(value)),
            None => println!("The floating timer is not open (use `float`)"),
        },
        SessionCommand::Status => print_status(session, floating.as_ref()),
        SessionCommand::Theme { name } => {
            let _ = session.set_theme(&name);
        }
        SessionCommand::Color { role, hex } => {
            let _ = session.set_color(&role, &hex);
        }
        SessionCommand::Font { family } => {
            let _ = session.set_font_family(&family.join(" "));
        }
        SessionCommand::FontSize { size } => {
            let _ = session.set_font_size(&size);
        }
        SessionCommand::Opacity { value } => {
            println!("Transparency: {:.2}", session.set_transparency(value));
        }
        SessionCommand::Sound { state } => session.set_alert_sound(state.is_on()),
        SessionCommand::Save => {
            session.save_visual();
        }
        SessionCommand::Quit => return Flow::Quit,
    }
    Flow::Continue
}

/// Closes an open floating timer, or opens a new one.
fn toggle_floating<S: TickScheduler>(
    session: &mut Session<S>,
    floating: &mut Option<FloatingWidget>,
) {
    if floating.take().is_some() {
        // Dropping the widget disconnects its surface
        session.detach_floating();
        println!("Floating timer closed");
        return;
    }

    let (mut widget, surface) = FloatingWidget::open();
    if let Err(e) = widget.initialize() {
        tracing::warn!(error = %e, "floating timer has no native window");
    }
    session.attach_floating(Box::new(surface));
    widget.process_pending_updates();
    if let Some(title) = widget.title() {
        println!("Floating timer opened: {}", title);
    }
    *floating = Some(widget);
}

fn print_status<S: TickScheduler>(session: &Session<S>, floating: Option<&FloatingWidget>) {
    let mut out = io::stdout().lock();
    if let Err(e) = write_status(&mut out, session, floating) {
        tracing::debug!(error = %e, "failed to print status");
    }
}

/// Writes the `status` report.
///
/// Durations are the ones in effect; typed values that differ are listed
/// as pending until the next `start` or `reset`.
fn write_status<S: TickScheduler, W: Write>(
    out: &mut W,
    session: &Session<S>,
    floating: Option<&FloatingWidget>,
) -> io::Result<()> {
    let durations = session.state().durations;
    let visual = session.visual();

    writeln!(out, "{}", status_line(&session.frame()))?;
    writeln!(
        out,
        "Durations: work {} min, break {} min",
        durations.work_minutes, durations.break_minutes
    )?;

    let work_input = session.work_input().trim();
    let break_input = session.break_input().trim();
    if work_input != durations.work_minutes.to_string()
        || break_input != durations.break_minutes.to_string()
    {
        writeln!(
            out,
            "Pending input: work '{}', break '{}' (applied on start or reset)",
            work_input, break_input
        )?;
    }

    match floating {
        Some(widget) => writeln!(out, "Floating timer: open (opacity {:.2})", widget.opacity())?,
        None => writeln!(out, "Floating timer: closed")?,
    }
    writeln!(
        out,
        "Appearance: {} theme, {} {}, transparency {:.2}, alert sound {}",
        visual.theme.as_str(),
        visual.font_family,
        visual.font_size,
        visual.transparency,
        if visual.alert_sound { "on" } else { "off" }
    )
}
