//! Session controller.
//!
//! A `Session` owns the timer engine and everything its events touch:
//! the settings store, the displays, the alert player and the notifier.
//! After each engine call it drains the engine's event channel and
//! performs the side effects in order:
//!
//! - work completed: save the timer settings, play the alert, show a notice
//! - break completed: show a notice
//! - every event: push a frame to all attached displays
//!
//! The session also holds the user's raw inputs (the two duration fields
//! and the subject), which are only parsed when the user starts or resets.

use tokio::sync::mpsc;

use crate::display::{DisplayFrame, DisplaySurface, DisplaySync};
use crate::engine::{TickScheduler, TimerEngine, TimerEvent};
use crate::notice::{Notice, Notifier};
use crate::settings::{Clock, ColorRole, SettingsSnapshot, SettingsStore, Theme, VisualSettings};
use crate::sound::AlertPlayer;
use crate::types::{TimerDurations, TimerState, ValidationError};

/// External collaborators of a session.
pub struct SessionParts<S: TickScheduler> {
    pub store: SettingsStore,
    pub clock: Box<dyn Clock>,
    pub scheduler: S,
    pub display: DisplaySync,
    pub alert: Box<dyn AlertPlayer>,
    pub notifier: Box<dyn Notifier>,
}

/// The running application, minus its presentation shell.
pub struct Session<S: TickScheduler> {
    engine: TimerEngine<S>,
    events: mpsc::UnboundedReceiver<TimerEvent>,
    store: SettingsStore,
    clock: Box<dyn Clock>,
    display: DisplaySync,
    alert: Box<dyn AlertPlayer>,
    notifier: Box<dyn Notifier>,
    visual: VisualSettings,
    work_input: String,
    break_input: String,
    subject: String,
}

impl<S: TickScheduler> Session<S> {
    /// Loads both settings files and shows the initial frame.
    pub fn open(parts: SessionParts<S>) -> Self {
        let SessionParts {
            store,
            clock,
            scheduler,
            display,
            alert,
            notifier,
        } = parts;

        let visual = store.load_visual();
        let snapshot = store.load_timer(clock.today());
        let work_input = snapshot.work_minutes.to_string();
        let break_input = snapshot.break_minutes.to_string();
        tracing::info!(
            work = snapshot.work_minutes,
            brk = snapshot.break_minutes,
            sessions = snapshot.sessions_completed,
            "session opened"
        );

        let (event_tx, events) = mpsc::unbounded_channel();
        let engine = TimerEngine::new(snapshot.into_state(), scheduler, event_tx);

        let mut session = Self {
            engine,
            events,
            store,
            clock,
            display,
            alert,
            notifier,
            visual,
            work_input,
            break_input,
            subject: String::new(),
        };
        session.sync_display();
        session
    }

    // ------------------------------------------------------------------------
    // Timer controls
    // ------------------------------------------------------------------------

    /// Starts or resumes the countdown using the current duration inputs.
    ///
    /// `work` and `break_` replace the corresponding input text first.
    /// No-op while running.
    ///
    /// # Errors
    ///
    /// Returns the validation error (also shown as a notice) if either
    /// duration input is invalid. The timer is left untouched.
    pub fn start(&mut self, work: Option<&str>, break_: Option<&str>) -> Result<(), ValidationError> {
        if let Some(text) = work {
            self.work_input = text.to_string();
        }
        if let Some(text) = break_ {
            self.break_input = text.to_string();
        }
        if self.engine.state().is_running() {
            tracing::debug!("start ignored: already running");
            return Ok(());
        }

        let durations = self.parse_inputs()?;
        self.engine.configure(durations)?;
        self.engine.start();
        self.drain_events();
        Ok(())
    }

    /// Pauses the countdown. No-op unless running.
    pub fn pause(&mut self) {
        self.engine.pause();
        self.drain_events();
    }

    /// Returns to a full, idle work phase.
    ///
    /// Valid duration inputs are applied; invalid ones are reported and the
    /// previous durations are kept.
    pub fn reset(&mut self) {
        let parsed = self.parse_inputs();
        self.engine.reset();
        if let Ok(durations) = parsed {
            if let Err(e) = self.engine.configure(durations) {
                tracing::warn!(error = %e, "durations rejected on reset");
            }
        }
        self.drain_events();
    }

    /// Delivers one tick to the engine.
    pub fn tick(&mut self) {
        self.engine.tick();
        self.drain_events();
    }

    /// Replaces the work duration text. Parsed on the next start or reset.
    pub fn set_work_input(&mut self, text: &str) {
        self.work_input = text.to_string();
    }

    /// Replaces the break duration text. Parsed on the next start or reset.
    pub fn set_break_input(&mut self, text: &str) {
        self.break_input = text.to_string();
    }

    /// Replaces the subject label and refreshes the displays.
    pub fn set_subject(&mut self, text: &str) {
        self.subject = text.to_string();
        self.sync_display();
    }

    // ------------------------------------------------------------------------
    // Floating widget
    // ------------------------------------------------------------------------

    /// Attaches the floating surface and draws the current frame on it.
    pub fn attach_floating(&mut self, surface: Box<dyn DisplaySurface>) {
        self.display.attach_floating(surface);
        self.sync_display();
    }

    /// Detaches the floating surface. Returns true if one was attached.
    pub fn detach_floating(&mut self) -> bool {
        self.display.detach_floating()
    }

    pub fn is_floating_attached(&self) -> bool {
        self.display.is_floating_attached()
    }

    // ------------------------------------------------------------------------
    // Appearance
    // ------------------------------------------------------------------------

    /// Sets the theme from user text.
    pub fn set_theme(&mut self, input: &str) -> Result<Theme, ValidationError> {
        let result = self.visual.set_theme_input(input);
        self.report(result)
    }

    /// Sets a custom color from a role name and a hex value.
    pub fn set_color(&mut self, role: &str, hex: &str) -> Result<(), ValidationError> {
        let result = role
            .parse::<ColorRole>()
            .and_then(|role| self.visual.set_color(role, hex));
        self.report(result)
    }

    pub fn set_font_family(&mut self, family: &str) -> Result<(), ValidationError> {
        let result = self.visual.set_font_family(family);
        self.report(result)
    }

    /// Sets the font size from user text.
    pub fn set_font_size(&mut self, input: &str) -> Result<u32, ValidationError> {
        let result = self.visual.set_font_size_input(input);
        self.report(result)
    }

    /// Sets the main-window transparency. Returns the clamped value.
    pub fn set_transparency(&mut self, value: f64) -> f64 {
        self.visual.set_transparency(value)
    }

    pub fn set_alert_sound(&mut self, enabled: bool) {
        self.visual.alert_sound = enabled;
    }

    /// Writes the appearance settings and reports the outcome as a notice.
    ///
    /// Returns true on success.
    pub fn save_visual(&mut self) -> bool {
        match self.store.save_visual(&self.visual) {
            Ok(()) => {
                tracing::info!(path = %self.store.visual_path().display(), "visual settings saved");
                self.notifier.notify(&Notice::VisualSaved);
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to save visual settings");
                self.notifier
                    .notify(&Notice::VisualSaveFailed(format!("{} ({})", e, e.suggestion())));
                false
            }
        }
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn state(&self) -> &TimerState {
        self.engine.state()
    }

    pub fn visual(&self) -> &VisualSettings {
        &self.visual
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn work_input(&self) -> &str {
        &self.work_input
    }

    pub fn break_input(&self) -> &str {
        &self.break_input
    }

    /// Returns the frame the displays currently show.
    pub fn frame(&self) -> DisplayFrame {
        DisplayFrame::from_state(self.engine.state(), &self.subject)
    }

    pub fn scheduler(&self) -> &S {
        self.engine.scheduler()
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        self.engine.scheduler_mut()
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    fn parse_inputs(&mut self) -> Result<TimerDurations, ValidationError> {
        let parsed = TimerDurations::parse(&self.work_input, &self.break_input);
        self.report(parsed)
    }

    /// Shows a rejected input as a notice and passes the result through.
    fn report<T>(&mut self, result: Result<T, ValidationError>) -> Result<T, ValidationError> {
        if let Err(ref e) = result {
            tracing::debug!(error = %e, "input rejected");
            self.notifier.notify(&Notice::InvalidInput(e.to_string()));
        }
        result
    }

    fn drain_events(&mut self) {
        let mut any = false;
        while let Ok(event) = self.events.try_recv() {
            any = true;
            if event.is_transition() {
                tracing::debug!(event = ?event, "phase transition");
            }
            self.handle_event(event);
        }
        if any {
            self.sync_display();
        }
    }

    fn handle_event(&mut self, event: TimerEvent) {
        match event {
            TimerEvent::WorkCompleted {
                sessions_completed,
                break_minutes,
            } => {
                self.persist_timer();
                if self.visual.alert_sound {
                    self.alert.play_alert();
                }
                self.notifier.notify(&Notice::BreakStarted {
                    sessions_completed,
                    break_minutes,
                });
            }
            TimerEvent::BreakCompleted { .. } => {
                self.notifier.notify(&Notice::BreakOver);
            }
            TimerEvent::Tick { .. } => {}
            other => tracing::debug!(event = ?other, "timer event"),
        }
    }

    fn persist_timer(&mut self) {
        let today = self.clock.today();
        let snapshot = SettingsSnapshot::capture(self.engine.state(), today);
        match self.store.save_timer(&snapshot) {
            Ok(()) => {
                self.engine.mark_saved(today);
                tracing::info!(sessions = snapshot.sessions_completed, "timer settings saved");
            }
            Err(e) => {
                tracing::warn!(error = %e, hint = e.suggestion(), "failed to save timer settings; continuing");
            }
        }
    }

    fn sync_display(&mut self) {
        let outcome = self.display.sync(self.engine.state(), &self.subject);
        if outcome.floating_detached {
            tracing::debug!("floating timer closed");
        }
    }
}
