//! The floating always-on-top timer widget.
//!
//! The widget and its surface are two ends of a channel:
//!
//! - `FloatingSurface` is registered with `DisplaySync` and sends frames
//! - `FloatingWidget` owns the window side (the menu bar item on macOS)
//!
//! Closing the widget drops the receiving end, so the next render on the
//! surface fails with `SurfaceError::Detached` and the surface is
//! deregistered.
//!
//! ```ignore
//! let (mut widget, surface) = FloatingWidget::open();
//! widget.initialize()?;
//! display_sync.attach_floating(Box::new(surface));
//!
//! // From the event loop, on the main thread
//! widget.process_pending_updates();
//! ```

use crossbeam_channel::{Receiver, Sender, TryRecvError};

use crate::settings::clamp_opacity;

use super::{floating_title, DisplayFrame, DisplaySurface, SurfaceError};

/// Accepted widget opacity, independent from the main window's range.
pub const FLOAT_OPACITY_RANGE: std::ops::RangeInclusive<f64> = 0.1..=1.0;

/// Opacity of a freshly opened widget.
pub const DEFAULT_FLOAT_OPACITY: f64 = 0.8;

// ============================================================================
// FloatingSurface
// ============================================================================

/// Sending end registered with `DisplaySync`.
#[derive(Debug, Clone)]
pub struct FloatingSurface {
    update_tx: Sender<DisplayFrame>,
}

impl DisplaySurface for FloatingSurface {
    fn name(&self) -> &'static str {
        "floating"
    }

    fn render(&mut self, frame: &DisplayFrame) -> Result<(), SurfaceError> {
        self.update_tx
            .send(frame.clone())
            .map_err(|_| SurfaceError::Detached)
    }
}

// ============================================================================
// FloatingWidget
// ============================================================================

/// Window side of the floating timer.
pub struct FloatingWidget {
    /// Channel for receiving frames from `DisplaySync`
    update_rx: Receiver<DisplayFrame>,
    /// Last rendered title
    title: Option<String>,
    /// Widget opacity (0.1-1.0)
    opacity: f64,
    /// Whether the widget is initialized
    initialized: bool,
    /// Platform-specific tray icon instance (macOS only)
    #[cfg(target_os = "macos")]
    tray_icon: Option<tray_icon::TrayIcon>,
}

impl FloatingWidget {
    /// Creates a widget and the surface that feeds it.
    pub fn open() -> (Self, FloatingSurface) {
        let (update_tx, update_rx) = crossbeam_channel::unbounded();
        let widget = Self {
            update_rx,
            title: None,
            opacity: DEFAULT_FLOAT_OPACITY,
            initialized: false,
            #[cfg(target_os = "macos")]
            tray_icon: None,
        };
        (widget, FloatingSurface { update_tx })
    }

    /// Returns whether the widget is initialized.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Returns the last rendered title.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Returns the widget opacity.
    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    /// Sets the widget opacity, clamped into `FLOAT_OPACITY_RANGE`.
    pub fn set_opacity(&mut self, value: f64) -> f64 {
        self.opacity = clamp_opacity(value, &FLOAT_OPACITY_RANGE, self.opacity);
        tracing::debug!(opacity = self.opacity, "floating widget opacity changed");
        self.opacity
    }

    /// Applies every frame waiting in the channel.
    ///
    /// Returns the number of frames processed.
    pub fn process_pending_updates(&mut self) -> usize {
        let mut processed = 0;
        loop {
            match self.update_rx.try_recv() {
                Ok(frame) => {
                    self.handle_frame(&frame);
                    processed += 1;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    tracing::debug!("floating widget update channel disconnected");
                    break;
                }
            }
        }
        processed
    }

    fn handle_frame(&mut self, frame: &DisplayFrame) {
        let title = floating_title(frame);
        if self.title.as_deref() == Some(title.as_str()) {
            return;
        }
        #[cfg(target_os = "macos")]
        if let Some(ref tray_icon) = self.tray_icon {
            tray_icon.set_title(Some(&title));
        }
        self.title = Some(title);
    }

    /// Creates the menu bar item (macOS only).
    ///
    /// Must be called from the main thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the tray icon cannot be created.
    #[cfg(target_os = "macos")]
    pub fn initialize(&mut self) -> anyhow::Result<()> {
        use anyhow::Context;
        use tray_icon::TrayIconBuilder;

        let title = self.title.clone().unwrap_or_else(|| "🍅".to_string());
        let tray_icon = TrayIconBuilder::new()
            .with_title(&title)
            .with_tooltip("Pomodoro timer")
            .build()
            .context("failed to create the floating timer")?;

        self.tray_icon = Some(tray_icon);
        self.initialized = true;
        tracing::info!("floating timer opened in the menu bar");
        Ok(())
    }

    /// Initializes the widget (non-macOS, title is tracked only).
    #[cfg(not(target_os = "macos"))]
    pub fn initialize(&mut self) -> anyhow::Result<()> {
        tracing::debug!("no native floating window on this platform; tracking title only");
        self.initialized = true;
        Ok(())
    }
}

impl std::fmt::Debug for FloatingWidget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FloatingWidget")
            .field("title", &self.title)
            .field("opacity", &self.opacity)
            .field("initialized", &self.initialized)
            .finish_non_exhaustive()
    }
}
