//! Engine module for the Pomodoro timer.
//!
//! This module contains the countdown core:
//! - `timer`: Timer engine with state transitions and phase logic
//! - `scheduler`: The seam through which the engine requests its next tick

pub mod scheduler;
pub mod timer;

pub use scheduler::{DeadlineScheduler, ManualScheduler, TickScheduler, TICK_INTERVAL};
pub use timer::{TimerEngine, TimerEvent};
