use std::time::{Duration, Instant};

use crate::session::Mode;

/// How long the newest tomato stays highlighted after it is earned.
pub const BOUNCE_MS: u64 = 1000;

/// Receives every displayed value the controller changes.
pub trait Presenter {
    fn render_time(&mut self, minutes: u32, seconds: u32);
    /// `fraction` is the completed share of the current session, in `[0, 1]`.
    fn render_progress(&mut self, fraction: f64, mode: Mode);
    fn render_completed_count(&mut self, count: u32);
}

/// Last values pushed by the controller, read back by the terminal UI.
#[derive(Debug, Clone)]
pub struct DisplayState {
    pub minutes: u32,
    pub seconds: u32,
    pub fraction: f64,
    pub mode: Mode,
    pub completed: u32,
    bounce_until: Option<Instant>,
}

impl DisplayState {
    pub fn new() -> Self {
        Self {
            minutes: 0,
            seconds: 0,
            fraction: 0.0,
            mode: Mode::Work,
            completed: 0,
            bounce_until: None,
        }
    }

    pub fn clock_text(&self) -> String {
        format_mmss(self.minutes, self.seconds)
    }

    pub fn is_bouncing(&self, now: Instant) -> bool {
        self.bounce_until.is_some_and(|until| now < until)
    }
}

impl Default for DisplayState {
    fn default() -> Self {
        Self::new()
    }
}

impl Presenter for DisplayState {
    fn render_time(&mut self, minutes: u32, seconds: u32) {
        self.minutes = minutes;
        self.seconds = seconds;
    }

    fn render_progress(&mut self, fraction: f64, mode: Mode) {
        self.fraction = fraction.clamp(0.0, 1.0);
        self.mode = mode;
    }

    fn render_completed_count(&mut self, count: u32) {
        if count > self.completed {
            self.bounce_until = Some(Instant::now() + Duration::from_millis(BOUNCE_MS));
        }
        self.completed = count;
    }
}

pub fn format_mmss(minutes: u32, seconds: u32) -> String {
    format!("{minutes:02}:{seconds:02}")
}
