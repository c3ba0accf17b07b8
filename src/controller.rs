//! The pomodoro state machine.
//!
//! `SessionController` owns the only [`SessionState`] and is its only
//! mutator. All commands take `&mut self`, so a second transition can never
//! interleave with one in flight; ticks that arrive meanwhile wait in the
//! runtime channel.
//!
//! When a session runs out the controller rolls straight into the opposite
//! mode and keeps counting. That continuous cycling is intentional.

use std::time::Duration;

use crate::announcer::{Announcer, Cue, APP_TITLE, BREAK_COMPLETE_MSG, WORK_COMPLETE_MSG};
use crate::clock::{Clock, TickHandle};
use crate::presenter::Presenter;
use crate::session::{Durations, Mode, Phase, SessionState, TICK_INTERVAL_MS};

pub struct SessionController<C: Clock, P: Presenter, A: Announcer> {
    state: SessionState,
    durations: Durations,
    tick_interval: Duration,
    active_tick: Option<TickHandle>,
    clock: C,
    presenter: P,
    announcer: A,
}

impl<C: Clock, P: Presenter, A: Announcer> SessionController<C, P, A> {
    pub fn new(clock: C, presenter: P, announcer: A, sound_enabled: bool) -> Self {
        Self::with_durations(Durations::default(), clock, presenter, announcer, sound_enabled)
    }

    pub fn with_durations(
        durations: Durations,
        clock: C,
        presenter: P,
        announcer: A,
        sound_enabled: bool,
    ) -> Self {
        let mut controller = Self {
            state: SessionState::new(&durations, sound_enabled),
            durations,
            tick_interval: Duration::from_millis(TICK_INTERVAL_MS),
            active_tick: None,
            clock,
            presenter,
            announcer,
        };
        controller.render();
        controller
            .presenter
            .render_completed_count(controller.state.completed_work_sessions);
        controller
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn durations(&self) -> &Durations {
        &self.durations
    }

    pub fn active_tick(&self) -> Option<TickHandle> {
        self.active_tick
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn announcer(&self) -> &A {
        &self.announcer
    }

    pub fn announcer_mut(&mut self) -> &mut A {
        &mut self.announcer
    }

    /// Begin counting down. Does nothing while already running.
    pub fn start(&mut self) {
        if self.state.running {
            return;
        }
        self.begin_countdown();
        self.cue(Cue::Start);
    }

    pub fn pause(&mut self) {
        if self.state.running {
            tracing::info!(remaining = self.state.remaining_secs, "paused");
        }
        self.halt();
    }

    /// Refill the current mode. Mode and counters are untouched.
    pub fn reset(&mut self) {
        self.halt();
        self.state.remaining_secs = self.durations.of(self.state.mode);
        tracing::info!(mode = %self.state.mode, "reset");
        self.render();
    }

    pub fn switch_to_work(&mut self) {
        self.switch_mode(Mode::Work);
    }

    pub fn switch_to_break(&mut self) {
        self.switch_mode(Mode::Break);
    }

    /// Feed a clock firing. Ticks from a cancelled registration are dropped.
    /// Returns whether the tick was applied.
    pub fn on_tick(&mut self, handle: TickHandle) -> bool {
        if self.active_tick != Some(handle) {
            tracing::trace!(handle = handle.id(), "dropping stale tick");
            return false;
        }
        self.tick();
        true
    }

    /// One second of countdown. Only meaningful while running.
    pub fn tick(&mut self) {
        if !self.state.running {
            return;
        }
        self.state.remaining_secs = self.state.remaining_secs.saturating_sub(1);
        self.render();
        if self.state.remaining_secs == 0 {
            self.complete_session();
        }
    }

    /// Flip the mute switch. Timer state is left alone.
    pub fn toggle_sound(&mut self) -> bool {
        self.state.sound_enabled = !self.state.sound_enabled;
        tracing::info!(sound_enabled = self.state.sound_enabled, "sound toggled");
        self.state.sound_enabled
    }

    /// Play a cue unless muted. Failures are logged and swallowed.
    pub fn cue(&mut self, cue: Cue) {
        if !self.state.sound_enabled {
            return;
        }
        if let Err(err) = self.announcer.play_cue(cue) {
            tracing::warn!(%cue, %err, "cue unavailable");
        }
    }

    pub fn notify(&mut self, title: &str, body: &str) {
        if let Err(err) = self.announcer.notify(title, body) {
            tracing::warn!(%err, "notification unavailable");
        }
    }

    fn complete_session(&mut self) {
        self.halt();

        match self.state.mode {
            Mode::Work => {
                self.state.completed_work_sessions += 1;
                tracing::info!(
                    completed = self.state.completed_work_sessions,
                    "work session complete"
                );
                self.presenter
                    .render_completed_count(self.state.completed_work_sessions);
                self.cue(Cue::End);
                self.cue(Cue::Tomato);
                self.switch_mode(Mode::Break);
                self.notify(APP_TITLE, WORK_COMPLETE_MSG);
            }
            Mode::Break => {
                tracing::info!("break complete");
                self.cue(Cue::End);
                self.switch_mode(Mode::Work);
                self.notify(APP_TITLE, BREAK_COMPLETE_MSG);
            }
        }

        // Roll straight into the next session, without the start cue.
        self.begin_countdown();
    }

    fn switch_mode(&mut self, mode: Mode) {
        self.halt();
        self.state.mode = mode;
        self.state.remaining_secs = self.durations.of(mode);
        tracing::debug!(%mode, "mode switched");
        self.render();
    }

    fn begin_countdown(&mut self) {
        // A leftover registration would double the decrement rate.
        if let Some(stale) = self.active_tick.take() {
            self.clock.cancel(stale);
        }
        self.state.running = true;
        self.active_tick = Some(self.clock.schedule(self.tick_interval));
        tracing::info!(
            mode = %self.state.mode,
            remaining = self.state.remaining_secs,
            "countdown started"
        );
    }

    fn halt(&mut self) {
        self.state.running = false;
        if let Some(handle) = self.active_tick.take() {
            self.clock.cancel(handle);
        }
    }

    fn render(&mut self) {
        let remaining = self.state.remaining_secs;
        self.presenter.render_time(remaining / 60, remaining % 60);

        let total = self.durations.of(self.state.mode);
        let fraction = if total == 0 {
            1.0
        } else {
            f64::from(total - remaining.min(total)) / f64::from(total)
        };
        self.presenter.render_progress(fraction, self.state.mode);
    }
}
