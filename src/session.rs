use serde::{Deserialize, Serialize};

pub const WORK_SECS: u32 = 25 * 60;
pub const BREAK_SECS: u32 = 5 * 60;
pub const TICK_INTERVAL_MS: u64 = 1000;
pub const BANNER_TTL_MS: u64 = 8000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Work,
    Break,
}

impl Mode {
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Work => "WORK",
            Mode::Break => "BREAK",
        }
    }

    pub fn opposite(&self) -> Mode {
        match self {
            Mode::Work => Mode::Break,
            Mode::Break => Mode::Work,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Durations {
    pub work_secs: u32,
    pub break_secs: u32,
}

impl Durations {
    pub fn of(&self, mode: Mode) -> u32 {
        match mode {
            Mode::Work => self.work_secs,
            Mode::Break => self.break_secs,
        }
    }
}

impl Default for Durations {
    fn default() -> Self {
        Self {
            work_secs: WORK_SECS,
            break_secs: BREAK_SECS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    IdleWork,
    RunningWork,
    IdleBreak,
    RunningBreak,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub mode: Mode,
    pub remaining_secs: u32,
    pub running: bool,
    pub completed_work_sessions: u32,
    pub sound_enabled: bool,
}

impl SessionState {
    pub fn new(durations: &Durations, sound_enabled: bool) -> Self {
        Self {
            mode: Mode::Work,
            remaining_secs: durations.of(Mode::Work),
            running: false,
            completed_work_sessions: 0,
            sound_enabled,
        }
    }

    pub fn phase(&self) -> Phase {
        match (self.mode, self.running) {
            (Mode::Work, false) => Phase::IdleWork,
            (Mode::Work, true) => Phase::RunningWork,
            (Mode::Break, false) => Phase::IdleBreak,
            (Mode::Break, true) => Phase::RunningBreak,
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(&Durations::default(), true)
    }
}
