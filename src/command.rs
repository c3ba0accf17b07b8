use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::announcer::{Announcer, Cue};
use crate::clock::Clock;
use crate::controller::SessionController;
use crate::presenter::Presenter;

/// Commands forwarded to the session controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Pause,
    Reset,
    Work,
    Break,
    ToggleSound,
}

/// Everything a key press can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Session(Command),
    DismissBanner,
    Quit,
}

impl Action {
    pub fn from_key(key: KeyEvent) -> Option<Action> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(Action::Quit);
        }

        let action = match key.code {
            KeyCode::Esc | KeyCode::Char('q') => Action::Quit,
            KeyCode::Enter | KeyCode::Char('s') => Action::Session(Command::Start),
            KeyCode::Char(' ') | KeyCode::Char('p') => Action::Session(Command::Pause),
            KeyCode::Char('r') => Action::Session(Command::Reset),
            KeyCode::Char('w') => Action::Session(Command::Work),
            KeyCode::Char('b') => Action::Session(Command::Break),
            KeyCode::Char('m') => Action::Session(Command::ToggleSound),
            KeyCode::Char('x') => Action::DismissBanner,
            _ => return None,
        };
        Some(action)
    }
}

impl Command {
    /// Run the command the way the on-screen controls do: start has its own
    /// cue, the other timer controls click.
    pub fn apply<C: Clock, P: Presenter, A: Announcer>(
        self,
        controller: &mut SessionController<C, P, A>,
    ) {
        tracing::debug!(command = ?self, "command");
        match self {
            Command::Start => controller.start(),
            Command::Pause => {
                controller.pause();
                controller.cue(Cue::Click);
            }
            Command::Reset => {
                controller.reset();
                controller.cue(Cue::Click);
            }
            Command::Work => {
                controller.switch_to_work();
                controller.cue(Cue::Click);
            }
            Command::Break => {
                controller.switch_to_break();
                controller.cue(Cue::Click);
            }
            Command::ToggleSound => {
                controller.toggle_sound();
            }
        }
    }
}
