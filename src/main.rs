mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::KeyEventKind,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin, Write},
    path::PathBuf,
    time::Instant,
};

use tomatempo::{
    announcer::{Cue, NotificationStrategy, TerminalAnnouncer, APP_TITLE, WELCOME_MSG},
    app_dirs::AppDirs,
    clock::IntervalClock,
    command::Action,
    config::{Config, ConfigStore, FileConfigStore},
    logging,
    presenter::DisplayState,
    runtime::{AppEvent, CrosstermEventSource, EventSource, FixedTicker, Runner, Ticker},
    SessionController,
};

/// pomodoro timer for the terminal
#[derive(Parser, Debug, Clone, Default)]
#[clap(
    version,
    about,
    long_about = "A pomodoro timer for the terminal: 25 minutes of focused work, 5 minutes of rest, and back again, with bell cues, notifications and a tomato for every finished work session."
)]
pub struct Cli {
    /// start with sound cues muted
    #[clap(short = 'm', long)]
    mute: bool,

    /// send notifications to the desktop via the terminal (OSC 9) instead of in-app banners
    #[clap(short = 'd', long)]
    desktop_notifications: bool,

    /// do not show the welcome banner on startup
    #[clap(long)]
    no_welcome: bool,

    /// config file to use instead of the default location
    #[clap(short = 'c', long)]
    config: Option<PathBuf>,
}

/// Config file values with command line overrides applied.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeSettings {
    pub sound_enabled: bool,
    pub strategy: NotificationStrategy,
    pub cues: Vec<Cue>,
    pub show_welcome: bool,
}

impl RuntimeSettings {
    pub fn resolve(cli: &Cli, config: &Config) -> Self {
        let desktop = cli.desktop_notifications || config.desktop_notifications;
        Self {
            sound_enabled: config.sound_enabled && !cli.mute,
            strategy: if desktop {
                NotificationStrategy::Desktop
            } else {
                NotificationStrategy::Banner
            },
            cues: config.cues.clone(),
            show_welcome: config.show_welcome && !cli.no_welcome,
        }
    }
}

pub type Controller<W> = SessionController<IntervalClock, DisplayState, TerminalAnnouncer<W>>;

pub struct App<W: Write> {
    pub controller: Controller<W>,
    pub settings: RuntimeSettings,
}

impl<W: Write> App<W> {
    pub fn new(settings: RuntimeSettings, clock: IntervalClock, out: W) -> Self {
        let announcer = TerminalAnnouncer::new(out, settings.cues.clone(), settings.strategy);
        let mut controller =
            SessionController::new(clock, DisplayState::new(), announcer, settings.sound_enabled);
        if settings.show_welcome {
            controller.notify(APP_TITLE, WELCOME_MSG);
        }
        Self {
            controller,
            settings,
        }
    }

    /// Apply one event. Returns false once the user asked to quit.
    pub fn handle(&mut self, event: AppEvent) -> bool {
        match event {
            AppEvent::Tick(handle) => {
                self.controller.on_tick(handle);
            }
            AppEvent::Frame | AppEvent::Resize => {
                self.controller
                    .announcer_mut()
                    .banners_mut()
                    .expire(Instant::now());
            }
            AppEvent::Key(key) => {
                if key.kind != KeyEventKind::Press {
                    return true;
                }
                match Action::from_key(key) {
                    Some(Action::Quit) => return false,
                    Some(Action::DismissBanner) => {
                        self.controller.announcer_mut().banners_mut().dismiss_latest();
                    }
                    Some(Action::Session(command)) => command.apply(&mut self.controller),
                    None => {}
                }
            }
        }
        true
    }

    /// Whether the mute switch moved since startup.
    pub fn sound_changed(&self) -> bool {
        self.controller.state().sound_enabled != self.settings.sound_enabled
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let _log_guard = logging::init(AppDirs::log_dir().as_deref());

    let store = cli
        .config
        .as_ref()
        .map(FileConfigStore::with_path)
        .unwrap_or_default();
    let config = store.load();
    let settings = RuntimeSettings::resolve(&cli, &config);
    tracing::info!(config = %store.path().display(), ?settings, "starting");

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = CrosstermEventSource::new();
    let clock = IntervalClock::new(events.sender());
    let mut app = App::new(settings, clock, io::stdout());
    let runner = Runner::new(events, FixedTicker::default());

    let result = start_tui(&mut terminal, &mut app, &runner);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen,)?;
    terminal.show_cursor()?;

    if app.sound_changed() {
        let updated = Config {
            sound_enabled: app.controller.state().sound_enabled,
            ..config
        };
        if let Err(err) = store.save(&updated) {
            tracing::warn!(%err, "could not persist sound preference");
        }
    }

    result
}

fn start_tui<B: Backend, W: Write, E: EventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App<W>,
    runner: &Runner<E, T>,
) -> Result<(), Box<dyn Error>> {
    loop {
        terminal.draw(|f| ui(app, f))?;

        if !app.handle(runner.step()) {
            break;
        }
    }

    tracing::info!(
        completed = app.controller.state().completed_work_sessions,
        "quitting"
    );
    Ok(())
}

fn ui<W: Write>(app: &App<W>, f: &mut Frame) {
    f.render_widget(app, f.area());
}
