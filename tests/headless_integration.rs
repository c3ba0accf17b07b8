use std::sync::mpsc;
use std::time::{Duration, Instant};

use tomatempo::announcer::{
    Announcer, Cue, NotificationStrategy, TerminalAnnouncer, BREAK_COMPLETE_MSG,
    WORK_COMPLETE_MSG,
};
use tomatempo::clock::{Clock, IntervalClock, ManualClock};
use tomatempo::command::{Action, Command};
use tomatempo::presenter::DisplayState;
use tomatempo::runtime::{AppEvent, FixedTicker, Runner, TestEventSource};
use tomatempo::session::{Mode, Phase};
use tomatempo::SessionController;

fn banner_announcer() -> TerminalAnnouncer<Vec<u8>> {
    TerminalAnnouncer::new(Vec::new(), Cue::ALL.to_vec(), NotificationStrategy::Banner)
}

// Drive a full work + break cycle through the runner without a TTY,
// feeding ticks for whatever registration the controller currently holds.
#[test]
fn headless_full_cycle_through_runner() {
    let mut ctl = SessionController::new(ManualClock::new(), DisplayState::new(), banner_announcer(), true);

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(1)),
    );

    Command::Start.apply(&mut ctl);

    let mut ticks = 0u32;
    while ticks < 1500 + 300 {
        let handle = ctl.active_tick().expect("countdown should keep running");
        tx.send(AppEvent::Tick(handle)).unwrap();
        match runner.step() {
            AppEvent::Tick(h) => {
                assert!(ctl.on_tick(h));
                ticks += 1;
            }
            other => panic!("unexpected event {other:?}"),
        }
        if ticks == 1500 {
            assert_eq!(ctl.phase(), Phase::RunningBreak);
            assert_eq!(ctl.state().remaining_secs, 300);
            assert_eq!(ctl.presenter().clock_text(), "05:00");
        }
    }

    assert_eq!(ctl.phase(), Phase::RunningWork);
    assert_eq!(ctl.state().remaining_secs, 1500);
    assert_eq!(ctl.state().completed_work_sessions, 1);
    assert_eq!(ctl.presenter().completed, 1);
    assert_eq!(ctl.clock().active().len(), 1);

    let bodies: Vec<&str> = ctl
        .announcer()
        .banners()
        .iter()
        .map(|b| b.body.as_str())
        .collect();
    assert_eq!(bodies, vec![WORK_COMPLETE_MSG, BREAK_COMPLETE_MSG]);

    // start + (end, tomato) + end
    assert_eq!(ctl.announcer().writer().len(), 1 + (2 + 3) + 2);
}

#[test]
fn headless_stale_ticks_after_switch_are_ignored() {
    let mut ctl = SessionController::new(ManualClock::new(), DisplayState::new(), banner_announcer(), false);
    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(TestEventSource::new(rx), FixedTicker::new(Duration::from_millis(1)));

    ctl.start();
    let old = ctl.active_tick().unwrap();
    // Two ticks already queued when the user switches mode.
    tx.send(AppEvent::Tick(old)).unwrap();
    tx.send(AppEvent::Tick(old)).unwrap();
    ctl.switch_to_break();

    for _ in 0..2 {
        if let AppEvent::Tick(h) = runner.step() {
            assert!(!ctl.on_tick(h));
        }
    }
    assert_eq!(ctl.state().mode, Mode::Break);
    assert_eq!(ctl.state().remaining_secs, 300);
    assert!(!ctl.state().running);
}

#[test]
fn headless_key_actions_map_onto_commands() {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    let mut ctl = SessionController::new(ManualClock::new(), DisplayState::new(), banner_announcer(), true);
    for c in ['s', 'w', 'b', 's', 'p', 'r'] {
        match Action::from_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)) {
            Some(Action::Session(cmd)) => cmd.apply(&mut ctl),
            other => panic!("unexpected action {other:?}"),
        }
    }
    assert_eq!(ctl.phase(), Phase::IdleBreak);
    assert_eq!(ctl.state().remaining_secs, 300);
    assert_eq!(ctl.state().completed_work_sessions, 0);
}

// Real wall-clock ticks: a doubled start must still decrement once per second.
#[test]
fn headless_double_start_with_real_clock_decrements_once_per_second() {
    let (tx, rx) = mpsc::channel();
    let clock = IntervalClock::new(tx);
    let mut ctl = SessionController::new(clock, DisplayState::new(), banner_announcer(), false);
    let runner = Runner::new(TestEventSource::new(rx), FixedTicker::new(Duration::from_millis(20)));

    ctl.start();
    ctl.start();

    let deadline = Instant::now() + Duration::from_millis(1800);
    while Instant::now() < deadline {
        if let AppEvent::Tick(h) = runner.step() {
            ctl.on_tick(h);
        }
    }
    assert_eq!(ctl.state().remaining_secs, 1499);
    ctl.pause();
}

struct Unavailable;

impl Announcer for Unavailable {
    fn play_cue(&mut self, _cue: Cue) -> tomatempo::Result<()> {
        Err(tomatempo::TomatempoError::NotificationFailed("no speaker".into()))
    }

    fn notify(&mut self, _title: &str, _body: &str) -> tomatempo::Result<()> {
        Err(tomatempo::TomatempoError::NotificationFailed("no display".into()))
    }
}

#[test]
fn headless_missing_collaborators_do_not_block_cycling() {
    let mut clock = ManualClock::new();
    let _unrelated = clock.schedule(Duration::from_secs(5));
    let mut ctl = SessionController::new(clock, DisplayState::new(), Unavailable, true);
    ctl.switch_to_break();
    ctl.start();
    for _ in 0..300 {
        let h = ctl.active_tick().unwrap();
        ctl.on_tick(h);
    }
    assert_eq!(ctl.phase(), Phase::RunningWork);
}
