//! Tick sources for the session countdown.
//!
//! A clock never calls back into the controller. Each firing is delivered to
//! the event loop tagged with the [`TickHandle`] it belongs to, and the
//! controller drops ticks whose handle is no longer its active registration.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::runtime::AppEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickHandle(u64);

impl TickHandle {
    pub fn id(&self) -> u64 {
        self.0
    }
}

pub trait Clock {
    /// Register a repeating tick at `interval`.
    fn schedule(&mut self, interval: Duration) -> TickHandle;
    /// Stop a registration. Unknown or already cancelled handles are ignored.
    fn cancel(&mut self, handle: TickHandle);
}

/// Production clock: one sleeper thread per registration, feeding the
/// runtime channel.
pub struct IntervalClock {
    tx: Sender<AppEvent>,
    next_id: u64,
    active: Option<(TickHandle, Arc<AtomicBool>)>,
}

impl IntervalClock {
    pub fn new(tx: Sender<AppEvent>) -> Self {
        Self {
            tx,
            next_id: 0,
            active: None,
        }
    }
}

impl Clock for IntervalClock {
    fn schedule(&mut self, interval: Duration) -> TickHandle {
        if let Some((previous, _)) = self.active {
            self.cancel(previous);
        }

        self.next_id += 1;
        let handle = TickHandle(self.next_id);
        let stopped = Arc::new(AtomicBool::new(false));

        let tx = self.tx.clone();
        let flag = Arc::clone(&stopped);
        thread::spawn(move || loop {
            thread::sleep(interval);
            if flag.load(Ordering::Acquire) {
                break;
            }
            if tx.send(AppEvent::Tick(handle)).is_err() {
                break;
            }
        });

        tracing::debug!(handle = handle.id(), ?interval, "tick scheduled");
        self.active = Some((handle, stopped));
        handle
    }

    fn cancel(&mut self, handle: TickHandle) {
        match self.active.take() {
            Some((active, stopped)) if active == handle => {
                stopped.store(true, Ordering::Release);
                tracing::debug!(handle = handle.id(), "tick cancelled");
            }
            other => self.active = other,
        }
    }
}

impl Drop for IntervalClock {
    fn drop(&mut self) {
        if let Some((_, stopped)) = self.active.take() {
            stopped.store(true, Ordering::Release);
        }
    }
}

/// Deterministic clock for tests. Nothing fires on its own; the test feeds
/// ticks to the controller with the handles recorded here.
#[derive(Debug, Default)]
pub struct ManualClock {
    next_id: u64,
    active: Vec<TickHandle>,
    pub scheduled: usize,
    pub cancelled: usize,
    pub last_interval: Option<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> &[TickHandle] {
        &self.active
    }
}

impl Clock for ManualClock {
    fn schedule(&mut self, interval: Duration) -> TickHandle {
        self.next_id += 1;
        let handle = TickHandle(self.next_id);
        self.active.push(handle);
        self.scheduled += 1;
        self.last_interval = Some(interval);
        handle
    }

    fn cancel(&mut self, handle: TickHandle) {
        let before = self.active.len();
        self.active.retain(|h| *h != handle);
        if self.active.len() != before {
            self.cancelled += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn manual_clock_tracks_registrations() {
        let mut clock = ManualClock::new();
        let a = clock.schedule(Duration::from_secs(1));
        let b = clock.schedule(Duration::from_secs(1));
        assert_ne!(a, b);
        assert_eq!(clock.active(), &[a, b]);

        clock.cancel(a);
        clock.cancel(a);
        assert_eq!(clock.active(), &[b]);
        assert_eq!(clock.cancelled, 1);
        assert_eq!(clock.scheduled, 2);
    }

    #[test]
    fn interval_clock_delivers_tagged_ticks() {
        let (tx, rx) = mpsc::channel();
        let mut clock = IntervalClock::new(tx);
        let handle = clock.schedule(Duration::from_millis(5));

        match rx.recv_timeout(Duration::from_secs(2)) {
            Ok(AppEvent::Tick(h)) => assert_eq!(h, handle),
            other => panic!("expected a tick, got {other:?}"),
        }
        clock.cancel(handle);
    }

    #[test]
    fn interval_clock_stops_after_cancel() {
        let (tx, rx) = mpsc::channel();
        let mut clock = IntervalClock::new(tx);
        let handle = clock.schedule(Duration::from_millis(5));
        clock.cancel(handle);

        // At most one tick can already be in flight when the flag flips.
        thread::sleep(Duration::from_millis(50));
        let drained = rx.try_iter().count();
        assert!(drained <= 1, "received {drained} ticks after cancel");
    }

    #[test]
    fn rescheduling_replaces_the_previous_registration() {
        let (tx, _rx) = mpsc::channel();
        let mut clock = IntervalClock::new(tx);
        let first = clock.schedule(Duration::from_secs(60));
        let second = clock.schedule(Duration::from_secs(60));
        assert_ne!(first, second);
        assert_eq!(clock.active.as_ref().map(|(h, _)| *h), Some(second));
    }
}
