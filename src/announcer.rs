//! Audible cues and user-visible notifications.
//!
//! The controller only sees [`Announcer`]. Which notification strategy is in
//! effect is decided when the [`TerminalAnnouncer`] is built.

use std::io::Write;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TomatempoError};
use crate::session::BANNER_TTL_MS;

pub const APP_TITLE: &str = "🍅 Tomatempo";
pub const WORK_COMPLETE_MSG: &str = "Work session complete! Time for a break!";
pub const BREAK_COMPLETE_MSG: &str = "Break is over! Time to get back to work!";
pub const WELCOME_MSG: &str = "Welcome to Tomatempo! 🍅\nThe Pomodoro Technique is 25 minutes of focused work followed by a 5 minute break. Complete cycles and boost your productivity!";

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Cue {
    Start,
    End,
    Click,
    Tomato,
}

impl Cue {
    pub const ALL: [Cue; 4] = [Cue::Start, Cue::End, Cue::Click, Cue::Tomato];

    /// Terminal bells rung for this cue.
    pub fn bells(&self) -> usize {
        match self {
            Cue::Click | Cue::Start => 1,
            Cue::End => 2,
            Cue::Tomato => 3,
        }
    }
}

pub trait Announcer {
    fn play_cue(&mut self, cue: Cue) -> Result<()>;
    fn notify(&mut self, title: &str, body: &str) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationStrategy {
    /// OSC 9 escape, picked up by terminals that forward it to the desktop.
    Desktop,
    /// In-app banner drawn over the timer.
    Banner,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Banner {
    pub title: String,
    pub body: String,
    pub posted_at: Instant,
    pub posted_wall: DateTime<Local>,
}

/// Banners currently on screen, oldest first.
#[derive(Debug, Clone)]
pub struct BannerBoard {
    banners: Vec<Banner>,
    ttl: Duration,
}

impl BannerBoard {
    pub fn new(ttl: Duration) -> Self {
        Self {
            banners: Vec::new(),
            ttl,
        }
    }

    pub fn post_at(&mut self, title: &str, body: &str, now: Instant) {
        self.banners.push(Banner {
            title: title.to_string(),
            body: body.to_string(),
            posted_at: now,
            posted_wall: Local::now(),
        });
    }

    /// Drop every banner older than the ttl. Returns how many were removed.
    pub fn expire(&mut self, now: Instant) -> usize {
        let before = self.banners.len();
        let ttl = self.ttl;
        self.banners
            .retain(|b| now.saturating_duration_since(b.posted_at) < ttl);
        before - self.banners.len()
    }

    pub fn dismiss_latest(&mut self) -> Option<Banner> {
        self.banners.pop()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Banner> {
        self.banners.iter()
    }

    pub fn latest(&self) -> Option<&Banner> {
        self.banners.last()
    }

    pub fn len(&self) -> usize {
        self.banners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.banners.is_empty()
    }
}

impl Default for BannerBoard {
    fn default() -> Self {
        Self::new(Duration::from_millis(BANNER_TTL_MS))
    }
}

/// Rings the terminal bell for cues and notifies via the desktop or a banner.
pub struct TerminalAnnouncer<W: Write> {
    out: W,
    cues: Vec<Cue>,
    strategy: NotificationStrategy,
    banners: BannerBoard,
}

impl<W: Write> TerminalAnnouncer<W> {
    pub fn new(out: W, cues: Vec<Cue>, strategy: NotificationStrategy) -> Self {
        Self {
            out,
            cues,
            strategy,
            banners: BannerBoard::default(),
        }
    }

    pub fn strategy(&self) -> NotificationStrategy {
        self.strategy
    }

    pub fn banners(&self) -> &BannerBoard {
        &self.banners
    }

    pub fn banners_mut(&mut self) -> &mut BannerBoard {
        &mut self.banners
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    fn write_all(&mut self, bytes: &[u8], context: &str) -> Result<()> {
        self.out
            .write_all(bytes)
            .and_then(|_| self.out.flush())
            .map_err(|e| TomatempoError::terminal(context, e))
    }
}

impl<W: Write> Announcer for TerminalAnnouncer<W> {
    fn play_cue(&mut self, cue: Cue) -> Result<()> {
        if !self.cues.contains(&cue) {
            tracing::trace!(%cue, "cue not configured, skipping");
            return Ok(());
        }
        let bells = "\x07".repeat(cue.bells());
        self.write_all(bells.as_bytes(), "ringing bell")
    }

    fn notify(&mut self, title: &str, body: &str) -> Result<()> {
        match self.strategy {
            NotificationStrategy::Desktop => {
                // OSC payloads end at BEL, so strip any from the text itself.
                let text = format!("{title}: {body}").replace(['\x07', '\x1b', '\n'], " ");
                let seq = format!("\x1b]9;{text}\x07");
                if let Err(err) = self.write_all(seq.as_bytes(), "desktop notification") {
                    tracing::warn!(%err, "desktop notification failed, falling back to banner");
                    self.banners.post_at(title, body, Instant::now());
                }
                Ok(())
            }
            NotificationStrategy::Banner => {
                self.banners.post_at(title, body, Instant::now());
                Ok(())
            }
        }
    }
}
