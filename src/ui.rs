use std::io::Write;
use std::time::Instant;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use tomatempo::announcer::{Banner, APP_TITLE};
use tomatempo::session::Mode;

use crate::App;

const HORIZONTAL_MARGIN: u16 = 5;
const BANNER_MAX_WIDTH: u16 = 50;
const MAX_BANNERS: usize = 3;
const MAX_TOMATOES: u32 = 12;

pub fn mode_color(mode: Mode) -> Color {
    match mode {
        Mode::Work => Color::Rgb(0x27, 0xae, 0x60),
        Mode::Break => Color::Rgb(0x34, 0x98, 0xdb),
    }
}

impl<W: Write> Widget for &App<W> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let display = self.controller.presenter();
        let state = self.controller.state();
        let color = mode_color(display.mode);

        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let dim_style = Style::default().add_modifier(Modifier::DIM);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .constraints([
                Constraint::Length(3), // title + mode tabs
                Constraint::Min(3),    // clock
                Constraint::Length(3), // progress
                Constraint::Length(2), // tomatoes
                Constraint::Length(2), // keys
            ])
            .split(area);

        let tab = |mode: Mode| {
            if display.mode == mode {
                Span::styled(
                    format!(" {} ", mode.label()),
                    bold_style.fg(mode_color(mode)).add_modifier(Modifier::UNDERLINED),
                )
            } else {
                Span::styled(format!(" {} ", mode.label()), dim_style)
            }
        };
        Paragraph::new(Line::from(vec![tab(Mode::Work), Span::raw("|"), tab(Mode::Break)]))
            .block(Block::default().borders(Borders::BOTTOM).title(APP_TITLE))
            .alignment(Alignment::Center)
            .render(chunks[0], buf);

        let clock_area = chunks[1];
        let clock_top = clock_area.y + clock_area.height.saturating_sub(2) / 2;
        let status = if state.running { "running" } else { "paused" };
        Paragraph::new(vec![
            Line::from(Span::styled(display.clock_text(), bold_style.fg(color))),
            Line::from(Span::styled(status, dim_style.add_modifier(Modifier::ITALIC))),
        ])
        .alignment(Alignment::Center)
        .render(
            Rect::new(clock_area.x, clock_top, clock_area.width, 2.min(clock_area.height)),
            buf,
        );

        Gauge::default()
            .block(Block::default().borders(Borders::ALL).title("Progress"))
            .gauge_style(Style::default().fg(color))
            .ratio(display.fraction)
            .label(format!("{:.0}%", display.fraction * 100.0))
            .render(chunks[2], buf);

        let bouncing = display.is_bouncing(Instant::now());
        let tomatoes = if display.completed == 0 {
            Line::from(Span::styled("no tomatoes yet", dim_style))
        } else if display.completed <= MAX_TOMATOES {
            let mut spans: Vec<Span> = (0..display.completed).map(|_| Span::raw("🍅 ")).collect();
            if bouncing {
                spans.push(Span::styled("✨", bold_style.fg(Color::Yellow)));
            }
            Line::from(spans)
        } else {
            Line::from(vec![
                Span::raw("🍅 "),
                Span::styled(format!("x {}", display.completed), bold_style),
            ])
        };
        Paragraph::new(tomatoes)
            .alignment(Alignment::Center)
            .render(chunks[3], buf);

        let key = |label: &'static str, enabled: bool| {
            if enabled {
                Span::styled(label, bold_style)
            } else {
                Span::styled(label, dim_style)
            }
        };
        let sound = if state.sound_enabled {
            "🔊 sound on"
        } else {
            "🔇 sound off"
        };
        Paragraph::new(Line::from(vec![
            key("(s)tart", !state.running),
            Span::raw("  "),
            key("(p)ause", state.running),
            Span::raw("  (r)eset  (w)ork  (b)reak  (m)ute  (x) dismiss  (q)uit   "),
            Span::styled(sound, Style::default().fg(Color::Gray)),
        ]))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(chunks[4], buf);

        render_banners(self.controller.announcer().banners().iter(), area, buf);
    }
}

/// Newest banners in the top-right corner, newest on top.
fn render_banners<'a>(banners: impl DoubleEndedIterator<Item = &'a Banner>, area: Rect, buf: &mut Buffer) {
    let width = BANNER_MAX_WIDTH.min(area.width);
    if width < 6 {
        return;
    }
    let inner_width = (width - 2) as usize;
    let mut y = area.y;

    for banner in banners.rev().take(MAX_BANNERS) {
        let body_lines: u16 = banner
            .body
            .lines()
            .map(|l| l.width().div_ceil(inner_width).max(1) as u16)
            .sum();
        let height = body_lines + 2;
        if y + height > area.y + area.height {
            break;
        }

        let rect = Rect::new(area.x + area.width - width, y, width, height);
        Clear.render(rect, buf);
        Paragraph::new(banner.body.as_str())
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Red))
                    .title(format!("{} {}", banner.title, banner.posted_wall.format("%H:%M")))
                    .title(Line::from("[x]").right_aligned()),
            )
            .render(rect, buf);

        y += height;
    }
}
