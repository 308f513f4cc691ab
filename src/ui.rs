//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, Padding, Paragraph, Wrap},
};
use std::time::Duration;

use crate::app::{App, Pane};
use crate::audio::{PlaybackInfo, PlayerState};
use crate::config::{ControlsSettings, TimeField, TrackDisplayField, UiSettings};
use crate::lyrics;

/// Render the controls help text, incorporating seek seconds.
fn controls_text(seek_seconds: u64) -> String {
    [
        "[j/k] up/down".to_string(),
        "[h/l] prev/next song".to_string(),
        format!("[H/L] seek -/+{}s", seek_seconds),
        "[enter] play".to_string(),
        "[space/p] play/pause".to_string(),
        "[tab] pane".to_string(),
        "[J/K] move".to_string(),
        "[x] remove".to_string(),
        "[gg/G] top/bottom".to_string(),
        "[/] filter".to_string(),
        "[s] shuffle".to_string(),
        "[r] loop".to_string(),
        "[+/-] volume".to_string(),
        "[q] quit".to_string(),
    ]
    .join(" | ")
}

/// Format a `Duration` as `MM:SS`.
fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Build the "now playing" track text according to `ui` settings.
fn now_playing_track_text(app: &App, track_key: &str, ui: &UiSettings) -> String {
    let Some(track) = app.queue.catalog().iter().find(|t| t.key() == track_key) else {
        return String::new();
    };

    let mut parts: Vec<String> = Vec::new();
    for f in &ui.now_playing_track_fields {
        let part = match f {
            TrackDisplayField::Display => track.display(),
            TrackDisplayField::Title => track.title.clone(),
            TrackDisplayField::Artist => track.artist.clone(),
            TrackDisplayField::Album => track.album.clone(),
            TrackDisplayField::Genre => track.genre.clone(),
        };
        if !part.trim().is_empty() {
            parts.push(part);
        }
    }

    if parts.is_empty() {
        track.display()
    } else {
        parts.join(&ui.now_playing_track_separator)
    }
}

/// Build the now-playing time text (elapsed/total/remaining) per `UiSettings`.
fn now_playing_time_text(
    elapsed: Duration,
    total: Option<Duration>,
    ui: &UiSettings,
) -> Option<String> {
    if ui.now_playing_time_fields.is_empty() {
        return None;
    }

    let mut parts: Vec<String> = Vec::new();
    for f in &ui.now_playing_time_fields {
        match f {
            TimeField::Elapsed => parts.push(format_mmss(elapsed)),
            TimeField::Total => {
                if let Some(t) = total {
                    parts.push(format_mmss(t));
                }
            }
            TimeField::Remaining => {
                if let Some(t) = total {
                    let rem = t.saturating_sub(elapsed);
                    parts.push(format!("-{}", format_mmss(rem)));
                }
            }
        }
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(&ui.now_playing_time_separator))
    }
}

// Window a list so the cursor stays centered once the list outgrows the
// viewport. Returns (start, end, cursor position inside the window).
fn centered_window(total: usize, height: usize, cursor: usize) -> (usize, usize, usize) {
    if total <= height || height == 0 {
        return (0, total, cursor);
    }
    let half = height / 2;
    let mut start = cursor.saturating_sub(half);
    if start + height > total {
        start = total - height;
    }
    (start, start + height, cursor - start)
}

fn pane_block(title: &str, focused: bool, app: &App) -> Block<'static> {
    let border_style = if focused {
        Style::default()
            .fg(app.palette.accent)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(format!(" {title} "))
}

/// Render the entire UI into the provided `frame` using `app` state and settings.
pub fn draw(
    frame: &mut Frame,
    app: &App,
    display: &[usize],
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let info = app
        .playback_handle
        .as_ref()
        .and_then(|h| h.lock().ok().map(|i| i.clone()))
        .unwrap_or_default();

    draw_header(frame, app, ui_settings, chunks[0]);

    let main = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[1]);
    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(main[1]);

    draw_catalog(frame, app, display, &info, main[0]);
    draw_queue(frame, app, &info, side[0]);
    draw_lyrics(frame, app, &info, side[1]);
    draw_media_bar(frame, app, &info, ui_settings, chunks[2]);

    let footer = Paragraph::new(controls_text(controls_settings.seek_seconds))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[3]);
}

fn draw_header(frame: &mut Frame, app: &App, ui_settings: &UiSettings, area: Rect) {
    let mut title = " rondo ".to_string();
    if app.filter_mode || !app.filter_query.trim().is_empty() {
        title = format!(" rondo | filter: {} ", app.filter_query);
    }

    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .style(Style::default().bg(app.palette.secondary))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, area);
}

fn draw_catalog(
    frame: &mut Frame,
    app: &App,
    display: &[usize],
    info: &PlaybackInfo,
    area: Rect,
) {
    let current_key = info.track.as_ref().map(|t| t.key().to_string());

    let total = display.len();
    let height = area.height.saturating_sub(2) as usize;
    let cursor = display
        .iter()
        .position(|&i| i == app.selected)
        .unwrap_or(0);
    let (start, end, cursor_in_window) = centered_window(total, height, cursor);

    let items: Vec<ListItem> = display[start..end]
        .iter()
        .map(|&i| {
            let track = &app.queue.catalog()[i];
            let playing = current_key.as_deref() == Some(track.key());
            let marker = if playing { "♪ " } else { "  " };
            let line = Line::from(vec![
                Span::styled(marker, Style::default().fg(app.palette.accent)),
                Span::raw(track.display()),
            ]);
            ListItem::new(line)
        })
        .collect();

    let list = List::new(items)
        .block(pane_block("tracks", app.pane == Pane::Catalog, app))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ratatui::widgets::ListState::default();
    if total > 0 {
        state.select(Some(cursor_in_window));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_queue(frame: &mut Frame, app: &App, info: &PlaybackInfo, area: Rect) {
    let current_key = info.track.as_ref().map(|t| t.key().to_string());

    let total = app.queue.len();
    let height = area.height.saturating_sub(2) as usize;
    let (start, end, cursor_in_window) =
        centered_window(total, height, app.queue_selected.min(total.saturating_sub(1)));

    let items: Vec<ListItem> = app.queue.tracks()[start..end]
        .iter()
        .map(|track| {
            let playing = current_key.as_deref() == Some(track.key());
            let marker = if playing { "▶ " } else { "  " };
            let line = Line::from(vec![
                Span::styled(marker, Style::default().fg(app.palette.accent)),
                Span::raw(track.display()),
            ]);
            ListItem::new(line)
        })
        .collect();

    let list = List::new(items)
        .block(pane_block("queue", app.pane == Pane::Queue, app))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ratatui::widgets::ListState::default();
    if total > 0 && app.pane == Pane::Queue {
        state.select(Some(cursor_in_window));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_lyrics(frame: &mut Frame, app: &App, info: &PlaybackInfo, area: Rect) {
    let lines: Vec<crate::catalog::LyricLine> = app
        .lyrics_handle
        .as_ref()
        .and_then(|h| h.lock().ok().map(|l| l.clone()))
        .unwrap_or_default();

    let block = pane_block("lyrics", app.pane == Pane::Lyrics, app);

    if lines.is_empty() {
        let placeholder = if info.track.is_some() {
            "(no lyrics)"
        } else {
            "(nothing playing)"
        };
        let par = Paragraph::new(placeholder)
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(par, area);
        return;
    }

    let active = lyrics::active_line_index(&lines, info.elapsed.as_secs_f64());

    let total = lines.len();
    let height = area.height.saturating_sub(2) as usize;
    let (start, end, _) = centered_window(total, height, active.unwrap_or(0));

    let rendered: Vec<Line> = lines[start..end]
        .iter()
        .enumerate()
        .map(|(offset, line)| {
            let is_active = Some(start + offset) == active;
            if is_active {
                Line::from(Span::styled(
                    line.text.clone(),
                    Style::default()
                        .fg(app.palette.accent)
                        .add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(Span::raw(line.text.clone()))
            }
        })
        .collect();

    let par = Paragraph::new(rendered)
        .alignment(Alignment::Center)
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(par, area);
}

fn draw_media_bar(
    frame: &mut Frame,
    app: &App,
    info: &PlaybackInfo,
    ui_settings: &UiSettings,
    area: Rect,
) {
    let state_text = match info.state {
        PlayerState::Idle => "Stopped",
        PlayerState::Loading => "Loading",
        PlayerState::Playing => "Playing",
        PlayerState::Paused => "Paused",
    };

    let mut label = match info.track.as_ref() {
        Some(track) => {
            let song = now_playing_track_text(app, track.key(), ui_settings);
            match now_playing_time_text(info.elapsed, info.duration, ui_settings) {
                Some(time) => format!("{state_text}: {song} [{time}]"),
                None => format!("{state_text}: {song}"),
            }
        }
        None => state_text.to_string(),
    };
    label.push_str(&format!(
        "  vol {:>3}%  shuffle {}  loop {}",
        (info.volume * 100.0).round() as u32,
        if app.shuffle { "on" } else { "off" },
        if app.looping { "on" } else { "off" },
    ));

    let ratio = match info.duration {
        Some(d) if !d.is_zero() => (info.elapsed.as_secs_f64() / d.as_secs_f64()).clamp(0.0, 1.0),
        _ => 0.0,
    };

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" now playing ")
                .padding(Padding {
                    left: 1,
                    right: 1,
                    top: 0,
                    bottom: 0,
                }),
        )
        .gauge_style(Style::default().fg(app.palette.accent).bg(app.palette.primary))
        .label(label)
        .ratio(ratio);
    frame.render_widget(gauge, area);
}
