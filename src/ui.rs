//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Clear, List, ListItem, Padding, Paragraph, Wrap},
};

use crate::app::App;
use crate::config::{ControlsSettings, UiSettings};
use crate::engine::PlaybackState;
use crate::library::format_mmss;

/// Render the controls help text, incorporating scrub seconds.
fn controls_text(scrub_seconds: u64) -> String {
    [
        "[j/k] up/down".to_string(),
        "[h/l] prev/next song".to_string(),
        format!("[H/L] scrub -/+{}s", scrub_seconds),
        "[enter] play selected song".to_string(),
        "[space/p] play/pause".to_string(),
        "[gg/G] top/bottom".to_string(),
        "[r] replay once".to_string(),
        "[x] stop".to_string(),
        "[K] metadata".to_string(),
        "[q] quit".to_string(),
    ]
    .join(" | ")
}

fn state_text(state: PlaybackState) -> &'static str {
    match state {
        PlaybackState::Invalid => "Stopped",
        PlaybackState::Playing => "Playing",
        PlaybackState::Paused => "Paused",
        PlaybackState::Resumed => "Resumed",
        PlaybackState::Completed => "Completed",
    }
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

/// Render the entire UI into the provided `frame` using `app` state and settings.
pub fn draw(
    frame: &mut Frame,
    app: &App,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(frame.area());

    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" encore ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    // Status box
    let status = {
        let mut parts: Vec<String> = Vec::new();

        parts.push(state_text(app.playback).to_string());

        if let Some(track) = app.playing_track() {
            let time = match track.duration {
                Some(total) => format!("{} / {}", format_mmss(app.elapsed), format_mmss(total)),
                None => format_mmss(app.elapsed),
            };
            parts.push(format!("Song: {} [{}]", track.display, time));
        }

        if app.replay {
            parts.push("Replay: once".to_string());
        }

        if let Some(dir) = &app.current_dir {
            parts.push(format!("Dir: {}", dir));
        }

        parts.join(" • ")
    };

    let status_par = Paragraph::new(status)
        .block(
            Block::bordered()
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                })
                .title(" status "),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(status_par, chunks[1]);

    // Main list: center the selected item by rendering a visible window only.
    {
        let total = app.tracks.len();
        let list_height = chunks[2].height as usize;
        let sel_pos = app.selected.min(total.saturating_sub(1));
        let (start, end, selected_pos_in_visible) = if total <= list_height || list_height == 0 {
            (0, total, sel_pos)
        } else {
            let half = list_height / 2;
            let mut start = if sel_pos > half { sel_pos - half } else { 0 };
            if start + list_height > total {
                start = total - list_height;
            }
            (start, start + list_height, sel_pos - start)
        };

        let visible_items: Vec<ListItem> = app.tracks[start..end]
            .iter()
            .map(|t| ListItem::new(t.display.as_str()))
            .collect();

        let list = List::new(visible_items)
            .block(Block::default().borders(Borders::ALL).title(" tracks "))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = ratatui::widgets::ListState::default();
        if total > 0 {
            state.select(Some(selected_pos_in_visible));
        }
        frame.render_stateful_widget(list, chunks[2], &mut state);
    }

    // Overlay metadata popup (keeps list visible under it)
    if app.metadata_window {
        let popup_area = centered_rect_sized(72, 10, chunks[2]);
        frame.render_widget(Clear, popup_area);

        let meta = if let Some(track) = app.tracks.get(app.selected) {
            let dur = track
                .duration
                .map(format_mmss)
                .unwrap_or_else(|| "-".to_string());
            let number = if track.track_number > 0 {
                track.track_number.to_string()
            } else {
                "-".to_string()
            };
            let year = if track.year > 0 {
                track.year.to_string()
            } else {
                "-".to_string()
            };
            format!(
                "Title: {}\nArtist: {}\nAlbum: {}\nTrack: {}\nYear: {}\nDuration: {}\nPath: {}",
                track.title,
                track.artist.as_deref().unwrap_or("-"),
                track.album.as_deref().unwrap_or("-"),
                number,
                year,
                dur,
                track.locator.display()
            )
        } else {
            "No track selected".to_string()
        };
        let meta_paragraph = Paragraph::new(meta)
            .block(
                Block::default()
                    .padding(Padding {
                        left: 1,
                        right: 0,
                        top: 0,
                        bottom: 0,
                    })
                    .borders(Borders::ALL)
                    .title(" metadata (K closes) "),
            )
            .wrap(Wrap { trim: true });
        frame.render_widget(meta_paragraph, popup_area);
    }

    let footer = Paragraph::new(controls_text(controls_settings.scrub_seconds))
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
