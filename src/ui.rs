//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`. It is
//! presentation glue only: everything it draws comes in as plain data.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem, Padding, Paragraph, Sparkline, Wrap},
};
use std::time::Duration;

use crate::audio::BIN_COUNT;
use crate::catalog::Track;
use crate::config::UiSettings;
use crate::playlist::Mood;
use crate::transport::{PlayerState, RepeatMode};

/// Everything the renderer needs for one frame.
pub struct FrameData<'a> {
    pub tracks: &'a [Track],
    /// Indices into `tracks` visible under the active playlist.
    pub view: &'a [usize],
    /// Cursor position within `view`.
    pub selected: usize,
    pub state: &'a PlayerState,
    /// Name of the active smart playlist, if any.
    pub playlist_name: Option<&'a str>,
    /// Latest spectrum snapshot; all-zero until playback starts.
    pub spectrum: &'a [u8; BIN_COUNT],
    pub enriching: bool,
}

/// Render the controls help text, incorporating scrub seconds.
fn controls_text(scrub_seconds: u64) -> String {
    [
        "[j/k] up/down".to_string(),
        "[enter] play selected".to_string(),
        "[space/p] play/pause".to_string(),
        "[h/l] prev/next".to_string(),
        format!("[H/L] scrub -/+{}s", scrub_seconds),
        "[1-6] mood playlist".to_string(),
        "[0] all tracks".to_string(),
        "[s] shuffle".to_string(),
        "[r] repeat mode".to_string(),
        "[-/+] volume".to_string(),
        "[q] quit".to_string(),
    ]
    .join(" | ")
}

/// Format a `Duration` as `MM:SS`.
fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Map a vibe color token onto a terminal color. Unknown tokens fall back
/// to the default foreground so a misbehaving service cannot break the UI.
fn vibe_color(token: &str) -> Color {
    match token.to_ascii_lowercase().as_str() {
        "red" | "crimson" => Color::Red,
        "orange" | "amber" => Color::LightRed,
        "yellow" | "gold" => Color::Yellow,
        "green" | "emerald" => Color::Green,
        "teal" | "cyan" => Color::Cyan,
        "blue" | "azure" => Color::Blue,
        "purple" | "violet" | "magenta" => Color::Magenta,
        "pink" => Color::LightMagenta,
        "white" | "silver" => Color::White,
        "gray" | "grey" => Color::DarkGray,
        _ => Color::Reset,
    }
}

/// Label for one track row: display text plus a mood tag once enriched.
fn track_line(track: &Track) -> (String, Style) {
    match &track.insight {
        Some(insight) => (
            format!("{}  [{}]", track.display(), insight.mood),
            Style::default().fg(vibe_color(&insight.vibe)),
        ),
        None => (track.display(), Style::default()),
    }
}

/// Render the entire UI into the provided `frame`.
pub fn draw(frame: &mut Frame, data: &FrameData, ui_settings: &UiSettings) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Min(1),
            Constraint::Length(6),
            Constraint::Length(3),
        ])
        .split(frame.area());

    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" brio ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    // Status box
    let current_track = data
        .state
        .current_id
        .and_then(|id| data.tracks.iter().find(|t| t.id == id));

    let status = {
        let mut parts: Vec<String> = Vec::new();

        let repeat_text = match data.state.repeat {
            RepeatMode::Off => "REPEAT: Off",
            RepeatMode::All => "REPEAT: All",
            RepeatMode::One => "REPEAT: One",
        };
        parts.push(repeat_text.to_string());

        if data.state.shuffle {
            parts.push("Shuffle: ON".to_string());
        } else {
            parts.push("Shuffle: OFF".to_string());
        }

        if let Some(name) = data.playlist_name {
            parts.push(format!("Playlist: {}", name));
        }

        if let Some(track) = current_track {
            let time = match data.state.duration {
                Some(total) => format!(
                    "{}/{}",
                    format_mmss(data.state.position),
                    format_mmss(total)
                ),
                None => format_mmss(data.state.position),
            };
            parts.push(format!("Song: {} [{}]", track.display(), time));
            parts.push(
                if data.state.is_playing {
                    "Playing"
                } else {
                    "Paused"
                }
                .to_string(),
            );
            if let Some(insight) = &track.insight {
                parts.push(insight.fact.clone());
            }
        } else {
            parts.push("Stopped".to_string());
        }

        parts.push(format!("Vol: {:.0}%", data.state.volume * 100.0));

        if data.enriching {
            parts.push("enriching...".to_string());
        }

        parts.join(" • ")
    };

    let status_style = current_track
        .and_then(|t| t.insight.as_ref())
        .map(|i| Style::default().fg(vibe_color(&i.vibe)))
        .unwrap_or_default();

    let status_par = Paragraph::new(status)
        .style(status_style)
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

    // Track list
    {
        // Center the selected item when possible by creating a visible window.
        // Only build ListItems for the visible window.
        let total = data.view.len();
        let list_height = chunks[2].height.saturating_sub(2) as usize;
        let sel_pos = data.selected.min(total.saturating_sub(1));
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

        let visible_items: Vec<ListItem> = data.view[start..end]
            .iter()
            .map(|&i| {
                let (text, style) = track_line(&data.tracks[i]);
                let marker = if data.state.current_id == Some(data.tracks[i].id) {
                    "♪ "
                } else {
                    "  "
                };
                ListItem::new(format!("{marker}{text}")).style(style)
            })
            .collect();

        let title = match data.playlist_name {
            Some(name) => format!(" tracks ({}) ", name),
            None => " tracks ".to_string(),
        };
        let list = List::new(visible_items)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut list_state = ratatui::widgets::ListState::default();
        if total > 0 {
            list_state.select(Some(selected_pos_in_visible));
        }
        frame.render_stateful_widget(list, chunks[2], &mut list_state);
    }

    // Visualizer
    {
        let width = chunks[3].width.saturating_sub(2) as usize;
        // Resample the bins to the available width so the bars fill the box.
        let bars: Vec<u64> = if width == 0 {
            Vec::new()
        } else {
            (0..width.min(BIN_COUNT))
                .map(|i| {
                    let bin = i * BIN_COUNT / width.min(BIN_COUNT).max(1);
                    u64::from(data.spectrum[bin.min(BIN_COUNT - 1)])
                })
                .collect()
        };

        let viz_color = current_track
            .and_then(|t| t.insight.as_ref())
            .map(|i| vibe_color(&i.vibe))
            .unwrap_or(Color::Cyan);

        let sparkline = Sparkline::default()
            .block(Block::default().borders(Borders::ALL).title(" spectrum "))
            .data(&bars)
            .max(255)
            .style(Style::default().fg(viz_color));
        frame.render_widget(sparkline, chunks[3]);
    }

    // Controls footer
    let footer = Paragraph::new(controls_text(ui_settings.scrub_seconds))
        .block(Block::default().borders(Borders::ALL).title(" controls "))
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[4]);
}

/// Mood bound to each numeric playlist key, in key order 1..=6.
pub fn mood_for_key(n: u8) -> Option<Mood> {
    Mood::ALL.get(usize::from(n).checked_sub(1)?).copied()
}
