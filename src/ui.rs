//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::Line,
    widgets::{Block, Borders, LineGauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock};

use crate::app::{App, Pane};
use crate::audio::{PlaybackController, PlaybackEngine, PlayerStatus};
use crate::config::{ControlsSettings, Settings, UiSettings};

static CONTROLS_MAP: LazyLock<BTreeMap<String, String>> = LazyLock::new(|| {
    let mut map: BTreeMap<String, String> = BTreeMap::new();
    map.insert("tab".to_string(), "tracks/albums".to_string());
    map.insert("j/k".to_string(), "up/down".to_string());
    map.insert("gg/G".to_string(), "top/bottom".to_string());
    map.insert("zz".to_string(), "to playing".to_string());
    map.insert("enter".to_string(), "play song / open album".to_string());
    map.insert("space/p".to_string(), "play/pause".to_string());
    map.insert("h/l".to_string(), "prev/next song".to_string());
    // H/L and +/- are filled dynamically from config.
    map.insert("0-9".to_string(), "seek 0-90%".to_string());
    map.insert("m".to_string(), "mute".to_string());
    map.insert("r".to_string(), "reload".to_string());
    map.insert("q".to_string(), "quit".to_string());
    map
});

const PADDED: Padding = Padding {
    left: 1,
    right: 0,
    top: 0,
    bottom: 0,
};

/// Render the controls help text, incorporating configured steps.
fn controls_text(controls: &ControlsSettings) -> String {
    // Keep the rendered order stable and human-friendly.
    let order = [
        "tab", "j/k", "enter", "space/p", "h/l", "H/L", "0-9", "+/-", "m", "gg/G", "zz", "r", "q",
    ];
    order
        .iter()
        .filter_map(|k| match *k {
            "H/L" => Some(format!("[H/L] scrub -/+{}s", controls.scrub_seconds)),
            "+/-" => Some(format!(
                "[+/-] volume ±{}%",
                (controls.volume_step * 100.0).round()
            )),
            _ => CONTROLS_MAP.get(*k).map(|v| format!("[{}] {}", k, v)),
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

fn status_label(status: PlayerStatus) -> &'static str {
    match status {
        PlayerStatus::Empty => "No tracks",
        PlayerStatus::Ready => "Ready",
        PlayerStatus::Playing => "Playing",
        PlayerStatus::Paused => "Paused",
        PlayerStatus::Ended => "Finished",
    }
}

fn volume_text(volume: f32, muted: bool) -> String {
    if muted {
        "Volume: muted".to_string()
    } else {
        format!("Volume: {:.0}%", volume * 100.0)
    }
}

/// Visible window `(start, end, selected_in_window)` that keeps the cursor
/// centered when the list is taller than the area.
fn visible_window(total: usize, height: usize, selected: usize) -> (usize, usize, usize) {
    let selected = selected.min(total.saturating_sub(1));
    if total <= height || height == 0 {
        return (0, total, selected);
    }
    let half = height / 2;
    let mut start = selected.saturating_sub(half);
    if start + height > total {
        start = total - height;
    }
    (start, start + height, selected - start)
}

fn pane_block(title: &str, focused: bool) -> Block<'_> {
    let block = Block::default().borders(Borders::ALL).title(title);
    if focused {
        block.border_style(Style::default().add_modifier(Modifier::BOLD))
    } else {
        block
    }
}

/// Render the entire UI into the provided `frame` using `app` state and settings.
pub fn draw<E: PlaybackEngine>(
    frame: &mut Frame,
    app: &App,
    player: &PlaybackController<E>,
    settings: &Settings,
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
    let header = Paragraph::new(settings.ui.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" spindle ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    draw_status(frame, chunks[1], app, player, &settings.ui);

    let main = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[2]);
    draw_tracks(frame, main[0], app, player);
    draw_albums(frame, main[1], app);

    let footer = Paragraph::new(controls_text(&settings.controls))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(PADDED),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[3]);
}

fn draw_status<E: PlaybackEngine>(
    frame: &mut Frame,
    area: Rect,
    app: &App,
    player: &PlaybackController<E>,
    ui: &UiSettings,
) {
    let state = player.state();
    let progress = player.progress();

    let mut parts: Vec<String> = vec![status_label(state.status).to_string()];
    if let Some(track) = player.current_track() {
        parts.push(format!("Song: {}", track.display()));
    }
    if let Some(folder) = &state.folder {
        parts.push(format!("Folder: {}", folder.display_name()));
    }
    let now_playing = parts.join(" • ");

    let mut details = format!(
        "{}{}{} (-{})",
        progress.elapsed, ui.time_separator, progress.total, progress.remaining
    );
    details.push_str(" • ");
    details.push_str(&volume_text(state.volume, player.is_muted()));
    details.push_str(if app.follow_playback {
        " • CURSOR: Follow"
    } else {
        " • CURSOR: Free-roam"
    });

    let block = Block::bordered().padding(PADDED).title(" status ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

    let first_line = match &app.status {
        Some(message) => Line::from(vec![
            now_playing.into(),
            " • ".into(),
            message.clone().italic(),
        ]),
        None => Line::from(now_playing),
    };
    frame.render_widget(Paragraph::new(first_line), rows[0]);
    frame.render_widget(Paragraph::new(details), rows[1]);

    let gauge = LineGauge::default()
        .ratio(progress.fraction)
        .filled_style(Style::default().add_modifier(Modifier::BOLD));
    frame.render_widget(gauge, rows[2]);
}

fn draw_tracks<E: PlaybackEngine>(
    frame: &mut Frame,
    area: Rect,
    app: &App,
    player: &PlaybackController<E>,
) {
    let tracks = player.queue().tracks();
    let playing = player.state().current_index;

    let title = if app.pending_folder.is_some() {
        " tracks (loading) ".to_string()
    } else {
        format!(" tracks ({}) ", tracks.len())
    };

    // Only build ListItems for the visible window.
    let list_height = area.height.saturating_sub(2) as usize;
    let (start, end, selected_in_window) =
        visible_window(tracks.len(), list_height, app.selected_track);

    let items: Vec<ListItem> = tracks[start..end]
        .iter()
        .enumerate()
        .map(|(offset, track)| {
            if playing == Some(start + offset) {
                ListItem::new(format!("♪ {}", track.display())).bold()
            } else {
                ListItem::new(format!("  {}", track.display()))
            }
        })
        .collect();

    let list = List::new(items)
        .block(pane_block(&title, app.focus == Pane::Tracks))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if !tracks.is_empty() {
        state.select(Some(selected_in_window));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_albums(frame: &mut Frame, area: Rect, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(6)])
        .split(area);

    let title = if app.albums_loading {
        " albums (loading) ".to_string()
    } else {
        format!(" albums ({}) ", app.albums.len())
    };

    let list_height = rows[0].height.saturating_sub(2) as usize;
    let (start, end, selected_in_window) =
        visible_window(app.albums.len(), list_height, app.selected_album);
    let items: Vec<ListItem> = app.albums[start..end]
        .iter()
        .map(|album| ListItem::new(album.title.as_str()))
        .collect();

    let list = List::new(items)
        .block(pane_block(&title, app.focus == Pane::Albums))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if !app.albums.is_empty() {
        state.select(Some(selected_in_window));
    }
    frame.render_stateful_widget(list, rows[0], &mut state);

    let details = match app.selected_album() {
        Some(album) => {
            let description = if album.description.trim().is_empty() {
                "-"
            } else {
                album.description.as_str()
            };
            format!(
                "{}\nCover: {}\nFolder: {}",
                description,
                album.cover,
                album.folder.display_name()
            )
        }
        None => "No album selected".to_string(),
    };
    let details = Paragraph::new(details)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" album ")
                .padding(PADDED),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(details, rows[1]);
}
