use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::{Action, App, InputState, Pane};
use crate::audio::{PlaybackController, PlaybackEngine, PlayerStatus, RodioEngine};
use crate::config;
use crate::library::DiscoveryWorker;
use crate::ui;

/// Main terminal event loop: folds in discovery replies and engine events,
/// draws, and carries out key actions. Returns `Ok(())` when shutdown is
/// requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    player: &mut PlaybackController<RodioEngine>,
    worker: &mut DiscoveryWorker,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut input = InputState::default();

    loop {
        for reply in worker.poll() {
            app.apply_reply(reply, player);
        }
        for engine_event in player.engine_mut().drain_events() {
            player.handle_engine_event(engine_event);
        }
        app.follow(player.state().current_index);

        terminal.draw(|f| ui::draw(f, app, player, settings))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                let Some(action) = input.action_for_key(key, settings.controls.scrub_seconds)
                else {
                    continue;
                };
                tracing::trace!(?action, "key action");
                if perform(action, settings, app, player, worker) {
                    player.engine().quit_softly();
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Carry out `action`. Returns true when the app should quit.
fn perform<E: PlaybackEngine>(
    action: Action,
    settings: &config::Settings,
    app: &mut App,
    player: &mut PlaybackController<E>,
    worker: &mut DiscoveryWorker,
) -> bool {
    let track_count = player.queue().len();

    match action {
        Action::Quit => return true,
        Action::SwitchPane => app.toggle_focus(),
        Action::CursorDown => app.next(track_count),
        Action::CursorUp => app.prev(track_count),
        Action::CursorFirst => app.select_first(),
        Action::CursorLast => app.select_last(track_count),
        Action::CursorToPlaying => {
            app.focus = Pane::Tracks;
            app.follow_playback_on();
            app.follow(player.state().current_index);
        }
        Action::Activate => match app.focus {
            Pane::Tracks => {
                let selected = app.selected_track;
                let is_playing_selected = player.status() == PlayerStatus::Playing
                    && player.state().current_index == Some(selected);
                if !is_playing_selected && player.play_track(selected, true) {
                    app.follow_playback_on();
                }
            }
            Pane::Albums => {
                if let Some(folder) = app.selected_album().map(|a| a.folder.clone()) {
                    match worker.request_tracks(folder.clone(), true) {
                        Ok(_) => {
                            app.tracks_requested(folder);
                            app.focus = Pane::Tracks;
                        }
                        Err(e) => app.request_failed(&e),
                    }
                }
            }
        },
        Action::TogglePlayPause => {
            app.follow_playback_on();
            player.toggle_play_pause();
        }
        Action::Next => {
            app.follow_playback_on();
            player.next();
        }
        Action::Previous => {
            app.follow_playback_on();
            player.previous();
        }
        Action::SeekBy(secs) => {
            player.seek_by(secs);
        }
        Action::SeekTo(fraction) => {
            player.seek(fraction);
        }
        Action::VolumeUp => player.change_volume(settings.controls.volume_step),
        Action::VolumeDown => player.change_volume(-settings.controls.volume_step),
        Action::ToggleMute => player.toggle_mute(),
        Action::Reload => {
            match worker.request_albums() {
                Ok(_) => app.albums_requested(),
                Err(e) => app.request_failed(&e),
            }
        }
    }

    false
}
