use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::*;
use crate::audio::{PlaybackController, PlaybackEngine, PlayerStatus};
use crate::config::PlaybackSettings;
use crate::library::{Album, DiscoveryError, DiscoveryReply, Folder, Queue, Track};

#[derive(Default)]
struct FakeEngine {
    loads: Vec<String>,
    paused: bool,
    volume: f32,
}

impl PlaybackEngine for FakeEngine {
    fn load(&mut self, address: &str) {
        self.loads.push(address.to_string());
        self.paused = true;
    }
    fn play(&mut self) {
        self.paused = false;
    }
    fn pause(&mut self) {
        self.paused = true;
    }
    fn is_paused(&self) -> bool {
        self.paused
    }
    fn position(&self) -> Duration {
        Duration::ZERO
    }
    fn seek(&mut self, _position: Duration) {}
    fn duration(&self) -> Option<Duration> {
        None
    }
    fn volume(&self) -> f32 {
        self.volume
    }
    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }
}

fn player() -> PlaybackController<FakeEngine> {
    PlaybackController::new(FakeEngine::default(), &PlaybackSettings::default())
}

fn album(name: &str) -> Album {
    let folder = Folder::new(&format!("songs/{name}"));
    Album {
        cover: folder.join("cover.jpg"),
        folder,
        title: name.to_uppercase(),
        description: String::new(),
    }
}

fn tracks_reply(folder: &str, names: &[&str], autostart: bool) -> DiscoveryReply {
    let folder = Folder::new(folder);
    DiscoveryReply::Tracks {
        token: 1,
        folder: folder.clone(),
        autostart,
        result: Ok(Queue::new(
            folder,
            names.iter().map(|n| Track::new(*n)).collect(),
        )),
    }
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

#[test]
fn startup_reply_primes_first_track() {
    let mut app = App::new(true);
    let mut p = player();
    app.tracks_requested(Folder::new("songs/ncs"));
    assert!(app.status.is_some());

    app.apply_reply(tracks_reply("songs/ncs", &["a.mp3", "b.mp3"], false), &mut p);

    assert_eq!(app.pending_folder, None);
    assert_eq!(app.status, None);
    assert_eq!(p.status(), PlayerStatus::Paused);
    assert_eq!(p.engine().loads, vec!["songs/ncs/a.mp3"]);
}

#[test]
fn opening_an_album_plays_its_first_track() {
    let mut app = App::new(true);
    let mut p = player();
    app.apply_reply(tracks_reply("songs/lofi", &["x.mp3"], true), &mut p);

    assert_eq!(p.status(), PlayerStatus::Playing);
    assert_eq!(p.engine().loads, vec!["songs/lofi/x.mp3"]);
    assert_eq!(app.selected_track, 0);
}

#[test]
fn empty_listing_reports_no_playable_tracks() {
    let mut app = App::new(true);
    let mut p = player();
    app.apply_reply(tracks_reply("songs/Chill%20Vibes", &[], true), &mut p);

    assert_eq!(p.status(), PlayerStatus::Empty);
    assert!(p.engine().loads.is_empty());
    assert_eq!(
        app.status.as_deref(),
        Some("no playable tracks in Chill Vibes")
    );
}

#[test]
fn failed_listing_empties_queue_and_surfaces_error() {
    let mut app = App::new(true);
    let mut p = player();
    app.apply_reply(tracks_reply("songs/ncs", &["a.mp3"], false), &mut p);

    app.apply_reply(
        DiscoveryReply::Tracks {
            token: 2,
            folder: Folder::new("songs/gone"),
            autostart: true,
            result: Err(DiscoveryError::Status {
                url: "http://host/songs/gone/".into(),
                status: 404,
            }),
        },
        &mut p,
    );

    assert_eq!(p.status(), PlayerStatus::Empty);
    assert!(p.queue().is_empty());
    assert_eq!(p.queue().folder(), &Folder::new("songs/gone"));
    let status = app.status.clone().unwrap_or_default();
    assert!(status.contains("songs/gone"), "{status}");
    assert!(status.contains("404"), "{status}");
}

#[test]
fn undelivered_request_clears_loading_state() {
    let mut app = App::new(true);
    app.tracks_requested(Folder::new("songs/ncs"));
    app.albums_requested();

    app.request_failed(&DiscoveryError::WorkerStopped);

    assert_eq!(app.pending_folder, None);
    assert!(!app.albums_loading);
    assert_eq!(app.status.as_deref(), Some("discovery worker has stopped"));
}

#[test]
fn album_reply_replaces_list_and_clamps_cursor() {
    let mut app = App::new(true);
    let mut p = player();
    app.albums_requested();
    app.selected_album = 5;

    app.apply_reply(
        DiscoveryReply::Albums {
            token: 1,
            result: Ok(vec![album("ncs"), album("lofi")]),
        },
        &mut p,
    );
    assert!(!app.albums_loading);
    assert_eq!(app.albums.len(), 2);
    assert_eq!(app.selected_album, 1);
    assert_eq!(app.selected_album().map(|a| a.title.as_str()), Some("LOFI"));

    app.apply_reply(
        DiscoveryReply::Albums {
            token: 2,
            result: Err(DiscoveryError::Status {
                url: "http://host/songs/".into(),
                status: 500,
            }),
        },
        &mut p,
    );
    assert!(app.albums.is_empty());
    assert_eq!(app.selected_album(), None);
    assert!(app.status.is_some());
}

#[test]
fn cursor_moves_wrap_within_the_focused_list() {
    let mut app = App::new(true);
    app.albums = vec![album("a"), album("b")];

    app.prev(3);
    assert_eq!(app.selected_track, 2);
    app.next(3);
    assert_eq!(app.selected_track, 0);

    app.toggle_focus();
    assert_eq!(app.focus, Pane::Albums);
    app.next(3);
    app.next(3);
    assert_eq!(app.selected_album, 0);
    app.select_last(3);
    assert_eq!(app.selected_album, 1);
    assert_eq!(app.selected_track, 0);
}

#[test]
fn cursor_moves_on_empty_list_are_ignored() {
    let mut app = App::new(true);
    app.next(0);
    app.prev(0);
    app.select_last(0);
    assert_eq!(app.selected_track, 0);
}

#[test]
fn moving_track_cursor_stops_following_playback() {
    let mut app = App::new(true);
    app.follow(Some(2));
    assert_eq!(app.selected_track, 2);

    app.prev(4);
    assert!(!app.follow_playback);
    app.follow(Some(3));
    assert_eq!(app.selected_track, 1);

    app.follow_playback_on();
    app.follow(Some(3));
    assert_eq!(app.selected_track, 3);
}

#[test]
fn album_cursor_leaves_follow_mode_alone() {
    let mut app = App::new(true);
    app.albums = vec![album("a"), album("b")];
    app.toggle_focus();
    app.next(0);
    assert!(app.follow_playback);
}

#[test]
fn plain_keys_map_to_actions() {
    let mut input = InputState::default();
    let mut map = |code| input.action_for_key(key(code), 5);

    assert_eq!(map(KeyCode::Char('q')), Some(Action::Quit));
    assert_eq!(map(KeyCode::Tab), Some(Action::SwitchPane));
    assert_eq!(map(KeyCode::Char(' ')), Some(Action::TogglePlayPause));
    assert_eq!(map(KeyCode::Char('l')), Some(Action::Next));
    assert_eq!(map(KeyCode::Char('h')), Some(Action::Previous));
    assert_eq!(map(KeyCode::Char('L')), Some(Action::SeekBy(5)));
    assert_eq!(map(KeyCode::Char('H')), Some(Action::SeekBy(-5)));
    assert_eq!(map(KeyCode::Char('5')), Some(Action::SeekTo(0.5)));
    assert_eq!(map(KeyCode::Char('0')), Some(Action::SeekTo(0.0)));
    assert_eq!(map(KeyCode::Char('m')), Some(Action::ToggleMute));
    assert_eq!(map(KeyCode::Char('x')), None);
}

#[test]
fn two_key_sequences() {
    let mut input = InputState::default();

    assert_eq!(input.action_for_key(key(KeyCode::Char('g')), 5), None);
    assert_eq!(
        input.action_for_key(key(KeyCode::Char('g')), 5),
        Some(Action::CursorFirst)
    );

    assert_eq!(input.action_for_key(key(KeyCode::Char('z')), 5), None);
    assert_eq!(
        input.action_for_key(key(KeyCode::Char('z')), 5),
        Some(Action::CursorToPlaying)
    );

    // A different key in between cancels the prefix.
    assert_eq!(input.action_for_key(key(KeyCode::Char('g')), 5), None);
    assert_eq!(
        input.action_for_key(key(KeyCode::Char('j')), 5),
        Some(Action::CursorDown)
    );
    assert_eq!(input.action_for_key(key(KeyCode::Char('g')), 5), None);
}

#[test]
fn ctrl_c_quits() {
    let mut input = InputState::default();
    let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
    assert_eq!(input.action_for_key(ctrl_c, 5), Some(Action::Quit));
}
