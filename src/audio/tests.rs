use std::time::Duration;

use super::player::accept_event;
use super::queue::{next_index, previous_index};
use super::sink::extension_hint;
use super::*;
use crate::config::PlaybackSettings;
use crate::library::{Folder, Queue, Track};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Load(String),
    Play,
    Pause,
    Seek(Duration),
    SetVolume(f32),
}

#[derive(Debug)]
struct RecordingEngine {
    calls: Vec<Call>,
    paused: bool,
    position: Duration,
    duration: Option<Duration>,
    volume: f32,
}

impl Default for RecordingEngine {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            paused: true,
            position: Duration::ZERO,
            duration: None,
            volume: 1.0,
        }
    }
}

impl PlaybackEngine for RecordingEngine {
    fn load(&mut self, address: &str) {
        self.calls.push(Call::Load(address.to_string()));
        self.paused = true;
        self.position = Duration::ZERO;
    }

    fn play(&mut self) {
        self.calls.push(Call::Play);
        self.paused = false;
    }

    fn pause(&mut self) {
        self.calls.push(Call::Pause);
        self.paused = true;
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn position(&self) -> Duration {
        self.position
    }

    fn seek(&mut self, position: Duration) {
        self.calls.push(Call::Seek(position));
        self.position = position;
    }

    fn duration(&self) -> Option<Duration> {
        self.duration
    }

    fn volume(&self) -> f32 {
        self.volume
    }

    fn set_volume(&mut self, volume: f32) {
        self.calls.push(Call::SetVolume(volume));
        self.volume = volume;
    }
}

fn queue_of(names: &[&str]) -> Queue {
    Queue::new(
        Folder::new("songs/ncs"),
        names.iter().map(|n| Track::new(*n)).collect(),
    )
}

/// Controller with the engine's call log cleared after construction.
fn controller() -> PlaybackController<RecordingEngine> {
    let mut c = PlaybackController::new(RecordingEngine::default(), &PlaybackSettings::default());
    c.engine_mut().calls.clear();
    c
}

fn loads(c: &PlaybackController<RecordingEngine>) -> Vec<String> {
    c.engine()
        .calls
        .iter()
        .filter_map(|call| match call {
            Call::Load(a) => Some(a.clone()),
            _ => None,
        })
        .collect()
}

fn current_id(c: &PlaybackController<RecordingEngine>) -> Option<String> {
    c.current_track().map(|t| t.id().to_string())
}

#[test]
fn new_controller_applies_initial_volume() {
    let settings = PlaybackSettings {
        initial_volume: 0.4,
        ..PlaybackSettings::default()
    };
    let c = PlaybackController::new(RecordingEngine::default(), &settings);
    assert_eq!(c.engine().calls, vec![Call::SetVolume(0.4)]);
    assert_eq!(c.state().volume, 0.4);
    assert_eq!(c.status(), PlayerStatus::Empty);
}

#[test]
fn load_queue_primes_first_track_without_loading_it() {
    let mut c = controller();
    c.load_queue(queue_of(&["a.mp3", "b.mp3"]));

    assert_eq!(c.status(), PlayerStatus::Ready);
    assert_eq!(c.state().current_index, Some(0));
    assert_eq!(c.state().folder, Some(Folder::new("songs/ncs")));
    assert!(c.engine().calls.is_empty());
}

#[test]
fn empty_queue_leaves_nothing_to_toggle() {
    let mut c = controller();
    c.load_queue(queue_of(&[]));
    assert_eq!(c.status(), PlayerStatus::Empty);
    assert_eq!(c.state().current_index, None);

    c.toggle_play_pause();
    assert!(!c.next());
    assert!(!c.previous());
    c.on_engine_ended();

    assert_eq!(c.status(), PlayerStatus::Empty);
    assert!(c.engine().calls.is_empty());
}

#[test]
fn load_queue_pauses_whatever_was_playing() {
    let mut c = controller();
    c.load_queue(queue_of(&["a.mp3"]));
    c.play_track(0, true);

    c.load_queue(queue_of(&["x.mp3", "y.mp3"]));
    assert!(c.engine().is_paused());
    assert_eq!(c.engine().calls.last(), Some(&Call::Pause));
    assert_eq!(c.status(), PlayerStatus::Ready);
}

#[test]
fn play_track_with_autostart_loads_and_plays() {
    let mut c = controller();
    c.load_queue(queue_of(&["a.mp3", "b%20side.mp3"]));

    assert!(c.play_track(1, true));
    assert_eq!(
        c.engine().calls,
        vec![Call::Load("songs/ncs/b%20side.mp3".into()), Call::Play]
    );
    assert_eq!(c.status(), PlayerStatus::Playing);
    assert_eq!(c.current_track().map(|t| t.display()), Some("b side.mp3"));
}

#[test]
fn primed_track_starts_on_toggle() {
    let mut c = controller();
    c.load_queue(queue_of(&["a.mp3"]));

    c.play_track(0, false);
    assert_eq!(c.status(), PlayerStatus::Paused);
    assert_eq!(c.engine().calls, vec![Call::Load("songs/ncs/a.mp3".into())]);

    c.toggle_play_pause();
    assert_eq!(c.status(), PlayerStatus::Playing);
    c.toggle_play_pause();
    assert_eq!(c.status(), PlayerStatus::Paused);
    assert_eq!(
        c.engine().calls,
        vec![
            Call::Load("songs/ncs/a.mp3".into()),
            Call::Play,
            Call::Pause
        ]
    );
}

#[test]
fn toggle_from_ready_loads_the_current_track() {
    let mut c = controller();
    c.load_queue(queue_of(&["a.mp3", "b.mp3"]));

    c.toggle_play_pause();
    assert_eq!(loads(&c), vec!["songs/ncs/a.mp3"]);
    assert_eq!(c.status(), PlayerStatus::Playing);
}

#[test]
fn explicit_play_and_pause_are_idempotent() {
    let mut c = controller();
    c.load_queue(queue_of(&["a.mp3"]));
    c.play_track(0, true);

    c.play();
    c.play();
    assert_eq!(c.engine().calls.len(), 2);

    c.pause();
    c.pause();
    assert_eq!(c.engine().calls.len(), 3);
    assert_eq!(c.status(), PlayerStatus::Paused);
}

#[test]
fn out_of_range_play_track_changes_nothing() {
    let mut c = controller();
    c.load_queue(queue_of(&["a.mp3", "b.mp3"]));
    c.play_track(1, true);
    c.engine_mut().calls.clear();

    assert!(!c.play_track(2, true));
    assert_eq!(c.state().current_index, Some(1));
    assert_eq!(c.status(), PlayerStatus::Playing);
    assert!(c.engine().calls.is_empty());
}

#[test]
fn next_and_previous_walk_the_queue_without_wrapping() {
    let mut c = controller();
    c.load_queue(queue_of(&["a.mp3", "b.mp3", "c.mp3"]));
    c.play_track(0, true);

    assert!(c.next());
    assert_eq!(current_id(&c).as_deref(), Some("b.mp3"));
    assert!(c.next());
    assert_eq!(current_id(&c).as_deref(), Some("c.mp3"));

    assert!(!c.next());
    assert_eq!(current_id(&c).as_deref(), Some("c.mp3"));

    assert!(c.previous());
    assert_eq!(current_id(&c).as_deref(), Some("b.mp3"));
    assert_eq!(
        loads(&c),
        vec![
            "songs/ncs/a.mp3",
            "songs/ncs/b.mp3",
            "songs/ncs/c.mp3",
            "songs/ncs/b.mp3"
        ]
    );
    assert_eq!(c.status(), PlayerStatus::Playing);
}

#[test]
fn next_from_any_start_reaches_the_last_track_then_stops() {
    for n in 1..=6usize {
        let names: Vec<String> = (0..n).map(|k| format!("t{k}.mp3")).collect();
        let names: Vec<&str> = names.iter().map(String::as_str).collect();
        for i in 0..n {
            let mut c = controller();
            c.load_queue(queue_of(&names));
            assert!(c.play_track(i, true));

            for _ in 0..(n - 1 - i) {
                assert!(c.next(), "n={n} i={i}");
            }
            assert_eq!(c.state().current_index, Some(n - 1), "n={n} i={i}");

            let loaded = loads(&c).len();
            assert!(!c.next(), "n={n} i={i}");
            assert_eq!(c.state().current_index, Some(n - 1));
            assert_eq!(loads(&c).len(), loaded);
            assert_eq!(loaded, n - i);
        }
    }
}

#[test]
fn previous_on_first_track_is_a_no_op() {
    let mut c = controller();
    c.load_queue(queue_of(&["a.mp3", "b.mp3"]));
    c.play_track(0, false);
    c.engine_mut().calls.clear();

    assert!(!c.previous());
    assert_eq!(c.state().current_index, Some(0));
    assert_eq!(c.status(), PlayerStatus::Paused);
    assert!(c.engine().calls.is_empty());
}

#[test]
fn ended_track_advances_with_autostart() {
    let mut c = controller();
    c.load_queue(queue_of(&["a.mp3", "b.mp3"]));
    c.play_track(0, true);

    c.handle_engine_event(EngineEvent::Ended);
    assert_eq!(current_id(&c).as_deref(), Some("b.mp3"));
    assert_eq!(c.status(), PlayerStatus::Playing);
    assert_eq!(c.engine().calls.last(), Some(&Call::Play));
}

#[test]
fn ended_on_last_track_stops_without_wrapping() {
    let mut c = controller();
    c.load_queue(queue_of(&["a.mp3", "b.mp3"]));
    c.play_track(1, true);
    c.on_engine_time_update(Duration::from_secs(179), Some(Duration::from_secs(180)));

    c.on_engine_ended();
    assert_eq!(c.status(), PlayerStatus::Ended);
    assert_eq!(c.state().current_index, Some(1));
    assert_eq!(loads(&c), vec!["songs/ncs/b.mp3"]);
    assert_eq!(c.progress().fraction, 1.0);

    // Playing again restarts the finished track rather than the queue.
    c.toggle_play_pause();
    assert_eq!(loads(&c), vec!["songs/ncs/b.mp3", "songs/ncs/b.mp3"]);
    assert_eq!(c.status(), PlayerStatus::Playing);
}

#[test]
fn seek_scales_by_engine_duration() {
    let mut c = controller();
    c.load_queue(queue_of(&["a.mp3"]));
    c.play_track(0, true);
    c.engine_mut().duration = Some(Duration::from_secs(200));

    assert!(c.seek(0.5));
    assert_eq!(c.engine().calls.last(), Some(&Call::Seek(Duration::from_secs(100))));
    assert_eq!(c.state().position, Duration::from_secs(100));

    assert!(c.seek(1.5));
    assert_eq!(c.engine().calls.last(), Some(&Call::Seek(Duration::from_secs(200))));
    assert!(c.seek(-0.25));
    assert_eq!(c.engine().calls.last(), Some(&Call::Seek(Duration::ZERO)));
}

#[test]
fn seek_without_a_known_duration_is_a_no_op() {
    let mut c = controller();
    c.load_queue(queue_of(&["a.mp3"]));
    c.play_track(0, true);
    c.engine_mut().calls.clear();

    assert!(!c.seek(0.5));
    c.engine_mut().duration = Some(Duration::ZERO);
    assert!(!c.seek(0.5));
    c.engine_mut().duration = Some(Duration::from_secs(60));
    assert!(!c.seek(f64::NAN));

    assert!(c.engine().calls.is_empty());
    assert_eq!(c.state().position, Duration::ZERO);
}

#[test]
fn seek_after_queue_replaced_by_an_empty_one_is_a_no_op() {
    let mut c = controller();
    c.load_queue(queue_of(&["a.mp3"]));
    c.play_track(0, true);
    c.engine_mut().duration = Some(Duration::from_secs(200));

    c.load_queue(Queue::empty(Folder::new("songs/missing")));
    c.engine_mut().calls.clear();

    assert_eq!(c.status(), PlayerStatus::Empty);
    assert!(!c.seek(0.5));
    assert!(!c.seek_by(10));
    assert!(c.engine().calls.is_empty());
    assert_eq!(c.state().position, Duration::ZERO);
}

#[test]
fn seek_needs_the_current_track_to_be_loaded() {
    let mut c = controller();
    c.load_queue(queue_of(&["a.mp3", "b.mp3"]));
    c.engine_mut().duration = Some(Duration::from_secs(200));

    // Ready: primed but not loaded yet.
    assert!(!c.seek(0.5));

    c.play_track(1, true);
    c.on_engine_time_update(Duration::from_secs(199), Some(Duration::from_secs(200)));
    c.on_engine_ended();
    assert_eq!(c.status(), PlayerStatus::Ended);
    c.engine_mut().calls.clear();

    assert!(!c.seek(0.25));
    assert!(c.engine().calls.is_empty());
    assert_eq!(c.state().position, Duration::from_secs(200));

    // Paused keeps the loaded track, so seeking applies.
    c.play_track(0, false);
    assert!(c.seek(0.25));
    assert_eq!(c.state().position, Duration::from_secs(50));
}

#[test]
fn seek_by_moves_relative_to_position_and_stays_inside() {
    let mut c = controller();
    c.load_queue(queue_of(&["a.mp3"]));
    c.play_track(0, true);
    c.engine_mut().duration = Some(Duration::from_secs(100));
    c.engine_mut().position = Duration::from_secs(40);

    assert!(c.seek_by(10));
    assert_eq!(c.state().position, Duration::from_secs(50));
    assert!(c.seek_by(-90));
    assert_eq!(c.state().position, Duration::ZERO);
    assert!(c.seek_by(500));
    assert_eq!(c.state().position, Duration::from_secs(100));
}

#[test]
fn volume_is_clamped() {
    let mut c = controller();
    c.set_volume(1.5);
    assert_eq!(c.state().volume, 1.0);
    c.set_volume(-0.2);
    assert_eq!(c.state().volume, 0.0);
    assert!(c.is_muted());
    c.set_volume(f32::NAN);
    assert_eq!(c.state().volume, 0.0);
    assert_eq!(
        c.engine().calls,
        vec![Call::SetVolume(1.0), Call::SetVolume(0.0)]
    );
}

#[test]
fn change_volume_steps_from_the_current_level() {
    let mut c = controller();
    c.set_volume(0.5);
    c.change_volume(0.25);
    assert_eq!(c.state().volume, 0.75);
    c.change_volume(1.0);
    assert_eq!(c.state().volume, 1.0);
}

#[test]
fn unmute_restores_fixed_level_not_previous_volume() {
    let mut c = controller();
    c.set_volume(0.7);

    c.toggle_mute();
    assert_eq!(c.state().volume, 0.0);
    assert_eq!(c.engine().volume(), 0.0);

    c.toggle_mute();
    assert_eq!(c.state().volume, 0.1);
    assert!(!c.is_muted());

    c.toggle_mute();
    assert_eq!(c.state().volume, 0.0);
}

#[test]
fn unmute_level_comes_from_settings() {
    let settings = PlaybackSettings {
        initial_volume: 0.0,
        unmute_volume: 0.6,
        ..PlaybackSettings::default()
    };
    let mut c = PlaybackController::new(RecordingEngine::default(), &settings);
    c.toggle_mute();
    assert_eq!(c.state().volume, 0.6);
}

#[test]
fn time_updates_refresh_progress() {
    let mut c = controller();
    c.load_queue(queue_of(&["a.mp3"]));
    c.play_track(0, true);

    let p = c.on_engine_time_update(Duration::from_secs(30), Some(Duration::from_secs(120)));
    assert_eq!(p.elapsed, "00:30");
    assert_eq!(p.total, "02:00");
    assert_eq!(p.remaining, "01:30");
    assert_eq!(p.fraction, 0.25);

    c.handle_engine_event(EngineEvent::TimeUpdate {
        position: Duration::from_secs(60),
        duration: Some(Duration::from_secs(120)),
    });
    assert_eq!(c.progress().fraction, 0.5);
}

#[test]
fn progress_guards_unknown_and_zero_durations() {
    let unknown = PlaybackProgress::new(Duration::from_secs(30), None);
    assert_eq!(unknown.fraction, 0.0);
    assert_eq!(unknown.elapsed, "00:30");
    assert_eq!(unknown.total, "00:00");
    assert_eq!(unknown.remaining, "00:00");

    let zero = PlaybackProgress::new(Duration::from_secs(3), Some(Duration::ZERO));
    assert_eq!(zero.fraction, 0.0);
    assert_eq!(zero.total, "00:00");

    let overshoot =
        PlaybackProgress::new(Duration::from_secs(130), Some(Duration::from_secs(120)));
    assert_eq!(overshoot.fraction, 1.0);
    assert_eq!(overshoot.remaining, "00:00");
}

#[test]
fn mmss_formatting() {
    assert_eq!(format_mmss(None), "00:00");
    assert_eq!(format_mmss(Some(Duration::from_millis(59_999))), "00:59");
    assert_eq!(format_mmss(Some(Duration::from_secs(61))), "01:01");
    assert_eq!(format_mmss(Some(Duration::from_secs(3725))), "62:05");
}

#[test]
fn failed_load_falls_back_to_ready_and_play_retries() {
    let mut c = controller();
    c.load_queue(queue_of(&["a.mp3", "b.mp3"]));
    c.play_track(0, true);

    c.handle_engine_event(EngineEvent::LoadFailed {
        address: "songs/ncs/a.mp3".into(),
        reason: "404".into(),
    });
    assert_eq!(c.status(), PlayerStatus::Ready);
    assert_eq!(c.state().current_index, Some(0));

    c.toggle_play_pause();
    assert_eq!(loads(&c), vec!["songs/ncs/a.mp3", "songs/ncs/a.mp3"]);
    assert_eq!(c.status(), PlayerStatus::Playing);
}

#[test]
fn queue_index_helpers_do_not_wrap() {
    assert_eq!(next_index(Some(0), 3), Some(1));
    assert_eq!(next_index(Some(2), 3), None);
    assert_eq!(next_index(None, 3), None);
    assert_eq!(previous_index(Some(2), 3), Some(1));
    assert_eq!(previous_index(Some(0), 3), None);
    assert_eq!(previous_index(Some(5), 3), None);
}

#[test]
fn engine_events_from_a_replaced_load_are_dropped() {
    let mut paused = false;
    assert_eq!(accept_event(3, &mut paused, (2, EngineEvent::Ended)), None);
    assert_eq!(
        accept_event(
            3,
            &mut paused,
            (
                1,
                EngineEvent::TimeUpdate {
                    position: Duration::from_secs(5),
                    duration: None,
                }
            )
        ),
        None
    );
    assert!(!paused);
}

#[test]
fn current_load_events_pass_and_terminal_ones_pause() {
    let mut paused = false;
    let update = EngineEvent::TimeUpdate {
        position: Duration::from_secs(5),
        duration: Some(Duration::from_secs(60)),
    };
    assert_eq!(accept_event(3, &mut paused, (3, update.clone())), Some(update));
    assert!(!paused);

    let failed = EngineEvent::LoadFailed {
        address: "songs/ncs/a.mp3".into(),
        reason: "404".into(),
    };
    assert_eq!(accept_event(3, &mut paused, (3, failed.clone())), Some(failed));
    assert!(paused);

    paused = false;
    assert_eq!(accept_event(3, &mut paused, (3, EngineEvent::Ended)), Some(EngineEvent::Ended));
    assert!(paused);
}

#[test]
fn decoder_hint_comes_from_the_file_extension() {
    assert_eq!(extension_hint("songs/ncs/a.MP3").as_deref(), Some("mp3"));
    assert_eq!(extension_hint("songs/a.b/c.flac?x=1").as_deref(), Some("flac"));
    assert_eq!(extension_hint("songs/ncs/noext"), None);
    assert_eq!(extension_hint("songs/ncs/trailing."), None);
}
