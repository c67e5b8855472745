//! The playback state machine.
//!
//! `PlaybackController` owns the current queue and drives a
//! [`PlaybackEngine`]. Every operation is a silent no-op when it does not
//! apply (stepping past either end of the queue, seeking an unknown
//! duration, toggling with nothing loaded); nothing here returns an error.

use std::time::Duration;

use crate::config::PlaybackSettings;
use crate::library::{Queue, Track};

use super::engine::PlaybackEngine;
use super::queue::{next_index, previous_index};
use super::types::{EngineEvent, PlaybackProgress, PlaybackState, PlayerStatus};

pub struct PlaybackController<E: PlaybackEngine> {
    engine: E,
    queue: Queue,
    state: PlaybackState,
    unmute_volume: f32,
}

impl<E: PlaybackEngine> PlaybackController<E> {
    pub fn new(mut engine: E, settings: &PlaybackSettings) -> Self {
        let volume = settings.initial_volume.clamp(0.0, 1.0);
        engine.set_volume(volume);
        Self {
            engine,
            queue: Queue::default(),
            state: PlaybackState {
                volume,
                ..PlaybackState::default()
            },
            unmute_volume: settings.unmute_volume.clamp(0.0, 1.0),
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn status(&self) -> PlayerStatus {
        self.state.status
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.state.current_index.and_then(|i| self.queue.get(i))
    }

    pub fn progress(&self) -> PlaybackProgress {
        PlaybackProgress::new(self.state.position, self.state.duration)
    }

    pub fn is_muted(&self) -> bool {
        self.state.volume <= 0.0
    }

    /// The engine holds the current track: `Ready` and `Ended` reload on play,
    /// and `Empty` has nothing loaded.
    fn has_loaded_track(&self) -> bool {
        self.state.current_index.is_some()
            && matches!(
                self.state.status,
                PlayerStatus::Playing | PlayerStatus::Paused
            )
    }

    /// Replace the queue. The first track becomes current but is not loaded.
    ///
    /// Whatever was playing is paused so the engine never plays a track the
    /// state no longer knows about.
    pub fn load_queue(&mut self, queue: Queue) {
        if !self.engine.is_paused() {
            self.engine.pause();
        }
        self.state.folder = Some(queue.folder().clone());
        self.state.position = Duration::ZERO;
        self.state.duration = None;
        if queue.is_empty() {
            self.state.current_index = None;
            self.state.status = PlayerStatus::Empty;
        } else {
            self.state.current_index = Some(0);
            self.state.status = PlayerStatus::Ready;
        }
        tracing::info!(folder = %queue.folder(), tracks = queue.len(), "queue loaded");
        self.queue = queue;
    }

    /// Make `index` current and load it; start it when `autostart` is set.
    ///
    /// Returns false (and changes nothing) when `index` is out of range.
    pub fn play_track(&mut self, index: usize, autostart: bool) -> bool {
        let Some(address) = self.queue.address(index) else {
            tracing::debug!(index, len = self.queue.len(), "ignoring out-of-range track");
            return false;
        };

        self.state.current_index = Some(index);
        self.state.position = Duration::ZERO;
        self.state.duration = None;
        self.engine.load(&address);
        if autostart {
            self.engine.play();
            self.state.status = PlayerStatus::Playing;
        } else {
            self.state.status = PlayerStatus::Paused;
        }
        tracing::info!(%address, autostart, "track selected");
        true
    }

    pub fn toggle_play_pause(&mut self) {
        match self.state.status {
            PlayerStatus::Empty => {}
            PlayerStatus::Playing => self.pause(),
            PlayerStatus::Ready | PlayerStatus::Paused | PlayerStatus::Ended => self.play(),
        }
    }

    /// Resume, or start the current track when it was never loaded or has
    /// finished.
    pub fn play(&mut self) {
        match self.state.status {
            PlayerStatus::Empty | PlayerStatus::Playing => {}
            PlayerStatus::Paused => {
                self.engine.play();
                self.state.status = PlayerStatus::Playing;
            }
            PlayerStatus::Ready | PlayerStatus::Ended => {
                if let Some(i) = self.state.current_index {
                    self.play_track(i, true);
                }
            }
        }
    }

    pub fn pause(&mut self) {
        if self.state.status == PlayerStatus::Playing {
            self.engine.pause();
            self.state.status = PlayerStatus::Paused;
        }
    }

    pub fn next(&mut self) -> bool {
        match next_index(self.state.current_index, self.queue.len()) {
            Some(i) => self.play_track(i, true),
            None => false,
        }
    }

    pub fn previous(&mut self) -> bool {
        match previous_index(self.state.current_index, self.queue.len()) {
            Some(i) => self.play_track(i, true),
            None => false,
        }
    }

    pub fn on_engine_time_update(
        &mut self,
        position: Duration,
        duration: Option<Duration>,
    ) -> PlaybackProgress {
        self.state.position = position;
        self.state.duration = duration;
        self.progress()
    }

    /// Advance after the current track finished; stop at the end of the queue.
    pub fn on_engine_ended(&mut self) {
        if self.next() {
            return;
        }
        if self.state.status != PlayerStatus::Empty {
            self.state.status = PlayerStatus::Ended;
            if let Some(total) = self.state.duration {
                self.state.position = total;
            }
        }
    }

    /// Jump to `fraction` of the current track. Needs a loaded track that is
    /// playing or paused and a known, non-zero duration.
    pub fn seek(&mut self, fraction: f64) -> bool {
        if !fraction.is_finite() || !self.has_loaded_track() {
            return false;
        }
        let Some(total) = self.engine.duration().filter(|d| !d.is_zero()) else {
            return false;
        };
        let target = total.mul_f64(fraction.clamp(0.0, 1.0));
        self.engine.seek(target);
        self.state.position = target;
        self.state.duration = Some(total);
        true
    }

    /// Move the position by `delta_secs`, staying inside the track.
    pub fn seek_by(&mut self, delta_secs: i64) -> bool {
        if !self.has_loaded_track() {
            return false;
        }
        let Some(total) = self.engine.duration().filter(|d| !d.is_zero()) else {
            return false;
        };
        let target = self.engine.position().as_secs_f64() + delta_secs as f64;
        self.seek(target / total.as_secs_f64())
    }

    pub fn set_volume(&mut self, level: f32) {
        if !level.is_finite() {
            return;
        }
        let level = level.clamp(0.0, 1.0);
        self.engine.set_volume(level);
        self.state.volume = level;
    }

    pub fn change_volume(&mut self, delta: f32) {
        self.set_volume(self.state.volume + delta);
    }

    /// Mute, or restore the fixed un-mute level. The level before muting is
    /// not remembered.
    pub fn toggle_mute(&mut self) {
        if self.engine.volume() > 0.0 {
            self.set_volume(0.0);
        } else {
            self.set_volume(self.unmute_volume);
        }
    }

    pub fn handle_engine_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::TimeUpdate { position, duration } => {
                self.on_engine_time_update(position, duration);
            }
            EngineEvent::Ended => self.on_engine_ended(),
            EngineEvent::LoadFailed { address, reason } => {
                tracing::warn!(%address, %reason, "could not play track");
                // Nothing is loaded, so the next play request reloads.
                if self.state.status != PlayerStatus::Empty {
                    self.state.status = PlayerStatus::Ready;
                }
            }
        }
    }
}
