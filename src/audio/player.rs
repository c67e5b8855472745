use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::library::Fetcher;

use super::engine::PlaybackEngine;
use super::thread::{TaggedEvent, spawn_audio_thread};
use super::types::{AudioCmd, EngineEvent, EngineHandle, EngineInfo};

/// [`PlaybackEngine`] backed by a rodio audio thread.
pub struct RodioEngine {
    tx: Sender<AudioCmd>,
    events: Receiver<TaggedEvent>,
    info: EngineHandle,
    generation: u64,
    paused: bool,
    volume: f32,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl RodioEngine {
    pub fn new(fetcher: Arc<dyn Fetcher>, initial_volume: f32, quit_fade_ms: u64) -> Self {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let (event_tx, events) = mpsc::channel::<TaggedEvent>();
        let info: EngineHandle = Arc::new(Mutex::new(EngineInfo::default()));
        let volume = initial_volume.clamp(0.0, 1.0);

        let audio_handle = spawn_audio_thread(
            fetcher,
            rx,
            event_tx,
            info.clone(),
            volume,
            quit_fade_ms,
        );

        Self {
            tx,
            events,
            info,
            generation: 0,
            paused: true,
            volume,
            join: Mutex::new(Some(audio_handle)),
        }
    }

    /// Events reported for the current load since the last call.
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        let mut out = Vec::new();
        while let Ok(tagged) = self.events.try_recv() {
            if let Some(event) = accept_event(self.generation, &mut self.paused, tagged) {
                out.push(event);
            }
        }
        out
    }

    /// Stop the audio thread, fading out a playing track first.
    pub fn quit_softly(&self) {
        let _ = self.send(AudioCmd::Quit);

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }

    fn send(&self, cmd: AudioCmd) -> Result<(), mpsc::SendError<AudioCmd>> {
        self.tx.send(cmd)
    }

    /// Snapshot field for the current load, if the thread has caught up.
    fn current<T>(&self, field: impl FnOnce(&EngineInfo) -> T) -> Option<T> {
        self.info
            .lock()
            .ok()
            .filter(|info| info.generation == self.generation)
            .map(|info| field(&info))
    }
}

/// Keep `tagged` only when it belongs to `current_generation`. A kept
/// `Ended` or `LoadFailed` leaves the engine paused.
pub(super) fn accept_event(
    current_generation: u64,
    paused: &mut bool,
    (generation, event): TaggedEvent,
) -> Option<EngineEvent> {
    if generation != current_generation {
        return None;
    }
    if matches!(event, EngineEvent::Ended | EngineEvent::LoadFailed { .. }) {
        *paused = true;
    }
    Some(event)
}

impl PlaybackEngine for RodioEngine {
    fn load(&mut self, address: &str) {
        self.generation += 1;
        self.paused = true;
        let _ = self.send(AudioCmd::Load {
            generation: self.generation,
            address: address.to_string(),
        });
    }

    fn play(&mut self) {
        self.paused = false;
        let _ = self.send(AudioCmd::Play);
    }

    fn pause(&mut self) {
        self.paused = true;
        let _ = self.send(AudioCmd::Pause);
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn position(&self) -> Duration {
        self.current(|info| info.position).unwrap_or(Duration::ZERO)
    }

    fn seek(&mut self, position: Duration) {
        // Reflect the target right away so repeated scrubs add up.
        if let Ok(mut info) = self.info.lock() {
            if info.generation == self.generation {
                info.position = position;
            }
        }
        let _ = self.send(AudioCmd::Seek(position));
    }

    fn duration(&self) -> Option<Duration> {
        self.current(|info| info.duration).flatten()
    }

    fn volume(&self) -> f32 {
        self.volume
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        let _ = self.send(AudioCmd::SetVolume(volume));
    }
}
