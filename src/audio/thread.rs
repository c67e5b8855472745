use std::sync::Arc;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;

use rodio::{OutputStream, OutputStreamBuilder, Sink};

use crate::library::Fetcher;

use super::error::EngineError;
use super::sink::{create_paused_sink, fade_out_sink};
use super::types::{AudioCmd, EngineEvent, EngineHandle, EngineInfo};

/// Engine events tagged with the load generation they belong to.
pub(super) type TaggedEvent = (u64, EngineEvent);

const TICK: Duration = Duration::from_millis(200);

pub(super) fn spawn_audio_thread(
    fetcher: Arc<dyn Fetcher>,
    rx: Receiver<AudioCmd>,
    events: Sender<TaggedEvent>,
    engine_info: EngineHandle,
    initial_volume: f32,
    quit_fade_ms: u64,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut stream = match OutputStreamBuilder::open_default_stream() {
            Ok(stream) => stream,
            Err(e) => {
                let err = EngineError::NoOutputDevice(e.to_string());
                tracing::error!(error = %err, "audio output unavailable");
                run_without_output(&rx, &events, &err);
                return;
            }
        };
        // rodio logs to stderr when OutputStream is dropped. That's useful in
        // debugging, but noisy for a TUI app.
        stream.log_on_drop(false);

        let mut state = ThreadState {
            stream,
            fetcher,
            events,
            engine_info,
            sink: None,
            generation: 0,
            volume: initial_volume,
            end_reported: false,
        };

        loop {
            match rx.recv_timeout(TICK) {
                Ok(AudioCmd::Load {
                    generation,
                    address,
                }) => state.load(generation, &address),
                Ok(AudioCmd::Play) => state.set_paused(false),
                Ok(AudioCmd::Pause) => state.set_paused(true),
                Ok(AudioCmd::Seek(position)) => state.seek(position),
                Ok(AudioCmd::SetVolume(volume)) => {
                    state.volume = volume;
                    if let Some(s) = state.sink.as_ref() {
                        s.set_volume(volume);
                    }
                }
                Ok(AudioCmd::Quit) => {
                    if let Some(s) = state.sink.take() {
                        fade_out_sink(&s, quit_fade_ms);
                        s.stop();
                    }
                    break;
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
            state.tick();
        }
    })
}

struct ThreadState {
    stream: OutputStream,
    fetcher: Arc<dyn Fetcher>,
    events: Sender<TaggedEvent>,
    engine_info: EngineHandle,
    sink: Option<Sink>,
    generation: u64,
    volume: f32,
    end_reported: bool,
}

impl ThreadState {
    fn emit(&self, event: EngineEvent) {
        let _ = self.events.send((self.generation, event));
    }

    fn publish(&self, update: impl FnOnce(&mut EngineInfo)) {
        if let Ok(mut info) = self.engine_info.lock() {
            update(&mut info);
        }
    }

    fn load(&mut self, generation: u64, address: &str) {
        if let Some(old) = self.sink.take() {
            old.stop();
        }
        self.generation = generation;
        self.end_reported = false;
        self.publish(|info| {
            *info = EngineInfo {
                generation,
                ..EngineInfo::default()
            }
        });

        let loaded = self
            .fetcher
            .get_bytes(address)
            .map_err(|e| EngineError::Fetch {
                address: address.to_string(),
                source: e,
            })
            .and_then(|bytes| create_paused_sink(&self.stream, address, bytes, self.volume));

        match loaded {
            Ok((sink, duration)) => {
                tracing::debug!(address, generation, ?duration, "track loaded");
                self.sink = Some(sink);
                self.publish(|info| info.duration = duration);
                self.emit(EngineEvent::TimeUpdate {
                    position: Duration::ZERO,
                    duration,
                });
            }
            Err(e) => {
                tracing::warn!(address, error = %e, "track load failed");
                self.emit(EngineEvent::LoadFailed {
                    address: address.to_string(),
                    reason: e.to_string(),
                });
            }
        }
    }

    fn set_paused(&self, paused: bool) {
        let Some(s) = self.sink.as_ref() else {
            return;
        };
        if paused {
            s.pause();
        } else {
            s.play();
        }
    }

    fn seek(&mut self, position: Duration) {
        let Some(s) = self.sink.as_ref() else {
            return;
        };
        match s.try_seek(position) {
            Ok(()) => {
                // Seeking back into a finished track revives it.
                self.end_reported = false;
                let duration = self.engine_info.lock().ok().and_then(|i| i.duration);
                self.publish(|info| info.position = position);
                self.emit(EngineEvent::TimeUpdate { position, duration });
            }
            Err(e) => tracing::warn!(?position, error = %e, "seek failed"),
        }
    }

    /// Publish progress and notice the end of the current source.
    fn tick(&mut self) {
        let Some(s) = self.sink.as_ref() else {
            return;
        };
        if s.is_paused() || self.end_reported {
            return;
        }

        let position = s.get_pos();
        let finished = s.empty();
        let mut duration = None;
        self.publish(|info| {
            info.position = position;
            duration = info.duration;
        });

        if finished {
            self.end_reported = true;
            self.emit(EngineEvent::Ended);
        } else {
            self.emit(EngineEvent::TimeUpdate { position, duration });
        }
    }
}

/// Keep answering commands when no output device could be opened, so the
/// rest of the program keeps working without sound.
fn run_without_output(rx: &Receiver<AudioCmd>, events: &Sender<TaggedEvent>, err: &EngineError) {
    for cmd in rx {
        match cmd {
            AudioCmd::Load {
                generation,
                address,
            } => {
                let _ = events.send((
                    generation,
                    EngineEvent::LoadFailed {
                        address,
                        reason: err.to_string(),
                    },
                ));
            }
            AudioCmd::Quit => break,
            _ => {}
        }
    }
}
