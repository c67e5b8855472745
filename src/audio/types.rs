//! Audio-related small types and handles.
//!
//! This module defines the playback state owned by the controller, the
//! events an engine reports back, and the snapshot the rodio audio thread
//! shares with its handle.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::library::Folder;

/// Coarse state of the playback state machine.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PlayerStatus {
    /// No queue loaded, or the loaded queue has no tracks.
    #[default]
    Empty,
    /// A queue is loaded and a track is current, but nothing was started.
    Ready,
    Playing,
    /// Paused by the user, or primed without starting.
    Paused,
    /// The last track of the queue finished on its own.
    Ended,
}

/// Everything the controller knows about playback.
#[derive(Debug, Clone)]
pub struct PlaybackState {
    pub folder: Option<Folder>,
    /// `Some` whenever the queue is non-empty.
    pub current_index: Option<usize>,
    pub status: PlayerStatus,
    pub position: Duration,
    /// `None` until the engine knows the length of the current track.
    pub duration: Option<Duration>,
    /// Engine volume in `[0, 1]`; `0` means muted.
    pub volume: f32,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            folder: None,
            current_index: None,
            status: PlayerStatus::Empty,
            position: Duration::ZERO,
            duration: None,
            volume: 1.0,
        }
    }
}

/// Display-ready progress of the current track.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackProgress {
    pub elapsed: String,
    pub total: String,
    pub remaining: String,
    /// `position / duration` in `[0, 1]`; `0` while the duration is unknown.
    pub fraction: f64,
}

impl PlaybackProgress {
    pub fn new(position: Duration, duration: Option<Duration>) -> Self {
        let known = duration.filter(|d| !d.is_zero());
        let fraction = known
            .map(|d| (position.as_secs_f64() / d.as_secs_f64()).clamp(0.0, 1.0))
            .unwrap_or(0.0);

        Self {
            elapsed: format_mmss(Some(position)),
            total: format_mmss(known),
            remaining: format_mmss(known.map(|d| d.saturating_sub(position))),
            fraction,
        }
    }
}

/// Format a duration as `MM:SS`; unknown durations render as `00:00`.
pub fn format_mmss(d: Option<Duration>) -> String {
    let secs = d.map(|d| d.as_secs()).unwrap_or(0);
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Notifications a playback engine reports about the loaded track.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    TimeUpdate {
        position: Duration,
        duration: Option<Duration>,
    },
    /// The track played through to its end.
    Ended,
    LoadFailed {
        address: String,
        reason: String,
    },
}

/// Commands understood by the rodio audio thread.
#[derive(Debug)]
pub(super) enum AudioCmd {
    /// Replace the current source; stays paused until `Play`.
    Load { generation: u64, address: String },
    Play,
    Pause,
    Seek(Duration),
    SetVolume(f32),
    Quit,
}

/// Snapshot published by the audio thread.
#[derive(Debug, Clone, Default)]
pub struct EngineInfo {
    /// Load generation the snapshot belongs to.
    pub generation: u64,
    pub position: Duration,
    /// `None` until a source is decoded and reports its length.
    pub duration: Option<Duration>,
}

pub type EngineHandle = Arc<Mutex<EngineInfo>>;
