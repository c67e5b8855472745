//! Playback: the controller state machine and the rodio-backed engine.

mod controller;
mod engine;
mod error;
mod player;
mod queue;
mod sink;
mod thread;
mod types;

pub use controller::PlaybackController;
pub use engine::PlaybackEngine;
pub use player::RodioEngine;
pub use types::{EngineEvent, PlaybackProgress, PlayerStatus, format_mmss};

#[cfg(test)]
mod tests;
