use std::time::Duration;

/// The audio primitive the controller drives and observes.
///
/// Addresses are server-relative (`songs/ncs/a.mp3`). Engines report
/// progress and completion as [`EngineEvent`](super::EngineEvent)s through
/// their own channel; the trait only covers commands and current values.
pub trait PlaybackEngine {
    /// Replace the current source with `address`. The new source is paused.
    fn load(&mut self, address: &str);
    fn play(&mut self);
    fn pause(&mut self);
    fn is_paused(&self) -> bool;
    fn position(&self) -> Duration;
    fn seek(&mut self, position: Duration);
    /// Length of the loaded source, `None` while unknown.
    fn duration(&self) -> Option<Duration>;
    fn volume(&self) -> f32;
    fn set_volume(&mut self, volume: f32);
}
