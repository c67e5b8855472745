//! Application module: the presentation model and key bindings used by the
//! TUI and runtime.
//!
//! The `App` model lives in `app::model`; it tracks focus, cursors, albums,
//! and the status line. Playback state stays with the controller.

mod input;
mod model;

pub use input::{Action, InputState};
pub use model::*;

#[cfg(test)]
mod tests;
