//! Configuration loader and schema types.
//!
//! This module exposes the configuration schema used to drive discovery,
//! playback and the terminal UI, plus helpers to load it from disk.

mod load;
mod schema;

pub use load::{default_state_dir, resolve_config_path};
pub use schema::*;
