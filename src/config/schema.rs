use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/spindle/config.toml` or `~/.config/spindle/config.toml`
///
/// Precedence (highest wins):
/// 1) Command line flags (applied by the runtime after loading)
/// 2) Environment variables (prefix `SPINDLE__`, `__` as nested separator)
/// 3) Config file (if present)
/// 4) Struct defaults
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub library: LibrarySettings,
    pub playback: PlaybackSettings,
    pub controls: ControlsSettings,
    pub ui: UiSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Base URL of the content server. Folder paths are resolved against it.
    pub base_url: String,
    /// Per-request timeout (seconds). Requests are never retried.
    pub timeout_secs: u64,
    /// Honor `HTTP_PROXY`/`HTTPS_PROXY` from the environment.
    pub use_system_proxy: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5500".to_string(),
            timeout_secs: 10,
            use_system_proxy: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// Track folder loaded on startup.
    pub default_folder: String,
    /// Folder whose subfolders are the albums.
    pub albums_root: String,
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Listing entries that are never albums.
    pub excluded_entries: Vec<String>,
    /// Per-album descriptor file (JSON with `title` and `description`).
    pub info_file: String,
    /// Per-album cover image file name. Referenced, never fetched.
    pub cover_file: String,
    /// Max descriptor fetches in flight while listing albums. `1` is sequential.
    pub metadata_concurrency: usize,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            default_folder: "songs/ncs".to_string(),
            albums_root: "songs".to_string(),
            extensions: vec!["mp3".into()],
            excluded_entries: vec![".htaccess".into()],
            info_file: "info.json".to_string(),
            cover_file: "cover.jpg".to_string(),
            metadata_concurrency: 4,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Whether the first track of the default folder starts playing on launch.
    /// When false it is only primed.
    pub autoplay_on_start: bool,
    /// Engine volume at launch, in `[0, 1]`.
    pub initial_volume: f32,
    /// Volume set when un-muting. The previous volume is not remembered.
    pub unmute_volume: f32,
    /// Fade-out applied to a playing track when quitting (milliseconds).
    pub quit_fade_ms: u64,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            autoplay_on_start: false,
            initial_volume: 1.0,
            unmute_volume: 0.1,
            quit_fade_ms: 300,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Number of seconds to scrub when pressing `H` / `L`.
    pub scrub_seconds: u64,
    /// Volume change when pressing `+` / `-`.
    pub volume_step: f32,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self {
            scrub_seconds: 5,
            volume_step: 0.05,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
    /// Separator between elapsed and total time in the status line.
    pub time_separator: String,
    /// Keep the track cursor on the playing track until the user moves it.
    pub follow_playback: bool,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ spindle ~ ".to_string(),
            time_separator: " / ".to_string(),
            follow_playback: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Directory for the rolling log file. Defaults to the XDG state dir.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
    /// `tracing` filter directive, overridden by `RUST_LOG`.
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            dir: None,
            filter: "spindle=info,warn".to_string(),
        }
    }
}
