use std::path::Path;

use crate::config;

/// Load and validate settings, falling back to defaults.
///
/// Config is optional; a broken file should not prevent the app from
/// starting. The second value explains why defaults were used, if they were.
pub fn load_settings(config_path: Option<&Path>) -> (config::Settings, Option<String>) {
    let loaded = match config_path {
        Some(path) => config::Settings::load_from(Some(path)),
        None => config::Settings::load(),
    };

    match loaded {
        Ok(s) => match s.validate() {
            Ok(()) => (s, None),
            Err(msg) => (
                config::Settings::default(),
                Some(format!("invalid config, using defaults: {msg}")),
            ),
        },
        Err(e) => (
            config::Settings::default(),
            Some(format!("failed to load config, using defaults: {e}")),
        ),
    }
}
