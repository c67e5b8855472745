use std::path::PathBuf;

use clap::Parser;

use crate::config::Settings;

/// spindle - play music straight from a web server's folder listings
#[derive(Parser, Debug)]
#[command(name = "spindle", version, about)]
pub struct Args {
    /// Base URL of the content server (overrides `server.base_url`)
    pub server_url: Option<String>,

    /// Folder to queue at startup, relative to the server root
    #[arg(long, short = 'f')]
    pub folder: Option<String>,

    /// Folder whose subfolders are listed as albums
    #[arg(long)]
    pub albums_root: Option<String>,

    /// Config file to use instead of the default location
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    pub print_config: bool,

    /// Print the startup folder's tracks and the albums, then exit
    #[arg(long)]
    pub list: bool,
}

impl Args {
    /// Let command-line values win over the loaded configuration.
    pub fn apply_to(&self, settings: &mut Settings) {
        if let Some(url) = &self.server_url {
            settings.server.base_url = url.clone();
        }
        if let Some(folder) = &self.folder {
            settings.library.default_folder = folder.clone();
        }
        if let Some(root) = &self.albums_root {
            settings.library.albums_root = root.clone();
        }
    }
}
