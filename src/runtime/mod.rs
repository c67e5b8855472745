use std::sync::Arc;

use clap::Parser;
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::audio::{PlaybackController, RodioEngine};
use crate::config::Settings;
use crate::library::{Discovery, DiscoveryWorker, Fetcher, Folder, HttpFetcher};
use crate::logging;

mod cli;
mod event_loop;
mod settings;
mod startup;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = cli::Args::parse();

    let (mut settings, settings_warning) = settings::load_settings(args.config.as_deref());
    args.apply_to(&mut settings);
    // Values typed on the command line are not silently replaced.
    settings.validate()?;

    if args.print_config {
        print!("{}", toml::to_string_pretty(&settings)?);
        return Ok(());
    }

    let _log_guard = match logging::init(&settings.logging) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("spindle: logging disabled: {e}");
            None
        }
    };
    if let Some(msg) = settings_warning {
        eprintln!("spindle: {msg}");
        tracing::warn!("{msg}");
    }
    tracing::info!(server = %settings.server.base_url, "starting");

    let fetcher: Arc<dyn Fetcher> = Arc::new(HttpFetcher::new(&settings.server)?);
    let discovery = Discovery::new(fetcher.clone(), settings.library.clone());
    if args.list {
        print_listing(&discovery, &settings);
        return Ok(());
    }
    let mut worker = DiscoveryWorker::spawn(discovery);

    let engine = RodioEngine::new(
        fetcher,
        settings.playback.initial_volume,
        settings.playback.quit_fade_ms,
    );
    let mut player = PlaybackController::new(engine, &settings.playback);
    let mut app = App::new(settings.ui.follow_playback);

    startup::request_initial_content(&mut app, &mut worker, &settings);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(&mut terminal, &settings, &mut app, &mut player, &mut worker);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &run_result {
        tracing::error!(error = %e, "event loop failed");
    }
    tracing::info!("exiting");
    run_result
}

/// Non-interactive `--list`: failures are logged and show up as empty lists.
fn print_listing(discovery: &Discovery, settings: &Settings) {
    let queue = discovery.list_tracks(&Folder::new(&settings.library.default_folder));
    println!("{} ({} tracks)", queue.folder(), queue.len());
    for (i, track) in queue.tracks().iter().enumerate() {
        println!("  {:>3}. {}", i + 1, track.display());
    }

    let albums = discovery.list_albums();
    println!("albums ({})", albums.len());
    for album in &albums {
        println!("  {} [{}]", album.title, album.folder);
        if !album.description.trim().is_empty() {
            println!("       {}", album.description);
        }
    }
}
