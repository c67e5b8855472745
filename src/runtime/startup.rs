use crate::app::App;
use crate::config;
use crate::library::{DiscoveryWorker, Folder};

/// Ask for the default folder's tracks and the album list.
///
/// The first track is only primed unless `playback.autoplay_on_start` is set.
pub fn request_initial_content(
    app: &mut App,
    worker: &mut DiscoveryWorker,
    settings: &config::Settings,
) {
    let folder = Folder::new(&settings.library.default_folder);
    match worker.request_tracks(folder.clone(), settings.playback.autoplay_on_start) {
        Ok(_) => app.tracks_requested(folder),
        Err(e) => app.request_failed(&e),
    }

    match worker.request_albums() {
        Ok(_) => app.albums_requested(),
        Err(e) => app.request_failed(&e),
    }
}
