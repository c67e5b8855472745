use std::sync::Arc;
use std::thread;

use crate::config::LibrarySettings;

use super::error::{DiscoveryError, MetadataError};
use super::fetch::Fetcher;
use super::listing::{subfolder_names, track_ids};
use super::model::{Album, AlbumInfo, Folder, Queue, Track};

/// Turns folder references into queues and the album root into albums.
#[derive(Clone)]
pub struct Discovery {
    fetcher: Arc<dyn Fetcher>,
    settings: LibrarySettings,
}

impl Discovery {
    pub fn new(fetcher: Arc<dyn Fetcher>, settings: LibrarySettings) -> Self {
        Self { fetcher, settings }
    }

    /// Fetch and parse `folder`'s listing.
    pub fn try_list_tracks(&self, folder: &Folder) -> Result<Queue, DiscoveryError> {
        let html = self.fetcher.get_text(&folder.listing_path())?;
        let tracks: Vec<Track> = track_ids(&html, folder, &self.settings.extensions)
            .into_iter()
            .map(Track::new)
            .collect();
        tracing::info!(folder = %folder, tracks = tracks.len(), "listed tracks");
        Ok(Queue::new(folder.clone(), tracks))
    }

    /// Like [`Discovery::try_list_tracks`], but a failure is logged and
    /// yields an empty queue.
    pub fn list_tracks(&self, folder: &Folder) -> Queue {
        self.try_list_tracks(folder).unwrap_or_else(|e| {
            tracing::error!(folder = %folder, error = %e, "track discovery failed");
            Queue::empty(folder.clone())
        })
    }

    /// Fetch the album root listing and every album's descriptor.
    ///
    /// Albums whose descriptor cannot be loaded are skipped. The result keeps
    /// listing order regardless of the order fetches complete in.
    pub fn try_list_albums(&self) -> Result<Vec<Album>, DiscoveryError> {
        let root = Folder::new(&self.settings.albums_root);
        let html = self.fetcher.get_text(&root.listing_path())?;
        let names = subfolder_names(&html, &root, &self.settings.excluded_entries);
        tracing::debug!(root = %root, candidates = names.len(), "album folders found");

        let albums = self.load_albums(&root, &names);
        tracing::info!(
            root = %root,
            albums = albums.len(),
            skipped = names.len() - albums.len(),
            "listed albums"
        );
        Ok(albums)
    }

    /// Like [`Discovery::try_list_albums`], but a failure is logged and
    /// yields no albums.
    pub fn list_albums(&self) -> Vec<Album> {
        self.try_list_albums().unwrap_or_else(|e| {
            tracing::error!(error = %e, "album discovery failed");
            Vec::new()
        })
    }

    fn load_albums(&self, root: &Folder, names: &[String]) -> Vec<Album> {
        let cap = self.settings.metadata_concurrency.max(1);
        let mut albums: Vec<Album> = Vec::with_capacity(names.len());

        for batch in names.chunks(cap) {
            let results: Vec<Result<Album, MetadataError>> = if batch.len() == 1 {
                vec![self.load_album(root, &batch[0])]
            } else {
                thread::scope(|s| {
                    let handles: Vec<_> = batch
                        .iter()
                        .map(|name| s.spawn(move || self.load_album(root, name)))
                        .collect();
                    handles
                        .into_iter()
                        .zip(batch)
                        .filter_map(|(h, name)| match h.join() {
                            Ok(result) => Some(result),
                            Err(_) => {
                                tracing::warn!(
                                    album = %name,
                                    "album descriptor task panicked, skipping album"
                                );
                                None
                            }
                        })
                        .collect()
                })
            };

            for result in results {
                match result {
                    Ok(album) => albums.push(album),
                    Err(e) => tracing::warn!(error = %e, "skipping album"),
                }
            }
        }

        albums
    }

    fn load_album(&self, root: &Folder, name: &str) -> Result<Album, MetadataError> {
        let folder = Folder::new(&root.join(name));
        let path = folder.join(&self.settings.info_file);

        let body = self
            .fetcher
            .get_text(&path)
            .map_err(|e| MetadataError::Fetch {
                path: path.clone(),
                source: e,
            })?;
        let info: AlbumInfo =
            serde_json::from_str(&body).map_err(|e| MetadataError::Malformed {
                path: path.clone(),
                source: e,
            })?;

        Ok(Album {
            cover: folder.join(&self.settings.cover_file),
            folder,
            title: info.title,
            description: info.description,
        })
    }
}
