use std::fmt;

use serde::Deserialize;

use super::display::decode_for_display;

/// A server-relative directory, e.g. `songs/ncs`. Never starts or ends with `/`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Folder(String);

impl Folder {
    pub fn new(path: &str) -> Self {
        Self(path.trim().trim_matches('/').to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Address of `name` inside this folder, e.g. `songs/ncs/a.mp3`.
    pub fn join(&self, name: &str) -> String {
        let name = name.trim_start_matches('/');
        if self.0.is_empty() {
            name.to_string()
        } else {
            format!("{}/{}", self.0, name)
        }
    }

    /// Path used to request this folder's listing (trailing slash included).
    pub fn listing_path(&self) -> String {
        format!("{}/", self.0)
    }

    /// Last path segment, percent-decoded.
    pub fn display_name(&self) -> String {
        let last = self.0.rsplit('/').next().unwrap_or_default();
        decode_for_display(last)
    }
}

impl fmt::Display for Folder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A playable entry of a folder listing.
///
/// `id` keeps the percent-encoding of the listing so it can be used to build
/// the request address as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    id: String,
    display: String,
}

impl Track {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        let display = decode_for_display(&id);
        Self { id, display }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Percent-decoded name for rendering.
    pub fn display(&self) -> &str {
        &self.display
    }
}

/// Ordered tracks of exactly one folder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Queue {
    folder: Folder,
    tracks: Vec<Track>,
}

impl Queue {
    pub fn new(folder: Folder, tracks: Vec<Track>) -> Self {
        Self { folder, tracks }
    }

    /// An empty queue for `folder` ("no playable content").
    pub fn empty(folder: Folder) -> Self {
        Self::new(folder, Vec::new())
    }

    pub fn folder(&self) -> &Folder {
        &self.folder
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Server-relative address of the track at `index`.
    pub fn address(&self, index: usize) -> Option<String> {
        self.get(index).map(|t| self.folder.join(t.id()))
    }
}

/// Body of a per-album descriptor (`info.json`).
#[derive(Debug, Clone, Deserialize)]
pub struct AlbumInfo {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// A folder of tracks plus its descriptive metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Album {
    pub folder: Folder,
    pub title: String,
    pub description: String,
    /// Server-relative address of the cover image. Not fetched by discovery.
    pub cover: String,
}
