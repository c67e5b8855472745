//! Application model types: `App` and `Pane`.
//!
//! The `App` struct holds what the screen shows besides playback itself:
//! which list has focus, the cursor in each list, the albums, and a status
//! line. The track list is always the controller's queue.

use crate::audio::{PlaybackController, PlaybackEngine};
use crate::library::{Album, DiscoveryError, DiscoveryReply, Folder, Queue};

/// The list that receives cursor movement.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Pane {
    #[default]
    Tracks,
    Albums,
}

/// The main application model.
#[derive(Debug, Default)]
pub struct App {
    pub focus: Pane,
    pub selected_track: usize,
    pub selected_album: usize,
    pub albums: Vec<Album>,

    /// Folder whose listing is on its way, if any.
    pub pending_folder: Option<Folder>,
    pub albums_loading: bool,
    pub status: Option<String>,

    /// Move the track cursor along with playback.
    pub follow_playback: bool,
}

impl App {
    pub fn new(follow_playback: bool) -> Self {
        Self {
            follow_playback,
            ..Self::default()
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Pane::Tracks => Pane::Albums,
            Pane::Albums => Pane::Tracks,
        };
    }

    pub fn selected_album(&self) -> Option<&Album> {
        self.albums.get(self.selected_album)
    }

    /// Move the cursor of the focused list down, wrapping to the top.
    pub fn next(&mut self, track_count: usize) {
        let len = self.focused_len(track_count);
        if len == 0 {
            return;
        }
        let cursor = self.cursor_mut();
        *cursor = (*cursor + 1) % len;
        self.user_moved_cursor();
    }

    /// Move the cursor of the focused list up, wrapping to the bottom.
    pub fn prev(&mut self, track_count: usize) {
        let len = self.focused_len(track_count);
        if len == 0 {
            return;
        }
        let cursor = self.cursor_mut();
        *cursor = if *cursor == 0 || *cursor >= len {
            len - 1
        } else {
            *cursor - 1
        };
        self.user_moved_cursor();
    }

    pub fn select_first(&mut self) {
        *self.cursor_mut() = 0;
        self.user_moved_cursor();
    }

    pub fn select_last(&mut self, track_count: usize) {
        let len = self.focused_len(track_count);
        *self.cursor_mut() = len.saturating_sub(1);
        self.user_moved_cursor();
    }

    pub fn follow_playback_on(&mut self) {
        self.follow_playback = true;
    }

    /// Put the track cursor on `current` when following playback.
    pub fn follow(&mut self, current: Option<usize>) {
        if let (true, Some(i)) = (self.follow_playback, current) {
            self.selected_track = i;
        }
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    pub fn tracks_requested(&mut self, folder: Folder) {
        self.set_status(format!("loading {}…", folder.display_name()));
        self.pending_folder = Some(folder);
    }

    pub fn albums_requested(&mut self) {
        self.albums_loading = true;
    }

    /// A request never reached the worker, so nothing is loading any more.
    pub fn request_failed(&mut self, error: &DiscoveryError) {
        self.pending_folder = None;
        self.albums_loading = false;
        self.set_status(error.to_string());
    }

    /// Fold a discovery reply into the model and the player.
    pub fn apply_reply<E: PlaybackEngine>(
        &mut self,
        reply: DiscoveryReply,
        player: &mut PlaybackController<E>,
    ) {
        match reply {
            DiscoveryReply::Tracks {
                folder,
                autostart,
                result,
                ..
            } => {
                self.pending_folder = None;
                let queue = match result {
                    Ok(queue) => {
                        if queue.is_empty() {
                            self.set_status(format!(
                                "no playable tracks in {}",
                                folder.display_name()
                            ));
                        } else {
                            self.clear_status();
                        }
                        queue
                    }
                    Err(e) => {
                        self.set_status(format!("could not list {folder}: {e}"));
                        Queue::empty(folder)
                    }
                };

                let has_tracks = !queue.is_empty();
                player.load_queue(queue);
                self.selected_track = 0;
                self.follow_playback_on();
                if has_tracks {
                    player.play_track(0, autostart);
                }
            }
            DiscoveryReply::Albums { result, .. } => {
                self.albums_loading = false;
                match result {
                    Ok(albums) => self.albums = albums,
                    Err(e) => {
                        self.albums.clear();
                        self.set_status(format!("could not list albums: {e}"));
                    }
                }
                if self.selected_album >= self.albums.len() {
                    self.selected_album = self.albums.len().saturating_sub(1);
                }
            }
        }
    }

    fn focused_len(&self, track_count: usize) -> usize {
        match self.focus {
            Pane::Tracks => track_count,
            Pane::Albums => self.albums.len(),
        }
    }

    fn cursor_mut(&mut self) -> &mut usize {
        match self.focus {
            Pane::Tracks => &mut self.selected_track,
            Pane::Albums => &mut self.selected_album,
        }
    }

    fn user_moved_cursor(&mut self) {
        if self.focus == Pane::Tracks {
            self.follow_playback = false;
        }
    }
}
