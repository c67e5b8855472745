//! Background discovery with stale-reply fencing.
//!
//! Requests are served one at a time on a worker thread so the UI loop never
//! blocks on the network. Every request gets a token; only the reply to the
//! most recent request of its kind is handed back, so a slow album switch
//! can never overwrite a newer one.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use super::discovery::Discovery;
use super::error::DiscoveryError;
use super::model::{Album, Folder, Queue};

pub type Token = u64;

/// Hands out increasing tokens and remembers the latest.
#[derive(Debug, Default)]
pub struct RequestFence {
    latest: Token,
}

impl RequestFence {
    pub fn issue(&mut self) -> Token {
        self.latest += 1;
        self.latest
    }

    pub fn is_current(&self, token: Token) -> bool {
        token == self.latest
    }
}

#[derive(Debug)]
enum DiscoveryRequest {
    Tracks {
        token: Token,
        folder: Folder,
        autostart: bool,
    },
    Albums {
        token: Token,
    },
}

#[derive(Debug)]
pub enum DiscoveryReply {
    Tracks {
        token: Token,
        folder: Folder,
        /// Whether the caller wants playback to start once the queue is in.
        autostart: bool,
        result: Result<Queue, DiscoveryError>,
    },
    Albums {
        token: Token,
        result: Result<Vec<Album>, DiscoveryError>,
    },
}

pub struct DiscoveryWorker {
    tx: Sender<DiscoveryRequest>,
    rx: Receiver<DiscoveryReply>,
    tracks: RequestFence,
    albums: RequestFence,
}

impl DiscoveryWorker {
    pub fn spawn(discovery: Discovery) -> Self {
        let (tx, request_rx) = mpsc::channel::<DiscoveryRequest>();
        let (reply_tx, rx) = mpsc::channel::<DiscoveryReply>();

        thread::spawn(move || {
            // Exits once the worker handle (and its sender) is dropped.
            for request in request_rx {
                let reply = match request {
                    DiscoveryRequest::Tracks {
                        token,
                        folder,
                        autostart,
                    } => DiscoveryReply::Tracks {
                        token,
                        result: discovery.try_list_tracks(&folder),
                        folder,
                        autostart,
                    },
                    DiscoveryRequest::Albums { token } => DiscoveryReply::Albums {
                        token,
                        result: discovery.try_list_albums(),
                    },
                };
                if reply_tx.send(reply).is_err() {
                    break;
                }
            }
        });

        Self {
            tx,
            rx,
            tracks: RequestFence::default(),
            albums: RequestFence::default(),
        }
    }

    /// Ask for `folder`'s queue. Supersedes any earlier track request.
    ///
    /// Fails when the worker thread is gone; no reply will come then.
    pub fn request_tracks(
        &mut self,
        folder: Folder,
        autostart: bool,
    ) -> Result<Token, DiscoveryError> {
        let token = self.tracks.issue();
        tracing::debug!(token, folder = %folder, "requesting tracks");
        self.send(DiscoveryRequest::Tracks {
            token,
            folder,
            autostart,
        })?;
        Ok(token)
    }

    /// Ask for the album list. Supersedes any earlier album request.
    pub fn request_albums(&mut self) -> Result<Token, DiscoveryError> {
        let token = self.albums.issue();
        self.send(DiscoveryRequest::Albums { token })?;
        Ok(token)
    }

    fn send(&self, request: DiscoveryRequest) -> Result<(), DiscoveryError> {
        self.tx.send(request).map_err(|e| {
            tracing::error!(request = ?e.0, "discovery worker has stopped");
            DiscoveryError::WorkerStopped
        })
    }

    /// Drain replies that arrived so far, dropping stale ones.
    pub fn poll(&self) -> Vec<DiscoveryReply> {
        let mut replies = Vec::new();
        while let Ok(reply) = self.rx.try_recv() {
            let current = match &reply {
                DiscoveryReply::Tracks { token, .. } => self.tracks.is_current(*token),
                DiscoveryReply::Albums { token, .. } => self.albums.is_current(*token),
            };
            if current {
                replies.push(reply);
            } else {
                tracing::debug!(?reply, "dropping stale discovery reply");
            }
        }
        replies
    }
}
