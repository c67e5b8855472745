//! Content discovery: folder listings, tracks, and albums served over HTTP.

mod discovery;
mod display;
mod error;
mod fetch;
mod listing;
mod model;
mod worker;

pub use discovery::Discovery;
pub use error::DiscoveryError;
pub use fetch::{Fetcher, HttpFetcher};
pub use model::{Album, Folder, Queue, Track};
pub use worker::{DiscoveryReply, DiscoveryWorker};
