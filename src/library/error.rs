use thiserror::Error;

/// Failure to obtain a listing or any other resource from the content server.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("invalid address {address:?}: {reason}")]
    InvalidUrl { address: String, reason: String },
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },
    #[error("could not read response body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("discovery worker has stopped")]
    WorkerStopped,
}

/// A missing or malformed album descriptor. The album is skipped.
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("album descriptor {path} unavailable: {source}")]
    Fetch {
        path: String,
        #[source]
        source: DiscoveryError,
    },
    #[error("album descriptor {path} is malformed: {source}")]
    Malformed {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
