use thiserror::Error;

use crate::library::DiscoveryError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("could not fetch {address}: {source}")]
    Fetch {
        address: String,
        #[source]
        source: DiscoveryError,
    },

    #[error("could not decode {address}: {source}")]
    Decode {
        address: String,
        #[source]
        source: rodio::decoder::DecoderError,
    },

    #[error("no audio output device: {0}")]
    NoOutputDevice(String),
}
