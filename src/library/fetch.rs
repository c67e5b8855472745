//! Access to the content server.
//!
//! Everything above this module speaks in server-relative paths
//! (`songs/ncs/`, `songs/ncs/a.mp3`); `HttpFetcher` resolves them against the
//! configured base URL. Each call is a single attempt.

use std::time::Duration;

use reqwest::Url;
use reqwest::blocking::Client;

use crate::config::ServerSettings;

use super::error::DiscoveryError;

/// Source of listings, descriptors, and audio bytes.
pub trait Fetcher: Send + Sync {
    fn get_text(&self, path: &str) -> Result<String, DiscoveryError>;
    fn get_bytes(&self, path: &str) -> Result<Vec<u8>, DiscoveryError>;
}

pub struct HttpFetcher {
    client: Client,
    base: Url,
}

impl HttpFetcher {
    pub fn new(settings: &ServerSettings) -> Result<Self, DiscoveryError> {
        let mut base =
            Url::parse(&settings.base_url).map_err(|e| DiscoveryError::InvalidUrl {
                address: settings.base_url.clone(),
                reason: e.to_string(),
            })?;
        // Joining against "http://host/music" would drop "music".
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let mut builder =
            Client::builder().timeout(Duration::from_secs(settings.timeout_secs.max(1)));
        if !settings.use_system_proxy {
            builder = builder.no_proxy();
        }
        let client = builder
            .build()
            .map_err(|e| DiscoveryError::Transport {
                url: base.to_string(),
                source: e,
            })?;

        Ok(Self { client, base })
    }

    /// Absolute URL for a server-relative `path`.
    pub fn url_for(&self, path: &str) -> Result<Url, DiscoveryError> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|e| DiscoveryError::InvalidUrl {
                address: path.to_string(),
                reason: e.to_string(),
            })
    }

    fn get(&self, path: &str) -> Result<(String, reqwest::blocking::Response), DiscoveryError> {
        let url = self.url_for(path)?;
        let url_text = url.to_string();
        tracing::debug!(url = %url_text, "GET");

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| DiscoveryError::Transport {
                url: url_text.clone(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DiscoveryError::Status {
                url: url_text,
                status: status.as_u16(),
            });
        }
        Ok((url_text, response))
    }
}

impl Fetcher for HttpFetcher {
    fn get_text(&self, path: &str) -> Result<String, DiscoveryError> {
        let (url, response) = self.get(path)?;
        response
            .text()
            .map_err(|e| DiscoveryError::Body { url, source: e })
    }

    fn get_bytes(&self, path: &str) -> Result<Vec<u8>, DiscoveryError> {
        let (url, response) = self.get(path)?;
        response
            .bytes()
            .map(|b| b.to_vec())
            .map_err(|e| DiscoveryError::Body { url, source: e })
    }
}
