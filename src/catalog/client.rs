//! HTTP client for the remote channel directory

use reqwest::Client;

use crate::catalog::parser::parse_channels;
use crate::catalog::{Channel, ChannelCatalog};
use crate::core::config::CatalogConfig;
use crate::core::error::{ActError, Result};

/// Fetches `channels.xml` over HTTP
pub struct HttpChannelCatalog {
    client: Client,
    url: String,
    play_command: String,
}

impl HttpChannelCatalog {
    pub fn new(url: impl Into<String>, play_command: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
            play_command: play_command.into(),
        }
    }

    pub fn from_config(config: &CatalogConfig) -> Self {
        Self::new(&config.url, &config.play_command)
    }
}

impl ChannelCatalog for HttpChannelCatalog {
    async fn fetch_channels(&self) -> Result<Vec<Channel>> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| ActError::Catalog(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ActError::Catalog(format!(
                "{} returned {}",
                self.url,
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ActError::Catalog(e.to_string()))?;

        parse_channels(&body, &self.play_command)
    }
}
