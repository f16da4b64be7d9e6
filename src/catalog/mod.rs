//! Startup channel catalog
//!
//! The catalog is the one piece of external I/O in the crate. It is fetched
//! once while the registry is built and turned into macro rules; a failed or
//! slow fetch contributes no rules and never aborts startup.

pub mod client;
pub mod parser;

pub use client::HttpChannelCatalog;

use std::future::Future;
use std::time::Duration;

use crate::core::error::Result;
use crate::resolver::MacroRule;

/// One selectable streaming channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub id: String,
    pub title: String,
    /// Full command line that starts playback
    pub play_command: String,
}

/// Source of channel descriptors
pub trait ChannelCatalog {
    fn fetch_channels(&self) -> impl Future<Output = Result<Vec<Channel>>> + Send;
}

/// Fixed channel list, for offline setups and tests
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    channels: Vec<Channel>,
}

impl StaticCatalog {
    pub fn new(channels: Vec<Channel>) -> Self {
        Self { channels }
    }
}

impl ChannelCatalog for StaticCatalog {
    async fn fetch_channels(&self) -> Result<Vec<Channel>> {
        Ok(self.channels.clone())
    }
}

/// Fetch channels, logging and swallowing catalog failures and timeouts
pub async fn fetch_best_effort<C: ChannelCatalog>(catalog: &C, timeout: Duration) -> Vec<Channel> {
    match tokio::time::timeout(timeout, catalog.fetch_channels()).await {
        Ok(Ok(channels)) => {
            tracing::info!(count = channels.len(), "channel catalog loaded");
            channels
        }
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "channel catalog unavailable, continuing without it");
            Vec::new()
        }
        Err(_) => {
            tracing::warn!(
                timeout_secs = timeout.as_secs_f64(),
                "channel catalog timed out, continuing without it"
            );
            Vec::new()
        }
    }
}

/// One macro rule per channel, matching the literal channel id
pub fn channel_rules(channels: &[Channel]) -> Vec<MacroRule> {
    channels
        .iter()
        .filter_map(|channel| {
            match MacroRule::new(
                &regex::escape(&channel.id),
                channel.title.clone(),
                vec![channel.play_command.clone()],
            ) {
                Ok(rule) => Some(rule),
                Err(e) => {
                    tracing::warn!(channel = %channel.id, error = %e, "skipping channel");
                    None
                }
            }
        })
        .collect()
}
