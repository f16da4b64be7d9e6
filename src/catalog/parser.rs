//! Parse the SomaFM `channels.xml` directory
//!
//! Only the channel id, its title and a playlist URL are kept. The highest
//! quality playlist is preferred, the fast one is the fallback, and channels
//! offering neither are dropped.

use serde::Deserialize;

use crate::catalog::Channel;
use crate::core::error::{ActError, Result};

#[derive(Debug, Deserialize)]
struct ChannelList {
    #[serde(rename = "channel", default)]
    channels: Vec<ChannelEntry>,
}

#[derive(Debug, Deserialize)]
struct ChannelEntry {
    #[serde(rename = "@id")]
    id: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    highestpls: Vec<Playlist>,
    #[serde(default)]
    fastpls: Vec<Playlist>,
}

#[derive(Debug, Deserialize)]
struct Playlist {
    #[serde(rename = "$text", default)]
    url: String,
}

impl ChannelEntry {
    fn playlist(&self) -> Option<&str> {
        self.highestpls
            .iter()
            .chain(self.fastpls.iter())
            .map(|p| p.url.trim())
            .find(|url| !url.is_empty())
    }
}

/// Parse a channel directory, building each channel's play command as
/// `"{play_command} {playlist url}"`
pub fn parse_channels(xml: &str, play_command: &str) -> Result<Vec<Channel>> {
    let list: ChannelList = quick_xml::de::from_str(xml)
        .map_err(|e| ActError::Catalog(format!("malformed channel directory: {}", e)))?;

    let mut channels = Vec::with_capacity(list.channels.len());
    for entry in &list.channels {
        let Some(playlist) = entry.playlist() else {
            tracing::debug!(channel = %entry.id, "channel has no playlist, skipping");
            continue;
        };
        channels.push(Channel {
            id: entry.id.clone(),
            title: entry.title.clone().unwrap_or_default().trim().to_string(),
            play_command: format!("{} {}", play_command, playlist),
        });
    }

    Ok(channels)
}

#[cfg(test)]
pub(crate) const SAMPLE_CHANNELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" ?>
<channels>
  <channel id="groovesalad">
    <title><![CDATA[Groove Salad]]></title>
    <description><![CDATA[A nicely chilled plate of ambient beats.]]></description>
    <genre>ambient|electronica</genre>
    <fastpls format="mp3">http://somafm.com/groovesalad.pls</fastpls>
    <fastpls format="aac">http://somafm.com/groovesalad64.pls</fastpls>
    <slowpls format="aacp">http://somafm.com/groovesalad32.pls</slowpls>
    <highestpls format="mp3">http://somafm.com/groovesalad130.pls</highestpls>
    <listeners>1234</listeners>
  </channel>
  <channel id="spacestation">
    <title><![CDATA[Space Station Soma]]></title>
    <fastpls format="mp3">http://somafm.com/spacestation.pls</fastpls>
  </channel>
  <channel id="silent">
    <title><![CDATA[No Stream]]></title>
  </channel>
</channels>
"#;
