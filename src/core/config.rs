//! Actor configuration
//!
//! The whole actor setup is described by one TOML document. Nothing here is
//! mutated after load; a changed file is picked up by restarting the process.
//! `ActConfig::default()` describes the subraum venue the service was first
//! built for.

use crate::core::error::{ActError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Complete configuration of the resolution layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActConfig {
    #[serde(default)]
    pub dispatch: DispatchConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    /// Actors in registration (and help listing) order
    #[serde(default, rename = "actor")]
    pub actors: Vec<ActorConfig>,
}

/// Settings for recursive macro dispatch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Maximum macro nesting before a command is rejected
    ///
    /// A top-level command sits at depth 0; each macro expansion adds one.
    /// Real setups nest two or three levels, so 16 only trips on cycles.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
        }
    }
}

fn default_max_depth() -> usize {
    16
}

/// Remote streaming-channel catalog fetched once at startup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_catalog_url")]
    pub url: String,
    /// Upper bound for the whole fetch, after which it contributes nothing
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Macro actor that receives one rule per channel
    #[serde(default = "default_catalog_actor")]
    pub actor: String,
    /// Command prefix the playlist URL is appended to
    #[serde(default = "default_play_command")]
    pub play_command: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: default_catalog_url(),
            timeout_secs: default_timeout_secs(),
            actor: default_catalog_actor(),
            play_command: default_play_command(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_catalog_url() -> String {
    "http://api.somafm.com/channels.xml".into()
}

fn default_timeout_secs() -> u64 {
    5
}

fn default_catalog_actor() -> String {
    "music".into()
}

fn default_play_command() -> String {
    "mpd playpls".into()
}

/// One named actor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorConfig {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Offer this actor as a top-level command
    #[serde(default)]
    pub export: bool,
    #[serde(flatten)]
    pub kind: ActorKind,
}

/// Resolver strategy and its static tables
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActorKind {
    /// Fixed state table, e.g. a 433 MHz power socket
    DirectMap {
        #[serde(default = "default_direct_exchange")]
        exchange: String,
        #[serde(default = "default_topic")]
        topic: String,
        address: String,
        /// `(token, value)` pairs in help order
        states: Vec<(String, String)>,
    },
    /// Addressable lamps with named groups
    GroupFanout {
        #[serde(default = "default_group_exchange")]
        exchange: String,
        #[serde(default = "default_base_topic")]
        base_topic: String,
        #[serde(default = "default_location")]
        location: String,
        items: Vec<ItemConfig>,
        #[serde(default)]
        groups: Vec<GroupConfig>,
    },
    /// Free text gated by a pattern
    Passthrough {
        exchange: String,
        #[serde(default = "default_topic")]
        topic: String,
        /// Must match at the start of the text
        pattern: String,
    },
    /// Rewrite rules expanding into further commands
    Macro {
        #[serde(default)]
        rules: Vec<RuleConfig>,
    },
}

fn default_direct_exchange() -> String {
    "act_433mhz".into()
}

fn default_group_exchange() -> String {
    "act_dmx".into()
}

fn default_topic() -> String {
    " ".into()
}

fn default_base_topic() -> String {
    "dmx.lamp".into()
}

fn default_location() -> String {
    "somewhere".into()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemConfig {
    pub name: String,
    /// Topic suffix, usually the DMX start channel
    pub address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupConfig {
    pub name: String,
    pub members: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleConfig {
    pub pattern: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub expansions: Vec<String>,
}

impl RuleConfig {
    pub fn new(pattern: &str, description: &str, expansions: &[&str]) -> Self {
        Self {
            pattern: pattern.into(),
            description: description.into(),
            expansions: expansions.iter().map(|e| e.to_string()).collect(),
        }
    }
}

impl ActConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ActError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&contents)
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: ActConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn actor(&self, name: &str) -> Option<&ActorConfig> {
        self.actors.iter().find(|a| a.name == name)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.dispatch.max_depth == 0 {
            return Err(ActError::Config("dispatch.max_depth must be at least 1".into()));
        }

        let mut seen = HashSet::new();
        for actor in &self.actors {
            if actor.name.is_empty() || actor.name.contains(char::is_whitespace) {
                return Err(ActError::Config(format!(
                    "actor name {:?} must be a single non-empty word",
                    actor.name
                )));
            }
            if !seen.insert(actor.name.as_str()) {
                return Err(ActError::DuplicateName(actor.name.clone()));
            }

            match &actor.kind {
                ActorKind::DirectMap { states, .. } if states.is_empty() => {
                    return Err(ActError::Config(format!("{}: no states defined", actor.name)));
                }
                ActorKind::GroupFanout { items, groups, .. } => {
                    check_groups(&actor.name, items, groups)?;
                }
                ActorKind::Passthrough { pattern, .. } => {
                    regex::Regex::new(pattern)?;
                }
                ActorKind::Macro { rules } => {
                    for rule in rules {
                        regex::Regex::new(&rule.pattern)?;
                    }
                }
                _ => {}
            }
        }

        if self.catalog.enabled {
            match self.actor(&self.catalog.actor).map(|a| &a.kind) {
                Some(ActorKind::Macro { .. }) => {}
                Some(_) => {
                    return Err(ActError::Config(format!(
                        "catalog actor {} is not a macro actor",
                        self.catalog.actor
                    )))
                }
                None => {
                    return Err(ActError::Config(format!(
                        "catalog actor {} is not configured",
                        self.catalog.actor
                    )))
                }
            }
        }

        Ok(())
    }
}

/// Every group member must name a configured item
pub(crate) fn check_groups(actor: &str, items: &[ItemConfig], groups: &[GroupConfig]) -> Result<()> {
    for group in groups {
        if items.iter().any(|i| i.name == group.name) {
            return Err(ActError::Config(format!(
                "{}: group {} shadows an item of the same name",
                actor, group.name
            )));
        }
        for member in &group.members {
            if !items.iter().any(|i| &i.name == member) {
                return Err(ActError::Config(format!(
                    "{}: group {} references unknown item {}",
                    actor, group.name, member
                )));
            }
        }
    }
    Ok(())
}

impl Default for ActConfig {
    fn default() -> Self {
        let socket = |name: &str, description: &str, address: &str| ActorConfig {
            name: name.into(),
            description: description.into(),
            export: false,
            kind: ActorKind::DirectMap {
                exchange: default_direct_exchange(),
                topic: default_topic(),
                address: address.into(),
                states: vec![("on".into(), "1".into()), ("off".into(), "0".into())],
            },
        };

        let lamps = [("sofa", "96"), ("tuer", "24"), ("c64", "192"), ("bastelecke", "8")];

        Self {
            dispatch: DispatchConfig::default(),
            catalog: CatalogConfig::default(),
            actors: vec![
                ActorConfig {
                    name: "music".into(),
                    description:
                        "Play I some music: dis a $GENRE music! Try act music --help for details"
                            .into(),
                    export: true,
                    kind: ActorKind::Macro {
                        rules: vec![
                            RuleConfig::new(
                                "bassdrive",
                                "Bassdrive",
                                &["mpd playpls http://www.bassdrive.com/v2/streams/BassDrive3.pls"],
                            ),
                            RuleConfig::new(
                                "lunico",
                                "L'Unico",
                                &["mpd playthis http://lunico-stream.upb.de:8001/lunico_high_mp3"],
                            ),
                            RuleConfig::new(
                                "technobase",
                                "TechnoBase.FM",
                                &["mpd playpls http://listen.technobase.fm/aacplus.pls"],
                            ),
                            RuleConfig::new(
                                "trancebase",
                                "TranceBase.FM",
                                &["mpd playpls http://listen.trancebase.fm/aacplus.pls"],
                            ),
                            RuleConfig::new(
                                "equinoxe",
                                "Radio Equinoxe",
                                &["mpd playthis http://streaming.radionomy.com/Radio-Equinoxe"],
                            ),
                        ],
                    },
                },
                socket("sofaleds", "LEDs am Sofa", "11111 1"),
                socket("bulb", "Bunte Lampe", "11111 2"),
                ActorConfig {
                    name: "dmx".into(),
                    description: "subraum DMX Actor".into(),
                    export: true,
                    kind: ActorKind::GroupFanout {
                        exchange: default_group_exchange(),
                        base_topic: default_base_topic(),
                        location: "subraum".into(),
                        items: lamps
                            .iter()
                            .map(|(name, address)| ItemConfig {
                                name: name.to_string(),
                                address: address.to_string(),
                            })
                            .collect(),
                        groups: vec![GroupConfig {
                            name: "all".into(),
                            members: ["sofa", "tuer", "bastelecke", "c64"]
                                .iter()
                                .map(|m| m.to_string())
                                .collect(),
                        }],
                    },
                },
                ActorConfig {
                    name: "mpd".into(),
                    description:
                        "Music Player Daemon passthrough - See man mpc for available commands"
                            .into(),
                    export: true,
                    kind: ActorKind::Passthrough {
                        exchange: "act_mpd".into(),
                        topic: "subraum".into(),
                        pattern: r"(\w+|\w+ )+".into(),
                    },
                },
                ActorConfig {
                    name: "light-scenario".into(),
                    description: "Meta switch".into(),
                    export: true,
                    kind: ActorKind::Macro {
                        rules: vec![
                            RuleConfig::new(
                                "shutdown",
                                "Alles dunkel :(",
                                &["dmx all black", "sofaleds off", "bulb off", "mpd stop"],
                            ),
                            RuleConfig::new(
                                "startup",
                                "Alles an :)",
                                &[
                                    "dmx all background",
                                    "sofaleds on",
                                    "bulb on",
                                    "music spacestation",
                                ],
                            ),
                        ],
                    },
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ActConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.actors.len(), 6);
        assert_eq!(config.dispatch.max_depth, 16);
    }

    #[test]
    fn test_parse_minimal_toml() {
        let toml = r#"
            [catalog]
            enabled = false

            [[actor]]
            kind = "direct_map"
            name = "fan"
            address = "10101 3"
            states = [["on", "1"], ["off", "0"]]
        "#;

        let config = ActConfig::from_toml_str(toml).expect("Should parse");
        assert_eq!(config.actors.len(), 1);
        match &config.actors[0].kind {
            ActorKind::DirectMap {
                exchange, topic, ..
            } => {
                assert_eq!(exchange, "act_433mhz");
                assert_eq!(topic, " ");
            }
            other => panic!("unexpected kind {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let mut config = ActConfig::default();
        let copy = config.actors[1].clone();
        config.actors.push(copy);
        assert!(matches!(config.validate(), Err(ActError::DuplicateName(name)) if name == "sofaleds"));
    }

    #[test]
    fn test_group_with_unknown_member_rejected() {
        let toml = r#"
            [catalog]
            enabled = false

            [[actor]]
            kind = "group_fanout"
            name = "dmx"
            items = [{ name = "sofa", address = "96" }]
            groups = [{ name = "all", members = ["sofa", "kitchen"] }]
        "#;

        let err = ActConfig::from_toml_str(toml).unwrap_err();
        assert!(err.to_string().contains("kitchen"));
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let toml = r#"
            [catalog]
            enabled = false

            [[actor]]
            kind = "macro"
            name = "scene"
            rules = [{ pattern = "(unclosed", expansions = [] }]
        "#;

        assert!(matches!(
            ActConfig::from_toml_str(toml),
            Err(ActError::RegexError(_))
        ));
    }

    #[test]
    fn test_catalog_actor_must_exist() {
        let toml = r#"
            [catalog]
            actor = "radio"
        "#;

        assert!(matches!(
            ActConfig::from_toml_str(toml),
            Err(ActError::Config(_))
        ));
    }

    #[test]
    fn test_zero_depth_rejected() {
        let mut config = ActConfig::default();
        config.dispatch.max_depth = 0;
        assert!(config.validate().is_err());
    }
}
