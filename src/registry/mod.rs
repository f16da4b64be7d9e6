//! Actor registry
//!
//! Holds every configured actor under its unique name. Built once at startup
//! from the configuration and the channel catalog, then only read.

use ahash::AHashMap;
use std::time::Duration;

use crate::catalog::{channel_rules, fetch_best_effort, Channel, ChannelCatalog};
use crate::core::config::ActConfig;
use crate::core::error::{ActError, Result};
use crate::resolver::Actor;

/// Name-keyed collection of actors, listed in registration order
#[derive(Debug, Default)]
pub struct Registry {
    actors: Vec<Actor>,
    by_name: AHashMap<String, usize>,
}

impl Registry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from configuration and already fetched channels
    ///
    /// Channel rules go in front of the catalog actor's own rules.
    pub fn from_config(config: &ActConfig, channels: &[Channel]) -> Result<Self> {
        config.validate()?;
        Self::build(config, channels)
    }

    /// Assemble actors from a configuration that has already been validated
    fn build(config: &ActConfig, channels: &[Channel]) -> Result<Self> {
        let mut registry = Self::new();
        for actor_config in &config.actors {
            let extra_rules = if config.catalog.enabled && actor_config.name == config.catalog.actor
            {
                channel_rules(channels)
            } else {
                Vec::new()
            };
            registry.register(Actor::from_config(actor_config, extra_rules)?)?;
        }

        tracing::info!(
            actors = registry.len(),
            channels = channels.len(),
            "actor registry ready"
        );
        Ok(registry)
    }

    /// Add an actor, rejecting a name that is already taken
    pub fn register(&mut self, actor: Actor) -> Result<()> {
        if self.by_name.contains_key(actor.name()) {
            return Err(ActError::DuplicateName(actor.name().to_string()));
        }
        self.by_name.insert(actor.name().to_string(), self.actors.len());
        self.actors.push(actor);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Actor> {
        self.by_name.get(name).map(|&i| &self.actors[i])
    }

    pub fn lookup(&self, name: &str) -> Result<&Actor> {
        self.get(name)
            .ok_or_else(|| ActError::UnknownActor(name.to_string()))
    }

    /// Actor names in registration order
    pub fn names(&self) -> Vec<&str> {
        self.actors.iter().map(|a| a.name()).collect()
    }

    /// Names of actors offered as top-level commands
    pub fn exported_names(&self) -> Vec<&str> {
        self.actors
            .iter()
            .filter(|a| a.is_exported())
            .map(|a| a.name())
            .collect()
    }

    pub fn help_text(&self, name: &str) -> Result<String> {
        Ok(self.lookup(name)?.help_text())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Actor> {
        self.actors.iter()
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }
}

/// Build the registry, fetching the channel catalog once
///
/// A catalog that fails or exceeds `catalog.timeout_secs` adds no rules; the
/// registry is still built from the static configuration.
pub async fn build_registry<C: ChannelCatalog>(config: &ActConfig, catalog: &C) -> Result<Registry> {
    config.validate()?;

    let channels = if config.catalog.enabled {
        fetch_best_effort(catalog, Duration::from_secs(config.catalog.timeout_secs)).await
    } else {
        Vec::new()
    };

    Registry::build(config, &channels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Resolution;
    use crate::resolver::{DirectMapResolver, Resolver};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingCatalog {
        fetches: AtomicUsize,
    }

    impl ChannelCatalog for CountingCatalog {
        async fn fetch_channels(&self) -> Result<Vec<Channel>> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            Ok(Vec::new())
        }
    }

    fn lamp(name: &str) -> Actor {
        Actor::new(
            name,
            "test lamp",
            Resolver::DirectMap(DirectMapResolver::new(
                name,
                "act_433mhz",
                " ",
                "00000 1",
                vec![("on".into(), "1".into())],
            )),
        )
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = Registry::new();
        registry.register(lamp("bulb")).unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.lookup("bulb").unwrap().name(), "bulb");
        assert!(matches!(
            registry.lookup("frobnicate"),
            Err(ActError::UnknownActor(name)) if name == "frobnicate"
        ));
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut registry = Registry::new();
        registry.register(lamp("bulb")).unwrap();
        let err = registry.register(lamp("bulb")).unwrap_err();
        assert!(matches!(err, ActError::DuplicateName(_)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_names_keep_registration_order() {
        let registry = Registry::from_config(&ActConfig::default(), &[]).unwrap();
        assert_eq!(
            registry.names(),
            vec!["music", "sofaleds", "bulb", "dmx", "mpd", "light-scenario"]
        );
        assert_eq!(
            registry.exported_names(),
            vec!["music", "dmx", "mpd", "light-scenario"]
        );
    }

    #[test]
    fn test_channels_extend_catalog_actor() {
        let channels = vec![Channel {
            id: "spacestation".into(),
            title: "Space Station Soma".into(),
            play_command: "mpd playpls http://somafm.com/spacestation.pls".into(),
        }];
        let registry = Registry::from_config(&ActConfig::default(), &channels).unwrap();

        let music = registry.lookup("music").unwrap();
        assert_eq!(
            music.resolve("spacestation").unwrap(),
            Resolution::Expand(vec!["mpd playpls http://somafm.com/spacestation.pls".into()])
        );
        assert_eq!(music.usage()[0], "spacestation");

        let scenario = registry.lookup("light-scenario").unwrap();
        assert_eq!(scenario.usage(), vec!["shutdown", "startup"]);
    }

    #[test]
    fn test_help_text() {
        let registry = Registry::from_config(&ActConfig::default(), &[]).unwrap();
        assert_eq!(
            registry.help_text("dmx").unwrap(),
            "dmx: subraum DMX Actor - LAMPS: sofa, tuer, c64, bastelecke GROUPS: all"
        );
        assert!(registry.help_text("nope").is_err());
    }

    #[test]
    fn test_from_config_rejects_invalid_config() {
        let mut config = ActConfig::default();
        config.dispatch.max_depth = 0;
        assert!(matches!(
            Registry::from_config(&config, &[]),
            Err(ActError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_invalid_config_stops_before_catalog_fetch() {
        let mut config = ActConfig::default();
        config.actors.push(config.actors[0].clone());
        let catalog = CountingCatalog::default();

        let result = build_registry(&config, &catalog).await;
        assert!(matches!(result, Err(ActError::DuplicateName(name)) if name == "music"));
        assert_eq!(catalog.fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_build_registry_fetches_catalog_once() {
        let catalog = CountingCatalog::default();
        let registry = build_registry(&ActConfig::default(), &catalog).await.unwrap();
        assert_eq!(registry.len(), 6);
        assert_eq!(catalog.fetches.load(Ordering::SeqCst), 1);
    }
}
