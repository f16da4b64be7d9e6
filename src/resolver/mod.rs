//! Resolver strategies
//!
//! Every actor wraps one of a closed set of strategies:
//! DirectMap (state table), GroupFanout (items and groups),
//! Passthrough (gated free text) and Macro (rewrite rules).

pub mod direct_map;
pub mod group_fanout;
pub mod macros;
pub mod passthrough;

pub use direct_map::DirectMapResolver;
pub use group_fanout::GroupFanoutResolver;
pub use macros::{MacroResolver, MacroRule};
pub use passthrough::PassthroughResolver;

use crate::core::config::{ActorConfig, ActorKind};
use crate::core::error::Result;
use crate::core::types::Resolution;

#[derive(Debug)]
pub enum Resolver {
    DirectMap(DirectMapResolver),
    GroupFanout(GroupFanoutResolver),
    Passthrough(PassthroughResolver),
    Macro(MacroResolver),
}

impl Resolver {
    pub fn resolve(&self, argument: &str) -> Result<Resolution> {
        match self {
            Resolver::DirectMap(r) => r.resolve(argument),
            Resolver::GroupFanout(r) => r.resolve(argument),
            Resolver::Passthrough(r) => r.resolve(argument),
            Resolver::Macro(r) => r.resolve(argument),
        }
    }

    pub fn usage(&self) -> Vec<String> {
        match self {
            Resolver::DirectMap(r) => r.usage(),
            Resolver::GroupFanout(r) => r.usage(),
            Resolver::Passthrough(r) => r.usage(),
            Resolver::Macro(r) => r.usage(),
        }
    }

    pub fn help_detail(&self) -> String {
        match self {
            Resolver::DirectMap(r) => r.help_detail(),
            Resolver::GroupFanout(r) => r.help_detail(),
            Resolver::Passthrough(r) => r.help_detail(),
            Resolver::Macro(r) => r.help_detail(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Resolver::DirectMap(_) => "direct_map",
            Resolver::GroupFanout(_) => "group_fanout",
            Resolver::Passthrough(_) => "passthrough",
            Resolver::Macro(_) => "macro",
        }
    }
}

/// A named resolver as it appears in the registry
#[derive(Debug)]
pub struct Actor {
    name: String,
    description: String,
    export: bool,
    resolver: Resolver,
}

impl Actor {
    pub fn new(name: impl Into<String>, description: impl Into<String>, resolver: Resolver) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            export: false,
            resolver,
        }
    }

    pub fn exported(mut self, export: bool) -> Self {
        self.export = export;
        self
    }

    /// Build an actor from its configuration
    ///
    /// `extra_rules` are placed in front of a macro actor's own rules and are
    /// ignored for every other kind.
    pub fn from_config(config: &ActorConfig, extra_rules: Vec<MacroRule>) -> Result<Self> {
        let name = config.name.as_str();
        let resolver = match &config.kind {
            ActorKind::DirectMap {
                exchange,
                topic,
                address,
                states,
            } => Resolver::DirectMap(DirectMapResolver::new(
                name,
                exchange,
                topic,
                address,
                states.clone(),
            )),
            ActorKind::GroupFanout {
                exchange,
                base_topic,
                location,
                items,
                groups,
            } => Resolver::GroupFanout(GroupFanoutResolver::new(
                name,
                exchange,
                base_topic,
                location,
                items.clone(),
                groups.clone(),
            )?),
            ActorKind::Passthrough {
                exchange,
                topic,
                pattern,
            } => Resolver::Passthrough(PassthroughResolver::with_pattern(
                name, exchange, topic, pattern,
            )?),
            ActorKind::Macro { rules } => {
                let mut all_rules = extra_rules;
                for rule in rules {
                    all_rules.push(MacroRule::from_config(rule)?);
                }
                Resolver::Macro(MacroResolver::new(name, all_rules))
            }
        };

        Ok(Self::new(name, config.description.clone(), resolver).exported(config.export))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_exported(&self) -> bool {
        self.export
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    pub fn resolve(&self, argument: &str) -> Result<Resolution> {
        self.resolver.resolve(argument)
    }

    pub fn usage(&self) -> Vec<String> {
        self.resolver.usage()
    }

    /// One help line: name, description and usage detail
    pub fn help_text(&self) -> String {
        format!(
            "{}: {} - {}",
            self.name,
            self.description,
            self.resolver.help_detail()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ActConfig;

    #[test]
    fn test_actors_from_default_config() {
        let config = ActConfig::default();
        let actors: Vec<Actor> = config
            .actors
            .iter()
            .map(|a| Actor::from_config(a, Vec::new()).unwrap())
            .collect();

        let kinds: Vec<&str> = actors.iter().map(|a| a.resolver().kind()).collect();
        assert_eq!(
            kinds,
            vec!["macro", "direct_map", "direct_map", "group_fanout", "passthrough", "macro"]
        );
        assert!(actors[0].is_exported());
        assert!(!actors[1].is_exported());
    }

    #[test]
    fn test_extra_rules_go_first() {
        let config = ActConfig::default();
        let music = config.actor("music").unwrap();
        let extra = MacroRule::new(
            "bassdrive",
            "Shadowing rule",
            vec!["mpd playpls http://example.org/bd.pls".into()],
        )
        .unwrap();

        let actor = Actor::from_config(music, vec![extra]).unwrap();
        assert_eq!(
            actor.resolve("bassdrive").unwrap(),
            Resolution::Expand(vec!["mpd playpls http://example.org/bd.pls".into()])
        );
        assert_eq!(actor.usage()[0], "bassdrive");
    }

    #[test]
    fn test_help_text() {
        let config = ActConfig::default();
        let bulb = Actor::from_config(config.actor("bulb").unwrap(), Vec::new()).unwrap();
        assert_eq!(bulb.help_text(), "bulb: Bunte Lampe - STATES: on, off");
    }
}
