//! Fixed token table, e.g. the on/off states of a 433 MHz socket

use crate::core::error::{ActError, Result};
use crate::core::types::{PublishInstruction, Resolution};

#[derive(Debug, Clone)]
pub struct DirectMapResolver {
    name: String,
    exchange: String,
    topic: String,
    address: String,
    states: Vec<(String, String)>,
}

impl DirectMapResolver {
    pub fn new(
        name: impl Into<String>,
        exchange: impl Into<String>,
        topic: impl Into<String>,
        address: impl Into<String>,
        states: Vec<(String, String)>,
    ) -> Self {
        Self {
            name: name.into(),
            exchange: exchange.into(),
            topic: topic.into(),
            address: address.into(),
            states,
        }
    }

    /// Map a state token to exactly one instruction
    pub fn resolve(&self, token: &str) -> Result<Resolution> {
        let token = token.trim();
        let (_, value) = self
            .states
            .iter()
            .find(|(state, _)| state == token)
            .ok_or_else(|| {
                ActError::malformed(
                    &self.name,
                    token,
                    format!("expected one of {}", self.usage().join(", ")),
                )
            })?;

        Ok(Resolution::Publish(vec![PublishInstruction::new(
            &self.exchange,
            &self.topic,
            format!("{} {}", self.address, value),
        )]))
    }

    /// Accepted tokens in table order
    pub fn usage(&self) -> Vec<String> {
        self.states.iter().map(|(state, _)| state.clone()).collect()
    }

    pub fn help_detail(&self) -> String {
        format!("STATES: {}", self.usage().join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sofaleds() -> DirectMapResolver {
        DirectMapResolver::new(
            "sofaleds",
            "act_433mhz",
            " ",
            "11111 1",
            vec![("on".into(), "1".into()), ("off".into(), "0".into())],
        )
    }

    #[test]
    fn test_known_tokens_map_to_address_payload() {
        let resolver = sofaleds();

        let on = resolver.resolve("on").unwrap();
        assert_eq!(
            on,
            Resolution::Publish(vec![PublishInstruction::new("act_433mhz", " ", "11111 1 1")])
        );

        let off = resolver.resolve("off").unwrap();
        assert_eq!(
            off,
            Resolution::Publish(vec![PublishInstruction::new("act_433mhz", " ", "11111 1 0")])
        );
    }

    #[test]
    fn test_unknown_token_is_malformed() {
        let resolver = sofaleds();
        let err = resolver.resolve("dim").unwrap_err();
        assert!(matches!(err, ActError::MalformedArgument { .. }));
        assert!(resolver.resolve("").is_err());
    }

    #[test]
    fn test_usage_lists_states() {
        let resolver = sofaleds();
        assert_eq!(resolver.usage(), vec!["on", "off"]);
        assert_eq!(resolver.help_detail(), "STATES: on, off");
    }
}
