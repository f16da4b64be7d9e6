//! Free-form text forwarded verbatim once a predicate accepts it

use regex::Regex;
use std::fmt;

use crate::core::error::{ActError, Result};
use crate::core::types::{PublishInstruction, Resolution};

type Predicate = Box<dyn Fn(&str) -> bool + Send + Sync>;

pub struct PassthroughResolver {
    name: String,
    exchange: String,
    topic: String,
    accepts: Predicate,
}

impl PassthroughResolver {
    pub fn new(
        name: impl Into<String>,
        exchange: impl Into<String>,
        topic: impl Into<String>,
        accepts: impl Fn(&str) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            exchange: exchange.into(),
            topic: topic.into(),
            accepts: Box::new(accepts),
        }
    }

    /// Gate on a regex that must match at the start of the text
    pub fn with_pattern(
        name: impl Into<String>,
        exchange: impl Into<String>,
        topic: impl Into<String>,
        pattern: &str,
    ) -> Result<Self> {
        let regex = Regex::new(&format!("^(?:{})", pattern))?;
        Ok(Self::new(name, exchange, topic, move |text| {
            regex.is_match(text)
        }))
    }

    /// `text` arrives already trimmed by the dispatcher and is published as is
    pub fn resolve(&self, text: &str) -> Result<Resolution> {
        if !(self.accepts)(text) {
            return Err(ActError::malformed(&self.name, text, "rejected by input filter"));
        }

        Ok(Resolution::Publish(vec![PublishInstruction::new(
            &self.exchange,
            &self.topic,
            text,
        )]))
    }

    pub fn usage(&self) -> Vec<String> {
        vec!["TEXT".to_string()]
    }

    pub fn help_detail(&self) -> String {
        "USAGE: TEXT".to_string()
    }
}

impl fmt::Debug for PassthroughResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PassthroughResolver")
            .field("name", &self.name)
            .field("exchange", &self.exchange)
            .field("topic", &self.topic)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mpd() -> PassthroughResolver {
        PassthroughResolver::with_pattern("mpd", "act_mpd", "subraum", r"(\w+|\w+ )+").unwrap()
    }

    #[test]
    fn test_accepted_text_is_forwarded_verbatim() {
        let resolution = mpd()
            .resolve("playpls http://example.org/x.pls")
            .unwrap();
        assert_eq!(
            resolution,
            Resolution::Publish(vec![PublishInstruction::new(
                "act_mpd",
                "subraum",
                "playpls http://example.org/x.pls"
            )])
        );
    }

    #[test]
    fn test_rejected_text_is_malformed() {
        let resolver = mpd();
        assert!(matches!(
            resolver.resolve(""),
            Err(ActError::MalformedArgument { .. })
        ));
        assert!(matches!(
            resolver.resolve("; rm -rf"),
            Err(ActError::MalformedArgument { .. })
        ));
    }

    #[test]
    fn test_closure_predicate() {
        let resolver = PassthroughResolver::new("say", "act_tts", "speaker", |text| text.len() < 10);
        assert!(resolver.resolve("hello").is_ok());
        assert!(resolver.resolve("far too long for this").is_err());
        assert_eq!(resolver.usage(), vec!["TEXT"]);
    }
}
