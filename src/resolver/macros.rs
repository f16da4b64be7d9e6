//! Rewrite rules that expand one command into several
//!
//! Rules are tried in order and the first pattern matching at the start of
//! the argument wins. Its expansions are full command lines which the
//! dispatcher resolves again, possibly through another macro.

use regex::Regex;

use crate::core::config::RuleConfig;
use crate::core::error::{ActError, Result};
use crate::core::types::Resolution;

#[derive(Debug, Clone)]
pub struct MacroRule {
    source: String,
    pattern: Regex,
    description: String,
    expansions: Vec<String>,
}

impl MacroRule {
    pub fn new(
        pattern: &str,
        description: impl Into<String>,
        expansions: Vec<String>,
    ) -> Result<Self> {
        Ok(Self {
            source: pattern.to_string(),
            pattern: Regex::new(&format!("^(?:{})", pattern))?,
            description: description.into(),
            expansions,
        })
    }

    pub fn from_config(rule: &RuleConfig) -> Result<Self> {
        Self::new(&rule.pattern, rule.description.clone(), rule.expansions.clone())
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn expansions(&self) -> &[String] {
        &self.expansions
    }

    fn matches(&self, argument: &str) -> bool {
        self.pattern.is_match(argument)
    }
}

#[derive(Debug, Clone)]
pub struct MacroResolver {
    name: String,
    rules: Vec<MacroRule>,
}

impl MacroResolver {
    pub fn new(name: impl Into<String>, rules: Vec<MacroRule>) -> Self {
        Self {
            name: name.into(),
            rules,
        }
    }

    pub fn resolve(&self, argument: &str) -> Result<Resolution> {
        let rule = self
            .rules
            .iter()
            .find(|rule| rule.matches(argument))
            .ok_or_else(|| ActError::unknown_target(&self.name, argument))?;

        tracing::debug!(actor = %self.name, rule = %rule.source, "macro rule matched");

        if rule.expansions.is_empty() {
            return Ok(Resolution::NoOp);
        }
        Ok(Resolution::Expand(rule.expansions.clone()))
    }

    /// Pattern sources in rule order
    pub fn usage(&self) -> Vec<String> {
        self.rules.iter().map(|rule| rule.source.clone()).collect()
    }

    pub fn help_detail(&self) -> String {
        let commands: Vec<String> = self
            .rules
            .iter()
            .map(|rule| format!("{}->{}", rule.source, rule.description))
            .collect();
        format!("COMMANDS: {}", commands.join(", "))
    }
}
