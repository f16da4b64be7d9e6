//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;

/// One message to put on the bus
///
/// `topic` is the routing key inside `exchange`. Instructions are never
/// modified after a resolver produces them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PublishInstruction {
    pub exchange: String,
    pub topic: String,
    pub payload: String,
}

impl PublishInstruction {
    pub fn new(
        exchange: impl Into<String>,
        topic: impl Into<String>,
        payload: impl Into<String>,
    ) -> Self {
        Self {
            exchange: exchange.into(),
            topic: topic.into(),
            payload: payload.into(),
        }
    }
}

impl fmt::Display for PublishInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] {}", self.exchange, self.topic, self.payload)
    }
}

/// Outcome of resolving one argument string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Instructions ready for the bus
    Publish(Vec<PublishInstruction>),
    /// Full command lines that must be dispatched again
    Expand(Vec<String>),
    /// Nothing to do
    NoOp,
}

/// Split a command line into actor name and argument string
///
/// The argument keeps its inner spacing but loses surrounding whitespace.
pub fn split_command(line: &str) -> (&str, &str) {
    let line = line.trim();
    match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (line, ""),
    }
}
