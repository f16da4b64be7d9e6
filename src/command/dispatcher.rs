//! Command dispatch - turns a command line into bus instructions

use crate::command::publisher::Publisher;
use crate::core::config::DispatchConfig;
use crate::core::error::{ActError, Result};
use crate::core::types::{split_command, PublishInstruction, Resolution};
use crate::registry::Registry;

/// Resolves command lines against a registry, expanding macros recursively
#[derive(Debug, Clone, Copy)]
pub struct Dispatcher<'a> {
    registry: &'a Registry,
    max_depth: usize,
}

impl<'a> Dispatcher<'a> {
    pub fn new(registry: &'a Registry) -> Self {
        Self {
            registry,
            max_depth: DispatchConfig::default().max_depth,
        }
    }

    pub fn from_config(registry: &'a Registry, config: &DispatchConfig) -> Self {
        Self::new(registry).with_max_depth(config.max_depth)
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Resolve `"<actor> <argument>"` into an ordered instruction list
    ///
    /// Macro expansions are dispatched depth first, left to right. The first
    /// failing expansion aborts the whole command and nothing is returned.
    pub fn dispatch(&self, line: &str) -> Result<Vec<PublishInstruction>> {
        let mut instructions = Vec::new();
        self.dispatch_into(line, 0, &mut instructions)?;
        Ok(instructions)
    }

    fn dispatch_into(
        &self,
        line: &str,
        depth: usize,
        instructions: &mut Vec<PublishInstruction>,
    ) -> Result<()> {
        if depth > self.max_depth {
            return Err(ActError::DepthExceeded {
                max_depth: self.max_depth,
                command: line.to_string(),
            });
        }

        let (name, argument) = split_command(line);
        let actor = self.registry.lookup(name)?;

        match actor.resolve(argument)? {
            Resolution::Publish(resolved) => {
                tracing::debug!(actor = name, argument, depth, count = resolved.len(), "resolved");
                instructions.extend(resolved);
            }
            Resolution::Expand(commands) => {
                tracing::debug!(actor = name, argument, depth, ?commands, "expanding");
                for command in &commands {
                    self.dispatch_into(command, depth + 1, instructions)?;
                }
            }
            Resolution::NoOp => {
                tracing::debug!(actor = name, argument, depth, "nothing to do");
            }
        }

        Ok(())
    }

    /// Dispatch a line and hand every instruction to `publisher` in order
    ///
    /// Stops at the first publish failure; nothing is retried. Returns the
    /// instructions that were published.
    pub fn dispatch_and_publish<P: Publisher + ?Sized>(
        &self,
        line: &str,
        publisher: &P,
    ) -> Result<Vec<PublishInstruction>> {
        let instructions = self.dispatch(line)?;
        for instruction in &instructions {
            publisher.publish(instruction)?;
        }
        Ok(instructions)
    }
}
