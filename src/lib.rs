//! Act Resolver - command resolution for a home automation bus
//!
//! Turns short commands like `dmx all red` or `light-scenario shutdown` into
//! the messages that have to be published on the bus.

pub mod catalog;
pub mod command;
pub mod core;
pub mod registry;
pub mod resolver;

pub use crate::command::{Dispatcher, Publisher};
pub use crate::core::{ActConfig, ActError, PublishInstruction, Resolution, Result};
pub use crate::registry::{build_registry, Registry};
