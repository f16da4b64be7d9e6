pub mod config;
pub mod error;
pub mod types;

pub use config::ActConfig;
pub use error::{ActError, Result};
pub use types::{PublishInstruction, Resolution};
