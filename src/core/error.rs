use thiserror::Error;

#[derive(Error, Debug)]
pub enum ActError {
    #[error("Unknown actor: {0:?}")]
    UnknownActor(String),

    #[error("{actor}: unknown target {target:?}")]
    UnknownTarget { actor: String, target: String },

    #[error("{actor}: malformed argument {argument:?} ({reason})")]
    MalformedArgument {
        actor: String,
        argument: String,
        reason: String,
    },

    #[error("Duplicate actor name: {0}")]
    DuplicateName(String),

    #[error("Macro expansion exceeded depth {max_depth} at {command:?}")]
    DepthExceeded { max_depth: usize, command: String },

    #[error("Publish error: {0}")]
    Publish(String),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Pattern error: {0}")]
    RegexError(#[from] regex::Error),
}

impl ActError {
    /// True for failures caused by what the user typed, where showing the
    /// actor's help is the useful response.
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            ActError::UnknownTarget { .. } | ActError::MalformedArgument { .. }
        )
    }

    /// Actor whose resolver rejected the argument
    pub fn actor(&self) -> Option<&str> {
        match self {
            ActError::UnknownTarget { actor, .. } | ActError::MalformedArgument { actor, .. } => {
                Some(actor.as_str())
            }
            _ => None,
        }
    }

    pub(crate) fn malformed(actor: &str, argument: &str, reason: impl Into<String>) -> Self {
        ActError::MalformedArgument {
            actor: actor.to_string(),
            argument: argument.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn unknown_target(actor: &str, target: &str) -> Self {
        ActError::UnknownTarget {
            actor: actor.to_string(),
            target: target.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ActError>;
