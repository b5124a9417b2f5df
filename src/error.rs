//! Error type shared by the matcher, rewriter and resolver.

use thiserror::Error;

/// Errors raised while resolving locale variants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MultilangError {
    /// A filename matched a locale convention but the captured token is not configured.
    #[error("Unrecognized locale '{token}' in filename '{filename}'")]
    UnrecognizedLocale { filename: String, token: String },

    /// `lang()` was asked for a locale the entry has no alternate for.
    #[error("Unknown locale \"{locale}\"")]
    UnknownLocale { locale: String },

    /// Two or more entries were relocated onto the same key.
    #[error("Destination '{destination}' claimed by {sources:?}")]
    DestinationCollision {
        destination: String,
        sources: Vec<String>,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, MultilangError>;
