use std::path::PathBuf;

use thiserror::Error;

/// Result alias used by the store, agent and session layers.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The durable store could not be read.
    #[error("failed to read '{key}' from store: {reason}")]
    StoreRead { key: String, reason: String },

    /// The durable store did not acknowledge a write.
    #[error("failed to persist '{key}': {reason}")]
    StoreWrite { key: String, reason: String },

    /// A stored value exists but does not have the expected shape.
    #[error("stored value for '{key}' is malformed: {source}")]
    CorruptValue {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The page agent is gone (its task ended or its inbox is closed).
    #[error("page agent is unreachable")]
    AgentUnavailable,

    #[error("invalid configuration in {path}: {reason}")]
    Config { path: PathBuf, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
