//! Error types for the external resources the race depends on.
//!
//! Neither kind is ever fatal: callers log and carry on with no sound or an
//! empty history.

/// Failures reading or writing the key-value store.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// No storage backend is reachable (private browsing, missing window, ...).
    #[error("storage is unavailable")]
    Unavailable,

    /// A file read or write failed.
    #[error("storage I/O failed for key \"{key}\": {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// The browser's storage rejected a read or write (quota, security).
    #[error("browser storage failed for key \"{key}\": {message}")]
    Browser { key: String, message: String },

    /// A value could not be encoded or decoded as JSON.
    #[error("could not (de)serialize \"{key}\": {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Failures producing sound.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AudioError {
    /// The platform has no audio output, or it could not be created.
    #[error("audio output is unavailable")]
    Unavailable,

    /// The audio backend raised an error while building or starting a node.
    #[error("audio backend error: {0}")]
    Backend(String),
}
