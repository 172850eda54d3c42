//! Shared types and error handling

/// Result type for config loading and argument parsing
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors surfaced by the config tooling itself (as opposed to validation
/// findings, which are collected and reported, never raised)
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid network keyed: {0}")]
    UnknownNetwork(String),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not a valid JSON file: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
