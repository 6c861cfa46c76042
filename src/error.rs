use crate::dnssec::KeyTagError;
use crate::zone::ZoneError;
use thiserror::Error;

/// Top-level error for an anchorwatch run
#[derive(Error, Debug)]
pub enum Error {
    #[error("{source_name}: {error}")]
    Zone {
        source_name: String,
        #[source]
        error: ZoneError,
    },

    #[error("{source_name}: line {line}: {error}")]
    KeyTag {
        source_name: String,
        line: usize,
        #[source]
        error: KeyTagError,
    },

    #[error("{path}: {error}")]
    Io {
        path: String,
        #[source]
        error: std::io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),
}

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid output format: {0}")]
    InvalidOutputFormat(String),

    #[error("Invalid query command: {0}")]
    InvalidQueryCommand(String),

    #[error("Invalid log filter: {0}")]
    InvalidLogFilter(String),

    #[error("{path}: line {line}: {message}")]
    ResolverConfig {
        path: String,
        line: usize,
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
