//! Startup errors
//!
//! Only configuration can fail; rule violations during play are reported
//! as rejected intents instead.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("player count must be between 1 and 4, got {0}")]
    InvalidPlayerCount(u8),
}
