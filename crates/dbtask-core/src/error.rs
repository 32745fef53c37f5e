use std::path::PathBuf;

use thiserror::Error;

/// Error type shared across dbtask crates.
#[derive(Debug, Error)]
pub enum Error {
    /// The connection could not be opened or was already closed.
    #[error("connection error: {0}")]
    Connection(String),
    /// The database rejected a statement or the commit.
    #[error("query error: {0}")]
    Query(String),
    /// A SQL script could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// An environment file was given but could not be loaded.
    #[error("invalid configuration: {0}")]
    Config(String),
    /// Diagnostic output could not be written.
    #[error("output error: {0}")]
    Output(#[from] std::io::Error),
}

/// Convenience alias for results returned by dbtask crates.
pub type Result<T> = std::result::Result<T, Error>;
