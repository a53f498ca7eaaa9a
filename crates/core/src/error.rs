use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::parsec::ParseError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("failed to tokenize {}: {source}", .path.display())]
    Parse { path: PathBuf, source: ParseError },

    #[error("no source files found under {roots:?}")]
    NoSourceFiles { roots: Vec<PathBuf> },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to write {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("failed to serialize records: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
