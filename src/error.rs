//! Crate-level error type.

use crate::config::ConfigError;
use std::io;
use thiserror::Error;

/// Anything that can stop a training run.
///
/// Birds crashing is not an error; only bad settings, terminal/file I/O and
/// report serialization end up here.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
