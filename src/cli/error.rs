//! Error types for the CLI

use std::path::PathBuf;

use thiserror::Error;

use crate::loader::LoaderError;
use crate::validation::{ConfigError, ValidationError};

/// Errors reported by CLI commands
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Failed to read {0}: {1}")]
    FileReadError(PathBuf, String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Loader(#[from] LoaderError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}
