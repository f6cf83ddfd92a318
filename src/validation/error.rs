//! Error types for CSV validation

use thiserror::Error;

use crate::loader::LoaderError;

/// Outcome of a single validator rejecting a field
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidatorError {
    /// The field value broke the rule. Recorded and reported, never fatal.
    #[error("{0}")]
    Failed(String),

    /// The validator cannot run against this row at all (caller bug)
    #[error("Validator misconfigured: {0}")]
    Misconfigured(String),
}

/// Errors raised while building validators or reading schema configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Regex pattern did not compile
    #[error("Invalid regex pattern /{pattern}/: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// Delimiter must be a single byte
    #[error("Invalid delimiter {0:?}: must be a single ASCII character")]
    InvalidDelimiter(String),

    /// Schema file could not be read
    #[error("Unable to read schema file {path}: {reason}")]
    SchemaRead { path: String, reason: String },

    /// Schema file could not be parsed
    #[error("Invalid schema file {path}: {reason}")]
    SchemaParse { path: String, reason: String },
}

/// Errors that abort a validation run before a verdict is produced
///
/// Bad data is not an error: it yields a failed [`super::ValidationOutcome`].
#[derive(Error, Debug)]
pub enum ValidationError {
    /// A validator was configured against columns the data cannot satisfy
    #[error("Validation configuration error: {0}")]
    Configuration(String),

    /// The input could not be opened or read
    #[error(transparent)]
    Loader(#[from] LoaderError),

    /// A validator could not be built from its configuration
    #[error(transparent)]
    Config(#[from] ConfigError),
}
