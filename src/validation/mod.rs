//! Validation functionality
//!
//! Provides schema-driven validation of delimited text:
//! - Field validators (type casts, enumerations, uniqueness, patterns)
//! - Schema reconciliation against the header row
//! - The validation engine and its report

pub mod config;
pub mod engine;
pub mod error;
pub mod logger;
pub mod report;
pub mod schema;
pub mod validators;

pub use config::{
    DEFAULT_DELIMITER, DEFAULT_DISPLAY_LIMIT, SchemaFile, ValidationConfig,
    ValidationConfigBuilder, ValidatorSpec,
};
pub use engine::{CsvValidator, ValidationOutcome};
pub use error::{ConfigError, ValidationError, ValidatorError};
pub use logger::ValidationLogger;
pub use report::FailureRecords;
pub use schema::Schema;
pub use validators::{
    AnyValidator, EmptyValidator, EnumValidator, FieldValidator, RegexValidator, TypeKind,
    TypeValidator, UniqueValidator,
};
