//! CSV Schema Validator - validates delimited text against per-column rules
//!
//! Provides:
//! - Input loaders (in-memory strings, local files) and a lazy row source
//! - Field validators and the schema registry
//! - The validation engine, which reports every violation with its location
//!
//! ```rust
//! use csv_schema_validator::{CsvValidator, EmptyValidator, Schema, StringLoader, TypeValidator};
//!
//! let schema = Schema::new()
//!     .rule("a", TypeValidator::int(false))
//!     .rule("b", EmptyValidator::new());
//! let mut validator = CsvValidator::new(StringLoader::new("a,b\n1,\n"), schema);
//! let outcome = validator.run().unwrap();
//! assert!(outcome.passed);
//! ```

pub mod cli;
pub mod loader;
pub mod validation;

// Re-export commonly used types
pub use loader::{LocalFileLoader, Loader, LoaderError, Row, RowSource, StringLoader};
pub use validation::{
    AnyValidator, ConfigError, CsvValidator, EmptyValidator, EnumValidator, FailureRecords,
    FieldValidator, RegexValidator, Schema, SchemaFile, TypeKind, TypeValidator, UniqueValidator,
    ValidationConfig, ValidationError, ValidationOutcome, ValidatorError, ValidatorSpec,
};
