//! Configuration for CSV validation
//!
//! Covers engine settings ([`ValidationConfig`]), serializable validator
//! descriptions ([`ValidatorSpec`]) and schema files ([`SchemaFile`]) in YAML
//! or JSON.

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use super::schema::Schema;
use super::validators::{
    AnyValidator, EmptyValidator, EnumValidator, FieldValidator, RegexValidator, TypeValidator,
    UniqueValidator,
};

/// Maximum number of distinct invalid values listed per validator
pub const DEFAULT_DISPLAY_LIMIT: usize = 30;

/// Field separator used when none is configured
pub const DEFAULT_DELIMITER: char = ',';

/// Serializable description of a field validator
///
/// ```yaml
/// - { type: int, empty_ok: true }
/// - { type: enum, values: [open, closed] }
/// - { type: unique, with: [region] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ValidatorSpec {
    Int {
        #[serde(default)]
        empty_ok: bool,
    },
    Float {
        #[serde(default)]
        empty_ok: bool,
    },
    Bool {
        #[serde(default)]
        empty_ok: bool,
    },
    Enum {
        values: Vec<String>,
        #[serde(default)]
        empty_ok: bool,
    },
    Unique {
        /// Co-key columns combined with the field value
        #[serde(default)]
        with: Vec<String>,
    },
    Regex {
        pattern: String,
        #[serde(default)]
        empty_ok: bool,
    },
    #[default]
    Empty,
    Any,
}

impl ValidatorSpec {
    /// Build a fresh validator instance
    pub fn build(&self) -> Result<Box<dyn FieldValidator>, ConfigError> {
        let validator: Box<dyn FieldValidator> = match self {
            ValidatorSpec::Int { empty_ok } => Box::new(TypeValidator::int(*empty_ok)),
            ValidatorSpec::Float { empty_ok } => Box::new(TypeValidator::float(*empty_ok)),
            ValidatorSpec::Bool { empty_ok } => Box::new(TypeValidator::boolean(*empty_ok)),
            ValidatorSpec::Enum { values, empty_ok } => {
                Box::new(EnumValidator::new(values.iter().cloned(), *empty_ok))
            }
            ValidatorSpec::Unique { with } => {
                Box::new(UniqueValidator::with_co_keys(with.iter().cloned()))
            }
            ValidatorSpec::Regex { pattern, empty_ok } => {
                Box::new(RegexValidator::new(pattern, *empty_ok)?)
            }
            ValidatorSpec::Empty => Box::new(EmptyValidator::new()),
            ValidatorSpec::Any => Box::new(AnyValidator::new()),
        };
        Ok(validator)
    }
}

/// Engine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Engine name shown in the `Validating ...` header line
    pub name: String,

    /// Single-byte field separator
    pub delimiter: char,

    /// Report duplicated column headers (advisory only)
    pub check_duplicate_headers: bool,

    /// Validator assigned to columns configured with no validators
    pub default_validator: ValidatorSpec,

    /// Maximum number of invalid values listed per validator
    pub display_limit: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            name: "CsvValidator".to_string(),
            delimiter: DEFAULT_DELIMITER,
            check_duplicate_headers: true,
            default_validator: ValidatorSpec::default(),
            display_limit: DEFAULT_DISPLAY_LIMIT,
        }
    }
}

impl ValidationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> ValidationConfigBuilder {
        ValidationConfigBuilder::default()
    }

    /// The delimiter as the byte the CSV reader expects
    pub fn delimiter_byte(&self) -> Result<u8, ConfigError> {
        if self.delimiter.is_ascii() {
            Ok(self.delimiter as u8)
        } else {
            Err(ConfigError::InvalidDelimiter(self.delimiter.to_string()))
        }
    }
}

/// Builder for ValidationConfig
#[derive(Debug, Default)]
pub struct ValidationConfigBuilder {
    config: ValidationConfig,
}

impl ValidationConfigBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.config.delimiter = delimiter;
        self
    }

    pub fn check_duplicate_headers(mut self, check: bool) -> Self {
        self.config.check_duplicate_headers = check;
        self
    }

    pub fn default_validator(mut self, spec: ValidatorSpec) -> Self {
        self.config.default_validator = spec;
        self
    }

    pub fn display_limit(mut self, limit: usize) -> Self {
        self.config.display_limit = limit;
        self
    }

    pub fn build(self) -> ValidationConfig {
        self.config
    }
}

/// A schema file: engine settings plus per-column validator lists
///
/// ```yaml
/// delimiter: ";"
/// columns:
///   id: [{ type: unique }]
///   note: []
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaFile {
    #[serde(flatten)]
    pub config: ValidationConfig,

    #[serde(default)]
    pub columns: IndexMap<String, Vec<ValidatorSpec>>,
}

impl SchemaFile {
    /// Load a schema file; `.json` files are parsed as JSON, anything else as YAML
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::SchemaRead {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let parsed: Result<Self, String> = if is_json {
            serde_json::from_str(&content).map_err(|e| e.to_string())
        } else {
            serde_yaml::from_str(&content).map_err(|e| e.to_string())
        };

        parsed.map_err(|reason| ConfigError::SchemaParse {
            path: path.display().to_string(),
            reason,
        })
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(|e| ConfigError::SchemaParse {
            path: "<string>".to_string(),
            reason: e.to_string(),
        })
    }

    /// Build fresh validators for every column
    pub fn to_schema(&self) -> Result<Schema, ConfigError> {
        let mut schema = Schema::new();
        for (column, specs) in &self.columns {
            let validators = specs
                .iter()
                .map(ValidatorSpec::build)
                .collect::<Result<Vec<_>, _>>()?;
            schema.insert(column.clone(), validators);
        }
        Ok(schema)
    }
}
