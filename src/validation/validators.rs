//! Field validators
//!
//! Each validator checks a single field value (with the surrounding row for
//! cross-column rules) and remembers what it rejected during a run:
//! - TypeValidator: integer, float and boolean casts
//! - EnumValidator: membership in a fixed set
//! - UniqueValidator: no repeated values, optionally combined with co-key columns
//! - RegexValidator: prefix-anchored pattern match
//! - EmptyValidator: field must be empty
//! - AnyValidator: explicit "no constraint"

use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::num::IntErrorKind;

use indexmap::IndexSet;
use regex::Regex;

use super::error::{ConfigError, ValidatorError};
use crate::loader::Row;

/// A stateful rule bound to one schema column
pub trait FieldValidator: fmt::Debug {
    /// Name used in the per-validator summary, e.g. `IntVal`
    fn kind(&self) -> &'static str;

    /// Check one field. `Failed` is a data failure; `Misconfigured` aborts the run.
    fn validate(&mut self, field: &str, row: &Row) -> Result<(), ValidatorError>;

    /// Distinct rejected values (or composite keys) in first-rejection order
    fn fails(&self) -> Vec<String>;

    /// Number of rejections, including repeats of the same value
    fn failure_count(&self) -> usize;

    /// Forget everything recorded during a previous run
    fn reset(&mut self);
}

/// Rejection bookkeeping shared by the concrete validators
#[derive(Debug, Default, Clone)]
struct Rejections {
    count: usize,
    values: IndexSet<String>,
}

impl Rejections {
    fn reject(&mut self, value: impl Into<String>, message: String) -> Result<(), ValidatorError> {
        self.count += 1;
        self.values.insert(value.into());
        Err(ValidatorError::Failed(message))
    }

    fn fails(&self) -> Vec<String> {
        self.values.iter().cloned().collect()
    }

    fn clear(&mut self) {
        self.count = 0;
        self.values.clear();
    }
}

/// Target type of a [`TypeValidator`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Integer,
    Float,
    /// Any non-empty string is accepted; only the empty string can fail
    Boolean,
}

impl TypeKind {
    /// Attempt the cast, returning the conversion error message on failure
    pub fn parse(self, value: &str) -> Result<(), String> {
        match self {
            // Integers are unbounded; only the syntax can fail
            TypeKind::Integer => match value.trim().parse::<i128>() {
                Ok(_) => Ok(()),
                Err(e)
                    if matches!(
                        e.kind(),
                        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow
                    ) =>
                {
                    Ok(())
                }
                Err(e) => Err(e.to_string()),
            },
            TypeKind::Float => value
                .trim()
                .parse::<f64>()
                .map(|_| ())
                .map_err(|e| e.to_string()),
            TypeKind::Boolean => {
                if value.is_empty() {
                    Err("cannot parse boolean from empty string".to_string())
                } else {
                    Ok(())
                }
            }
        }
    }

    fn type_name(self) -> &'static str {
        match self {
            TypeKind::Integer => "int",
            TypeKind::Float => "float",
            TypeKind::Boolean => "bool",
        }
    }
}

/// Validates that a field casts to a primitive type
#[derive(Debug, Clone)]
pub struct TypeValidator {
    kind: TypeKind,
    empty_ok: bool,
    rejections: Rejections,
}

impl TypeValidator {
    pub fn new(kind: TypeKind, empty_ok: bool) -> Self {
        Self {
            kind,
            empty_ok,
            rejections: Rejections::default(),
        }
    }

    pub fn int(empty_ok: bool) -> Self {
        Self::new(TypeKind::Integer, empty_ok)
    }

    pub fn float(empty_ok: bool) -> Self {
        Self::new(TypeKind::Float, empty_ok)
    }

    pub fn boolean(empty_ok: bool) -> Self {
        Self::new(TypeKind::Boolean, empty_ok)
    }

    pub fn type_kind(&self) -> TypeKind {
        self.kind
    }
}

impl FieldValidator for TypeValidator {
    fn kind(&self) -> &'static str {
        match self.kind {
            TypeKind::Integer => "IntVal",
            TypeKind::Float => "FloatVal",
            TypeKind::Boolean => "BoolVal",
        }
    }

    fn validate(&mut self, field: &str, _row: &Row) -> Result<(), ValidatorError> {
        if field.is_empty() && self.empty_ok {
            return Ok(());
        }
        match self.kind.parse(field) {
            Ok(()) => Ok(()),
            Err(reason) => {
                let message = format!(
                    "TypeCastFailure: '{}' cannot be cast to {}: {}",
                    field,
                    self.kind.type_name(),
                    reason
                );
                self.rejections.reject(field, message)
            }
        }
    }

    fn fails(&self) -> Vec<String> {
        self.rejections.fails()
    }

    fn failure_count(&self) -> usize {
        self.rejections.count
    }

    fn reset(&mut self) {
        self.rejections.clear();
    }
}

/// Validates a field against an enumerated set of values
#[derive(Debug, Clone)]
pub struct EnumValidator {
    allowed: BTreeSet<String>,
    rejections: Rejections,
}

impl EnumValidator {
    pub fn new<S: Into<String>>(values: impl IntoIterator<Item = S>, empty_ok: bool) -> Self {
        let mut allowed: BTreeSet<String> = values.into_iter().map(Into::into).collect();
        if empty_ok {
            allowed.insert(String::new());
        }
        Self {
            allowed,
            rejections: Rejections::default(),
        }
    }

    fn describe_allowed(&self) -> String {
        let quoted: Vec<String> = self.allowed.iter().map(|v| format!("'{}'", v)).collect();
        format!("[{}]", quoted.join(", "))
    }
}

impl FieldValidator for EnumValidator {
    fn kind(&self) -> &'static str {
        "EnumVal"
    }

    fn validate(&mut self, field: &str, _row: &Row) -> Result<(), ValidatorError> {
        if self.allowed.contains(field) {
            return Ok(());
        }
        let message = format!("'{}' is not in {}", field, self.describe_allowed());
        self.rejections.reject(field, message)
    }

    fn fails(&self) -> Vec<String> {
        self.rejections.fails()
    }

    fn failure_count(&self) -> usize {
        self.rejections.count
    }

    fn reset(&mut self) {
        self.rejections.clear();
    }
}

/// Validates uniqueness of a column, optionally together with co-key columns
#[derive(Debug, Clone)]
pub struct UniqueValidator {
    co_keys: Vec<String>,
    seen: HashSet<Vec<String>>,
    rejections: Rejections,
}

impl UniqueValidator {
    pub fn new() -> Self {
        Self::with_co_keys(Vec::<String>::new())
    }

    /// Co-key names are deduplicated, keeping their first position
    pub fn with_co_keys<S: Into<String>>(co_keys: impl IntoIterator<Item = S>) -> Self {
        let co_keys: IndexSet<String> = co_keys.into_iter().map(Into::into).collect();
        Self {
            co_keys: co_keys.into_iter().collect(),
            seen: HashSet::new(),
            rejections: Rejections::default(),
        }
    }

    pub fn co_keys(&self) -> &[String] {
        &self.co_keys
    }
}

impl Default for UniqueValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// Render values like a tuple: `('a',)` or `('a', 'b')`
fn render_tuple(values: &[String]) -> String {
    let quoted: Vec<String> = values.iter().map(|v| format!("'{}'", v)).collect();
    if quoted.len() == 1 {
        format!("({},)", quoted[0])
    } else {
        format!("({})", quoted.join(", "))
    }
}

impl FieldValidator for UniqueValidator {
    fn kind(&self) -> &'static str {
        "UniqueVal"
    }

    fn validate(&mut self, field: &str, row: &Row) -> Result<(), ValidatorError> {
        let mut missing: Vec<&str> = self
            .co_keys
            .iter()
            .map(String::as_str)
            .filter(|column| !row.contains(column))
            .collect();
        if !missing.is_empty() {
            missing.sort_unstable();
            let names: Vec<String> = missing.iter().map(|c| format!("'{}'", c)).collect();
            return Err(ValidatorError::Misconfigured(format!(
                "unique co-key columns not present in row: {}",
                names.join(", ")
            )));
        }

        let mut key = Vec::with_capacity(self.co_keys.len() + 1);
        key.push(field.to_string());
        for column in &self.co_keys {
            key.push(row.get(column).unwrap_or_default().to_string());
        }

        if self.seen.contains(&key) {
            let message = if self.co_keys.is_empty() {
                format!("'{}' is already in the column", field)
            } else {
                format!(
                    "'{}' is already in the column (unique with: {})",
                    field,
                    render_tuple(&key[1..])
                )
            };
            let rendered = render_tuple(&key);
            return self.rejections.reject(rendered, message);
        }

        self.seen.insert(key);
        Ok(())
    }

    fn fails(&self) -> Vec<String> {
        self.rejections.fails()
    }

    fn failure_count(&self) -> usize {
        self.rejections.count
    }

    fn reset(&mut self) {
        self.seen.clear();
        self.rejections.clear();
    }
}

/// Validates a field against a regular expression anchored at the start
#[derive(Debug, Clone)]
pub struct RegexValidator {
    pattern: String,
    anchored: Regex,
    empty_ok: bool,
    rejections: Rejections,
}

impl RegexValidator {
    pub fn new(pattern: &str, empty_ok: bool) -> Result<Self, ConfigError> {
        let anchored = Regex::new(&format!("^(?:{})", pattern)).map_err(|e| {
            ConfigError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            }
        })?;
        Ok(Self {
            pattern: pattern.to_string(),
            anchored,
            empty_ok,
            rejections: Rejections::default(),
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

impl FieldValidator for RegexValidator {
    fn kind(&self) -> &'static str {
        "RegexVal"
    }

    fn validate(&mut self, field: &str, _row: &Row) -> Result<(), ValidatorError> {
        if (field.is_empty() && self.empty_ok) || self.anchored.is_match(field) {
            return Ok(());
        }
        let message = format!("'{}' does not match pattern /{}/", field, self.pattern);
        self.rejections.reject(field, message)
    }

    fn fails(&self) -> Vec<String> {
        self.rejections.fails()
    }

    fn failure_count(&self) -> usize {
        self.rejections.count
    }

    fn reset(&mut self) {
        self.rejections.clear();
    }
}

/// Validates that a field is always empty
#[derive(Debug, Clone, Default)]
pub struct EmptyValidator {
    rejections: Rejections,
}

impl EmptyValidator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FieldValidator for EmptyValidator {
    fn kind(&self) -> &'static str {
        "EmptyVal"
    }

    fn validate(&mut self, field: &str, _row: &Row) -> Result<(), ValidatorError> {
        if field.is_empty() {
            return Ok(());
        }
        let message = format!("'{}' is not an empty string", field);
        self.rejections.reject(field, message)
    }

    fn fails(&self) -> Vec<String> {
        self.rejections.fails()
    }

    fn failure_count(&self) -> usize {
        self.rejections.count
    }

    fn reset(&mut self) {
        self.rejections.clear();
    }
}

/// Accepts every value
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyValidator;

impl AnyValidator {
    pub fn new() -> Self {
        Self
    }
}

impl FieldValidator for AnyValidator {
    fn kind(&self) -> &'static str {
        "AnyVal"
    }

    fn validate(&mut self, _field: &str, _row: &Row) -> Result<(), ValidatorError> {
        Ok(())
    }

    fn fails(&self) -> Vec<String> {
        Vec::new()
    }

    fn failure_count(&self) -> usize {
        0
    }

    fn reset(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_row() -> Row {
        Row::new(0, Vec::<(String, String)>::new())
    }

    #[test]
    fn test_int_validator() {
        let row = empty_row();
        let mut validator = TypeValidator::int(false);
        assert!(validator.validate("42", &row).is_ok());
        assert!(validator.validate("-7", &row).is_ok());
        assert!(validator.validate(" 8 ", &row).is_ok());
        assert!(validator.validate("3.0", &row).is_err());
        assert!(validator.validate("", &row).is_err());
        assert!(validator.validate("3.0", &row).is_err());

        assert_eq!(validator.failure_count(), 3);
        assert_eq!(validator.fails(), ["3.0", ""]);
    }

    #[test]
    fn test_int_validator_message_carries_parse_error() {
        let mut validator = TypeValidator::int(false);
        let err = validator.validate("abc", &empty_row()).unwrap_err();
        assert_eq!(
            err,
            ValidatorError::Failed(
                "TypeCastFailure: 'abc' cannot be cast to int: invalid digit found in string"
                    .to_string()
            )
        );
    }

    #[test]
    fn test_int_validator_accepts_arbitrarily_large_integers() {
        let row = empty_row();
        let mut validator = TypeValidator::int(false);
        assert!(validator.validate("1234567890123456789012345678901234567890", &row).is_ok());
        assert!(validator.validate("-1234567890123456789012345678901234567890", &row).is_ok());
        assert!(validator.validate("12345678901234567890123456789012345678901.5", &row).is_err());
        assert_eq!(validator.failure_count(), 1);
    }

    #[test]
    fn test_float_validator() {
        let row = empty_row();
        let mut validator = TypeValidator::float(false);
        for value in ["1", "1.5", "-0.25", "1e5", ".5", "inf"] {
            assert!(validator.validate(value, &row).is_ok(), "{value}");
        }
        assert!(validator.validate("1,5", &row).is_err());
        assert!(validator.validate("", &row).is_err());
        assert_eq!(validator.kind(), "FloatVal");
    }

    #[test]
    fn test_bool_validator_is_permissive() {
        let row = empty_row();
        let mut validator = TypeValidator::boolean(false);
        assert!(validator.validate("yes", &row).is_ok());
        assert!(validator.validate("not a bool", &row).is_ok());
        assert!(validator.validate("", &row).is_err());
        assert_eq!(validator.fails(), [""]);
    }

    #[test]
    fn test_type_validators_empty_ok() {
        let row = empty_row();
        for mut validator in [
            TypeValidator::int(true),
            TypeValidator::float(true),
            TypeValidator::boolean(true),
        ] {
            assert!(validator.validate("", &row).is_ok());
            assert_eq!(validator.failure_count(), 0);
        }
    }

    #[test]
    fn test_enum_validator() {
        let row = empty_row();
        let mut validator = EnumValidator::new(["world", "WORLD"], false);
        assert!(validator.validate("world", &row).is_ok());
        assert!(validator.validate("", &row).is_err());

        let err = validator.validate("waffles", &row).unwrap_err();
        assert_eq!(err.to_string(), "'waffles' is not in ['WORLD', 'world']");
        assert_eq!(validator.fails(), ["", "waffles"]);

        let mut empty_ok = EnumValidator::new(["a"], true);
        assert!(empty_ok.validate("", &row).is_ok());
    }

    #[test]
    fn test_unique_validator_single_column() {
        let row = empty_row();
        let mut validator = UniqueValidator::new();
        assert!(validator.validate("a", &row).is_ok());
        assert!(validator.validate("b", &row).is_ok());

        let err = validator.validate("a", &row).unwrap_err();
        assert_eq!(err.to_string(), "'a' is already in the column");
        assert_eq!(validator.fails(), ["('a',)"]);
    }

    #[test]
    fn test_unique_validator_with_co_keys() {
        let mut validator = UniqueValidator::with_co_keys(["region", "year", "region"]);
        assert_eq!(validator.co_keys(), ["region", "year"]);

        let first = Row::new(0, [("id", "1"), ("region", "eu"), ("year", "2020")]);
        let other_region = Row::new(1, [("id", "1"), ("region", "us"), ("year", "2020")]);
        let repeat = Row::new(2, [("id", "1"), ("region", "eu"), ("year", "2020")]);

        assert!(validator.validate("1", &first).is_ok());
        assert!(validator.validate("1", &other_region).is_ok());

        let err = validator.validate("1", &repeat).unwrap_err();
        assert_eq!(
            err.to_string(),
            "'1' is already in the column (unique with: ('eu', '2020'))"
        );
        assert_eq!(validator.fails(), ["('1', 'eu', '2020')"]);
    }

    #[test]
    fn test_unique_validator_missing_co_key_is_misconfiguration() {
        let mut validator = UniqueValidator::with_co_keys(["value2", "value1"]);
        let row = Row::new(0, [("value1", "")]);
        let err = validator.validate("value1", &row).unwrap_err();
        assert!(matches!(err, ValidatorError::Misconfigured(_)));
        assert_eq!(validator.failure_count(), 0);
    }

    #[test]
    fn test_regex_validator_matches_from_start() {
        let row = empty_row();
        let mut validator = RegexValidator::new(r"foo", false).unwrap();
        assert!(validator.validate("foobar", &row).is_ok());
        assert!(validator.validate("barfoo", &row).is_err());
        assert!(validator.validate("", &row).is_err());

        let mut strict = RegexValidator::new(r"^foobar$", true).unwrap();
        assert!(strict.validate("", &row).is_ok());
        let err = strict.validate("notfoobar", &row).unwrap_err();
        assert_eq!(err.to_string(), "'notfoobar' does not match pattern /^foobar$/");
    }

    #[test]
    fn test_regex_validator_invalid_pattern() {
        assert!(matches!(
            RegexValidator::new("(unclosed", false),
            Err(ConfigError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_empty_and_any_validators() {
        let row = empty_row();
        let mut empty = EmptyValidator::new();
        assert!(empty.validate("", &row).is_ok());
        let err = empty.validate("I'M NOT EMPTY!", &row).unwrap_err();
        assert_eq!(err.to_string(), "'I'M NOT EMPTY!' is not an empty string");

        let mut any = AnyValidator::new();
        assert!(any.validate("anything", &row).is_ok());
        assert!(any.fails().is_empty());
    }

    #[test]
    fn test_reset_clears_state() {
        let row = empty_row();
        let mut validator = UniqueValidator::new();
        validator.validate("a", &row).unwrap();
        validator.validate("a", &row).unwrap_err();
        validator.reset();
        assert_eq!(validator.failure_count(), 0);
        assert!(validator.fails().is_empty());
        assert!(validator.validate("a", &row).is_ok());
    }
}
