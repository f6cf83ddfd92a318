//! Validator registry and schema reconciliation
//!
//! A [`Schema`] maps column names to ordered validator lists. The helpers in
//! this module compare it against the header row of the data before any row
//! is processed.

use std::collections::{BTreeSet, HashSet};

use indexmap::{IndexMap, IndexSet};

use super::config::ValidatorSpec;
use super::error::ConfigError;
use super::validators::FieldValidator;

/// Column name to ordered validators, in configuration order
#[derive(Debug, Default)]
pub struct Schema {
    columns: IndexMap<String, Vec<Box<dyn FieldValidator>>>,
    /// Columns currently holding only a default validator
    defaulted: IndexSet<String>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// A schema expecting exactly these columns, each left to the default validator
    pub fn from_columns<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        let mut schema = Self::new();
        for column in columns {
            schema.insert(column, Vec::new());
        }
        schema
    }

    /// Declare a column with no validators of its own
    pub fn column(mut self, name: impl Into<String>) -> Self {
        self.columns.entry(name.into()).or_default();
        self
    }

    /// Append a validator to a column, declaring the column if needed
    pub fn rule(mut self, name: impl Into<String>, validator: impl FieldValidator + 'static) -> Self {
        let name = name.into();
        if self.defaulted.shift_remove(&name) {
            self.columns.entry(name.clone()).or_default().clear();
        }
        self.columns
            .entry(name)
            .or_default()
            .push(Box::new(validator));
        self
    }

    /// Replace the validators of a column
    pub fn insert(&mut self, name: impl Into<String>, validators: Vec<Box<dyn FieldValidator>>) {
        let name = name.into();
        self.defaulted.shift_remove(&name);
        self.columns.insert(name, validators);
    }

    pub fn get(&self, name: &str) -> Option<&[Box<dyn FieldValidator>]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Vec<Box<dyn FieldValidator>>> {
        self.columns.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Box<dyn FieldValidator>])> {
        self.columns
            .iter()
            .map(|(name, validators)| (name.as_str(), validators.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Give every column without validators a fresh instance of `default`.
    /// Returns the number of columns that were defaulted.
    ///
    /// Defaults last until [`Schema::clear_defaults`], so a later run can
    /// apply a different default validator.
    pub fn apply_defaults(&mut self, default: &ValidatorSpec) -> Result<usize, ConfigError> {
        let mut defaulted = 0;
        for (name, validators) in self.columns.iter_mut() {
            if validators.is_empty() {
                validators.push(default.build()?);
                self.defaulted.insert(name.clone());
                defaulted += 1;
            }
        }
        Ok(defaulted)
    }

    /// Return every defaulted column to an empty validator list
    pub fn clear_defaults(&mut self) {
        for name in self.defaulted.drain(..) {
            if let Some(validators) = self.columns.get_mut(&name) {
                validators.clear();
            }
        }
    }

    /// Clear the accumulated state of every validator
    pub fn reset(&mut self) {
        for validator in self.columns.values_mut().flatten() {
            validator.reset();
        }
    }
}

/// Header names occurring more than once, with every 0-based position.
///
/// Names keep their first-occurrence order; positions are ascending.
pub fn find_duplicates_by_idx(headers: &[String]) -> IndexMap<String, Vec<usize>> {
    let mut positions: IndexMap<&str, Vec<usize>> = IndexMap::new();
    for (idx, header) in headers.iter().enumerate() {
        positions.entry(header.as_str()).or_default().push(idx);
    }
    positions
        .into_iter()
        .filter(|(_, idxs)| idxs.len() > 1)
        .map(|(header, idxs)| (header.to_string(), idxs))
        .collect()
}

/// Headers present in the data but absent from the schema, sorted
pub fn missing_validators(headers: &[String], schema: &Schema) -> Vec<String> {
    headers
        .iter()
        .filter(|header| !schema.contains(header))
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Schema columns absent from the data headers, sorted
pub fn missing_fields(headers: &[String], schema: &Schema) -> Vec<String> {
    let present: HashSet<&str> = headers.iter().map(String::as_str).collect();
    schema
        .columns()
        .filter(|column| !present.contains(column))
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validators::{AnyValidator, TypeValidator};

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_find_duplicates_by_idx() {
        let duplicates = find_duplicates_by_idx(&headers(&["b", "a", "b", "c", "a", "b"]));
        assert_eq!(duplicates.len(), 2);
        assert_eq!(duplicates.get_index(0), Some((&"b".to_string(), &vec![0, 2, 5])));
        assert_eq!(duplicates.get_index(1), Some((&"a".to_string(), &vec![1, 4])));

        assert!(find_duplicates_by_idx(&headers(&["a", "b"])).is_empty());
    }

    #[test]
    fn test_missing_validators_sorted() {
        let schema = Schema::new().rule("b", AnyValidator::new());
        let missing = missing_validators(&headers(&["zeta", "b", "alpha", "zeta"]), &schema);
        assert_eq!(missing, ["alpha", "zeta"]);
    }

    #[test]
    fn test_missing_fields_sorted() {
        let schema = Schema::from_columns(["unique", "extraheader2", "extraheader1"]);
        let missing = missing_fields(&headers(&["unique"]), &schema);
        assert_eq!(missing, ["extraheader1", "extraheader2"]);
    }

    #[test]
    fn test_apply_defaults_only_fills_empty_columns() {
        let mut schema = Schema::new()
            .column("a")
            .rule("b", TypeValidator::int(false));
        let defaulted = schema.apply_defaults(&ValidatorSpec::Any).unwrap();

        assert_eq!(defaulted, 1);
        assert_eq!(schema.get("a").unwrap()[0].kind(), "AnyVal");
        assert_eq!(schema.get("b").unwrap().len(), 1);
        assert_eq!(schema.get("b").unwrap()[0].kind(), "IntVal");

        // A second pass is a no-op
        assert_eq!(schema.apply_defaults(&ValidatorSpec::Any).unwrap(), 0);
    }

    #[test]
    fn test_clear_defaults_keeps_configured_validators() {
        let mut schema = Schema::new()
            .column("a")
            .rule("b", TypeValidator::int(false));
        schema.apply_defaults(&ValidatorSpec::Any).unwrap();
        schema.clear_defaults();

        assert!(schema.get("a").unwrap().is_empty());
        assert_eq!(schema.get("b").unwrap()[0].kind(), "IntVal");

        assert_eq!(schema.apply_defaults(&ValidatorSpec::Empty).unwrap(), 1);
        assert_eq!(schema.get("a").unwrap()[0].kind(), "EmptyVal");
    }

    #[test]
    fn test_schema_preserves_column_order() {
        let schema = Schema::from_columns(["c", "a", "b"]);
        assert_eq!(schema.columns().collect::<Vec<_>>(), ["c", "a", "b"]);
    }
}
