//! Failure aggregation and report rendering
//!
//! Rendering is pure: every function turns its inputs into report lines and
//! leaves writing them to the caller.

use indexmap::IndexMap;

use super::schema::Schema;

/// Error messages grouped by field, then by row index
///
/// Fields keep the order of their first failure; rows keep arrival order,
/// which is ascending because rows are scanned in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FailureRecords {
    fields: IndexMap<String, IndexMap<usize, Vec<String>>>,
}

impl FailureRecords {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an error for one cell
    pub fn record(&mut self, field: &str, row: usize, message: impl Into<String>) {
        self.fields
            .entry(field.to_string())
            .or_default()
            .entry(row)
            .or_default()
            .push(message.into());
    }

    /// Errors recorded for one cell
    pub fn get(&self, field: &str, row: usize) -> Option<&[String]> {
        self.fields
            .get(field)
            .and_then(|rows| rows.get(&row))
            .map(Vec::as_slice)
    }

    /// Fields with failures, in first-failure order
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &IndexMap<usize, Vec<String>>)> {
        self.fields.iter().map(|(field, rows)| (field.as_str(), rows))
    }

    /// Number of failing cells
    pub fn cell_count(&self) -> usize {
        self.fields.values().map(IndexMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn clear(&mut self) {
        self.fields.clear();
    }
}

pub fn render_no_headers() -> Vec<String> {
    vec!["Source CSV has no field names".to_string()]
}

pub fn render_duplicates(duplicates: &IndexMap<String, Vec<usize>>) -> Vec<String> {
    let mut lines = vec!["Found duplicate column headers:".to_string()];
    for (header, idxs) in duplicates {
        let locations: Vec<String> = idxs.iter().map(usize::to_string).collect();
        lines.push(format!(
            "  Header: {}, columns: {}",
            header,
            locations.join(", ")
        ));
    }
    lines
}

/// `title` followed by one `'name': [],` suggestion per (already sorted) name
pub fn render_missing(title: &str, names: &[String]) -> Vec<String> {
    let mut lines = Vec::with_capacity(names.len() + 1);
    lines.push(title.to_string());
    lines.extend(names.iter().map(|name| format!("  '{}': [],", name)));
    lines
}

pub fn render_failures(failures: &FailureRecords, source: &str) -> Vec<String> {
    let mut lines = Vec::new();
    for (field, rows) in failures.iter() {
        lines.push(String::new());
        lines.push(format!("Failure on field: \"{}\":", field));
        for (row, errors) in rows {
            lines.push(format!("  {}:{}", source, row));
            lines.extend(errors.iter().map(|error| format!("    {}", error)));
        }
    }
    lines
}

/// Failure count and rejected values for every validator that rejected something
pub fn render_validator_summary(schema: &Schema, display_limit: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for (field, validators) in schema.iter() {
        for validator in validators {
            let invalid = validator.fails();
            if invalid.is_empty() {
                continue;
            }

            lines.push(format!(
                "  {} failed {} time(s) on field: '{}'",
                validator.kind(),
                validator.failure_count(),
                field
            ));
            let display: Vec<String> = invalid
                .iter()
                .take(display_limit)
                .map(|value| format!("'{}'", value))
                .collect();
            lines.push(format!("    Invalid fields: [{}]", display.join(", ")));

            let hidden = invalid.len().saturating_sub(display_limit);
            if hidden > 0 {
                lines.push(format!("    ({} more suppressed)", hidden));
            }
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::Row;
    use crate::validation::validators::{EmptyValidator, FieldValidator, TypeValidator};

    #[test]
    fn test_failure_records_group_by_field_and_row() {
        let mut failures = FailureRecords::new();
        failures.record("b", 2, "first");
        failures.record("a", 0, "second");
        failures.record("b", 2, "third");
        failures.record("b", 5, "fourth");

        assert_eq!(failures.fields().collect::<Vec<_>>(), ["b", "a"]);
        assert_eq!(failures.get("b", 2).unwrap(), ["first", "third"]);
        assert_eq!(failures.cell_count(), 3);
        assert!(failures.get("a", 1).is_none());
    }

    #[test]
    fn test_render_duplicates() {
        let mut duplicates = IndexMap::new();
        duplicates.insert("header1".to_string(), vec![0, 1]);
        assert_eq!(
            render_duplicates(&duplicates),
            [
                "Found duplicate column headers:",
                "  Header: header1, columns: 0, 1"
            ]
        );
    }

    #[test]
    fn test_render_failures() {
        let mut failures = FailureRecords::new();
        failures.record("int", 3, "bad cast");
        failures.record("int", 3, "bad pattern");

        assert_eq!(
            render_failures(&failures, "StringLoader('<string>')"),
            [
                "",
                "Failure on field: \"int\":",
                "  StringLoader('<string>'):3",
                "    bad cast",
                "    bad pattern",
            ]
        );
    }

    #[test]
    fn test_render_validator_summary_suppresses_beyond_limit() {
        let row = Row::new(0, Vec::<(String, String)>::new());
        let mut validator = TypeValidator::int(false);
        for i in 0..35 {
            let _ = validator.validate(&format!("x{}", i), &row);
        }
        let _ = validator.validate("x0", &row);

        let schema = Schema::new()
            .rule("n", validator)
            .rule("e", EmptyValidator::new());
        let lines = render_validator_summary(&schema, 30);

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "  IntVal failed 36 time(s) on field: 'n'");
        assert_eq!(lines[1].matches('\'').count(), 60);
        assert!(lines[1].starts_with("    Invalid fields: ['x0', 'x1', "));
        assert!(lines[1].ends_with("'x29']"));
        assert_eq!(lines[2], "    (5 more suppressed)");
    }
}
