//! CSV validation engine
//!
//! Runs a [`Schema`] against the rows produced by a [`Loader`]:
//!
//! 1. open the source and read the header row
//! 2. default empty columns, report duplicate headers, reject missing
//!    validators and missing fields
//! 3. run every validator of every field of every row, collecting failures
//! 4. render failures and per-validator summaries into the transcript

use indexmap::IndexMap;
use tracing::{info, warn};

use super::config::ValidationConfig;
use super::error::{ValidationError, ValidatorError};
use super::logger::ValidationLogger;
use super::report::{self, FailureRecords};
use super::schema::{Schema, find_duplicates_by_idx, missing_fields, missing_validators};
use crate::loader::{Loader, Row, RowSource};

/// Verdict and transcript of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOutcome {
    pub passed: bool,
    pub log: String,
}

/// Validates delimited text from a loader against a schema
pub struct CsvValidator<L: Loader> {
    loader: L,
    schema: Schema,
    config: ValidationConfig,
    failures: FailureRecords,
    logger: ValidationLogger,
    duplicate_headers: IndexMap<String, Vec<usize>>,
    missing_validators: Vec<String>,
    missing_fields: Vec<String>,
    rows_scanned: usize,
}

impl<L: Loader> CsvValidator<L> {
    pub fn new(loader: L, schema: Schema) -> Self {
        Self {
            loader,
            schema,
            config: ValidationConfig::default(),
            failures: FailureRecords::new(),
            logger: ValidationLogger::new(),
            duplicate_headers: IndexMap::new(),
            missing_validators: Vec::new(),
            missing_fields: Vec::new(),
            rows_scanned: 0,
        }
    }

    /// Expect exactly `columns`, each checked by the default validator
    pub fn from_columns<S: Into<String>>(loader: L, columns: impl IntoIterator<Item = S>) -> Self {
        Self::new(loader, Schema::from_columns(columns))
    }

    pub fn with_config(mut self, config: ValidationConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// Failures collected by the last run
    pub fn failures(&self) -> &FailureRecords {
        &self.failures
    }

    /// Duplicate headers found by the last run
    pub fn duplicate_headers(&self) -> &IndexMap<String, Vec<usize>> {
        &self.duplicate_headers
    }

    /// Headers without validators found by the last run, sorted
    pub fn missing_validators(&self) -> &[String] {
        &self.missing_validators
    }

    /// Configured columns absent from the data in the last run, sorted
    pub fn missing_fields(&self) -> &[String] {
        &self.missing_fields
    }

    /// Number of data rows processed by the last run
    pub fn rows_scanned(&self) -> usize {
        self.rows_scanned
    }

    /// Validate and hand over the transcript
    pub fn run(&mut self) -> Result<ValidationOutcome, ValidationError> {
        let passed = self.validate()?;
        Ok(ValidationOutcome {
            passed,
            log: self.log(),
        })
    }

    /// Take the transcript written so far. Reading clears it.
    pub fn log(&mut self) -> String {
        self.logger.take()
    }

    /// Validate the source, returning the verdict.
    ///
    /// Data failures produce `Ok(false)`. Errors are reserved for problems
    /// with the source or the validator configuration.
    ///
    /// The transcript starts with the `Validating ...` header and ends with
    /// the verdict line, which follows any header findings, failure listings
    /// and summaries, including when the run stops at the header row.
    pub fn validate(&mut self) -> Result<bool, ValidationError> {
        self.reset();
        self.logger.log(format!(
            "Validating {}(source={})",
            self.config.name, self.loader
        ));
        info!("Validating {} with {} columns", self.loader, self.schema.len());

        let passed = self.check()?;
        self.logger.log(if passed {
            "Successful validation"
        } else {
            "Failed validation"
        });

        info!(
            "Validation of {} {}: {} rows, {} failing cells",
            self.loader,
            if passed { "passed" } else { "failed" },
            self.rows_scanned,
            self.failures.cell_count()
        );
        Ok(passed)
    }

    fn reset(&mut self) {
        self.schema.clear_defaults();
        self.schema.reset();
        self.failures.clear();
        self.logger.clear();
        self.duplicate_headers.clear();
        self.missing_validators.clear();
        self.missing_fields.clear();
        self.rows_scanned = 0;
    }

    fn check(&mut self) -> Result<bool, ValidationError> {
        let delimiter = self.config.delimiter_byte()?;
        let rows = RowSource::new(self.loader.open()?, delimiter)?;

        let headers = match rows.headers() {
            Some(headers) => headers.to_vec(),
            None => {
                self.logger.extend(report::render_no_headers());
                return Ok(false);
            }
        };

        if !self.reconcile(&headers)? {
            return Ok(false);
        }

        for row in rows {
            let row = row?;
            self.scan_row(&row)?;
            self.rows_scanned += 1;
        }

        if self.failures.is_empty() {
            return Ok(true);
        }

        let source = self.loader.to_string();
        self.logger
            .extend(report::render_failures(&self.failures, &source));
        self.logger.extend(report::render_validator_summary(
            &self.schema,
            self.config.display_limit,
        ));
        Ok(false)
    }

    /// Match the header row against the schema. `Ok(false)` aborts the run.
    fn reconcile(&mut self, headers: &[String]) -> Result<bool, ValidationError> {
        self.schema.apply_defaults(&self.config.default_validator)?;

        if self.config.check_duplicate_headers {
            self.duplicate_headers = find_duplicates_by_idx(headers);
            if !self.duplicate_headers.is_empty() {
                warn!(
                    "{} has duplicate column headers: {:?}",
                    self.loader,
                    self.duplicate_headers.keys().collect::<Vec<_>>()
                );
                self.logger
                    .extend(report::render_duplicates(&self.duplicate_headers));
            }
        }

        self.missing_validators = missing_validators(headers, &self.schema);
        if !self.missing_validators.is_empty() {
            self.logger.extend(report::render_missing(
                "Missing validators for:",
                &self.missing_validators,
            ));
            return Ok(false);
        }

        self.missing_fields = missing_fields(headers, &self.schema);
        if !self.missing_fields.is_empty() {
            self.logger.extend(report::render_missing(
                "Missing expected fields:",
                &self.missing_fields,
            ));
            return Ok(false);
        }

        Ok(true)
    }

    fn scan_row(&mut self, row: &Row) -> Result<(), ValidationError> {
        for (field_name, field) in row.iter() {
            let Some(validators) = self.schema.get_mut(field_name) else {
                continue;
            };
            for validator in validators.iter_mut() {
                match validator.validate(field, row) {
                    Ok(()) => {}
                    Err(ValidatorError::Failed(message)) => {
                        self.failures.record(field_name, row.index(), message);
                    }
                    Err(ValidatorError::Misconfigured(reason)) => {
                        return Err(ValidationError::Configuration(format!(
                            "{} on field '{}' ({})",
                            validator.kind(),
                            field_name,
                            reason
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}
