//! Validate command implementation

use std::io::Read;
use std::path::PathBuf;

use tracing::info;

use crate::cli::error::CliError;
use crate::cli::output::format_outcome;
use crate::loader::{LocalFileLoader, Loader, RowSource, StringLoader};
use crate::validation::{CsvValidator, Schema, SchemaFile, ValidationConfig, ValidatorSpec};

/// Arguments for the `csv-validate` command
#[derive(Debug, Default)]
pub struct ValidateArgs {
    /// CSV input path, or `-` for stdin
    pub input: String,
    /// Schema file (YAML or JSON)
    pub schema: Option<PathBuf>,
    /// Expected columns, each checked by the default validator
    pub columns: Option<Vec<String>>,
    /// Overrides the configured delimiter
    pub delimiter: Option<char>,
    /// Overrides the configured default validator
    pub default_validator: Option<ValidatorSpec>,
    /// Overrides the engine name in the report header
    pub name: Option<String>,
    /// Skip the duplicate header advisory
    pub no_duplicate_header_check: bool,
    /// Print only the verdict
    pub quiet: bool,
}

/// Load input from file or stdin
fn load_input(input: &str) -> Result<Box<dyn Loader>, CliError> {
    if input == "-" {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .map_err(|e| CliError::InvalidArgument(format!("Failed to read stdin: {}", e)))?;
        Ok(Box::new(StringLoader::named("<stdin>", content)))
    } else {
        let path = PathBuf::from(input);
        if !path.is_file() {
            return Err(CliError::FileReadError(path, "not a file".to_string()));
        }
        Ok(Box::new(LocalFileLoader::new(path)))
    }
}

/// Resolve the schema and settings from a schema file, a column list, or the
/// input's own header row (in that order of preference)
fn resolve_schema(
    args: &ValidateArgs,
    loader: &dyn Loader,
) -> Result<(Schema, ValidationConfig), CliError> {
    if let Some(path) = &args.schema {
        let schema_file = SchemaFile::from_path(path)?;
        let schema = schema_file.to_schema()?;
        return Ok((schema, schema_file.config));
    }

    let config = ValidationConfig::default();
    if let Some(columns) = &args.columns {
        return Ok((Schema::from_columns(columns.iter().cloned()), config));
    }

    let delimiter = args.delimiter.unwrap_or(config.delimiter);
    if !delimiter.is_ascii() {
        return Err(CliError::InvalidArgument(format!(
            "Delimiter {:?} must be a single ASCII character",
            delimiter
        )));
    }
    let rows = RowSource::new(loader.open()?, delimiter as u8)?;
    let headers = rows.headers().unwrap_or_default().to_vec();
    info!("Using {} header columns from the input as the schema", headers.len());
    Ok((Schema::from_columns(headers), config))
}

fn apply_overrides(args: &ValidateArgs, mut config: ValidationConfig) -> ValidationConfig {
    if let Some(delimiter) = args.delimiter {
        config.delimiter = delimiter;
    }
    if let Some(spec) = &args.default_validator {
        config.default_validator = spec.clone();
    }
    if let Some(name) = &args.name {
        config.name = name.clone();
    }
    if args.no_duplicate_header_check {
        config.check_duplicate_headers = false;
    }
    config
}

/// Handle the validate command, returning the verdict
pub fn handle_validate(args: &ValidateArgs) -> Result<bool, CliError> {
    if args.schema.is_some() && args.columns.is_some() {
        return Err(CliError::InvalidArgument(
            "--schema and --columns cannot be combined".to_string(),
        ));
    }

    let loader = load_input(&args.input)?;
    let (schema, config) = resolve_schema(args, loader.as_ref())?;
    let config = apply_overrides(args, config);

    let mut validator = CsvValidator::new(loader, schema).with_config(config);
    let outcome = validator.run()?;

    println!("{}", format_outcome(&outcome, args.quiet));
    Ok(outcome.passed)
}
