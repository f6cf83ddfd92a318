//! csv-validate: validate delimited text files against a column schema

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use csv_schema_validator::ValidatorSpec;
use csv_schema_validator::cli::commands::validate::{ValidateArgs, handle_validate};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Validators usable as the default without extra parameters
#[derive(Debug, Clone, Copy, ValueEnum)]
enum DefaultValidator {
    Empty,
    Any,
    Int,
    Float,
    Bool,
}

impl From<DefaultValidator> for ValidatorSpec {
    fn from(value: DefaultValidator) -> Self {
        match value {
            DefaultValidator::Empty => ValidatorSpec::Empty,
            DefaultValidator::Any => ValidatorSpec::Any,
            DefaultValidator::Int => ValidatorSpec::Int { empty_ok: false },
            DefaultValidator::Float => ValidatorSpec::Float { empty_ok: false },
            DefaultValidator::Bool => ValidatorSpec::Bool { empty_ok: false },
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "csv-validate", version, about = "Validate CSV files against a column schema")]
struct Cli {
    /// CSV file to validate (`-` reads stdin)
    input: String,

    /// Schema file (YAML, or JSON with a .json extension)
    #[arg(short, long, conflicts_with = "columns")]
    schema: Option<PathBuf>,

    /// Comma separated list of expected columns, checked by the default validator
    #[arg(short, long, value_delimiter = ',')]
    columns: Option<Vec<String>>,

    /// Field delimiter
    #[arg(short, long)]
    delimiter: Option<char>,

    /// Validator for columns without their own validators
    #[arg(long, value_enum)]
    default_validator: Option<DefaultValidator>,

    /// Name shown in the report header
    #[arg(long)]
    name: Option<String>,

    /// Do not report duplicated column headers
    #[arg(long)]
    no_duplicate_header_check: bool,

    /// Print only the verdict
    #[arg(short, long)]
    quiet: bool,
}

fn run(cli: Cli) -> anyhow::Result<bool> {
    let args = ValidateArgs {
        input: cli.input,
        schema: cli.schema,
        columns: cli.columns,
        delimiter: cli.delimiter,
        default_validator: cli.default_validator.map(ValidatorSpec::from),
        name: cli.name,
        no_duplicate_header_check: cli.no_duplicate_header_check,
        quiet: cli.quiet,
    };
    Ok(handle_validate(&args)?)
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "csv_schema_validator=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(Cli::parse()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}
