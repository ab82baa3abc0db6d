//! # SQL SELECT Converter
//!
//! Bidirectional, text-based conversion of SELECT queries between Oracle
//! and Azure SQL / SQL Server dialects.
//!
//! `sql-select-converter` rewrites query text with an ordered pipeline of
//! lexical passes. There is no SQL parse tree: each pass is a targeted
//! rewrite that understands just enough structure (balanced parentheses,
//! string literals, comments) to transform its construct safely. Anything
//! the pipeline cannot rewrite faithfully is surfaced as a categorized
//! warning instead of being silently mistranslated.
//!
//! # Quick Start
//!
//! ```bash
//! # Convert a query given on the command line
//! sql-select-converter convert -q "SELECT NVL(a, b) FROM t WHERE ROWNUM <= 10"
//!
//! # Convert a file, writing the result next to it
//! sql-select-converter convert -i report.sql -o report_azure.sql
//!
//! # Stream from stdin
//! cat report.sql | sql-select-converter convert -i -
//!
//! # Reverse direction (T-SQL back to Oracle)
//! sql-select-converter convert -d azure-to-oracle -q "SELECT TOP 10 * FROM t"
//!
//! # Convert and run the QA checklist, JSON for CI
//! sql-select-converter check -i report.sql -f json
//! ```
//!
//! # Configuration
//!
//! Warning suppression is loaded from (in order of precedence):
//!
//! 1. `.sql-converter.toml` in current directory
//! 2. `~/.config/sql-select-converter/config.toml`
//!
//! ```toml
//! [warnings]
//! suppressed = ["structural-ambiguity"]
//! ```
//!
//! # Exit Codes
//!
//! `convert`:
//!
//! - `0` - Converted with no warnings
//! - `1` - Converted with warnings (or failed validation)
//!
//! `check`:
//!
//! - `0` - All checklist items passed
//! - `1` - Warning-level checklist failures
//! - `2` - Critical checklist failures
//!
//! # Modules
//!
//! - [`convert`] - Conversion pipelines, construct detectors, warning model
//! - [`report`] - Post-conversion QA checklist
//! - [`config`] - Configuration loading
//! - [`output`] - Result formatting for text, JSON and YAML
//! - [`error`] - Error types and constructors

mod cli;
mod config;
mod convert;
mod error;
mod output;
mod report;

use std::{
    fs::{read_to_string, write},
    io::{self, Read},
    path::PathBuf,
    process
};

use clap::Parser;

use crate::{
    cli::{Cli, Commands, Format},
    config::Config,
    convert::{Conversion, Direction, convert},
    error::{AppResult, file_read_error, file_write_error, query_error},
    output::{OutputFormat, OutputOptions, format_check, format_conversion},
    report::run_checklist
};

fn main() {
    match run() {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(2);
        }
    }
}

fn run() -> AppResult<i32> {
    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Convert {
            query,
            file,
            direction,
            output,
            output_format,
            no_warnings,
            no_color
        } => {
            let sql = read_input(query, file)?;
            let direction = Direction::from(direction);

            let mut conversion = convert(&sql, direction);
            drop_suppressed(&mut conversion, &config);

            let opts = OutputOptions {
                format:        output_format_of(output_format),
                colored:       !no_color && output.is_none(),
                show_warnings: !no_warnings
            };

            if let Some(path) = output {
                write(&path, &conversion.sql)
                    .map_err(|e| file_write_error(&path.display().to_string(), e))?;
                if !no_warnings && !conversion.warnings.is_empty() {
                    eprintln!(
                        "Wrote {} with {} warning(s):",
                        path.display(),
                        conversion.warnings.len()
                    );
                    for warning in &conversion.warnings {
                        eprintln!("  {}", warning);
                    }
                }
            } else {
                println!("{}", format_conversion(&conversion, direction, &opts));
            }

            Ok(if conversion.warnings.is_empty() { 0 } else { 1 })
        }

        Commands::Check {
            query,
            file,
            direction,
            output_format,
            no_color
        } => {
            let sql = read_input(query, file)?;
            let direction = Direction::from(direction);

            let mut conversion = convert(&sql, direction);
            drop_suppressed(&mut conversion, &config);
            let report = run_checklist(&conversion.sql, &conversion.warnings, direction);

            let opts = OutputOptions {
                format:        output_format_of(output_format),
                colored:       !no_color,
                show_warnings: true
            };
            println!("{}", format_check(&conversion, &report, direction, &opts));

            Ok(if report.critical_failures() > 0 {
                2
            } else if report.warning_failures() > 0 {
                1
            } else {
                0
            })
        }
    }
}

/// Resolve the query text from `-q`, a file path, or stdin (`-i -`).
fn read_input(query: Option<String>, file: Option<PathBuf>) -> AppResult<String> {
    match (query, file) {
        (Some(sql), _) => Ok(sql),
        (None, Some(path)) => {
            if path.to_str() == Some("-") {
                let mut buffer = String::new();
                io::stdin()
                    .read_to_string(&mut buffer)
                    .map_err(|e| file_read_error("stdin", e))?;
                Ok(buffer)
            } else {
                read_to_string(&path).map_err(|e| file_read_error(&path.display().to_string(), e))
            }
        }
        (None, None) => Err(query_error("No query given: use --query or --file"))
    }
}

fn drop_suppressed(conversion: &mut Conversion, config: &Config) {
    conversion.warnings.retain(|w| !config.is_suppressed(w.category));
}

fn output_format_of(format: Format) -> OutputFormat {
    match format {
        Format::Text => OutputFormat::Text,
        Format::Json => OutputFormat::Json,
        Format::Yaml => OutputFormat::Yaml
    }
}
