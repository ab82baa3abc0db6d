use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::convert::Direction;

/// SQL SELECT Converter - Rewrite SELECT queries between Oracle and Azure SQL
#[derive(Parser, Debug)]
#[command(name = "sql-select-converter")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert a SELECT query between dialects
    Convert {
        /// Query text given directly on the command line
        #[arg(short, long, conflicts_with = "file")]
        query: Option<String>,

        /// Path to a SQL file (use - for stdin)
        #[arg(short = 'i', long)]
        file: Option<PathBuf>,

        /// Conversion direction
        #[arg(short, long, value_enum, default_value = "oracle-to-azure")]
        direction: DirectionArg,

        /// Write converted SQL to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short = 'f', long, value_enum, default_value = "text")]
        output_format: Format,

        /// Suppress warning output
        #[arg(long)]
        no_warnings: bool,

        /// Disable colored output
        #[arg(long)]
        no_color: bool
    },

    /// Convert and run the QA checklist on the result
    Check {
        /// Query text given directly on the command line
        #[arg(short, long, conflicts_with = "file")]
        query: Option<String>,

        /// Path to a SQL file (use - for stdin)
        #[arg(short = 'i', long)]
        file: Option<PathBuf>,

        /// Conversion direction
        #[arg(short, long, value_enum, default_value = "oracle-to-azure")]
        direction: DirectionArg,

        /// Output format
        #[arg(short = 'f', long, value_enum, default_value = "text")]
        output_format: Format,

        /// Disable colored output
        #[arg(long)]
        no_color: bool
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DirectionArg {
    OracleToAzure,
    AzureToOracle
}

impl From<DirectionArg> for Direction {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::OracleToAzure => Direction::OracleToAzure,
            DirectionArg::AzureToOracle => Direction::AzureToOracle
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Format {
    Text,
    Json,
    Yaml
}
