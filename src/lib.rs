//! # SQL SELECT Converter Library
//!
//! Lexical conversion of SELECT queries between Oracle and Azure SQL /
//! SQL Server dialects.

pub mod cli;
pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod report;
