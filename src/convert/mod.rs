//! Bidirectional Oracle <-> Azure SQL SELECT conversion engine.
//!
//! The engine operates purely on the lexical form of the query. There is no
//! parse tree: rewrites are regex patterns made nesting-safe by the
//! depth/quote-aware helpers in [`scan`].
//!
//! # Architecture
//!
//! ```text
//! ┌───────────┐   ┌───────────┐   ┌──────────────────┐   ┌────────────┐
//! │  validate │──▶│ detectors │──▶│ rewrite pipeline │──▶│ Conversion │
//! └───────────┘   └───────────┘   └──────────────────┘   └────────────┘
//!                 (warnings only)  (ordered stages)       (sql + warnings)
//! ```
//!
//! Validation and the detectors look at the untouched input; the pipeline
//! stages then run sequentially, each consuming the previous stage's output.
//! Conversion never fails: unsupported input is returned unchanged with a
//! warning, and individual constructs the engine cannot confidently rewrite
//! are left as-is.
//!
//! # Example
//!
//! ```
//! use sql_select_converter::convert::convert_oracle_to_azure;
//!
//! let result =
//!     convert_oracle_to_azure("SELECT NVL(name, 'Unknown') FROM employees WHERE ROWNUM <= 10");
//! assert_eq!(result.sql, "SELECT TOP 10 ISNULL(name, 'Unknown') FROM employees ");
//! assert!(result.warnings.is_empty());
//! ```

mod detect;
mod forward;
mod reverse;
pub mod scan;
mod warnings;

use serde::Serialize;
pub use warnings::{Warning, WarningCategory};

use warnings::WarningSink;

/// Conversion direction, shared by the engine, the CLI, and the QA
/// checklist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    /// Oracle -> Azure SQL / SQL Server
    OracleToAzure,
    /// Azure SQL / SQL Server -> Oracle
    AzureToOracle
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OracleToAzure => write!(f, "Oracle -> Azure SQL"),
            Self::AzureToOracle => write!(f, "Azure SQL -> Oracle")
        }
    }
}

/// Result of one conversion call.
#[derive(Debug, Clone, Serialize)]
pub struct Conversion {
    /// Best-effort rewritten query text
    pub sql:      String,
    /// Warnings accumulated by detectors and lossy rewrite stages, in
    /// emission order
    pub warnings: Vec<Warning>
}

/// Convert an Oracle SELECT query to Azure SQL / SQL Server form.
pub fn convert_oracle_to_azure(query: &str) -> Conversion {
    let mut sink = WarningSink::default();
    if !validate(query, &mut sink) {
        return Conversion {
            sql:      query.to_string(),
            warnings: sink.into_inner()
        };
    }
    detect::run(query, &mut sink);
    let sql = forward::apply(query, &mut sink);
    Conversion {
        sql,
        warnings: sink.into_inner()
    }
}

/// Convert an Azure SQL / SQL Server SELECT query to Oracle form.
pub fn convert_azure_to_oracle(query: &str) -> Conversion {
    let mut sink = WarningSink::default();
    if !validate(query, &mut sink) {
        return Conversion {
            sql:      query.to_string(),
            warnings: sink.into_inner()
        };
    }
    let sql = reverse::apply(query, &mut sink);
    Conversion {
        sql,
        warnings: sink.into_inner()
    }
}

/// Dispatch on [`Direction`].
pub fn convert(query: &str, direction: Direction) -> Conversion {
    match direction {
        Direction::OracleToAzure => convert_oracle_to_azure(query),
        Direction::AzureToOracle => convert_azure_to_oracle(query)
    }
}

/// Only read-only queries are supported. The first keyword after any
/// leading comments must be SELECT or WITH.
fn validate(query: &str, sink: &mut WarningSink) -> bool {
    if query.trim().is_empty() {
        sink.push(WarningCategory::InvalidInput, "Query input is empty.");
        return false;
    }
    let body = scan::skip_leading_comments(query).to_uppercase();
    if body.starts_with("SELECT") || body.starts_with("WITH") {
        return true;
    }
    sink.push(
        WarningCategory::UnsupportedStatementType,
        "Query does not appear to be a SELECT statement. Only read-only SELECT queries are supported."
    );
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_invalid() {
        let result = convert_oracle_to_azure("   ");
        assert_eq!(result.sql, "   ");
        assert_eq!(result.warnings[0].category, WarningCategory::InvalidInput);
    }

    #[test]
    fn test_non_select_unchanged_with_warning() {
        let sql = "UPDATE employees SET salary = 0";
        for result in [convert_oracle_to_azure(sql), convert_azure_to_oracle(sql)] {
            assert_eq!(result.sql, sql);
            assert_eq!(
                result.warnings[0].category,
                WarningCategory::UnsupportedStatementType
            );
        }
    }

    #[test]
    fn test_leading_comments_ignored_for_validation() {
        let result = convert_oracle_to_azure("-- top 10 report\nSELECT NVL(a, b) FROM t");
        assert!(result.sql.contains("ISNULL(a, b)"));
    }

    #[test]
    fn test_with_clause_accepted() {
        let result = convert_oracle_to_azure("WITH x AS (SELECT 1 FROM DUAL) SELECT * FROM x");
        assert!(!result.sql.to_uppercase().contains("DUAL"));
    }

    #[test]
    fn test_direction_dispatch() {
        let fwd = convert("SELECT SYSDATE FROM DUAL", Direction::OracleToAzure);
        assert!(fwd.sql.contains("GETDATE()"));
        let rev = convert("SELECT GETDATE() FROM t", Direction::AzureToOracle);
        assert!(rev.sql.contains("SYSDATE"));
    }
}
