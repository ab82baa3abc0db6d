//! Pre-rewrite diagnostic detectors.
//!
//! These run once over the unmodified Oracle input and only produce
//! warnings, never rewrites. Detection is purely pattern-based over raw
//! text; both over- and under-reporting are expected and documented.

use std::sync::LazyLock;

use regex::Regex;

use super::warnings::{WarningCategory, WarningSink, line_of};

static CONNECT_BY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bCONNECT\s+BY\b").expect("valid regex"));

static ROWNUM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bROWNUM\b").expect("valid regex"));

static ORDER_BY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bORDER\s+BY\b").expect("valid regex"));

/// Hour-fraction arithmetic like `date_col + 3/24`.
static HOUR_FRACTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\+\s*\d+\s*/\s*24\b").expect("valid regex"));

static INTERVAL_ARITHMETIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)[+-]\s*INTERVAL\b").expect("valid regex"));

/// Parenthesized sub-select with its own WHERE. A coarse textual
/// approximation of a correlated subquery, not a semantic check.
static SUBQUERY_WITH_WHERE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)\(\s*SELECT\b.*?\bWHERE\b.*?\)").expect("valid regex"));

static CROSS_TAB: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:PIVOT|UNPIVOT)\b").expect("valid regex"));

static KEEP_DENSE_RANK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bKEEP\s*\(\s*DENSE_RANK\s+(?:FIRST|LAST)\b").expect("valid regex")
});

static TUPLE_IN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\(\s*[\w.]+\s*(?:,\s*[\w.]+\s*)+\)\s+(?:NOT\s+)?IN\s*\(")
        .expect("valid regex")
});

static REGEXP_EXTRACTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bREGEXP_(?:SUBSTR|REPLACE|INSTR|COUNT)\s*\(").expect("valid regex")
});

/// Run all detectors over the untouched input, appending one warning per
/// triggered construct with the line of its first match.
pub fn run(sql: &str, sink: &mut WarningSink) {
    if let Some(m) = CONNECT_BY.find(sql) {
        sink.push_at(
            WarningCategory::HierarchicalQuery,
            "CONNECT BY detected. Hierarchical queries require manual conversion to a recursive CTE.",
            line_of(sql, m.start())
        );
    }

    if let (Some(m), true) = (ROWNUM.find(sql), ORDER_BY.is_match(sql)) {
        sink.push_at(
            WarningCategory::RowLimitWithOrdering,
            "ROWNUM used together with ORDER BY. Results may differ; consider ROW_NUMBER() OVER (ORDER BY ...) instead.",
            line_of(sql, m.start())
        );
    }

    let date_arith = HOUR_FRACTION.find(sql).or_else(|| INTERVAL_ARITHMETIC.find(sql));
    if let Some(m) = date_arith {
        sink.push_at(
            WarningCategory::DateArithmeticComplexity,
            "Complex date arithmetic detected. Verify the DATEADD() equivalent is semantically correct.",
            line_of(sql, m.start())
        );
    }

    if let Some(m) = SUBQUERY_WITH_WHERE.find(sql) {
        sink.push_at(
            WarningCategory::CorrelatedSubqueryHeuristic,
            "Possible correlated subquery detected. Verify query logic after conversion.",
            line_of(sql, m.start())
        );
    }

    if let Some(m) = CROSS_TAB.find(sql) {
        sink.push_at(
            WarningCategory::CrossTabSyntax,
            "PIVOT/UNPIVOT detected. Cross-tabulation syntax differs between engines and needs manual review.",
            line_of(sql, m.start())
        );
    }

    if let Some(m) = KEEP_DENSE_RANK.find(sql) {
        sink.push_at(
            WarningCategory::RankedPartitionIdiom,
            "KEEP (DENSE_RANK FIRST/LAST) detected. Rewrite manually with ROW_NUMBER() OVER a partition and filter on rank 1.",
            line_of(sql, m.start())
        );
    }

    if let Some(m) = TUPLE_IN.find(sql) {
        sink.push_at(
            WarningCategory::TupleMembership,
            "Multi-column IN predicate detected. SQL Server does not support tuple membership; rewrite as EXISTS or a join.",
            line_of(sql, m.start())
        );
    }

    if let Some(m) = REGEXP_EXTRACTION.find(sql) {
        sink.push_at(
            WarningCategory::AdvancedPatternExtraction,
            "REGEXP_SUBSTR/REGEXP_REPLACE/REGEXP_INSTR detected. Advanced pattern extraction has no direct equivalent before SQL Server 2025.",
            line_of(sql, m.start())
        );
    }
}
