//! Azure SQL -> Oracle rewrite pipeline.
//!
//! A strict subset of the forward stages, applied in its own fixed order.
//! Equality-dispatch reconstruction (CASE -> DECODE) is deliberately not
//! automated: rebuilding the dispatch form from an arbitrary conditional is
//! not reliably invertible from text alone, so its presence is only flagged.

use std::sync::LazyLock;

use regex::Regex;

use super::{
    scan,
    warnings::{WarningCategory, WarningSink}
};

static TOP_CLAUSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bSELECT\s+(DISTINCT\s+)?TOP\s*\(?\s*(\d+)\s*\)?\s+").expect("valid regex")
});

static WHERE_KEYWORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bWHERE\b").expect("valid regex"));

static ORDER_BY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bORDER\s+BY\b").expect("valid regex"));

static GETDATE_CALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bGETDATE\s*\(\s*\)").expect("valid regex"));

static SYSDATETIME_CALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bSYSDATETIME\s*\(\s*\)").expect("valid regex"));

static ISNULL_CALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bISNULL\s*\(").expect("valid regex"));

static CAST_CALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bCAST\s*\(").expect("valid regex"));

static AS_DATE_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)^(.*?)\s+AS\s+DATE\s*$").expect("valid regex"));

static CASE_WHEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bCASE\s+WHEN\b").expect("valid regex"));

/// Apply all reverse stages in their fixed order.
pub fn apply(sql: &str, sink: &mut WarningSink) -> String {
    let mut out = convert_top(sql, sink);
    out = convert_getdate(&out);
    out = convert_isnull(&out);
    out = convert_concat(&out, sink);
    out = convert_cast_date(&out);
    detect_case_expression(&out, sink);
    out
}

/// `SELECT TOP n` -> a ROWNUM bound folded into an existing WHERE clause,
/// inserted before ORDER BY, or appended at the end.
fn convert_top(sql: &str, sink: &mut WarningSink) -> String {
    let Some(caps) = TOP_CLAUSE.captures(sql) else {
        return sql.to_string();
    };
    let n = caps[2].to_string();

    let stripped = TOP_CLAUSE.replace(sql, "SELECT ${1}").to_string();
    let converted = if WHERE_KEYWORD.is_match(&stripped) {
        WHERE_KEYWORD
            .replace(&stripped, format!("WHERE ROWNUM <= {n} AND").as_str())
            .to_string()
    } else if ORDER_BY.is_match(&stripped) {
        ORDER_BY
            .replace(&stripped, format!("WHERE ROWNUM <= {n} ORDER BY").as_str())
            .to_string()
    } else {
        format!("{}\nWHERE ROWNUM <= {}", stripped.trim_end(), n)
    };

    if ORDER_BY.is_match(&converted) {
        sink.push(
            WarningCategory::RowLimitWithOrdering,
            "TOP converted to a ROWNUM bound alongside ORDER BY. Row order is no longer guaranteed equivalent; consider an ordered subquery."
        );
    }
    converted
}

fn convert_getdate(sql: &str) -> String {
    let out = GETDATE_CALL.replace_all(sql, "SYSDATE").to_string();
    SYSDATETIME_CALL.replace_all(&out, "SYSTIMESTAMP").to_string()
}

/// ISNULL(a, b) -> NVL(a, b), nested occurrences included.
fn convert_isnull(sql: &str) -> String {
    scan::rewrite_calls(sql, &ISNULL_CALL, &|inner| Some(format!("NVL({inner})")))
}

/// The additive operator doubles as numeric addition, so this swap only
/// runs when a quoted literal appears anywhere in the query, and it is
/// always flagged rather than silently trusted.
fn convert_concat(sql: &str, sink: &mut WarningSink) -> String {
    if !(sql.contains('+') && sql.contains('\'')) {
        return sql.to_string();
    }
    let out = scan::swap_operator_outside_quotes(sql, " + ", " || ");
    if out != sql {
        sink.push(
            WarningCategory::StructuralAmbiguity,
            "Additive operator (+) rewritten as concatenation (||). The operator is also numeric addition; verify affected expressions."
        );
    }
    out
}

/// CAST(x AS DATE) -> TRUNC(x). Other CAST targets stay as-is.
fn convert_cast_date(sql: &str) -> String {
    scan::rewrite_calls(sql, &CAST_CALL, &|inner| {
        AS_DATE_SUFFIX
            .captures(inner)
            .map(|caps| format!("TRUNC({})", caps[1].trim()))
    })
}

fn detect_case_expression(sql: &str, sink: &mut WarningSink) {
    if CASE_WHEN.is_match(sql) {
        sink.push(
            WarningCategory::StructuralAmbiguity,
            "CASE WHEN expression found. Reconstructing a DECODE call from an arbitrary conditional is unreliable; convert manually if the DECODE form is required."
        );
    }
}
