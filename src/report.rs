//! Post-conversion QA checklist.
//!
//! Runs pattern checks against already-rewritten text to confirm no
//! untranslated source-dialect tokens remain. Purely textual, like the
//! engine itself: a token inside a comment is excluded, but a token inside
//! a string literal will still be reported.

use std::sync::LazyLock;

use colored::Colorize;
use regex::Regex;
use serde::Serialize;

use crate::convert::{Direction, Warning, WarningCategory};

/// Oracle-only tokens that must not survive a forward conversion.
const ORACLE_FUNCTIONS: &[&str] = &[
    "NVL",
    "DECODE",
    "TRUNC",
    "ADD_MONTHS",
    "TO_CHAR",
    "LISTAGG",
    "MONTHS_BETWEEN",
    "INITCAP",
    "INSTR"
];

/// T-SQL tokens that must not survive a reverse conversion.
const TSQL_FUNCTIONS: &[&str] = &["ISNULL", "GETDATE", "SYSDATETIME"];

const HTML_ENTITIES: &[&str] = &["&gt;", "&lt;", "&amp;", "&quot;", "&apos;", "&nbsp;"];

static LINE_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"--.*$").expect("valid regex"));

static BLOCK_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/\*.*?\*/").expect("valid regex"));

static SELECT_KEYWORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bSELECT\b").expect("valid regex"));

static SYSDATE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bSYSDATE\b").expect("valid regex"));

static ROWNUM_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bROWNUM\b").expect("valid regex"));

static FROM_DUAL_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bFROM\s+DUAL\b").expect("valid regex"));

static TOP_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bTOP\s*\(?\s*\d+").expect("valid regex"));

static STRING_AGG_DISTINCT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)SELECT\s+STRING_AGG.*?FROM\s*\(\s*SELECT\s+DISTINCT").expect("valid regex")
});

/// Severity of a failed check. Passing checks report [`CheckSeverity::Ok`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CheckSeverity {
    Ok,
    Warning,
    Critical
}

/// Outcome of a single checklist item.
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    pub name:     &'static str,
    pub passed:   bool,
    pub severity: CheckSeverity,
    pub message:  String,
    /// Manual follow-up required before the query is executable
    pub action:   Option<String>
}

impl CheckResult {
    fn ok(name: &'static str, message: impl Into<String>) -> Self {
        Self {
            name,
            passed: true,
            severity: CheckSeverity::Ok,
            message: message.into(),
            action: None
        }
    }

    fn fail(name: &'static str, severity: CheckSeverity, message: impl Into<String>) -> Self {
        Self {
            name,
            passed: false,
            severity,
            message: message.into(),
            action: None
        }
    }

    fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }
}

/// Full checklist outcome.
#[derive(Debug, Clone, Serialize)]
pub struct QaReport {
    pub checks: Vec<CheckResult>
}

impl QaReport {
    pub fn passed_count(&self) -> usize {
        self.checks.iter().filter(|c| c.passed).count()
    }

    pub fn critical_failures(&self) -> usize {
        self.checks
            .iter()
            .filter(|c| !c.passed && c.severity == CheckSeverity::Critical)
            .count()
    }

    pub fn warning_failures(&self) -> usize {
        self.checks
            .iter()
            .filter(|c| !c.passed && c.severity == CheckSeverity::Warning)
            .count()
    }

    /// No critical failures.
    pub fn passed(&self) -> bool {
        self.critical_failures() == 0
    }

    /// No failures of any kind: safe to hand to the target engine.
    pub fn ready_for_execution(&self) -> bool {
        self.critical_failures() == 0 && self.warning_failures() == 0
    }

    /// Render the report as a banner-style text block.
    pub fn render(&self, colored: bool) -> String {
        let mut out = String::new();
        let rule = "=".repeat(80);
        out.push_str(&rule);
        out.push_str("\nQA CHECKLIST REPORT\n");
        out.push_str(&rule);
        out.push('\n');

        for check in &self.checks {
            let status = if check.passed { "PASS" } else { "FAIL" };
            let header = format!("[{}] {}", status, check.name);
            if colored {
                let painted = if check.passed {
                    header.green().to_string()
                } else if check.severity == CheckSeverity::Critical {
                    header.red().bold().to_string()
                } else {
                    header.yellow().to_string()
                };
                out.push_str(&painted);
            } else {
                out.push_str(&header);
            }
            out.push('\n');
            out.push_str(&format!("    {}\n", check.message));
            if let Some(action) = &check.action {
                out.push_str(&format!("    ACTION: {}\n", action));
            }
        }

        out.push_str(&rule);
        out.push('\n');
        out.push_str(&format!(
            "Total checks: {}  Passed: {}  Critical failures: {}  Warnings: {}\n",
            self.checks.len(),
            self.passed_count(),
            self.critical_failures(),
            self.warning_failures()
        ));
        out.push_str(&format!(
            "Overall status: {}\nReady for execution: {}\n",
            if self.passed() { "PASS" } else { "FAIL" },
            if self.ready_for_execution() { "YES" } else { "NO (manual fixes required)" }
        ));
        out
    }
}

/// Run all checks against converted SQL.
pub fn run_checklist(sql: &str, warnings: &[Warning], direction: Direction) -> QaReport {
    let mut checks = vec![check_html_entities(sql), check_residual_tokens(sql, direction)];
    if direction == Direction::OracleToAzure {
        checks.push(check_string_agg_distinct(sql));
        checks.push(check_regexp_like(sql, warnings));
    }
    checks.push(check_syntax(sql));
    QaReport { checks }
}

fn check_html_entities(sql: &str) -> CheckResult {
    let found: Vec<&str> = HTML_ENTITIES.iter().filter(|e| sql.contains(**e)).copied().collect();
    if found.is_empty() {
        CheckResult::ok("html entities", "No HTML entities remain")
    } else {
        CheckResult::fail(
            "html entities",
            CheckSeverity::Critical,
            format!("Found HTML entities: {}", found.join(", "))
        )
    }
}

/// Strip comments line-by-line so a token mentioned in a comment is not
/// reported as untranslated.
fn strip_comments(sql: &str) -> String {
    sql.lines()
        .map(|line| {
            let line = BLOCK_COMMENT.replace_all(line, "");
            LINE_COMMENT.replace_all(&line, "").to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn check_residual_tokens(sql: &str, direction: Direction) -> CheckResult {
    let code = strip_comments(sql);
    let mut found: Vec<String> = Vec::new();

    let functions = match direction {
        Direction::OracleToAzure => ORACLE_FUNCTIONS,
        Direction::AzureToOracle => TSQL_FUNCTIONS
    };
    for name in functions {
        let pattern = Regex::new(&format!(r"(?i)\b{name}\s*\(")).expect("valid regex");
        if pattern.is_match(&code) {
            found.push((*name).to_string());
        }
    }
    match direction {
        Direction::OracleToAzure => {
            for (re, label) in [
                (&*SYSDATE_TOKEN, "SYSDATE"),
                (&*ROWNUM_TOKEN, "ROWNUM"),
                (&*FROM_DUAL_TOKEN, "FROM DUAL")
            ] {
                if re.is_match(&code) {
                    found.push(label.to_string());
                }
            }
            if code.contains("||") {
                found.push("||".to_string());
            }
        }
        Direction::AzureToOracle => {
            if TOP_TOKEN.is_match(&code) {
                found.push("TOP".to_string());
            }
        }
    }

    if found.is_empty() {
        CheckResult::ok("residual tokens", "All source-dialect tokens converted")
    } else {
        CheckResult::fail(
            "residual tokens",
            CheckSeverity::Critical,
            format!("Source-dialect tokens still present: {}", found.join(", "))
        )
    }
}

fn check_string_agg_distinct(sql: &str) -> CheckResult {
    let has_placeholder = sql.contains("<source_table>");
    if has_placeholder {
        CheckResult::fail(
            "string_agg distinct",
            CheckSeverity::Warning,
            "STRING_AGG DISTINCT skeleton requires manual completion"
        )
        .with_action("Replace <source_table> with the actual table/CTE and add WHERE correlation")
    } else if STRING_AGG_DISTINCT.is_match(sql) {
        CheckResult::ok(
            "string_agg distinct",
            "STRING_AGG DISTINCT uses a completed derived set"
        )
    } else {
        CheckResult::ok("string_agg distinct", "No STRING_AGG DISTINCT skeleton in query")
    }
}

fn check_regexp_like(sql: &str, warnings: &[Warning]) -> CheckResult {
    let upper = sql.to_uppercase();
    if !upper.contains("REGEXP_LIKE") {
        return CheckResult::ok("regexp_like", "No REGEXP_LIKE in query");
    }
    let has_comment = sql.contains("/* WARNING: Requires SQL Server 2025+")
        || sql.contains("/* For older SQL Server:");
    let has_warning = warnings
        .iter()
        .any(|w| w.category == WarningCategory::RegexPredicateVersion);
    if has_comment || has_warning {
        CheckResult::ok("regexp_like", "REGEXP_LIKE carries its engine-version annotation")
    } else {
        CheckResult::fail(
            "regexp_like",
            CheckSeverity::Warning,
            "REGEXP_LIKE found without an engine-version annotation"
        )
        .with_action("Confirm the target is SQL Server 2025+ or Azure SQL Database")
    }
}

fn check_syntax(sql: &str) -> CheckResult {
    let mut issues = Vec::new();
    let opens = sql.matches('(').count();
    let closes = sql.matches(')').count();
    if opens != closes {
        issues.push(format!("Unbalanced parentheses: {opens} open, {closes} close"));
    }
    if !SELECT_KEYWORD.is_match(sql) {
        issues.push("Missing SELECT keyword".to_string());
    }
    if issues.is_empty() {
        CheckResult::ok("syntax", "Basic syntax checks passed")
    } else {
        CheckResult::fail("syntax", CheckSeverity::Critical, issues.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::convert_oracle_to_azure;

    #[test]
    fn test_clean_conversion_is_ready() {
        let result = convert_oracle_to_azure("SELECT NVL(a, b) FROM t WHERE ROWNUM <= 5");
        let report = run_checklist(&result.sql, &result.warnings, Direction::OracleToAzure);
        assert!(report.passed());
        assert!(report.ready_for_execution());
    }

    #[test]
    fn test_residual_oracle_token_is_critical() {
        let report = run_checklist("SELECT NVL(a, b) FROM t", &[], Direction::OracleToAzure);
        assert!(!report.passed());
        assert_eq!(report.critical_failures(), 1);
    }

    #[test]
    fn test_token_in_comment_not_reported() {
        let report = run_checklist(
            "SELECT ISNULL(a, b) FROM t -- was NVL(a, b)",
            &[],
            Direction::OracleToAzure
        );
        assert!(report.passed());
    }

    #[test]
    fn test_html_entities_critical() {
        let report =
            run_checklist("SELECT * FROM t WHERE a &lt;= 5", &[], Direction::OracleToAzure);
        assert!(!report.passed());
    }

    #[test]
    fn test_placeholder_blocks_readiness() {
        let result = convert_oracle_to_azure(
            "SELECT LISTAGG(DISTINCT code, ',') WITHIN GROUP (ORDER BY code) FROM t"
        );
        let report = run_checklist(&result.sql, &result.warnings, Direction::OracleToAzure);
        assert!(report.passed());
        assert!(!report.ready_for_execution());
    }

    #[test]
    fn test_unbalanced_parens() {
        let report = run_checklist("SELECT CEILING(x FROM t", &[], Direction::OracleToAzure);
        assert!(!report.passed());
    }

    #[test]
    fn test_reverse_direction_tokens() {
        let report = run_checklist(
            "SELECT ISNULL(a, b), GETDATE() FROM t",
            &[],
            Direction::AzureToOracle
        );
        assert!(!report.passed());
        let report = run_checklist(
            "SELECT NVL(a, b), SYSDATE FROM t WHERE ROWNUM <= 3",
            &[],
            Direction::AzureToOracle
        );
        assert!(report.passed());
    }

    #[test]
    fn test_render_plain_text() {
        let report = run_checklist("SELECT 1", &[], Direction::OracleToAzure);
        let text = report.render(false);
        assert!(text.contains("QA CHECKLIST REPORT"));
        assert!(text.contains("Overall status: PASS"));
    }
}
