//! Warning types and the per-invocation collector.
//!
//! Warnings are informational only: they never block production of output
//! text. Every conversion call owns its own [`WarningSink`], so concurrent
//! independent invocations share no mutable state.

use serde::Serialize;

/// Fixed set of warning categories emitted by the converter.
///
/// Serialized (and displayed) in kebab-case, e.g. `row-limit-with-ordering`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WarningCategory {
    /// Input is not a SELECT/WITH statement
    UnsupportedStatementType,
    /// CONNECT BY hierarchical query
    HierarchicalQuery,
    /// ROWNUM/TOP bound combined with ORDER BY
    RowLimitWithOrdering,
    /// Compound date arithmetic idioms
    DateArithmeticComplexity,
    /// Textual heuristic hit for a correlated subquery
    CorrelatedSubqueryHeuristic,
    /// PIVOT/UNPIVOT cross-tabulation syntax
    CrossTabSyntax,
    /// KEEP (DENSE_RANK FIRST/LAST) idiom
    RankedPartitionIdiom,
    /// Multi-column (a, b) IN (...) membership test
    TupleMembership,
    /// REGEXP_SUBSTR/REGEXP_REPLACE/REGEXP_INSTR/REGEXP_COUNT
    AdvancedPatternExtraction,
    /// LISTAGG(DISTINCT ...) has no direct STRING_AGG equivalent
    ListAggregationUniqueness,
    /// REGEXP_LIKE requires a minimum target engine version
    RegexPredicateVersion,
    /// Optimizer hint comment was stripped
    OptimizerHintRemoved,
    /// JOIN ... USING expanded to an ON placeholder
    JoinShorthandExpansion,
    /// FETCH ... WITH TIES relocated into the select list
    FetchWithTiesRelocation,
    /// INITCAP approximated, no native multi-word title casing
    TitleCaseApproximation,
    /// TRIM rewritten as LTRIM(RTRIM())
    TrimCompatibility,
    /// MONTHS_BETWEEN fractional result mapped to integer DATEDIFF
    FractionalMonthPrecision,
    /// Empty or otherwise unusable input
    InvalidInput,
    /// Rewrite skipped or approximate because the text is ambiguous
    StructuralAmbiguity
}

impl WarningCategory {
    /// Kebab-case identifier, stable across versions.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnsupportedStatementType => "unsupported-statement-type",
            Self::HierarchicalQuery => "hierarchical-query",
            Self::RowLimitWithOrdering => "row-limit-with-ordering",
            Self::DateArithmeticComplexity => "date-arithmetic-complexity",
            Self::CorrelatedSubqueryHeuristic => "correlated-subquery-heuristic",
            Self::CrossTabSyntax => "cross-tab-syntax",
            Self::RankedPartitionIdiom => "ranked-partition-idiom",
            Self::TupleMembership => "tuple-membership",
            Self::AdvancedPatternExtraction => "advanced-pattern-extraction",
            Self::ListAggregationUniqueness => "list-aggregation-uniqueness",
            Self::RegexPredicateVersion => "regex-predicate-version",
            Self::OptimizerHintRemoved => "optimizer-hint-removed",
            Self::JoinShorthandExpansion => "join-shorthand-expansion",
            Self::FetchWithTiesRelocation => "fetch-with-ties-relocation",
            Self::TitleCaseApproximation => "title-case-approximation",
            Self::TrimCompatibility => "trim-compatibility",
            Self::FractionalMonthPrecision => "fractional-month-precision",
            Self::InvalidInput => "invalid-input",
            Self::StructuralAmbiguity => "structural-ambiguity"
        }
    }
}

impl std::fmt::Display for WarningCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single conversion warning.
#[derive(Debug, Clone, Serialize)]
pub struct Warning {
    /// Which class of construct triggered the warning
    pub category: WarningCategory,
    /// Human-readable description, including any manual follow-up needed
    pub message:  String,
    /// 1-based line of the first triggering match, when known
    pub line:     Option<usize>
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.line {
            Some(line) => {
                write!(f, "WARNING (line {}) [{}]: {}", line, self.category, self.message)
            }
            None => write!(f, "WARNING [{}]: {}", self.category, self.message)
        }
    }
}

/// Ordered accumulator of warnings for one conversion call.
#[derive(Debug, Default)]
pub struct WarningSink {
    warnings: Vec<Warning>
}

impl WarningSink {
    pub fn push(&mut self, category: WarningCategory, message: impl Into<String>) {
        self.warnings.push(Warning {
            category,
            message: message.into(),
            line: None
        });
    }

    pub fn push_at(&mut self, category: WarningCategory, message: impl Into<String>, line: usize) {
        self.warnings.push(Warning {
            category,
            message: message.into(),
            line: Some(line)
        });
    }

    pub fn into_inner(self) -> Vec<Warning> {
        self.warnings
    }
}

/// 1-based line number of a byte offset, for detector warnings.
pub(crate) fn line_of(sql: &str, offset: usize) -> usize {
    sql[..offset.min(sql.len())].matches('\n').count() + 1
}
