//! Oracle -> Azure SQL rewrite pipeline.
//!
//! An ordered sequence of pure `&str -> String` stages, each scanning the
//! entire current query text for its pattern and substituting globally.
//! Ordering is load-bearing: constructs that can appear nested inside other
//! constructs' arguments (a TRUNC inside a concatenation, an NVL inside a
//! DECODE branch) are rewritten in a sequence where every intermediate
//! result stays syntactically valid T-SQL. Nesting-sensitive stages go
//! through [`scan::rewrite_calls`], which resolves inner calls before outer
//! ones, so self-nesting functions reach a fixpoint in a single pass.

use std::{cell::Cell, sync::LazyLock};

use regex::{Captures, Regex};

use super::{
    scan,
    warnings::{WarningCategory, WarningSink, line_of}
};

static HINT_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*\+.*?\*/").expect("valid regex"));

static DATE_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bDATE\s*'([^']*)'").expect("valid regex"));

static TIMESTAMP_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bTIMESTAMP\s*'([^']*)'").expect("valid regex"));

static JOIN_USING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bUSING\s*\(([^)]*)\)").expect("valid regex"));

static MONTHS_BETWEEN_CALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bMONTHS_BETWEEN\s*\(").expect("valid regex"));

static FETCH_WITH_TIES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bFETCH\s+(?:FIRST|NEXT)\s+(\d+)\s+ROWS?\s+WITH\s+TIES\b")
        .expect("valid regex")
});

static SELECT_HEAD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bSELECT\b(\s+DISTINCT\b)?").expect("valid regex"));

static LENGTH_CALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bLENGTH\s*\(").expect("valid regex"));

static CEIL_CALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bCEIL\s*\(").expect("valid regex"));

static INSTR_CALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bINSTR\s*\(").expect("valid regex"));

static TRIM_CALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bTRIM\s*\(").expect("valid regex"));

static INITCAP_CALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bINITCAP\s*\(").expect("valid regex"));

static LISTAGG_CALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bLISTAGG\s*\(").expect("valid regex"));

static WITHIN_GROUP_HEAD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*WITHIN\s+GROUP\s*\(").expect("valid regex"));

static DISTINCT_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)^DISTINCT\s+(.+)$").expect("valid regex"));

static REGEXP_LIKE_CALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bREGEXP_LIKE\s*\(").expect("valid regex"));

static NVL_CALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bNVL\s*\(").expect("valid regex"));

static DECODE_CALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bDECODE\s*\(").expect("valid regex"));

static SYSDATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bSYSDATE\b").expect("valid regex"));

static SYSTIMESTAMP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bSYSTIMESTAMP\b").expect("valid regex"));

static TRUNC_CALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bTRUNC\s*\(").expect("valid regex"));

static TO_CHAR_CALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bTO_CHAR\s*\(").expect("valid regex"));

static ADD_MONTHS_CALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bADD_MONTHS\s*\(").expect("valid regex"));

static YEARS_TIMES_TWELVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(-?\d+)\s*\*\s*12$").expect("valid regex"));

static TWELVE_TIMES_YEARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^12\s*\*\s*(-?\d+)$").expect("valid regex"));

static FROM_DUAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s*\bFROM\s+DUAL\b").expect("valid regex"));

static ROWNUM_BOUND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(WHERE|AND)\s+ROWNUM\s*(<=|<)\s*(\d+)").expect("valid regex")
});

static ORPHAN_AND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s*)(?i:AND)\b").expect("valid regex"));

static FETCH_FIRST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bFETCH\s+(?:FIRST|NEXT)\s+(\d+)\s+ROWS?\s+ONLY\b").expect("valid regex")
});

static OFFSET_ROWS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bOFFSET\s+\d+\s+ROWS?\b").expect("valid regex"));

/// Apply all forward stages in their fixed order.
pub fn apply(sql: &str, sink: &mut WarningSink) -> String {
    let mut out = decode_entities(sql);
    out = strip_optimizer_hints(&out, sink);
    out = normalize_date_literals(&out);
    out = expand_join_using(&out, sink);
    out = convert_months_between(&out, sink);
    out = convert_fetch_with_ties(&out, sink);
    out = rename_scalar_functions(&out);
    out = convert_trim(&out, sink);
    out = convert_initcap(&out, sink);
    out = convert_listagg(&out, sink);
    out = annotate_regexp_like(&out, sink);
    out = convert_nvl(&out);
    out = convert_decode(&out);
    out = convert_sysdate(&out);
    out = convert_concat(&out);
    out = convert_trunc(&out);
    out = convert_to_char(&out);
    out = convert_add_months(&out);
    out = remove_from_dual(&out);
    out = convert_rownum(&out);
    out = convert_fetch_first(&out);
    out
}

/// Queries pasted from web tools often carry escaped operators. Decoding
/// runs first because every later pattern is character-based. `&amp;` goes
/// last so it cannot create entities that would be decoded twice.
fn decode_entities(sql: &str) -> String {
    sql.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

fn strip_optimizer_hints(sql: &str, sink: &mut WarningSink) -> String {
    let Some(m) = HINT_COMMENT.find(sql) else {
        return sql.to_string();
    };
    sink.push_at(
        WarningCategory::OptimizerHintRemoved,
        "Optimizer hint comment removed. SQL Server uses OPTION (...) query hints; re-add manually if needed.",
        line_of(sql, m.start())
    );
    HINT_COMMENT.replace_all(sql, "").to_string()
}

fn normalize_date_literals(sql: &str) -> String {
    let out = DATE_LITERAL.replace_all(sql, "CAST('$1' AS DATE)").to_string();
    TIMESTAMP_LITERAL.replace_all(&out, "CAST('$1' AS DATETIME2)").to_string()
}

/// `JOIN ... USING (a, b)` has no T-SQL form. The column names survive into
/// an ON placeholder, but table aliases cannot be inferred from text alone,
/// so each side still needs manual qualification.
fn expand_join_using(sql: &str, sink: &mut WarningSink) -> String {
    let Some(m) = JOIN_USING.find(sql) else {
        return sql.to_string();
    };
    sink.push_at(
        WarningCategory::JoinShorthandExpansion,
        "JOIN ... USING expanded to an ON placeholder. Qualify each side of the predicate with the correct table aliases.",
        line_of(sql, m.start())
    );
    JOIN_USING
        .replace_all(sql, |caps: &Captures| {
            let predicate: Vec<String> = scan::split_args(&caps[1])
                .into_iter()
                .map(|col| format!("{col} = {col}"))
                .collect();
            format!("ON ({})", predicate.join(" AND "))
        })
        .to_string()
}

fn convert_months_between(sql: &str, sink: &mut WarningSink) -> String {
    let hit = Cell::new(false);
    let out = scan::rewrite_calls(sql, &MONTHS_BETWEEN_CALL, &|inner| {
        let args = scan::split_args(inner);
        if args.len() != 2 {
            return None;
        }
        hit.set(true);
        Some(format!("DATEDIFF(MONTH, {}, {})", args[1], args[0]))
    });
    if hit.get() {
        sink.push(
            WarningCategory::FractionalMonthPrecision,
            "MONTHS_BETWEEN returns fractional months; DATEDIFF(MONTH, ...) counts whole month boundaries. Verify rounding semantics."
        );
    }
    out
}

fn convert_fetch_with_ties(sql: &str, sink: &mut WarningSink) -> String {
    let Some(caps) = FETCH_WITH_TIES.captures(sql) else {
        return sql.to_string();
    };
    let n = caps[1].to_string();
    sink.push(
        WarningCategory::FetchWithTiesRelocation,
        "FETCH ... WITH TIES relocated into the select list as TOP ... WITH TIES. Requires an ORDER BY clause; verify placement."
    );
    let stripped = FETCH_WITH_TIES.replace(sql, "").to_string();
    SELECT_HEAD
        .replace(&stripped, |caps: &Captures| {
            let distinct = caps.get(1).map(|m| m.as_str()).unwrap_or("");
            format!("SELECT{distinct} TOP {n} WITH TIES")
        })
        .to_string()
}

/// Direct 1:1 renames: LENGTH -> LEN, CEIL -> CEILING, and INSTR ->
/// CHARINDEX with its first two arguments swapped. Semantics match exactly,
/// so no warnings. The four-argument INSTR form (occurrence) has no
/// CHARINDEX equivalent and is left untouched.
fn rename_scalar_functions(sql: &str) -> String {
    let out = LENGTH_CALL.replace_all(sql, "LEN(").to_string();
    let out = CEIL_CALL.replace_all(&out, "CEILING(").to_string();
    scan::rewrite_calls(&out, &INSTR_CALL, &|inner| {
        let args = scan::split_args(inner);
        match args.len() {
            2 => Some(format!("CHARINDEX({}, {})", args[1], args[0])),
            3 => Some(format!("CHARINDEX({}, {}, {})", args[1], args[0], args[2])),
            _ => None
        }
    })
}

fn convert_trim(sql: &str, sink: &mut WarningSink) -> String {
    let hit = Cell::new(false);
    let out = scan::rewrite_calls(sql, &TRIM_CALL, &|inner| {
        let upper = inner.trim_start().to_uppercase();
        // TRIM(LEADING/TRAILING/BOTH ... FROM x) has no LTRIM/RTRIM mapping
        if upper.starts_with("LEADING") || upper.starts_with("TRAILING") || upper.starts_with("BOTH") {
            return None;
        }
        if scan::split_args(inner).len() != 1 {
            return None;
        }
        hit.set(true);
        Some(format!("LTRIM(RTRIM({inner}))"))
    });
    if hit.get() {
        sink.push(
            WarningCategory::TrimCompatibility,
            "TRIM() rewritten as LTRIM(RTRIM()) for compatibility with SQL Server versions before 2017."
        );
    }
    out
}

fn convert_initcap(sql: &str, sink: &mut WarningSink) -> String {
    let hit = Cell::new(false);
    let out = scan::rewrite_calls(sql, &INITCAP_CALL, &|inner| {
        let args = scan::split_args(inner);
        if args.len() != 1 {
            return None;
        }
        hit.set(true);
        let x = &args[0];
        Some(format!("UPPER(LEFT({x}, 1)) + LOWER(SUBSTRING({x}, 2, LEN({x})))"))
    });
    if hit.get() {
        sink.push(
            WarningCategory::TitleCaseApproximation,
            "INITCAP approximated by capitalizing only the first character; SQL Server has no native multi-word title casing."
        );
    }
    out
}

/// LISTAGG -> STRING_AGG, including the trailing WITHIN GROUP (ORDER BY ...)
/// clause. The DISTINCT modifier combined with ordered aggregation has no
/// STRING_AGG equivalent, so that form becomes a derived-subquery skeleton
/// the caller must complete.
fn convert_listagg(sql: &str, sink: &mut WarningSink) -> String {
    let mut out = String::with_capacity(sql.len());
    let mut pos = 0usize;
    let mut distinct_hit = false;

    while let Some(m) = LISTAGG_CALL.find_at(sql, pos) {
        let open = m.end() - 1;
        let Some(close) = scan::matching_paren(sql, open) else {
            break;
        };
        out.push_str(&sql[pos..m.start()]);

        let mut end = close + 1;
        let mut within = None;
        if let Some(wm) = WITHIN_GROUP_HEAD.find(&sql[end..]) {
            let wopen = end + wm.end() - 1;
            if let Some(wclose) = scan::matching_paren(sql, wopen) {
                within = Some(sql[wopen + 1..wclose].trim().to_string());
                end = wclose + 1;
            }
        }

        let args = scan::split_args(&sql[open + 1..close]);
        if args.is_empty() {
            out.push_str(&sql[m.start()..end]);
            pos = end;
            continue;
        }

        let (distinct, expr) = match DISTINCT_PREFIX.captures(&args[0]) {
            Some(caps) => (true, caps[1].trim().to_string()),
            None => (false, args[0].clone())
        };
        let sep = args.get(1).cloned().unwrap_or_else(|| "''".to_string());
        let within_suffix = within
            .map(|w| format!(" WITHIN GROUP ({w})"))
            .unwrap_or_default();

        if distinct {
            distinct_hit = true;
            out.push_str(&format!(
                "(SELECT STRING_AGG({expr}, {sep}){within_suffix} FROM (SELECT DISTINCT {expr} FROM <source_table>) AS d)"
            ));
        } else {
            out.push_str(&format!("STRING_AGG({expr}, {sep}){within_suffix}"));
        }
        pos = end;
    }
    out.push_str(&sql[pos..]);

    if distinct_hit {
        sink.push(
            WarningCategory::ListAggregationUniqueness,
            "LISTAGG(DISTINCT ...) has no direct STRING_AGG equivalent. A derived-subquery skeleton was emitted; replace <source_table> with the actual source relation and correlate it."
        );
    }
    out
}

/// REGEXP_LIKE is kept as-is: SQL Server 2025+ and Azure SQL Database ship a
/// native function of the same name. The call is decorated with a version
/// comment, plus a LIKE alternative when the pattern is a simple anchored
/// literal.
fn annotate_regexp_like(sql: &str, sink: &mut WarningSink) -> String {
    let hit = Cell::new(false);
    let out = scan::rewrite_calls(sql, &REGEXP_LIKE_CALL, &|inner| {
        let args = scan::split_args(inner);
        if args.len() < 2 {
            return None;
        }
        hit.set(true);
        let mut rewritten =
            format!("REGEXP_LIKE({inner}) /* WARNING: Requires SQL Server 2025+ or Azure SQL */");
        if let Some(like) = simple_like_suggestion(&args[0], &args[1]) {
            rewritten.push_str(&format!(" /* For older SQL Server: {like} */"));
        }
        Some(rewritten)
    });
    if hit.get() {
        sink.push(
            WarningCategory::RegexPredicateVersion,
            "REGEXP_LIKE is native only in SQL Server 2025+ / Azure SQL Database. An inline version comment was added; use the LIKE alternative on older engines."
        );
    }
    out
}

/// A LIKE equivalent exists only for literal patterns without regex
/// metacharacters. `_` and `%` are excluded because they are LIKE wildcards.
fn simple_like_suggestion(col: &str, pattern: &str) -> Option<String> {
    if pattern.len() < 2 || !pattern.starts_with('\'') || !pattern.ends_with('\'') {
        return None;
    }
    let body = &pattern[1..pattern.len() - 1];
    let anchored_start = body.starts_with('^');
    let anchored_end = body.ends_with('$');
    let core = body.trim_start_matches('^').trim_end_matches('$');
    if core.is_empty()
        || !core
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == ' ' || c == '-' || c == '@')
    {
        return None;
    }
    let like = match (anchored_start, anchored_end) {
        (true, true) => core.to_string(),
        (true, false) => format!("{core}%"),
        (false, true) => format!("%{core}"),
        (false, false) => format!("%{core}%")
    };
    Some(format!("{col} LIKE '{like}'"))
}

/// NVL(a, b) -> ISNULL(a, b), nested occurrences included.
fn convert_nvl(sql: &str) -> String {
    scan::rewrite_calls(sql, &NVL_CALL, &|inner| Some(format!("ISNULL({inner})")))
}

/// DECODE(expr, search1, result1, ..., [default]) -> CASE WHEN ... END.
/// An even total argument count means a trailing default was supplied.
/// Fewer than three arguments cannot form a dispatch; left untouched.
fn convert_decode(sql: &str) -> String {
    scan::rewrite_calls(sql, &DECODE_CALL, &|inner| {
        let parts = scan::split_args(inner);
        if parts.len() < 3 {
            return None;
        }
        let expr = &parts[0];
        let mut branches = Vec::new();
        let mut i = 1;
        while i + 1 < parts.len() {
            branches.push(format!("WHEN {} = {} THEN {}", expr, parts[i], parts[i + 1]));
            i += 2;
        }
        let mut stmt = format!("CASE {}", branches.join(" "));
        if parts.len() % 2 == 0 {
            stmt.push_str(&format!(" ELSE {}", parts[parts.len() - 1]));
        }
        stmt.push_str(" END");
        Some(stmt)
    })
}

fn convert_sysdate(sql: &str) -> String {
    let out = SYSDATE.replace_all(sql, "GETDATE()").to_string();
    SYSTIMESTAMP.replace_all(&out, "SYSDATETIME()").to_string()
}

fn convert_concat(sql: &str) -> String {
    scan::swap_operator_outside_quotes(sql, "||", "+")
}

/// Single-argument TRUNC strips the time portion; two-argument TRUNC is a
/// format-model truncation with no single cast equivalent and stays as-is.
fn convert_trunc(sql: &str) -> String {
    scan::rewrite_calls(sql, &TRUNC_CALL, &|inner| {
        let args = scan::split_args(inner);
        if args.len() != 1 {
            return None;
        }
        Some(format!("CAST({} AS DATE)", args[0]))
    })
}

fn convert_to_char(sql: &str) -> String {
    scan::rewrite_calls(sql, &TO_CHAR_CALL, &|inner| {
        let args = scan::split_args(inner);
        if args.len() != 2 {
            return None;
        }
        let x = &args[0];
        let fmt = &args[1];
        if fmt.len() < 2 || !fmt.starts_with('\'') || !fmt.ends_with('\'') {
            return None;
        }
        let picture = &fmt[1..fmt.len() - 1];
        let style = match picture.to_uppercase().as_str() {
            "YYYY-MM-DD" => Some((10, 23)),
            "DD/MM/YYYY" => Some((10, 103)),
            "MM/DD/YYYY" => Some((10, 101)),
            "YYYYMMDD" => Some((8, 112)),
            "DD-MON-YYYY" => Some((11, 106)),
            "HH24:MI:SS" => Some((8, 108)),
            _ => None
        };
        match style {
            Some((width, code)) => Some(format!("CONVERT(varchar({width}), {x}, {code})")),
            None => Some(format!("FORMAT({x}, '{}')", to_net_picture(picture)))
        }
    })
}

/// Map Oracle format-model tokens to their .NET picture counterparts for
/// the generic FORMAT() fallback.
fn to_net_picture(oracle: &str) -> String {
    let mut picture = oracle.to_uppercase();
    for (from, to) in [
        ("HH24", "HH"),
        ("YYYY", "yyyy"),
        ("MON", "MMM"),
        ("MI", "mm"),
        ("DD", "dd"),
        ("SS", "ss"),
        ("AM", "tt"),
        ("PM", "tt")
    ] {
        picture = picture.replace(from, to);
    }
    picture
}

/// ADD_MONTHS(d, n) -> DATEADD(MONTH, n, d). A whole-years idiom written as
/// months-times-twelve becomes DATEADD(YEAR, k, d) instead.
fn convert_add_months(sql: &str) -> String {
    scan::rewrite_calls(sql, &ADD_MONTHS_CALL, &|inner| {
        let args = scan::split_args(inner);
        if args.len() != 2 {
            return None;
        }
        let (date, months) = (&args[0], args[1].trim());
        let years = YEARS_TIMES_TWELVE
            .captures(months)
            .or_else(|| TWELVE_TIMES_YEARS.captures(months))
            .map(|caps| caps[1].to_string());
        match years {
            Some(k) => Some(format!("DATEADD(YEAR, {k}, {date})")),
            None => Some(format!("DATEADD(MONTH, {months}, {date})"))
        }
    })
}

/// T-SQL allows SELECT without FROM, so Oracle's dummy table goes away.
fn remove_from_dual(sql: &str) -> String {
    if !FROM_DUAL.is_match(sql) {
        return sql.to_string();
    }
    FROM_DUAL.replace_all(sql, "").to_string()
}

/// `WHERE/AND ROWNUM <= n` -> `SELECT TOP n`, with the bound decremented for
/// a strict `<` comparison and any orphaned leading AND promoted to WHERE.
fn convert_rownum(sql: &str) -> String {
    let Some(caps) = ROWNUM_BOUND.captures(sql) else {
        return sql.to_string();
    };
    let Some(full) = caps.get(0) else {
        return sql.to_string();
    };
    let Ok(bound) = caps[3].parse::<u64>() else {
        return sql.to_string();
    };
    let limit = if &caps[2] == "<" { bound.saturating_sub(1) } else { bound };

    let tail = &sql[full.end()..];
    let tail = if caps[1].eq_ignore_ascii_case("WHERE") {
        ORPHAN_AND.replace(tail, "${1}WHERE").to_string()
    } else {
        tail.to_string()
    };
    let stripped = format!("{}{}", &sql[..full.start()], tail);

    SELECT_HEAD
        .replace(&stripped, |caps: &Captures| {
            let distinct = caps.get(1).map(|m| m.as_str()).unwrap_or("");
            format!("SELECT{distinct} TOP {limit}")
        })
        .to_string()
}

/// `FETCH FIRST n ROWS ONLY` -> the T-SQL two-part OFFSET/FETCH suffix.
/// When the query already carries an OFFSET clause, only FIRST is
/// normalized to NEXT.
fn convert_fetch_first(sql: &str) -> String {
    let Some(caps) = FETCH_FIRST.captures(sql) else {
        return sql.to_string();
    };
    let Some(full) = caps.get(0) else {
        return sql.to_string();
    };
    let n = &caps[1];
    let replacement = if OFFSET_ROWS.is_match(&sql[..full.start()]) {
        format!("FETCH NEXT {n} ROWS ONLY")
    } else {
        format!("OFFSET 0 ROWS FETCH NEXT {n} ROWS ONLY")
    };
    FETCH_FIRST.replace(sql, replacement.as_str()).to_string()
}
