//! Lexical scanner primitives shared by both rewrite pipelines.
//!
//! The converter never builds a parse tree. Every nesting-sensitive rewrite
//! relies on the helpers here instead: a depth/quote-aware argument splitter,
//! a balanced-parenthesis matcher, and a quote-aware operator swapper. All of
//! them track parenthesis depth and quote state independently, so a comma or
//! an operator inside a string literal or a nested call is never mistaken for
//! a structural token.

use regex::Regex;

/// Split the raw text between a call's parentheses into its top-level
/// comma-separated arguments, each trimmed of surrounding whitespace.
///
/// Commas inside nested parentheses or inside single/double-quoted literals
/// are kept verbatim. Unbalanced input degrades gracefully: whatever was
/// accumulated is returned instead of an error.
///
/// ```
/// use sql_select_converter::convert::scan::split_args;
///
/// let args = split_args("a, NVL(b, 'x,y'), 'lit''s'");
/// assert_eq!(args, vec!["a", "NVL(b, 'x,y')", "'lit''s'"]);
/// ```
pub fn split_args(content: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth = 0i32;
    let mut quote: Option<char> = None;

    for ch in content.chars() {
        match quote {
            Some(q) => {
                current.push(ch);
                if ch == q {
                    quote = None;
                }
            }
            None => match ch {
                '\'' | '"' => {
                    quote = Some(ch);
                    current.push(ch);
                }
                '(' => {
                    depth += 1;
                    current.push(ch);
                }
                ')' => {
                    depth -= 1;
                    current.push(ch);
                }
                ',' if depth == 0 => {
                    parts.push(current.trim().to_string());
                    current.clear();
                }
                _ => current.push(ch)
            }
        }
    }

    if !current.is_empty() {
        parts.push(current.trim().to_string());
    }

    parts
}

/// Byte index of the `)` matching the `(` at `open`, skipping parentheses
/// inside quoted literals. Returns `None` when the input is unbalanced or
/// `open` does not sit on an opening parenthesis.
pub fn matching_paren(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0i32;
    let mut quote: Option<char> = None;

    for (idx, ch) in text[open..].char_indices() {
        match quote {
            Some(q) => {
                if ch == q {
                    quote = None;
                }
            }
            None => match ch {
                '\'' | '"' => quote = Some(ch),
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(open + idx);
                    }
                    if depth < 0 {
                        return None;
                    }
                }
                _ => {}
            }
        }
    }

    None
}

/// Replace every occurrence of an ASCII operator token outside quoted
/// literals. Used for the concatenation operator swap (`||` <-> `+`).
pub fn swap_operator_outside_quotes(sql: &str, from: &str, to: &str) -> String {
    let mut out = String::with_capacity(sql.len());
    let mut quote: Option<char> = None;
    let mut skip = 0usize;

    for (idx, ch) in sql.char_indices() {
        if skip > 0 {
            skip -= 1;
            continue;
        }
        match quote {
            Some(q) => {
                out.push(ch);
                if ch == q {
                    quote = None;
                }
            }
            None => {
                if ch == '\'' || ch == '"' {
                    quote = Some(ch);
                    out.push(ch);
                } else if sql[idx..].starts_with(from) {
                    out.push_str(to);
                    // operator tokens are ASCII, one byte per char
                    skip = from.len() - 1;
                } else {
                    out.push(ch);
                }
            }
        }
    }

    out
}

/// Skip leading `--` and `/* */` comments plus surrounding whitespace.
/// Statement validation looks at the first keyword after this offset.
pub fn skip_leading_comments(sql: &str) -> &str {
    let mut rest = sql.trim_start();
    loop {
        if let Some(stripped) = rest.strip_prefix("--") {
            rest = match stripped.find('\n') {
                Some(pos) => stripped[pos + 1..].trim_start(),
                None => ""
            };
        } else if let Some(stripped) = rest.strip_prefix("/*") {
            rest = match stripped.find("*/") {
                Some(pos) => stripped[pos + 2..].trim_start(),
                None => ""
            };
        } else {
            return rest;
        }
    }
}

/// Rewrite every call site matched by `call` across the whole text.
///
/// `call` must end its match at the opening parenthesis (patterns of the
/// shape `(?i)\bNAME\s*\(`). The call's balanced content is located with
/// [`matching_paren`], rewritten recursively first (so self-nesting calls
/// reach a fixpoint in one pass), then handed to `rebuild`:
///
/// - `Some(replacement)` substitutes the entire call expression;
/// - `None` keeps the original call with its rewritten arguments.
///
/// A call whose closing parenthesis cannot be found is left untouched along
/// with the remainder of the text.
pub fn rewrite_calls(sql: &str, call: &Regex, rebuild: &dyn Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(sql.len());
    let mut pos = 0usize;

    while let Some(m) = call.find_at(sql, pos) {
        let open = m.end() - 1;
        let Some(close) = matching_paren(sql, open) else {
            break;
        };
        out.push_str(&sql[pos..m.start()]);
        let inner = rewrite_calls(&sql[open + 1..close], call, rebuild);
        match rebuild(&inner) {
            Some(replacement) => out.push_str(&replacement),
            None => {
                out.push_str(&sql[m.start()..=open]);
                out.push_str(&inner);
                out.push(')');
            }
        }
        pos = close + 1;
    }

    out.push_str(&sql[pos..]);
    out
}
