use crate::template::token::Token;
use regex::Regex;
use std::sync::LazyLock;

// Grammar:  % ( OPNAME ( "(" ARGS ")" )? ( ":" DIGITS )? )? %
// Capture:
// 1) operator:   [A-Z_]+ (lowercase text is never an operator)
// 2) args:       "(" ... ")" with no ')' inside, parentheses kept
// 3) truncation: ":" digits, colon kept
// regex crate matching is linear-time; no backtracking.
const OPERATOR_RE: &str =
    r"%(?:(?P<operator>[A-Z_]+)(?P<args>\([^)]*\))?(?P<truncation>:[0-9]+)?)?%";

static OPERATOR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(OPERATOR_RE).expect("operator grammar is a valid regex"));

/// Scan `template` for every non-overlapping operator reference, left to right.
///
/// A `%` that does not open a complete match is literal text and produces no
/// token; this never fails.
///
/// Example:
/// `[%START_TIME%] %REQ(:METHOD)%` => `%START_TIME%`, `%REQ(:METHOD)%`
pub fn tokenize(template: &str) -> Vec<Token<'_>> {
    if !template.contains('%') {
        return Vec::new();
    }

    OPERATOR_PATTERN
        .captures_iter(template)
        .map(|caps| {
            let part = |name: &str| caps.name(name).map_or("", |m| m.as_str());
            Token {
                whole_match: caps.get(0).map_or("", |m| m.as_str()),
                operator_name: part("operator"),
                args: part("args"),
                truncation: part("truncation"),
            }
        })
        .collect()
}
