//! Textual canonicalization applied to every captured expression.
//!
//! The steps run in a fixed order because later steps repair artifacts of
//! earlier ones: turning every `=` into `==` also turns `>=` into `>==`,
//! which the next step folds back. The rewrite is purely textual and also
//! touches the inside of string literals.

/// Pseudocode spellings of the logical keywords and their canonical form.
/// Matched case-insensitively against whole whitespace-separated words.
const CANONICAL_KEYWORDS: &[(&str, &str)] = &[
    ("true", "True"),
    ("false", "False"),
    ("and", "and"),
    ("or", "or"),
    ("not", "not"),
];

/// Rewrite a captured expression into canonical form.
///
/// 1. `^` becomes `**`
/// 2. `=` becomes `==`
/// 3. `>==`, `<==`, `!==` fold back to `>=`, `<=`, `!=`
/// 4. parentheses are padded with spaces
/// 5. logical keywords are canonicalized; words are re-joined by one space
pub fn canonicalize(expression: &str) -> String {
    let rewritten = expression
        .replace('^', "**")
        .replace('=', "==")
        .replace(">==", ">=")
        .replace("<==", "<=")
        .replace("!==", "!=")
        .replace('(', " ( ")
        .replace(')', " ) ");

    rewritten
        .split_whitespace()
        .map(|word| canonical_keyword(word).unwrap_or(word))
        .collect::<Vec<_>>()
        .join(" ")
}

fn canonical_keyword(word: &str) -> Option<&'static str> {
    CANONICAL_KEYWORDS
        .iter()
        .find(|(spelling, _)| word.eq_ignore_ascii_case(spelling))
        .map(|&(_, canonical)| canonical)
}
