//! Statement templates and the line matcher.
//!
//! A template is a sequence of literal keywords; the gaps between them are
//! expression slots. Keywords are found by plain substring search from the
//! current scan position, so a keyword can match inside a longer word
//! (`TO` inside `TOTAL`). Template order decides ambiguous lines.

use tracetable_types::ast::StatementKind;

/// One line shape: a statement kind and its literal keywords in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Template {
    pub kind: StatementKind,
    pub keywords: &'static [&'static str],
}

/// All templates in match priority order. The first match wins.
pub const TEMPLATES: &[Template] = &[
    Template {
        kind: StatementKind::StartWhile,
        keywords: &["WHILE", "DO"],
    },
    Template {
        kind: StatementKind::SetVar,
        keywords: &["SET", "TO"],
    },
    Template {
        kind: StatementKind::Display,
        keywords: &["SEND", "TO DISPLAY"],
    },
    Template {
        kind: StatementKind::If,
        keywords: &["IF", "THEN"],
    },
    Template {
        kind: StatementKind::Else,
        keywords: &["ELSE"],
    },
    Template {
        kind: StatementKind::EndIf,
        keywords: &["END IF"],
    },
    Template {
        kind: StatementKind::EndWhile,
        keywords: &["END WHILE"],
    },
    Template {
        kind: StatementKind::StartFor,
        keywords: &["FOR", "FROM", "TO"],
    },
    Template {
        kind: StatementKind::EndFor,
        keywords: &["END FOR"],
    },
    Template {
        kind: StatementKind::ForEach,
        keywords: &["FOR EACH", "FROM"],
    },
];

impl Template {
    /// Try to match a trimmed line. Returns the captured expressions on
    /// success.
    ///
    /// Text before each keyword becomes a capture when it is not blank, and
    /// so does any text after the last keyword.
    pub fn captures(&self, line: &str) -> Option<Vec<String>> {
        let mut pos = 0;
        let mut exprs = Vec::new();
        for keyword in self.keywords {
            let loc = line[pos..].find(keyword)?;
            push_capture(&mut exprs, &line[pos..pos + loc]);
            pos += loc + keyword.len();
        }
        push_capture(&mut exprs, &line[pos..]);
        Some(exprs)
    }
}

fn push_capture(exprs: &mut Vec<String>, gap: &str) {
    let gap = gap.trim();
    if !gap.is_empty() {
        exprs.push(gap.to_string());
    }
}

/// Classify one raw source line.
///
/// Lines no template accepts (comments, blank lines, typos) come back as
/// [`StatementKind::Blank`] with no captures.
pub fn match_line(line: &str) -> (StatementKind, Vec<String>) {
    let line = line.trim();
    TEMPLATES
        .iter()
        .find_map(|template| template.captures(line).map(|exprs| (template.kind, exprs)))
        .unwrap_or((StatementKind::Blank, Vec::new()))
}
