//! Program construction: one statement per source line.

use std::io::{self, BufRead};

use tracetable_types::ast::{Program, Statement, StatementKind};
use tracetable_types::SourceFile;
use tracing::{debug, trace};

use crate::template::match_line;

/// A line exactly equal to this ends standard-input mode.
pub const END_SENTINEL: &str = "END";

/// Match every line of a source file. Blank and unrecognised lines keep
/// their index so statement numbers follow source lines.
pub fn parse_source(source: &SourceFile) -> Program {
    build(source.lines())
}

/// Match every `\n`-delimited line of `text`.
pub fn parse_program(text: &str) -> Program {
    parse_source(&SourceFile::new(text))
}

/// Read lines until one is exactly [`END_SENTINEL`] or input runs out,
/// matching each as it arrives.
pub fn read_program<R: BufRead>(reader: R) -> io::Result<Program> {
    let mut lines = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.trim_end_matches('\r');
        if line == END_SENTINEL {
            break;
        }
        lines.push(line.to_string());
    }
    Ok(build(lines.iter().map(String::as_str)))
}

fn build<'a>(lines: impl Iterator<Item = &'a str>) -> Program {
    let statements: Vec<Statement> = lines
        .enumerate()
        .map(|(index, text)| {
            let (kind, exprs) = match_line(text);
            trace!(line = index + 1, %kind, ?exprs, "matched line");
            Statement::new(kind, exprs, index as u32 + 1)
        })
        .collect();
    let blank = statements
        .iter()
        .filter(|s| s.kind == StatementKind::Blank)
        .count();
    debug!(statements = statements.len(), blank, "parsed program");
    Program::new(statements)
}
