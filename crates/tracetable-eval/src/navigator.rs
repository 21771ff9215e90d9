//! Block Navigator: balanced scans over statement kinds.

use crate::error::EvalResult;
use tracetable_types::ast::{Program, StatementKind};
use tracetable_types::TraceError;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Opening and closing kinds of one nesting family, as seen scanning
/// forward.
#[derive(Debug, Clone, Copy)]
pub struct BlockFamily {
    pub enter: &'static [StatementKind],
    pub exit: &'static [StatementKind],
}

/// `else` both closes the taken branch and opens the other one.
pub const IF_BLOCK: BlockFamily = BlockFamily {
    enter: &[StatementKind::If, StatementKind::Else],
    exit: &[StatementKind::Else, StatementKind::EndIf],
};

pub const WHILE_BLOCK: BlockFamily = BlockFamily {
    enter: &[StatementKind::StartWhile],
    exit: &[StatementKind::EndWhile],
};

pub const FOR_BLOCK: BlockFamily = BlockFamily {
    enter: &[StatementKind::StartFor, StatementKind::ForEach],
    exit: &[StatementKind::EndFor],
};

/// Index of the statement closing the block at `start`, scanning in
/// `direction`. Backward scans swap the family's roles so `end_while` finds
/// its `start_while`.
///
/// Exit kinds are tested before enter kinds, so an `else` at depth zero
/// ends a forward `if` scan while a nested `else` leaves the depth
/// unchanged. Running off either end of the program is an
/// [`TraceError::UnbalancedBlock`] reported against the starting line.
pub fn find_block_end(
    program: &Program,
    start: usize,
    family: BlockFamily,
    direction: Direction,
) -> EvalResult<usize> {
    let (enter, exit) = match direction {
        Direction::Forward => (family.enter, family.exit),
        Direction::Backward => (family.exit, family.enter),
    };
    let mut depth: i64 = 0;
    let mut index = start;
    loop {
        index = match step(index, direction, program.len()) {
            Some(next) => next,
            None => return Err(unbalanced(program, start, exit)),
        };
        let Some(stmt) = program.get(index) else {
            return Err(unbalanced(program, start, exit));
        };
        if exit.contains(&stmt.kind) {
            depth -= 1;
            if depth < 0 {
                trace!(from = start, to = index, ?direction, "block scan");
                return Ok(index);
            }
        }
        if enter.contains(&stmt.kind) {
            depth += 1;
        }
    }
}

fn step(index: usize, direction: Direction, len: usize) -> Option<usize> {
    match direction {
        Direction::Forward => Some(index + 1).filter(|&i| i < len),
        Direction::Backward => index.checked_sub(1),
    }
}

fn unbalanced(program: &Program, start: usize, exit: &[StatementKind]) -> TraceError {
    let line = program
        .get(start)
        .map_or(start as u32 + 1, |stmt| stmt.line);
    let expected = exit
        .iter()
        .map(|k| k.label())
        .collect::<Vec<_>>()
        .join("/");
    TraceError::UnbalancedBlock { line, expected }
}
