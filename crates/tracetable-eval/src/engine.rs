//! Execution Engine: walks a matched program with a program counter and a
//! loop stack, recording every visible change through [`TraceState`].

use crate::error::EvalResult;
use crate::evaluator::evaluate;
use crate::navigator::{find_block_end, BlockFamily, Direction, FOR_BLOCK, IF_BLOCK, WHILE_BLOCK};
use crate::state::{TraceState, TraceTable};
use serde::Serialize;
use std::collections::BTreeMap;
use tracetable_types::ast::{Program, Statement, StatementKind};
use tracetable_types::{ExprError, TraceError, Value, DISPLAY};
use tracing::{debug, info, trace, warn};

/// Knobs for a single run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Abort with [`TraceError::StepLimitExceeded`] once this many
    /// statements have executed. `None` runs until the program ends.
    pub step_limit: Option<u64>,
}

impl RunOptions {
    pub fn with_step_limit(limit: u64) -> Self {
        Self {
            step_limit: Some(limit),
        }
    }
}

/// Everything a run produced, including a partial table when it failed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunOutcome {
    pub error: Option<TraceError>,
    /// Final value of every variable written, `Display` included.
    pub bindings: BTreeMap<String, Value>,
    pub table: TraceTable,
    /// Statements executed, blank lines included.
    pub steps: u64,
}

impl RunOutcome {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }
}

/// Progress of one active loop, keyed by the index of its header.
#[derive(Debug, Clone, Copy, PartialEq)]
enum LoopFrame {
    Range { owner: usize, current: f64, target: f64 },
    Sequence { owner: usize, index: usize },
}

impl LoopFrame {
    fn owner(&self) -> usize {
        match self {
            Self::Range { owner, .. } | Self::Sequence { owner, .. } => *owner,
        }
    }
}

pub struct Engine<'p> {
    program: &'p Program,
    /// Index of the next statement.
    pc: usize,
    loops: Vec<LoopFrame>,
    state: TraceState,
    steps: u64,
    options: RunOptions,
}

impl<'p> Engine<'p> {
    pub fn new(program: &'p Program, options: RunOptions) -> Self {
        Self {
            program,
            pc: 0,
            loops: Vec::new(),
            state: TraceState::new(),
            steps: 0,
            options,
        }
    }

    /// Execute until the program counter leaves the program or a statement
    /// fails.
    pub fn run(mut self) -> RunOutcome {
        let error = loop {
            if self.pc >= self.program.len() {
                break None;
            }
            if let Err(err) = self.tick() {
                self.state.discard_step_reads();
                break Some(err);
            }
        };
        let steps = self.steps;
        let (bindings, table) = self.state.finish();
        match &error {
            None => info!(steps, frames = table.len(), "run complete"),
            Some(err) => warn!(line = ?err.line(), error = %err, steps, "run aborted"),
        }
        RunOutcome {
            error,
            bindings,
            table,
            steps,
        }
    }

    fn tick(&mut self) -> EvalResult<()> {
        self.state.begin_step();
        if let Some(limit) = self.options.step_limit {
            if self.steps >= limit {
                return Err(TraceError::StepLimitExceeded { limit });
            }
        }
        self.steps += 1;
        let program = self.program;
        let stmt = &program.statements[self.pc];
        debug!(line = stmt.line, kind = %stmt.kind, "execute");
        self.pc = self.execute(stmt)?;
        Ok(())
    }

    /// Run one statement and return the next program counter.
    fn execute(&mut self, stmt: &Statement) -> EvalResult<usize> {
        let pc = self.pc;
        match stmt.kind {
            StatementKind::If => {
                require(stmt, 1)?;
                if self.eval(stmt, 0)?.is_truthy() {
                    Ok(pc + 1)
                } else {
                    self.skip(IF_BLOCK)
                }
            }
            StatementKind::Else => self.skip(IF_BLOCK),
            StatementKind::EndIf | StatementKind::Blank => Ok(pc + 1),

            StatementKind::StartWhile => {
                require(stmt, 1)?;
                self.state.new_frame();
                if self.eval(stmt, 0)?.is_truthy() {
                    Ok(pc + 1)
                } else {
                    self.skip(WHILE_BLOCK)
                }
            }
            StatementKind::EndWhile => {
                find_block_end(self.program, pc, WHILE_BLOCK, Direction::Backward)
            }

            StatementKind::StartFor => self.start_for(stmt),
            StatementKind::ForEach => self.for_each(stmt),
            StatementKind::EndFor => match self.loops.last() {
                None => Err(TraceError::EmptyLoopStack { line: stmt.line }),
                Some(frame) if frame.owner() > pc => Err(TraceError::MismatchedLoopFrame {
                    line: stmt.line,
                    owner: self.line_of(frame.owner()),
                }),
                Some(frame) => Ok(frame.owner()),
            },

            StatementKind::SetVar => {
                require(stmt, 2)?;
                let value = self.eval(stmt, 1)?;
                self.state.write(&stmt.exprs[0], value);
                Ok(pc + 1)
            }
            StatementKind::Display => {
                require(stmt, 1)?;
                let shown = self.eval(stmt, 0)?.to_string();
                self.state.write(DISPLAY, Value::String(shown));
                self.state.new_frame();
                Ok(pc + 1)
            }
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Loops
    // ══════════════════════════════════════════════════════════════════════

    /// `FOR v FROM a TO b`. A revisit only counts upward, so a descending
    /// range keeps `v` at its start value.
    fn start_for(&mut self, stmt: &Statement) -> EvalResult<usize> {
        require(stmt, 3)?;
        self.state.new_frame();
        let pc = self.pc;
        let var = &stmt.exprs[0];

        if let Some(LoopFrame::Range {
            owner,
            current,
            target,
        }) = self.top_frame()
        {
            if owner == pc {
                if current == target {
                    self.loops.pop();
                    trace!(line = stmt.line, "counted loop finished");
                    return self.skip(FOR_BLOCK);
                }
                let next = if target > current { current + 1.0 } else { current };
                self.replace_top(LoopFrame::Range {
                    owner,
                    current: next,
                    target,
                });
                self.state.write(var, Value::Number(next));
                return Ok(pc + 1);
            }
        }

        let start = self.eval_bound(stmt, 1)?;
        let target = self.eval_bound(stmt, 2)?;
        self.loops.push(LoopFrame::Range {
            owner: pc,
            current: start,
            target,
        });
        trace!(line = stmt.line, start, target, depth = self.loops.len(), "counted loop entered");
        self.state.write(var, Value::Number(start));
        Ok(pc + 1)
    }

    /// `FOR EACH v FROM seq`. The sequence expression is evaluated again on
    /// every visit.
    fn for_each(&mut self, stmt: &Statement) -> EvalResult<usize> {
        require(stmt, 2)?;
        self.state.new_frame();
        let pc = self.pc;
        let var = &stmt.exprs[0];
        let items = self.eval(stmt, 1)?;
        let length = items.length().ok_or_else(|| {
            ExprError::TypeMismatch(format!("cannot iterate over {}", items.type_name()))
                .at_line(stmt.line)
        })?;

        let index = match self.top_frame() {
            Some(LoopFrame::Sequence { owner, index }) if owner == pc => {
                if index + 1 >= length {
                    self.loops.pop();
                    trace!(line = stmt.line, "sequence loop finished");
                    return self.skip(FOR_BLOCK);
                }
                self.replace_top(LoopFrame::Sequence {
                    owner,
                    index: index + 1,
                });
                index + 1
            }
            _ => {
                self.loops.push(LoopFrame::Sequence { owner: pc, index: 0 });
                trace!(line = stmt.line, length, depth = self.loops.len(), "sequence loop entered");
                0
            }
        };
        let item = items.element(index).ok_or_else(|| {
            ExprError::IndexOutOfRange {
                index: index as i64,
                length,
            }
            .at_line(stmt.line)
        })?;
        self.state.write(var, item);
        Ok(pc + 1)
    }

    fn top_frame(&self) -> Option<LoopFrame> {
        self.loops.last().copied()
    }

    fn replace_top(&mut self, frame: LoopFrame) {
        if let Some(top) = self.loops.last_mut() {
            *top = frame;
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Helpers
    // ══════════════════════════════════════════════════════════════════════

    /// One past the statement closing the current block.
    fn skip(&self, family: BlockFamily) -> EvalResult<usize> {
        find_block_end(self.program, self.pc, family, Direction::Forward).map(|end| end + 1)
    }

    fn eval(&mut self, stmt: &Statement, slot: usize) -> EvalResult<Value> {
        let source = stmt.exprs[slot].as_str();
        evaluate(source, &mut self.state).map_err(|e| e.at_line(stmt.line))
    }

    fn eval_bound(&mut self, stmt: &Statement, slot: usize) -> EvalResult<f64> {
        match self.eval(stmt, slot)? {
            Value::Number(n) => Ok(n),
            other => Err(ExprError::TypeMismatch(format!(
                "loop bounds must be numbers, got {}",
                other.type_name()
            ))
            .at_line(stmt.line)),
        }
    }

    fn line_of(&self, index: usize) -> u32 {
        self.program
            .get(index)
            .map_or(index as u32 + 1, |stmt| stmt.line)
    }
}

/// A matched line missing one of its captured expressions, e.g. `SET TO 5`.
fn require(stmt: &Statement, count: usize) -> EvalResult<()> {
    if stmt.exprs.len() < count {
        return Err(ExprError::MalformedStatement(format!(
            "{} needs {count} expression(s), found {}",
            stmt.kind.label(),
            stmt.exprs.len()
        ))
        .at_line(stmt.line));
    }
    Ok(())
}
