//! Trace State: current bindings plus the snapshots that form the trace
//! table.
//!
//! Rows are cut lazily. A write only forces a boundary when the open frame
//! already committed a different value for the same name, and a boundary
//! request drops frames that would only repeat values read from earlier
//! rows.

use crate::env::Bindings;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracetable_types::{ExprError, Value, DISPLAY};
use tracing::trace;

/// One row of the trace table. A name missing from the frame had no value
/// recorded at that step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TraceFrame {
    values: BTreeMap<String, Value>,
}

impl TraceFrame {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<(String, Value)> for TraceFrame {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// The finished, read-only trace table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TraceTable {
    /// Every written name in sorted order, `Display` last when present.
    columns: Vec<String>,
    frames: Vec<TraceFrame>,
}

impl TraceTable {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn frames(&self) -> &[TraceFrame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frames laid out against [`columns`](Self::columns); `None` marks a
    /// variable with no value in that row.
    pub fn rows(&self) -> Vec<Vec<Option<&Value>>> {
        self.frames
            .iter()
            .map(|frame| self.columns.iter().map(|c| frame.get(c)).collect())
            .collect()
    }

    /// Every value one column took, top to bottom, skipping rows without it.
    pub fn column_values(&self, name: &str) -> Vec<&Value> {
        self.frames.iter().filter_map(|f| f.get(name)).collect()
    }
}

/// Mutable bookkeeping behind a run.
#[derive(Debug, Default)]
pub struct TraceState {
    /// Latest value of every variable written so far.
    objects: BTreeMap<String, Value>,
    /// Closed rows.
    frames: Vec<TraceFrame>,
    /// The open row.
    current: BTreeMap<String, Value>,
    /// Names in `current` that were only read, not written.
    temps: BTreeSet<String>,
    /// Names the executing statement pulled into `current` by reading.
    step_reads: Vec<String>,
}

impl TraceState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest value of `name`, without any trace bookkeeping.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.objects.get(name)
    }

    pub fn bindings(&self) -> &BTreeMap<String, Value> {
        &self.objects
    }

    /// Number of closed rows so far.
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Record a write. A committed name whose recorded value differs gets a
    /// new row first, so no row ever shows two values for one name.
    pub fn write(&mut self, name: &str, value: Value) {
        let conflicting = !self.temps.contains(name)
            && self.current.get(name).is_some_and(|old| *old != value);
        if conflicting {
            trace!(name, "write conflicts with open frame");
            self.new_frame();
        }
        self.temps.remove(name);
        self.current.insert(name.to_string(), value.clone());
        self.objects.insert(name.to_string(), value);
    }

    /// Close the open row unless it is empty. A row holding nothing but
    /// reads collapses away; if it also holds `Display`, only `Display`
    /// survives.
    pub fn new_frame(&mut self) {
        if let Some(frame) = self.collapse() {
            trace!(frame = self.frames.len(), columns = frame.len(), "frame closed");
            self.frames.push(frame);
        }
        self.current.clear();
        self.temps.clear();
    }

    /// Mark the start of a statement for [`discard_step_reads`](Self::discard_step_reads).
    pub fn begin_step(&mut self) {
        self.step_reads.clear();
    }

    /// Forget the reads a failed statement pulled into the open row, so the
    /// partial table stops before that statement.
    pub fn discard_step_reads(&mut self) {
        for name in self.step_reads.drain(..) {
            if self.temps.remove(&name) {
                self.current.remove(&name);
            }
        }
    }

    /// Close the trailing row under the same collapse rule and produce the
    /// table.
    pub fn finish(mut self) -> (BTreeMap<String, Value>, TraceTable) {
        self.new_frame();
        let mut columns: Vec<String> = self
            .objects
            .keys()
            .filter(|k| k.as_str() != DISPLAY)
            .cloned()
            .collect();
        if self.objects.contains_key(DISPLAY) {
            columns.push(DISPLAY.to_string());
        }
        let table = TraceTable {
            columns,
            frames: self.frames,
        };
        (self.objects, table)
    }

    fn collapse(&mut self) -> Option<TraceFrame> {
        if self.current.is_empty() {
            return None;
        }
        let trivial = self
            .current
            .keys()
            .all(|k| k == DISPLAY || self.temps.contains(k));
        if !trivial {
            return Some(std::mem::take(&mut self.current).into_iter().collect());
        }
        self.current.get(DISPLAY).map(|_| {
            self.objects
                .get(DISPLAY)
                .map(|v| (DISPLAY.to_string(), v.clone()))
                .into_iter()
                .collect()
        })
    }
}

impl Bindings for TraceState {
    /// Reads of names not yet in the open row join it as temporaries.
    fn read(&mut self, name: &str) -> Result<Value, ExprError> {
        let value = self
            .objects
            .get(name)
            .cloned()
            .ok_or_else(|| ExprError::UnboundVariable(name.to_string()))?;
        if !self.current.contains_key(name) {
            self.temps.insert(name.to_string());
            self.step_reads.push(name.to_string());
            self.current.insert(name.to_string(), value.clone());
        }
        Ok(value)
    }
}
