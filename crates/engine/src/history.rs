// Operation history - an append-only undo stack. There is no redo:
// undone operations are discarded.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::ops::Operation;
use crate::table::Table;

/// What was applied, for the history log. Never re-executed.
#[derive(Debug, Clone, Serialize)]
pub struct OperationDescriptor {
    pub kind: &'static str,
    pub label: String,
    pub timestamp: DateTime<Utc>,
}

impl OperationDescriptor {
    pub fn for_operation(op: &Operation) -> Self {
        Self {
            kind: op.kind(),
            label: op.label(),
            timestamp: Utc::now(),
        }
    }
}

/// Snapshot of the table as it was before the operation ran, paired with
/// the operation's descriptor. Immutable once recorded.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub before: Table,
    pub descriptor: OperationDescriptor,
}

#[derive(Debug, Default)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, before: Table, descriptor: OperationDescriptor) {
        self.entries.push(HistoryEntry { before, descriptor });
    }

    /// Pop the most recent entry. None when the history is empty; the
    /// engine facade maps that to `NothingToUndo`.
    pub fn undo(&mut self) -> Option<HistoryEntry> {
        self.entries.pop()
    }

    /// Descriptors in chronological order, oldest first.
    pub fn list(&self) -> Vec<&OperationDescriptor> {
        self.entries.iter().map(|e| &e.descriptor).collect()
    }

    pub fn can_undo(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
