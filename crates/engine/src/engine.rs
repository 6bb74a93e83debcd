// Engine facade - the single owner of the current table. Operations are
// validated fully before any state changes; on failure the table and
// history are untouched and the error propagates verbatim.

use crate::error::EngineError;
use crate::history::{History, OperationDescriptor};
use crate::ops::Operation;
use crate::table::Table;

pub struct Engine {
    current: Table,
    history: History,
    /// Increments once per successful mutation (apply or undo).
    revision: u64,
}

impl Engine {
    pub fn new(table: Table) -> Self {
        Self {
            current: table,
            history: History::new(),
            revision: 0,
        }
    }

    pub fn table(&self) -> &Table {
        &self.current
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Apply an operation. On success the pre-operation table is recorded
    /// and the result becomes current, atomically from the caller's view.
    pub fn apply(&mut self, op: Operation) -> Result<&Table, EngineError> {
        let result = op.apply(&self.current)?;

        let descriptor = OperationDescriptor::for_operation(&op);
        let before = std::mem::replace(&mut self.current, result);
        self.history.record(before, descriptor);
        self.revision += 1;

        Ok(&self.current)
    }

    /// Restore the table from before the most recent operation. Undo is
    /// not itself recorded, so it cannot be undone.
    pub fn undo(&mut self) -> Result<&Table, EngineError> {
        let entry = self.history.undo().ok_or(EngineError::NothingToUndo)?;
        self.current = entry.before;
        self.revision += 1;
        Ok(&self.current)
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}
