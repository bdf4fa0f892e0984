use crate::config::HistoryPolicy;
use crate::record::ActionRecord;
use levelforge_kernel::Level;

/// Undo and redo stacks for one actor.
///
/// Undo pops a record, reverts it, and keeps the counter-record for redo.
/// Redo does the same in the other direction.
#[derive(Debug, Clone, Default)]
pub struct History {
    undo_stack: Vec<ActionRecord>,
    redo_stack: Vec<ActionRecord>,
    policy: HistoryPolicy,
}

impl History {
    /// Create empty stacks under the given policy.
    pub fn new(policy: HistoryPolicy) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            policy,
        }
    }

    /// Push a freshly performed edit.
    pub fn record(&mut self, record: ActionRecord) {
        tracing::debug!(
            action = record.label(),
            depth = self.undo_stack.len() + 1,
            "recorded edit"
        );
        self.undo_stack.push(record);
        if self.policy == HistoryPolicy::Conventional {
            self.redo_stack.clear();
        }
    }

    /// Undo the last edit. Returns true if a record was popped, even when its
    /// target no longer resolved.
    pub fn undo(&mut self, level: &mut Level) -> bool {
        let Some(record) = self.undo_stack.pop() else {
            return false;
        };
        tracing::debug!(action = record.label(), "undo");
        if let Some(inverse) = record.revert(level) {
            self.redo_stack.push(inverse);
            level.mark_unsaved();
        }
        true
    }

    /// Redo the last undone edit. Returns true if a record was popped.
    pub fn redo(&mut self, level: &mut Level) -> bool {
        let Some(record) = self.redo_stack.pop() else {
            return false;
        };
        tracing::debug!(action = record.label(), "redo");
        if let Some(inverse) = record.revert(level) {
            level.mark_unsaved();
            if self.policy == HistoryPolicy::Conventional {
                self.undo_stack.push(inverse);
            }
        }
        true
    }

    /// Number of records on the undo stack.
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Number of records on the redo stack.
    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    /// Whether there are records that can be undone.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Whether there are records that can be redone.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// The record the next undo would revert.
    pub fn last_undo(&self) -> Option<&ActionRecord> {
        self.undo_stack.last()
    }

    /// The record the next redo would revert.
    pub fn last_redo(&self) -> Option<&ActionRecord> {
        self.redo_stack.last()
    }
}
