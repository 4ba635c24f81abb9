//! Change events emitted by forest mutations and the dirty tracker that
//! consumes them.

use super::forest::Forest;
use super::node::TreeNode;
use tracing::debug;

/// One mutation applied to a forest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForestChange {
    Inserted { id: String },
    Removed { id: String },
    Moved { id: String },
    Updated { id: String },
    /// The whole forest was swapped out (import).
    Replaced,
}

/// Tracks whether a forest has unsaved changes.
#[derive(Debug, Default)]
pub struct DirtyTracker {
    pending: usize,
    last_change: Option<ForestChange>,
}

impl DirtyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, change: &ForestChange) {
        self.pending += 1;
        self.last_change = Some(change.clone());
    }

    /// Drain the forest's pending changes into this tracker.
    ///
    /// Returns the number of changes consumed.
    pub fn observe<T: TreeNode>(&mut self, forest: &mut Forest<T>) -> usize {
        let changes = forest.drain_changes();
        for change in &changes {
            self.record(change);
        }
        if !changes.is_empty() {
            debug!("{} forest change(s) pending save", self.pending);
        }
        changes.len()
    }

    pub fn is_dirty(&self) -> bool {
        self.pending > 0
    }

    pub fn pending(&self) -> usize {
        self.pending
    }

    pub fn last_change(&self) -> Option<&ForestChange> {
        self.last_change.as_ref()
    }

    /// Reset after a successful save.
    pub fn mark_saved(&mut self) {
        self.pending = 0;
        self.last_change = None;
    }
}
