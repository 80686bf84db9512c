//! Linear undo/redo over whole-document snapshots.

use tracing::debug;

/// A serialized copy of the full working document, tagged with the page
/// being viewed when it was taken. Immutable once pushed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub page: usize,
    pub bytes: Vec<u8>,
}

/// Linear history with the undo-then-edit-truncates-redo-future rule.
///
/// The pointer addresses the snapshot matching the current document
/// state; `undo`/`redo` move it and hand back the snapshot to restore.
/// Granularity is whole-document serialization, so history depth is
/// bounded by memory rather than edit count.
#[derive(Debug, Default)]
pub struct HistoryStack {
    snapshots: Vec<Snapshot>,
    pointer: usize,
}

impl HistoryStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Index of the snapshot matching the current state.
    pub fn position(&self) -> Option<usize> {
        if self.snapshots.is_empty() {
            None
        } else {
            Some(self.pointer)
        }
    }

    /// Append a snapshot as the new current state, discarding any redo
    /// future beyond the pointer.
    pub fn commit(&mut self, snapshot: Snapshot) {
        if !self.snapshots.is_empty() {
            self.snapshots.truncate(self.pointer + 1);
        }
        self.snapshots.push(snapshot);
        self.pointer = self.snapshots.len() - 1;
        debug!("committed snapshot {} of {}", self.pointer, self.snapshots.len());
    }

    /// Step back one snapshot. `None` when already at the first.
    pub fn undo(&mut self) -> Option<&Snapshot> {
        if self.snapshots.is_empty() || self.pointer == 0 {
            return None;
        }
        self.pointer -= 1;
        Some(&self.snapshots[self.pointer])
    }

    /// Step forward one snapshot. `None` when already at the last.
    pub fn redo(&mut self) -> Option<&Snapshot> {
        if self.snapshots.is_empty() || self.pointer + 1 >= self.snapshots.len() {
            return None;
        }
        self.pointer += 1;
        Some(&self.snapshots[self.pointer])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn snap(tag: u8) -> Snapshot {
        Snapshot {
            page: 0,
            bytes: vec![tag],
        }
    }

    #[test]
    fn test_undo_and_redo_are_noops_at_the_ends() {
        let mut history = HistoryStack::new();
        assert!(history.undo().is_none());
        assert!(history.redo().is_none());

        history.commit(snap(0));
        assert!(history.undo().is_none());
        assert!(history.redo().is_none());
    }

    #[test]
    fn test_undo_walks_back_and_redo_forward() {
        let mut history = HistoryStack::new();
        history.commit(snap(0));
        history.commit(snap(1));
        history.commit(snap(2));

        assert_eq!(history.undo().unwrap().bytes, vec![1]);
        assert_eq!(history.undo().unwrap().bytes, vec![0]);
        assert!(history.undo().is_none());

        assert_eq!(history.redo().unwrap().bytes, vec![1]);
        assert_eq!(history.redo().unwrap().bytes, vec![2]);
        assert!(history.redo().is_none());
    }

    #[test]
    fn test_commit_after_undo_truncates_redo_future() {
        let mut history = HistoryStack::new();
        history.commit(snap(0));
        history.commit(snap(1));
        history.commit(snap(2));
        assert_eq!(history.position(), Some(2));

        history.undo();
        history.commit(snap(3));

        assert_eq!(history.len(), 3);
        assert_eq!(history.position(), Some(2));
        assert!(history.redo().is_none());
        assert_eq!(history.undo().unwrap().bytes, vec![1]);
        assert_eq!(history.redo().unwrap().bytes, vec![3]);
    }
}
