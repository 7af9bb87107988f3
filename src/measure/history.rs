//! Bounded undo/redo stacks of measurement snapshots.

use crate::constants::MAX_UNDO_DEPTH;

use super::snapshot::Snapshot;

/// Undo/redo history. Both stacks hold past/future states, most recent last.
#[derive(Debug, Default)]
pub struct SnapshotHistory {
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
}

impl SnapshotHistory {
    /// Record the state before a new user mutation. Clears the redo stack.
    pub fn record(&mut self, before: Snapshot) {
        self.redo_stack.clear();
        self.push_undo(before);
    }

    /// Pop the state to go back to, parking `current` on the redo stack.
    pub fn undo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let previous = self.undo_stack.pop()?;
        self.redo_stack.push(current);
        Some(previous)
    }

    /// Pop the state to go forward to, parking `current` on the undo stack.
    pub fn redo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let next = self.redo_stack.pop()?;
        self.push_undo(current);
        Some(next)
    }

    /// Drop the newest undo entry if it is identical to `current`.
    ///
    /// Used when an in-progress primitive is abandoned: the entry recorded at
    /// its creation would otherwise undo to the very same state.
    pub fn drop_if_unchanged(&mut self, current: &Snapshot) -> bool {
        if self.undo_stack.last() == Some(current) {
            self.undo_stack.pop();
            true
        } else {
            false
        }
    }

    fn push_undo(&mut self, snapshot: Snapshot) {
        self.undo_stack.push(snapshot);
        if self.undo_stack.len() > MAX_UNDO_DEPTH {
            let excess = self.undo_stack.len() - MAX_UNDO_DEPTH;
            self.undo_stack.drain(..excess);
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::kind::PrimitiveKind;
    use crate::measure::primitive::{PrimitiveId, Rgb};
    use crate::measure::snapshot::PrimitiveRecord;

    fn snapshot_with(count: u64) -> Snapshot {
        Snapshot {
            primitives: (0..count)
                .map(|i| PrimitiveRecord {
                    id: PrimitiveId(i),
                    kind: PrimitiveKind::Point,
                    name: "Point".to_string(),
                    points: vec![],
                    color: Rgb::default(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_record_enables_undo() {
        let mut history = SnapshotHistory::default();
        assert!(!history.can_undo());
        history.record(Snapshot::default());
        assert!(history.can_undo());
        assert_eq!(history.undo_count(), 1);
    }

    #[test]
    fn test_undo_moves_current_to_redo() {
        let mut history = SnapshotHistory::default();
        history.record(snapshot_with(0));

        let restored = history.undo(snapshot_with(1));
        assert_eq!(restored, Some(snapshot_with(0)));
        assert_eq!(history.redo_count(), 1);

        let forward = history.redo(snapshot_with(0));
        assert_eq!(forward, Some(snapshot_with(1)));
        assert_eq!(history.undo_count(), 1);
        assert!(!history.can_redo());
    }

    #[test]
    fn test_record_clears_redo() {
        let mut history = SnapshotHistory::default();
        history.record(snapshot_with(0));
        history.undo(snapshot_with(1));
        assert!(history.can_redo());

        history.record(snapshot_with(0));
        assert!(!history.can_redo());
    }

    #[test]
    fn test_empty_stacks_do_nothing() {
        let mut history = SnapshotHistory::default();
        assert!(history.undo(snapshot_with(1)).is_none());
        assert!(history.redo(snapshot_with(1)).is_none());
        assert_eq!(history.redo_count(), 0);
        assert_eq!(history.undo_count(), 0);
    }

    #[test]
    fn test_cap_evicts_oldest() {
        let mut history = SnapshotHistory::default();
        for i in 0..(MAX_UNDO_DEPTH as u64 + 10) {
            history.record(snapshot_with(i));
        }
        assert_eq!(history.undo_count(), MAX_UNDO_DEPTH);

        // The oldest surviving entry is the 11th recorded one.
        let mut last = None;
        while let Some(s) = history.undo(Snapshot::default()) {
            last = Some(s);
        }
        assert_eq!(last, Some(snapshot_with(10)));
    }

    #[test]
    fn test_redo_respects_cap() {
        let mut history = SnapshotHistory::default();
        for i in 0..MAX_UNDO_DEPTH as u64 {
            history.record(snapshot_with(i));
        }
        history.undo(snapshot_with(99));
        history.redo(snapshot_with(98));
        assert_eq!(history.undo_count(), MAX_UNDO_DEPTH);
    }

    #[test]
    fn test_drop_if_unchanged() {
        let mut history = SnapshotHistory::default();
        history.record(snapshot_with(2));
        assert!(!history.drop_if_unchanged(&snapshot_with(3)));
        assert!(history.drop_if_unchanged(&snapshot_with(2)));
        assert!(!history.can_undo());
    }
}
