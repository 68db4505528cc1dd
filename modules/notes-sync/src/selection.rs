//! Which note is active, and how that is re-derived when the collection changes.
//!
//! `select` does not validate; the reconcile methods repair the selection
//! after the collection moves under it. The re-selection policy is "head of
//! what remains", whether the removal came from a delete or a create rollback.

use crate::store::NoteId;

#[derive(Debug, Clone, Default)]
pub struct SelectionManager {
    current: Option<NoteId>,
}

impl SelectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<NoteId> {
        self.current
    }

    pub fn select(&mut self, id: NoteId) {
        self.current = Some(id);
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    /// If the removed note was selected, move to the head of what remains.
    pub fn reconcile_after_removal(&mut self, removed: NoteId, remaining: &[NoteId]) {
        if self.current == Some(removed) {
            self.current = remaining.first().copied();
        }
    }

    /// Follow a note through an id change (pending -> confirmed).
    pub fn reconcile_after_replace(&mut self, old: NoteId, new: NoteId) {
        if self.current == Some(old) {
            self.current = Some(new);
        }
    }

    /// Repair the selection after the whole collection was swapped out.
    pub fn reconcile_with(&mut self, collection: &[NoteId]) {
        match self.current {
            Some(id) if !collection.contains(&id) => {
                self.reconcile_after_removal(id, collection);
            }
            None => self.current = collection.first().copied(),
            Some(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[i64]) -> Vec<NoteId> {
        raw.iter().map(|id| NoteId::Confirmed(*id)).collect()
    }

    #[test]
    fn test_removal_of_selected_moves_to_head() {
        let mut sel = SelectionManager::new();
        sel.select(NoteId::Confirmed(2));
        sel.reconcile_after_removal(NoteId::Confirmed(2), &ids(&[1, 3]));
        assert_eq!(sel.current(), Some(NoteId::Confirmed(1)));
    }

    #[test]
    fn test_removal_of_last_note_clears() {
        let mut sel = SelectionManager::new();
        sel.select(NoteId::Confirmed(2));
        sel.reconcile_after_removal(NoteId::Confirmed(2), &[]);
        assert_eq!(sel.current(), None);
    }

    #[test]
    fn test_removal_of_other_note_is_noop() {
        let mut sel = SelectionManager::new();
        sel.select(NoteId::Confirmed(3));
        sel.reconcile_after_removal(NoteId::Confirmed(2), &ids(&[1, 3]));
        assert_eq!(sel.current(), Some(NoteId::Confirmed(3)));
    }

    #[test]
    fn test_replace_follows_selected_note() {
        let mut sel = SelectionManager::new();
        sel.select(NoteId::Pending(1));
        sel.reconcile_after_replace(NoteId::Pending(1), NoteId::Confirmed(7));
        assert_eq!(sel.current(), Some(NoteId::Confirmed(7)));

        sel.reconcile_after_replace(NoteId::Pending(2), NoteId::Confirmed(8));
        assert_eq!(sel.current(), Some(NoteId::Confirmed(7)));
    }

    #[test]
    fn test_reconcile_with_selects_head_when_empty_selection() {
        let mut sel = SelectionManager::new();
        sel.reconcile_with(&ids(&[4, 5]));
        assert_eq!(sel.current(), Some(NoteId::Confirmed(4)));
    }

    #[test]
    fn test_reconcile_with_repairs_dangling_selection() {
        let mut sel = SelectionManager::new();
        sel.select(NoteId::Confirmed(9));
        sel.reconcile_with(&ids(&[4, 5]));
        assert_eq!(sel.current(), Some(NoteId::Confirmed(4)));

        sel.select(NoteId::Confirmed(5));
        sel.reconcile_with(&ids(&[4, 5]));
        assert_eq!(sel.current(), Some(NoteId::Confirmed(5)));

        sel.reconcile_with(&[]);
        assert_eq!(sel.current(), None);
    }
}
