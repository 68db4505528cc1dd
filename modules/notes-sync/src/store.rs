//! NoteStore — the ordered, in-memory reflection of the remote note collection.
//!
//! Order is whatever the server returned, except for local insertions at the
//! head and removals. Ids are unique at all times. Every primitive treats a
//! missing id as "nothing to do" rather than an error, since the remote side
//! may already have diverged from the local view by the time a call settles.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use notes_sync_types::Note;

/// Title given to a freshly created note before the user types anything.
pub const DRAFT_TITLE: &str = "Untitled";

/// Identity of a note in the local collection.
///
/// `Pending` notes exist only locally, between an optimistic insert and the
/// server's answer to the create call. Their token is never sent anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoteId {
    Pending(u64),
    Confirmed(i64),
}

impl NoteId {
    pub fn server_id(&self) -> Option<i64> {
        match self {
            NoteId::Confirmed(id) => Some(*id),
            NoteId::Pending(_) => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, NoteId::Pending(_))
    }
}

impl From<i64> for NoteId {
    fn from(id: i64) -> Self {
        NoteId::Confirmed(id)
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoteId::Pending(token) => write!(f, "pending-{}", token),
            NoteId::Confirmed(id) => write!(f, "{}", id),
        }
    }
}

/// A note as held by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalNote {
    pub id: NoteId,
    pub title: String,
    pub content: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl LocalNote {
    /// Placeholder inserted by an optimistic create.
    pub fn draft(token: u64) -> Self {
        Self {
            id: NoteId::Pending(token),
            title: DRAFT_TITLE.to_string(),
            content: String::new(),
            created_at: None,
            updated_at: None,
        }
    }
}

impl From<Note> for LocalNote {
    fn from(note: Note) -> Self {
        Self {
            id: NoteId::Confirmed(note.id),
            title: note.title,
            content: note.content,
            created_at: note.created_at,
            updated_at: note.updated_at,
        }
    }
}

/// Subset of user-editable fields to merge into a note.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotePatch {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl NotePatch {
    pub fn title(value: impl Into<String>) -> Self {
        Self {
            title: Some(value.into()),
            content: None,
        }
    }

    pub fn content(value: impl Into<String>) -> Self {
        Self {
            title: None,
            content: Some(value.into()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NoteStore {
    notes: Vec<Arc<LocalNote>>,
}

impl NoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the collection in order. Entries are shared, not copied.
    pub fn list(&self) -> Vec<Arc<LocalNote>> {
        self.notes.clone()
    }

    pub fn ids(&self) -> Vec<NoteId> {
        self.notes.iter().map(|n| n.id).collect()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn contains(&self, id: NoteId) -> bool {
        self.position(id).is_some()
    }

    pub fn get(&self, id: NoteId) -> Option<Arc<LocalNote>> {
        self.position(id).map(|pos| Arc::clone(&self.notes[pos]))
    }

    pub fn first_id(&self) -> Option<NoteId> {
        self.notes.first().map(|n| n.id)
    }

    fn position(&self, id: NoteId) -> Option<usize> {
        self.notes.iter().position(|n| n.id == id)
    }

    /// Insert at the head, or overwrite in place if the id is already present.
    pub fn upsert_front(&mut self, note: LocalNote) {
        match self.position(note.id) {
            Some(pos) => self.notes[pos] = Arc::new(note),
            None => self.notes.insert(0, Arc::new(note)),
        }
    }

    /// Swap the entry at `id` for `note`, keeping its position.
    ///
    /// If `note` carries a different id that is already present elsewhere, the
    /// entry at `id` is dropped and the existing one is overwritten instead, so
    /// the collection never holds the same id twice. Returns false if `id` is
    /// absent.
    pub fn replace(&mut self, id: NoteId, note: LocalNote) -> bool {
        let Some(pos) = self.position(id) else {
            return false;
        };

        if note.id != id {
            if let Some(existing) = self.position(note.id) {
                self.notes[existing] = Arc::new(note);
                self.notes.remove(pos);
                return true;
            }
        }

        self.notes[pos] = Arc::new(note);
        true
    }

    pub fn remove_by_id(&mut self, id: NoteId) -> Option<Arc<LocalNote>> {
        self.position(id).map(|pos| self.notes.remove(pos))
    }

    /// Merge a local edit into the note at `id`. Other entries are untouched.
    pub fn update_fields(&mut self, id: NoteId, patch: NotePatch) -> bool {
        let Some(pos) = self.position(id) else {
            return false;
        };

        let note = Arc::make_mut(&mut self.notes[pos]);
        if let Some(title) = patch.title {
            note.title = title;
        }
        if let Some(content) = patch.content {
            note.content = content;
        }
        true
    }

    /// Replace every confirmed note with the server's list.
    ///
    /// Pending notes stay at the head so an in-flight create can still find
    /// its placeholder. Duplicate ids in the server list keep their first
    /// occurrence.
    pub fn replace_all(&mut self, notes: Vec<Note>) {
        let mut next: Vec<Arc<LocalNote>> = self
            .notes
            .iter()
            .filter(|n| n.id.is_pending())
            .cloned()
            .collect();

        let mut seen = HashSet::with_capacity(notes.len());
        for note in notes {
            if !seen.insert(note.id) {
                log::warn!("[SYNC] Dropping duplicate note {} from server list", note.id);
                continue;
            }
            next.push(Arc::new(note.into()));
        }

        self.notes = next;
    }
}
