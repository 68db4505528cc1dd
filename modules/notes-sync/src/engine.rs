//! SyncEngine — keeps the local note collection consistent with the server.
//!
//! One engine per session. Intents take `&self`, so any number of them can be
//! in flight at once on a single task. All shared state sits behind one mutex
//! that is only locked inside synchronous sections (`with_state`), never
//! across an await, so no mutation is ever observed half-applied and every
//! completion re-reads the latest state before reconciling.
//!
//! Recovery differs per intent:
//!   - refresh: on failure the stale local view stands.
//!   - create:  optimistic insert; on failure the placeholder is removed and
//!     the whole collection is re-fetched.
//!   - save:    local edits are never rolled back; the newest save for a note
//!     that is still in flight (or already applied) wins, older responses
//!     arriving later are discarded.
//!   - delete:  not optimistic; the note stays until the server confirms.
//!
//! Errors never escape: each failure overwrites the single error slot, and any
//! success clears it.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use notes_sync_types::NoteInput;
use parking_lot::Mutex;

use crate::client::NotesApi;
use crate::error::{Operation, SyncError};
use crate::reporter::{Busy, ErrorReporter};
use crate::selection::SelectionManager;
use crate::store::{LocalNote, NoteId, NotePatch, NoteStore};

#[derive(Debug, Default)]
struct Session {
    store: NoteStore,
    selection: SelectionManager,
    reporter: ErrorReporter,
    /// Last handed-out pending token.
    next_token: u64,
    /// Last handed-out save sequence number.
    next_save_seq: u64,
    /// Save bookkeeping per server id, only while saves for it are in flight.
    saves: HashMap<i64, SaveTrack>,
}

#[derive(Debug, Default)]
struct SaveTrack {
    /// Sequence numbers of saves still in flight.
    live: BTreeSet<u64>,
    /// Highest sequence number whose response was applied.
    applied: u64,
}

impl Session {
    /// A save response is current if nothing newer for the same note is still
    /// in flight or already applied. A missing track means the note was deleted.
    fn save_is_current(&self, server_id: i64, seq: u64) -> bool {
        match self.saves.get(&server_id) {
            Some(track) => seq > track.applied && track.live.range(seq + 1..).next().is_none(),
            None => false,
        }
    }

    fn release_save(&mut self, server_id: i64, seq: u64) {
        if let Some(track) = self.saves.get_mut(&server_id) {
            track.live.remove(&seq);
            if track.live.is_empty() {
                self.saves.remove(&server_id);
            }
        }
    }
}

/// Point-in-time copy of everything a view needs.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub notes: Vec<Arc<LocalNote>>,
    pub selected: Option<NoteId>,
    pub error: Option<String>,
    pub listing: bool,
    pub saving: bool,
    pub deleting: bool,
}

/// Holds a busy flag for as long as it lives.
struct BusyGuard<'a> {
    state: &'a Mutex<Session>,
    kind: Busy,
}

impl<'a> BusyGuard<'a> {
    fn begin(state: &'a Mutex<Session>, kind: Busy) -> Self {
        state.lock().reporter.begin(kind);
        Self { state, kind }
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.state.lock().reporter.end(self.kind);
    }
}

/// Registers an in-flight save and forgets it when dropped, settled or not.
struct SaveTicket<'a> {
    state: &'a Mutex<Session>,
    server_id: i64,
    seq: u64,
}

impl<'a> SaveTicket<'a> {
    fn issue(state: &'a Mutex<Session>, server_id: i64) -> Self {
        let mut s = state.lock();
        s.next_save_seq += 1;
        let seq = s.next_save_seq;
        s.saves.entry(server_id).or_default().live.insert(seq);
        Self {
            state,
            server_id,
            seq,
        }
    }
}

impl Drop for SaveTicket<'_> {
    fn drop(&mut self) {
        self.state.lock().release_save(self.server_id, self.seq);
    }
}

pub struct SyncEngine<A> {
    api: A,
    state: Mutex<Session>,
}

impl<A: NotesApi> SyncEngine<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            state: Mutex::new(Session::default()),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut Session) -> R) -> R {
        f(&mut self.state.lock())
    }

    fn fail(&self, err: SyncError) {
        log::warn!("[SYNC] {}", err);
        self.with_state(|s| s.reporter.report(err.to_string()));
    }

    // ── Queries ─────────────────────────────────────

    pub fn notes(&self) -> Vec<Arc<LocalNote>> {
        self.with_state(|s| s.store.list())
    }

    pub fn note(&self, id: NoteId) -> Option<Arc<LocalNote>> {
        self.with_state(|s| s.store.get(id))
    }

    pub fn selected(&self) -> Option<NoteId> {
        self.with_state(|s| s.selection.current())
    }

    pub fn selected_note(&self) -> Option<Arc<LocalNote>> {
        self.with_state(|s| s.selection.current().and_then(|id| s.store.get(id)))
    }

    pub fn last_error(&self) -> Option<String> {
        self.with_state(|s| s.reporter.last_error().map(str::to_string))
    }

    pub fn is_busy(&self, kind: Busy) -> bool {
        self.with_state(|s| s.reporter.is_busy(kind))
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.with_state(|s| SessionSnapshot {
            notes: s.store.list(),
            selected: s.selection.current(),
            error: s.reporter.last_error().map(str::to_string),
            listing: s.reporter.is_busy(Busy::Listing),
            saving: s.reporter.is_busy(Busy::Saving),
            deleting: s.reporter.is_busy(Busy::Deleting),
        })
    }

    // ── Local intents ───────────────────────────────

    /// Make `id` the active note. Ignored if the note is not in the collection.
    pub fn select(&self, id: NoteId) -> bool {
        self.with_state(|s| {
            if !s.store.contains(id) {
                return false;
            }
            s.selection.select(id);
            true
        })
    }

    pub fn edit_title(&self, id: NoteId, value: impl Into<String>) -> bool {
        self.with_state(|s| s.store.update_fields(id, NotePatch::title(value)))
    }

    pub fn edit_content(&self, id: NoteId, value: impl Into<String>) -> bool {
        self.with_state(|s| s.store.update_fields(id, NotePatch::content(value)))
    }

    // ── Remote intents ──────────────────────────────

    /// Replace the local collection with the server's. Returns false on failure.
    pub async fn refresh(&self) -> bool {
        let _busy = BusyGuard::begin(&self.state, Busy::Listing);
        log::debug!("[SYNC] Listing notes");

        match self.api.list_notes().await {
            Ok(notes) => {
                let count = notes.len();
                self.with_state(|s| {
                    s.store.replace_all(notes);
                    s.selection.reconcile_with(&s.store.ids());
                    s.reporter.clear();
                });
                log::info!("[SYNC] Loaded {} notes", count);
                true
            }
            Err(e) => {
                self.fail(e);
                false
            }
        }
    }

    /// Insert and select a draft immediately, then confirm it with the server.
    ///
    /// Returns the confirmed id, or `None` if the create was rolled back.
    pub async fn create(&self) -> Option<NoteId> {
        let _busy = BusyGuard::begin(&self.state, Busy::Saving);

        let (pending, input) = self.with_state(|s| {
            s.next_token += 1;
            let draft = LocalNote::draft(s.next_token);
            let id = draft.id;
            let input = NoteInput::new(draft.title.clone(), draft.content.clone());
            s.store.upsert_front(draft);
            s.selection.select(id);
            (id, input)
        });
        log::debug!("[SYNC] Creating note {}", pending);

        match self.api.create_note(&input).await {
            Ok(note) => {
                let confirmed = NoteId::Confirmed(note.id);
                self.with_state(|s| {
                    let mut local = LocalNote::from(note);
                    // Fields the user edited while the call was in flight win
                    // over the server's; untouched fields take the server's.
                    if let Some(draft) = s.store.get(pending) {
                        if draft.title != input.title {
                            local.title = draft.title.clone();
                        }
                        if draft.content != input.content {
                            local.content = draft.content.clone();
                        }
                    }
                    if s.store.replace(pending, local) {
                        s.selection.reconcile_after_replace(pending, confirmed);
                    }
                    s.reporter.clear();
                });
                log::info!("[SYNC] Created note {} (was {})", confirmed, pending);
                Some(confirmed)
            }
            Err(e) => {
                log::warn!("[SYNC] Rolling back note {}", pending);
                self.with_state(|s| {
                    s.store.remove_by_id(pending);
                    s.selection.reconcile_after_removal(pending, &s.store.ids());
                });
                self.refresh().await;
                self.fail(e);
                None
            }
        }
    }

    /// Push `title`/`content` for `id` and adopt the server's answer.
    ///
    /// Local edits are kept on failure. A response is discarded if a newer save
    /// for the same note is still in flight or was already applied.
    pub async fn save(
        &self,
        id: NoteId,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> bool {
        let Some(server_id) = id.server_id() else {
            self.fail(SyncError::Unconfirmed { op: Operation::Update });
            return false;
        };

        let _busy = BusyGuard::begin(&self.state, Busy::Saving);
        let input = NoteInput::new(title, content);
        let ticket = SaveTicket::issue(&self.state, server_id);
        let seq = ticket.seq;
        log::debug!("[SYNC] Saving note {} (#{})", id, seq);

        match self.api.update_note(server_id, &input).await {
            Ok(note) => {
                let is_current = self.with_state(|s| {
                    let is_current = s.save_is_current(server_id, seq);
                    if is_current {
                        if let Some(track) = s.saves.get_mut(&server_id) {
                            track.applied = seq;
                        }
                        s.store.replace(id, note.into());
                    }
                    s.reporter.clear();
                    is_current
                });
                if is_current {
                    log::info!("[SYNC] Saved note {}", id);
                } else {
                    log::debug!("[SYNC] Discarding superseded save #{} for note {}", seq, id);
                }
                true
            }
            Err(e) => {
                self.fail(e);
                false
            }
        }
    }

    /// Delete `id` on the server, then locally. Nothing changes locally on failure.
    pub async fn delete(&self, id: NoteId) -> bool {
        let Some(server_id) = id.server_id() else {
            self.fail(SyncError::Unconfirmed { op: Operation::Delete });
            return false;
        };

        let _busy = BusyGuard::begin(&self.state, Busy::Deleting);
        log::debug!("[SYNC] Deleting note {}", id);

        match self.api.delete_note(server_id).await {
            Ok(()) => {
                self.with_state(|s| {
                    s.store.remove_by_id(id);
                    s.selection.reconcile_after_removal(id, &s.store.ids());
                    s.saves.remove(&server_id);
                    s.reporter.clear();
                });
                log::info!("[SYNC] Deleted note {}", id);
                true
            }
            Err(e) => {
                self.fail(e);
                false
            }
        }
    }
}
