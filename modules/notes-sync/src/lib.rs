//! Notes sync — client-side reconciliation of a remote note collection.
//!
//! Keeps an in-memory reflection of the server's notes consistent across
//! asynchronous create/update/delete calls:
//! - `store`: the ordered collection and its mutation primitives
//! - `selection`: the active note and how it follows collection changes
//! - `reporter`: the last error message and per-operation busy flags
//! - `engine`: the intents a UI issues, and their reconciliation
//! - `client`: the remote boundary (`NotesApi`) and its HTTP implementation

pub mod client;
pub mod config;
pub mod engine;
pub mod error;
pub mod reporter;
pub mod selection;
pub mod store;

pub use client::{HttpNotesApi, NotesApi};
pub use config::Config;
pub use engine::{SessionSnapshot, SyncEngine};
pub use error::{Operation, SyncError, SyncResult};
pub use reporter::Busy;
pub use store::{LocalNote, NoteId};
