//! Remote boundary: the notes REST API.
//!
//! `NotesApi` is the seam the engine talks through; `HttpNotesApi` is the
//! reqwest implementation. Any non-2xx status is a rejection, and anything
//! that prevents reading a well-formed answer is a transport failure.

use async_trait::async_trait;
use notes_sync_types::{Note, NoteInput};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::config::Config;
use crate::error::{Operation, SyncError, SyncResult};

#[async_trait]
pub trait NotesApi: Send + Sync {
    async fn list_notes(&self) -> SyncResult<Vec<Note>>;

    async fn create_note(&self, input: &NoteInput) -> SyncResult<Note>;

    async fn update_note(&self, id: i64, input: &NoteInput) -> SyncResult<Note>;

    async fn delete_note(&self, id: i64) -> SyncResult<()>;
}

pub struct HttpNotesApi {
    config: Config,
    client: reqwest::Client,
}

impl HttpNotesApi {
    pub fn new(config: Config) -> SyncResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| SyncError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    async fn send(&self, op: Operation, request: RequestBuilder) -> SyncResult<Response> {
        let resp = request
            .send()
            .await
            .map_err(|e| SyncError::transport(op, e))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            log::debug!("[SYNC] {} HTTP {}: {}", op, status, body);
            return Err(SyncError::rejected(op, status.as_u16()));
        }

        Ok(resp)
    }

    async fn decode<T: DeserializeOwned>(op: Operation, resp: Response) -> SyncResult<T> {
        let body = resp
            .bytes()
            .await
            .map_err(|e| SyncError::transport(op, e))?;

        serde_json::from_slice(&body)
            .map_err(|e| SyncError::transport(op, format!("invalid response body: {}", e)))
    }
}

#[async_trait]
impl NotesApi for HttpNotesApi {
    async fn list_notes(&self) -> SyncResult<Vec<Note>> {
        let op = Operation::List;
        let resp = self
            .send(op, self.client.get(self.config.notes_url()))
            .await?;
        Self::decode(op, resp).await
    }

    async fn create_note(&self, input: &NoteInput) -> SyncResult<Note> {
        let op = Operation::Create;
        let resp = self
            .send(op, self.client.post(self.config.notes_url()).json(input))
            .await?;
        Self::decode(op, resp).await
    }

    async fn update_note(&self, id: i64, input: &NoteInput) -> SyncResult<Note> {
        let op = Operation::Update;
        let resp = self
            .send(op, self.client.put(self.config.note_url(id)).json(input))
            .await?;
        Self::decode(op, resp).await
    }

    async fn delete_note(&self, id: i64) -> SyncResult<()> {
        self.send(Operation::Delete, self.client.delete(self.config.note_url(id)))
            .await?;
        Ok(())
    }
}
