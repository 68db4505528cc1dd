//! Notes Sync — loads the note collection once and prints it.
//!
//! Useful for checking that a notes API is reachable and speaks the expected
//! JSON. Configured through the environment (see `config::env_vars`).
//!
//! Default: http://localhost:8080/api

use notes_sync::{Config, HttpNotesApi, SyncEngine};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    log::info!("Fetching notes from {}", config.notes_url());

    let api = match HttpNotesApi::new(config) {
        Ok(api) => api,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    let engine = SyncEngine::new(api);
    if !engine.refresh().await {
        log::error!("{}", engine.last_error().unwrap_or_default());
        std::process::exit(1);
    }

    let snapshot = engine.snapshot();
    for note in &snapshot.notes {
        let marker = if Some(note.id) == snapshot.selected { "*" } else { " " };
        let updated = note
            .updated_at
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| "-".to_string());
        println!("{} {:>6}  {:<25}  {}", marker, note.id.to_string(), updated, note.title);
    }
    log::info!("{} notes", snapshot.notes.len());
}
