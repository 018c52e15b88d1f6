use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::store::JsonFileStore;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<JsonFileStore>,
    /// Static bearer token every request must present.
    pub api_token: String,
}

impl AppState {
    /// Build state from the environment:
    /// - `OPSCHED_API_TOKEN` (required): caller authentication
    /// - `OPSCHED_DATA_FILE` (optional): patient store path, defaults to
    ///   `<data dir>/opsched/patients.json`
    pub fn from_env() -> Result<Self> {
        let api_token = std::env::var("OPSCHED_API_TOKEN")
            .context("OPSCHED_API_TOKEN must be set (callers authenticate with it)")?;

        let data_file = match std::env::var_os("OPSCHED_DATA_FILE") {
            Some(path) => PathBuf::from(path),
            None => dirs::data_dir()
                .context("Could not determine platform data directory")?
                .join("opsched")
                .join("patients.json"),
        };

        Ok(AppState {
            store: Arc::new(JsonFileStore::new(data_file)),
            api_token,
        })
    }
}
