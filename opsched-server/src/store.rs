//! JSON-file-backed patient store.
//!
//! Records live in a single `patients.json` file that is re-read on every
//! call, so edits made outside the server (or by a second instance) are
//! picked up without restarts. Writes are serialized through a mutex.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use opsched_core::{ExistingPatient, ImportError, ImportResult, NewPatient, PatientStore};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use uuid::Uuid;

/// One stored patient record. Import only ever writes the projected
/// fields; everything else stays at its default until edited elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientRecord {
    pub id: String,
    pub full_name: String,
    pub phone: String,
    pub surgery_date: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: PathBuf) -> Self {
        JsonFileStore {
            path,
            write_lock: Mutex::new(()),
        }
    }

    /// All records, most recently created last. A missing file is an empty
    /// store, not an error.
    pub async fn all(&self) -> ImportResult<Vec<PatientRecord>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => serde_json::from_str(&content)
                .map_err(|e| ImportError::StoreQuery(format!("corrupt patient file: {e}"))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(ImportError::StoreQuery(e.to_string())),
        }
    }

    async fn write_all(&self, records: &[PatientRecord]) -> ImportResult<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ImportError::StoreInsert(e.to_string()))?;
        }
        let content = serde_json::to_string_pretty(records)
            .map_err(|e| ImportError::StoreInsert(e.to_string()))?;
        tokio::fs::write(&self.path, content)
            .await
            .map_err(|e| ImportError::StoreInsert(e.to_string()))
    }
}

#[async_trait]
impl PatientStore for JsonFileStore {
    async fn find_by_dates(&self, dates: &[String]) -> ImportResult<Vec<ExistingPatient>> {
        Ok(self
            .all()
            .await?
            .into_iter()
            .filter(|r| r.surgery_date.as_ref().is_some_and(|d| dates.contains(d)))
            .map(|r| ExistingPatient {
                id: r.id,
                full_name: r.full_name,
                surgery_date: r.surgery_date,
                phone: r.phone,
            })
            .collect())
    }

    async fn insert(&self, patient: NewPatient) -> ImportResult<String> {
        let _guard = self.write_lock.lock().await;

        let mut records = self.all().await.map_err(|e| match e {
            ImportError::StoreQuery(msg) => ImportError::StoreInsert(msg),
            other => other,
        })?;

        let id = Uuid::new_v4().to_string();
        records.push(PatientRecord {
            id: id.clone(),
            full_name: patient.full_name,
            phone: patient.phone,
            surgery_date: Some(patient.surgery_date),
            notes: patient.notes,
            created_at: Utc::now(),
        });

        self.write_all(&records).await?;
        Ok(id)
    }
}
