//! Patient store collaborator contract.
//!
//! The pipeline only ever sees these two narrow projections of a patient
//! record; whatever else the store keeps per patient is invisible here.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ImportResult;

/// Read-only projection of a stored patient record, as returned by
/// `find_by_dates` for duplicate matching.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExistingPatient {
    pub id: String,
    pub full_name: String,
    pub surgery_date: Option<String>,
    pub phone: String,
}

/// Fields written when committing one import row. Store fields not listed
/// here default to absent/false on insert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPatient {
    pub full_name: String,
    pub phone: String,
    pub surgery_date: String,
    pub notes: Option<String>,
}

/// External patient record store.
///
/// `find_by_dates` failures are fatal for the whole request: pretending
/// the store is empty would let real duplicates through. `insert` failures
/// are per-row and recovered by the commit loop.
#[async_trait]
pub trait PatientStore: Send + Sync {
    /// Existing records whose surgery date is in the given set.
    async fn find_by_dates(&self, dates: &[String]) -> ImportResult<Vec<ExistingPatient>>;

    /// Insert a new patient record, returning its id.
    async fn insert(&self, patient: NewPatient) -> ImportResult<String>;
}
