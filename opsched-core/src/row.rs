//! Candidate appointment rows produced by the expander.

use serde::{Deserialize, Serialize};

/// One dated surgery appointment extracted from the feed.
///
/// Invariant: `full_name` is non-empty and `surgery_date` is a
/// `YYYY-MM-DD` date key on every row the pipeline emits; events that
/// cannot satisfy this are dropped during expansion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportRow {
    /// Stable per-occurrence key: `<uid or name>-<date>-<occurrence index>`.
    /// Used only for intra-file deduplication.
    #[serde(rename = "sourceKey")]
    pub source_key: String,
    pub full_name: String,
    pub surgery_date: String,
    pub phone: Option<String>,
    pub notes: Option<String>,
}

/// An ImportRow annotated against the patient store.
///
/// The `duplicate` flag is recomputed on every preview/commit call and is
/// never persisted; the store may have changed between calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewRow {
    #[serde(flatten)]
    pub row: ImportRow,
    pub duplicate: bool,
}
