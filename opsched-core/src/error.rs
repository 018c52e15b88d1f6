//! Error types for the import pipeline.

use thiserror::Error;

/// Errors that can occur while importing a calendar feed.
#[derive(Error, Debug)]
pub enum ImportError {
    /// The feed text is not valid iCalendar at the top level. Fatal for the
    /// whole request; the message is safe to show to the caller.
    #[error("Feed parse error: {0}")]
    FeedParse(String),

    /// The patient store could not be queried during duplicate lookup.
    /// Fatal: treating it as "no existing records" would silently import
    /// real duplicates.
    #[error("Store query error: {0}")]
    StoreQuery(String),

    /// The patient store rejected a single row insert. Recovered per-row
    /// during commit; only surfaces as a `skipped` count.
    #[error("Store insert error: {0}")]
    StoreInsert(String),
}

/// Result type alias for import operations.
pub type ImportResult<T> = Result<T, ImportError>;
