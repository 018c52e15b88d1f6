//! Calendar feed upload endpoint.

use axum::{
    Json, Router,
    body::Bytes,
    extract::{DefaultBodyLimit, Query, State},
    http::{HeaderMap, header},
    response::{IntoResponse, Response},
    routing::post,
};
use serde::Deserialize;

use opsched_core::constants::MAX_UPLOAD_BYTES;
use opsched_core::import::{commit, preview};

use crate::routes::{AppError, require_auth};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/import/ics", post(import_ics))
        // axum's default 2 MB cap is below our own ceiling; raise it so the
        // oversize rejection below is ours, not a bare 413
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + 1024))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportParams {
    #[serde(default)]
    pub mode: ImportMode,
    #[serde(default = "default_true")]
    pub skip_duplicates: bool,
    /// Original upload filename, for the extension check when the client
    /// sends a generic content type.
    pub filename: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportMode {
    #[default]
    Preview,
    Import,
}

fn default_true() -> bool {
    true
}

/// POST /import/ics?mode=preview|import&skipDuplicates=bool&filename=...
///
/// Body is the raw feed text. Preview returns annotated rows and totals
/// without touching the store; import re-runs the same pipeline and
/// inserts non-duplicate rows best-effort.
async fn import_ics(
    State(state): State<AppState>,
    Query(params): Query<ImportParams>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    require_auth(&state, &headers)?;

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());
    validate_upload(body.len(), content_type, params.filename.as_deref())?;

    let text = std::str::from_utf8(&body)
        .map_err(|_| AppError::BadRequest("File is not valid UTF-8 text.".into()))?;

    let store = state.store.as_ref();
    match params.mode {
        ImportMode::Preview => {
            let result = preview(store, text).await?;
            Ok(Json(serde_json::json!({
                "mode": "preview",
                "totals": result.totals,
                "rows": result.rows,
            }))
            .into_response())
        }
        ImportMode::Import => {
            let summary = commit(store, text, params.skip_duplicates).await?;
            Ok(Json(serde_json::json!({
                "mode": "import",
                "totals": summary.totals,
            }))
            .into_response())
        }
    }
}

/// Reject empty, oversize, and non-calendar uploads before any parsing.
fn validate_upload(
    size: usize,
    content_type: Option<&str>,
    filename: Option<&str>,
) -> Result<(), AppError> {
    if size == 0 {
        return Err(AppError::BadRequest("Please upload an .ics file.".into()));
    }
    if size > MAX_UPLOAD_BYTES {
        return Err(AppError::BadRequest("File too large. Max size is 5MB.".into()));
    }
    if !is_ics_upload(content_type, filename) {
        return Err(AppError::BadRequest(
            "Only .ics/.ical files are supported.".into(),
        ));
    }
    Ok(())
}

/// Whether the upload declares itself a calendar feed, by content type or
/// filename extension.
fn is_ics_upload(content_type: Option<&str>, filename: Option<&str>) -> bool {
    if content_type.is_some_and(|ct| ct.split(';').next().is_some_and(|m| m.trim() == "text/calendar")) {
        return true;
    }
    filename.is_some_and(|name| {
        let lower = name.to_lowercase();
        lower.ends_with(".ics") || lower.ends_with(".ical")
    })
}
