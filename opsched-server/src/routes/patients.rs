//! Patient record endpoints.

use axum::{
    Json, Router,
    extract::State,
    http::HeaderMap,
    routing::get,
};

use crate::routes::{AppError, require_auth};
use crate::state::AppState;
use crate::store::PatientRecord;

pub fn router() -> Router<AppState> {
    Router::new().route("/patients", get(list_patients))
}

/// GET /patients - All stored patient records
async fn list_patients(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<PatientRecord>>, AppError> {
    require_auth(&state, &headers)?;
    let patients = state.store.all().await?;
    Ok(Json(patients))
}
