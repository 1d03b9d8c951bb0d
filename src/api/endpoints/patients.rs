//! Patient collection endpoints.
//!
//! - `GET /api/patients`: every patient, backfilled
//! - `PUT /api/patients`: replace the whole collection

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::models::Patient;

pub async fn list(State(ctx): State<ApiContext>) -> Result<Json<Vec<Patient>>, ApiError> {
    Ok(Json(ctx.store.get_patients().await?))
}

pub async fn replace(
    State(ctx): State<ApiContext>,
    Json(patients): Json<Vec<Patient>>,
) -> Result<StatusCode, ApiError> {
    ctx.store.save_patients(patients).await?;
    Ok(StatusCode::NO_CONTENT)
}
