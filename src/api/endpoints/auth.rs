//! `POST /api/auth/login`: patient ID + password login.
//!
//! 200 with a welcome notice and the patient record on success, 401 with
//! the generic failure notice otherwise, 400 when a field is empty.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::login::{LoginForm, Notice};
use crate::models::Patient;

#[derive(Serialize)]
pub struct LoginResponse {
    pub notice: Notice,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient: Option<Patient>,
}

pub async fn login(
    State(ctx): State<ApiContext>,
    Json(form): Json<LoginForm>,
) -> Result<Response, ApiError> {
    // Reject empty fields before touching storage.
    form.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let patients = ctx.store.get_patients().await?;

    let response = match crate::login::verify(&patients, &form) {
        Ok(patient) => (
            StatusCode::OK,
            Json(LoginResponse {
                notice: Notice::login_success(patient),
                patient: Some(patient.clone()),
            }),
        ),
        Err(_) => (
            StatusCode::UNAUTHORIZED,
            Json(LoginResponse {
                notice: Notice::login_failed(),
                patient: None,
            }),
        ),
    };

    Ok(response.into_response())
}
