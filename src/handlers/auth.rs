// src/handlers/auth.rs

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use crate::{
    error::AppError,
    models::user::{LoginForm, RegisterRequest, VerifyStudentRequest},
    services::auth,
    state::AppState,
    utils::extract::{AppForm, AppJson},
};

/// Authenticates a user and returns a bearer token.
///
/// Takes a form-encoded body; `username` carries the email address.
pub async fn login(
    State(state): State<AppState>,
    AppForm(form): AppForm<LoginForm>,
) -> Result<impl IntoResponse, AppError> {
    let response = auth::login(
        state.users.as_ref(),
        &state.tokens,
        &form.username,
        &form.password,
    )
    .await?;

    Ok(Json(response))
}

/// Registers a new account and signs the caller in.
///
/// Returns 201 Created with the token and the user (without password).
pub async fn register(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let response = auth::register(state.users.as_ref(), &state.tokens, payload).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn verify_student(
    State(state): State<AppState>,
    AppJson(payload): AppJson<VerifyStudentRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth::verify_student(
        state.users.as_ref(),
        &state.config.verification_code,
        &payload.email,
        &payload.code,
    )
    .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Student account verified successfully"
    })))
}
