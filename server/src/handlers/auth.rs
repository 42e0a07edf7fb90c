use axum::{extract::State, response::Response};

use crate::auth::{BearerToken, CurrentProfile};
use crate::models::{LoginRequest, RegisterRequest};
use crate::services::accounts;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::extract::AppJson;
use crate::utils::response::{created, empty_success, success};

pub async fn register(
    State(state): State<AppState>,
    AppJson(request): AppJson<RegisterRequest>,
) -> Result<Response, AppError> {
    let session = accounts::register(state.store.as_ref(), &state.sessions, request).await?;
    Ok(created(session, "Account created"))
}

pub async fn login(
    State(state): State<AppState>,
    AppJson(request): AppJson<LoginRequest>,
) -> Result<Response, AppError> {
    let session = accounts::login(state.store.as_ref(), &state.sessions, request).await?;
    Ok(success(session, "Signed in"))
}

pub async fn logout(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<Response, AppError> {
    accounts::logout(&state.sessions, &token).await;
    Ok(empty_success("Signed out"))
}

pub async fn me(CurrentProfile(profile): CurrentProfile) -> Response {
    success(profile, "Current profile")
}
