//! Axum extractors for authenticated requests.
//!
//! - [`BearerToken`]: raw token from `Authorization: Bearer <token>`
//! - [`CurrentProfile`]: the profile behind a live session
//! - [`RequireAdmin`]: same, refused unless the profile is an admin

use axum::{async_trait, extract::FromRequestParts, http::header, http::request::Parts};

use crate::models::Profile;
use crate::state::AppState;
use crate::utils::error::AppError;

#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Missing authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .ok_or_else(|| {
                AppError::unauthorized("Invalid authorization format. Expected 'Bearer <token>'")
            })?;

        if token.is_empty() {
            return Err(AppError::unauthorized("Empty bearer token"));
        }

        Ok(Self(token.to_string()))
    }
}

/// The signed-in profile, re-read from the store on every request.
#[derive(Debug, Clone)]
pub struct CurrentProfile(pub Profile);

#[async_trait]
impl FromRequestParts<AppState> for CurrentProfile {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let BearerToken(token) = BearerToken::from_request_parts(parts, state).await?;

        let session = state
            .sessions
            .get_session(&token)
            .await
            .ok_or_else(|| AppError::unauthorized("Session is invalid or has expired"))?;

        let profile = state
            .store
            .get_profile(session.profile_id)
            .await?
            .ok_or_else(|| AppError::unauthorized("Profile no longer exists"))?;

        Ok(Self(profile))
    }
}

#[derive(Debug, Clone)]
pub struct RequireAdmin(pub Profile);

#[async_trait]
impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentProfile(profile) = CurrentProfile::from_request_parts(parts, state).await?;
        if !profile.is_admin() {
            tracing::warn!(profile_id = %profile.id, "Non-admin attempted an admin action");
            return Err(AppError::forbidden("Admin role required"));
        }
        Ok(Self(profile))
    }
}
