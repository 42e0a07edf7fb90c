use axum::{extract::State, response::Response};

use crate::auth::CurrentProfile;
use crate::services::tickets;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::success;

pub async fn dashboard(
    State(state): State<AppState>,
    CurrentProfile(profile): CurrentProfile,
) -> Result<Response, AppError> {
    let view = tickets::dashboard(state.store.as_ref(), &profile).await?;
    Ok(success(view, "Dashboard retrieved"))
}
