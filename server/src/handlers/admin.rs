use axum::{extract::State, response::Response};
use uuid::Uuid;

use crate::auth::RequireAdmin;
use crate::models::{AdminFilter, ModerationRequest};
use crate::services::events;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::extract::{AppJson, AppPath, AppQuery};
use crate::utils::response::success;

pub async fn list_events(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    AppQuery(filter): AppQuery<AdminFilter>,
) -> Result<Response, AppError> {
    let overview = events::admin_overview(state.store.as_ref(), &filter).await?;
    Ok(success(overview, "Events retrieved"))
}

pub async fn stats(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Response, AppError> {
    let stats = events::event_stats(state.store.as_ref()).await?;
    Ok(success(stats, "Event statistics"))
}

pub async fn moderate_event(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    AppPath(event_id): AppPath<Uuid>,
    AppJson(request): AppJson<ModerationRequest>,
) -> Result<Response, AppError> {
    let event =
        events::moderate_event(state.store.as_ref(), &admin, event_id, request.status).await?;
    let message = format!("Event {}", event.status.as_str());
    Ok(success(event, message))
}
