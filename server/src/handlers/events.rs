use axum::{extract::State, response::Response};
use uuid::Uuid;

use super::today;
use crate::auth::CurrentProfile;
use crate::models::{CatalogueFilter, EventInput};
use crate::services::events;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::extract::{AppJson, AppPath, AppQuery};
use crate::utils::response::{created, empty_success, success};

pub async fn list_events(
    State(state): State<AppState>,
    AppQuery(filter): AppQuery<CatalogueFilter>,
) -> Result<Response, AppError> {
    let events = events::list_catalogue(state.store.as_ref(), &filter, today()).await?;
    Ok(success(events, "Events retrieved"))
}

pub async fn get_event(
    State(state): State<AppState>,
    AppPath(event_id): AppPath<Uuid>,
) -> Result<Response, AppError> {
    let event = events::get_public_event(state.store.as_ref(), event_id).await?;
    Ok(success(event, "Event retrieved"))
}

pub async fn create_event(
    State(state): State<AppState>,
    CurrentProfile(profile): CurrentProfile,
    AppJson(input): AppJson<EventInput>,
) -> Result<Response, AppError> {
    let event = events::create_event(state.store.as_ref(), &profile, input, today()).await?;
    Ok(created(
        event,
        "Event created. It will be visible once approved.",
    ))
}

pub async fn update_event(
    State(state): State<AppState>,
    CurrentProfile(profile): CurrentProfile,
    AppPath(event_id): AppPath<Uuid>,
    AppJson(input): AppJson<EventInput>,
) -> Result<Response, AppError> {
    let event =
        events::update_event(state.store.as_ref(), &profile, event_id, input, today()).await?;
    Ok(success(event, "Event updated and resubmitted for approval"))
}

pub async fn delete_event(
    State(state): State<AppState>,
    CurrentProfile(profile): CurrentProfile,
    AppPath(event_id): AppPath<Uuid>,
) -> Result<Response, AppError> {
    events::delete_event(state.store.as_ref(), &profile, event_id).await?;
    Ok(empty_success("Event deleted"))
}
