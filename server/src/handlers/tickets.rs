use axum::{extract::State, response::Response};
use uuid::Uuid;

use crate::models::PurchaseRequest;
use crate::services::tickets;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::extract::{AppJson, AppPath};
use crate::utils::response::created;

pub async fn purchase_tickets(
    State(state): State<AppState>,
    AppPath(event_id): AppPath<Uuid>,
    AppJson(request): AppJson<PurchaseRequest>,
) -> Result<Response, AppError> {
    let purchase = tickets::purchase_tickets(state.store.as_ref(), event_id, request).await?;
    Ok(created(purchase, "Tickets purchased"))
}
