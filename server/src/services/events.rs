//! Event authoring, catalogue reads and moderation.

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use crate::models::{
    AdminFilter, CatalogueFilter, Event, EventInput, EventOrder, EventQuery, EventStats,
    EventStatus, EventWithOrganizer, Profile,
};
use crate::services::validation::validate_event;
use crate::store::DataStore;
use crate::utils::error::AppError;

fn event_not_found(id: Uuid) -> AppError {
    AppError::not_found(format!("Event with id '{}' was not found", id))
}

pub async fn create_event(
    store: &dyn DataStore,
    organizer: &Profile,
    input: EventInput,
    today: NaiveDate,
) -> Result<Event, AppError> {
    let input = input.normalized();
    validate_event(&input, today)?;

    let event = store.insert_event(Event::new(input, organizer.id)).await?;
    tracing::info!(
        event_id = %event.id,
        organizer_id = %organizer.id,
        max_tickets = event.max_tickets,
        "Event submitted for moderation"
    );
    Ok(event)
}

/// Organizer edit of an owned event; the event goes back to `Pending`.
pub async fn update_event(
    store: &dyn DataStore,
    organizer: &Profile,
    id: Uuid,
    input: EventInput,
    today: NaiveDate,
) -> Result<Event, AppError> {
    let input = input.normalized();
    validate_event(&input, today)?;

    let current = store
        .get_event(id)
        .await?
        .ok_or_else(|| event_not_found(id))?
        .event;
    if !current.is_owned_by(organizer.id) {
        return Err(AppError::forbidden("Only the organizer can edit this event"));
    }
    current.resized_inventory(input.max_tickets)?;

    let event = store.update_event(id, input).await?;
    tracing::info!(event_id = %id, previous_status = current.status.as_str(), "Event edited, back to pending");
    Ok(event)
}

/// Removes an event and its tickets. Owners and admins only.
pub async fn delete_event(store: &dyn DataStore, actor: &Profile, id: Uuid) -> Result<(), AppError> {
    let event = store
        .get_event(id)
        .await?
        .ok_or_else(|| event_not_found(id))?
        .event;
    if !event.is_owned_by(actor.id) && !actor.is_admin() {
        return Err(AppError::forbidden("Only the organizer or an admin can delete this event"));
    }

    if !store.delete_event(id).await? {
        return Err(event_not_found(id));
    }
    tracing::info!(event_id = %id, sold = event.sold_tickets(), "Event deleted");
    Ok(())
}

/// Approved events from `today` on, soonest first.
pub async fn list_catalogue(
    store: &dyn DataStore,
    filter: &CatalogueFilter,
    today: NaiveDate,
) -> Result<Vec<EventWithOrganizer>, AppError> {
    let query = EventQuery {
        status: Some(EventStatus::Approved),
        from_date: Some(today),
        order: EventOrder::DateAsc,
        ..Default::default()
    };
    let events = store.list_events(&query).await?;
    Ok(events
        .into_iter()
        .filter(|e| filter.matches(&e.event))
        .collect())
}

/// A single event as the public sees it; anything not approved is hidden.
pub async fn get_public_event(
    store: &dyn DataStore,
    id: Uuid,
) -> Result<EventWithOrganizer, AppError> {
    store
        .get_event(id)
        .await?
        .filter(|e| e.event.status == EventStatus::Approved)
        .ok_or_else(|| event_not_found(id))
}

/// Applies an admin decision to a pending event.
pub async fn moderate_event(
    store: &dyn DataStore,
    moderator: &Profile,
    id: Uuid,
    decision: EventStatus,
) -> Result<Event, AppError> {
    if !moderator.is_admin() {
        return Err(AppError::forbidden("Admin role required"));
    }
    if decision == EventStatus::Pending {
        return Err(AppError::validation(
            "A moderation decision must be 'approved' or 'rejected'",
        ));
    }

    let current = store
        .get_event(id)
        .await?
        .ok_or_else(|| event_not_found(id))?
        .event;
    current.status.transition(decision)?;

    let event = store
        .update_event_status(id, current.status, decision)
        .await?;
    tracing::info!(
        event_id = %id,
        moderator_id = %moderator.id,
        status = decision.as_str(),
        "Event moderated"
    );
    Ok(event)
}

#[derive(Debug, Serialize)]
pub struct AdminOverview {
    pub events: Vec<EventWithOrganizer>,
    pub stats: EventStats,
}

/// Every event, newest first, with per-status counts over the whole table.
pub async fn admin_overview(
    store: &dyn DataStore,
    filter: &AdminFilter,
) -> Result<AdminOverview, AppError> {
    let all = store.list_events(&EventQuery::default()).await?;
    let stats = EventStats::tally(all.iter().map(|e| &e.event));
    let events = all
        .into_iter()
        .filter(|e| filter.status.map_or(true, |s| e.event.status == s))
        .collect();
    Ok(AdminOverview { events, stats })
}

pub async fn event_stats(store: &dyn DataStore) -> Result<EventStats, AppError> {
    let all = store.list_events(&EventQuery::default()).await?;
    Ok(EventStats::tally(all.iter().map(|e| &e.event)))
}
