//! Data-store seam.
//!
//! Handlers and services only see [`DataStore`]: per-table insert, update,
//! select and delete filtered by equality and ordering predicates, plus the
//! one multi-row write, [`DataStore::purchase_tickets`], which every
//! implementation must perform atomically.

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{
    Credentials, Event, EventInput, EventQuery, EventStatus, EventWithOrganizer, NewProfile,
    Profile, Purchase, PurchaseOrder, TicketWithEvent,
};
use crate::utils::error::AppError;

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait DataStore: Send + Sync {
    /// Fails with `Conflict` when the email is already registered.
    async fn insert_profile(&self, profile: NewProfile) -> Result<Profile, AppError>;

    async fn get_profile(&self, id: Uuid) -> Result<Option<Profile>, AppError>;

    async fn find_credentials(&self, email: &str) -> Result<Option<Credentials>, AppError>;

    async fn insert_event(&self, event: Event) -> Result<Event, AppError>;

    async fn get_event(&self, id: Uuid) -> Result<Option<EventWithOrganizer>, AppError>;

    async fn list_events(&self, query: &EventQuery) -> Result<Vec<EventWithOrganizer>, AppError>;

    /// Applies an organizer edit and returns the event to `Pending`.
    ///
    /// A capacity change shifts `available_tickets` by the same delta in the
    /// same write; it fails with `Conflict` if sold seats would exceed capacity.
    async fn update_event(&self, id: Uuid, input: EventInput) -> Result<Event, AppError>;

    /// Moves the event from `from` to `to`, only if it is still in `from`.
    async fn update_event_status(
        &self,
        id: Uuid,
        from: EventStatus,
        to: EventStatus,
    ) -> Result<Event, AppError>;

    /// Returns `false` when no such event existed.
    async fn delete_event(&self, id: Uuid) -> Result<bool, AppError>;

    /// Reserves `order.quantity` seats on an approved event and records the
    /// ticket in one atomic step. Never leaves `available_tickets` negative.
    async fn purchase_tickets(&self, order: PurchaseOrder) -> Result<Purchase, AppError>;

    async fn list_tickets_by_buyer(&self, email: &str) -> Result<Vec<TicketWithEvent>, AppError>;
}

pub(crate) fn sold_out(event_id: Uuid) -> AppError {
    AppError::conflict(format!(
        "Not enough tickets left for event '{}'",
        event_id
    ))
}
