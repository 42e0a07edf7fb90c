use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{sold_out, DataStore};
use crate::models::{
    Credentials, Event, EventInput, EventOrder, EventQuery, EventStatus, EventWithOrganizer,
    NewProfile, Profile, Purchase, PurchaseOrder, Ticket, TicketWithEvent,
};
use crate::utils::error::AppError;

#[derive(Default)]
struct Tables {
    profiles: HashMap<Uuid, Profile>,
    credentials: HashMap<Uuid, Credentials>,
    events: HashMap<Uuid, Event>,
    tickets: Vec<Ticket>,
}

impl Tables {
    fn with_organizer(&self, event: &Event) -> Option<EventWithOrganizer> {
        let organizer = self.profiles.get(&event.organizer_id)?;
        Some(EventWithOrganizer {
            event: event.clone(),
            organizer_name: organizer.full_name.clone(),
            organizer_email: organizer.email.clone(),
        })
    }
}

/// In-process store. One lock guards every table, so multi-row writes are atomic.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DataStore for MemoryStore {
    async fn insert_profile(&self, profile: NewProfile) -> Result<Profile, AppError> {
        let mut tables = self.tables.write().await;
        if tables.profiles.values().any(|p| p.email == profile.email) {
            return Err(AppError::conflict("An account with this email already exists"));
        }

        let now = Utc::now();
        let row = Profile {
            id: Uuid::new_v4(),
            email: profile.email,
            full_name: profile.full_name,
            role: profile.role,
            created_at: now,
            updated_at: now,
        };
        tables.credentials.insert(
            row.id,
            Credentials {
                profile_id: row.id,
                password_hash: profile.password_hash,
                password_salt: profile.password_salt,
            },
        );
        tables.profiles.insert(row.id, row.clone());
        Ok(row)
    }

    async fn get_profile(&self, id: Uuid) -> Result<Option<Profile>, AppError> {
        Ok(self.tables.read().await.profiles.get(&id).cloned())
    }

    async fn find_credentials(&self, email: &str) -> Result<Option<Credentials>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .profiles
            .values()
            .find(|p| p.email == email)
            .and_then(|p| tables.credentials.get(&p.id))
            .cloned())
    }

    async fn insert_event(&self, event: Event) -> Result<Event, AppError> {
        let mut tables = self.tables.write().await;
        if !tables.profiles.contains_key(&event.organizer_id) {
            return Err(AppError::validation("Unknown organizer"));
        }
        tables.events.insert(event.id, event.clone());
        Ok(event)
    }

    async fn get_event(&self, id: Uuid) -> Result<Option<EventWithOrganizer>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .events
            .get(&id)
            .and_then(|event| tables.with_organizer(event)))
    }

    async fn list_events(&self, query: &EventQuery) -> Result<Vec<EventWithOrganizer>, AppError> {
        let tables = self.tables.read().await;
        let mut events: Vec<EventWithOrganizer> = tables
            .events
            .values()
            .filter(|event| query.matches(event))
            .filter_map(|event| tables.with_organizer(event))
            .collect();

        match query.order {
            EventOrder::CreatedDesc => {
                events.sort_by(|a, b| b.event.created_at.cmp(&a.event.created_at))
            }
            EventOrder::DateAsc => events.sort_by(|a, b| {
                (a.event.date, a.event.time).cmp(&(b.event.date, b.event.time))
            }),
        }
        Ok(events)
    }

    async fn update_event(&self, id: Uuid, input: EventInput) -> Result<Event, AppError> {
        let mut tables = self.tables.write().await;
        let event = tables
            .events
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Event with id '{}' was not found", id)))?;

        let available_tickets = event.resized_inventory(input.max_tickets)?;
        event.title = input.title;
        event.description = input.description;
        event.location = input.location;
        event.date = input.date;
        event.time = input.time;
        event.price = input.price;
        event.max_tickets = input.max_tickets;
        event.available_tickets = available_tickets;
        event.image_url = input.image_url;
        event.status = EventStatus::Pending;
        event.updated_at = Utc::now();
        Ok(event.clone())
    }

    async fn update_event_status(
        &self,
        id: Uuid,
        from: EventStatus,
        to: EventStatus,
    ) -> Result<Event, AppError> {
        let mut tables = self.tables.write().await;
        let event = tables
            .events
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Event with id '{}' was not found", id)))?;

        if event.status != from {
            return Err(AppError::conflict(format!(
                "Event is '{}', expected '{}'",
                event.status.as_str(),
                from.as_str()
            )));
        }
        event.status = to;
        event.updated_at = Utc::now();
        Ok(event.clone())
    }

    async fn delete_event(&self, id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        let existed = tables.events.remove(&id).is_some();
        if existed {
            tables.tickets.retain(|ticket| ticket.event_id != id);
        }
        Ok(existed)
    }

    async fn purchase_tickets(&self, order: PurchaseOrder) -> Result<Purchase, AppError> {
        let mut tables = self.tables.write().await;
        let event_id = order.event_id;
        let event = tables
            .events
            .get_mut(&event_id)
            .filter(|event| event.status == EventStatus::Approved)
            .ok_or_else(|| {
                AppError::not_found(format!("Event with id '{}' was not found", event_id))
            })?;

        if event.available_tickets < order.quantity {
            return Err(sold_out(event_id));
        }

        let ticket = order.into_ticket(event)?;
        event.available_tickets -= ticket.quantity;
        event.updated_at = Utc::now();
        let event = event.clone();

        tables.tickets.push(ticket.clone());
        Ok(Purchase { ticket, event })
    }

    async fn list_tickets_by_buyer(&self, email: &str) -> Result<Vec<TicketWithEvent>, AppError> {
        let tables = self.tables.read().await;
        let mut tickets: Vec<TicketWithEvent> = tables
            .tickets
            .iter()
            .filter(|ticket| ticket.buyer_email == email)
            .filter_map(|ticket| {
                let event = tables.events.get(&ticket.event_id)?;
                Some(TicketWithEvent {
                    ticket: ticket.clone(),
                    event_title: event.title.clone(),
                    event_date: event.date,
                    event_time: event.time,
                    event_location: event.location.clone(),
                })
            })
            .collect();
        tickets.sort_by(|a, b| b.ticket.created_at.cmp(&a.ticket.created_at));
        Ok(tickets)
    }
}
