use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::models::{
    Event, EventOrder, EventQuery, EventStatus, Profile, Purchase, PurchaseOrder,
    PurchaseRequest, TicketWithEvent,
};
use crate::services::events::get_public_event;
use crate::services::validation::validate_purchase;
use crate::store::DataStore;
use crate::utils::error::AppError;

/// Buys `request.quantity` tickets for an approved event.
///
/// The quantity is checked against the event as read here for a precise
/// message, and again by the store inside the atomic reservation.
pub async fn purchase_tickets(
    store: &dyn DataStore,
    event_id: Uuid,
    request: PurchaseRequest,
) -> Result<Purchase, AppError> {
    validate_purchase(&request)?;

    let event = get_public_event(store, event_id).await?.event;
    event.check_purchase(request.quantity)?;

    let order = PurchaseOrder {
        event_id,
        buyer_name: request.buyer_name.trim().to_string(),
        buyer_email: request.buyer_email.trim().to_lowercase(),
        quantity: request.quantity,
        payment_method: request.payment_method,
        purchased_at: Utc::now(),
    };

    let purchase = store.purchase_tickets(order).await?;
    tracing::info!(
        event_id = %event_id,
        ticket_id = %purchase.ticket.id,
        quantity = purchase.ticket.quantity,
        remaining = purchase.event.available_tickets,
        "Tickets purchased"
    );
    Ok(purchase)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub events: usize,
    pub approved_events: usize,
    pub tickets: usize,
}

#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub events: Vec<Event>,
    pub tickets: Vec<TicketWithEvent>,
    pub stats: DashboardStats,
}

/// A profile's own events (newest first) and the tickets bought with its email.
pub async fn dashboard(store: &dyn DataStore, profile: &Profile) -> Result<Dashboard, AppError> {
    let query = EventQuery {
        organizer_id: Some(profile.id),
        order: EventOrder::CreatedDesc,
        ..Default::default()
    };
    let events: Vec<Event> = store
        .list_events(&query)
        .await?
        .into_iter()
        .map(|e| e.event)
        .collect();
    let tickets = store.list_tickets_by_buyer(&profile.email).await?;

    let stats = DashboardStats {
        events: events.len(),
        approved_events: events
            .iter()
            .filter(|e| e.status == EventStatus::Approved)
            .count(),
        tickets: tickets.len(),
    };
    Ok(Dashboard {
        events,
        tickets,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::models::{PaymentMethod, Role};
    use crate::services::events::tests::{input, profile, today};
    use crate::services::events::{create_event, moderate_event};
    use crate::store::MemoryStore;

    fn request(email: &str, quantity: i32) -> PurchaseRequest {
        PurchaseRequest {
            buyer_name: "Fatou Diallo".to_string(),
            buyer_email: email.to_string(),
            quantity,
            payment_method: PaymentMethod::MtnMomo,
        }
    }

    async fn approved_event(store: &MemoryStore, price: i64, max_tickets: i32) -> (Profile, Event) {
        let organizer = profile(store, "orga@example.com", Role::Organizer).await;
        let admin = profile(store, "admin@example.com", Role::Admin).await;
        let event = create_event(store, &organizer, input("Soirée salsa", price, max_tickets, 4), today())
            .await
            .unwrap();
        let event = moderate_event(store, &admin, event.id, EventStatus::Approved)
            .await
            .unwrap();
        (organizer, event)
    }

    #[tokio::test]
    async fn test_purchase_records_ticket_and_inventory() {
        let store = MemoryStore::new();
        let (_, event) = approved_event(&store, 4500, 12).await;

        let purchase = purchase_tickets(&store, event.id, request("Fatou@Example.com", 3))
            .await
            .unwrap();
        assert_eq!(purchase.ticket.total_price, Decimal::from(13_500));
        assert_eq!(purchase.ticket.buyer_email, "fatou@example.com");
        assert_eq!(purchase.event.available_tickets, 9);
    }

    #[tokio::test]
    async fn test_purchase_over_inventory_is_refused() {
        let store = MemoryStore::new();
        let (_, event) = approved_event(&store, 0, 2).await;

        let err = purchase_tickets(&store, event.id, request("a@example.com", 3))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        purchase_tickets(&store, event.id, request("a@example.com", 2))
            .await
            .unwrap();
        let err = purchase_tickets(&store, event.id, request("b@example.com", 1))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_pending_event_cannot_be_bought() {
        let store = MemoryStore::new();
        let organizer = profile(&store, "orga@example.com", Role::Organizer).await;
        let event = create_event(&store, &organizer, input("Pas encore validé", 0, 5, 1), today())
            .await
            .unwrap();

        let err = purchase_tickets(&store, event.id, request("a@example.com", 1))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_dashboard_lists_own_events_and_tickets() {
        let store = MemoryStore::new();
        let (organizer, event) = approved_event(&store, 1000, 10).await;
        create_event(&store, &organizer, input("Brouillon suivant", 0, 5, 2), today())
            .await
            .unwrap();
        purchase_tickets(&store, event.id, request("orga@example.com", 2))
            .await
            .unwrap();
        purchase_tickets(&store, event.id, request("someone@example.com", 1))
            .await
            .unwrap();

        let view = dashboard(&store, &organizer).await.unwrap();
        assert_eq!(
            view.stats,
            DashboardStats {
                events: 2,
                approved_events: 1,
                tickets: 1,
            }
        );
        assert_eq!(view.tickets[0].event_title, "Soirée salsa");
        assert_eq!(view.tickets[0].ticket.quantity, 2);
    }
}
