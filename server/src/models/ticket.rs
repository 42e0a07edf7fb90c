use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::event::Event;
use crate::utils::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "payment_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "payment_method", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    MtnMomo,
    #[default]
    Visa,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Ticket {
    pub id: Uuid,
    pub event_id: Uuid,
    pub buyer_email: String,
    pub buyer_name: String,
    pub quantity: i32,
    pub total_price: Decimal,
    pub payment_status: PaymentStatus,
    pub payment_method: PaymentMethod,
    pub qr_code: String,
    pub created_at: DateTime<Utc>,
}

/// A ticket joined with the event fields shown on a buyer's dashboard.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TicketWithEvent {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub ticket: Ticket,
    pub event_title: String,
    pub event_date: NaiveDate,
    pub event_time: NaiveTime,
    pub event_location: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PurchaseRequest {
    pub buyer_name: String,
    pub buyer_email: String,
    pub quantity: i32,
    #[serde(default)]
    pub payment_method: PaymentMethod,
}

/// A validated purchase order, priced against the event row it reserves.
#[derive(Debug, Clone)]
pub struct PurchaseOrder {
    pub event_id: Uuid,
    pub buyer_name: String,
    pub buyer_email: String,
    pub quantity: i32,
    pub payment_method: PaymentMethod,
    pub purchased_at: DateTime<Utc>,
}

/// Contents encoded in a ticket's QR code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TicketPass {
    pub event_id: Uuid,
    pub event_title: String,
    pub buyer_name: String,
    pub buyer_email: String,
    pub quantity: i32,
    pub purchase_date: DateTime<Utc>,
}

impl PurchaseOrder {
    /// Builds the ticket row for `event`, the row whose inventory was just reserved.
    pub fn into_ticket(self, event: &Event) -> Result<Ticket, AppError> {
        let total_price = event.total_price(self.quantity)?;
        let pass = TicketPass {
            event_id: event.id,
            event_title: event.title.clone(),
            buyer_name: self.buyer_name.clone(),
            buyer_email: self.buyer_email.clone(),
            quantity: self.quantity,
            purchase_date: self.purchased_at,
        };

        Ok(Ticket {
            id: Uuid::new_v4(),
            event_id: event.id,
            buyer_email: self.buyer_email,
            buyer_name: self.buyer_name,
            quantity: self.quantity,
            total_price,
            // TODO: start as Pending once a payment provider confirms MTN MoMo / Visa charges.
            payment_status: PaymentStatus::Completed,
            payment_method: self.payment_method,
            qr_code: serde_json::to_string(&pass)
                .map_err(|e| AppError::InternalServerError(e.to_string()))?,
            created_at: self.purchased_at,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Purchase {
    pub ticket: Ticket,
    pub event: Event,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::event::tests::sample_event;

    fn order(event: &Event, quantity: i32) -> PurchaseOrder {
        PurchaseOrder {
            event_id: event.id,
            buyer_name: "Awa Koné".to_string(),
            buyer_email: "awa@example.com".to_string(),
            quantity,
            payment_method: PaymentMethod::MtnMomo,
            purchased_at: Utc::now(),
        }
    }

    #[test]
    fn test_ticket_is_priced_from_event() {
        let event = sample_event(7500, 20, 20);
        let ticket = order(&event, 3).into_ticket(&event).unwrap();

        assert_eq!(ticket.total_price, Decimal::from(22_500));
        assert_eq!(ticket.quantity, 3);
        assert_eq!(ticket.event_id, event.id);
        assert_eq!(ticket.payment_status, PaymentStatus::Completed);
    }

    #[test]
    fn test_unpriceable_order_is_refused() {
        let mut event = sample_event(0, 20, 20);
        event.price = Decimal::MAX;
        assert!(matches!(
            order(&event, 2).into_ticket(&event),
            Err(AppError::ValidationError(_))
        ));
    }

    #[test]
    fn test_qr_code_carries_the_purchase() {
        let event = sample_event(0, 5, 5);
        let order = order(&event, 2);
        let purchased_at = order.purchased_at;
        let ticket = order.into_ticket(&event).unwrap();

        let pass: TicketPass = serde_json::from_str(&ticket.qr_code).unwrap();
        assert_eq!(pass.event_title, event.title);
        assert_eq!(pass.quantity, 2);
        assert_eq!(pass.purchase_date, purchased_at);
        assert!(ticket.qr_code.contains("\"buyerEmail\""));
    }

    #[test]
    fn test_payment_method_defaults_to_visa() {
        let request: PurchaseRequest = serde_json::from_str(
            r#"{"buyer_name":"Awa","buyer_email":"awa@example.com","quantity":1}"#,
        )
        .unwrap();
        assert_eq!(request.payment_method, PaymentMethod::Visa);

        let momo: PaymentMethod = serde_json::from_str("\"mtn_momo\"").unwrap();
        assert_eq!(momo, PaymentMethod::MtnMomo);
    }
}
