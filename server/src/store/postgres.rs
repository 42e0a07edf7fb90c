use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use uuid::Uuid;

use super::{sold_out, DataStore};
use crate::models::{
    Credentials, Event, EventInput, EventOrder, EventQuery, EventStatus, EventWithOrganizer,
    NewProfile, Profile, Purchase, PurchaseOrder, TicketWithEvent,
};
use crate::utils::error::AppError;

const PROFILE_FIELDS: &str = "id, email, full_name, role, created_at, updated_at";

const EVENT_FIELDS: &str = "id, title, description, location, date, time, price, max_tickets, \
     available_tickets, image_url, status, organizer_id, created_at, updated_at";

const EVENT_WITH_ORGANIZER: &str = "SELECT e.id, e.title, e.description, e.location, e.date, \
     e.time, e.price, e.max_tickets, e.available_tickets, e.image_url, e.status, e.organizer_id, \
     e.created_at, e.updated_at, p.full_name AS organizer_name, p.email AS organizer_email \
     FROM events e JOIN profiles p ON p.id = e.organizer_id";

/// Postgres-backed store. Schema lives in `migrations/`.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a pool and brings the schema up to date.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        tracing::info!("Successfully connected to database");

        sqlx::migrate!()
            .run(&pool)
            .await
            .map_err(|e| AppError::InternalServerError(format!("migrations failed: {}", e)))?;
        tracing::info!("Migrations run successfully");

        Ok(Self::new(pool))
    }

    async fn event_exists(&self, id: Uuid) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM events WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    // A conditional write matched no row: tell "gone" apart from "changed".
    async fn missed_write(&self, id: Uuid, conflict: AppError) -> AppError {
        match self.event_exists(id).await {
            Ok(true) => conflict,
            Ok(false) => AppError::not_found(format!("Event with id '{}' was not found", id)),
            Err(e) => e,
        }
    }
}

#[async_trait]
impl DataStore for PgStore {
    async fn insert_profile(&self, profile: NewProfile) -> Result<Profile, AppError> {
        let sql = format!(
            "INSERT INTO profiles (id, email, full_name, role, password_hash, password_salt) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
            PROFILE_FIELDS
        );
        sqlx::query_as::<_, Profile>(&sql)
            .bind(Uuid::new_v4())
            .bind(&profile.email)
            .bind(&profile.full_name)
            .bind(profile.role)
            .bind(&profile.password_hash)
            .bind(&profile.password_salt)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                    AppError::conflict("An account with this email already exists")
                }
                other => AppError::DatabaseError(other),
            })
    }

    async fn get_profile(&self, id: Uuid) -> Result<Option<Profile>, AppError> {
        let sql = format!("SELECT {} FROM profiles WHERE id = $1", PROFILE_FIELDS);
        let profile = sqlx::query_as::<_, Profile>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(profile)
    }

    async fn find_credentials(&self, email: &str) -> Result<Option<Credentials>, AppError> {
        let credentials = sqlx::query_as::<_, Credentials>(
            "SELECT id AS profile_id, password_hash, password_salt FROM profiles WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(credentials)
    }

    async fn insert_event(&self, event: Event) -> Result<Event, AppError> {
        let sql = format!(
            "INSERT INTO events ({fields}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
             RETURNING {fields}",
            fields = EVENT_FIELDS
        );
        let event = sqlx::query_as::<_, Event>(&sql)
            .bind(event.id)
            .bind(&event.title)
            .bind(&event.description)
            .bind(&event.location)
            .bind(event.date)
            .bind(event.time)
            .bind(event.price)
            .bind(event.max_tickets)
            .bind(event.available_tickets)
            .bind(&event.image_url)
            .bind(event.status)
            .bind(event.organizer_id)
            .bind(event.created_at)
            .bind(event.updated_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(event)
    }

    async fn get_event(&self, id: Uuid) -> Result<Option<EventWithOrganizer>, AppError> {
        let sql = format!("{} WHERE e.id = $1", EVENT_WITH_ORGANIZER);
        let event = sqlx::query_as::<_, EventWithOrganizer>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(event)
    }

    async fn list_events(&self, query: &EventQuery) -> Result<Vec<EventWithOrganizer>, AppError> {
        let order = match query.order {
            EventOrder::CreatedDesc => "e.created_at DESC",
            EventOrder::DateAsc => "e.date ASC, e.time ASC",
        };
        let sql = format!(
            "{} \
             WHERE ($1::event_status IS NULL OR e.status = $1) \
               AND ($2::uuid IS NULL OR e.organizer_id = $2) \
               AND ($3::date IS NULL OR e.date >= $3) \
             ORDER BY {}",
            EVENT_WITH_ORGANIZER, order
        );
        let events = sqlx::query_as::<_, EventWithOrganizer>(&sql)
            .bind(query.status)
            .bind(query.organizer_id)
            .bind(query.from_date)
            .fetch_all(&self.pool)
            .await?;
        Ok(events)
    }

    async fn update_event(&self, id: Uuid, input: EventInput) -> Result<Event, AppError> {
        // Right-hand sides see the pre-update row, so the delta uses the old capacity.
        let sql = format!(
            "UPDATE events SET title = $2, description = $3, location = $4, date = $5, \
                 time = $6, price = $7, \
                 available_tickets = available_tickets + ($8 - max_tickets), \
                 max_tickets = $8, image_url = $9, status = 'pending', updated_at = NOW() \
             WHERE id = $1 AND available_tickets + ($8 - max_tickets) >= 0 \
             RETURNING {}",
            EVENT_FIELDS
        );
        let updated = sqlx::query_as::<_, Event>(&sql)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.location)
            .bind(input.date)
            .bind(input.time)
            .bind(input.price)
            .bind(input.max_tickets)
            .bind(&input.image_url)
            .fetch_optional(&self.pool)
            .await?;

        match updated {
            Some(event) => Ok(event),
            None => Err(self
                .missed_write(
                    id,
                    AppError::conflict("Capacity cannot drop below tickets already sold"),
                )
                .await),
        }
    }

    async fn update_event_status(
        &self,
        id: Uuid,
        from: EventStatus,
        to: EventStatus,
    ) -> Result<Event, AppError> {
        let sql = format!(
            "UPDATE events SET status = $3, updated_at = NOW() \
             WHERE id = $1 AND status = $2 RETURNING {}",
            EVENT_FIELDS
        );
        let updated = sqlx::query_as::<_, Event>(&sql)
            .bind(id)
            .bind(from)
            .bind(to)
            .fetch_optional(&self.pool)
            .await?;

        match updated {
            Some(event) => Ok(event),
            None => Err(self
                .missed_write(
                    id,
                    AppError::conflict(format!("Event is no longer '{}'", from.as_str())),
                )
                .await),
        }
    }

    async fn delete_event(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn purchase_tickets(&self, order: PurchaseOrder) -> Result<Purchase, AppError> {
        let event_id = order.event_id;
        let mut tx = self.pool.begin().await?;

        // The row lock taken here serializes concurrent buyers of the same event.
        let sql = format!(
            "UPDATE events SET available_tickets = available_tickets - $2, updated_at = NOW() \
             WHERE id = $1 AND status = 'approved' AND available_tickets >= $2 \
             RETURNING {}",
            EVENT_FIELDS
        );
        let reserved = sqlx::query_as::<_, Event>(&sql)
            .bind(event_id)
            .bind(order.quantity)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(event) = reserved else {
            let approved = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM events WHERE id = $1 AND status = 'approved')",
            )
            .bind(event_id)
            .fetch_one(&mut *tx)
            .await?;
            return Err(if approved {
                sold_out(event_id)
            } else {
                AppError::not_found(format!("Event with id '{}' was not found", event_id))
            });
        };

        let ticket = order.into_ticket(&event)?;

        sqlx::query(
            "INSERT INTO tickets (id, event_id, buyer_email, buyer_name, quantity, total_price, \
                 payment_status, payment_method, qr_code, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(ticket.id)
        .bind(ticket.event_id)
        .bind(&ticket.buyer_email)
        .bind(&ticket.buyer_name)
        .bind(ticket.quantity)
        .bind(ticket.total_price)
        .bind(ticket.payment_status)
        .bind(ticket.payment_method)
        .bind(&ticket.qr_code)
        .bind(ticket.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Purchase { ticket, event })
    }

    async fn list_tickets_by_buyer(&self, email: &str) -> Result<Vec<TicketWithEvent>, AppError> {
        let tickets = sqlx::query_as::<_, TicketWithEvent>(
            "SELECT t.id, t.event_id, t.buyer_email, t.buyer_name, t.quantity, t.total_price, \
                 t.payment_status, t.payment_method, t.qr_code, t.created_at, \
                 e.title AS event_title, e.date AS event_date, e.time AS event_time, \
                 e.location AS event_location \
             FROM tickets t JOIN events e ON e.id = t.event_id \
             WHERE t.buyer_email = $1 \
             ORDER BY t.created_at DESC",
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await?;
        Ok(tickets)
    }
}
